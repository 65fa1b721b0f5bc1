use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{Html, Response},
};

use crate::state::AppState;

/// Counts requests served by the static file server.
#[derive(Debug, Default)]
pub struct Metrics {
    hits: AtomicU64,
}

impl Metrics {
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
    }
}

pub async fn count_hits(State(metrics): State<Arc<Metrics>>, req: Request, next: Next) -> Response {
    metrics.record_hit();
    next.run(req).await
}

pub async fn metrics_page(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n<body>\n<h1>Welcome, Chirpy Admin</h1>\n<p>Chirpy has been visited {} times!</p>\n</body>\n</html>\n",
        state.metrics.hits()
    ))
}

pub async fn reset_hits(State(state): State<AppState>) -> &'static str {
    state.metrics.reset();
    "Hits reset to 0"
}
