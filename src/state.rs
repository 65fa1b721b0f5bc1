use std::sync::Arc;

use crate::auth::jwt::JwtKeys;
use crate::config::AppConfig;
use crate::db::Db;
use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Db>,
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db = Db::open(config.database_path.clone()).await?;
        Ok(Self::from_parts(Arc::new(db), Arc::new(config)))
    }

    pub fn from_parts(db: Arc<Db>, config: Arc<AppConfig>) -> Self {
        Self {
            jwt: JwtKeys::from_config(&config.jwt),
            db,
            config,
            metrics: Arc::new(Metrics::default()),
        }
    }
}

#[cfg(test)]
impl AppState {
    /// State backed by a fresh document in a temp dir.
    pub async fn fake() -> (tempfile::TempDir, Self) {
        use crate::config::JwtConfig;

        let dir = tempfile::TempDir::new().expect("temp dir");
        let config = AppConfig {
            database_path: dir.path().join("database.json"),
            filepath_root: dir.path().to_path_buf(),
            host: "127.0.0.1".into(),
            port: 0,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
                refresh_ttl_minutes: 60,
            },
        };
        let state = Self::init(config).await.expect("state init");
        (dir, state)
    }
}
