use clap::Parser;

mod app;
mod auth;
mod chirps;
mod config;
mod db;
mod error;
mod metrics;
mod state;
mod users;

#[derive(Debug, Parser)]
#[command(name = "chirpy", about = "Chirpy API server")]
struct Cli {
    /// Wipe the database file on startup.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "chirpy=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = config::AppConfig::from_env()?;
    let (host, port) = (config.host.clone(), config.port);
    let state = state::AppState::init(config).await?;
    tracing::info!(path = %state.db.path().display(), "database ready");

    if cli.debug {
        tracing::warn!("debug mode: wiping database");
        state.db.reset().await?;
    }

    let app = app::build_app(state);
    app::serve(app, &host, port).await
}
