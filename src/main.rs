use duel_chess::api::router::create_router;
use duel_chess::api::state::AppState;
use duel_chess::config::AppConfig;
use duel_chess::healthcheck;

#[tokio::main]
async fn main() {
    // Container probe mode: exit 0 when a local server answers /health.
    if std::env::args().any(|a| a == "--health-check") {
        let base_url = format!("http://127.0.0.1:{}", AppConfig::from_env().port);
        match healthcheck::check(&base_url).await {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("health check failed: {e}");
                std::process::exit(1);
            }
        }
    }

    // Initialize tracing (structured logging).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "duel_chess=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env();
    let bind_addr = config.bind_addr();
    let max_sessions = config.max_sessions;
    let state = AppState::new(config);

    let app = create_router(state);

    tracing::info!(
        "duel-chess v{} listening on {bind_addr} (max {max_sessions} sessions)",
        env!("CARGO_PKG_VERSION")
    );

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {bind_addr}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}
