pub mod config;
pub mod middleware;
pub mod server;
pub mod tmdb;
pub mod util;

use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the application from a configuration, validating it first.
pub fn app(config: config::Config) -> Result<axum::Router, ServerError> {
    let config = config.validated()?;
    let api_key = config
        .api_key()
        .ok_or(config::ConfigError::MissingApiKey)?
        .to_string();
    let tmdb = tmdb::TmdbClient::new(&config.tmdb.base_url, &api_key)?;
    let state = server::AppState::new(config, tmdb);
    Ok(server::build_router(state)?)
}

pub async fn run(config_path: Option<&str>, debug_logs: bool) -> Result<(), ServerError> {
    let config = config::Config::load(config_path)?;

    if let Some(path) = config_path {
        info!("Using config file: {}", path);
    }
    info!("Upstream API: {}", config.tmdb.base_url);
    match config.cors_origin() {
        Some(origin) => info!("Allowing cross-origin requests from {}", origin),
        None => info!("Allowing cross-origin requests from any origin"),
    }
    if debug_logs {
        info!("Debug logging enabled");
    }

    let addr = config.socket_addr()?;

    let app = app(config)?;

    info!("Serving HTTP on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("Shutdown signal received");
}
