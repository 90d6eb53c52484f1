use std::path::PathBuf;
use crate::api;
use crate::cli::commands::ServeArgs;
use crate::config::load_config;
use crate::errors::SiteError;
use tracing::info;

pub async fn handle_serve(args: ServeArgs) -> Result<(), SiteError> {
    let path = args.config.as_ref().map(PathBuf::from);
    let mut config = load_config(path.as_deref()).await?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(db) = args.db {
        config.server.db_path = db;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(addr = %addr, db = %config.server.db_path, "Starting clinic edge server");

    let state = api::create_app_state(config).await?;
    let app = api::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| SiteError::Internal(format!("Server error: {}", e)))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
