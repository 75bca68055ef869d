mod config;
mod error;
mod middleware;
mod routes;
mod state;

use quill_core::repo::DynamoRepository;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience)
    let _ = dotenvy::dotenv();

    // Load configuration
    let config = config::AppConfig::from_env().map_err(|e| {
        anyhow::anyhow!(
            "Failed to load config: {e}. Are DYNAMODB_CLASS_TABLE and DYNAMODB_DOCUMENT_TABLE set?"
        )
    })?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    tracing::info!("Starting Quill CMS API server");

    // Resolve AWS connectivity (region, credentials, optional endpoint
    // override) from the environment and build the repository.
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let repo = DynamoRepository::new(&aws_config, config.tables());

    tracing::info!(
        class_table = %config.class_table,
        document_table = %config.document_table,
        "DynamoDB client configured"
    );

    // Build application state
    let state = state::AppState::new(repo, config.clone());

    // Build router with middleware
    let app = routes::build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors::cors_layer());

    // Start server
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { tracing::info!("Received Ctrl+C, shutting down..."); }
        _ = terminate => { tracing::info!("Received SIGTERM, shutting down..."); }
    }
}
