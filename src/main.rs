use bookshelf::bookshelf_config::AppConfig;
use bookshelf::logging::{init_tracing, shutdown_tracer};
use bookshelf::metrics::{init_metrics, metrics_app};
use bookshelf::router::init_router;
use bookshelf::state::init_app_state;
use dotenvy::dotenv;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing(&config.observability) {
        eprintln!("❌ Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(config).await {
        error!(error = ?e, "Server stopped with an error");
        shutdown_tracer().await;
        std::process::exit(1);
    }

    shutdown_tracer().await;
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    if let Some(handle) = init_metrics(config.observability.enabled)? {
        let metrics_addr = format!("{}:{}", config.server.host, config.observability.metrics_port);
        let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr).await?;
        info!("📊 Metrics available at http://{}/metrics", metrics_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(metrics_listener, metrics_app(handle)).await {
                error!(error = %e, "Metrics server stopped");
            }
        });
    }

    let state = init_app_state(&config).await?;
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(config.server.bind_address()).await?;
    let public_url = &config.server.public_url;
    info!("🚀 Server running on {}", public_url);
    info!("📚 Swagger UI available at {}/swagger-ui", public_url);
    info!("📖 Scalar UI available at {}/scalar", public_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
