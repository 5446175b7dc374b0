use product_catalog::catalog::service::ProductService;
use product_catalog::config::{Config, usage};
use product_catalog::engine;
use product_catalog::server;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = Config::from_env()?;

    let args: Vec<String> = std::env::args().collect();
    if let Err(err) = config.apply_args(&args) {
        eprintln!("{}", err);
        eprintln!("{}", usage(&args));
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    tracing::info!(
        "Starting product catalog ({:?} backend, index '{}')",
        config.backend,
        config.products_index
    );

    // 1. Search backend:
    let backend = engine::connect(&config)?;
    let service = Arc::new(ProductService::new(backend, config.products_index.clone()));

    // 2. Connection check and index bootstrap:
    match service.check_connection().await {
        Ok(info) => {
            tracing::info!(
                "Connected to cluster '{}' (version {})",
                info.cluster_name,
                info.version.number
            );
            service.initialize_index().await?;
        }
        Err(err) => {
            tracing::warn!("Search backend unreachable, continuing without index setup: {}", err);
        }
    }

    // 3. HTTP server:
    let app = server::router(service);

    tracing::info!("HTTP server listening on {}", config.bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
