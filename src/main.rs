use rooming_house_cms::{
    api::{self, AppState},
    config::{AppConfig, catalog::load_catalog_or_default, database},
    core::catalog::seed_catalog,
    errors::Result,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env and the application configuration
    let config = AppConfig::load()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!(environment = ?config.environment, "Configuration loaded");

    // 3. Open the database and make sure every table exists
    let db = database::create_connection(&config.database_url)
        .await
        .inspect_err(|e| error!("Failed to open database: {}", e))?;
    database::create_tables(&db).await?;

    // 4. Seed periods and transaction categories
    let catalog = load_catalog_or_default(&config.catalog_path)?;
    seed_catalog(&db, &catalog)
        .await
        .inspect(|()| info!("Catalog seeded"))
        .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;

    // 5. Serve the API
    let app = api::router(AppState::new(db, &config)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(api::cors_layer(&config.allowed_origins())),
    );
    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Rooming house back office listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
