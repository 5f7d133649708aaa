use thiserror::Error;
use tracing_subscriber::EnvFilter;

use vehicle_marketplace_api::{
    config::{AppConfig, ConfigError},
    create_router, db,
    recommendations::{LlmError, OpenRouterClient, RecommendationService},
    vehicles::VehicleRepository,
    AppState,
};

/// Anything that can stop the server from coming up
#[derive(Debug, Error)]
enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to create database pool: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to run database migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Failed to build LLM client: {0}")]
    Llm(#[from] LlmError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    tracing::info!("Vehicle Marketplace API - Starting...");

    let config = AppConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url, config.database_max_connections).await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;
    tracing::info!("Migrations completed successfully");

    let llm = match config.llm.clone() {
        Some(llm_config) => {
            tracing::info!("LLM extraction enabled (model: {})", llm_config.model);
            Some(OpenRouterClient::new(llm_config)?)
        }
        None => {
            tracing::warn!("OPENROUTER_API_KEY not set, recommendations will use explicit filters only");
            None
        }
    };

    let vehicles = VehicleRepository::new(db_pool);
    let recommendations = RecommendationService::new(vehicles.clone(), llm);
    let app = create_router(AppState::new(vehicles, recommendations));

    let addr = config.bind_address();
    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Vehicle Marketplace API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
