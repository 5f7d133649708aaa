pub mod config;
pub mod db;
pub mod error;
pub mod recommendations;
pub mod validation;
pub mod vehicles;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use error::ErrorResponse;
use recommendations::{
    ExtractionRequest, Recommendation, RecommendationParameters, RecommendationRequest,
    RecommendationResponse, RecommendationService,
};
use vehicles::{Vehicle, VehicleRepository};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        vehicles::handlers::list_vehicles_handler,
        vehicles::handlers::get_vehicle_handler,
        recommendations::handlers::recommend_handler,
        recommendations::handlers::validate_parameters_handler,
        recommendations::handlers::extract_parameters_handler,
    ),
    components(
        schemas(
            Vehicle,
            RecommendationParameters,
            RecommendationRequest,
            ExtractionRequest,
            RecommendationResponse,
            Recommendation,
            ErrorResponse
        )
    ),
    tags(
        (name = "vehicles", description = "Vehicle catalogue endpoints"),
        (name = "recommendations", description = "Filter validation and vehicle recommendations")
    ),
    info(
        title = "Vehicle Marketplace API",
        version = "0.1.0",
        description = "Vehicle search and recommendation API with validated filter parameters"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub vehicles: VehicleRepository,
    pub recommendations: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(vehicles: VehicleRepository, recommendations: RecommendationService) -> Self {
        Self {
            vehicles,
            recommendations: Arc::new(recommendations),
        }
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS and tracing middleware
pub fn create_router(state: AppState) -> Router {
    // Allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Vehicle catalogue
        .route("/api/vehicles", get(vehicles::list_vehicles_handler))
        .route("/api/vehicles/:id", get(vehicles::get_vehicle_handler))
        // Recommendations
        .route("/api/recommendations", post(recommendations::recommend_handler))
        .route(
            "/api/recommendations/parameters/validate",
            post(recommendations::validate_parameters_handler),
        )
        .route(
            "/api/recommendations/extract",
            post(recommendations::extract_parameters_handler),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests;
