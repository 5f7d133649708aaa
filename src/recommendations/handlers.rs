// HTTP handlers for recommendation endpoints

use axum::{extract::State, Json};
use validator::Validate;

use crate::error::{ApiError, ErrorResponse};
use crate::recommendations::{
    ExtractionRequest, ParameterValidator, RecommendationParameters, RecommendationRequest,
    RecommendationResponse,
};
use crate::AppState;

/// Handler for POST /api/recommendations/parameters/validate
/// Validates a filter payload and returns its sanitized form
#[utoipa::path(
    post,
    path = "/api/recommendations/parameters/validate",
    request_body = RecommendationParameters,
    responses(
        (status = 200, description = "Parameters are valid", body = RecommendationParameters),
        (status = 400, description = "Unknown tag or inverted range", body = ErrorResponse)
    ),
    tag = "recommendations"
)]
pub async fn validate_parameters_handler(
    Json(params): Json<RecommendationParameters>,
) -> Result<Json<RecommendationParameters>, ApiError> {
    let sanitized = ParameterValidator::validate(&params)?;
    Ok(Json(sanitized))
}

/// Handler for POST /api/recommendations/extract
/// Turns free text into parameters; falls back to empty parameters
#[utoipa::path(
    post,
    path = "/api/recommendations/extract",
    request_body = ExtractionRequest,
    responses(
        (status = 200, description = "Extracted parameters (empty when the LLM is unavailable)", body = RecommendationParameters),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "recommendations"
)]
pub async fn extract_parameters_handler(
    State(state): State<AppState>,
    Json(request): Json<ExtractionRequest>,
) -> Result<Json<RecommendationParameters>, ApiError> {
    request.validate()?;

    let (params, _) = state
        .recommendations
        .extract_parameters(request.query.trim())
        .await;
    Ok(Json(params))
}

/// Handler for POST /api/recommendations
/// Validates filters, optionally consults the LLM, and ranks matching vehicles
#[utoipa::path(
    post,
    path = "/api/recommendations",
    request_body = RecommendationRequest,
    responses(
        (status = 200, description = "Ranked suggestions", body = RecommendationResponse),
        (status = 400, description = "Invalid request or filter value", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "recommendations"
)]
pub async fn recommend_handler(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    tracing::debug!("Recommendation request, query length {}", request.query.len());
    request.validate()?;

    let response = state.recommendations.recommend(request).await?;

    tracing::info!(
        "Returning {} recommendations (llm: {})",
        response.recommendations.len(),
        response.used_llm
    );
    Ok(Json(response))
}
