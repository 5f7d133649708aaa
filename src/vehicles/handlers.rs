// HTTP handlers for vehicle catalogue endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::error::{ApiError, ErrorResponse};
use crate::vehicles::query::VehicleQueryValidator;
use crate::vehicles::{Vehicle, VehicleQueryParams};
use crate::AppState;

/// Handler for GET /api/vehicles
/// Supports list filters, price/year ranges, sorting, and pagination
#[utoipa::path(
    get,
    path = "/api/vehicles",
    params(
        ("fuelTypes" = Option<String>, Query, description = "Comma-separated fuel types"),
        ("vehicleTypes" = Option<String>, Query, description = "Comma-separated vehicle types"),
        ("makes" = Option<String>, Query, description = "Comma-separated makes (case-insensitive)"),
        ("minPrice" = Option<f64>, Query, description = "Minimum price (inclusive)"),
        ("maxPrice" = Option<f64>, Query, description = "Maximum price (inclusive)"),
        ("minYear" = Option<i32>, Query, description = "Minimum model year (inclusive)"),
        ("maxYear" = Option<i32>, Query, description = "Maximum model year (inclusive)"),
        ("maxMileage" = Option<i32>, Query, description = "Maximum mileage (inclusive)"),
        ("sort" = Option<String>, Query, description = "price or year"),
        ("order" = Option<String>, Query, description = "asc or desc"),
        ("page" = Option<u32>, Query, description = "Page number, from 1"),
        ("limit" = Option<u32>, Query, description = "Items per page, 1 to 100")
    ),
    responses(
        (status = 200, description = "Matching vehicles", body = Vec<Vehicle>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "vehicles"
)]
pub async fn list_vehicles_handler(
    State(state): State<AppState>,
    Query(params): Query<VehicleQueryParams>,
) -> Result<Json<Vec<Vehicle>>, ApiError> {
    tracing::debug!("Fetching vehicles with query parameters: {:?}", params);

    let validated = VehicleQueryValidator::validate(params)?;
    let vehicles = state.vehicles.search(&validated.to_builder()?).await?;

    tracing::debug!("Query returned {} vehicles", vehicles.len());
    Ok(Json(vehicles))
}

/// Handler for GET /api/vehicles/:id
#[utoipa::path(
    get,
    path = "/api/vehicles/{id}",
    params(
        ("id" = i32, Path, description = "Vehicle ID")
    ),
    responses(
        (status = 200, description = "Vehicle found", body = Vehicle),
        (status = 404, description = "Vehicle not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "vehicles"
)]
pub async fn get_vehicle_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vehicle>, ApiError> {
    tracing::debug!("Fetching vehicle with id: {}", id);

    let vehicle = state
        .vehicles
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Vehicle".to_string(),
            id: id.to_string(),
        })?;

    Ok(Json(vehicle))
}
