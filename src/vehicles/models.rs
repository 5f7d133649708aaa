use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A vehicle listed on the marketplace
///
/// `fuel_type` and `vehicle_type` are stored as text and normally hold one
/// of the `FuelType` / `VehicleType` names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Toyota")]
    pub make: String,
    #[schema(example = "RAV4")]
    pub model: String,
    #[schema(example = 2021)]
    pub year: i32,
    #[schema(example = 24500.0)]
    pub price: Decimal,
    #[schema(example = 32000)]
    pub mileage: i32,
    #[schema(example = "Hybrid")]
    pub fuel_type: String,
    #[schema(example = "SUV")]
    pub vehicle_type: String,
    #[schema(example = "One owner, full service history")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Query string for GET /api/vehicles
///
/// List filters are comma-separated, e.g. `fuelTypes=Petrol,Diesel`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleQueryParams {
    pub fuel_types: Option<String>,
    pub vehicle_types: Option<String>,
    pub makes: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub max_mileage: Option<i32>,
    /// "price" or "year"
    pub sort: Option<String>,
    /// "asc" or "desc"
    pub order: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
