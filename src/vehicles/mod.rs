// Vehicle catalogue module
// Read-only listing and lookup of marketplace vehicles

pub mod handlers;
pub mod models;
pub mod query;
pub mod repository;
pub mod types;

pub use handlers::{get_vehicle_handler, list_vehicles_handler};
pub use models::{Vehicle, VehicleQueryParams};
pub use repository::VehicleRepository;
pub use types::{FuelType, VehicleType};
