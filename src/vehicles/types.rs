// Closed filter enumerations for the vehicle catalogue
// Fuel and body types are fixed sets; anything outside them is invalid

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// A closed set of categorical tags that a recommendation filter may name.
///
/// Implemented by [`FuelType`] and [`VehicleType`] so the validator can
/// check both tag lists with the same code.
pub trait FilterTag: FromStr + fmt::Display + Copy + 'static {
    /// Every member of the set, in the order it is reported to callers
    const ALL: &'static [Self];

    /// Human-readable name of the set, used in error messages
    const LABEL: &'static str;

    /// Comma-separated list of every valid tag
    fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Fuel type of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
    /// Plug-in hybrid
    Plugin,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Petrol => "Petrol",
            FuelType::Diesel => "Diesel",
            FuelType::Electric => "Electric",
            FuelType::Hybrid => "Hybrid",
            FuelType::Plugin => "Plugin",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FuelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Petrol" => Ok(FuelType::Petrol),
            "Diesel" => Ok(FuelType::Diesel),
            "Electric" => Ok(FuelType::Electric),
            "Hybrid" => Ok(FuelType::Hybrid),
            "Plugin" => Ok(FuelType::Plugin),
            _ => Err(format!("Invalid fuel type: {}", s)),
        }
    }
}

impl FilterTag for FuelType {
    const ALL: &'static [Self] = &[
        FuelType::Petrol,
        FuelType::Diesel,
        FuelType::Electric,
        FuelType::Hybrid,
        FuelType::Plugin,
    ];
    const LABEL: &'static str = "fuel type";
}

/// Body type of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum VehicleType {
    Sedan,
    #[serde(rename = "SUV")]
    Suv,
    Hatchback,
    Estate,
    Coupe,
    Convertible,
    Pickup,
    Van,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Sedan => "Sedan",
            VehicleType::Suv => "SUV",
            VehicleType::Hatchback => "Hatchback",
            VehicleType::Estate => "Estate",
            VehicleType::Coupe => "Coupe",
            VehicleType::Convertible => "Convertible",
            VehicleType::Pickup => "Pickup",
            VehicleType::Van => "Van",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sedan" => Ok(VehicleType::Sedan),
            "SUV" => Ok(VehicleType::Suv),
            "Hatchback" => Ok(VehicleType::Hatchback),
            "Estate" => Ok(VehicleType::Estate),
            "Coupe" => Ok(VehicleType::Coupe),
            "Convertible" => Ok(VehicleType::Convertible),
            "Pickup" => Ok(VehicleType::Pickup),
            "Van" => Ok(VehicleType::Van),
            _ => Err(format!("Invalid vehicle type: {}", s)),
        }
    }
}

impl FilterTag for VehicleType {
    const ALL: &'static [Self] = &[
        VehicleType::Sedan,
        VehicleType::Suv,
        VehicleType::Hatchback,
        VehicleType::Estate,
        VehicleType::Coupe,
        VehicleType::Convertible,
        VehicleType::Pickup,
        VehicleType::Van,
    ];
    const LABEL: &'static str = "vehicle type";
}

/// Makes the parameter extractor is allowed to emit
pub const KNOWN_MAKES: &[&str] = &[
    "BMW",
    "Audi",
    "Mercedes",
    "Toyota",
    "Honda",
    "Ford",
    "Volkswagen",
    "Nissan",
    "Hyundai",
    "Kia",
    "Tesla",
    "Volvo",
    "Mazda",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuel_type_display_round_trips_through_from_str() {
        for fuel in FuelType::ALL {
            assert_eq!(FuelType::from_str(&fuel.to_string()).unwrap(), *fuel);
        }
    }

    #[test]
    fn test_vehicle_type_display() {
        assert_eq!(VehicleType::Suv.to_string(), "SUV");
        assert_eq!(VehicleType::Pickup.to_string(), "Pickup");
    }

    #[test]
    fn test_from_str_is_case_sensitive() {
        assert!(FuelType::from_str("petrol").is_err());
        assert!(VehicleType::from_str("suv").is_err());
        assert!(VehicleType::from_str("Blimp").is_err());
    }

    #[test]
    fn test_valid_values_lists_every_member_in_order() {
        assert_eq!(
            FuelType::valid_values(),
            "Petrol, Diesel, Electric, Hybrid, Plugin"
        );
        assert_eq!(
            VehicleType::valid_values(),
            "Sedan, SUV, Hatchback, Estate, Coupe, Convertible, Pickup, Van"
        );
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&VehicleType::Suv).unwrap();
        assert_eq!(json, "\"SUV\"");

        let fuel: FuelType = serde_json::from_str("\"Plugin\"").unwrap();
        assert_eq!(fuel, FuelType::Plugin);
    }
}
