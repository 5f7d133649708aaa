use crate::recommendations::{InvalidFilterValue, RecommendationParameters};
use crate::vehicles::types::{FilterTag, FuelType, VehicleType};

/// Contract-shaped result of validating a payload in place
///
/// `error_message` is `Some` exactly when `is_valid` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub error_message: Option<String>,
}

impl ValidationOutcome {
    fn valid() -> Self {
        Self {
            is_valid: true,
            error_message: None,
        }
    }

    fn invalid(error: InvalidFilterValue) -> Self {
        Self {
            is_valid: false,
            error_message: Some(error.message),
        }
    }
}

/// Validator for recommendation filter payloads
///
/// Checks run in a fixed order and stop at the first failure:
/// fuel types, vehicle types, price range, year range, then the
/// mileage cap and excluded fuel types.
pub struct ParameterValidator;

impl ParameterValidator {
    /// Validates the payload and returns a sanitized copy
    ///
    /// On success each tag list holds only known tags in their original
    /// order; numeric bounds are passed through untouched.
    pub fn validate(
        params: &RecommendationParameters,
    ) -> Result<RecommendationParameters, InvalidFilterValue> {
        let preferred_fuel_types = Self::check_tags::<FuelType>(&params.preferred_fuel_types)?;
        let preferred_vehicle_types =
            Self::check_tags::<VehicleType>(&params.preferred_vehicle_types)?;

        if let (Some(min), Some(max)) = (params.min_price, params.max_price) {
            if min > max {
                return Err(InvalidFilterValue::new(format!(
                    "Invalid price range: minPrice ({}) cannot be greater than maxPrice ({})",
                    min, max
                )));
            }
        }

        if let (Some(min), Some(max)) = (params.min_year, params.max_year) {
            if min > max {
                return Err(InvalidFilterValue::new(format!(
                    "Invalid year range: minYear ({}) cannot be greater than maxYear ({})",
                    min, max
                )));
            }
        }

        if let Some(mileage) = params.max_mileage {
            if mileage < 0 {
                return Err(InvalidFilterValue::new(format!(
                    "Invalid maxMileage: {} cannot be negative",
                    mileage
                )));
            }
        }

        let negated_fuel_types = Self::check_tags::<FuelType>(&params.negated_fuel_types)?;

        Ok(RecommendationParameters {
            preferred_fuel_types,
            preferred_vehicle_types,
            negated_fuel_types,
            ..params.clone()
        })
    }

    /// Validates the payload and, on success, rewrites its tag lists
    ///
    /// On failure the payload is left exactly as it was.
    pub fn validate_in_place(params: &mut RecommendationParameters) -> ValidationOutcome {
        match Self::validate(params) {
            Ok(sanitized) => {
                // Only the tag lists can differ from the input
                *params = sanitized;
                ValidationOutcome::valid()
            }
            Err(error) => {
                tracing::debug!("Rejected recommendation parameters: {}", error);
                ValidationOutcome::invalid(error)
            }
        }
    }

    /// Checks every tag against the closed set `T`
    ///
    /// An empty list means "no preference" and passes. Unknown tags are all
    /// named in the error, in the order they were supplied.
    fn check_tags<T: FilterTag>(tags: &[String]) -> Result<Vec<String>, InvalidFilterValue> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let (known, unknown): (Vec<&String>, Vec<&String>) =
            tags.iter().partition(|tag| tag.parse::<T>().is_ok());

        if !unknown.is_empty() {
            let names = unknown
                .iter()
                .map(|tag| format!("'{}'", tag))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(InvalidFilterValue::new(format!(
                "Invalid {}(s): {}. Valid values are: {}",
                T::LABEL,
                names,
                T::valid_values()
            )));
        }

        Ok(known.into_iter().cloned().collect())
    }
}
