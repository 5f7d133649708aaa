use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::validate_not_blank;

/// Filter payload handed to the recommendation pipeline
///
/// Built per request from caller JSON (or from LLM output) and never stored.
/// Tag lists hold raw strings because callers may send tags outside the
/// known enumerations; `ParameterValidator` decides whether they are trusted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationParameters {
    #[schema(example = json!(["Diesel", "Electric"]))]
    pub preferred_fuel_types: Vec<String>,
    #[schema(example = json!(["SUV"]))]
    pub preferred_vehicle_types: Vec<String>,
    #[schema(example = 10000.0)]
    pub min_price: Option<f64>,
    #[schema(example = 50000.0)]
    pub max_price: Option<f64>,
    #[schema(example = 2015)]
    pub min_year: Option<i32>,
    #[schema(example = 2024)]
    pub max_year: Option<i32>,
    #[schema(example = json!(["Toyota"]))]
    pub preferred_makes: Vec<String>,
    #[schema(example = json!(["Low Mileage"]))]
    pub desired_features: Vec<String>,
    #[schema(example = 60000)]
    pub max_mileage: Option<i32>,
    /// Makes the buyer ruled out ("no Toyota"); matching vehicles are excluded
    #[schema(example = json!(["Toyota"]))]
    pub negated_makes: Vec<String>,
    /// Fuel types the buyer ruled out; matching vehicles are excluded
    #[schema(example = json!(["Diesel"]))]
    pub negated_fuel_types: Vec<String>,
}

impl RecommendationParameters {
    /// True when no filter of any kind is set
    pub fn is_empty(&self) -> bool {
        self.preferred_fuel_types.is_empty()
            && self.preferred_vehicle_types.is_empty()
            && self.preferred_makes.is_empty()
            && self.desired_features.is_empty()
            && self.negated_makes.is_empty()
            && self.negated_fuel_types.is_empty()
            && self.max_mileage.is_none()
            && !self.has_price_bounds()
            && !self.has_year_bounds()
    }

    pub fn has_price_bounds(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }

    pub fn has_year_bounds(&self) -> bool {
        self.min_year.is_some() || self.max_year.is_some()
    }

    /// Overlay caller-supplied filters on top of extracted ones
    ///
    /// A non-empty caller list replaces the extracted list. A range is taken
    /// as a whole from the caller whenever either of its bounds is set, so a
    /// caller bound is never paired with an extracted bound it did not ask for.
    /// Negations from both sources are combined.
    pub fn merged_over(self, extracted: RecommendationParameters) -> RecommendationParameters {
        fn pick(caller: Vec<String>, extracted: Vec<String>) -> Vec<String> {
            if caller.is_empty() {
                extracted
            } else {
                caller
            }
        }

        let (min_price, max_price) = if self.has_price_bounds() {
            (self.min_price, self.max_price)
        } else {
            (extracted.min_price, extracted.max_price)
        };
        let (min_year, max_year) = if self.has_year_bounds() {
            (self.min_year, self.max_year)
        } else {
            (extracted.min_year, extracted.max_year)
        };

        fn union(mut caller: Vec<String>, extracted: Vec<String>) -> Vec<String> {
            for item in extracted {
                if !caller.contains(&item) {
                    caller.push(item);
                }
            }
            caller
        }

        RecommendationParameters {
            preferred_fuel_types: pick(self.preferred_fuel_types, extracted.preferred_fuel_types),
            preferred_vehicle_types: pick(
                self.preferred_vehicle_types,
                extracted.preferred_vehicle_types,
            ),
            min_price,
            max_price,
            min_year,
            max_year,
            preferred_makes: pick(self.preferred_makes, extracted.preferred_makes),
            desired_features: pick(self.desired_features, extracted.desired_features),
            max_mileage: self.max_mileage.or(extracted.max_mileage),
            negated_makes: union(self.negated_makes, extracted.negated_makes),
            negated_fuel_types: union(self.negated_fuel_types, extracted.negated_fuel_types),
        }
    }

    /// Cap the price range at the caller's budget
    ///
    /// Only fills an absent `maxPrice`, and only when doing so cannot invert
    /// the range.
    pub fn with_budget(mut self, budget: Option<f64>) -> RecommendationParameters {
        if let Some(budget) = budget {
            let fits = self.min_price.map_or(true, |min| min <= budget);
            if self.max_price.is_none() && fits {
                self.max_price = Some(budget);
            }
        }
        self
    }
}

/// Request DTO for POST /api/recommendations
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    /// Free-text description of what the buyer is looking for
    #[validate(
        length(min = 1, max = 1000, message = "Query must be between 1 and 1000 characters"),
        custom = "validate_not_blank"
    )]
    #[schema(example = "A cheap family SUV, ideally diesel")]
    pub query: String,
    #[validate(range(min = 0.0, message = "Budget must not be negative"))]
    #[schema(example = 25000.0)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub parameters: Option<RecommendationParameters>,
    #[validate(range(min = 1, max = 50, message = "Limit must be between 1 and 50"))]
    #[schema(example = 10)]
    pub limit: Option<u32>,
}

/// Request DTO for POST /api/recommendations/extract
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ExtractionRequest {
    #[validate(
        length(min = 1, max = 1000, message = "Query must be between 1 and 1000 characters"),
        custom = "validate_not_blank"
    )]
    #[schema(example = "Something recent and electric, no more than 40k")]
    pub query: String,
}
