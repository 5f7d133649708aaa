// Local ranking of candidate vehicles
// Pure and deterministic: the same candidates and parameters give the same order

use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use utoipa::ToSchema;

use crate::recommendations::RecommendationParameters;
use crate::vehicles::Vehicle;

const FUEL_MATCH: f64 = 3.0;
const TYPE_MATCH: f64 = 3.0;
const MAKE_MATCH: f64 = 2.0;
const FEATURE_MATCH: f64 = 1.0;
const MAX_PRICE_FIT: f64 = 2.0;
const MAX_RECENCY: f64 = 1.0;
/// Vehicles older than this many years get no recency bonus
const RECENCY_WINDOW: i32 = 10;
const LOW_MILEAGE_LIMIT: i32 = 30_000;

/// A ranked suggestion returned to the caller
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub vehicle: Vehicle,
    #[schema(example = 7.4)]
    pub score: f64,
    /// Why the vehicle scored what it did, most significant first
    #[schema(example = json!(["Preferred fuel type: Diesel", "Within budget"]))]
    pub reasons: Vec<String>,
}

/// Everything the scorer needs besides the vehicle itself
#[derive(Debug, Clone, Copy)]
pub struct RankingContext<'a> {
    pub params: &'a RecommendationParameters,
    pub budget: Option<f64>,
    pub current_year: i32,
}

/// Scores every candidate and returns the best `limit`
///
/// Ties are broken by lower price, then lower id. Ordering uses the exact
/// score; the returned score is rounded to two decimals.
pub fn rank(candidates: Vec<Vehicle>, context: RankingContext<'_>, limit: usize) -> Vec<Recommendation> {
    let mut scored: Vec<(f64, Recommendation)> = candidates
        .into_iter()
        .map(|vehicle| score(vehicle, &context))
        .collect();

    scored.sort_by(|(a_score, a), (b_score, b)| {
        b_score
            .total_cmp(a_score)
            .then_with(|| a.vehicle.price.cmp(&b.vehicle.price))
            .then_with(|| a.vehicle.id.cmp(&b.vehicle.id))
    });

    scored
        .into_iter()
        .take(limit)
        .map(|(raw, mut recommendation)| {
            recommendation.score = (raw * 100.0).round() / 100.0;
            recommendation
        })
        .collect()
}

/// Returns the exact score alongside the recommendation
fn score(vehicle: Vehicle, context: &RankingContext<'_>) -> (f64, Recommendation) {
    let params = context.params;
    let mut total = 0.0;
    let mut reasons = Vec::new();

    if params.preferred_fuel_types.contains(&vehicle.fuel_type) {
        total += FUEL_MATCH;
        reasons.push(format!("Preferred fuel type: {}", vehicle.fuel_type));
    }

    if params.preferred_vehicle_types.contains(&vehicle.vehicle_type) {
        total += TYPE_MATCH;
        reasons.push(format!("Preferred vehicle type: {}", vehicle.vehicle_type));
    }

    if params
        .preferred_makes
        .iter()
        .any(|make| make.eq_ignore_ascii_case(&vehicle.make))
    {
        total += MAKE_MATCH;
        reasons.push(format!("Preferred make: {}", vehicle.make));
    }

    for feature in &params.desired_features {
        if has_feature(&vehicle, feature) {
            total += FEATURE_MATCH;
            reasons.push(format!("Has desired feature: {}", feature));
        }
    }

    if let (Some(budget), Some(price)) = (context.budget, vehicle.price.to_f64()) {
        let fit = price_fit(price, budget);
        if fit > 0.0 {
            total += fit;
            if price <= budget {
                reasons.push("Within budget".to_string());
            }
        }
    }

    let age = context.current_year - vehicle.year;
    if (0..RECENCY_WINDOW).contains(&age) {
        total += MAX_RECENCY * f64::from(RECENCY_WINDOW - age) / f64::from(RECENCY_WINDOW);
        if age <= 2 {
            reasons.push("Recent model year".to_string());
        }
    }

    let recommendation = Recommendation {
        vehicle,
        score: total,
        reasons,
    };
    (total, recommendation)
}

/// 1..=2 inside the budget (using more of it scores higher),
/// falling from 1 to 0 as the price climbs to twice the budget
fn price_fit(price: f64, budget: f64) -> f64 {
    if budget <= 0.0 {
        return 0.0;
    }
    if price <= budget {
        (1.0 + price / budget).min(MAX_PRICE_FIT)
    } else {
        (1.0 - (price - budget) / budget).max(0.0)
    }
}

fn has_feature(vehicle: &Vehicle, feature: &str) -> bool {
    let feature = feature.trim();
    if feature.is_empty() {
        return false;
    }
    if feature.eq_ignore_ascii_case("low mileage") {
        return vehicle.mileage < LOW_MILEAGE_LIMIT;
    }
    vehicle
        .description
        .as_deref()
        .map(|description| description.to_lowercase().contains(&feature.to_lowercase()))
        .unwrap_or(false)
}
