// Turning LLM output into trusted recommendation parameters
// Model output is sanitized leniently: unknown values are dropped, not rejected

use serde_json::Value;

use crate::recommendations::{LlmError, RecommendationParameters};
use crate::vehicles::types::{FilterTag, FuelType, VehicleType, KNOWN_MAKES};

/// Words that rule out whatever follows them in the same clause
const NEGATION_CUES: &[&str] = &[
    "no", "not", "without", "don't", "dont", "avoid", "except", "never",
];

/// Builds the system prompt sent ahead of the buyer's query
pub fn build_system_prompt() -> String {
    let makes = KNOWN_MAKES
        .iter()
        .map(|make| format!("\"{}\"", make))
        .collect::<Vec<_>>()
        .join(", ");
    let quoted = |values: String| {
        values
            .split(", ")
            .map(|value| format!("\"{}\"", value))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        r#"You are an assistant for a vehicle marketplace.
Turn the user's description into vehicle search parameters.

Respond with a single JSON object using exactly these property names:
{{
  "minPrice": null,
  "maxPrice": null,
  "minYear": null,
  "maxYear": null,
  "maxMileage": null,
  "preferredMakes": [],
  "preferredFuelTypes": [],
  "preferredVehicleTypes": [],
  "desiredFeatures": [],
  "negatedMakes": [],
  "negatedFuelTypes": []
}}

Field requirements:
- "minPrice" and "maxPrice" are numbers or null.
- "minYear", "maxYear" and "maxMileage" are integers or null.
- The list fields are arrays of strings and may only use the allowed values below.

Context rules:
- "cheap" or "affordable": set "maxPrice" to no more than 15000.
- "expensive": set "minPrice" to at least 30000.
- "new" or "recent": set "minYear" to at least 2020.
- A specific year or range goes into "minYear" and/or "maxYear".
- "low mileage": add "Low Mileage" to "desiredFeatures".
- A mileage limit ("under 60k miles") goes into "maxMileage".
- Makes or fuel types the user rules out ("no Toyota", "not diesel") go into
  "negatedMakes" or "negatedFuelTypes" and never into a preferred list.
- Only list makes the user actually mentions; do not guess.

Allowed values:
- preferredMakes, negatedMakes: [{makes}]
- preferredFuelTypes, negatedFuelTypes: [{fuels}]
- preferredVehicleTypes: [{vehicles}]

Return only the JSON object, with no comments or prose."#,
        makes = makes,
        fuels = quoted(FuelType::valid_values()),
        vehicles = quoted(VehicleType::valid_values()),
    )
}

/// Cuts the outermost JSON object out of free-form model output
///
/// Models often wrap the object in prose or code fences; everything from the
/// first `{` to the last `}` is kept.
pub fn extract_json_object(text: &str) -> Result<&str, LlmError> {
    let start = text.find('{').ok_or(LlmError::MissingJson)?;
    let end = text.rfind('}').ok_or(LlmError::MissingJson)?;
    if end < start {
        return Err(LlmError::MissingJson);
    }
    Ok(text[start..=end].trim())
}

/// Parses model output into sanitized parameters
pub fn parse_model_output(text: &str) -> Result<RecommendationParameters, LlmError> {
    let json = extract_json_object(text)?;
    let value: Value = serde_json::from_str(json)?;
    Ok(sanitize_extracted(&value))
}

/// Leniently converts arbitrary JSON into parameters that always validate
///
/// Unknown tags, blank strings and non-string entries are dropped, non-numeric
/// or negative bounds are treated as absent, and an inverted range is
/// discarded entirely. Older prompt formats used `manufacturers`, `fuelType`,
/// `bodyType` and the `explicitlyNegated*` keys; those are still accepted,
/// with the canonical key winning when both are present.
pub fn sanitize_extracted(value: &Value) -> RecommendationParameters {
    let (min_price, max_price) = ordered(number(value, "minPrice"), number(value, "maxPrice"));
    let (min_year, max_year) = ordered(integer(value, "minYear"), integer(value, "maxYear"));

    RecommendationParameters {
        preferred_fuel_types: known_tags::<FuelType>(value, &["preferredFuelTypes", "fuelType"]),
        preferred_vehicle_types: known_tags::<VehicleType>(
            value,
            &["preferredVehicleTypes", "bodyType"],
        ),
        min_price,
        max_price,
        min_year,
        max_year,
        preferred_makes: known_makes(value, &["preferredMakes", "manufacturers"]),
        desired_features: string_list(value, &["desiredFeatures"]),
        max_mileage: integer(value, "maxMileage").filter(|mileage| *mileage >= 0),
        negated_makes: known_makes(value, &["negatedMakes", "explicitlyNegatedMakes"]),
        negated_fuel_types: known_tags::<FuelType>(
            value,
            &["negatedFuelTypes", "explicitlyNegatedFuelTypes"],
        ),
    }
}

/// Makes and fuel types named in a query, split by whether they were ruled out
#[derive(Debug, Default, PartialEq)]
struct Mentions {
    makes: Vec<String>,
    negated_makes: Vec<String>,
    negated_fuel_types: Vec<String>,
}

/// A negation cue covers the rest of its clause; "but" ends it early
fn scan_mentions(query: &str) -> Mentions {
    let mut mentions = Mentions::default();
    let query = query.replace('\u{2019}', "'");

    for clause in query.split(|c: char| matches!(c, ',' | '.' | ';' | '!' | '?')) {
        let mut negated = false;
        for raw in clause.split_whitespace() {
            let word = raw
                .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase();

            if word == "but" {
                negated = false;
            } else if NEGATION_CUES.contains(&word.as_str()) {
                negated = true;
            } else if let Some(make) = KNOWN_MAKES.iter().find(|m| m.eq_ignore_ascii_case(&word)) {
                let target = if negated {
                    &mut mentions.negated_makes
                } else {
                    &mut mentions.makes
                };
                push_unique(target, make.to_string());
            } else if negated {
                if let Some(fuel) = FuelType::ALL
                    .iter()
                    .find(|fuel| fuel.as_str().eq_ignore_ascii_case(&word))
                {
                    push_unique(&mut mentions.negated_fuel_types, fuel.to_string());
                }
            }
        }
    }
    mentions
}

/// Reconciles extracted parameters with what the query literally says
///
/// Makes and fuel types the query rules out are added to the negated lists
/// and removed from the preferred ones. Once any make is ruled out, preferred
/// makes the query never names are treated as guesses and dropped.
pub fn reconcile_with_query(
    mut params: RecommendationParameters,
    query: &str,
) -> RecommendationParameters {
    let mentions = scan_mentions(query);

    for make in mentions.negated_makes {
        push_unique(&mut params.negated_makes, make);
    }
    for fuel in mentions.negated_fuel_types {
        push_unique(&mut params.negated_fuel_types, fuel);
    }

    if !params.negated_makes.is_empty() {
        let named = &mentions.makes;
        params
            .preferred_makes
            .retain(|make| named.iter().any(|m| m.eq_ignore_ascii_case(make)));
    }

    let negated_makes = &params.negated_makes;
    params
        .preferred_makes
        .retain(|make| !negated_makes.iter().any(|m| m.eq_ignore_ascii_case(make)));

    let negated_fuels = &params.negated_fuel_types;
    params
        .preferred_fuel_types
        .retain(|fuel| !negated_fuels.contains(fuel));

    params
}

/// First array found under any of `keys`, keeping only non-blank strings
fn string_list(value: &Value, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find_map(|key| value.get(key).and_then(Value::as_array))
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn push_unique(items: &mut Vec<String>, item: String) {
    if !items.contains(&item) {
        items.push(item);
    }
}

fn known_tags<T: FilterTag>(value: &Value, keys: &[&str]) -> Vec<String> {
    let mut tags = Vec::new();
    for tag in string_list(value, keys) {
        if let Ok(parsed) = tag.parse::<T>() {
            push_unique(&mut tags, parsed.to_string());
        }
    }
    tags
}

fn known_makes(value: &Value, keys: &[&str]) -> Vec<String> {
    let mut makes = Vec::new();
    for make in string_list(value, keys) {
        if let Some(known) = KNOWN_MAKES.iter().find(|known| known.eq_ignore_ascii_case(&make)) {
            push_unique(&mut makes, known.to_string());
        }
    }
    makes
}

fn number(value: &Value, key: &str) -> Option<f64> {
    value
        .get(key)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite() && *n >= 0.0)
}

fn integer(value: &Value, key: &str) -> Option<i32> {
    let raw = value.get(key)?;
    raw.as_i64()
        .or_else(|| raw.as_f64().filter(|n| n.fract() == 0.0).map(|n| n as i64))
        .and_then(|n| i32::try_from(n).ok())
}

fn ordered<T: PartialOrd + Copy>(min: Option<T>, max: Option<T>) -> (Option<T>, Option<T>) {
    match (min, max) {
        (Some(lo), Some(hi)) if lo > hi => {
            tracing::debug!("Discarding inverted range from model output");
            (None, None)
        }
        bounds => bounds,
    }
}
