use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::error::ApiError;
use crate::recommendations::{InvalidFilterValue, ParameterValidator, RecommendationParameters};
use crate::validation::split_list;
use crate::vehicles::VehicleQueryParams;

const SELECT_VEHICLES: &str = "SELECT id, make, model, year, price, mileage, fuel_type, \
     vehicle_type, description, created_at FROM vehicles";

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A bind parameter with the SQL type it must be sent as
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    TextList(Vec<String>),
    Decimal(Decimal),
    Int(i32),
}

/// SQL query builder for vehicle searches
/// Builds a single parameterized SELECT with filters, sorting, and pagination
#[derive(Debug)]
pub struct VehicleQueryBuilder {
    where_clauses: Vec<String>,
    params: Vec<SqlParam>,
    order_clause: String,
    /// When set, rows are ordered by distance from this price
    price_target: Option<Decimal>,
    limit: u32,
    offset: u32,
}

impl Default for VehicleQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VehicleQueryBuilder {
    pub fn new() -> Self {
        Self {
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_clause: "id ASC".to_string(),
            price_target: None,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }

    fn push(&mut self, clause: impl FnOnce(usize) -> String, param: SqlParam) {
        let param_index = self.params.len() + 1;
        self.where_clauses.push(clause(param_index));
        self.params.push(param);
    }

    /// Restricts results to the given fuel types (exact match)
    pub fn add_fuel_types(&mut self, fuel_types: &[String]) {
        if !fuel_types.is_empty() {
            self.push(
                |i| format!("fuel_type = ANY(${})", i),
                SqlParam::TextList(fuel_types.to_vec()),
            );
        }
    }

    /// Restricts results to the given body types (exact match)
    pub fn add_vehicle_types(&mut self, vehicle_types: &[String]) {
        if !vehicle_types.is_empty() {
            self.push(
                |i| format!("vehicle_type = ANY(${})", i),
                SqlParam::TextList(vehicle_types.to_vec()),
            );
        }
    }

    /// Restricts results to the given makes (case-insensitive)
    pub fn add_makes(&mut self, makes: &[String]) {
        if !makes.is_empty() {
            let lowered = makes.iter().map(|make| make.to_lowercase()).collect();
            self.push(
                |i| format!("LOWER(make) = ANY(${})", i),
                SqlParam::TextList(lowered),
            );
        }
    }

    /// Excludes the given makes (case-insensitive)
    pub fn exclude_makes(&mut self, makes: &[String]) {
        if !makes.is_empty() {
            let lowered = makes.iter().map(|make| make.to_lowercase()).collect();
            self.push(
                |i| format!("NOT (LOWER(make) = ANY(${}))", i),
                SqlParam::TextList(lowered),
            );
        }
    }

    /// Excludes the given fuel types (exact match)
    pub fn exclude_fuel_types(&mut self, fuel_types: &[String]) {
        if !fuel_types.is_empty() {
            self.push(
                |i| format!("NOT (fuel_type = ANY(${}))", i),
                SqlParam::TextList(fuel_types.to_vec()),
            );
        }
    }

    /// Adds price range filters; both bounds are inclusive
    ///
    /// A bound too large for a decimal is an error rather than a dropped filter.
    pub fn add_price_range(
        &mut self,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<(), InvalidFilterValue> {
        if let Some(min_price) = min {
            let min_price = price_to_decimal(min_price, "minPrice")?;
            self.push(|i| format!("price >= ${}", i), SqlParam::Decimal(min_price));
        }
        if let Some(max_price) = max {
            let max_price = price_to_decimal(max_price, "maxPrice")?;
            self.push(|i| format!("price <= ${}", i), SqlParam::Decimal(max_price));
        }
        Ok(())
    }

    /// Adds an inclusive upper bound on mileage
    pub fn add_max_mileage(&mut self, max: Option<i32>) {
        if let Some(max_mileage) = max {
            self.push(|i| format!("mileage <= ${}", i), SqlParam::Int(max_mileage));
        }
    }

    /// Adds model year filters; both bounds are inclusive
    pub fn add_year_range(&mut self, min: Option<i32>, max: Option<i32>) {
        if let Some(min_year) = min {
            self.push(|i| format!("year >= ${}", i), SqlParam::Int(min_year));
        }
        if let Some(max_year) = max {
            self.push(|i| format!("year <= ${}", i), SqlParam::Int(max_year));
        }
    }

    /// Applies every filter carried by validated recommendation parameters
    pub fn apply_parameters(
        &mut self,
        params: &RecommendationParameters,
    ) -> Result<(), InvalidFilterValue> {
        self.add_fuel_types(&params.preferred_fuel_types);
        self.add_vehicle_types(&params.preferred_vehicle_types);
        self.add_makes(&params.preferred_makes);
        self.exclude_makes(&params.negated_makes);
        self.exclude_fuel_types(&params.negated_fuel_types);
        self.add_price_range(params.min_price, params.max_price)?;
        self.add_year_range(params.min_year, params.max_year);
        self.add_max_mileage(params.max_mileage);
        Ok(())
    }

    /// Sets the sort order; ties are always broken by id
    pub fn set_sort(&mut self, field: SortField, order: SortOrder) {
        let field_name = match field {
            SortField::Price => "price",
            SortField::Year => "year",
        };
        let order_str = match order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        self.order_clause = format!("{} {}, id ASC", field_name, order_str);
        self.price_target = None;
    }

    /// Orders by distance from `target`, nearest first, then price and id
    pub fn set_closest_to_price(&mut self, target: f64) -> Result<(), InvalidFilterValue> {
        self.price_target = Some(price_to_decimal(target, "budget")?);
        Ok(())
    }

    /// Sets LIMIT and OFFSET from a 1-indexed page number
    pub fn set_pagination(&mut self, page: u32, limit: u32) {
        self.limit = limit;
        self.offset = page.saturating_sub(1).saturating_mul(limit);
    }

    /// Returns the query string and its bind parameters in order
    pub fn build(&self) -> (String, Vec<SqlParam>) {
        let mut query = SELECT_VEHICLES.to_string();

        if !self.where_clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&self.where_clauses.join(" AND "));
        }

        let mut params = self.params.clone();
        query.push_str(" ORDER BY ");
        match self.price_target {
            Some(target) => {
                params.push(SqlParam::Decimal(target));
                query.push_str(&format!(
                    "ABS(price - ${}) ASC, price ASC, id ASC",
                    params.len()
                ));
            }
            None => query.push_str(&self.order_clause),
        }

        // Postgres wants integers here, so they are inlined rather than bound
        query.push_str(&format!(" LIMIT {} OFFSET {}", self.limit, self.offset));

        (query, params)
    }
}

fn price_to_decimal(value: f64, name: &str) -> Result<Decimal, InvalidFilterValue> {
    Decimal::from_f64(value).ok_or_else(|| {
        InvalidFilterValue::new(format!(
            "Invalid {}: {} is outside the supported price range",
            name, value
        ))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Price,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Validated and normalized vehicle listing query
#[derive(Debug)]
pub struct ValidatedVehicleQuery {
    /// Filters, already run through `ParameterValidator`
    pub filters: RecommendationParameters,
    pub sort_field: Option<SortField>,
    pub sort_order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

impl ValidatedVehicleQuery {
    pub fn to_builder(&self) -> Result<VehicleQueryBuilder, InvalidFilterValue> {
        let mut builder = VehicleQueryBuilder::new();
        builder.apply_parameters(&self.filters)?;
        if let Some(field) = self.sort_field {
            builder.set_sort(field, self.sort_order);
        }
        builder.set_pagination(self.page, self.limit);
        Ok(builder)
    }
}

/// Validator for GET /api/vehicles query strings
pub struct VehicleQueryValidator;

impl VehicleQueryValidator {
    /// Filter values go through the same checks as recommendation
    /// parameters; sorting and paging are checked here.
    pub fn validate(params: VehicleQueryParams) -> Result<ValidatedVehicleQuery, ApiError> {
        let filters = RecommendationParameters {
            preferred_fuel_types: split_list(params.fuel_types.as_deref()),
            preferred_vehicle_types: split_list(params.vehicle_types.as_deref()),
            preferred_makes: split_list(params.makes.as_deref()),
            min_price: params.min_price,
            max_price: params.max_price,
            min_year: params.min_year,
            max_year: params.max_year,
            desired_features: Vec::new(),
            max_mileage: params.max_mileage,
            negated_makes: Vec::new(),
            negated_fuel_types: Vec::new(),
        };

        for (name, value) in [("minPrice", filters.min_price), ("maxPrice", filters.max_price)] {
            if let Some(price) = value {
                Self::validate_price(price, name)?;
            }
        }

        let filters = ParameterValidator::validate(&filters)?;

        let sort_field = params
            .sort
            .as_deref()
            .map(Self::parse_sort_field)
            .transpose()?;

        let sort_order = match params.order.as_deref() {
            Some(order) => Self::parse_sort_order(order)?,
            None => match sort_field {
                Some(SortField::Year) => SortOrder::Desc,
                _ => SortOrder::Asc,
            },
        };

        let page = params.page.unwrap_or(1);
        if page == 0 {
            return Err(ApiError::BadRequest(
                "page must be a positive number (greater than 0)".to_string(),
            ));
        }

        let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(ApiError::BadRequest(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        Ok(ValidatedVehicleQuery {
            filters,
            sort_field,
            sort_order,
            page,
            limit,
        })
    }

    fn validate_price(price: f64, param_name: &str) -> Result<(), ApiError> {
        if !price.is_finite() || price < 0.0 {
            return Err(ApiError::BadRequest(format!(
                "{} must be a non-negative number",
                param_name
            )));
        }
        if Decimal::from_f64(price).is_none() {
            return Err(ApiError::BadRequest(format!(
                "{} is outside the supported price range",
                param_name
            )));
        }
        Ok(())
    }

    fn parse_sort_field(s: &str) -> Result<SortField, ApiError> {
        match s.to_lowercase().as_str() {
            "price" => Ok(SortField::Price),
            "year" => Ok(SortField::Year),
            _ => Err(ApiError::BadRequest(format!(
                "Invalid sort field '{}'. Must be 'price' or 'year'",
                s
            ))),
        }
    }

    fn parse_sort_order(s: &str) -> Result<SortOrder, ApiError> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ApiError::BadRequest(format!(
                "Invalid sort order '{}'. Must be 'asc' or 'desc'",
                s
            ))),
        }
    }
}
