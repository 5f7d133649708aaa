use sqlx::PgPool;

use crate::recommendations::{RecommendationParameters, ServiceError};
use crate::vehicles::query::{SortField, SortOrder, SqlParam, VehicleQueryBuilder};
use crate::vehicles::Vehicle;

/// Read-only database access for the vehicle catalogue
#[derive(Clone)]
pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a vehicle by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Vehicle>, sqlx::Error> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, make, model, year, price, mileage, fuel_type, vehicle_type, description, created_at
            FROM vehicles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Run a query assembled by `VehicleQueryBuilder`
    pub async fn search(&self, builder: &VehicleQueryBuilder) -> Result<Vec<Vehicle>, sqlx::Error> {
        let (query_str, params) = builder.build();
        tracing::debug!("Vehicle search: {} ({} params)", query_str, params.len());

        let mut query = sqlx::query_as::<_, Vehicle>(&query_str);
        for param in params {
            query = match param {
                SqlParam::TextList(values) => query.bind(values),
                SqlParam::Decimal(value) => query.bind(value),
                SqlParam::Int(value) => query.bind(value),
            };
        }

        query.fetch_all(&self.pool).await
    }

    /// Fetch vehicles matching validated recommendation parameters
    ///
    /// With a budget the pool holds the matches priced nearest to it, since
    /// those score highest on price fit; otherwise the cheapest matches.
    pub async fn find_candidates(
        &self,
        params: &RecommendationParameters,
        budget: Option<f64>,
        limit: u32,
    ) -> Result<Vec<Vehicle>, ServiceError> {
        let mut builder = VehicleQueryBuilder::new();
        builder.apply_parameters(params)?;
        match budget {
            Some(budget) => builder.set_closest_to_price(budget)?,
            None => builder.set_sort(SortField::Price, SortOrder::Asc),
        }
        builder.set_pagination(1, limit);

        Ok(self.search(&builder).await?)
    }
}
