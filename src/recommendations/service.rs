use chrono::{Datelike, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::recommendations::ranking::{rank, Recommendation, RankingContext};
use crate::recommendations::{
    OpenRouterClient, ParameterValidator, RecommendationParameters, RecommendationRequest,
    ServiceError,
};
use crate::vehicles::VehicleRepository;

/// Upper bound on vehicles pulled from the database for one ranking pass
pub const CANDIDATE_POOL_SIZE: u32 = 100;
pub const DEFAULT_RECOMMENDATION_LIMIT: u32 = 10;

/// Response body for POST /api/recommendations
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    /// The filters actually applied after merging and budget capping
    pub parameters: RecommendationParameters,
    /// Whether the LLM answered the extraction call
    pub used_llm: bool,
    pub recommendations: Vec<Recommendation>,
}

/// Service layer for the recommendation flow
pub struct RecommendationService {
    repository: VehicleRepository,
    llm: Option<OpenRouterClient>,
}

impl RecommendationService {
    pub fn new(repository: VehicleRepository, llm: Option<OpenRouterClient>) -> Self {
        Self { repository, llm }
    }

    /// Turns a free-text query into parameters via the LLM
    ///
    /// Never fails: a missing client or any LLM error yields empty
    /// parameters. The `bool` reports whether the LLM answered.
    pub async fn extract_parameters(&self, query: &str) -> (RecommendationParameters, bool) {
        let Some(client) = &self.llm else {
            tracing::debug!("LLM not configured, skipping parameter extraction");
            return (RecommendationParameters::default(), false);
        };

        match client.extract_parameters(query).await {
            Ok(params) => {
                tracing::debug!("Extracted parameters: {:?}", params);
                (params, true)
            }
            Err(e) => {
                tracing::warn!("Parameter extraction failed, using defaults: {}", e);
                (RecommendationParameters::default(), false)
            }
        }
    }

    /// Produce ranked suggestions for a buyer
    ///
    /// This method:
    /// 1. Validates the caller's own filters (rejecting bad ones)
    /// 2. Extracts filters from the free-text query when an LLM is configured
    /// 3. Merges them, caller filters winning, and caps price at the budget
    /// 4. Fetches candidates and ranks them locally
    ///
    /// The request DTO must already have passed `validator` checks.
    pub async fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> Result<RecommendationResponse, ServiceError> {
        // 1. Caller filters are untrusted input
        let caller = ParameterValidator::validate(&request.parameters.unwrap_or_default())?;

        // 2. LLM filters are already sanitized
        let (extracted, used_llm) = self.extract_parameters(request.query.trim()).await;

        // 3. Merge and cap; re-validate since the merge combines two sources
        let merged = caller.merged_over(extracted).with_budget(request.budget);
        let parameters = ParameterValidator::validate(&merged)?;

        // 4. Fetch and rank
        let candidates = self
            .repository
            .find_candidates(&parameters, request.budget, CANDIDATE_POOL_SIZE)
            .await?;
        tracing::debug!("Ranking {} candidate vehicles", candidates.len());

        let limit = request.limit.unwrap_or(DEFAULT_RECOMMENDATION_LIMIT) as usize;
        let recommendations = rank(
            candidates,
            RankingContext {
                params: &parameters,
                budget: request.budget,
                current_year: Utc::now().year(),
            },
            limit,
        );

        Ok(RecommendationResponse {
            parameters,
            used_llm,
            recommendations,
        })
    }
}
