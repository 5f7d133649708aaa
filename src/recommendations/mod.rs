// Recommendation module
// Parameter validation, LLM-backed extraction, and local ranking of vehicles

pub mod client;
pub mod error;
pub mod extraction;
pub mod handlers;
pub mod parameters;
pub mod ranking;
pub mod service;
pub mod validator;

pub use client::OpenRouterClient;
pub use error::{InvalidFilterValue, LlmError, ServiceError};
pub use handlers::{extract_parameters_handler, recommend_handler, validate_parameters_handler};
pub use parameters::{ExtractionRequest, RecommendationParameters, RecommendationRequest};
pub use ranking::Recommendation;
pub use service::{RecommendationResponse, RecommendationService};
pub use validator::{ParameterValidator, ValidationOutcome};
