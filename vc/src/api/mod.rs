//! Remote plan service client
//!
//! Plan generation, gap analysis and a health probe behind the
//! [`PlanService`] trait, with a reqwest implementation.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod http;
mod types;

pub use client::PlanService;
pub use error::{ApiError, Operation};
pub use http::{ANALYZE_PATH, GENERATE_PATH, HEALTH_PATH, HttpPlanService, extract_detail};
pub use types::{GapAnalysisRequest, GapAnalysisResponse, HealthStatus, PlanResponse};

use crate::config::ApiConfig;

/// Create the plan service client for the configured base URL
pub fn create_service(config: &ApiConfig) -> Result<Arc<dyn PlanService>, ApiError> {
    debug!(base_url = %config.base_url, "create_service: called");
    Ok(Arc::new(HttpPlanService::from_config(config)?))
}
