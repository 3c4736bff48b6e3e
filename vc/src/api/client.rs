//! PlanService trait definition

use async_trait::async_trait;

use super::{ApiError, GapAnalysisResponse, HealthStatus, PlanResponse};
use crate::domain::OnboardingData;

/// Remote plan service
///
/// Every call is an independent request/response pair; the client keeps no
/// session state and does not retry.
#[async_trait]
pub trait PlanService: Send + Sync {
    /// Generate an incident response plan from validated onboarding answers
    async fn generate_plan(&self, data: &OnboardingData) -> Result<PlanResponse, ApiError>;

    /// Score a plan against compliance frameworks
    async fn analyze_gaps(&self, plan_markdown: &str, company_name: &str) -> Result<GapAnalysisResponse, ApiError>;

    /// Service liveness
    async fn health(&self) -> Result<HealthStatus, ApiError>;
}
