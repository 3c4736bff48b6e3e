//! Plan service wire types

use serde::{Deserialize, Serialize};

use crate::domain::{GapAnalysisResult, PlanMetadata};

/// Response to `POST /api/v1/plans/generate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub success: bool,
    #[serde(default)]
    pub plan: String,
    #[serde(default)]
    pub metadata: PlanMetadata,
}

/// Body of `POST /api/v1/gap-analysis/analyze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapAnalysisRequest {
    pub plan_markdown: String,
    pub company_name: String,
}

/// Response to `POST /api/v1/gap-analysis/analyze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapAnalysisResponse {
    pub success: bool,
    #[serde(default)]
    pub gap_analysis: Option<GapAnalysisResult>,
}

/// Response to `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.to_lowercase().as_str(), "healthy" | "ok")
    }
}
