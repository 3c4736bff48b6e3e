//! Plan service client over HTTP
//!
//! Implements the PlanService trait with reqwest. JSON in, JSON out; error
//! bodies are mined for a `detail` (FastAPI style) or `message` field.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::{
    ApiError, GapAnalysisRequest, GapAnalysisResponse, HealthStatus, Operation, PlanResponse, PlanService,
};
use crate::config::ApiConfig;
use crate::domain::OnboardingData;

pub const GENERATE_PATH: &str = "/api/v1/plans/generate";
pub const ANALYZE_PATH: &str = "/api/v1/gap-analysis/analyze";
pub const HEALTH_PATH: &str = "/health";

/// reqwest-backed plan service client
pub struct HttpPlanService {
    base_url: String,
    http: Client,
}

impl HttpPlanService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(%base_url, ?timeout, "HttpPlanService::new: called");

        let http = Client::builder().timeout(timeout).build().map_err(ApiError::Client)?;

        Ok(Self { base_url, http })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        debug!(?config, "HttpPlanService::from_config: called");
        Self::new(config.base_url.clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, R>(&self, operation: Operation, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, ?operation, "HttpPlanService::post_json: called");

        let response = self
            .http
            .post(url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|source| {
                warn!(error = %source, ?operation, "post_json: network error");
                ApiError::Network { operation, source }
            })?;

        decode(operation, response).await
    }
}

/// Pull a human-readable message out of an error body
///
/// Accepts `{"detail": "..."}`, a validation list `{"detail": [{"msg": ...}]}`
/// (messages joined with "; "), or `{"message": "..."}`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    let detail = match value.get("detail") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        _ => None,
    };

    detail.or_else(|| {
        value
            .get("message")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    })
}

async fn decode<R: DeserializeOwned>(operation: Operation, response: Response) -> Result<R, ApiError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|source| ApiError::Network { operation, source })?;

    if !status.is_success() {
        let message = extract_detail(&text).unwrap_or_else(|| operation.fallback().to_string());
        debug!(status = status.as_u16(), %message, "decode: API error");
        return Err(ApiError::Server {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&text).map_err(|e| {
        warn!(error = %e, ?operation, "decode: undecodable body");
        ApiError::InvalidResponse {
            operation,
            detail: e.to_string(),
        }
    })
}

#[async_trait]
impl PlanService for HttpPlanService {
    async fn generate_plan(&self, data: &OnboardingData) -> Result<PlanResponse, ApiError> {
        debug!(company = %data.company_name(), "HttpPlanService::generate_plan: called");
        let resp: PlanResponse = self.post_json(Operation::GeneratePlan, GENERATE_PATH, data).await?;

        if !resp.success {
            debug!("generate_plan: service reported failure");
            return Err(ApiError::Unsuccessful {
                operation: Operation::GeneratePlan,
            });
        }
        Ok(resp)
    }

    async fn analyze_gaps(&self, plan_markdown: &str, company_name: &str) -> Result<GapAnalysisResponse, ApiError> {
        debug!(%company_name, plan_len = plan_markdown.len(), "HttpPlanService::analyze_gaps: called");
        let request = GapAnalysisRequest {
            plan_markdown: plan_markdown.to_string(),
            company_name: company_name.to_string(),
        };
        let resp: GapAnalysisResponse = self.post_json(Operation::AnalyzeGaps, ANALYZE_PATH, &request).await?;

        match (resp.success, resp.gap_analysis.is_some()) {
            (true, true) => Ok(resp),
            (true, false) => Err(ApiError::InvalidResponse {
                operation: Operation::AnalyzeGaps,
                detail: "missing gap_analysis".to_string(),
            }),
            (false, _) => Err(ApiError::Unsuccessful {
                operation: Operation::AnalyzeGaps,
            }),
        }
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = self.url(HEALTH_PATH);
        debug!(%url, "HttpPlanService::health: called");
        let operation = Operation::Health;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Network { operation, source })?;

        decode(operation, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OnboardingForm;
    use crate::validation::validate_document;

    fn document() -> OnboardingData {
        let form: OnboardingForm = serde_yaml::from_str(
            r#"
companyName: Acme Corp
employeeCount: 51-200
industry: finance
mainConcerns: [Ransomware]
securityLead:
  type: dedicated
  name: Jane Smith
"#,
        )
        .unwrap();
        validate_document(&form).unwrap()
    }

    fn service(server: &mockito::ServerGuard) -> HttpPlanService {
        HttpPlanService::new(server.url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_extract_detail_shapes() {
        assert_eq!(extract_detail(r#"{"detail": "Invalid industry"}"#).as_deref(), Some("Invalid industry"));
        assert_eq!(
            extract_detail(r#"{"detail": [{"loc": ["body"], "msg": "field required"}, {"msg": "bad value"}]}"#)
                .as_deref(),
            Some("field required; bad value")
        );
        assert_eq!(extract_detail(r#"{"message": "nope"}"#).as_deref(), Some("nope"));
        assert_eq!(extract_detail(r#"{"detail": ""}"#), None);
        assert_eq!(extract_detail("<html>502</html>"), None);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let svc = HttpPlanService::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(svc.base_url(), "http://localhost:8000");
        assert_eq!(svc.url(GENERATE_PATH), "http://localhost:8000/api/v1/plans/generate");
    }

    #[tokio::test]
    async fn test_generate_plan_posts_camel_case_document() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GENERATE_PATH)
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "companyName": "Acme Corp",
                "employeeCount": "51-200",
                "industry": "finance",
                "securityLead": {"type": "dedicated", "name": "Jane Smith"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r##"{"success": true, "plan": "# Plan", "metadata": {"company": "Acme Corp"}}"##)
            .create_async()
            .await;

        let resp = service(&server).generate_plan(&document()).await.unwrap();
        assert_eq!(resp.plan, "# Plan");
        assert_eq!(resp.metadata.company, "Acme Corp");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_plan_server_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GENERATE_PATH)
            .with_status(400)
            .with_body(r#"{"detail": "Invalid industry"}"#)
            .create_async()
            .await;

        let err = service(&server).generate_plan(&document()).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "Invalid industry");
    }

    #[tokio::test]
    async fn test_generate_plan_fallback_without_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GENERATE_PATH)
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let err = service(&server).generate_plan(&document()).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate plan. Please try again.");
    }

    #[tokio::test]
    async fn test_generate_plan_unsuccessful_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GENERATE_PATH)
            .with_status(200)
            .with_body(r#"{"success": false}"#)
            .create_async()
            .await;

        let err = service(&server).generate_plan(&document()).await.unwrap_err();
        assert!(matches!(err, ApiError::Unsuccessful { .. }));
        assert_eq!(err.to_string(), "Failed to generate plan. Please try again.");
    }

    #[tokio::test]
    async fn test_network_failure_uses_fallback() {
        // Nothing listens on port 9 locally
        let svc = HttpPlanService::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = svc.analyze_gaps("# Plan", "Acme").await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(err.to_string(), "Failed to analyze plan. Please try again.");
    }

    #[tokio::test]
    async fn test_analyze_gaps_round_trip() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", ANALYZE_PATH)
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "plan_markdown": "# Plan",
                "company_name": "Acme"
            })))
            .with_status(200)
            .with_body(
                r#"{"success": true, "gap_analysis": {
                    "company_name": "Acme",
                    "analysis_timestamp": "2024-05-01T10:00:00",
                    "overall_score": 72,
                    "gaps": [{"id": "GAP-001", "section": "Detection", "severity": "high",
                              "description": "No SIEM", "recommendation": "Deploy one",
                              "framework_references": ["NIST CSF DE.CM-1"], "estimated_effort": "Medium"}],
                    "strengths": ["Clear roles"],
                    "priority_actions": ["Deploy SIEM"],
                    "framework_compliance": {"NIST CSF": 70, "SOC 2": 65}
                }}"#,
            )
            .create_async()
            .await;

        let resp = service(&server).analyze_gaps("# Plan", "Acme").await.unwrap();
        let analysis = resp.gap_analysis.unwrap();
        assert_eq!(analysis.overall_score, 72);
        assert_eq!(analysis.gaps.len(), 1);
        assert_eq!(analysis.framework_compliance["SOC 2"], 65);
        assert!(analysis.enhanced_plan.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_analyze_gaps_validation_list() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", ANALYZE_PATH)
            .with_status(422)
            .with_body(r#"{"detail": [{"loc": ["body", "plan_markdown"], "msg": "field required", "type": "missing"}]}"#)
            .create_async()
            .await;

        let err = service(&server).analyze_gaps("", "Acme").await.unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.to_string(), "field required");
    }

    #[tokio::test]
    async fn test_analyze_gaps_success_without_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", ANALYZE_PATH)
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await;

        let err = service(&server).analyze_gaps("# Plan", "Acme").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GENERATE_PATH)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = service(&server).generate_plan(&document()).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_health() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", HEALTH_PATH)
            .with_status(200)
            .with_body(r#"{"status": "healthy"}"#)
            .create_async()
            .await;

        let status = service(&server).health().await.unwrap();
        assert!(status.is_healthy());
    }
}
