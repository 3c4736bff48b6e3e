//! Integration tests for vciso
//!
//! Drive the questionnaire, the HTTP plan service client and the
//! presentation layer together against a mock plan service.

use std::time::Duration;

use mockito::Matcher;
use serde_json::json;
use tempfile::TempDir;

use vciso::api::{ANALYZE_PATH, GENERATE_PATH, HttpPlanService};
use vciso::clipboard::{ClipboardError, ClipboardSink};
use vciso::domain::{GapSeverity, SeverityFilter};
use vciso::export::PageGeometry;
use vciso::present::{GapPresentation, PlanPresentation};
use vciso::validation::{CONCERNS_MESSAGE, FieldPath, Step};
use vciso::wizard::{Wizard, WizardError};

const PLAN_MD: &str = "# Incident Response Plan\n\n## 1. Contacts\n\n| Role | Name |\n|---|---|\n| Lead | CEO |\n";

#[derive(Default)]
struct RecordingClipboard {
    contents: Option<String>,
}

impl ClipboardSink for RecordingClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

fn service(server: &mockito::ServerGuard) -> HttpPlanService {
    HttpPlanService::new(server.url(), Duration::from_secs(5)).expect("client")
}

fn fill_through_concerns(wizard: &mut Wizard) {
    wizard.set_text(FieldPath::CompanyName, "Ac");
    wizard.select(FieldPath::EmployeeCount, "51-200");
    assert_eq!(wizard.advance().unwrap(), Step::Industry);
    wizard.select(FieldPath::Industry, "finance");
    assert_eq!(wizard.advance().unwrap(), Step::Tools);
    wizard.toggle(FieldPath::Tools(vciso::domain::ToolCategory::Email), "Gmail");
    assert_eq!(wizard.advance().unwrap(), Step::CurrentSecurity);
    assert_eq!(wizard.advance().unwrap(), Step::Concerns);
}

fn analysis_body() -> serde_json::Value {
    json!({
        "success": true,
        "gap_analysis": {
            "company_name": "Ac",
            "analysis_timestamp": "2024-05-01T10:00:00Z",
            "overall_score": 62,
            "gaps": [
                {
                    "id": "GAP-001",
                    "section": "Detection",
                    "severity": "critical",
                    "description": "No monitoring",
                    "recommendation": "Deploy EDR",
                    "framework_references": ["NIST CSF DE.CM-1"],
                    "estimated_effort": "High"
                },
                {
                    "id": "GAP-002",
                    "section": "Recovery",
                    "severity": "medium",
                    "description": "Backups untested",
                    "recommendation": "Test quarterly",
                    "framework_references": [],
                    "estimated_effort": "Low"
                }
            ],
            "strengths": ["Clear roles"],
            "priority_actions": ["Deploy EDR"],
            "framework_compliance": {"NIST CSF": 60, "HIPAA": 40}
        }
    })
}

// =============================================================================
// Questionnaire to plan
// =============================================================================

#[tokio::test]
async fn test_questionnaire_to_plan_to_gap_report() {
    let mut server = mockito::Server::new_async().await;
    let generate = server
        .mock("POST", GENERATE_PATH)
        .match_body(Matcher::PartialJson(json!({
            "companyName": "Ac",
            "employeeCount": "51-200",
            "industry": "finance",
            "tools": {"email": ["Gmail"], "storage": [], "communication": [], "crm": []},
            "mainConcerns": ["Phishing attacks"],
            "securityLead": {"type": "none"}
        })))
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "success": true,
                "plan": PLAN_MD,
                "metadata": {"company": "Ac", "industry": "finance", "employee_count": "51-200", "generated_at": "2024-05-01T10:00:00"}
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let analyze = server
        .mock("POST", ANALYZE_PATH)
        .match_body(Matcher::Json(json!({"plan_markdown": PLAN_MD, "company_name": "Ac"})))
        .with_header("content-type", "application/json")
        .with_body(analysis_body().to_string())
        .expect(1)
        .create_async()
        .await;
    let service = service(&server);

    let mut wizard = Wizard::new();
    fill_through_concerns(&mut wizard);

    // Empty concerns block step 5
    match wizard.advance() {
        Err(WizardError::Validation(err)) => assert_eq!(err.message(), CONCERNS_MESSAGE),
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert_eq!(wizard.step(), Step::Concerns);

    wizard.toggle(FieldPath::MainConcerns, "Phishing attacks");
    assert_eq!(wizard.advance().unwrap(), Step::SecurityLead);
    wizard.select(FieldPath::SecurityLeadType, "none");

    let plan = wizard.submit(&service).await.expect("plan");
    generate.assert_async().await;
    assert_eq!(plan.markdown(), PLAN_MD);
    assert_eq!(plan.metadata().employee_count, "51-200");

    // Plan view: verbatim copy and a non-empty PDF
    let mut presentation = PlanPresentation::new(plan);
    let mut clipboard = RecordingClipboard::default();
    presentation.copy_to(&mut clipboard).unwrap();
    assert_eq!(clipboard.contents.as_deref(), Some(PLAN_MD));

    let dir = TempDir::new().expect("Failed to create temp dir");
    let pdf = presentation.export_pdf(PageGeometry::default(), dir.path()).unwrap();
    let bytes = std::fs::read(&pdf).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));

    // Gap analysis and the client-side filter
    let analysis = presentation.analyze(&service).await.expect("analysis");
    analyze.assert_async().await;
    let mut report = GapPresentation::new(analysis);
    assert_eq!(report.heading(), "Identified Gaps (2)");
    report.set_filter(SeverityFilter::Only(GapSeverity::Critical));
    assert_eq!(report.heading(), "Identified Gaps (1)");

    let json_path = report.export_report(dir.path()).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(saved["gaps"].as_array().unwrap().len(), 2);
    assert_eq!(saved["framework_compliance"]["HIPAA"], 40);
}

#[tokio::test]
async fn test_server_error_keeps_answers_for_resubmission() {
    let mut server = mockito::Server::new_async().await;
    let failing = server
        .mock("POST", GENERATE_PATH)
        .with_status(503)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "Plan generator is warming up"}"#)
        .expect(1)
        .create_async()
        .await;
    let service = service(&server);

    let mut wizard = Wizard::new();
    fill_through_concerns(&mut wizard);
    wizard.toggle(FieldPath::MainConcerns, "Ransomware");
    wizard.advance().unwrap();
    wizard.select(FieldPath::SecurityLeadType, "dedicated");
    wizard.set_text(FieldPath::SecurityLeadName, "Jane Smith");

    let err = wizard.submit(&service).await.unwrap_err();
    failing.assert_async().await;
    assert_eq!(err.to_string(), "Plan generator is warming up");
    assert_eq!(wizard.banner(), Some("Plan generator is warming up"));
    assert!(!wizard.is_submitting());
    assert_eq!(wizard.form().security_lead.name, "Jane Smith");

    // Manual resubmission goes through once the service recovers
    failing.remove_async().await;
    let ok = server
        .mock("POST", GENERATE_PATH)
        .match_body(Matcher::PartialJson(json!({
            "securityLead": {"type": "dedicated", "name": "Jane Smith"}
        })))
        .with_header("content-type", "application/json")
        .with_body(json!({"success": true, "plan": "# Plan"}).to_string())
        .create_async()
        .await;

    let plan = wizard.submit(&service).await.expect("plan");
    ok.assert_async().await;
    assert_eq!(plan.markdown(), "# Plan");
    assert!(wizard.banner().is_none());
}

#[tokio::test]
async fn test_analysis_failure_stays_on_plan() {
    let mut server = mockito::Server::new_async().await;
    let _analyze = server
        .mock("POST", ANALYZE_PATH)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": false}"#)
        .create_async()
        .await;
    let service = service(&server);

    let mut presentation = PlanPresentation::new(vciso::Plan::new(
        PLAN_MD,
        vciso::domain::PlanMetadata::default(),
        "Acme",
    ));
    assert!(presentation.analyze(&service).await.is_none());
    assert_eq!(
        presentation.analysis_error(),
        Some("Failed to analyze plan. Please try again.")
    );
    assert!(!presentation.is_analyzing());
}
