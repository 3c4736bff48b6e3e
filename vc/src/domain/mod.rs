//! Domain types for vciso
//!
//! Onboarding answers (draft form and validated document), the generated
//! plan, and the gap analysis result.

mod gap;
mod onboarding;
mod plan;

pub use gap::{Gap, GapAnalysisResult, GapSeverity, ScoreBand, SeverityFilter};
pub use onboarding::{
    COMMUNICATION_TOOLS, CONCERN_OPTIONS, CRM_TOOLS, EMAIL_TOOLS, EmployeeCount, Industry, LeadForm, OnboardingData,
    OnboardingForm, SECURITY_OPTIONS, STORAGE_TOOLS, SecurityLead, SecurityLeadKind, ToolCategory, ToolSelections,
    UnknownLiteral, toggle_label,
};
pub use plan::{Plan, PlanMetadata};
