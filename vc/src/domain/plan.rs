//! Generated incident response plan

use serde::{Deserialize, Serialize};

/// Metadata the plan service attaches to a generated plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanMetadata {
    pub company: String,
    pub industry: String,
    pub employee_count: String,
    pub generated_at: String,
}

/// A generated plan, immutable once received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    markdown: String,
    metadata: PlanMetadata,
    company_name: String,
}

impl Plan {
    pub fn new(markdown: impl Into<String>, metadata: PlanMetadata, company_name: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            metadata,
            company_name: company_name.into(),
        }
    }

    /// Raw markdown exactly as returned by the service
    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn metadata(&self) -> &PlanMetadata {
        &self.metadata
    }

    /// Company the plan was generated for (sent along with gap analysis requests)
    pub fn company_name(&self) -> &str {
        &self.company_name
    }
}
