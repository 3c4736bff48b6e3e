//! Gap analysis result types
//!
//! The result is received whole from the plan service and never mutated
//! locally; the severity filter only selects which gaps are shown.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::onboarding::UnknownLiteral;

/// Gap severity, ordered `Low < Medium < High < Critical`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GapSeverity {
    /// Display order, most severe first
    pub const ALL: [Self; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for GapSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GapSeverity {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s.to_lowercase())
            .ok_or_else(|| UnknownLiteral {
                kind: "severity",
                value: s.to_string(),
            })
    }
}

/// A single deficiency in a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    pub id: String,
    pub section: String,
    pub severity: GapSeverity,
    pub description: String,
    pub recommendation: String,
    #[serde(default)]
    pub framework_references: Vec<String>,
    pub estimated_effort: String,
}

/// Complete gap analysis for one plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapAnalysisResult {
    pub company_name: String,
    pub analysis_timestamp: String,
    pub overall_score: u8,
    #[serde(default)]
    pub gaps: Vec<Gap>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub priority_actions: Vec<String>,
    #[serde(default)]
    pub framework_compliance: BTreeMap<String, u8>,
    /// Revised plan with the gaps addressed, when the service provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_plan: Option<String>,
}

impl GapAnalysisResult {
    /// Number of gaps at the given severity
    pub fn count_by_severity(&self, severity: GapSeverity) -> usize {
        self.gaps.iter().filter(|g| g.severity == severity).count()
    }

    /// Date portion of the analysis timestamp for display
    ///
    /// Falls back to the raw string when it is not RFC 3339.
    pub fn analysis_date(&self) -> String {
        debug!(timestamp = %self.analysis_timestamp, "GapAnalysisResult::analysis_date: called");
        match chrono::DateTime::parse_from_rfc3339(&self.analysis_timestamp) {
            Ok(dt) => dt.format("%Y-%m-%d").to_string(),
            Err(_) => match chrono::NaiveDateTime::parse_from_str(&self.analysis_timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
                Ok(dt) => dt.format("%Y-%m-%d").to_string(),
                Err(_) => self.analysis_timestamp.clone(),
            },
        }
    }
}

/// Severity filter for the gap list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeverityFilter {
    #[default]
    All,
    Only(GapSeverity),
}

impl SeverityFilter {
    /// Filter buttons in display order
    pub const ALL: [Self; 5] = [
        Self::All,
        Self::Only(GapSeverity::Critical),
        Self::Only(GapSeverity::High),
        Self::Only(GapSeverity::Medium),
        Self::Only(GapSeverity::Low),
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(severity) => severity.label(),
        }
    }

    pub fn matches(self, gap: &Gap) -> bool {
        match self {
            Self::All => true,
            Self::Only(severity) => gap.severity == severity,
        }
    }

    /// Gaps visible under this filter, in their original order
    pub fn apply(self, gaps: &[Gap]) -> Vec<&Gap> {
        debug!(?self, total = gaps.len(), "SeverityFilter::apply: called");
        gaps.iter().filter(|g| self.matches(g)).collect()
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    /// Next filter button (wraps)
    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Previous filter button (wraps)
    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl FromStr for SeverityFilter {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<GapSeverity>().map(Self::Only)
    }
}

/// Qualitative band for a 0-100 compliance score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsImprovement,
    CriticalGaps,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::NeedsImprovement,
            _ => Self::CriticalGaps,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::NeedsImprovement => "Needs Improvement",
            Self::CriticalGaps => "Critical Gaps",
        }
    }
}
