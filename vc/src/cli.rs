//! CLI command definitions and batch output formatting

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use tracing::debug;

use crate::config::API_URL_ENV;
use crate::domain::{GapSeverity, ScoreBand, SeverityFilter};
use crate::present::{GapPresentation, NO_GAPS_MESSAGE};
use crate::validation::{Step, ValidationError};

/// vCISO - incident response plan builder
#[derive(Parser)]
#[command(
    name = "vc",
    about = "Build an incident response plan and analyze its gaps",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Plan service base URL
    #[arg(long = "api-url", global = true, help = "Plan service base URL")]
    pub api_url: Option<String>,

    /// Subcommand to execute; the interactive wizard when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a plan from a questionnaire answers file (YAML or JSON)
    Generate {
        /// Answers file, same keys as the plan request body
        answers: PathBuf,

        /// Write the plan markdown here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a gap analysis on a plan markdown file
    Analyze {
        /// Plan markdown file
        plan: PathBuf,

        /// Company the plan belongs to
        #[arg(long)]
        company: String,

        /// Only show gaps of this severity (all, critical, high, medium, low)
        #[arg(short, long)]
        severity: Option<SeverityFilter>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Also write the full analysis as JSON into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that the plan service is reachable
    Health,
}

/// Output format for batch commands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vciso")
        .join("logs")
        .join("vciso.log")
}

/// Where the config file is looked up, and where logs go
pub fn generate_after_help() -> String {
    let user_config = dirs::config_dir()
        .map(|d| d.join("vciso").join("vciso.yml").display().to_string())
        .unwrap_or_else(|| "<config dir>/vciso/vciso.yml".to_string());

    let mut help = String::new();
    help.push_str("Config lookup:\n");
    help.push_str("  --config PATH, ./.vciso.yml, ");
    help.push_str(&user_config);
    help.push('\n');
    help.push_str(&format!("  {} overrides api.base-url\n", API_URL_ENV));
    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}

/// Human-readable report of the step the batch questionnaire stopped at
pub fn format_violations(step: Step, err: &ValidationError) -> String {
    debug!(?step, count = err.violations().len(), "format_violations: called");
    let mut out = format!("{} ({}) is incomplete:\n", step, step.title());
    for violation in err.violations() {
        let _ = writeln!(out, "  - {}: {}", violation.field, violation.message);
    }
    out
}

fn severity_badge(severity: GapSeverity) -> ColoredString {
    let label = format!("{} Priority", severity.label());
    match severity {
        GapSeverity::Critical => label.red().bold(),
        GapSeverity::High => label.bright_red(),
        GapSeverity::Medium => label.yellow(),
        GapSeverity::Low => label.blue(),
    }
}

fn score_text(score: u8) -> ColoredString {
    let text = format!("{}/100 ({})", score, ScoreBand::from_score(score).label());
    match ScoreBand::from_score(score) {
        ScoreBand::Excellent => text.green().bold(),
        ScoreBand::Good => text.yellow().bold(),
        ScoreBand::NeedsImprovement => text.truecolor(255, 140, 0).bold(),
        ScoreBand::CriticalGaps => text.red().bold(),
    }
}

/// Colored terminal rendering of a gap analysis, honoring the filter
pub fn format_report(view: &GapPresentation) -> String {
    let analysis = view.analysis();
    debug!(company = %analysis.company_name, filter = ?view.filter(), "format_report: called");
    let mut out = String::new();

    let _ = writeln!(out, "{}", "Gap Analysis Report".bold().underline());
    let _ = writeln!(out, "{} • {}", analysis.company_name, analysis.analysis_date());
    let _ = writeln!(out);
    let _ = writeln!(out, "{} {}", "Compliance Score:".bold(), score_text(analysis.overall_score));
    for (framework, pct) in &analysis.framework_compliance {
        let _ = writeln!(out, "  {:<24} {:>3}%", framework, pct);
    }

    if !analysis.strengths.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "What You're Doing Well".green().bold());
        for strength in &analysis.strengths {
            let _ = writeln!(out, "  {} {}", "✓".green(), strength);
        }
    }

    if !analysis.priority_actions.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "Priority Actions".bold());
        for (i, action) in analysis.priority_actions.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, action);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{} [{}]", view.heading().bold(), view.filter().label());
    let gaps = view.visible_gaps();
    if gaps.is_empty() {
        let _ = writeln!(out, "  {}", NO_GAPS_MESSAGE.dimmed());
    }
    for gap in gaps {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "  {}  {}  {}",
            gap.section.bold(),
            severity_badge(gap.severity),
            format!("Effort: {}", gap.estimated_effort).dimmed()
        );
        let _ = writeln!(out, "    What's Missing: {}", gap.description);
        let _ = writeln!(out, "    Recommended Action: {}", gap.recommendation);
        if !gap.framework_references.is_empty() {
            let _ = writeln!(
                out,
                "    Framework References: {}",
                gap.framework_references.join(", ").dimmed()
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Gap, GapAnalysisResult, OnboardingForm};
    use crate::validation::validate_step;
    use std::collections::BTreeMap;

    fn analysis() -> GapAnalysisResult {
        GapAnalysisResult {
            company_name: "Acme Corp".to_string(),
            analysis_timestamp: "2024-05-01T10:00:00Z".to_string(),
            overall_score: 85,
            gaps: vec![
                Gap {
                    id: "GAP-001".to_string(),
                    section: "Detection".to_string(),
                    severity: GapSeverity::Critical,
                    description: "No endpoint monitoring".to_string(),
                    recommendation: "Deploy EDR".to_string(),
                    framework_references: vec!["NIST CSF DE.CM-1".to_string()],
                    estimated_effort: "High".to_string(),
                },
                Gap {
                    id: "GAP-002".to_string(),
                    section: "Recovery".to_string(),
                    severity: GapSeverity::Low,
                    description: "Backups untested".to_string(),
                    recommendation: "Test restores quarterly".to_string(),
                    framework_references: vec![],
                    estimated_effort: "Low".to_string(),
                },
            ],
            strengths: vec!["Clear escalation path".to_string()],
            priority_actions: vec!["Deploy EDR".to_string()],
            framework_compliance: BTreeMap::from([("NIST CSF".to_string(), 80)]),
            enhanced_plan: None,
        }
    }

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["vc"]);
        assert!(cli.command.is_none());
        assert!(cli.api_url.is_none());
    }

    #[test]
    fn test_cli_parse_generate() {
        let cli = Cli::parse_from(["vc", "generate", "answers.yml", "-o", "plan.md"]);
        match cli.command {
            Some(Command::Generate { answers, output }) => {
                assert_eq!(answers, PathBuf::from("answers.yml"));
                assert_eq!(output, Some(PathBuf::from("plan.md")));
            }
            other => panic!("Expected Generate command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_analyze_with_severity() {
        let cli = Cli::parse_from([
            "vc",
            "--api-url",
            "http://svc:9000",
            "analyze",
            "plan.md",
            "--company",
            "Acme",
            "--severity",
            "critical",
        ]);
        assert_eq!(cli.api_url.as_deref(), Some("http://svc:9000"));
        match cli.command {
            Some(Command::Analyze {
                company,
                severity,
                format,
                ..
            }) => {
                assert_eq!(company, "Acme");
                assert_eq!(severity, Some(SeverityFilter::Only(GapSeverity::Critical)));
                assert_eq!(format, OutputFormat::Text);
            }
            other => panic!("Expected Analyze command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_severity() {
        let result = Cli::try_parse_from(["vc", "analyze", "plan.md", "--company", "A", "--severity", "urgent"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["vc", "-c", "/path/to/vciso.yml", "health"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/vciso.yml")));
        assert!(matches!(cli.command, Some(Command::Health)));
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_format_violations() {
        let err = validate_step(Step::Company, &OnboardingForm::default()).unwrap_err();
        let text = format_violations(Step::Company, &err);
        assert!(text.starts_with("Step 1 of 6"));
        assert!(text.contains("Company name must be at least 2 characters"));
        assert!(text.contains("Please select an employee count range"));
    }

    #[test]
    fn test_format_report_filters() {
        colored::control::set_override(false);
        let mut view = GapPresentation::new(analysis());
        let text = format_report(&view);
        assert!(text.contains("Compliance Score: 85/100 (Excellent)"));
        assert!(text.contains("Identified Gaps (2) [All]"));
        assert!(text.contains("Critical Priority"));
        assert!(text.contains("✓ Clear escalation path"));
        assert!(text.contains("1. Deploy EDR"));

        view.set_filter(SeverityFilter::Only(GapSeverity::Medium));
        let text = format_report(&view);
        assert!(text.contains("Identified Gaps (0) [Medium]"));
        assert!(text.contains(NO_GAPS_MESSAGE));
    }
}
