//! vc - incident response plan builder
//!
//! Launches the onboarding TUI, or runs plan generation and gap analysis
//! as batch commands.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result, eyre};
use tracing::{debug, info, warn};

use vciso::api::{PlanService, create_service};
use vciso::cli::{Cli, Command, OutputFormat, format_report, format_violations, generate_after_help, get_log_path};
use vciso::config::Config;
use vciso::domain::{OnboardingForm, Plan, PlanMetadata, SeverityFilter};
use vciso::present::{GapPresentation, PlanPresentation};
use vciso::tui;
use vciso::wizard::{Wizard, WizardError};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(|s| s.to_uppercase()) {
        None => tracing::Level::INFO,
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;

    config.apply_env(|key| std::env::var(key).ok());
    config.apply_cli(cli.api_url.as_deref());
    info!(base_url = %config.api.base_url, "vc loaded config");

    let service = create_service(&config.api).context("Failed to create plan service client")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Generate { answers, output }) => cmd_generate(service.as_ref(), &answers, output.as_deref()).await,
        Some(Command::Analyze {
            plan,
            company,
            severity,
            format,
            output,
        }) => {
            cmd_analyze(
                service.as_ref(),
                &plan,
                &company,
                severity.unwrap_or_default(),
                format,
                output.as_deref(),
            )
            .await
        }
        Some(Command::Health) => cmd_health(service.as_ref()).await,
        None => {
            debug!("main: no command specified, launching TUI");
            cmd_tui(service, &config).await
        }
    }
}

/// Interactive wizard
async fn cmd_tui(service: Arc<dyn PlanService>, config: &Config) -> Result<()> {
    tui::run(service, &config.export).await
}

/// Walk the questionnaire from an answers file and submit it
async fn cmd_generate(service: &dyn PlanService, answers: &Path, output: Option<&Path>) -> Result<()> {
    debug!(answers = %answers.display(), "cmd_generate: called");
    let content = fs::read_to_string(answers).context(format!("Failed to read {}", answers.display()))?;
    // YAML is a superset of JSON, so both answer formats parse here
    let form: OnboardingForm =
        serde_yaml::from_str(&content).context(format!("Failed to parse {}", answers.display()))?;

    let mut wizard = Wizard::from_form(form);
    while !wizard.step().is_last() {
        let step = wizard.step();
        if let Err(e) = wizard.advance() {
            return Err(step_failure(step, e));
        }
    }

    let step = wizard.step();
    eprintln!("{}", "Generating Your Plan...".dimmed());
    let plan = wizard.submit(service).await.map_err(|e| step_failure(step, e))?;
    info!(company = %plan.company_name(), "cmd_generate: plan generated");

    match output {
        Some(path) => {
            fs::write(path, plan.markdown()).context(format!("Failed to write {}", path.display()))?;
            eprintln!("{} {}", "Plan written to".green(), path.display());
        }
        None => print!("{}", plan.markdown()),
    }
    Ok(())
}

fn step_failure(step: vciso::validation::Step, err: WizardError) -> eyre::Report {
    match err {
        WizardError::Validation(v) => eyre!("{}", format_violations(step, &v).trim_end()),
        other => eyre!(other),
    }
}

/// Gap analysis of a plan file
async fn cmd_analyze(
    service: &dyn PlanService,
    plan_path: &Path,
    company: &str,
    filter: SeverityFilter,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    debug!(plan = %plan_path.display(), %company, ?filter, "cmd_analyze: called");
    let markdown = fs::read_to_string(plan_path).context(format!("Failed to read {}", plan_path.display()))?;

    let mut presentation = PlanPresentation::new(Plan::new(markdown, PlanMetadata::default(), company));
    eprintln!("{}", "Analyzing...".dimmed());
    let Some(analysis) = presentation.analyze(service).await else {
        let message = presentation
            .analysis_error()
            .unwrap_or("Failed to analyze plan. Please try again.")
            .to_string();
        return Err(eyre!(message));
    };

    let mut view = GapPresentation::new(analysis);
    view.set_filter(filter);

    match format {
        OutputFormat::Text => print!("{}", format_report(&view)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(view.analysis()).context("Failed to encode analysis")?;
            println!("{}", json);
        }
    }

    if let Some(dir) = output {
        let path: PathBuf = view.export_report(dir)?;
        eprintln!("{} {}", "Report saved to".green(), path.display());
    }
    Ok(())
}

/// Probe the plan service
async fn cmd_health(service: &dyn PlanService) -> Result<()> {
    debug!("cmd_health: called");
    match service.health().await {
        Ok(status) if status.is_healthy() => {
            println!("{} plan service is {}", "●".green(), status.status);
            Ok(())
        }
        Ok(status) => {
            warn!(status = %status.status, "cmd_health: service degraded");
            println!("{} plan service reports {}", "●".yellow(), status.status);
            Err(eyre!("Plan service is not healthy: {}", status.status))
        }
        Err(e) => {
            println!("{} {}", "●".red(), e);
            Err(e.into())
        }
    }
}
