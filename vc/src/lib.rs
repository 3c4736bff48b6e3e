//! vciso - virtual CISO incident response plan builder
//!
//! A terminal client for a remote plan service. The user answers a six-step
//! onboarding questionnaire, receives a generated incident response plan,
//! and can run a gap analysis on it.
//!
//! # Modules
//!
//! - [`domain`] - Onboarding answers, plans and gap analysis results
//! - [`validation`] - Per-step and whole-document questionnaire rules
//! - [`wizard`] - Questionnaire state machine
//! - [`api`] - Plan service trait and HTTP client
//! - [`present`] - Plan and gap report view state
//! - [`export`] - PDF and JSON export
//! - [`clipboard`] - System clipboard access
//! - [`tui`] - Terminal user interface
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod api;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod domain;
pub mod export;
pub mod present;
pub mod tui;
pub mod validation;
pub mod wizard;

// Re-export commonly used types
pub use api::{ApiError, HttpPlanService, PlanService, create_service};
pub use config::Config;
pub use domain::{GapAnalysisResult, OnboardingData, OnboardingForm, Plan};
pub use validation::{Step, ValidationError};
pub use wizard::{Wizard, WizardError};
