//! TUI application state
//!
//! Pure data structures for the TUI. No rendering logic here.

use tracing::debug;

use super::form::{self, Control};
use crate::api::GapAnalysisRequest;
use crate::domain::{GapAnalysisResult, OnboardingData, Plan};
use crate::export::{CellGrid, PageGeometry};
use crate::present::{GapPresentation, PlanPresentation};
use crate::wizard::Wizard;

/// Spinner frames shown while a request is in flight
pub const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Which screen is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Six-step onboarding questionnaire
    #[default]
    Wizard,
    /// Generated incident response plan
    Plan,
    /// Gap analysis report for the plan
    GapAnalysis,
}

impl View {
    /// Display name for the header
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Wizard => "Onboarding",
            Self::Plan => "Your Incident Response Plan",
            Self::GapAnalysis => "Gap Analysis Report",
        }
    }
}

/// Current interaction mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Modal notice, dismissed by any key
    Alert { title: String, message: String },
    /// Help overlay
    Help,
}

/// Plan service reachability for the header indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiStatus {
    /// No health check has completed yet
    #[default]
    Unknown,
    Healthy,
    Unreachable,
}

/// Work requested by a key press, carried out by the runner
#[derive(Debug, Clone)]
pub enum PendingAction {
    /// Send the validated questionnaire to the plan service
    GeneratePlan(OnboardingData),
    /// Send the plan for gap analysis
    AnalyzeGaps(GapAnalysisRequest),
    /// Write the rasterized plan as a PDF
    ExportPdf(CellGrid),
    /// Put the plan markdown on the clipboard
    CopyPlan,
    /// Write the gap analysis as JSON
    ExportReport,
    /// Probe the plan service
    CheckHealth,
}

/// Main application state
#[derive(Debug)]
pub struct AppState {
    pub current_view: View,
    pub interaction_mode: InteractionMode,
    pub should_quit: bool,
    pub api_status: ApiStatus,
    /// Transient notice in the footer
    pub status_message: Option<String>,
    /// Error shown in the footer
    pub error_message: Option<String>,

    pub wizard: Wizard,
    /// Focused control on the current wizard step
    pub focus: usize,
    pub plan: Option<PlanPresentation>,
    pub gaps: Option<GapPresentation>,

    pub pending_action: Option<PendingAction>,
    /// Page size used when rasterizing for PDF export
    pub page_geometry: PageGeometry,

    // Set by the renderer from the viewport
    pub plan_max_scroll: usize,
    pub gaps_max_scroll: usize,
    pub viewport_height: usize,

    tick_count: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(PageGeometry::default())
    }
}

impl AppState {
    pub fn new(page_geometry: PageGeometry) -> Self {
        debug!(?page_geometry, "AppState::new: called");
        Self {
            current_view: View::Wizard,
            interaction_mode: InteractionMode::Normal,
            should_quit: false,
            api_status: ApiStatus::Unknown,
            status_message: None,
            error_message: None,
            wizard: Wizard::new(),
            focus: 0,
            plan: None,
            gaps: None,
            pending_action: None,
            page_geometry,
            plan_max_scroll: 0,
            gaps_max_scroll: 0,
            viewport_height: 0,
            tick_count: 0,
        }
    }

    /// Advance animation state
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
    }

    /// Current spinner frame
    pub fn spinner(&self) -> &'static str {
        SPINNER[(self.tick_count / 3) % SPINNER.len()]
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        debug!(%msg, "AppState::set_error: called");
        self.status_message = None;
        self.error_message = Some(msg);
    }

    pub fn clear_error(&mut self) {
        debug!("AppState::clear_error: called");
        self.error_message = None;
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        debug!(%msg, "AppState::set_status: called");
        self.error_message = None;
        self.status_message = Some(msg);
    }

    pub fn show_alert(&mut self, title: impl Into<String>, message: impl Into<String>) {
        let title = title.into();
        let message = message.into();
        debug!(%title, %message, "AppState::show_alert: called");
        self.interaction_mode = InteractionMode::Alert { title, message };
    }

    /// Controls on the current wizard step
    pub fn controls(&self) -> Vec<Control> {
        form::controls(self.wizard.step(), self.wizard.form())
    }

    pub fn focused_control(&self) -> Option<Control> {
        self.controls().get(self.focus).copied()
    }

    pub fn focus_next(&mut self) {
        let len = self.controls().len();
        if len > 0 {
            self.focus = (self.focus + 1) % len;
        }
    }

    pub fn focus_prev(&mut self) {
        let len = self.controls().len();
        if len > 0 {
            self.focus = (self.focus + len - 1) % len;
        }
    }

    /// Keep focus on an existing control after the control list changed
    pub fn clamp_focus(&mut self) {
        let len = self.controls().len();
        self.focus = self.focus.min(len.saturating_sub(1));
    }

    /// Show a freshly generated plan
    pub fn enter_plan(&mut self, plan: Plan) {
        debug!(company = %plan.company_name(), "AppState::enter_plan: called");
        self.plan = Some(PlanPresentation::new(plan));
        self.gaps = None;
        self.current_view = View::Plan;
        self.clear_error();
    }

    /// Show a received gap analysis
    pub fn enter_gaps(&mut self, analysis: GapAnalysisResult) {
        debug!(score = analysis.overall_score, "AppState::enter_gaps: called");
        self.gaps = Some(GapPresentation::new(analysis));
        self.current_view = View::GapAnalysis;
    }

    /// Return from the gap report, discarding the analysis; the plan is unchanged
    pub fn back_to_plan(&mut self) {
        debug!("AppState::back_to_plan: called");
        if self.plan.is_some() {
            self.gaps = None;
            self.gaps_max_scroll = 0;
            self.current_view = View::Plan;
        }
    }

    /// Discard the plan and start over with an empty questionnaire
    pub fn start_over(&mut self) {
        debug!("AppState::start_over: called");
        self.wizard.reset();
        self.focus = 0;
        self.plan = None;
        self.gaps = None;
        self.current_view = View::Wizard;
        self.status_message = None;
        self.clear_error();
    }
}
