//! TUI runner - main event loop
//!
//! Draws, dispatches terminal events to the App, and carries out the
//! actions the App queues. Network calls and PDF writing run on background
//! tasks and report back over a channel, so the UI keeps drawing while a
//! request is in flight.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};
use eyre::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::state::{ApiStatus, PendingAction, View};
use super::views;
use crate::api::{ApiError, GapAnalysisRequest, GapAnalysisResponse, HealthStatus, PlanResponse, PlanService};
use crate::clipboard::ClipboardSink;
use crate::config::ExportConfig;
use crate::export::{ExportError, PageGeometry, write_pdf};
use crate::present::COPIED_MESSAGE;

/// UI refresh rate
const TICK_RATE: Duration = Duration::from_millis(33);

/// How often the plan service is probed for the header indicator
const HEALTH_INTERVAL: Duration = Duration::from_secs(30);

/// Rows scrolled per mouse wheel notch
const WHEEL_STEP: isize = 3;

/// Outcome of a background task
#[derive(Debug)]
pub enum TaskResult {
    PlanGenerated(Result<PlanResponse, ApiError>),
    /// Carries the request so a result for an abandoned plan can be told apart
    GapsAnalyzed(GapAnalysisRequest, Result<GapAnalysisResponse, ApiError>),
    PdfExported(Result<PathBuf, ExportError>),
    Health(Result<HealthStatus, ApiError>),
}

/// TUI runner that manages the event loop
pub struct TuiRunner {
    app: App,
    terminal: Tui,
    event_handler: EventHandler,
    service: Arc<dyn PlanService>,
    clipboard: Box<dyn ClipboardSink>,
    /// Where PDF and JSON exports are written
    output_dir: PathBuf,
    result_tx: mpsc::UnboundedSender<TaskResult>,
    result_rx: mpsc::UnboundedReceiver<TaskResult>,
    last_health: Option<Instant>,
}

impl TuiRunner {
    pub fn new(
        terminal: Tui,
        service: Arc<dyn PlanService>,
        clipboard: Box<dyn ClipboardSink>,
        export: &ExportConfig,
    ) -> Self {
        debug!(output_dir = %export.output_dir.display(), "TuiRunner::new: called");
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        Self {
            app: App::new(PageGeometry::from(export)),
            terminal,
            event_handler: EventHandler::new(TICK_RATE),
            service,
            clipboard,
            output_dir: export.output_dir.clone(),
            result_tx,
            result_rx,
            last_health: None,
        }
    }

    /// Run the main loop until the user quits
    pub async fn run(&mut self) -> Result<()> {
        debug!("TuiRunner::run: called");
        loop {
            self.terminal.draw(|frame| views::render(self.app.state_mut(), frame))?;

            tokio::select! {
                event = self.event_handler.next() => {
                    match event? {
                        Event::Tick => self.handle_tick(),
                        Event::Key(key) => {
                            if self.handle_key(key) {
                                break;
                            }
                        }
                        Event::Mouse(mouse) => self.handle_mouse(mouse),
                        Event::Resize(width, height) => {
                            debug!(width, height, "TuiRunner::run: terminal resized");
                        }
                    }
                }
                Some(result) = self.result_rx.recv() => {
                    self.handle_result(result);
                }
            }

            if let Some(action) = self.app.state_mut().pending_action.take() {
                self.execute_action(action);
            }

            if self.app.state().should_quit {
                debug!("TuiRunner::run: should_quit is true, breaking");
                break;
            }
        }

        debug!("TuiRunner::run: exiting");
        Ok(())
    }

    fn handle_tick(&mut self) {
        let state = self.app.state_mut();
        state.tick();

        let due = self.last_health.is_none_or(|at| at.elapsed() >= HEALTH_INTERVAL);
        if due && state.pending_action.is_none() {
            self.last_health = Some(Instant::now());
            state.pending_action = Some(PendingAction::CheckHealth);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.app.handle_key(key)
    }

    /// Mouse wheel scrolls the plan or the gap report
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let delta = match mouse.kind {
            MouseEventKind::ScrollUp => -WHEEL_STEP,
            MouseEventKind::ScrollDown => WHEEL_STEP,
            _ => return,
        };

        let state = self.app.state_mut();
        match state.current_view {
            View::Plan => {
                let max = state.plan_max_scroll;
                if let Some(plan) = state.plan.as_mut() {
                    plan.scroll_by(delta, max);
                }
            }
            View::GapAnalysis => {
                let max = state.gaps_max_scroll;
                if let Some(gaps) = state.gaps.as_mut() {
                    gaps.scroll_by(delta, max);
                }
            }
            View::Wizard => {}
        }
    }

    /// Carry out an action queued by the App
    fn execute_action(&mut self, action: PendingAction) {
        debug!(?action, "TuiRunner::execute_action: called");
        match action {
            PendingAction::GeneratePlan(data) => {
                let service = Arc::clone(&self.service);
                let tx = self.result_tx.clone();
                tokio::spawn(async move {
                    let result = service.generate_plan(&data).await;
                    let _ = tx.send(TaskResult::PlanGenerated(result));
                });
            }
            PendingAction::AnalyzeGaps(request) => {
                let service = Arc::clone(&self.service);
                let tx = self.result_tx.clone();
                tokio::spawn(async move {
                    let result = service
                        .analyze_gaps(&request.plan_markdown, &request.company_name)
                        .await;
                    let _ = tx.send(TaskResult::GapsAnalyzed(request, result));
                });
            }
            PendingAction::ExportPdf(grid) => {
                let geometry = self.app.state().page_geometry;
                let dir = self.output_dir.clone();
                let tx = self.result_tx.clone();
                tokio::task::spawn_blocking(move || {
                    let result = write_pdf(&grid, geometry, &dir);
                    let _ = tx.send(TaskResult::PdfExported(result));
                });
            }
            PendingAction::CheckHealth => {
                let service = Arc::clone(&self.service);
                let tx = self.result_tx.clone();
                tokio::spawn(async move {
                    let result = service.health().await;
                    let _ = tx.send(TaskResult::Health(result));
                });
            }
            PendingAction::CopyPlan => self.copy_plan(),
            PendingAction::ExportReport => self.export_report(),
        }
    }

    fn copy_plan(&mut self) {
        let state = self.app.state_mut();
        let Some(plan) = state.plan.as_ref() else {
            warn!("TuiRunner::copy_plan: no plan to copy");
            return;
        };
        match plan.copy_to(self.clipboard.as_mut()) {
            Ok(()) => {
                info!("TuiRunner::copy_plan: plan copied");
                state.show_alert("Copied", COPIED_MESSAGE);
            }
            Err(e) => {
                warn!(error = %e, "TuiRunner::copy_plan: copy failed");
                state.show_alert("Copy failed", e.to_string());
            }
        }
    }

    fn export_report(&mut self) {
        let state = self.app.state_mut();
        let Some(gaps) = state.gaps.as_ref() else {
            warn!("TuiRunner::export_report: no analysis to export");
            return;
        };
        match gaps.export_report(&self.output_dir) {
            Ok(path) => state.set_status(format!("Report saved to {}", path.display())),
            Err(e) => {
                warn!(error = %e, "TuiRunner::export_report: export failed");
                state.set_error(e.to_string());
            }
        }
    }

    /// Apply the outcome of a background task
    fn handle_result(&mut self, result: TaskResult) {
        debug!(?result, "TuiRunner::handle_result: called");
        let state = self.app.state_mut();
        match result {
            TaskResult::PlanGenerated(result) => {
                if !state.wizard.is_submitting() {
                    debug!("TuiRunner::handle_result: no plan request in flight, dropping result");
                    return;
                }
                if let Ok(plan) = state.wizard.finish_submit(result) {
                    state.enter_plan(plan);
                }
            }
            TaskResult::GapsAnalyzed(request, result) => {
                let Some(plan) = state.plan.as_mut().filter(|plan| plan.is_for(&request)) else {
                    debug!(company = %request.company_name, "TuiRunner::handle_result: analysis for another plan, dropping");
                    return;
                };
                if let Some(analysis) = plan.finish_analysis(result) {
                    state.enter_gaps(analysis);
                }
            }
            TaskResult::PdfExported(result) => {
                if let Some(plan) = state.plan.as_mut() {
                    plan.finish_export();
                }
                match result {
                    Ok(path) => state.set_status(format!("PDF saved to {}", path.display())),
                    Err(e) => state.show_alert("Export failed", e.to_string()),
                }
            }
            TaskResult::Health(result) => {
                state.api_status = match result {
                    Ok(status) if status.is_healthy() => ApiStatus::Healthy,
                    Ok(status) => {
                        warn!(status = %status.status, "TuiRunner::handle_result: service degraded");
                        ApiStatus::Unreachable
                    }
                    Err(e) => {
                        debug!(error = %e, "TuiRunner::handle_result: health check failed");
                        ApiStatus::Unreachable
                    }
                };
            }
        }
    }
}
