//! TUI application - event handling and state management
//!
//! The App struct owns the AppState and handles all keyboard events.
//! It does not do any rendering - that's delegated to the views module.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, trace};

use super::form::{Control, ControlKind};
use super::state::{AppState, InteractionMode, PendingAction, View};
use crate::domain::SeverityFilter;
use crate::export::PageGeometry;
use crate::wizard::WizardError;

/// Rows scrolled per line step
const LINE_STEP: isize = 1;

/// TUI application
#[derive(Debug)]
pub struct App {
    /// Application state
    state: AppState,
}

impl Default for App {
    fn default() -> Self {
        Self::new(PageGeometry::default())
    }
}

impl App {
    /// Create a new application instance
    pub fn new(page_geometry: PageGeometry) -> Self {
        debug!("App::new: called");
        Self {
            state: AppState::new(page_geometry),
        }
    }

    /// Get reference to state
    pub fn state(&self) -> &AppState {
        trace!("App::state: called");
        &self.state
    }

    /// Get mutable reference to state
    pub fn state_mut(&mut self) -> &mut AppState {
        trace!("App::state_mut: called");
        &mut self.state
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_key: called");
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            debug!("App::handle_key: Ctrl+C force quit");
            return true;
        }

        match &self.state.interaction_mode {
            InteractionMode::Normal => {
                self.state.status_message = None;
                self.state.clear_error();
                match self.state.current_view {
                    View::Wizard => self.handle_wizard_key(key),
                    View::Plan => self.handle_plan_key(key),
                    View::GapAnalysis => self.handle_gaps_key(key),
                }
            }
            InteractionMode::Alert { .. } => {
                debug!("App::handle_key: dismissing alert");
                self.state.interaction_mode = InteractionMode::Normal;
                false
            }
            InteractionMode::Help => self.handle_help_key(key),
        }
    }

    /// Keys shared by every view outside text entry
    fn handle_global_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => {
                debug!("App::handle_global_key: quit requested");
                self.state.should_quit = true;
                true
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                debug!("App::handle_global_key: showing help");
                self.state.interaction_mode = InteractionMode::Help;
                false
            }
            _ => {
                trace!("App::handle_global_key: unhandled key");
                false
            }
        }
    }

    /// Handle key on the questionnaire
    fn handle_wizard_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, step = ?self.state.wizard.step(), "App::handle_wizard_key: called");
        let focused = self.state.focused_control();
        let typing = focused.is_some_and(|c| c.kind == ControlKind::Text);

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.state.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.state.focus_prev(),
            KeyCode::Enter => self.wizard_forward(),
            KeyCode::Esc => {
                if self.state.wizard.retreat() {
                    self.state.focus = 0;
                }
            }
            KeyCode::Backspace if typing => {
                if let Some(control) = focused {
                    self.state.wizard.pop_char(control.field);
                }
            }
            KeyCode::Char(c) if typing && !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(control) = focused {
                    self.state.wizard.push_char(control.field, c);
                }
            }
            KeyCode::Char(' ') => {
                if let Some(control) = focused {
                    self.activate(control);
                }
            }
            _ => return self.handle_global_key(key),
        }
        false
    }

    /// Select a radio option or toggle a checkbox
    fn activate(&mut self, control: Control) {
        debug!(field = %control.field, value = control.value, "App::activate: called");
        match control.kind {
            ControlKind::Radio => self.state.wizard.select(control.field, control.value),
            ControlKind::Checkbox => self.state.wizard.toggle(control.field, control.value),
            ControlKind::Text => return,
        }
        // Selecting a lead type can add or remove the name box
        if let Some(index) = self.state.controls().iter().position(|c| *c == control) {
            self.state.focus = index;
        }
        self.state.clamp_focus();
    }

    /// Enter: next step, or generate the plan on the last one
    fn wizard_forward(&mut self) {
        let result = if self.state.wizard.step().is_last() {
            self.state.wizard.begin_submit().map(|data| {
                debug!("App::wizard_forward: queueing plan generation");
                self.state.pending_action = Some(PendingAction::GeneratePlan(data));
            })
        } else {
            self.state.wizard.advance().map(|step| {
                debug!(?step, "App::wizard_forward: advanced");
                self.state.focus = 0;
            })
        };

        match result {
            Ok(()) => {}
            Err(WizardError::Validation(err)) => {
                // Jump to the first control of the first invalid field
                let fields = err.fields();
                if let Some(index) = self.state.controls().iter().position(|c| fields.contains(&c.field)) {
                    self.state.focus = index;
                }
            }
            Err(err) => debug!(error = %err, "App::wizard_forward: ignored"),
        }
    }

    /// Handle key on the plan view
    fn handle_plan_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_plan_key: called");
        let max = self.state.plan_max_scroll;
        let page = self.state.viewport_height.max(1) as isize;
        let geometry = self.state.page_geometry;
        let Some(plan) = self.state.plan.as_mut() else {
            debug!("App::handle_plan_key: no plan loaded");
            return self.handle_global_key(key);
        };

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => plan.scroll_by(LINE_STEP, max),
            KeyCode::Char('k') | KeyCode::Up => plan.scroll_by(-LINE_STEP, max),
            KeyCode::PageDown | KeyCode::Char(' ') => plan.scroll_by(page, max),
            KeyCode::PageUp => plan.scroll_by(-page, max),
            KeyCode::Home | KeyCode::Char('g') => plan.scroll_to_top(),
            KeyCode::End | KeyCode::Char('G') => plan.scroll_by(isize::MAX, max),
            KeyCode::Char('c') => self.state.pending_action = Some(PendingAction::CopyPlan),
            KeyCode::Char('p') => match plan.begin_export(geometry) {
                Some(grid) => self.state.pending_action = Some(PendingAction::ExportPdf(grid)),
                None => debug!("App::handle_plan_key: export already running"),
            },
            KeyCode::Char('a') => match plan.begin_analysis() {
                Some(request) => self.state.pending_action = Some(PendingAction::AnalyzeGaps(request)),
                None => debug!("App::handle_plan_key: analysis already running"),
            },
            KeyCode::Char('n') => self.state.start_over(),
            _ => return self.handle_global_key(key),
        }
        false
    }

    /// Handle key on the gap analysis report
    fn handle_gaps_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_gaps_key: called");
        let max = self.state.gaps_max_scroll;
        let page = self.state.viewport_height.max(1) as isize;
        let Some(gaps) = self.state.gaps.as_mut() else {
            debug!("App::handle_gaps_key: no analysis loaded");
            return self.handle_global_key(key);
        };

        match key.code {
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => gaps.prev_filter(),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => gaps.next_filter(),
            KeyCode::Char(c @ '0'..='4') => {
                let index = c as usize - '0' as usize;
                gaps.set_filter(SeverityFilter::ALL[index]);
            }
            KeyCode::Char('j') | KeyCode::Down => gaps.scroll_by(LINE_STEP, max),
            KeyCode::Char('k') | KeyCode::Up => gaps.scroll_by(-LINE_STEP, max),
            KeyCode::PageDown | KeyCode::Char(' ') => gaps.scroll_by(page, max),
            KeyCode::PageUp => gaps.scroll_by(-page, max),
            KeyCode::Char('e') => self.state.pending_action = Some(PendingAction::ExportReport),
            KeyCode::Char('b') | KeyCode::Esc | KeyCode::Backspace => self.state.back_to_plan(),
            _ => return self.handle_global_key(key),
        }
        false
    }

    /// Handle key in help mode
    fn handle_help_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_help_key: called");
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                debug!("App::handle_help_key: closing help");
                self.state.interaction_mode = InteractionMode::Normal;
            }
            _ => {
                debug!("App::handle_help_key: unhandled key");
            }
        }

        false
    }
}
