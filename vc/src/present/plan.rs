//! Plan presentation state

use std::path::{Path, PathBuf};

use ratatui::text::Text;
use tracing::{debug, info, warn};

use crate::api::{ApiError, GapAnalysisRequest, GapAnalysisResponse, Operation, PlanService};
use crate::clipboard::{ClipboardError, ClipboardSink};
use crate::domain::{GapAnalysisResult, Plan};
use crate::export::{CellGrid, ExportError, PageGeometry, rasterize, write_pdf};

pub const COPIED_MESSAGE: &str = "Plan copied to clipboard!";

/// Render plan markdown with the fixed markdown style mapping
pub fn render_markdown(markdown: &str) -> Text<'_> {
    tui_markdown::from_str(markdown)
}

/// A generated plan on screen, plus the state of its actions
#[derive(Debug, Clone)]
pub struct PlanPresentation {
    plan: Plan,
    scroll: usize,
    exporting: bool,
    analyzing: bool,
    analysis_error: Option<String>,
}

impl PlanPresentation {
    pub fn new(plan: Plan) -> Self {
        debug!(company = %plan.company_name(), "PlanPresentation::new: called");
        Self {
            plan,
            scroll: 0,
            exporting: false,
            analyzing: false,
            analysis_error: None,
        }
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn rendered(&self) -> Text<'_> {
        render_markdown(self.plan.markdown())
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Scroll by `delta` rows, clamped to `[0, max]`
    pub fn scroll_by(&mut self, delta: isize, max: usize) {
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    /// Copy the raw markdown, byte for byte
    pub fn copy_to(&self, sink: &mut dyn ClipboardSink) -> Result<(), ClipboardError> {
        debug!(len = self.plan.markdown().len(), "PlanPresentation::copy_to: called");
        sink.set_text(self.plan.markdown())
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    /// Rasterize the rendered plan and mark an export in progress
    ///
    /// Returns None while another export is running.
    pub fn begin_export(&mut self, geometry: PageGeometry) -> Option<CellGrid> {
        debug!(exporting = self.exporting, "PlanPresentation::begin_export: called");
        if self.exporting {
            return None;
        }
        self.exporting = true;
        Some(rasterize(&self.rendered(), geometry.columns))
    }

    pub fn finish_export(&mut self) {
        self.exporting = false;
    }

    /// Export the rendered plan as a PDF in `dir`, start to finish
    pub fn export_pdf(&self, geometry: PageGeometry, dir: &Path) -> Result<PathBuf, ExportError> {
        let grid = rasterize(&self.rendered(), geometry.columns);
        write_pdf(&grid, geometry, dir)
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    /// Error from the last gap analysis attempt, shown inline
    pub fn analysis_error(&self) -> Option<&str> {
        self.analysis_error.as_deref()
    }

    /// Mark a gap analysis in flight and build its request
    ///
    /// Returns None while one is already running.
    pub fn begin_analysis(&mut self) -> Option<GapAnalysisRequest> {
        debug!(analyzing = self.analyzing, "PlanPresentation::begin_analysis: called");
        if self.analyzing {
            return None;
        }
        self.analyzing = true;
        self.analysis_error = None;
        Some(GapAnalysisRequest {
            plan_markdown: self.plan.markdown().to_string(),
            company_name: self.plan.company_name().to_string(),
        })
    }

    /// True when `request` was built from this plan
    pub fn is_for(&self, request: &GapAnalysisRequest) -> bool {
        self.plan.markdown() == request.plan_markdown && self.plan.company_name() == request.company_name
    }

    /// Record the analysis outcome; Some means switch to the gap report
    ///
    /// Results arriving with no analysis in flight are dropped.
    pub fn finish_analysis(&mut self, result: Result<GapAnalysisResponse, ApiError>) -> Option<GapAnalysisResult> {
        debug!(ok = result.is_ok(), "PlanPresentation::finish_analysis: called");
        if !self.analyzing {
            debug!("PlanPresentation::finish_analysis: no analysis in flight, dropping result");
            return None;
        }
        self.analyzing = false;

        let unsuccessful = || ApiError::Unsuccessful {
            operation: Operation::AnalyzeGaps,
        };
        let outcome = result.and_then(|resp| match resp.success {
            true => resp.gap_analysis.ok_or_else(unsuccessful),
            false => Err(unsuccessful()),
        });
        match outcome {
            Ok(analysis) => {
                info!(score = analysis.overall_score, gaps = analysis.gaps.len(), "finish_analysis: analysis received");
                Some(analysis)
            }
            Err(err) => {
                warn!(error = %err, "finish_analysis: analysis failed");
                self.analysis_error = Some(err.to_string());
                None
            }
        }
    }

    /// Request a gap analysis and wait for it
    pub async fn analyze(&mut self, service: &dyn PlanService) -> Option<GapAnalysisResult> {
        let request = self.begin_analysis()?;
        let result = service
            .analyze_gaps(&request.plan_markdown, &request.company_name)
            .await;
        self.finish_analysis(result)
    }
}
