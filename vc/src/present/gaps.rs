//! Gap analysis presentation state

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{Gap, GapAnalysisResult, ScoreBand, SeverityFilter};
use crate::export::{ExportError, write_report};

pub const NO_GAPS_MESSAGE: &str = "No gaps found in this category";

/// A received analysis with a client-side severity filter over its gaps
#[derive(Debug, Clone)]
pub struct GapPresentation {
    analysis: GapAnalysisResult,
    filter: SeverityFilter,
    scroll: usize,
}

impl GapPresentation {
    pub fn new(analysis: GapAnalysisResult) -> Self {
        debug!(gaps = analysis.gaps.len(), "GapPresentation::new: called");
        Self {
            analysis,
            filter: SeverityFilter::All,
            scroll: 0,
        }
    }

    pub fn analysis(&self) -> &GapAnalysisResult {
        &self.analysis
    }

    pub fn filter(&self) -> SeverityFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: SeverityFilter) {
        debug!(?filter, "GapPresentation::set_filter: called");
        self.filter = filter;
        self.scroll = 0;
    }

    pub fn next_filter(&mut self) {
        self.set_filter(self.filter.next());
    }

    pub fn prev_filter(&mut self) {
        self.set_filter(self.filter.prev());
    }

    /// Gaps matching the current filter, in received order
    pub fn visible_gaps(&self) -> Vec<&Gap> {
        self.filter.apply(&self.analysis.gaps)
    }

    /// "Identified Gaps (n)" for the filtered count
    pub fn heading(&self) -> String {
        format!("Identified Gaps ({})", self.visible_gaps().len())
    }

    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::from_score(self.analysis.overall_score)
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn scroll_by(&mut self, delta: isize, max: usize) {
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    /// Write the whole analysis, ignoring the filter
    pub fn export_report(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        write_report(&self.analysis, dir)
    }
}
