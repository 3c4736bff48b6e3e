//! Plan and gap analysis presentation
//!
//! View state that outlives a single frame: scroll offsets, busy flags,
//! inline errors and the severity filter. Drawing lives in `tui::views`.

mod gaps;
mod plan;

pub use gaps::{GapPresentation, NO_GAPS_MESSAGE};
pub use plan::{COPIED_MESSAGE, PlanPresentation, render_markdown};
