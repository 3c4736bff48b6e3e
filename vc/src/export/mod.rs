//! Plan and analysis exports
//!
//! The plan is exported as it is rendered on screen: styled lines are
//! rasterized into a grid of character cells, sliced into page-sized bands
//! and written as a PDF. The gap analysis is exported as pretty JSON.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

mod pdf;
mod report;

pub use pdf::{CellGrid, GridCell, PDF_FILE_NAME, PageGeometry, rasterize, render_pdf, write_pdf};
pub use report::{report_file_name, write_report};

#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing visible to export
    #[error("Could not find plan content to export")]
    EmptyRegion,

    #[error("Failed to export PDF. Please try again.")]
    PdfWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write report to {}", .path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode report: {0}")]
    ReportEncode(#[from] serde_json::Error),
}
