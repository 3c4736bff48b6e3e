//! Gap analysis report as pretty JSON

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::ExportError;
use crate::domain::GapAnalysisResult;

/// `gap-analysis-<company>-<unix-millis>.json`
///
/// Characters that cannot appear in a file name are replaced with '-'.
pub fn report_file_name(company: &str, unix_millis: i64) -> String {
    let company: String = company
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let company = if company.is_empty() { "company".to_string() } else { company };
    format!("gap-analysis-{}-{}.json", company, unix_millis)
}

/// Write the full, unfiltered analysis into `dir`
pub fn write_report(analysis: &GapAnalysisResult, dir: &Path) -> Result<PathBuf, ExportError> {
    debug!(company = %analysis.company_name, dir = %dir.display(), "write_report: called");
    let json = serde_json::to_string_pretty(analysis)?;

    let millis = chrono::Utc::now().timestamp_millis();
    let path = dir.join(report_file_name(&analysis.company_name, millis));

    fs::create_dir_all(dir)
        .and_then(|_| fs::write(&path, json))
        .map_err(|source| ExportError::ReportWrite {
            path: path.clone(),
            source,
        })?;

    info!(path = %path.display(), gaps = analysis.gaps.len(), "write_report: exported analysis");
    Ok(path)
}
