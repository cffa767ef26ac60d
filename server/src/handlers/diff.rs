//! Diff handler - classifies a pre-computed side-by-side diff.

use crate::error::Result;
use cockpit_engine::{DiffLine, DiffRow, DiffStats, SideBySideDiff};
use serde::{Deserialize, Serialize};

/// Request body for diff analysis.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub left: Vec<DiffLine>,
    pub right: Vec<DiffLine>,
    #[serde(default)]
    pub hide_unchanged: bool,
}

/// Response for diff analysis.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub stats: DiffStats,
    /// Row indices the viewer jumps between
    pub change_sections: Vec<usize>,
    /// Rows to display, each with its original index
    pub rows: Vec<DiffRow>,
}

/// Validate and classify a diff.
pub fn handle_analyze(request: AnalyzeRequest) -> Result<AnalyzeResponse> {
    let diff = SideBySideDiff::new(request.left, request.right)?;

    let response = AnalyzeResponse {
        stats: diff.stats(),
        change_sections: diff.change_sections(),
        rows: diff.rows(request.hide_unchanged),
    };

    tracing::debug!(
        lines = diff.len(),
        changes = response.change_sections.len(),
        shown = response.rows.len(),
        "Diff analyzed"
    );

    Ok(response)
}
