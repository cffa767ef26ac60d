//! Compare handler - reconciles a device's attributes between two systems.

use crate::error::{AppError, Result};
use cockpit_engine::{AttributeRecord, ReconcileReport, Reconciler};
use serde::Deserialize;

/// Request body for attribute comparison.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    /// Source of truth (Nautobot)
    pub left: serde_json::Value,
    /// External system (CheckMK)
    pub right: serde_json::Value,
    /// Keys reported but flagged as ignored
    #[serde(default)]
    pub ignored_keys: Vec<String>,
}

/// Compare two attribute records.
pub fn handle_compare(request: CompareRequest) -> Result<ReconcileReport> {
    let left = parse_record("left", request.left)?;
    let right = parse_record("right", request.right)?;

    let report = Reconciler::new()
        .with_ignored(request.ignored_keys)
        .report(&left, &right)?;

    tracing::debug!(
        total = report.summary.total,
        different = report.summary.different,
        missing_left = report.summary.missing_left,
        missing_right = report.summary.missing_right,
        "Attributes compared"
    );

    Ok(report)
}

fn parse_record(side: &str, value: serde_json::Value) -> Result<AttributeRecord> {
    AttributeRecord::from_json(value).map_err(|e| AppError::BadRequest(format!("{}: {}", side, e)))
}
