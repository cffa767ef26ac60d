//! Compare endpoint routes: attributes, diffs and CSV.

use axum::{routing::post, Json, Router};

use crate::error::Result;
use crate::handlers::{
    handle_analyze, handle_compare, handle_parse, AnalyzeRequest, AnalyzeResponse,
    CompareRequest, ParseRequest, ParseResponse,
};
use crate::AppState;
use cockpit_engine::ReconcileReport;

/// Create compare routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/compare/attributes", post(compare_handler))
        .route("/diff/analyze", post(analyze_handler))
        .route("/csv/parse", post(parse_handler))
}

/// POST /compare/attributes - Reconcile two attribute records.
async fn compare_handler(Json(request): Json<CompareRequest>) -> Result<Json<ReconcileReport>> {
    let report = handle_compare(request)?;
    Ok(Json(report))
}

/// POST /diff/analyze - Stats, change sections and rows of a diff.
async fn analyze_handler(Json(request): Json<AnalyzeRequest>) -> Result<Json<AnalyzeResponse>> {
    let response = handle_analyze(request)?;
    Ok(Json(response))
}

/// POST /csv/parse - Tokenize delimited text.
async fn parse_handler(Json(request): Json<ParseRequest>) -> Json<ParseResponse> {
    Json(handle_parse(request))
}
