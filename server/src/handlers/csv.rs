//! CSV handler - tokenizes uploaded or pasted device lists.

use cockpit_engine::{
    parse_document, parse_table, sniff_delimiter, AttributeRecord, CsvOptions, CsvRow,
};
use serde::{Deserialize, Serialize};

/// Request body for CSV parsing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRequest {
    pub text: String,
    /// Sniffed from the text when absent
    pub delimiter: Option<char>,
    pub quote: Option<char>,
    #[serde(default)]
    pub skip_header: bool,
    /// Treat the first line as column names and return keyed records
    #[serde(default)]
    pub header: bool,
}

/// Response for CSV parsing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    /// Delimiter actually used
    pub delimiter: char,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<CsvRow>,
    pub rows: Vec<CsvRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<AttributeRecord>>,
}

/// Tokenize a CSV document. Never fails.
pub fn handle_parse(request: ParseRequest) -> ParseResponse {
    let defaults = CsvOptions::default();
    let delimiter = request
        .delimiter
        .unwrap_or_else(|| sniff_delimiter(&request.text));
    let options = CsvOptions::new()
        .delimiter(delimiter)
        .quote(request.quote.unwrap_or(defaults.quote))
        .skip_header(request.skip_header);

    let response = if request.header {
        let table = parse_table(&request.text, &options);
        let records = table.records();
        ParseResponse {
            delimiter,
            headers: Some(table.headers),
            rows: table.rows,
            records: Some(records),
        }
    } else {
        ParseResponse {
            delimiter,
            headers: None,
            rows: parse_document(&request.text, &options),
            records: None,
        }
    };

    tracing::debug!(
        delimiter = %delimiter.escape_default(),
        rows = response.rows.len(),
        "CSV parsed"
    );

    response
}
