//! CSV tokenizer for bulk device imports.
//!
//! A two-state (unquoted / quoted) machine applied one line at a time. No
//! state carries across lines, so a quoted field cannot span a line break.
//! Every input produces some output; malformed quoting is closed at the end
//! of the line.

use crate::{AttributeRecord, CsvRow};
use serde::{Deserialize, Serialize};

/// Delimiters tried by [`sniff_delimiter`], in tie-break order.
const SNIFF_CANDIDATES: [char; 4] = [',', ';', '\t', '|'];

/// Lines sampled by [`sniff_delimiter`].
const SNIFF_SAMPLE_LINES: usize = 10;

/// Tokenizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CsvOptions {
    pub delimiter: char,
    pub quote: char,
    pub skip_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            skip_header: false,
        }
    }
}

impl CsvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    pub fn skip_header(mut self, skip: bool) -> Self {
        self.skip_header = skip;
        self
    }
}

/// Ends the current field, trimmed of surrounding whitespace.
fn finish_field(field: &mut String) -> String {
    let finished = field.trim().to_string();
    field.clear();
    finished
}

/// Split one line into fields.
///
/// A line with no delimiter yields one field; a trailing delimiter yields a
/// trailing empty field.
pub fn parse_line(line: &str, options: &CsvOptions) -> CsvRow {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == options.quote {
                if chars.peek() == Some(&options.quote) {
                    chars.next();
                    field.push(options.quote);
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == options.delimiter {
            fields.push(finish_field(&mut field));
        } else if c == options.quote {
            in_quotes = true;
        } else {
            field.push(c);
        }
    }

    fields.push(finish_field(&mut field));
    fields
}

/// Non-blank lines of `text`, with trailing carriage returns removed.
fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
}

/// Tokenize a whole document. Blank lines are dropped, and with
/// `skip_header` so is the first remaining line.
pub fn parse_document(text: &str, options: &CsvOptions) -> Vec<CsvRow> {
    let skip = usize::from(options.skip_header);
    content_lines(text)
        .skip(skip)
        .map(|line| parse_line(line, options))
        .collect()
}

/// A document with its header row split off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvTable {
    pub headers: CsvRow,
    pub rows: Vec<CsvRow>,
}

impl CsvTable {
    /// Rows keyed by header name.
    ///
    /// Cells beyond the header are dropped, missing trailing cells are left
    /// out of the record, and columns with an empty header are skipped.
    pub fn records(&self) -> Vec<AttributeRecord> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .zip(row)
                    .filter(|(header, _)| !header.is_empty())
                    .map(|(header, cell)| (header.clone(), cell.clone()))
                    .collect()
            })
            .collect()
    }
}

/// Tokenize a document whose first non-blank line is the header.
pub fn parse_table(text: &str, options: &CsvOptions) -> CsvTable {
    let mut lines = content_lines(text).map(|line| parse_line(line, options));
    let headers = lines.next().unwrap_or_default();
    CsvTable {
        headers,
        rows: lines.collect(),
    }
}

/// Guess the delimiter from the first lines of a document.
///
/// Each candidate is scored by how many sampled lines share the first line's
/// field count, times that count. Candidates that leave the first line whole
/// are skipped. Falls back to a comma.
pub fn sniff_delimiter(text: &str) -> char {
    let sample: Vec<&str> = content_lines(text).take(SNIFF_SAMPLE_LINES).collect();

    let mut best = ',';
    let mut best_score = 0usize;

    for delimiter in SNIFF_CANDIDATES {
        let options = CsvOptions::new().delimiter(delimiter);
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| parse_line(line, &options).len())
            .collect();

        let target = match counts.first() {
            Some(&n) if n > 1 => n,
            _ => continue,
        };
        let consistent = counts.iter().filter(|&&c| c == target).count();
        let score = consistent * target;

        if score > best_score {
            best_score = score;
            best = delimiter;
        }
    }

    best
}
