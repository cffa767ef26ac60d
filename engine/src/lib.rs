//! # Cockpit Engine
//!
//! Deterministic comparison logic behind the Cockpit device-sync and
//! configuration-diff views.
//!
//! This crate compares device attributes between two systems of record,
//! classifies pre-computed line diffs for the side-by-side viewer, and
//! tokenizes CSV for bulk device imports. The same inputs always produce the
//! same outputs.
//!
//! ## Design Principles
//!
//! - **No IO**: Engine has no knowledge of files, network, or platform
//! - **Deterministic**: Same inputs always produce same outputs
//! - **Stateless**: Every operation is a pure function of its arguments
//! - **Testable**: Pure logic, no mocks needed
//!
//! ## Core Concepts
//!
//! ### Attribute reconciliation
//!
//! An [`AttributeRecord`] is one system's view of a device. The
//! [`Reconciler`] produces one [`AttributeComparison`] per key in the union of
//! two records. Values compare by canonical encoding, so nested maps compare
//! by content. A key missing on one side is reported as missing, never as
//! different.
//!
//! ### Line diffs
//!
//! [`compute_stats`], [`filter_unchanged`] and [`find_change_sections`]
//! operate on [`DiffLine`] sequences produced by an upstream diff.
//! [`SideBySideDiff`] pairs the two columns and rejects sequences of unequal
//! length. [`ChangeNavigator`] walks the change sections with clamped moves.
//!
//! ### CSV
//!
//! [`parse_line`] and [`parse_document`] tokenize delimited text. They never
//! fail.
//!
//! ## Quick Start
//!
//! ```rust
//! use cockpit_engine::{reconcile, AttributeRecord, CsvOptions, parse_line};
//! use serde_json::json;
//!
//! let nautobot = AttributeRecord::from_json(json!({"name": "r1", "site": "DC1"})).unwrap();
//! let checkmk = AttributeRecord::from_json(json!({"name": "r1", "site": "DC2"})).unwrap();
//!
//! let result = reconcile(&nautobot, &checkmk, Vec::<String>::new()).unwrap();
//! assert!(!result[0].is_different);
//! assert!(result[1].is_different);
//!
//! let fields = parse_line(r#"r1,"10.0.0.1","Data Center""#, &CsvOptions::default());
//! assert_eq!(fields, vec!["r1", "10.0.0.1", "Data Center"]);
//! ```

pub mod csv;
pub mod diff;
pub mod error;
pub mod navigator;
pub mod prefs;
pub mod reconcile;
pub mod record;
pub mod value;

// Re-export main types at crate root
pub use csv::{parse_document, parse_line, parse_table, sniff_delimiter, CsvOptions, CsvTable};
pub use diff::{
    compute_stats, filter_unchanged, find_change_sections, DiffLine, DiffLineType, DiffRow,
    DiffStats, IndexedLine, SideBySideDiff,
};
pub use error::Error;
pub use navigator::ChangeNavigator;
pub use prefs::{MemoryPreferenceStore, PreferenceStore, ViewPreferences};
pub use reconcile::{
    reconcile, AttributeComparison, ComparisonStatus, ReconcileReport, ReconcileSummary,
    Reconciler,
};
pub use record::AttributeRecord;
pub use value::{AttributeValue, CanonicalError};

/// Type aliases for clarity
/// Engine crate version, reported by the server's health check.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub type AttributeKey = String;
pub type CsvRow = Vec<String>;
