//! Request handlers for compare operations.

mod compare;
mod csv;
mod diff;
mod preferences;

pub use compare::*;
pub use csv::*;
pub use diff::*;
pub use preferences::*;
