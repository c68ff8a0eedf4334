//! Human-readable progress and solution output.
pub mod report;

pub use report::{format_banner, format_bytes, format_outcome, format_report, format_solution};
