//! Shared DTOs (schemas-as-code) for the a11yfix workspace.
//!
//! # Design constraints
//! - These types are printed as JSON by `a11yfix --format json`.
//! - Prefer adding optional fields over changing semantics.

pub mod report;

/// Schema identifiers.
pub mod schema {
    pub const A11YFIX_REPORT_V1: &str = "a11yfix.report.v1";
}
