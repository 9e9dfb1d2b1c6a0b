//! Core types and traits for the EventBridge configuration auditor.
//!
//! This crate provides the foundational types shared by the client and the
//! analysis engine:
//!
//! - **Types**: the audited inventory (buses, rules, targets), issues, the
//!   topology graph and the final report
//! - **Backend**: the [`AccountBackend`] trait, the read-only seam to AWS
//! - **Errors**: error classification with [`AuditError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use eventaudit_core::{Report, Severity};
//!
//! fn print_summary(report: &Report) {
//!     println!("Buses audited: {}", report.summary.buses_audited);
//!     println!("Critical issues: {}", report.summary.issues_by_severity.get(Severity::Critical));
//! }
//! ```

mod backend;
mod error;
pub mod types;

pub use backend::AccountBackend;
pub use error::{AuditError, Result};
pub use types::*;
