//! Read-only auditor for Amazon EventBridge configuration.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use eventaudit::{audit_account, AuditConfig, ClientConfig, Severity};
//!
//! #[tokio::main]
//! async fn main() -> eventaudit::Result<()> {
//!     let client = ClientConfig::new().region("us-east-1");
//!     let report = audit_account(client, AuditConfig::default()).await?;
//!
//!     println!("Buses audited: {}", report.summary.buses_audited);
//!     println!(
//!         "Critical issues: {}",
//!         report.summary.issues_by_severity.get(Severity::Critical)
//!     );
//!     println!("{}", eventaudit::serde_json::to_string_pretty(&report)?);
//!
//!     Ok(())
//! }
//! ```

// Re-export core types
pub use eventaudit_core::*;

// Re-export client
pub use eventaudit_client::{AwsBackend, AwsBackendBuilder, ClientConfig};

// Re-export engine
pub use eventaudit_engine::{checks, AuditConfig, Auditor};

// Re-export runtime for convenience
pub use serde;
pub use serde_json;
pub use tokio;
pub use tokio_util::sync::CancellationToken;

/// Audit the account and region `client` resolves to.
///
/// # Errors
///
/// Returns `AuditError::Config` for invalid settings and
/// `AuditError::Authentication` when no caller identity can be established.
/// Other failures are reported as warnings inside the [`Report`].
pub async fn audit_account(client: ClientConfig, config: AuditConfig) -> Result<Report> {
    config.validate()?;
    let backend = AwsBackendBuilder::with_config(client).load().await;
    Auditor::new(backend, config).run().await
}
