//! STS API endpoints.

use crate::error::from_sdk;
use crate::AwsBackend;
use eventaudit_core::{AuditError, CallerIdentity, Result};
use tracing::{debug, instrument};

/// STS API endpoints
pub struct IdentityApi<'a> {
    client: &'a AwsBackend,
}

impl<'a> IdentityApi<'a> {
    pub(crate) const fn new(client: &'a AwsBackend) -> Self {
        Self { client }
    }

    /// Resolve the account and principal behind the loaded credentials.
    ///
    /// Any failure here is an authentication failure: without a caller
    /// identity nothing else can be audited.
    #[instrument(skip(self), fields(service = "sts"))]
    pub async fn caller_identity(&self) -> Result<CallerIdentity> {
        let output = self
            .client
            .sts_sdk()
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| match from_sdk("GetCallerIdentity", "caller", e) {
                AuditError::Authentication(msg) => AuditError::Authentication(msg),
                other => AuditError::Authentication(other.to_string()),
            })?;

        let account = output
            .account()
            .ok_or_else(|| AuditError::Authentication("caller identity has no account".into()))?;
        debug!(account, "resolved caller identity");

        Ok(CallerIdentity {
            account: account.to_string(),
            arn: output.arn().unwrap_or_default().to_string(),
        })
    }
}
