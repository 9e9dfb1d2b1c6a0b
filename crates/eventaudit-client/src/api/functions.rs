//! Lambda API endpoints.

use crate::error::from_sdk;
use crate::AwsBackend;
use eventaudit_core::{ReservedConcurrency, Result};
use tracing::instrument;

/// Drop an alias or version qualifier from a function ARN.
///
/// `GetFunctionConcurrency` rejects qualified ARNs
/// (`arn:aws:lambda:<region>:<account>:function:<name>:<qualifier>`).
/// Anything that is not a Lambda function ARN is returned unchanged.
pub fn unqualified_function_arn(function_arn: &str) -> &str {
    if !function_arn.starts_with("arn:") {
        return function_arn;
    }
    match function_arn.match_indices(':').nth(6) {
        Some((idx, _)) => &function_arn[..idx],
        None => function_arn,
    }
}

/// Lambda API endpoints
pub struct FunctionsApi<'a> {
    client: &'a AwsBackend,
}

impl<'a> FunctionsApi<'a> {
    pub(crate) const fn new(client: &'a AwsBackend) -> Self {
        Self { client }
    }

    /// Reserved concurrency of a function, `None` when unreserved
    #[instrument(skip(self), fields(service = "lambda"))]
    pub async fn reserved_concurrency(&self, function_arn: &str) -> Result<ReservedConcurrency> {
        let output = self
            .client
            .lambda_sdk()
            .get_function_concurrency()
            .function_name(unqualified_function_arn(function_arn))
            .send()
            .await
            .map_err(|e| from_sdk("GetFunctionConcurrency", function_arn, e))?;

        Ok(output.reserved_concurrent_executions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifiers_are_stripped() {
        let bare = "arn:aws:lambda:us-east-1:123456789012:function:handler";
        assert_eq!(unqualified_function_arn(bare), bare);
        assert_eq!(
            unqualified_function_arn("arn:aws:lambda:us-east-1:123456789012:function:handler:prod"),
            bare
        );
        assert_eq!(
            unqualified_function_arn("arn:aws:lambda:us-east-1:123456789012:function:handler:7"),
            bare
        );
    }

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(unqualified_function_arn("handler"), "handler");
    }
}
