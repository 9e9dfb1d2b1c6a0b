//! SQS API endpoints.

use crate::error::from_sdk;
use crate::AwsBackend;
use aws_sdk_sqs::types::QueueAttributeName;
use eventaudit_core::{AuditError, Result};
use tracing::instrument;

/// Components of an SQS queue ARN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueArn<'a> {
    /// Owning account id
    pub account: &'a str,
    /// Queue name
    pub name: &'a str,
}

/// Split `arn:aws:sqs:<region>:<account>:<name>` into account and name
#[must_use]
pub fn parse_queue_arn(arn: &str) -> Option<QueueArn<'_>> {
    let mut parts = arn.splitn(6, ':');
    if parts.next()? != "arn" {
        return None;
    }
    let _partition = parts.next()?;
    if parts.next()? != "sqs" {
        return None;
    }
    let _region = parts.next()?;
    let account = parts.next().filter(|a| !a.is_empty())?;
    let name = parts.next().filter(|n| !n.is_empty())?;
    Some(QueueArn { account, name })
}

/// SQS API endpoints
pub struct QueuesApi<'a> {
    client: &'a AwsBackend,
}

impl<'a> QueuesApi<'a> {
    pub(crate) const fn new(client: &'a AwsBackend) -> Self {
        Self { client }
    }

    /// Approximate number of visible messages in the queue named by an ARN
    #[instrument(skip(self), fields(service = "sqs"))]
    pub async fn depth(&self, queue_arn: &str) -> Result<u64> {
        let queue = parse_queue_arn(queue_arn)
            .ok_or_else(|| AuditError::Internal(format!("not an SQS queue ARN: {queue_arn}")))?;

        let url_output = self
            .client
            .sqs_sdk()
            .get_queue_url()
            .queue_name(queue.name)
            .queue_owner_aws_account_id(queue.account)
            .send()
            .await
            .map_err(|e| from_sdk("GetQueueUrl", queue_arn, e))?;
        let url = url_output.queue_url().ok_or_else(|| AuditError::NotFound {
            resource: queue_arn.to_string(),
        })?;

        let output = self
            .client
            .sqs_sdk()
            .get_queue_attributes()
            .queue_url(url)
            .attribute_names(QueueAttributeName::ApproximateNumberOfMessages)
            .send()
            .await
            .map_err(|e| from_sdk("GetQueueAttributes", queue_arn, e))?;

        Ok(output
            .attributes()
            .and_then(|attrs| attrs.get(&QueueAttributeName::ApproximateNumberOfMessages))
            .and_then(|count| count.parse().ok())
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_queue_arn() {
        let queue = parse_queue_arn("arn:aws:sqs:us-east-1:123456789012:orders-dlq.fifo").unwrap();
        assert_eq!(queue.account, "123456789012");
        assert_eq!(queue.name, "orders-dlq.fifo");
    }

    #[test]
    fn rejects_other_services() {
        assert!(parse_queue_arn("arn:aws:sns:us-east-1:123456789012:topic").is_none());
        assert!(parse_queue_arn("arn:aws:sqs:us-east-1:123456789012").is_none());
        assert!(parse_queue_arn("orders-dlq").is_none());
    }
}
