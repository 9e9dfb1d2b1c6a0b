//! Plain records returned by an [`AccountBackend`](crate::AccountBackend).
//!
//! These mirror the AWS responses closely and carry no analysis; the
//! collector turns them into [`EventBus`](super::EventBus),
//! [`Rule`](super::Rule) and [`Target`](super::Target).

use super::{RetryPolicy, SqsParameters};
use serde::{Deserialize, Serialize};

/// Result of `sts:GetCallerIdentity`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// Account id
    pub account: String,
    /// Caller ARN
    pub arn: String,
}

/// Entry from `events:ListEventBuses`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusSummary {
    /// Bus name
    pub name: String,
    /// Bus ARN
    pub arn: String,
}

/// Result of `events:DescribeEventBus`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusDescription {
    /// Bus ARN
    pub arn: String,
    /// Resource policy document, if any
    pub policy: Option<String>,
}

/// Entry from `events:ListArchives`, which omits the KMS key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    /// Archive name
    pub name: String,
    /// Raw state string
    pub state: String,
    /// Source bus ARN
    pub event_source_arn: String,
}

/// Entry from `events:ListRules`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    /// Rule name
    pub name: String,
    /// Rule ARN
    pub arn: String,
    /// Owning bus name
    pub event_bus_name: String,
    /// Raw state string
    pub state: String,
    /// Raw `EventPattern` JSON text
    pub event_pattern: Option<String>,
    /// Schedule expression
    pub schedule_expression: Option<String>,
}

/// Entry from `events:ListTargetsByRule`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRecord {
    /// Target id
    pub id: String,
    /// Target ARN
    pub arn: String,
    /// Retry policy, if configured
    pub retry_policy: Option<RetryPolicy>,
    /// SQS parameters, if configured
    pub sqs_parameters: Option<SqsParameters>,
    /// Dead-letter queue ARN
    pub dead_letter_arn: Option<String>,
}

/// Query for `cloudwatch:GetMetricStatistics`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricQuery {
    /// Metric namespace
    pub namespace: String,
    /// Metric name
    pub metric_name: String,
    /// Dimension name/value pairs
    pub dimensions: Vec<(String, String)>,
    /// Window start, seconds since the epoch
    pub start_epoch_secs: i64,
    /// Window end, seconds since the epoch
    pub end_epoch_secs: i64,
    /// Datapoint period in seconds
    pub period_secs: i32,
}

/// Alarm from `cloudwatch:DescribeAlarms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmRecord {
    /// Alarm name
    pub name: String,
    /// Watched namespace
    pub namespace: Option<String>,
    /// Watched metric
    pub metric_name: Option<String>,
    /// Dimension name/value pairs
    pub dimensions: Vec<(String, String)>,
}

impl AlarmRecord {
    /// Value of the named dimension
    #[must_use]
    pub fn dimension(&self, name: &str) -> Option<&str> {
        self.dimensions
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}
