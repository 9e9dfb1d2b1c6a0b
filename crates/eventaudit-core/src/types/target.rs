use super::Issue;
use serde::{Deserialize, Serialize};

/// AWS default number of delivery attempts
pub const DEFAULT_MAX_ATTEMPTS: i32 = 185;

/// AWS default maximum event age, in seconds (24 hours)
pub const DEFAULT_MAX_EVENT_AGE_SECONDS: i32 = 86_400;

/// Downstream service a target delivers to, derived once from its ARN
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    /// SQS queue
    Sqs,
    /// Lambda function
    Lambda,
    /// SNS topic
    Sns,
    /// Step Functions state machine
    States,
    /// Kinesis data stream
    Kinesis,
    /// Kinesis Data Firehose delivery stream
    Firehose,
    /// Another event bus or an API destination
    Events,
    /// CloudWatch Logs log group
    Logs,
    /// Anything else, keyed by the ARN service segment
    Other(String),
}

impl ServiceType {
    /// Derive the service from an ARN (`arn:partition:service:...`)
    #[must_use]
    pub fn from_arn(arn: &str) -> Self {
        match arn.split(':').nth(2).unwrap_or_default() {
            "sqs" => Self::Sqs,
            "lambda" => Self::Lambda,
            "sns" => Self::Sns,
            "states" => Self::States,
            "kinesis" => Self::Kinesis,
            "firehose" => Self::Firehose,
            "events" => Self::Events,
            "logs" => Self::Logs,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqs => write!(f, "sqs"),
            Self::Lambda => write!(f, "lambda"),
            Self::Sns => write!(f, "sns"),
            Self::States => write!(f, "states"),
            Self::Kinesis => write!(f, "kinesis"),
            Self::Firehose => write!(f, "firehose"),
            Self::Events => write!(f, "events"),
            Self::Logs => write!(f, "logs"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Target retry policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    /// Maximum delivery attempts
    #[serde(default)]
    pub max_attempts: Option<i32>,

    /// Maximum event age before it is dropped
    #[serde(default)]
    pub max_event_age_seconds: Option<i32>,
}

impl RetryPolicy {
    /// Returns true if either field is set to something other than the AWS default
    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.max_attempts.is_some_and(|n| n != DEFAULT_MAX_ATTEMPTS)
            || self
                .max_event_age_seconds
                .is_some_and(|n| n != DEFAULT_MAX_EVENT_AGE_SECONDS)
    }
}

/// SQS delivery parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqsParameters {
    /// FIFO message group id
    #[serde(default)]
    pub message_group_id: Option<String>,
}

/// Outcome of an auxiliary lookup made while collecting a target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "value")]
pub enum Lookup<T> {
    /// The lookup succeeded
    Found(T),
    /// The lookup failed; the message explains why
    Failed(String),
}

impl<T> Lookup<T> {
    /// The value, if the lookup succeeded
    #[must_use]
    pub const fn found(&self) -> Option<&T> {
        match self {
            Self::Found(v) => Some(v),
            Self::Failed(_) => None,
        }
    }
}

/// Lambda reserved concurrency; `None` when the function has no reservation
pub type ReservedConcurrency = Option<i32>;

/// An audited rule target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    /// Target id, unique within its rule
    pub id: String,

    /// Target resource ARN
    pub arn: String,

    /// Name of the rule this target belongs to
    pub rule_name: String,

    /// Service derived from the ARN
    pub service_type: ServiceType,

    /// Retry policy, if one was configured
    #[serde(default)]
    pub retry_policy: Option<RetryPolicy>,

    /// SQS parameters, if configured
    #[serde(default)]
    pub sqs_parameters: Option<SqsParameters>,

    /// Dead-letter queue ARN
    #[serde(default)]
    pub dead_letter_arn: Option<String>,

    /// Reserved concurrency lookup for Lambda targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lambda: Option<Lookup<ReservedConcurrency>>,

    /// Approximate message count of the dead-letter queue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dead_letter_depth: Option<Lookup<u64>>,

    /// Issues raised against the target
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl Target {
    /// Returns true for FIFO queue targets
    #[must_use]
    pub fn is_fifo_queue(&self) -> bool {
        self.service_type == ServiceType::Sqs && self.arn.ends_with(".fifo")
    }

    /// The configured message group id, treating blank as absent
    #[must_use]
    pub fn message_group_id(&self) -> Option<&str> {
        self.sqs_parameters
            .as_ref()
            .and_then(|p| p.message_group_id.as_deref())
            .filter(|id| !id.trim().is_empty())
    }

    /// Returns true if the target overrides the default retry policy
    #[must_use]
    pub fn has_custom_retry_policy(&self) -> bool {
        self.retry_policy.is_some_and(|p| p.is_custom())
    }
}
