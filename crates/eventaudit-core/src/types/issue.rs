use serde::{Deserialize, Serialize};

/// Issue severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth knowing, no action required
    Info,
    /// Operational risk
    Warning,
    /// Delivery failure or data exposure
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Fixed taxonomy of detected problems
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Enabled archive without a customer managed KMS key
    NoEncryption,
    /// Event bus has no resource policy
    MissingResourcePolicy,
    /// One or more required tags are absent
    MissingRequiredTags,
    /// Event pattern matches too many events
    OverlyBroadPattern,
    /// FIFO queue target without a message group id
    SqsFifoNoGroupId,
    /// Lambda target whose reserved concurrency serializes invocations
    LambdaThrottling,
    /// No target of the rule overrides the default retry policy
    NoCustomRetryPolicy,
    /// No invocations during the lookback window
    RuleInactive,
    /// Target resource could not be inspected
    TargetUnresolvable,
    /// Target has no dead-letter queue
    MissingDeadLetterQueue,
    /// Dead-letter queue holds undelivered events
    DeadLetterQueueBacklog,
    /// No alarm watches the rule's failed invocations
    MissingFailureAlarm,
}

impl IssueKind {
    /// Snake-case identifier used in reports
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoEncryption => "no_encryption",
            Self::MissingResourcePolicy => "missing_resource_policy",
            Self::MissingRequiredTags => "missing_required_tags",
            Self::OverlyBroadPattern => "overly_broad_pattern",
            Self::SqsFifoNoGroupId => "sqs_fifo_no_group_id",
            Self::LambdaThrottling => "lambda_throttling",
            Self::NoCustomRetryPolicy => "no_custom_retry_policy",
            Self::RuleInactive => "rule_inactive",
            Self::TargetUnresolvable => "target_unresolvable",
            Self::MissingDeadLetterQueue => "missing_dead_letter_queue",
            Self::DeadLetterQueueBacklog => "dead_letter_queue_backlog",
            Self::MissingFailureAlarm => "missing_failure_alarm",
        }
    }

    /// Severity every issue of this kind carries
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::NoEncryption | Self::SqsFifoNoGroupId => Severity::Critical,
            Self::MissingResourcePolicy
            | Self::MissingRequiredTags
            | Self::OverlyBroadPattern
            | Self::LambdaThrottling
            | Self::TargetUnresolvable
            | Self::DeadLetterQueueBacklog => Severity::Warning,
            Self::NoCustomRetryPolicy
            | Self::RuleInactive
            | Self::MissingDeadLetterQueue
            | Self::MissingFailureAlarm => Severity::Info,
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem attached to exactly one bus, rule or target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue type
    #[serde(rename = "type")]
    pub kind: IssueKind,

    /// Severity
    pub severity: Severity,

    /// Human-readable explanation naming the offending field and value
    pub details: String,
}

impl Issue {
    /// Create an issue with the severity fixed by its kind
    #[must_use]
    pub fn new(kind: IssueKind, details: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            details: details.into(),
        }
    }
}

/// Returns true if any issue in the slice has the given kind
#[must_use]
pub fn has_issue(issues: &[Issue], kind: IssueKind) -> bool {
    issues.iter().any(|i| i.kind == kind)
}
