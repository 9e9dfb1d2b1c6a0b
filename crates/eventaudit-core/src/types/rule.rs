use super::{Issue, Tags, Target};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rule state as reported by `ListRules`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleState {
    /// Rule is matching events
    Enabled,
    /// Rule is switched off
    Disabled,
    /// Enabled and also matching CloudTrail management events
    EnabledWithAllCloudtrailManagementEvents,
}

impl RuleState {
    /// Parse the state string, treating unknown values as disabled
    #[must_use]
    pub fn parse(state: &str) -> Self {
        match state {
            "ENABLED" => Self::Enabled,
            "ENABLED_WITH_ALL_CLOUDTRAIL_MANAGEMENT_EVENTS" => {
                Self::EnabledWithAllCloudtrailManagementEvents
            }
            _ => Self::Disabled,
        }
    }

    /// Returns true if the rule is matching events
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

/// Where a rule's invocation count came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricSource {
    /// `metric:DailyInvocations` tag hint
    Tag,
    /// CloudWatch `GetMetricStatistics`
    CloudWatch,
    /// Lookup failed; the count is a default, not a measurement
    Unavailable,
}

/// Invocation activity of a rule over the lookback window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMetrics {
    /// Summed invocations over the window
    #[serde(rename = "invocationSum30d")]
    pub invocation_sum_30d: f64,

    /// `invocation_sum_30d > 0`
    pub has_recent_activity: bool,

    /// Provenance of the count
    pub source: MetricSource,
}

impl RuleMetrics {
    /// Metrics from a measured or hinted invocation count
    #[must_use]
    pub fn measured(invocation_sum: f64, source: MetricSource) -> Self {
        Self {
            invocation_sum_30d: invocation_sum,
            has_recent_activity: invocation_sum > 0.0,
            source,
        }
    }

    /// Fail-open default used when CloudWatch could not be queried
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            invocation_sum_30d: 0.0,
            has_recent_activity: false,
            source: MetricSource::Unavailable,
        }
    }

    /// Returns true when the count is a default rather than data
    #[must_use]
    pub fn is_insufficient_data(&self) -> bool {
        self.source == MetricSource::Unavailable
    }
}

/// An audited rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Rule name, unique within its bus
    pub name: String,

    /// Rule ARN
    pub arn: String,

    /// Name of the bus the rule lives on
    pub event_bus_name: String,

    /// Rule state
    pub state: RuleState,

    /// Parsed event pattern; `None` when absent or unparsable
    #[serde(default)]
    pub pattern: Option<Value>,

    /// Schedule expression for scheduled rules
    #[serde(default)]
    pub schedule_expression: Option<String>,

    /// Delivery targets
    #[serde(default)]
    pub targets: Vec<Target>,

    /// Resource tags
    #[serde(default)]
    pub tags: Tags,

    /// Invocation activity, filled in by the metrics correlator
    #[serde(default)]
    pub metrics: Option<RuleMetrics>,

    /// Issues raised against the rule itself
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl Rule {
    /// Returns true if the rule is matching events
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }
}
