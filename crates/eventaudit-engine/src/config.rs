//! Audit run configuration.

use crate::checks::{LAMBDA_THROTTLE_THRESHOLD, REQUIRED_TAGS};
use eventaudit_core::{AuditError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Longest lookback CloudWatch can answer; it keeps daily datapoints for 455 days
pub const MAX_LOOKBACK_DAYS: u32 = 455;

/// Settings for one audit run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Buses collected concurrently (default: 8)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Rules collected concurrently within one bus (default: 4)
    #[serde(default = "default_rule_concurrency")]
    pub rule_concurrency: usize,

    /// Invocation metrics lookback window in days (default: 30, max: 455)
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Tag keys every bus and rule must carry (case-sensitive)
    #[serde(default = "default_required_tags")]
    pub required_tags: Vec<String>,

    /// Reserved concurrency at or below which a Lambda target is flagged
    #[serde(default = "default_lambda_threshold")]
    pub lambda_throttle_threshold: i32,

    /// Flag targets without a DLQ and inspect DLQ depth
    #[serde(default = "default_true")]
    pub check_dead_letter_queues: bool,

    /// Flag enabled rules without a `FailedInvocations` alarm
    #[serde(default = "default_true")]
    pub check_failure_alarms: bool,

    /// Stop collecting after this many seconds and report what was gathered
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            rule_concurrency: default_rule_concurrency(),
            lookback_days: default_lookback_days(),
            required_tags: default_required_tags(),
            lambda_throttle_threshold: default_lambda_threshold(),
            check_dead_letter_queues: true,
            check_failure_alarms: true,
            deadline_secs: None,
        }
    }
}

impl AuditConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AuditError::Config(format!("failed to read {}: {e}", path.display())))?;
        let config: Self =
            toml::from_str(&content).map_err(|e| AuditError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would stall or trivialize a run
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 || self.rule_concurrency == 0 {
            return Err(AuditError::Config("concurrency must be at least 1".into()));
        }
        if !(1..=MAX_LOOKBACK_DAYS).contains(&self.lookback_days) {
            return Err(AuditError::Config(format!(
                "lookback_days must be between 1 and {MAX_LOOKBACK_DAYS}"
            )));
        }
        Ok(())
    }

    /// Set bus concurrency
    #[must_use]
    pub const fn concurrency(mut self, workers: usize) -> Self {
        self.concurrency = workers;
        self
    }

    /// Set rule concurrency
    #[must_use]
    pub const fn rule_concurrency(mut self, workers: usize) -> Self {
        self.rule_concurrency = workers;
        self
    }

    /// Set the required tag keys
    #[must_use]
    pub fn required_tags<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_tags = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set the Lambda reserved concurrency threshold
    #[must_use]
    pub const fn lambda_throttle_threshold(mut self, threshold: i32) -> Self {
        self.lambda_throttle_threshold = threshold;
        self
    }

    /// Set the collection deadline
    #[must_use]
    pub const fn deadline_secs(mut self, secs: u64) -> Self {
        self.deadline_secs = Some(secs);
        self
    }
}

// Default value functions for serde.
const fn default_concurrency() -> usize {
    8
}

const fn default_rule_concurrency() -> usize {
    4
}

const fn default_lookback_days() -> u32 {
    30
}

fn default_required_tags() -> Vec<String> {
    REQUIRED_TAGS.iter().map(ToString::to_string).collect()
}

const fn default_lambda_threshold() -> i32 {
    LAMBDA_THROTTLE_THRESHOLD
}

const fn default_true() -> bool {
    true
}
