use super::{EventBus, IssueKind, Rule, Severity, TopologyGraph};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category of a non-fatal problem met during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningKind {
    /// A resource could not be collected and was skipped
    Collection,
    /// A field could not be parsed and was treated as absent
    Parse,
    /// An enrichment lookup failed and a fail-open default was used
    Enrichment,
}

/// A non-fatal problem recorded during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionWarning {
    /// Category
    pub kind: WarningKind,
    /// Resource the warning concerns (name or ARN)
    pub resource: String,
    /// What went wrong
    pub message: String,
}

impl CollectionWarning {
    /// Create a warning
    #[must_use]
    pub fn new(kind: WarningKind, resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            resource: resource.into(),
            message: message.into(),
        }
    }
}

/// Issue tally per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    /// Info issues
    pub info: usize,
    /// Warning issues
    pub warning: usize,
    /// Critical issues
    pub critical: usize,
}

impl SeverityCounts {
    /// Count one issue
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Info => self.info += 1,
            Severity::Warning => self.warning += 1,
            Severity::Critical => self.critical += 1,
        }
    }

    /// Count for one severity
    #[must_use]
    pub const fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Info => self.info,
            Severity::Warning => self.warning,
            Severity::Critical => self.critical,
        }
    }

    /// Total issues
    #[must_use]
    pub const fn total(&self) -> usize {
        self.info + self.warning + self.critical
    }
}

/// Roll-up of one audit run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Audited account
    pub account_id: String,
    /// Audited region, when known
    pub region: Option<String>,
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    /// Buses returned by `ListEventBuses`
    pub buses_discovered: usize,
    /// Buses fully collected and analyzed
    pub buses_audited: usize,
    /// Rules returned by `ListRules` on collected buses
    pub rules_discovered: usize,
    /// Rules fully collected and analyzed
    pub rules_audited: usize,
    /// Targets of audited rules
    pub targets_audited: usize,
    /// Issue counts per severity
    pub issues_by_severity: SeverityCounts,
    /// Issue counts per type
    pub issues_by_type: BTreeMap<IssueKind, usize>,
    /// Non-fatal problems met during the run
    pub warnings: Vec<CollectionWarning>,
    /// False if the run was cancelled or skipped anything
    pub complete: bool,
}

/// The audit result handed to callers for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Summary counts
    pub summary: Summary,
    /// Audited buses with their issues
    pub buses: Vec<EventBus>,
    /// Audited rules with their targets and issues
    pub rules: Vec<Rule>,
    /// Graph for visualization
    pub topology: TopologyGraph,
}

impl Report {
    /// Find an audited rule by bus and name
    #[must_use]
    pub fn rule(&self, bus: &str, name: &str) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|r| r.event_bus_name == bus && r.name == name)
    }

    /// Find an audited bus by name
    #[must_use]
    pub fn bus(&self, name: &str) -> Option<&EventBus> {
        self.buses.iter().find(|b| b.name == name)
    }
}
