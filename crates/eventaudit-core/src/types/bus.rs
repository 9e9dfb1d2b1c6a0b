use super::{Issue, Tags};
use serde::{Deserialize, Serialize};

/// Name of the account's default event bus
pub const DEFAULT_BUS_NAME: &str = "default";

/// An audited event bus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBus {
    /// Bus name
    pub name: String,

    /// Bus ARN
    pub arn: String,

    /// Whether `DescribeEventBus` returned a resource policy
    pub has_resource_policy: bool,

    /// Archives whose event source is this bus
    #[serde(default)]
    pub archives: Vec<Archive>,

    /// Resource tags
    #[serde(default)]
    pub tags: Tags,

    /// Issues raised against the bus itself
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// Archive lifecycle state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArchiveState {
    /// Archiving events
    Enabled,
    /// Not archiving
    Disabled,
    /// Any other state reported by AWS (creating, updating, failed, ...)
    Other(String),
}

impl ArchiveState {
    /// Parse the state string returned by `ListArchives`
    #[must_use]
    pub fn parse(state: &str) -> Self {
        match state {
            "ENABLED" => Self::Enabled,
            "DISABLED" => Self::Disabled,
            other => Self::Other(other.to_string()),
        }
    }
}

/// An event archive attached to a bus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Archive {
    /// Archive name
    pub name: String,

    /// Lifecycle state
    pub state: ArchiveState,

    /// Customer managed KMS key, empty when AWS owned keys are used
    #[serde(default)]
    pub kms_key_id: String,

    /// `DescribeArchive` failed, so `kms_key_id` is not known
    #[serde(default)]
    pub key_unknown: bool,

    /// ARN of the bus the archive records
    pub event_source_arn: String,
}

impl Archive {
    /// Enabled archives known to have no customer managed key
    #[must_use]
    pub fn is_unencrypted(&self) -> bool {
        self.state == ArchiveState::Enabled
            && !self.key_unknown
            && self.kms_key_id.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive(state: &str, key: &str) -> Archive {
        Archive {
            name: "orders-archive".into(),
            state: ArchiveState::parse(state),
            kms_key_id: key.into(),
            key_unknown: false,
            event_source_arn: "arn:aws:events:us-east-1:123456789012:event-bus/app-bus".into(),
        }
    }

    #[test]
    fn only_enabled_archives_without_key_are_unencrypted() {
        assert!(archive("ENABLED", "").is_unencrypted());
        assert!(!archive("ENABLED", "alias/events").is_unencrypted());
        assert!(!archive("DISABLED", "").is_unencrypted());
        assert!(!archive("CREATING", "").is_unencrypted());
    }

    #[test]
    fn unknown_key_is_not_reported_unencrypted() {
        let mut unread = archive("ENABLED", "");
        unread.key_unknown = true;
        assert!(!unread.is_unencrypted());
    }
}
