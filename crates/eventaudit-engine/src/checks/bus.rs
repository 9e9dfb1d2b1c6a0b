//! Bus-level checks.

use super::tags::check_required_tags;
use crate::AuditConfig;
use eventaudit_core::{EventBus, Issue, IssueKind};

/// One `no_encryption` issue per enabled archive without a KMS key
pub fn check_encryption(bus: &EventBus) -> Vec<Issue> {
    bus.archives
        .iter()
        .filter(|a| a.is_unencrypted())
        .map(|a| {
            Issue::new(
                IssueKind::NoEncryption,
                format!(
                    "archive \"{}\" is ENABLED with an empty kmsKeyId; events are stored without a customer managed key",
                    a.name
                ),
            )
        })
        .collect()
}

/// `missing_resource_policy` when `DescribeEventBus` returned no policy
pub fn check_resource_policy(bus: &EventBus) -> Option<Issue> {
    (!bus.has_resource_policy).then(|| {
        Issue::new(
            IssueKind::MissingResourcePolicy,
            format!("event bus \"{}\" has no resource policy (Policy is empty)", bus.name),
        )
    })
}

/// Every bus-level check, in a fixed order
pub fn evaluate_bus(bus: &EventBus, config: &AuditConfig) -> Vec<Issue> {
    let mut issues = check_encryption(bus);
    issues.extend(check_resource_policy(bus));
    issues.extend(check_required_tags(&bus.tags, &config.required_tags));
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventaudit_core::{has_issue, Archive, ArchiveState, Tags};

    fn bus(policy: bool, archives: Vec<Archive>) -> EventBus {
        EventBus {
            name: "app-bus".into(),
            arn: "arn:aws:events:us-east-1:123456789012:event-bus/app-bus".into(),
            has_resource_policy: policy,
            archives,
            tags: [("Owner", "ops"), ("Application", "shop")].into_iter().collect::<Tags>(),
            issues: Vec::new(),
        }
    }

    fn archive(name: &str, state: ArchiveState, key: &str) -> Archive {
        Archive {
            name: name.into(),
            state,
            kms_key_id: key.into(),
            key_unknown: false,
            event_source_arn: "arn:aws:events:us-east-1:123456789012:event-bus/app-bus".into(),
        }
    }

    #[test]
    fn clean_bus_has_no_issues() {
        let clean = bus(true, vec![archive("a", ArchiveState::Enabled, "alias/events")]);
        assert!(evaluate_bus(&clean, &AuditConfig::default()).is_empty());
    }

    #[test]
    fn each_unencrypted_archive_is_reported() {
        let b = bus(
            true,
            vec![
                archive("orders", ArchiveState::Enabled, ""),
                archive("audit", ArchiveState::Enabled, ""),
                archive("old", ArchiveState::Disabled, ""),
            ],
        );
        let issues = check_encryption(&b);
        assert_eq!(issues.len(), 2);
        assert!(issues[0].details.contains("\"orders\""));
        assert!(issues.iter().all(|i| i.severity == eventaudit_core::Severity::Critical));
    }

    #[test]
    fn missing_policy_is_reported() {
        let issues = evaluate_bus(&bus(false, Vec::new()), &AuditConfig::default());
        assert!(has_issue(&issues, IssueKind::MissingResourcePolicy));
        assert!(!has_issue(&issues, IssueKind::NoEncryption));
    }
}
