//! Rule-level checks.

use super::pattern::{broad_pattern_reason, optimize_pattern, OptimizerContext};
use super::tags::check_required_tags;
use eventaudit_core::{AlarmRecord, Issue, IssueKind, Rule};
use std::collections::BTreeSet;

const EVENTS_NAMESPACE: &str = "AWS/Events";
const FAILED_INVOCATIONS: &str = "FailedInvocations";
const RULE_NAME_DIMENSION: &str = "RuleName";

/// Inputs shared by the rule-level checks
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Required tag keys
    pub required_tags: &'a [String],
    /// Facts for pattern suggestions
    pub optimizer: &'a OptimizerContext,
    /// Rules covered by a failed-invocation alarm; `None` when unknown
    pub alarmed_rules: Option<&'a BTreeSet<String>>,
    /// Metrics window, for issue wording
    pub lookback_days: u32,
}

/// Names of rules with an `AWS/Events` `FailedInvocations` alarm
pub fn failure_alarm_rule_names(alarms: &[AlarmRecord]) -> BTreeSet<String> {
    alarms
        .iter()
        .filter(|a| {
            a.namespace.as_deref() == Some(EVENTS_NAMESPACE)
                && a.metric_name.as_deref() == Some(FAILED_INVOCATIONS)
        })
        .filter_map(|a| a.dimension(RULE_NAME_DIMENSION))
        .map(str::to_string)
        .collect()
}

/// `overly_broad_pattern` with a narrower suggestion
pub fn check_pattern(rule: &Rule, optimizer: &OptimizerContext) -> Option<Issue> {
    let pattern = rule.pattern.as_ref()?;
    let reason = broad_pattern_reason(pattern)?;
    let suggestion = optimize_pattern(pattern, optimizer);
    Some(Issue::new(
        IssueKind::OverlyBroadPattern,
        format!("event pattern {pattern} is overly broad: {reason}; suggested pattern: {suggestion}"),
    ))
}

/// `rule_inactive` when measured activity is zero.
///
/// Rules without metrics, or whose lookup failed, are never flagged.
pub fn check_activity(rule: &Rule, lookback_days: u32) -> Option<Issue> {
    let metrics = rule.metrics.as_ref()?;
    if metrics.is_insufficient_data() || metrics.has_recent_activity {
        return None;
    }
    Some(Issue::new(
        IssueKind::RuleInactive,
        format!(
            "rule \"{}\" has invocationSum30d = {} over the last {lookback_days} days",
            rule.name, metrics.invocation_sum_30d
        ),
    ))
}

/// `missing_failure_alarm` for enabled rules with targets and no alarm
pub fn check_failure_alarm(rule: &Rule, alarmed: Option<&BTreeSet<String>>) -> Option<Issue> {
    let alarmed = alarmed?;
    if !rule.is_enabled() || rule.targets.is_empty() || alarmed.contains(&rule.name) {
        return None;
    }
    Some(Issue::new(
        IssueKind::MissingFailureAlarm,
        format!(
            "no CloudWatch alarm on {EVENTS_NAMESPACE} {FAILED_INVOCATIONS} with {RULE_NAME_DIMENSION}={}",
            rule.name
        ),
    ))
}

/// Every rule-level check, in a fixed order
pub fn evaluate_rule(rule: &Rule, ctx: &RuleContext<'_>) -> Vec<Issue> {
    let mut issues = Vec::new();
    issues.extend(check_required_tags(&rule.tags, ctx.required_tags));
    issues.extend(check_pattern(rule, ctx.optimizer));
    issues.extend(check_activity(rule, ctx.lookback_days));
    issues.extend(check_failure_alarm(rule, ctx.alarmed_rules));
    issues
}
