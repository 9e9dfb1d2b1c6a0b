//! Target-level checks.

use crate::AuditConfig;
use eventaudit_core::{Issue, IssueKind, Lookup, ServiceType, Target};

/// Lambda reserved concurrency at or below which a target is throttle-prone
pub const LAMBDA_THROTTLE_THRESHOLD: i32 = 1;

/// True iff some target overrides the AWS default retry policy
pub fn has_custom_retry_policy(targets: &[Target]) -> bool {
    targets.iter().any(Target::has_custom_retry_policy)
}

/// `sqs_fifo_no_group_id` for FIFO queues without a message group id
pub fn check_fifo_group_id(target: &Target) -> Option<Issue> {
    if !target.is_fifo_queue() || target.message_group_id().is_some() {
        return None;
    }
    Some(Issue::new(
        IssueKind::SqsFifoNoGroupId,
        format!(
            "FIFO queue target \"{}\" has no SqsParameters.MessageGroupId; deliveries will be rejected",
            target.id
        ),
    ))
}

/// `lambda_throttling` for tiny reservations, `target_unresolvable` when the lookup failed
pub fn check_lambda_concurrency(target: &Target, threshold: i32) -> Option<Issue> {
    match target.lambda.as_ref()? {
        Lookup::Found(Some(reserved)) if *reserved <= threshold => Some(Issue::new(
            IssueKind::LambdaThrottling,
            format!(
                "function {} has reserved concurrency {reserved} (threshold {threshold})",
                target.arn
            ),
        )),
        Lookup::Found(_) => None,
        Lookup::Failed(reason) => Some(Issue::new(
            IssueKind::TargetUnresolvable,
            format!("could not read concurrency for {}: {reason}", target.arn),
        )),
    }
}

/// `missing_dead_letter_queue` or `dead_letter_queue_backlog`
pub fn check_dead_letter(target: &Target) -> Option<Issue> {
    let Some(dlq) = target.dead_letter_arn.as_deref() else {
        return Some(Issue::new(
            IssueKind::MissingDeadLetterQueue,
            format!("target \"{}\" has no dead-letter queue; failed events are dropped", target.id),
        ));
    };

    match target.dead_letter_depth.as_ref()?.found().copied()? {
        0 => None,
        depth => Some(Issue::new(
            IssueKind::DeadLetterQueueBacklog,
            format!("dead-letter queue {dlq} holds {depth} undelivered message(s)"),
        )),
    }
}

/// Every target-level check.
///
/// `rule_has_custom_retry` is the rule-wide result of [`has_custom_retry_policy`].
pub fn evaluate_target(
    target: &Target,
    rule_has_custom_retry: bool,
    config: &AuditConfig,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    if !rule_has_custom_retry {
        issues.push(Issue::new(
            IssueKind::NoCustomRetryPolicy,
            format!(
                "no target of rule \"{}\" overrides the default retry policy (185 attempts, 24h)",
                target.rule_name
            ),
        ));
    }

    match target.service_type {
        ServiceType::Sqs => issues.extend(check_fifo_group_id(target)),
        ServiceType::Lambda => {
            issues.extend(check_lambda_concurrency(target, config.lambda_throttle_threshold));
        }
        _ => {}
    }

    if config.check_dead_letter_queues {
        issues.extend(check_dead_letter(target));
    }

    issues
}
