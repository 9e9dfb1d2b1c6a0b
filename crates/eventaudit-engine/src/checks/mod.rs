//! Issue rules.
//!
//! Every check is a pure function of already-collected data. Checks never
//! suppress each other: an entity carries every issue that applies to it.

mod bus;
mod pattern;
mod rule;
mod tags;
mod target;

pub use bus::{check_encryption, check_resource_policy, evaluate_bus};
pub use pattern::{
    broad_pattern_reason, is_overly_broad_pattern, known_sources, optimize_pattern,
    pattern_sources, OptimizerContext, DETAIL_TYPE_PLACEHOLDER, SOURCE_PLACEHOLDER, WILDCARD,
};
pub use rule::{
    check_activity, check_failure_alarm, check_pattern, evaluate_rule, failure_alarm_rule_names,
    RuleContext,
};
pub use tags::{check_required_tags, missing_required_tags, REQUIRED_TAGS};
pub use target::{
    check_dead_letter, check_fifo_group_id, check_lambda_concurrency, evaluate_target,
    has_custom_retry_policy, LAMBDA_THROTTLE_THRESHOLD,
};
