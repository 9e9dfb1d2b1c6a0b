//! Invocation metrics for rules.

use crate::collector::Warnings;
use chrono::{DateTime, Duration, Utc};
use eventaudit_core::{
    AccountBackend, CollectionWarning, MetricQuery, MetricSource, Rule, RuleMetrics, Tags,
    WarningKind, DEFAULT_BUS_NAME,
};
use tracing::{debug, instrument, warn};

/// Tag carrying a precomputed invocation count
pub const METRIC_TAG_KEY: &str = "metric:dailyinvocations";

const EVENTS_NAMESPACE: &str = "AWS/Events";
const INVOCATIONS: &str = "Invocations";
const ONE_DAY_SECS: i32 = 86_400;

/// Invocation hint from the `metric:dailyinvocations` tag.
///
/// The key is matched case-insensitively. Values that do not parse as an
/// integer are ignored.
pub fn get_tag_metric(tags: &Tags) -> Option<i64> {
    tags.get_ignore_case(METRIC_TAG_KEY)?.trim().parse().ok()
}

/// Daily `Invocations` sums for one rule over the lookback window ending at `now`.
///
/// Returns `None` when the window start falls outside the representable
/// date range.
pub fn invocation_query(
    rule: &Rule,
    lookback_days: u32,
    now: DateTime<Utc>,
) -> Option<MetricQuery> {
    let mut dimensions = vec![("RuleName".to_string(), rule.name.clone())];
    if rule.event_bus_name != DEFAULT_BUS_NAME {
        dimensions.push(("EventBusName".to_string(), rule.event_bus_name.clone()));
    }

    let start = now.checked_sub_signed(Duration::days(i64::from(lookback_days)))?;
    Some(MetricQuery {
        namespace: EVENTS_NAMESPACE.to_string(),
        metric_name: INVOCATIONS.to_string(),
        dimensions,
        start_epoch_secs: start.timestamp(),
        end_epoch_secs: now.timestamp(),
        period_secs: ONE_DAY_SECS,
    })
}

/// Attaches [`RuleMetrics`] to rules, preferring tag hints over CloudWatch
pub struct MetricsCorrelator<'a, B: ?Sized> {
    backend: &'a B,
    warnings: &'a Warnings,
    lookback_days: u32,
    now: DateTime<Utc>,
}

impl<'a, B: AccountBackend + ?Sized> MetricsCorrelator<'a, B> {
    /// Create a correlator whose window ends at `now`
    pub const fn new(
        backend: &'a B,
        warnings: &'a Warnings,
        lookback_days: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            backend,
            warnings,
            lookback_days,
            now,
        }
    }

    /// Metrics for one rule; never fails
    #[allow(clippy::cast_precision_loss)]
    #[instrument(skip(self, rule), fields(rule = %rule.name, bus = %rule.event_bus_name))]
    pub async fn enrich(&self, rule: &Rule) -> RuleMetrics {
        if let Some(hint) = get_tag_metric(&rule.tags) {
            debug!(hint, "Using tag metric hint");
            return RuleMetrics::measured(hint as f64, MetricSource::Tag);
        }

        let Some(query) = invocation_query(rule, self.lookback_days, self.now) else {
            return self.unavailable(
                rule,
                format!("lookback of {} days is out of range", self.lookback_days),
            );
        };
        match self.backend.metric_sums(&query).await {
            Ok(sums) => RuleMetrics::measured(sums.iter().sum(), MetricSource::CloudWatch),
            Err(e) => self.unavailable(rule, e.to_string()),
        }
    }

    fn unavailable(&self, rule: &Rule, reason: String) -> RuleMetrics {
        warn!(%reason, "Invocation metrics unavailable");
        self.warnings.push(CollectionWarning::new(
            WarningKind::Enrichment,
            &rule.arn,
            reason,
        ));
        RuleMetrics::unavailable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{rule, MockBackend};
    use chrono::TimeZone;

    #[test]
    fn tag_metric_parsing() {
        let tags: Tags = [("Metric:DailyInvocations", " 42 ")].into_iter().collect();
        assert_eq!(get_tag_metric(&tags), Some(42));

        let bad: Tags = [("metric:dailyinvocations", "lots")].into_iter().collect();
        assert_eq!(get_tag_metric(&bad), None);
        assert_eq!(get_tag_metric(&Tags::new()), None);
    }

    #[test]
    fn query_dimensions_follow_the_bus() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();

        let on_default = invocation_query(&rule("default", "nightly"), 30, now).unwrap();
        assert_eq!(on_default.dimensions, vec![("RuleName".to_string(), "nightly".to_string())]);
        assert_eq!(on_default.end_epoch_secs - on_default.start_epoch_secs, 30 * 86_400);
        assert_eq!(on_default.period_secs, 86_400);

        let on_custom = invocation_query(&rule("app-bus", "orders"), 7, now).unwrap();
        assert_eq!(on_custom.dimensions.len(), 2);
        assert_eq!(on_custom.dimensions[1].1, "app-bus");
    }

    #[test]
    fn window_outside_date_range_has_no_query() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();
        assert!(invocation_query(&rule("default", "nightly"), 4_000_000_000, now).is_none());
    }

    #[tokio::test]
    async fn out_of_range_window_fails_open() {
        let backend = MockBackend::new().with_metric_sums(vec![5.0]);
        let warnings = Warnings::default();
        let correlator = MetricsCorrelator::new(&backend, &warnings, 4_000_000_000, Utc::now());

        let metrics = correlator.enrich(&rule("app-bus", "orders")).await;
        assert!(metrics.is_insufficient_data());

        let recorded = warnings.snapshot();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].kind, WarningKind::Enrichment);
        assert!(recorded[0].message.contains("out of range"));
    }

    #[tokio::test]
    async fn tag_hint_skips_cloudwatch() {
        let backend = MockBackend::new().fail_metrics();
        let warnings = Warnings::default();
        let correlator = MetricsCorrelator::new(&backend, &warnings, 30, Utc::now());

        let mut r = rule("app-bus", "orders");
        r.tags.insert(METRIC_TAG_KEY, "0");
        let metrics = correlator.enrich(&r).await;

        assert_eq!(metrics.source, MetricSource::Tag);
        assert!(!metrics.has_recent_activity);
        assert!(warnings.snapshot().is_empty());
    }

    #[tokio::test]
    async fn datapoints_are_summed() {
        let backend = MockBackend::new().with_metric_sums(vec![3.0, 0.0, 4.0]);
        let warnings = Warnings::default();
        let correlator = MetricsCorrelator::new(&backend, &warnings, 30, Utc::now());

        let metrics = correlator.enrich(&rule("app-bus", "orders")).await;
        assert!((metrics.invocation_sum_30d - 7.0).abs() < f64::EPSILON);
        assert!(metrics.has_recent_activity);
        assert_eq!(metrics.source, MetricSource::CloudWatch);
    }

    #[test]
    fn cloudwatch_failure_fails_open() {
        let backend = MockBackend::new().fail_metrics();
        let warnings = Warnings::default();
        let correlator = MetricsCorrelator::new(&backend, &warnings, 30, Utc::now());

        let metrics = tokio_test::block_on(correlator.enrich(&rule("app-bus", "orders")));
        assert!(metrics.is_insufficient_data());
        assert!(!metrics.has_recent_activity);

        let recorded = warnings.snapshot();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].kind, WarningKind::Enrichment);
    }
}
