//! In-memory [`AccountBackend`] and fixtures for unit tests.

use async_trait::async_trait;
use eventaudit_core::{
    AccountBackend, AlarmRecord, ArchiveRecord, AuditError, BusDescription, BusSummary,
    CallerIdentity, MetricQuery, ReservedConcurrency, Result, Rule, RuleRecord, RuleState,
    ServiceType, Tags, Target, TargetRecord,
};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

pub const ACCOUNT: &str = "123456789012";
pub const DEFAULT_BUS_ARN: &str = "arn:aws:events:us-east-1:123456789012:event-bus/default";
pub const APP_BUS_ARN: &str = "arn:aws:events:us-east-1:123456789012:event-bus/app-bus";
pub const FIFO_QUEUE_ARN: &str = "arn:aws:sqs:us-east-1:123456789012:orders.fifo";
pub const FUNCTION_ARN: &str = "arn:aws:lambda:us-east-1:123456789012:function:nightly-report";
pub const DLQ_ARN: &str = "arn:aws:sqs:us-east-1:123456789012:events-dlq";

pub fn rule_arn(bus: &str, name: &str) -> String {
    if bus == "default" {
        format!("arn:aws:events:us-east-1:{ACCOUNT}:rule/{name}")
    } else {
        format!("arn:aws:events:us-east-1:{ACCOUNT}:rule/{bus}/{name}")
    }
}

/// A bare target with no retry, SQS or DLQ settings
pub fn target(id: &str, arn: &str) -> Target {
    Target {
        id: id.into(),
        arn: arn.into(),
        rule_name: "orders-rule".into(),
        service_type: ServiceType::from_arn(arn),
        retry_policy: None,
        sqs_parameters: None,
        dead_letter_arn: None,
        lambda: None,
        dead_letter_depth: None,
        issues: Vec::new(),
    }
}

/// An enabled rule with no pattern, targets or tags
pub fn rule(bus: &str, name: &str) -> Rule {
    Rule {
        name: name.into(),
        arn: rule_arn(bus, name),
        event_bus_name: bus.into(),
        state: RuleState::Enabled,
        pattern: None,
        schedule_expression: None,
        targets: Vec::new(),
        tags: Tags::new(),
        metrics: None,
        issues: Vec::new(),
    }
}

fn target_record(id: &str, arn: &str) -> TargetRecord {
    TargetRecord {
        id: id.into(),
        arn: arn.into(),
        retry_policy: None,
        sqs_parameters: None,
        dead_letter_arn: None,
    }
}

fn rule_record(bus: &str, name: &str) -> RuleRecord {
    RuleRecord {
        name: name.into(),
        arn: rule_arn(bus, name),
        event_bus_name: bus.into(),
        state: "ENABLED".into(),
        event_pattern: None,
        schedule_expression: None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    pub buses: Vec<BusSummary>,
    pub policies: HashMap<String, String>,
    pub archives: Vec<ArchiveRecord>,
    pub archive_keys: HashMap<String, String>,
    pub rules: HashMap<String, Vec<RuleRecord>>,
    pub targets: HashMap<(String, String), Vec<TargetRecord>>,
    pub tags: HashMap<String, Tags>,
    pub metric_sums: Vec<f64>,
    pub reserved: HashMap<String, ReservedConcurrency>,
    pub queue_depths: HashMap<String, u64>,
    pub alarms: Vec<AlarmRecord>,
    delays: HashMap<String, Duration>,
    failures: HashSet<String>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Two buses:
    ///
    /// - `default` with no policy and a scheduled `nightly` rule targeting a Lambda
    /// - `app-bus` with a policy, tags, an unencrypted archive and `broad-rule`
    ///   (`{"source":["*"]}`, tagged `Owner=ops`) targeting a FIFO queue
    ///   without a message group id
    pub fn sample() -> Self {
        let mut backend = Self::new();

        backend.buses = vec![
            BusSummary {
                name: "default".into(),
                arn: DEFAULT_BUS_ARN.into(),
            },
            BusSummary {
                name: "app-bus".into(),
                arn: APP_BUS_ARN.into(),
            },
        ];
        backend.policies.insert(
            "app-bus".into(),
            r#"{"Version":"2012-10-17","Statement":[]}"#.into(),
        );

        backend.archives = vec![
            ArchiveRecord {
                name: "app-archive".into(),
                state: "ENABLED".into(),
                event_source_arn: APP_BUS_ARN.into(),
            },
            ArchiveRecord {
                name: "elsewhere".into(),
                state: "ENABLED".into(),
                event_source_arn: "arn:aws:events:us-east-1:123456789012:event-bus/other".into(),
            },
        ];
        backend
            .archive_keys
            .insert("elsewhere".into(), "alias/events".into());
        backend.tags.insert(
            APP_BUS_ARN.into(),
            [("Owner", "ops"), ("Application", "shop")].into_iter().collect(),
        );

        let mut nightly = rule_record("default", "nightly");
        nightly.schedule_expression = Some("rate(1 day)".into());
        backend.rules.insert("default".into(), vec![nightly]);
        backend.targets.insert(
            ("default".into(), "nightly".into()),
            vec![target_record("report", FUNCTION_ARN)],
        );

        let mut broad = rule_record("app-bus", "broad-rule");
        broad.event_pattern = Some(r#"{"source":["*"]}"#.into());
        backend.rules.insert("app-bus".into(), vec![broad]);
        backend.targets.insert(
            ("app-bus".into(), "broad-rule".into()),
            vec![target_record("orders-queue", FIFO_QUEUE_ARN)],
        );
        backend.tags.insert(
            rule_arn("app-bus", "broad-rule"),
            [("Owner", "ops")].into_iter().collect(),
        );

        backend
    }

    fn fail(mut self, key: impl Into<String>) -> Self {
        self.failures.insert(key.into());
        self
    }

    fn fails(&self, key: &str) -> bool {
        self.failures.contains(key)
    }

    pub fn fail_identity(self) -> Self {
        self.fail("identity")
    }

    pub fn fail_metrics(self) -> Self {
        self.fail("metrics")
    }

    pub fn fail_alarms(self) -> Self {
        self.fail("alarms")
    }

    pub fn fail_describe(self, bus: &str) -> Self {
        self.fail(format!("describe:{bus}"))
    }

    pub fn fail_targets(self, rule: &str) -> Self {
        self.fail(format!("targets:{rule}"))
    }

    pub fn fail_archive(self, archive: &str) -> Self {
        self.fail(format!("archive:{archive}"))
    }

    pub fn fail_function(self, function_arn: &str) -> Self {
        self.fail(format!("function:{function_arn}"))
    }

    /// `DescribeEventBus` for `bus` takes `delay` to answer
    pub fn delay_describe(mut self, bus: &str, delay: Duration) -> Self {
        self.delays.insert(bus.into(), delay);
        self
    }

    /// Give every target of `rule_name` the dead-letter queue `dlq_arn`
    pub fn with_dead_letter(mut self, rule_name: &str, dlq_arn: &str) -> Self {
        for ((_, rule), records) in &mut self.targets {
            if rule == rule_name {
                for record in records {
                    record.dead_letter_arn = Some(dlq_arn.into());
                }
            }
        }
        self
    }

    pub fn with_queue_depth(mut self, queue_arn: &str, depth: u64) -> Self {
        self.queue_depths.insert(queue_arn.into(), depth);
        self
    }

    pub fn with_metric_sums(mut self, sums: Vec<f64>) -> Self {
        self.metric_sums = sums;
        self
    }

    pub fn with_reserved_concurrency(mut self, function_arn: &str, reserved: Option<i32>) -> Self {
        self.reserved.insert(function_arn.into(), reserved);
        self
    }

    pub fn with_raw_pattern(mut self, rule_name: &str, raw: &str) -> Self {
        for record in self.rules.values_mut().flatten() {
            if record.name == rule_name {
                record.event_pattern = Some(raw.into());
            }
        }
        self
    }
}

#[async_trait]
impl AccountBackend for MockBackend {
    async fn caller_identity(&self) -> Result<CallerIdentity> {
        if self.fails("identity") {
            return Err(AuditError::Authentication("ExpiredToken".into()));
        }
        Ok(CallerIdentity {
            account: ACCOUNT.into(),
            arn: format!("arn:aws:iam::{ACCOUNT}:user/auditor"),
        })
    }

    fn region(&self) -> Option<String> {
        Some("us-east-1".into())
    }

    async fn list_event_buses(&self) -> Result<Vec<BusSummary>> {
        Ok(self.buses.clone())
    }

    async fn describe_event_bus(&self, name: &str) -> Result<BusDescription> {
        if let Some(delay) = self.delays.get(name) {
            tokio::time::sleep(*delay).await;
        }
        if self.fails(&format!("describe:{name}")) {
            return Err(AuditError::AccessDenied {
                operation: "DescribeEventBus".into(),
                resource: name.into(),
            });
        }
        let bus = self
            .buses
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| AuditError::NotFound {
                resource: name.into(),
            })?;
        Ok(BusDescription {
            arn: bus.arn.clone(),
            policy: self.policies.get(name).cloned(),
        })
    }

    async fn list_archives(&self, _bus_arn: &str) -> Result<Vec<ArchiveRecord>> {
        Ok(self.archives.clone())
    }

    async fn archive_kms_key(&self, archive_name: &str) -> Result<Option<String>> {
        if self.fails(&format!("archive:{archive_name}")) {
            return Err(AuditError::AccessDenied {
                operation: "DescribeArchive".into(),
                resource: archive_name.into(),
            });
        }
        Ok(self.archive_keys.get(archive_name).cloned())
    }

    async fn list_rules(&self, bus_name: &str) -> Result<Vec<RuleRecord>> {
        Ok(self.rules.get(bus_name).cloned().unwrap_or_default())
    }

    async fn list_targets_by_rule(
        &self,
        rule_name: &str,
        bus_name: &str,
    ) -> Result<Vec<TargetRecord>> {
        if self.fails(&format!("targets:{rule_name}")) {
            return Err(AuditError::Throttled {
                operation: "ListTargetsByRule".into(),
            });
        }
        Ok(self
            .targets
            .get(&(bus_name.to_string(), rule_name.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_tags(&self, resource_arn: &str) -> Result<Tags> {
        Ok(self.tags.get(resource_arn).cloned().unwrap_or_default())
    }

    async fn metric_sums(&self, _query: &MetricQuery) -> Result<Vec<f64>> {
        if self.fails("metrics") {
            return Err(AuditError::Throttled {
                operation: "GetMetricStatistics".into(),
            });
        }
        Ok(self.metric_sums.clone())
    }

    async fn describe_alarms(&self) -> Result<Vec<AlarmRecord>> {
        if self.fails("alarms") {
            return Err(AuditError::AccessDenied {
                operation: "DescribeAlarms".into(),
                resource: "*".into(),
            });
        }
        Ok(self.alarms.clone())
    }

    async fn queue_depth(&self, queue_arn: &str) -> Result<u64> {
        self.queue_depths
            .get(queue_arn)
            .copied()
            .ok_or_else(|| AuditError::NotFound {
                resource: queue_arn.into(),
            })
    }

    async fn reserved_concurrency(&self, function_arn: &str) -> Result<ReservedConcurrency> {
        if self.fails(&format!("function:{function_arn}")) {
            return Err(AuditError::Api {
                operation: "GetFunctionConcurrency".into(),
                code: "ResourceNotFoundException".into(),
                message: "Function not found".into(),
            });
        }
        Ok(self.reserved.get(function_arn).copied().flatten())
    }
}
