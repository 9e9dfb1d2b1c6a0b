//! Account inventory collection.
//!
//! Identity and bus listing are the only fatal steps. Everything below a
//! bus is best effort: a bus or rule that cannot be read is skipped and
//! recorded as a [`CollectionWarning`].

use crate::cancel::CancelSignal;
use crate::AuditConfig;
use eventaudit_core::{
    AccountBackend, AlarmRecord, Archive, ArchiveRecord, ArchiveState, BusSummary,
    CollectionWarning, EventBus, Lookup, Result, Rule, RuleRecord, RuleState, ServiceType, Target,
    TargetRecord, WarningKind,
};
use futures_util::future::join_all;
use futures_util::stream::{self, StreamExt};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// Shared accumulator for non-fatal problems
#[derive(Debug, Clone, Default)]
pub struct Warnings(Arc<Mutex<Vec<CollectionWarning>>>);

impl Warnings {
    /// Record a warning
    pub fn push(&self, warning: CollectionWarning) {
        self.0
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(warning);
    }

    /// Copy of every warning recorded so far, in recording order
    pub fn snapshot(&self) -> Vec<CollectionWarning> {
        self.0
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

/// Everything read from the account, before any check runs
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    /// Audited account
    pub account_id: String,
    /// Audited region
    pub region: Option<String>,
    /// Buses read successfully, in listing order
    pub buses: Vec<EventBus>,
    /// Rules read successfully, grouped by bus in listing order
    pub rules: Vec<Rule>,
    /// Buses returned by `ListEventBuses`
    pub buses_discovered: usize,
    /// Rules returned by `ListRules` on buses that were read
    pub rules_discovered: usize,
    /// Alarm inventory; `None` when it was not or could not be read
    pub alarms: Option<Vec<AlarmRecord>>,
    /// Collection stopped early
    pub cancelled: bool,
}

struct CollectedBus {
    bus: EventBus,
    rules: Vec<Rule>,
    rules_discovered: usize,
}

/// Reads buses, rules and targets through an [`AccountBackend`]
pub struct Collector<'a, B: ?Sized> {
    backend: &'a B,
    config: &'a AuditConfig,
    warnings: &'a Warnings,
}

impl<'a, B: AccountBackend + ?Sized> Collector<'a, B> {
    /// Create a collector
    pub const fn new(backend: &'a B, config: &'a AuditConfig, warnings: &'a Warnings) -> Self {
        Self {
            backend,
            config,
            warnings,
        }
    }

    /// Build the inventory.
    ///
    /// Fails only when the caller identity or the bus list cannot be read.
    /// If `cancel` fires, the buses finished so far are returned and
    /// [`Inventory::cancelled`] is set.
    pub async fn collect(&self, cancel: &CancelSignal) -> Result<Inventory> {
        let identity = self.backend.caller_identity().await?;
        info!(account = %identity.account, "Resolved caller identity");

        let summaries = self.backend.list_event_buses().await?;
        info!(count = summaries.len(), "Discovered event buses");

        let mut inventory = Inventory {
            account_id: identity.account,
            region: self.backend.region(),
            buses_discovered: summaries.len(),
            ..Inventory::default()
        };

        if cancel.is_cancelled() {
            warn!("Audit cancelled before collection started");
            inventory.cancelled = true;
            return Ok(inventory);
        }

        if self.config.check_failure_alarms {
            inventory.alarms = self.collect_alarms().await;
        }

        let mut results = std::pin::pin!(stream::iter(summaries.iter())
            .map(|summary| self.collect_bus(summary))
            .buffered(self.config.concurrency.max(1)));

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    warn!(
                        collected = inventory.buses.len(),
                        discovered = inventory.buses_discovered,
                        "Audit cancelled, reporting partial inventory"
                    );
                    inventory.cancelled = true;
                    break;
                }
                next = results.next() => match next {
                    Some(Some(collected)) => {
                        inventory.rules_discovered += collected.rules_discovered;
                        inventory.rules.extend(collected.rules);
                        inventory.buses.push(collected.bus);
                    }
                    Some(None) => {}
                    None => break,
                },
            }
        }

        Ok(inventory)
    }

    async fn collect_alarms(&self) -> Option<Vec<AlarmRecord>> {
        match self.backend.describe_alarms().await {
            Ok(alarms) => {
                debug!(count = alarms.len(), "Loaded CloudWatch alarms");
                Some(alarms)
            }
            Err(e) => {
                warn!(error = %e, "Alarm inventory unavailable, skipping failure alarm check");
                self.warnings.push(CollectionWarning::new(
                    WarningKind::Enrichment,
                    "cloudwatch:DescribeAlarms",
                    e.to_string(),
                ));
                None
            }
        }
    }

    #[instrument(skip(self, summary), fields(bus = %summary.name))]
    async fn collect_bus(&self, summary: &BusSummary) -> Option<CollectedBus> {
        match self.try_collect_bus(summary).await {
            Ok(collected) => Some(collected),
            Err(e) => {
                warn!(error = %e, "Skipping event bus");
                self.warnings.push(CollectionWarning::new(
                    WarningKind::Collection,
                    &summary.arn,
                    e.to_string(),
                ));
                None
            }
        }
    }

    async fn try_collect_bus(&self, summary: &BusSummary) -> Result<CollectedBus> {
        let description = self.backend.describe_event_bus(&summary.name).await?;

        let archive_records = self.backend.list_archives(&summary.arn).await?;
        let archives = join_all(
            archive_records
                .into_iter()
                .filter(|a| a.event_source_arn == summary.arn)
                .map(|a| self.collect_archive(a)),
        )
        .await;

        let tags = self.backend.list_tags(&summary.arn).await?;
        let records = self.backend.list_rules(&summary.name).await?;
        let rules_discovered = records.len();
        debug!(rules = rules_discovered, "Listed rules");

        let rules: Vec<Rule> = stream::iter(records)
            .map(|record| self.collect_rule(record, &summary.name))
            .buffered(self.config.rule_concurrency.max(1))
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .flatten()
            .collect();

        let bus = EventBus {
            name: summary.name.clone(),
            arn: summary.arn.clone(),
            has_resource_policy: description
                .policy
                .as_deref()
                .is_some_and(|p| !p.trim().is_empty()),
            archives,
            tags,
            issues: Vec::new(),
        };

        Ok(CollectedBus {
            bus,
            rules,
            rules_discovered,
        })
    }

    async fn collect_archive(&self, record: ArchiveRecord) -> Archive {
        let (kms_key_id, key_unknown) = match self.backend.archive_kms_key(&record.name).await {
            Ok(key) => (key.unwrap_or_default(), false),
            Err(e) => {
                warn!(archive = %record.name, error = %e, "Archive key lookup failed");
                self.warnings.push(CollectionWarning::new(
                    WarningKind::Enrichment,
                    &record.name,
                    e.to_string(),
                ));
                (String::new(), true)
            }
        };

        Archive {
            name: record.name,
            state: ArchiveState::parse(&record.state),
            kms_key_id,
            key_unknown,
            event_source_arn: record.event_source_arn,
        }
    }

    async fn collect_rule(&self, record: RuleRecord, bus_name: &str) -> Option<Rule> {
        let arn = record.arn.clone();
        match self.try_collect_rule(record, bus_name).await {
            Ok(rule) => Some(rule),
            Err(e) => {
                warn!(rule = %arn, error = %e, "Skipping rule");
                self.warnings
                    .push(CollectionWarning::new(WarningKind::Collection, arn, e.to_string()));
                None
            }
        }
    }

    async fn try_collect_rule(&self, record: RuleRecord, bus_name: &str) -> Result<Rule> {
        let pattern = record
            .event_pattern
            .as_deref()
            .and_then(|raw| self.parse_pattern(&record.arn, raw));

        let target_records = self.backend.list_targets_by_rule(&record.name, bus_name).await?;
        let tags = self.backend.list_tags(&record.arn).await?;

        let targets = join_all(
            target_records
                .into_iter()
                .map(|t| self.collect_target(t, &record.name)),
        )
        .await;

        Ok(Rule {
            name: record.name,
            arn: record.arn,
            event_bus_name: bus_name.to_string(),
            state: RuleState::parse(&record.state),
            pattern,
            schedule_expression: record.schedule_expression,
            targets,
            tags,
            metrics: None,
            issues: Vec::new(),
        })
    }

    fn parse_pattern(&self, rule_arn: &str, raw: &str) -> Option<Value> {
        let reason = match serde_json::from_str::<Value>(raw) {
            Ok(value) if value.is_object() => return Some(value),
            Ok(_) => "event pattern is not a JSON object".to_string(),
            Err(e) => format!("invalid event pattern: {e}"),
        };
        warn!(rule = %rule_arn, %reason, "Ignoring event pattern");
        self.warnings
            .push(CollectionWarning::new(WarningKind::Parse, rule_arn, reason));
        None
    }

    async fn collect_target(&self, record: TargetRecord, rule_name: &str) -> Target {
        let service_type = ServiceType::from_arn(&record.arn);

        let lambda = if service_type == ServiceType::Lambda {
            Some(match self.backend.reserved_concurrency(&record.arn).await {
                Ok(reserved) => Lookup::Found(reserved),
                Err(e) => {
                    warn!(function = %record.arn, error = %e, "Reserved concurrency lookup failed");
                    self.warnings.push(CollectionWarning::new(
                        WarningKind::Enrichment,
                        &record.arn,
                        e.to_string(),
                    ));
                    Lookup::Failed(e.to_string())
                }
            })
        } else {
            None
        };

        let dead_letter_depth = match record.dead_letter_arn.as_deref() {
            Some(dlq)
                if self.config.check_dead_letter_queues
                    && ServiceType::from_arn(dlq) == ServiceType::Sqs =>
            {
                Some(match self.backend.queue_depth(dlq).await {
                    Ok(depth) => Lookup::Found(depth),
                    Err(e) => {
                        warn!(queue = %dlq, error = %e, "Dead-letter queue depth lookup failed");
                        self.warnings.push(CollectionWarning::new(
                            WarningKind::Enrichment,
                            dlq,
                            e.to_string(),
                        ));
                        Lookup::Failed(e.to_string())
                    }
                })
            }
            _ => None,
        };

        Target {
            id: record.id,
            arn: record.arn,
            rule_name: rule_name.to_string(),
            service_type,
            retry_policy: record.retry_policy,
            sqs_parameters: record.sqs_parameters,
            dead_letter_arn: record.dead_letter_arn,
            lambda,
            dead_letter_depth,
            issues: Vec::new(),
        }
    }
}
