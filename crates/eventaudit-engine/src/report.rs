//! Audit orchestration and report aggregation.

use crate::cancel::CancelSignal;
use crate::checks::{
    evaluate_bus, evaluate_rule, evaluate_target, failure_alarm_rule_names,
    has_custom_retry_policy, known_sources, OptimizerContext, RuleContext,
};
use crate::collector::{Collector, Inventory, Warnings};
use crate::metrics::MetricsCorrelator;
use crate::topology::build_topology;
use crate::AuditConfig;
use chrono::{DateTime, Utc};
use eventaudit_core::{
    AccountBackend, CollectionWarning, Issue, Report, Result, SeverityCounts, Summary,
};
use futures_util::stream::{self, StreamExt};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// Runs audits against one account and region
pub struct Auditor<B> {
    backend: B,
    config: AuditConfig,
}

impl<B: AccountBackend> Auditor<B> {
    /// Create an auditor
    pub const fn new(backend: B, config: AuditConfig) -> Self {
        Self { backend, config }
    }

    /// Create an auditor with [`AuditConfig::default`]
    pub fn with_defaults(backend: B) -> Self {
        Self::new(backend, AuditConfig::default())
    }

    /// Active configuration
    pub const fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Run a full audit.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or if the caller identity or
    /// the bus list cannot be read. Every other problem is recorded in
    /// [`Summary::warnings`].
    pub async fn run(&self) -> Result<Report> {
        self.run_with_cancellation(CancellationToken::new()).await
    }

    /// Run an audit that stops early when `token` is cancelled or the
    /// configured deadline passes.
    ///
    /// A stopped run still returns a report covering the buses finished so
    /// far, with `complete = false`.
    ///
    /// # Errors
    ///
    /// Same as [`Auditor::run`].
    #[instrument(skip(self, token))]
    pub async fn run_with_cancellation(&self, token: CancellationToken) -> Result<Report> {
        self.config.validate()?;

        let mut signal = CancelSignal::new(token);
        if let Some(secs) = self.config.deadline_secs {
            signal = signal.with_deadline(Duration::from_secs(secs));
        }

        let generated_at = Utc::now();
        let warnings = Warnings::default();

        // Phase 1: collect
        let mut inventory = Collector::new(&self.backend, &self.config, &warnings)
            .collect(&signal)
            .await?;
        info!(
            buses = inventory.buses.len(),
            rules = inventory.rules.len(),
            "Collected inventory"
        );

        // Phase 2: metrics
        if !inventory.cancelled {
            self.enrich_metrics(&mut inventory, &warnings, &signal, generated_at)
                .await;
        }

        // Phase 3: checks
        self.apply_checks(&mut inventory);

        // Phase 4: topology and summary
        let topology = build_topology(&inventory.buses, &inventory.rules);
        let summary = summarize(&inventory, warnings.snapshot(), generated_at);
        info!(
            issues = summary.issues_by_severity.total(),
            critical = summary.issues_by_severity.critical,
            warnings = summary.warnings.len(),
            complete = summary.complete,
            "Audit finished"
        );

        Ok(Report {
            summary,
            buses: inventory.buses,
            rules: inventory.rules,
            topology,
        })
    }

    async fn enrich_metrics(
        &self,
        inventory: &mut Inventory,
        warnings: &Warnings,
        signal: &CancelSignal,
        now: DateTime<Utc>,
    ) {
        let correlator =
            MetricsCorrelator::new(&self.backend, warnings, self.config.lookback_days, now);

        let metrics = {
            let enrich = stream::iter(inventory.rules.iter())
                .map(|rule| correlator.enrich(rule))
                .buffered(self.config.concurrency.max(1))
                .collect::<Vec<_>>();

            tokio::select! {
                biased;
                () = signal.cancelled() => None,
                metrics = enrich => Some(metrics),
            }
        };

        match metrics {
            Some(metrics) => {
                for (rule, m) in inventory.rules.iter_mut().zip(metrics) {
                    rule.metrics = Some(m);
                }
            }
            None => {
                warn!("Audit cancelled during metrics enrichment");
                inventory.cancelled = true;
            }
        }
    }

    fn apply_checks(&self, inventory: &mut Inventory) {
        for bus in &mut inventory.buses {
            bus.issues = evaluate_bus(bus, &self.config);
        }

        let alarmed = inventory.alarms.as_deref().map(failure_alarm_rule_names);
        let optimizers = optimizer_contexts(inventory);
        let fallback = OptimizerContext {
            known_sources: Vec::new(),
            account_id: inventory.account_id.clone(),
            region: inventory.region.clone(),
        };

        for rule in &mut inventory.rules {
            let ctx = RuleContext {
                required_tags: &self.config.required_tags,
                optimizer: optimizers.get(&rule.event_bus_name).unwrap_or(&fallback),
                alarmed_rules: alarmed.as_ref(),
                lookback_days: self.config.lookback_days,
            };
            rule.issues = evaluate_rule(rule, &ctx);

            let custom_retry = has_custom_retry_policy(&rule.targets);
            for target in &mut rule.targets {
                target.issues = evaluate_target(target, custom_retry, &self.config);
            }
        }
    }
}

/// Per-bus optimizer facts, drawn from the patterns of every rule on the bus
fn optimizer_contexts(inventory: &Inventory) -> HashMap<String, OptimizerContext> {
    let mut patterns: BTreeMap<&str, Vec<&Value>> = BTreeMap::new();
    for rule in &inventory.rules {
        let entry = patterns.entry(rule.event_bus_name.as_str()).or_default();
        entry.extend(rule.pattern.as_ref());
    }

    patterns
        .into_iter()
        .map(|(bus, bus_patterns)| {
            let ctx = OptimizerContext {
                known_sources: known_sources(bus_patterns),
                account_id: inventory.account_id.clone(),
                region: inventory.region.clone(),
            };
            (bus.to_string(), ctx)
        })
        .collect()
}

fn all_issues(inventory: &Inventory) -> impl Iterator<Item = &Issue> {
    let bus_issues = inventory.buses.iter().flat_map(|b| &b.issues);
    let rule_issues = inventory.rules.iter().flat_map(|r| {
        r.issues
            .iter()
            .chain(r.targets.iter().flat_map(|t| &t.issues))
    });
    bus_issues.chain(rule_issues)
}

fn summarize(
    inventory: &Inventory,
    warnings: Vec<CollectionWarning>,
    generated_at: DateTime<Utc>,
) -> Summary {
    let mut issues_by_severity = SeverityCounts::default();
    let mut issues_by_type = BTreeMap::new();
    for issue in all_issues(inventory) {
        issues_by_severity.add(issue.severity);
        *issues_by_type.entry(issue.kind).or_insert(0) += 1;
    }

    let complete = !inventory.cancelled
        && inventory.buses.len() == inventory.buses_discovered
        && inventory.rules.len() == inventory.rules_discovered;

    Summary {
        account_id: inventory.account_id.clone(),
        region: inventory.region.clone(),
        generated_at,
        buses_discovered: inventory.buses_discovered,
        buses_audited: inventory.buses.len(),
        rules_discovered: inventory.rules_discovered,
        rules_audited: inventory.rules.len(),
        targets_audited: inventory.rules.iter().map(|r| r.targets.len()).sum(),
        issues_by_severity,
        issues_by_type,
        warnings,
        complete,
    }
}
