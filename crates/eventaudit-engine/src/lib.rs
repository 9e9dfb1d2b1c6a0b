//! # eventaudit-engine
//!
//! Read-only audit of EventBridge configuration.
//!
//! ## Data Flow
//!
//! ```text
//! Phase 1: Collection
//!   GetCallerIdentity + ListEventBuses (fatal on failure)
//!   -> per bus: DescribeEventBus, ListArchives, ListTagsForResource, ListRules
//!   -> per rule: ListTargetsByRule, ListTagsForResource
//!   -> per target: GetFunctionConcurrency, DLQ depth
//!   -> Inventory
//!
//! Phase 2: Metrics
//!   metric:dailyinvocations tag, else GetMetricStatistics (fail open)
//!
//! Phase 3: Checks
//!   bus -> rule -> target issue rules, all pure
//!
//! Phase 4: Report
//!   topology graph + summary counts
//! ```
//!
//! Problems below the bus list never abort a run. They are recorded as
//! warnings and the affected entity is skipped or left unenriched.

pub mod cancel;
pub mod checks;
pub mod collector;
pub mod config;
pub mod metrics;
pub mod report;
pub mod topology;

#[cfg(test)]
mod testing;

pub use cancel::CancelSignal;
pub use collector::{Collector, Inventory, Warnings};
pub use config::{AuditConfig, MAX_LOOKBACK_DAYS};
pub use metrics::{get_tag_metric, MetricsCorrelator, METRIC_TAG_KEY};
pub use report::Auditor;
pub use topology::build_topology;
