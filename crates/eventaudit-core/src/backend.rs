//! Read-only seam between the audit engine and AWS.

use crate::types::{
    AlarmRecord, ArchiveRecord, BusDescription, BusSummary, CallerIdentity, MetricQuery,
    ReservedConcurrency, RuleRecord, Tags, TargetRecord,
};
use crate::Result;
use async_trait::async_trait;

/// Read-only access to the AWS APIs the auditor consumes.
///
/// List operations return every page; implementations handle `NextToken`
/// pagination internally.
#[async_trait]
pub trait AccountBackend: Send + Sync {
    /// `sts:GetCallerIdentity`
    async fn caller_identity(&self) -> Result<CallerIdentity>;

    /// Region the backend is bound to, if known
    fn region(&self) -> Option<String> {
        None
    }

    /// `events:ListEventBuses`
    async fn list_event_buses(&self) -> Result<Vec<BusSummary>>;

    /// `events:DescribeEventBus`
    async fn describe_event_bus(&self, name: &str) -> Result<BusDescription>;

    /// `events:ListArchives` for one source bus
    async fn list_archives(&self, bus_arn: &str) -> Result<Vec<ArchiveRecord>>;

    /// `events:DescribeArchive`; the customer managed KMS key, if any
    async fn archive_kms_key(&self, archive_name: &str) -> Result<Option<String>>;

    /// `events:ListRules` on one bus
    async fn list_rules(&self, bus_name: &str) -> Result<Vec<RuleRecord>>;

    /// `events:ListTargetsByRule`
    async fn list_targets_by_rule(&self, rule_name: &str, bus_name: &str)
        -> Result<Vec<TargetRecord>>;

    /// `events:ListTagsForResource`
    async fn list_tags(&self, resource_arn: &str) -> Result<Tags>;

    /// `cloudwatch:GetMetricStatistics` with the `Sum` statistic; one value per datapoint
    async fn metric_sums(&self, query: &MetricQuery) -> Result<Vec<f64>>;

    /// `cloudwatch:DescribeAlarms`
    async fn describe_alarms(&self) -> Result<Vec<AlarmRecord>>;

    /// `sqs:GetQueueUrl` + `sqs:GetQueueAttributes` (`ApproximateNumberOfMessages`)
    async fn queue_depth(&self, queue_arn: &str) -> Result<u64>;

    /// `lambda:GetFunctionConcurrency`
    async fn reserved_concurrency(&self, function_arn: &str) -> Result<ReservedConcurrency>;
}
