use crate::AwsBackend;
use async_trait::async_trait;
use eventaudit_core::{
    AccountBackend, AlarmRecord, ArchiveRecord, BusDescription, BusSummary, CallerIdentity,
    MetricQuery, ReservedConcurrency, Result, RuleRecord, Tags, TargetRecord,
};

#[async_trait]
impl AccountBackend for AwsBackend {
    async fn caller_identity(&self) -> Result<CallerIdentity> {
        self.identity().caller_identity().await
    }

    fn region(&self) -> Option<String> {
        self.region_name().map(str::to_string)
    }

    async fn list_event_buses(&self) -> Result<Vec<BusSummary>> {
        self.events().list_event_buses().await
    }

    async fn describe_event_bus(&self, name: &str) -> Result<BusDescription> {
        self.events().describe_event_bus(name).await
    }

    async fn list_archives(&self, bus_arn: &str) -> Result<Vec<ArchiveRecord>> {
        self.events().list_archives(bus_arn).await
    }

    async fn archive_kms_key(&self, archive_name: &str) -> Result<Option<String>> {
        self.events().archive_kms_key(archive_name).await
    }

    async fn list_rules(&self, bus_name: &str) -> Result<Vec<RuleRecord>> {
        self.events().list_rules(bus_name).await
    }

    async fn list_targets_by_rule(
        &self,
        rule_name: &str,
        bus_name: &str,
    ) -> Result<Vec<TargetRecord>> {
        self.events().list_targets_by_rule(rule_name, bus_name).await
    }

    async fn list_tags(&self, resource_arn: &str) -> Result<Tags> {
        self.events().list_tags(resource_arn).await
    }

    async fn metric_sums(&self, query: &MetricQuery) -> Result<Vec<f64>> {
        self.metrics().sums(query).await
    }

    async fn describe_alarms(&self) -> Result<Vec<AlarmRecord>> {
        self.metrics().describe_alarms().await
    }

    async fn queue_depth(&self, queue_arn: &str) -> Result<u64> {
        self.queues().depth(queue_arn).await
    }

    async fn reserved_concurrency(&self, function_arn: &str) -> Result<ReservedConcurrency> {
        self.functions().reserved_concurrency(function_arn).await
    }
}
