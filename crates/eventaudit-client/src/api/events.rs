//! EventBridge API endpoints.

use crate::error::from_sdk;
use crate::AwsBackend;
use eventaudit_core::{
    ArchiveRecord, BusDescription, BusSummary, Result, RetryPolicy, RuleRecord, SqsParameters,
    Tags, TargetRecord,
};
use tracing::{debug, instrument};

/// EventBridge API endpoints
pub struct EventsApi<'a> {
    client: &'a AwsBackend,
}

impl<'a> EventsApi<'a> {
    pub(crate) const fn new(client: &'a AwsBackend) -> Self {
        Self { client }
    }

    /// List every event bus in the account
    #[instrument(skip(self), fields(service = "events"))]
    pub async fn list_event_buses(&self) -> Result<Vec<BusSummary>> {
        let mut buses = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .client
                .events_sdk()
                .list_event_buses()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| from_sdk("ListEventBuses", "account", e))?;

            buses.extend(output.event_buses().iter().filter_map(|bus| {
                Some(BusSummary {
                    name: bus.name()?.to_string(),
                    arn: bus.arn()?.to_string(),
                })
            }));

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(count = buses.len(), "listed event buses");
        Ok(buses)
    }

    /// Describe a bus, returning its ARN and resource policy
    #[instrument(skip(self), fields(service = "events"))]
    pub async fn describe_event_bus(&self, name: &str) -> Result<BusDescription> {
        let output = self
            .client
            .events_sdk()
            .describe_event_bus()
            .name(name)
            .send()
            .await
            .map_err(|e| from_sdk("DescribeEventBus", name, e))?;

        Ok(BusDescription {
            arn: output.arn().unwrap_or_default().to_string(),
            policy: output
                .policy()
                .filter(|p| !p.trim().is_empty())
                .map(str::to_string),
        })
    }

    /// List archives recording the given bus
    #[instrument(skip(self), fields(service = "events"))]
    pub async fn list_archives(&self, bus_arn: &str) -> Result<Vec<ArchiveRecord>> {
        let mut archives = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .client
                .events_sdk()
                .list_archives()
                .event_source_arn(bus_arn)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| from_sdk("ListArchives", bus_arn, e))?;

            for archive in output.archives() {
                let Some(name) = archive.archive_name() else {
                    continue;
                };
                archives.push(ArchiveRecord {
                    name: name.to_string(),
                    state: archive
                        .state()
                        .map(|s| s.as_str().to_string())
                        .unwrap_or_default(),
                    event_source_arn: archive.event_source_arn().unwrap_or_default().to_string(),
                });
            }

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        Ok(archives)
    }

    /// Customer managed KMS key of an archive, `None` for AWS owned keys
    #[instrument(skip(self), fields(service = "events"))]
    pub async fn archive_kms_key(&self, archive_name: &str) -> Result<Option<String>> {
        let output = self
            .client
            .events_sdk()
            .describe_archive()
            .archive_name(archive_name)
            .send()
            .await
            .map_err(|e| from_sdk("DescribeArchive", archive_name, e))?;

        Ok(output
            .kms_key_identifier()
            .filter(|k| !k.is_empty())
            .map(str::to_string))
    }

    /// List every rule on a bus
    #[instrument(skip(self), fields(service = "events"))]
    pub async fn list_rules(&self, bus_name: &str) -> Result<Vec<RuleRecord>> {
        let mut rules = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .client
                .events_sdk()
                .list_rules()
                .event_bus_name(bus_name)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| from_sdk("ListRules", bus_name, e))?;

            rules.extend(output.rules().iter().filter_map(|rule| {
                Some(RuleRecord {
                    name: rule.name()?.to_string(),
                    arn: rule.arn().unwrap_or_default().to_string(),
                    event_bus_name: rule.event_bus_name().unwrap_or(bus_name).to_string(),
                    state: rule
                        .state()
                        .map(|s| s.as_str().to_string())
                        .unwrap_or_default(),
                    event_pattern: rule.event_pattern().map(str::to_string),
                    schedule_expression: rule
                        .schedule_expression()
                        .filter(|s| !s.is_empty())
                        .map(str::to_string),
                })
            }));

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(bus = bus_name, count = rules.len(), "listed rules");
        Ok(rules)
    }

    /// List every target of a rule
    #[instrument(skip(self), fields(service = "events"))]
    pub async fn list_targets_by_rule(
        &self,
        rule_name: &str,
        bus_name: &str,
    ) -> Result<Vec<TargetRecord>> {
        let mut targets = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .client
                .events_sdk()
                .list_targets_by_rule()
                .rule(rule_name)
                .event_bus_name(bus_name)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| from_sdk("ListTargetsByRule", rule_name, e))?;

            targets.extend(output.targets().iter().map(|target| TargetRecord {
                id: target.id().to_string(),
                arn: target.arn().to_string(),
                retry_policy: target.retry_policy().map(|p| RetryPolicy {
                    max_attempts: p.maximum_retry_attempts(),
                    max_event_age_seconds: p.maximum_event_age_in_seconds(),
                }),
                sqs_parameters: target.sqs_parameters().map(|p| SqsParameters {
                    message_group_id: p.message_group_id().map(str::to_string),
                }),
                dead_letter_arn: target
                    .dead_letter_config()
                    .and_then(|d| d.arn())
                    .map(str::to_string),
            }));

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        Ok(targets)
    }

    /// Fetch the tags of a bus or rule
    #[instrument(skip(self), fields(service = "events"))]
    pub async fn list_tags(&self, resource_arn: &str) -> Result<Tags> {
        let output = self
            .client
            .events_sdk()
            .list_tags_for_resource()
            .resource_arn(resource_arn)
            .send()
            .await
            .map_err(|e| from_sdk("ListTagsForResource", resource_arn, e))?;

        Ok(output
            .tags()
            .iter()
            .map(|tag| (tag.key(), tag.value()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::AwsBackend;
    use aws_config::retry::RetryConfig;
    use aws_config::{BehaviorVersion, Region};
    use aws_sdk_eventbridge::config::Credentials;
    use eventaudit_core::AuditError;
    use wiremock::matchers::{body_string_contains, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const JSON_11: &str = "application/x-amz-json-1.1";

    async fn backend_for(server: &MockServer) -> AwsBackend {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
            .endpoint_url(server.uri())
            .retry_config(RetryConfig::disabled())
            .load()
            .await;
        AwsBackend::from_sdk_config(&config)
    }

    #[tokio::test]
    async fn list_event_buses_reads_json_protocol() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-amz-target", "AWSEvents.ListEventBuses"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"EventBuses":[
                    {"Name":"default","Arn":"arn:aws:events:us-east-1:123456789012:event-bus/default"},
                    {"Name":"app-bus","Arn":"arn:aws:events:us-east-1:123456789012:event-bus/app-bus"}
                ]}"#,
                JSON_11,
            ))
            .mount(&server)
            .await;

        let backend = backend_for(&server).await;
        let buses = backend.events().list_event_buses().await.unwrap();

        assert_eq!(buses.len(), 2);
        assert_eq!(buses[1].name, "app-bus");
        assert!(buses[1].arn.ends_with("event-bus/app-bus"));
    }

    #[tokio::test]
    async fn list_event_buses_follows_next_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-amz-target", "AWSEvents.ListEventBuses"))
            .and(body_string_contains("page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"EventBuses":[
                    {"Name":"app-bus","Arn":"arn:aws:events:us-east-1:123456789012:event-bus/app-bus"}
                ]}"#,
                JSON_11,
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(header("x-amz-target", "AWSEvents.ListEventBuses"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"EventBuses":[
                    {"Name":"default","Arn":"arn:aws:events:us-east-1:123456789012:event-bus/default"}
                ],"NextToken":"page-2"}"#,
                JSON_11,
            ))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        let backend = backend_for(&server).await;
        let buses = backend.events().list_event_buses().await.unwrap();

        let names: Vec<&str> = buses.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["default", "app-bus"]);
    }

    #[tokio::test]
    async fn list_targets_by_rule_reads_every_page() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-amz-target", "AWSEvents.ListTargetsByRule"))
            .and(body_string_contains("page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"Targets":[
                    {"Id":"fn","Arn":"arn:aws:lambda:us-east-1:123456789012:function:handler:prod",
                     "RetryPolicy":{"MaximumRetryAttempts":3}}
                ]}"#,
                JSON_11,
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(header("x-amz-target", "AWSEvents.ListTargetsByRule"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"Targets":[
                    {"Id":"queue","Arn":"arn:aws:sqs:us-east-1:123456789012:orders.fifo",
                     "SqsParameters":{"MessageGroupId":"orders"},
                     "DeadLetterConfig":{"Arn":"arn:aws:sqs:us-east-1:123456789012:events-dlq"}}
                ],"NextToken":"page-2"}"#,
                JSON_11,
            ))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        let backend = backend_for(&server).await;
        let targets = backend
            .events()
            .list_targets_by_rule("orders", "app-bus")
            .await
            .unwrap();

        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].id, "queue");
        assert_eq!(
            targets[0].dead_letter_arn.as_deref(),
            Some("arn:aws:sqs:us-east-1:123456789012:events-dlq")
        );
        assert_eq!(
            targets[0].sqs_parameters.as_ref().unwrap().message_group_id.as_deref(),
            Some("orders")
        );
        assert_eq!(targets[1].retry_policy.as_ref().unwrap().max_attempts, Some(3));
    }

    #[tokio::test]
    async fn describe_event_bus_without_policy() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-amz-target", "AWSEvents.DescribeEventBus"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"Name":"app-bus","Arn":"arn:aws:events:us-east-1:123456789012:event-bus/app-bus"}"#,
                JSON_11,
            ))
            .mount(&server)
            .await;

        let backend = backend_for(&server).await;
        let bus = backend.events().describe_event_bus("app-bus").await.unwrap();

        assert!(bus.policy.is_none());
        assert!(bus.arn.ends_with("app-bus"));
    }

    #[tokio::test]
    async fn access_denied_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-amz-target", "AWSEvents.ListRules"))
            .respond_with(ResponseTemplate::new(400).set_body_raw(
                r#"{"__type":"AccessDeniedException","message":"not authorized"}"#,
                JSON_11,
            ))
            .mount(&server)
            .await;

        let backend = backend_for(&server).await;
        let err = backend.events().list_rules("app-bus").await.unwrap_err();

        assert!(matches!(err, AuditError::AccessDenied { ref resource, .. } if resource == "app-bus"));
    }
}
