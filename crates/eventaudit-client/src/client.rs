//! AWS backend client.

use crate::api::{EventsApi, FunctionsApi, IdentityApi, MetricsApi, QueuesApi};
use crate::config::ClientConfig;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use std::sync::Arc;
use tracing::debug;

/// Read-only AWS client covering every service the auditor touches
#[derive(Clone)]
pub struct AwsBackend {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    events: aws_sdk_eventbridge::Client,
    cloudwatch: aws_sdk_cloudwatch::Client,
    sqs: aws_sdk_sqs::Client,
    lambda: aws_sdk_lambda::Client,
    sts: aws_sdk_sts::Client,
    region: Option<String>,
}

impl AwsBackend {
    /// Load the SDK configuration with default settings
    pub async fn load() -> Self {
        AwsBackendBuilder::new().load().await
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> AwsBackendBuilder {
        AwsBackendBuilder::new()
    }

    /// Build service clients from an already loaded SDK configuration
    #[must_use]
    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                events: aws_sdk_eventbridge::Client::new(config),
                cloudwatch: aws_sdk_cloudwatch::Client::new(config),
                sqs: aws_sdk_sqs::Client::new(config),
                lambda: aws_sdk_lambda::Client::new(config),
                sts: aws_sdk_sts::Client::new(config),
                region: config.region().map(ToString::to_string),
            }),
        }
    }

    /// Access EventBridge endpoints
    #[must_use]
    pub fn events(&self) -> EventsApi<'_> {
        EventsApi::new(self)
    }

    /// Access CloudWatch endpoints
    #[must_use]
    pub fn metrics(&self) -> MetricsApi<'_> {
        MetricsApi::new(self)
    }

    /// Access SQS endpoints
    #[must_use]
    pub fn queues(&self) -> QueuesApi<'_> {
        QueuesApi::new(self)
    }

    /// Access Lambda endpoints
    #[must_use]
    pub fn functions(&self) -> FunctionsApi<'_> {
        FunctionsApi::new(self)
    }

    /// Access STS endpoints
    #[must_use]
    pub fn identity(&self) -> IdentityApi<'_> {
        IdentityApi::new(self)
    }

    /// Region the clients are bound to
    #[must_use]
    pub fn region_name(&self) -> Option<&str> {
        self.inner.region.as_deref()
    }

    pub(crate) fn events_sdk(&self) -> &aws_sdk_eventbridge::Client {
        &self.inner.events
    }

    pub(crate) fn cloudwatch_sdk(&self) -> &aws_sdk_cloudwatch::Client {
        &self.inner.cloudwatch
    }

    pub(crate) fn sqs_sdk(&self) -> &aws_sdk_sqs::Client {
        &self.inner.sqs
    }

    pub(crate) fn lambda_sdk(&self) -> &aws_sdk_lambda::Client {
        &self.inner.lambda
    }

    pub(crate) fn sts_sdk(&self) -> &aws_sdk_sts::Client {
        &self.inner.sts
    }
}

/// Builder for configuring an [`AwsBackend`]
pub struct AwsBackendBuilder {
    config: ClientConfig,
}

impl Default for AwsBackendBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AwsBackendBuilder {
    /// Create a new builder
    #[must_use]
    pub const fn new() -> Self {
        Self {
            config: ClientConfig::new(),
        }
    }

    /// Start from an existing configuration
    #[must_use]
    pub const fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Set the region
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config = self.config.region(region);
        self
    }

    /// Set the shared config profile
    #[must_use]
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.config = self.config.profile(profile);
        self
    }

    /// Set the endpoint override (useful for testing)
    #[must_use]
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.config = self.config.endpoint_url(url);
        self
    }

    /// Set maximum SDK attempts per call
    #[must_use]
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config = self.config.max_attempts(attempts);
        self
    }

    /// Resolve credentials and region through the SDK chain and build the clients
    pub async fn load(self) -> AwsBackend {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .retry_config(RetryConfig::standard().with_max_attempts(self.config.max_attempts));

        if let Some(region) = self.config.region {
            loader = loader.region(Region::new(region));
        }
        if let Some(profile) = self.config.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(url) = self.config.endpoint_url {
            loader = loader.endpoint_url(url);
        }

        let sdk_config = loader.load().await;
        debug!(region = ?sdk_config.region(), "loaded AWS configuration");
        AwsBackend::from_sdk_config(&sdk_config)
    }
}
