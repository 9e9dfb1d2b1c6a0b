//! CloudWatch API endpoints.

use crate::error::from_sdk;
use crate::AwsBackend;
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{Dimension, Statistic};
use eventaudit_core::{AlarmRecord, MetricQuery, Result};
use tracing::{debug, instrument};

/// CloudWatch API endpoints
pub struct MetricsApi<'a> {
    client: &'a AwsBackend,
}

impl<'a> MetricsApi<'a> {
    pub(crate) const fn new(client: &'a AwsBackend) -> Self {
        Self { client }
    }

    /// Fetch `Sum` datapoints for a metric over a window
    #[instrument(skip(self), fields(service = "cloudwatch", metric = %query.metric_name))]
    pub async fn sums(&self, query: &MetricQuery) -> Result<Vec<f64>> {
        let mut request = self
            .client
            .cloudwatch_sdk()
            .get_metric_statistics()
            .namespace(&query.namespace)
            .metric_name(&query.metric_name)
            .start_time(DateTime::from_secs(query.start_epoch_secs))
            .end_time(DateTime::from_secs(query.end_epoch_secs))
            .period(query.period_secs)
            .statistics(Statistic::Sum);

        for (name, value) in &query.dimensions {
            let dimension = Dimension::builder()
                .name(name)
                .value(value)
                .build();
            request = request.dimensions(dimension);
        }

        let output = request
            .send()
            .await
            .map_err(|e| from_sdk("GetMetricStatistics", &query.metric_name, e))?;

        let sums: Vec<f64> = output.datapoints().iter().filter_map(|d| d.sum()).collect();
        debug!(datapoints = sums.len(), "fetched metric statistics");
        Ok(sums)
    }

    /// List every metric alarm in the region
    #[instrument(skip(self), fields(service = "cloudwatch"))]
    pub async fn describe_alarms(&self) -> Result<Vec<AlarmRecord>> {
        let mut alarms = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .client
                .cloudwatch_sdk()
                .describe_alarms()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| from_sdk("DescribeAlarms", "alarms", e))?;

            alarms.extend(output.metric_alarms().iter().map(|alarm| AlarmRecord {
                name: alarm.alarm_name().unwrap_or_default().to_string(),
                namespace: alarm.namespace().map(str::to_string),
                metric_name: alarm.metric_name().map(str::to_string),
                dimensions: alarm
                    .dimensions()
                    .iter()
                    .map(|d| (
                            d.name().unwrap_or_default().to_string(),
                            d.value().unwrap_or_default().to_string(),
                        ))
                    .collect(),
            }));

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(count = alarms.len(), "listed metric alarms");
        Ok(alarms)
    }
}
