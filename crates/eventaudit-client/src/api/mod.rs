//! Per-service API modules.

mod events;
mod functions;
mod identity;
mod metrics;
mod queues;

pub use events::EventsApi;
pub use functions::{unqualified_function_arn, FunctionsApi};
pub use identity::IdentityApi;
pub use metrics::MetricsApi;
pub use queues::{parse_queue_arn, QueueArn, QueuesApi};
