//! Mapping of AWS SDK errors onto [`AuditError`].

use aws_sdk_eventbridge::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use eventaudit_core::AuditError;
use tracing::warn;

/// Convert an SDK error from any service client.
///
/// All service crates share the smithy `SdkError` type, so one mapping
/// covers EventBridge, CloudWatch, SQS, Lambda and STS.
pub(crate) fn from_sdk<E, R>(operation: &str, resource: &str, err: SdkError<E, R>) -> AuditError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
            return AuditError::Connection(format!("{operation}: {message}"));
        }
        _ => {}
    }

    let code = err
        .as_service_error()
        .and_then(ProvideErrorMetadata::code)
        .unwrap_or("Unknown");
    classify(operation, resource, code, message)
}

/// Classify a service error code
pub(crate) fn classify(operation: &str, resource: &str, code: &str, message: String) -> AuditError {
    match code {
        "AccessDeniedException" | "AccessDenied" | "AuthorizationError"
        | "UnauthorizedOperation" => AuditError::AccessDenied {
            operation: operation.to_string(),
            resource: resource.to_string(),
        },
        "ResourceNotFoundException"
        | "ResourceNotFound"
        | "QueueDoesNotExist"
        | "AWS.SimpleQueueService.NonExistentQueue" => AuditError::NotFound {
            resource: resource.to_string(),
        },
        "ThrottlingException" | "Throttling" | "TooManyRequestsException"
        | "RequestLimitExceeded" => {
            warn!(operation, resource, "throttled after SDK retries");
            AuditError::Throttled {
                operation: operation.to_string(),
            }
        }
        "ExpiredToken"
        | "ExpiredTokenException"
        | "InvalidClientTokenId"
        | "UnrecognizedClientException"
        | "SignatureDoesNotMatch" => AuditError::Authentication(message),
        _ => AuditError::Api {
            operation: operation.to_string(),
            code: code.to_string(),
            message,
        },
    }
}
