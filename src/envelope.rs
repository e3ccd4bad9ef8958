//! Response envelope and status validation
//!
//! Every remote procedure returns an [`ApiEnvelope`] carrying a status code,
//! an optional message/code pair, and optionally typed result data. No
//! response payload is trusted until its status has been checked.

use crate::error::{ApiError, ApiResult};
use crate::types::ShipmentResponse;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Status code reported by the remote endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultStatus {
    /// The call was accepted
    Success,
    /// The call was rejected
    Failure,
}

/// Remote response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Call status
    pub status: ResultStatus,
    /// Machine-readable message code, when the endpoint supplies one
    pub message_code: Option<String>,
    /// Human-readable message, when the endpoint supplies one
    pub message: Option<String>,
    /// Typed result data, present on success for data-returning calls
    pub result_data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Build a success envelope carrying data
    pub fn success(data: T) -> Self {
        Self {
            status: ResultStatus::Success,
            message_code: None,
            message: None,
            result_data: Some(data),
        }
    }

    /// Build a failure envelope with a message code and message
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::Failure,
            message_code: Some(code.into()),
            message: Some(message.into()),
            result_data: None,
        }
    }

    /// Check the envelope status, erroring on failure.
    ///
    /// The remote message and code are carried into the error verbatim.
    pub fn ensure_success(&self) -> ApiResult<()> {
        match self.status {
            ResultStatus::Success => Ok(()),
            ResultStatus::Failure => Err(ApiError::Remote {
                code: self.message_code.clone(),
                message: self
                    .message
                    .clone()
                    .unwrap_or_else(|| "remote endpoint reported failure".to_string()),
            }),
        }
    }

    /// Check the status and take the result data.
    pub fn into_data(self) -> ApiResult<T> {
        self.ensure_success()?;
        self.result_data.ok_or_else(|| {
            ApiError::MalformedResponse("success envelope carried no result data".to_string())
        })
    }
}

/// Validate a batch of per-shipment results.
///
/// Scans left to right; every failing item is logged, and the first failure
/// encountered is returned as the representative error. Later failures stay
/// visible in the log only.
pub fn check_shipment_responses(responses: &[ShipmentResponse]) -> ApiResult<()> {
    let mut first_failure: Option<ApiError> = None;
    for response in responses {
        if response.success {
            continue;
        }
        let message = response
            .message
            .clone()
            .unwrap_or_else(|| "shipment rejected without message".to_string());
        error!(
            order = response.order.as_deref().unwrap_or("<unknown>"),
            message = %message,
            "shipment rejected by remote endpoint"
        );
        if first_failure.is_none() {
            first_failure = Some(ApiError::ShipmentRejected {
                order: response.order.clone(),
                message,
            });
        }
    }
    match first_failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
