// Stripe-specific error types and the decline/failure classifier.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::connection::{DeclineReason, ParsedResponse, TransactionStatus};
use crate::transport::TransportError;

const CARD_DECLINED: &str = "card_declined";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StripeErrorType {
    ApiConnectionError,
    ApiError,
    AuthenticationError,
    CardError,
    IdempotencyError,
    InvalidRequestError,
    RateLimitError,
    ValidationError,
    Unknown,
}

impl From<&str> for StripeErrorType {
    fn from(s: &str) -> Self {
        match s {
            "api_connection_error" => StripeErrorType::ApiConnectionError,
            "api_error" => StripeErrorType::ApiError,
            "authentication_error" => StripeErrorType::AuthenticationError,
            "card_error" => StripeErrorType::CardError,
            "idempotency_error" => StripeErrorType::IdempotencyError,
            "invalid_request_error" => StripeErrorType::InvalidRequestError,
            "rate_limit_error" => StripeErrorType::RateLimitError,
            "validation_error" => StripeErrorType::ValidationError,
            _ => StripeErrorType::Unknown,
        }
    }
}

impl StripeErrorType {
    fn describe(&self) -> &'static str {
        match self {
            StripeErrorType::ApiConnectionError | StripeErrorType::ApiError => "gateway unavailable",
            StripeErrorType::AuthenticationError => "gateway authentication failed",
            StripeErrorType::CardError => "card was not accepted",
            StripeErrorType::IdempotencyError => "conflicting duplicate request",
            StripeErrorType::InvalidRequestError | StripeErrorType::ValidationError => {
                "gateway rejected the request"
            }
            StripeErrorType::RateLimitError => "gateway rate limit exceeded",
            StripeErrorType::Unknown => "gateway returned an error",
        }
    }
}

// Stripe REST error envelope: { error: { type, code, decline_code, message, param } }
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeErrorEnvelope {
    pub error: StripeErrorDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeErrorDetails {
    #[serde(rename = "type", default)]
    pub type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decline_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

impl StripeErrorEnvelope {
    pub fn to_api_error_with_status(self, status: u16) -> StripeApiError {
        StripeApiError::Stripe {
            type_: StripeErrorType::from(self.error.type_.as_str()),
            message: self.error.message,
            code: self.error.code,
            decline_code: self.error.decline_code,
            param: self.error.param,
            status,
        }
    }
}

#[derive(Debug, Error)]
pub enum StripeApiError {
    #[error("http error: {0}")]
    Http(#[from] TransportError),
    #[error("encode error: {0}")]
    Encode(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("stripe error: {type_:?} status={status} code={code:?} decline_code={decline_code:?} param={param:?} message={message:?}")]
    Stripe {
        type_: StripeErrorType,
        message: Option<String>,
        code: Option<String>,
        decline_code: Option<String>,
        param: Option<String>,
        status: u16,
    },
    #[error("unexpected http status {status}")]
    UnexpectedStatus { status: u16 },
    #[error("payment intent {intent_id} is {actual}, expected {expected}")]
    UnexpectedState {
        intent_id: String,
        expected: TransactionStatus,
        actual: String,
    },
    #[error("precondition failed: {0}")]
    Precondition(&'static str),
}

impl StripeApiError {
    /// Host-safe diagnostic. Never contains raw gateway payloads or status tokens.
    pub fn diagnostic(&self) -> String {
        match self {
            StripeApiError::Http(TransportError::Timeout(_)) => "gateway request timed out".to_string(),
            StripeApiError::Http(_) => "gateway request could not be completed".to_string(),
            StripeApiError::Encode(_) => "gateway request could not be encoded".to_string(),
            StripeApiError::Decode(_) => "gateway response could not be parsed".to_string(),
            StripeApiError::Stripe { type_, status, .. } => {
                format!("{} (http status {status})", type_.describe())
            }
            StripeApiError::UnexpectedStatus { status } => {
                format!("gateway returned unexpected http status {status}")
            }
            StripeApiError::UnexpectedState { expected, .. } => {
                format!("payment intent did not reach the {expected} state")
            }
            StripeApiError::Precondition(msg) => msg.to_string(),
        }
    }
}

// Map a non-success response body onto the error taxonomy.
pub fn map_error(status: u16, body: &str) -> StripeApiError {
    match serde_json::from_str::<StripeErrorEnvelope>(body) {
        Ok(env) => env.to_api_error_with_status(status),
        Err(_) => StripeApiError::UnexpectedStatus { status },
    }
}

/// The only decline sub-reasons reported to the host. Everything else is a failure.
pub fn decline_reason(code: Option<&str>, decline_code: Option<&str>) -> Option<DeclineReason> {
    match (code, decline_code) {
        (Some(CARD_DECLINED), Some("insufficient_funds")) => Some(DeclineReason::InsufficientFunds),
        _ => None,
    }
}

/// Classifier for authorization outcomes: a recognized card decline becomes
/// DECLINED, anything else collapses to FAILED.
pub fn classify_decline(err: &StripeApiError) -> ParsedResponse {
    if let StripeApiError::Stripe {
        code, decline_code, ..
    } = err
    {
        if let Some(reason) = decline_reason(code.as_deref(), decline_code.as_deref()) {
            return ParsedResponse::declined(reason);
        }
    }
    classify_failure(err)
}

/// Classifier for capture and cancel, which never end DECLINED.
pub fn classify_failure(err: &StripeApiError) -> ParsedResponse {
    warn!(target: "stripe", error = %err, "stripe operation failed");
    ParsedResponse::failed(err.diagnostic())
}

/// Classify a raw error response as returned by the gateway.
pub fn classify_error_payload(status: u16, body: &str) -> ParsedResponse {
    classify_decline(&map_error(status, body))
}
