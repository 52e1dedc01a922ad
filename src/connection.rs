//! Host-facing processor contract and its canonical request/result model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gateway credentials supplied with every request.
///
/// Both values are opaque to the connection; the API key is only ever used
/// to build the bearer header.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(default)]
    pub account_id: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(account_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            api_key: api_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Raw card fields, forwarded verbatim to the gateway.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub card_number: String,
    pub expiry_month: u8,
    pub expiry_year: u16,
    pub cvv: String,
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("card_number", &"<redacted>")
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cvv", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub processor_config: Credentials,
    pub payment_method: CardDetails,
    /// Amount in the currency's minor unit.
    pub amount: i64,
    pub currency_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub processor_config: Credentials,
    pub processor_transaction_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelRequest {
    pub processor_config: Credentials,
    pub processor_transaction_id: String,
}

/// Canonical, gateway-agnostic transaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Authorized,
    Settled,
    Cancelled,
    Declined,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Authorized => "AUTHORIZED",
            TransactionStatus::Settled => "SETTLED",
            TransactionStatus::Cancelled => "CANCELLED",
            TransactionStatus::Declined => "DECLINED",
            TransactionStatus::Failed => "FAILED",
        }
    }

    /// Terminal states receive no further transitions from this connection.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Authorized)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable business reason attached to a declined authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeclineReason {
    InsufficientFunds,
}

impl DeclineReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclineReason::InsufficientFunds => "INSUFFICIENT_FUNDS",
        }
    }
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized outcome of one operation.
///
/// Fields are private so that only the constructors below can build a value:
/// a declined result always has a reason, a failed one always has a message,
/// and no other status carries either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    processor_transaction_id: Option<String>,
    transaction_status: TransactionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    decline_reason: Option<DeclineReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

pub type ParsedAuthorizationResponse = ParsedResponse;
pub type ParsedCaptureResponse = ParsedResponse;
pub type ParsedCancelResponse = ParsedResponse;

impl ParsedResponse {
    fn success(status: TransactionStatus, processor_transaction_id: Option<String>) -> Self {
        Self {
            processor_transaction_id,
            transaction_status: status,
            decline_reason: None,
            error_message: None,
        }
    }

    pub fn authorized(processor_transaction_id: impl Into<String>) -> Self {
        Self::success(
            TransactionStatus::Authorized,
            Some(processor_transaction_id.into()),
        )
    }

    pub fn settled(processor_transaction_id: Option<String>) -> Self {
        Self::success(TransactionStatus::Settled, processor_transaction_id)
    }

    pub fn cancelled(processor_transaction_id: Option<String>) -> Self {
        Self::success(TransactionStatus::Cancelled, processor_transaction_id)
    }

    pub fn declined(reason: DeclineReason) -> Self {
        Self {
            processor_transaction_id: None,
            transaction_status: TransactionStatus::Declined,
            decline_reason: Some(reason),
            error_message: None,
        }
    }

    /// An empty message is replaced so a failed result never has a blank diagnostic.
    pub fn failed(message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "payment processor request failed".to_string();
        }
        Self {
            processor_transaction_id: None,
            transaction_status: TransactionStatus::Failed,
            decline_reason: None,
            error_message: Some(message),
        }
    }

    pub fn processor_transaction_id(&self) -> Option<&str> {
        self.processor_transaction_id.as_deref()
    }

    pub fn transaction_status(&self) -> TransactionStatus {
        self.transaction_status
    }

    pub fn decline_reason(&self) -> Option<DeclineReason> {
        self.decline_reason
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

/// The host framework's view of a payment processor.
///
/// Every operation resolves to a [`ParsedResponse`]; gateway and transport
/// problems are reported as `FAILED` results rather than errors.
#[async_trait]
pub trait ProcessorConnection: Send + Sync {
    fn name(&self) -> &'static str;

    fn website(&self) -> &'static str;

    /// Credentials this connection was configured with.
    fn configuration(&self) -> &Credentials;

    async fn authorize(&self, request: AuthorizationRequest) -> ParsedAuthorizationResponse;

    async fn capture(&self, request: CaptureRequest) -> ParsedCaptureResponse;

    async fn cancel(&self, request: CancelRequest) -> ParsedCancelResponse;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_never_has_blank_message() {
        let resp = ParsedResponse::failed("   ");
        assert_eq!(resp.transaction_status(), TransactionStatus::Failed);
        assert!(!resp.error_message().unwrap().trim().is_empty());
    }

    #[test]
    fn test_declined_carries_reason_only() {
        let resp = ParsedResponse::declined(DeclineReason::InsufficientFunds);
        assert_eq!(resp.decline_reason(), Some(DeclineReason::InsufficientFunds));
        assert!(resp.processor_transaction_id().is_none());
        assert!(resp.error_message().is_none());
    }

    #[test]
    fn test_serializes_host_field_names() {
        let json = serde_json::to_value(ParsedResponse::authorized("pi_123")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "processorTransactionId": "pi_123",
                "transactionStatus": "AUTHORIZED"
            })
        );

        let json = serde_json::to_value(ParsedResponse::declined(DeclineReason::InsufficientFunds))
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "transactionStatus": "DECLINED",
                "declineReason": "INSUFFICIENT_FUNDS"
            })
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::new("pk_test_1", "sk_test_secret");
        let card = CardDetails {
            card_number: "4242424242424242".to_string(),
            expiry_month: 4,
            expiry_year: 2030,
            cvv: "123".to_string(),
        };
        let out = format!("{creds:?} {card:?}");
        assert!(!out.contains("sk_test_secret"));
        assert!(!out.contains("4242424242424242"));
        assert!(!out.contains("123\""));
    }

    #[test]
    fn test_only_authorized_is_non_terminal() {
        assert!(!TransactionStatus::Authorized.is_terminal());
        for s in [
            TransactionStatus::Settled,
            TransactionStatus::Cancelled,
            TransactionStatus::Declined,
            TransactionStatus::Failed,
        ] {
            assert!(s.is_terminal());
        }
    }
}
