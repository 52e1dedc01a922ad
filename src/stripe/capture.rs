use tracing::{info, instrument};

use crate::connection::{CaptureRequest, ParsedCaptureResponse, ParsedResponse, TransactionStatus};
use crate::stripe::errors::{classify_failure, StripeApiError};
use crate::stripe::rest::{parse_payment_intent, StripeRestClient};
use crate::stripe::status::map_intent_status;
use crate::stripe::types::ensure_transaction_id;
use crate::transport::HttpResponse;

/// Capture the funds held by a manual-capture intent. Never touches card data.
#[instrument(skip(rest, request), fields(intent_id = %request.processor_transaction_id))]
pub async fn capture(rest: &StripeRestClient, request: &CaptureRequest) -> ParsedCaptureResponse {
    let intent_id = request.processor_transaction_id.as_str();
    if let Err(e) = ensure_transaction_id(intent_id) {
        return classify_failure(&e);
    }

    let parsed = match rest.capture_intent(&request.processor_config, intent_id).await {
        Ok(resp) => parse_capture_response(&resp),
        Err(e) => classify_failure(&e),
    };
    info!(target: "stripe", status = %parsed.transaction_status(), "capture finished");
    parsed
}

pub fn parse_capture_response(resp: &HttpResponse) -> ParsedCaptureResponse {
    let intent = match parse_payment_intent(resp) {
        Ok(intent) => intent,
        Err(e) => return classify_failure(&e),
    };
    match map_intent_status(&intent.status) {
        Some(TransactionStatus::Settled) => ParsedResponse::settled(Some(intent.id)),
        _ => classify_failure(&StripeApiError::UnexpectedState {
            intent_id: intent.id,
            expected: TransactionStatus::Settled,
            actual: intent.status,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stripe::testing::{creds, ScriptedTransport};

    fn request(id: &str) -> CaptureRequest {
        CaptureRequest {
            processor_config: creds(),
            processor_transaction_id: id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_capture_settles() {
        let transport =
            ScriptedTransport::new().reply(200, r#"{"id":"pi_3Mtw","object":"payment_intent","status":"succeeded"}"#);
        let resp = capture(&transport.rest(), &request("pi_3Mtw")).await;

        assert_eq!(resp.transaction_status(), TransactionStatus::Settled);
        assert_eq!(resp.processor_transaction_id(), Some("pi_3Mtw"));
        assert!(resp.error_message().is_none());

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "https://stripe.test/v1/payment_intents/pi_3Mtw/capture");
        assert!(calls[0].1.body.is_empty());
        assert!(calls[0]
            .1
            .headers
            .contains(&("Authorization".to_string(), "Bearer sk_test_key".to_string())));
    }

    #[tokio::test]
    async fn test_capture_unknown_intent_fails() {
        let body = r#"{"error":{"type":"invalid_request_error","code":"resource_missing","message":"No such payment_intent: 'pi_nope'"}}"#;
        let transport = ScriptedTransport::new().reply(404, body);
        let resp = capture(&transport.rest(), &request("pi_nope")).await;

        assert_eq!(resp.transaction_status(), TransactionStatus::Failed);
        assert!(!resp.error_message().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_capture_decline_payload_still_fails() {
        let body = r#"{"error":{"type":"card_error","code":"card_declined","decline_code":"insufficient_funds"}}"#;
        let transport = ScriptedTransport::new().reply(402, body);
        let resp = capture(&transport.rest(), &request("pi_1")).await;

        assert_eq!(resp.transaction_status(), TransactionStatus::Failed);
        assert!(resp.decline_reason().is_none());
    }

    #[tokio::test]
    async fn test_capture_rejects_path_injection() {
        let transport = ScriptedTransport::new();
        let resp = capture(&transport.rest(), &request("pi_1/cancel")).await;

        assert_eq!(resp.transaction_status(), TransactionStatus::Failed);
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn test_capture_wrong_state_fails() {
        let resp = parse_capture_response(&HttpResponse {
            status_code: 200,
            response_text: r#"{"id":"pi_1","status":"requires_capture"}"#.to_string(),
        });
        assert_eq!(resp.transaction_status(), TransactionStatus::Failed);
    }
}
