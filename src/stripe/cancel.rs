use tracing::{info, instrument};

use crate::connection::{CancelRequest, ParsedCancelResponse, ParsedResponse, TransactionStatus};
use crate::stripe::errors::{classify_failure, StripeApiError};
use crate::stripe::rest::{parse_payment_intent, StripeRestClient};
use crate::stripe::status::map_intent_status;
use crate::stripe::types::ensure_transaction_id;
use crate::transport::HttpResponse;

/// Release the hold on an authorized intent.
#[instrument(skip(rest, request), fields(intent_id = %request.processor_transaction_id))]
pub async fn cancel(rest: &StripeRestClient, request: &CancelRequest) -> ParsedCancelResponse {
    let intent_id = request.processor_transaction_id.as_str();
    if let Err(e) = ensure_transaction_id(intent_id) {
        return classify_failure(&e);
    }

    let parsed = match rest.cancel_intent(&request.processor_config, intent_id).await {
        Ok(resp) => parse_cancel_response(&resp),
        Err(e) => classify_failure(&e),
    };
    info!(target: "stripe", status = %parsed.transaction_status(), "cancel finished");
    parsed
}

pub fn parse_cancel_response(resp: &HttpResponse) -> ParsedCancelResponse {
    let intent = match parse_payment_intent(resp) {
        Ok(intent) => intent,
        Err(e) => return classify_failure(&e),
    };
    match map_intent_status(&intent.status) {
        Some(TransactionStatus::Cancelled) => ParsedResponse::cancelled(Some(intent.id)),
        _ => classify_failure(&StripeApiError::UnexpectedState {
            intent_id: intent.id,
            expected: TransactionStatus::Cancelled,
            actual: intent.status,
        }),
    }
}
