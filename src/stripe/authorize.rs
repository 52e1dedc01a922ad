// Two-step authorization: tokenize the card, then create and confirm a
// manual-capture payment intent.

use tracing::{info, instrument, warn};

use crate::connection::{AuthorizationRequest, ParsedAuthorizationResponse, ParsedResponse, TransactionStatus};
use crate::stripe::errors::{classify_decline, classify_failure, StripeApiError};
use crate::stripe::rest::{parse_payment_intent, parse_payment_method, StripeRestClient};
use crate::stripe::status::map_intent_status;
use crate::stripe::types::ensure_amount_and_currency;
use crate::transport::HttpResponse;

#[instrument(
    skip(rest, request),
    fields(amount = request.amount, currency = %request.currency_code)
)]
pub async fn authorize(rest: &StripeRestClient, request: &AuthorizationRequest) -> ParsedAuthorizationResponse {
    if let Err(e) = ensure_amount_and_currency(request.amount, &request.currency_code) {
        return classify_failure(&e);
    }
    let creds = &request.processor_config;

    let token = match rest.create_payment_method(creds, &request.payment_method).await {
        Ok(resp) => match parse_tokenize_response(&resp) {
            Ok(token) => token,
            Err(failed) => return failed,
        },
        Err(e) => return classify_failure(&e),
    };

    let resp = match rest
        .create_payment_intent(creds, request.amount, &request.currency_code, &token)
        .await
    {
        Ok(resp) => resp,
        Err(e) => return classify_failure(&e),
    };

    let parsed = parse_authorization_response(&resp);
    info!(
        target: "stripe",
        status = %parsed.transaction_status(),
        processor_transaction_id = parsed.processor_transaction_id().unwrap_or(""),
        "authorization finished"
    );
    parsed
}

/// Extract the payment method token. Any failure here is terminal for the
/// authorization and is reported as FAILED.
pub fn parse_tokenize_response(resp: &HttpResponse) -> Result<String, ParsedResponse> {
    parse_payment_method(resp).map(|pm| pm.id).map_err(|e| {
        warn!(target: "stripe", "payment method tokenization failed; intent not created");
        classify_failure(&e)
    })
}

pub fn parse_authorization_response(resp: &HttpResponse) -> ParsedAuthorizationResponse {
    let intent = match parse_payment_intent(resp) {
        Ok(intent) => intent,
        Err(e) => return classify_decline(&e),
    };
    match map_intent_status(&intent.status) {
        Some(TransactionStatus::Authorized) => ParsedResponse::authorized(intent.id),
        _ => classify_failure(&StripeApiError::UnexpectedState {
            intent_id: intent.id,
            expected: TransactionStatus::Authorized,
            actual: intent.status,
        }),
    }
}
