// Stripe REST client
// Builds the four gateway requests and hands them to the transport. Responses
// are returned raw; parsing belongs to the flows.

use http::Method;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::connection::{CardDetails, Credentials};
use crate::settings::DEFAULT_STRIPE_API_BASE;
use crate::stripe::errors::{map_error, StripeApiError};
use crate::stripe::types::{encode_form, payment_intent_form, payment_method_form, PaymentIntent, PaymentMethod};
use crate::transport::{HttpClient, HttpRequest, HttpResponse};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Clone)]
pub struct StripeRestClient {
    pub(crate) http: Arc<dyn HttpClient>,
    pub(crate) api_base: String,
    pub(crate) stripe_version: Option<String>,
}

impl StripeRestClient {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            api_base: DEFAULT_STRIPE_API_BASE.to_string(),
            stripe_version: None,
        }
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_version(mut self, ver: impl Into<Option<String>>) -> Self {
        self.stripe_version = ver.into().filter(|v| !v.is_empty());
        self
    }

    pub fn common_headers(&self, creds: &Credentials) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ("Authorization".to_string(), format!("Bearer {}", creds.api_key)),
        ];
        if let Some(v) = &self.stripe_version {
            headers.push(("Stripe-Version".to_string(), v.clone()));
        }
        headers
    }

    async fn post(&self, path: &str, creds: &Credentials, body: String) -> Result<HttpResponse, StripeApiError> {
        let url = format!("{}{}", self.api_base, path);
        let options = HttpRequest {
            method: Method::POST,
            headers: self.common_headers(creds),
            body,
        };
        let resp = self.http.request(&url, options).await?;
        info!(
            target: "stripe",
            method = "POST",
            path = %path,
            status = resp.status_code,
            "stripe response"
        );
        Ok(resp)
    }

    // POST /v1/payment_methods
    #[instrument(skip_all, fields(method = "POST", path = "/v1/payment_methods"))]
    pub async fn create_payment_method(
        &self,
        creds: &Credentials,
        card: &CardDetails,
    ) -> Result<HttpResponse, StripeApiError> {
        let body = encode_form(&payment_method_form(card))?;
        info!(target: "stripe", method = "POST", path = "/v1/payment_methods", "stripe request");
        self.post("/v1/payment_methods", creds, body).await
    }

    // POST /v1/payment_intents
    #[instrument(skip(self, creds), fields(method = "POST", path = "/v1/payment_intents"))]
    pub async fn create_payment_intent(
        &self,
        creds: &Credentials,
        amount: i64,
        currency: &str,
        payment_method_id: &str,
    ) -> Result<HttpResponse, StripeApiError> {
        let body = encode_form(&payment_intent_form(amount, currency, payment_method_id))?;
        info!(
            target: "stripe",
            method = "POST",
            path = "/v1/payment_intents",
            amount = amount,
            currency = %currency,
            "stripe request"
        );
        self.post("/v1/payment_intents", creds, body).await
    }

    // POST /v1/payment_intents/{id}/capture
    #[instrument(skip(self, creds), fields(method = "POST", path = "/v1/payment_intents/{id}/capture"))]
    pub async fn capture_intent(&self, creds: &Credentials, intent_id: &str) -> Result<HttpResponse, StripeApiError> {
        info!(target: "stripe", method = "POST", intent_id = %intent_id, "stripe capture request");
        self.post(&format!("/v1/payment_intents/{intent_id}/capture"), creds, String::new())
            .await
    }

    // POST /v1/payment_intents/{id}/cancel
    #[instrument(skip(self, creds), fields(method = "POST", path = "/v1/payment_intents/{id}/cancel"))]
    pub async fn cancel_intent(&self, creds: &Credentials, intent_id: &str) -> Result<HttpResponse, StripeApiError> {
        info!(target: "stripe", method = "POST", intent_id = %intent_id, "stripe cancel request");
        self.post(&format!("/v1/payment_intents/{intent_id}/cancel"), creds, String::new())
            .await
    }
}

fn decode_success<T: serde::de::DeserializeOwned>(resp: &HttpResponse) -> Result<T, StripeApiError> {
    if resp.status_code != 200 {
        return Err(map_error(resp.status_code, &resp.response_text));
    }
    serde_json::from_str::<T>(&resp.response_text).map_err(|e| StripeApiError::Decode(e.to_string()))
}

/// Decode a tokenization response; an empty id counts as missing.
pub fn parse_payment_method(resp: &HttpResponse) -> Result<PaymentMethod, StripeApiError> {
    let pm: PaymentMethod = decode_success(resp)?;
    if pm.id.is_empty() {
        return Err(StripeApiError::Decode("payment method id is empty".to_string()));
    }
    Ok(pm)
}

pub fn parse_payment_intent(resp: &HttpResponse) -> Result<PaymentIntent, StripeApiError> {
    let intent: PaymentIntent = decode_success(resp)?;
    if intent.id.is_empty() {
        return Err(StripeApiError::Decode("payment intent id is empty".to_string()));
    }
    Ok(intent)
}
