// Stripe processor connection

pub mod authorize;
pub mod cancel;
pub mod capture;
pub mod errors;
pub mod rest;
pub mod status;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use std::sync::Arc;

use crate::connection::{
    AuthorizationRequest, CancelRequest, CaptureRequest, Credentials, ParsedAuthorizationResponse,
    ParsedCancelResponse, ParsedCaptureResponse, ProcessorConnection,
};
use crate::settings::StripeSettings;
use crate::transport::{HttpClient, ReqwestClient, TransportError};
use self::rest::StripeRestClient;

#[derive(Clone)]
pub struct StripeConnection {
    pub(crate) configuration: Credentials,
    pub(crate) rest: StripeRestClient,
}

impl StripeConnection {
    // Build reqwest transport with rustls and timeout from cfg.
    pub fn new(cfg: &StripeSettings) -> Result<Self, TransportError> {
        let http = ReqwestClient::new(cfg.timeout_ms)?;
        Ok(Self::with_transport(cfg, Arc::new(http)))
    }

    pub fn with_transport(cfg: &StripeSettings, http: Arc<dyn HttpClient>) -> Self {
        let rest = StripeRestClient::new(http)
            .with_base(cfg.api_base.clone())
            .with_version(Some(cfg.stripe_version.clone()));
        Self {
            configuration: cfg.credentials(),
            rest,
        }
    }

    pub fn rest(&self) -> &StripeRestClient {
        &self.rest
    }
}

#[async_trait]
impl ProcessorConnection for StripeConnection {
    fn name(&self) -> &'static str {
        "STRIPE"
    }

    fn website(&self) -> &'static str {
        "stripe.com"
    }

    fn configuration(&self) -> &Credentials {
        &self.configuration
    }

    async fn authorize(&self, request: AuthorizationRequest) -> ParsedAuthorizationResponse {
        authorize::authorize(&self.rest, &request).await
    }

    async fn capture(&self, request: CaptureRequest) -> ParsedCaptureResponse {
        capture::capture(&self.rest, &request).await
    }

    async fn cancel(&self, request: CancelRequest) -> ParsedCancelResponse {
        cancel::cancel(&self.rest, &request).await
    }
}
