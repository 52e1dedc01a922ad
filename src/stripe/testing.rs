// Scripted transport for flow tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::connection::{CardDetails, Credentials};
use crate::stripe::rest::StripeRestClient;
use crate::transport::{HttpClient, HttpRequest, HttpResponse, TransportError};

#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    calls: Mutex<Vec<(String, HttpRequest)>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(self: &Arc<Self>, status_code: u16, body: &str) -> Arc<Self> {
        self.replies.lock().unwrap().push_back(Ok(HttpResponse {
            status_code,
            response_text: body.to_string(),
        }));
        Arc::clone(self)
    }

    pub fn fail(self: &Arc<Self>, err: TransportError) -> Arc<Self> {
        self.replies.lock().unwrap().push_back(Err(err));
        Arc::clone(self)
    }

    pub fn calls(&self) -> Vec<(String, HttpRequest)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn rest(self: &Arc<Self>) -> StripeRestClient {
        StripeRestClient::new(Arc::clone(self) as Arc<dyn HttpClient>).with_base("https://stripe.test")
    }
}

#[async_trait]
impl HttpClient for ScriptedTransport {
    async fn request(&self, url: &str, options: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push((url.to_string(), options));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("no scripted reply".to_string())))
    }
}

pub fn creds() -> Credentials {
    Credentials::new("pk_test_acct", "sk_test_key")
}

pub fn card() -> CardDetails {
    CardDetails {
        card_number: "4242424242424242".to_string(),
        expiry_month: 12,
        expiry_year: 2030,
        cvv: "123".to_string(),
    }
}
