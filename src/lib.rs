//! Stripe processor connection.
//!
//! Translates the host framework's authorize, capture and cancel operations
//! into Stripe REST calls and folds every gateway outcome into a
//! [`connection::ParsedResponse`].

pub mod connection;
pub mod server;
pub mod settings;
pub mod stripe;
pub mod transport;

pub use connection::{
    AuthorizationRequest, CancelRequest, CaptureRequest, CardDetails, Credentials, DeclineReason,
    ParsedAuthorizationResponse, ParsedCancelResponse, ParsedCaptureResponse, ParsedResponse,
    ProcessorConnection, TransactionStatus,
};
pub use stripe::StripeConnection;
pub use transport::{HttpClient, HttpRequest, HttpResponse, ReqwestClient, TransportError};
