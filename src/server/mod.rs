// HTTP surface the host framework calls into.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::connection::{
    AuthorizationRequest, CancelRequest, CaptureRequest, CardDetails, Credentials, ParsedResponse,
    ProcessorConnection,
};

#[derive(Clone)]
pub struct AppState {
    pub connection: Arc<dyn ProcessorConnection>,
}

impl AppState {
    pub fn new(connection: Arc<dyn ProcessorConnection>) -> Self {
        Self { connection }
    }

    // Requests without credentials use the ones the connection was configured with.
    fn credentials(&self, supplied: Option<Credentials>) -> Credentials {
        supplied.unwrap_or_else(|| self.connection.configuration().clone())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeBody {
    #[serde(default)]
    pub processor_config: Option<Credentials>,
    pub payment_method: CardDetails,
    pub amount: i64,
    pub currency_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBody {
    #[serde(default)]
    pub processor_config: Option<Credentials>,
    pub processor_transaction_id: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/authorize", post(handle_authorize))
        .route("/capture", post(handle_capture))
        .route("/cancel", post(handle_cancel))
        .route("/health", get(health_check))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn handle_authorize(State(state): State<AppState>, Json(body): Json<AuthorizeBody>) -> Json<ParsedResponse> {
    let request = AuthorizationRequest {
        processor_config: state.credentials(body.processor_config),
        payment_method: body.payment_method,
        amount: body.amount,
        currency_code: body.currency_code,
    };
    debug!(amount = request.amount, currency = %request.currency_code, "authorize received");
    Json(state.connection.authorize(request).await)
}

async fn handle_capture(State(state): State<AppState>, Json(body): Json<TransactionBody>) -> Json<ParsedResponse> {
    let request = CaptureRequest {
        processor_config: state.credentials(body.processor_config),
        processor_transaction_id: body.processor_transaction_id,
    };
    debug!(intent_id = %request.processor_transaction_id, "capture received");
    Json(state.connection.capture(request).await)
}

async fn handle_cancel(State(state): State<AppState>, Json(body): Json<TransactionBody>) -> Json<ParsedResponse> {
    let request = CancelRequest {
        processor_config: state.credentials(body.processor_config),
        processor_transaction_id: body.processor_transaction_id,
    };
    debug!(intent_id = %request.processor_transaction_id, "cancel received");
    Json(state.connection.cancel(request).await)
}

/// Serve until `shutdown` resolves, then drain in-flight requests for at most `grace`.
pub async fn serve<S>(listener: TcpListener, state: AppState, shutdown: S, grace: Duration) -> anyhow::Result<()>
where
    S: Future<Output = ()> + Send,
{
    let addr = listener.local_addr()?;
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let app = router(state);

    info!(addr = %addr, "Starting processor connection HTTP server");
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        res = &mut server => {
            res??;
            return Ok(());
        }
        _ = shutdown => {}
    }

    info!("shutdown requested; draining in-flight requests");
    let _ = stop_tx.send(());
    match tokio::time::timeout(grace, server).await {
        Ok(res) => res??,
        Err(_) => warn!(grace = ?grace, "grace period elapsed with requests still in flight"),
    }
    Ok(())
}

pub async fn run_server(
    port: u16,
    connection: Arc<dyn ProcessorConnection>,
    grace: Duration,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    serve(listener, AppState::new(connection), shutdown_signal(), grace).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c; shutting down");
    }
}
