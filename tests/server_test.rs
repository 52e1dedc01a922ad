//! Host HTTP surface backed by a real connection and a mock gateway.

use std::sync::Arc;
use std::time::Duration;
use stripe_processor_connection::server::{serve, AppState};
use stripe_processor_connection::settings::StripeSettings;
use stripe_processor_connection::StripeConnection;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn post_json(url: &str, body: serde_json::Value) -> (u16, serde_json::Value) {
    let resp = reqwest::Client::new()
        .post(url)
        .header("Content-Type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap();
    (status, serde_json::from_str(&text).unwrap_or(serde_json::Value::Null))
}

#[tokio::test]
async fn authorize_and_capture_over_http() {
    let gateway = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/payment_methods"))
        .and(header("Authorization", "Bearer sk_test_srv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"pm_srv"}"#))
        .mount(&gateway)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"pi_srv","status":"requires_capture"}"#))
        .mount(&gateway)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/payment_intents/pi_srv/capture"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"pi_srv","status":"succeeded"}"#))
        .mount(&gateway)
        .await;

    let cfg = StripeSettings {
        api_key: "sk_test_srv".to_string(),
        account_id: "pk_test_srv".to_string(),
        api_base: gateway.uri(),
        ..Default::default()
    };
    let connection = StripeConnection::new(&cfg).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(serve(
        listener,
        AppState::new(Arc::new(connection)),
        async move {
            let _ = stop_rx.await;
        },
        Duration::from_secs(1),
    ));

    let (status, auth) = post_json(
        &format!("{base}/authorize"),
        serde_json::json!({
            "paymentMethod": {
                "cardNumber": "4242424242424242",
                "expiryMonth": 12,
                "expiryYear": 2030,
                "cvv": "123"
            },
            "amount": 2000,
            "currencyCode": "GBP"
        }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(
        auth,
        serde_json::json!({ "processorTransactionId": "pi_srv", "transactionStatus": "AUTHORIZED" })
    );

    let (status, captured) = post_json(
        &format!("{base}/capture"),
        serde_json::json!({ "processorTransactionId": "pi_srv" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(captured["transactionStatus"], "SETTLED");

    let (status, cancelled) = post_json(
        &format!("{base}/cancel"),
        serde_json::json!({ "processorTransactionId": "pi_unknown" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(cancelled["transactionStatus"], "FAILED");
    assert!(cancelled["errorMessage"].as_str().is_some());

    let _ = stop_tx.send(());
    server.await.unwrap().unwrap();
}
