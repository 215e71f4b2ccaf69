//! `HttpOrderApi` and `CheckoutFlow` against a local mock of the order backend.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use pitchai_web::checkout::{CaptureOutcome, CheckoutState, HttpOrderApi, OrderApi, OrderId, RecordingSink};
use pitchai_web::{CheckoutConfig, CheckoutError, CheckoutFlow};
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct Backend {
    created: Arc<Mutex<Vec<Value>>>,
    captured: Arc<Mutex<Vec<String>>>,
}

async fn create(State(backend): State<Backend>, Json(body): Json<Value>) -> Json<Value> {
    let mut created = backend.created.lock().unwrap();
    created.push(body);
    Json(json!({ "id": format!("ORDER-{}", created.len()), "status": "CREATED" }))
}

async fn capture(State(backend): State<Backend>, Path(id): Path<String>) -> axum::response::Response {
    backend.captured.lock().unwrap().push(id.clone());
    match id.as_str() {
        "ORDER-1" => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "name": "UNPROCESSABLE_ENTITY",
                "details": [{ "issue": "INSTRUMENT_DECLINED", "description": "The instrument was declined." }],
                "debug_id": "d1"
            })),
        )
            .into_response(),
        "BROKEN" => (StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>").into_response(),
        _ => Json(json!({
            "id": id,
            "status": "COMPLETED",
            "purchase_units": [{
                "payments": { "captures": [{ "id": format!("TX-{id}"), "status": "COMPLETED" }] }
            }]
        }))
        .into_response(),
    }
}

async fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/api/orders", post(create))
        .route("/api/orders/{id}/capture", post(capture))
        .with_state(backend.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), backend)
}

fn flow_for(base_url: &str) -> CheckoutFlow<HttpOrderApi, RecordingSink> {
    let config = CheckoutConfig::default().with_base_url(base_url);
    let api = HttpOrderApi::from_config(&config).unwrap();
    CheckoutFlow::new(api, RecordingSink::new(), config)
}

#[tokio::test]
async fn create_posts_cart_json() {
    let (base_url, backend) = spawn_backend().await;
    let api = HttpOrderApi::new(&base_url).unwrap();

    let request = pitchai_web::checkout::CreateOrderRequest { cart: CheckoutConfig::default().cart };
    let body = api.create_order(&request).await.unwrap();
    assert_eq!(body["id"], "ORDER-1");

    let created = backend.created.lock().unwrap();
    assert_eq!(created[0], json!({ "cart": [{ "id": "pitchai_upgrade", "quantity": "1" }] }));
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let (base_url, _backend) = spawn_backend().await;
    let api = HttpOrderApi::new(&base_url).unwrap();

    let err = api.capture_order(&OrderId::new("BROKEN")).await.unwrap_err();
    let CheckoutError::Decode(detail) = err else {
        panic!("expected decode error, got {err:?}");
    };
    assert!(detail.starts_with("status 502"));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let api = HttpOrderApi::new("http://127.0.0.1:9").unwrap();
    let err = api.capture_order(&OrderId::new("ORDER-1")).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Transport(_)));
}

#[tokio::test]
async fn declined_then_captured_purchase() {
    let (base_url, backend) = spawn_backend().await;
    let flow = flow_for(&base_url);

    let first = flow.create_order().await.unwrap();
    assert_eq!(flow.capture_order(&first).await, CaptureOutcome::Restart);
    assert_eq!(flow.state(), CheckoutState::Declined);
    assert!(flow.sink().current().is_none());

    let second = flow.create_order().await.unwrap();
    assert_eq!(second, OrderId::new("ORDER-2"));
    let CaptureOutcome::Succeeded(transaction) = flow.capture_order(&second).await else {
        panic!("expected capture to succeed");
    };
    assert_eq!(transaction.id, "TX-ORDER-2");
    assert_eq!(transaction.status, "COMPLETED");
    assert!(flow.sink().current().unwrap().text().contains("Transaction COMPLETED: TX-ORDER-2"));
    assert!(flow.sink().button_hidden());

    assert_eq!(*backend.captured.lock().unwrap(), vec!["ORDER-1".to_owned(), "ORDER-2".to_owned()]);
}
