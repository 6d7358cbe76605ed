//! Delivery through `ReqwestNotifier` against a local axum webhook sink.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use std::sync::{Arc, Mutex};

use git_push_notify::{
    ChatMessage, NotificationDispatcher, Notifier, NotifyError, ReqwestNotifier,
    WebhookResolver,
};

#[derive(Clone, Default)]
struct Sink {
    received: Arc<Mutex<Vec<(Option<String>, String)>>>,
}

async fn accept(State(sink): State<Sink>, headers: HeaderMap, body: Bytes) -> StatusCode {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    sink.received
        .lock()
        .unwrap()
        .push((content_type, String::from_utf8_lossy(&body).into_owned()));
    StatusCode::OK
}

async fn reject() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "no_service")
}

/// Serves the sink on an ephemeral port and returns its base URL.
async fn start_sink(sink: Sink) -> String {
    let app = Router::new()
        .route("/hook", post(accept))
        .route("/gone", post(reject))
        .with_state(sink);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Local sink only; ignore any proxy set in the environment.
fn notifier() -> ReqwestNotifier {
    ReqwestNotifier::new(reqwest::Client::builder().no_proxy().build().unwrap())
}

fn message() -> ChatMessage {
    ChatMessage {
        channel: Some("#deploys".to_string()),
        text: "Push on `Tools` by `Alice <alice@example.com>`.".to_string(),
        mrkdwn: true,
        attachments: Vec::new(),
    }
}

#[tokio::test]
async fn posts_json_to_endpoint() {
    let sink = Sink::default();
    let base = start_sink(sink.clone()).await;
    let notifier = notifier();
    let endpoint = WebhookResolver::resolve(Some(&format!("{}/hook", base)), None);

    NotificationDispatcher::new(&notifier)
        .dispatch(&endpoint, &message())
        .await
        .unwrap();

    let received = sink.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].0.as_deref(), Some("application/json"));
    assert_eq!(received[0].1, message().to_json().unwrap());
}

#[tokio::test]
async fn non_success_status_is_a_delivery_error() {
    let base = start_sink(Sink::default()).await;
    let notifier = notifier();

    let err = notifier
        .post(&format!("{}/gone", base), "{}".to_string())
        .await
        .unwrap_err();

    match err {
        NotifyError::Delivery {
            status, message, ..
        } => {
            assert_eq!(status, Some(404));
            assert_eq!(message, "no_service");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_a_delivery_error() {
    // Bind then drop to get a port with nothing listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = notifier()
        .post(&format!("http://{}/hook", addr), "{}".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, NotifyError::Delivery { status: None, .. }));
}
