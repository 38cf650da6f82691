use ccai::{HandlerError, SIGNATURE_HEADER, WebhookEvent, WebhookHandler, sign_payload};
use http::{Method, Request};
use tracing_subscriber::EnvFilter;

const SECRET: &str = "demo-secret";

const DELIVERY: &str = r#"{
    "type": "message.received",
    "campaign": {
        "id": 12345,
        "title": "Demo",
        "message": "",
        "senderPhone": "+15559876543",
        "createdAt": "2025-07-22T12:00:00Z",
        "runAt": ""
    },
    "from": "+15551234567",
    "to": "+15559876543",
    "message": "STOP"
}"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "ccai=info".into()))
        .init();

    let handler = WebhookHandler::builder()
        .secret(SECRET)
        .log_events(true)
        .on_message_received(|event: WebhookEvent| async move {
            let payload = event.payload();
            println!("reply from {}: {}", payload.from, payload.message);
            Ok::<(), HandlerError>(())
        })
        .build();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/webhooks/ccai")
        .header(SIGNATURE_HEADER, sign_payload(SECRET, DELIVERY.as_bytes()))
        .body(DELIVERY)?;

    let response = handler.handle(&request).await;
    println!("{} {}", response.status(), response.body());

    Ok(())
}
