//! Inbound webhook dispatch: signature checks, event classification and handler
//! invocation for a single HTTP delivery.
//!
//! The dispatcher works on [`http::Request`] / [`http::Response`] so it can sit
//! behind any server framework.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use http::header::CONTENT_TYPE;
use http::{HeaderName, HeaderValue, Method, Request, Response, StatusCode};
use serde_json::json;

use crate::domain::{WebhookEvent, WebhookEventType};
use crate::transport::{DecodedEvent, WebhookTransportError, decode_webhook_event};

mod signature;

pub use signature::{sign_payload, verify_signature};

/// Header carrying the hex HMAC-SHA256 of the raw body.
pub const SIGNATURE_HEADER: HeaderName = HeaderName::from_static("x-ccai-signature");

/// Error type handlers report failures with.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send>>;
type EventHandler = Arc<dyn Fn(WebhookEvent) -> HandlerFuture + Send + Sync>;

#[derive(Debug, thiserror::Error)]
enum WebhookError {
    #[error("Malformed webhook payload: {0}")]
    Payload(#[from] WebhookTransportError),

    #[error("Webhook handler failed: {0}")]
    Handler(#[source] HandlerError),
}

/// Builder for [`WebhookHandler`].
#[derive(Default)]
pub struct WebhookHandlerBuilder {
    secret: Option<String>,
    on_message_sent: Option<EventHandler>,
    on_message_received: Option<EventHandler>,
    log_events: bool,
}

impl WebhookHandlerBuilder {
    /// Require every delivery to carry a valid `x-ccai-signature` for `secret`.
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Run `handler` for `message.sent` events.
    pub fn on_message_sent<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(WebhookEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.on_message_sent = Some(boxed(handler));
        self
    }

    /// Run `handler` for `message.received` events.
    pub fn on_message_received<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(WebhookEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.on_message_received = Some(boxed(handler));
        self
    }

    /// Log every classified event at `info` level.
    pub fn log_events(mut self, enabled: bool) -> Self {
        self.log_events = enabled;
        self
    }

    pub fn build(self) -> WebhookHandler {
        if self.secret.is_none() {
            tracing::warn!("webhook handler has no secret configured; signatures are not verified");
        }
        WebhookHandler {
            secret: self.secret,
            on_message_sent: self.on_message_sent,
            on_message_received: self.on_message_received,
            log_events: self.log_events,
        }
    }
}

fn boxed<F, Fut>(handler: F) -> EventHandler
where
    F: Fn(WebhookEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    Arc::new(move |event| Box::pin(handler(event)) as HandlerFuture)
}

#[derive(Clone)]
/// Turns one webhook delivery into a handler call and an HTTP answer.
///
/// | Situation                                  | Status | Body                                   |
/// |--------------------------------------------|--------|----------------------------------------|
/// | method other than `POST`                   | 405    | `{"error":"Method not allowed"}`       |
/// | secret set, signature header missing       | 400    | `{"error":"Missing signature header"}` |
/// | secret set, signature does not match       | 401    | `{"error":"Invalid signature"}`        |
/// | malformed payload or failing handler       | 500    | `{"error":"Internal server error"}`    |
/// | anything else (unknown types included)     | 200    | `{"received":true}`                    |
///
/// Handlers are awaited before the response is produced.
pub struct WebhookHandler {
    secret: Option<String>,
    on_message_sent: Option<EventHandler>,
    on_message_received: Option<EventHandler>,
    log_events: bool,
}

impl WebhookHandler {
    pub fn builder() -> WebhookHandlerBuilder {
        WebhookHandlerBuilder::default()
    }

    pub async fn handle<B: AsRef<[u8]>>(&self, request: &Request<B>) -> Response<String> {
        if request.method() != Method::POST {
            return reply(
                StatusCode::METHOD_NOT_ALLOWED,
                json!({"error": "Method not allowed"}),
            );
        }

        let body = request.body().as_ref();
        if let Some(secret) = self.secret.as_deref() {
            let Some(signature) = request.headers().get(&SIGNATURE_HEADER) else {
                tracing::warn!("webhook delivery without signature header");
                return reply(
                    StatusCode::BAD_REQUEST,
                    json!({"error": "Missing signature header"}),
                );
            };
            let valid = signature
                .to_str()
                .is_ok_and(|signature| verify_signature(signature, body, secret));
            if !valid {
                tracing::warn!("webhook signature mismatch");
                return reply(StatusCode::UNAUTHORIZED, json!({"error": "Invalid signature"}));
            }
        }

        match self.dispatch(body).await {
            Ok(()) => reply(StatusCode::OK, json!({"received": true})),
            Err(err) => {
                tracing::error!(error = %err, "error processing webhook");
                reply(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "Internal server error"}),
                )
            }
        }
    }

    async fn dispatch(&self, body: &[u8]) -> Result<(), WebhookError> {
        let event = match decode_webhook_event(body)? {
            DecodedEvent::Known(event) => event,
            DecodedEvent::Unknown { tag } => {
                tracing::warn!(
                    event_type = tag.as_deref().unwrap_or("<missing>"),
                    "unknown webhook event type"
                );
                return Ok(());
            }
        };

        if self.log_events {
            let payload = event.payload();
            tracing::info!(
                event_type = %event.event_type(),
                campaign_id = payload.campaign.id,
                from = %payload.from,
                to = %payload.to,
                "CloudContactAI webhook event"
            );
        }

        let handler = match event.event_type() {
            WebhookEventType::MessageSent => self.on_message_sent.as_ref(),
            WebhookEventType::MessageReceived => self.on_message_received.as_ref(),
        };
        if let Some(handler) = handler {
            handler(event).await.map_err(WebhookError::Handler)?;
        }
        Ok(())
    }
}

impl fmt::Debug for WebhookHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookHandler")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("on_message_sent", &self.on_message_sent.is_some())
            .field("on_message_received", &self.on_message_received.is_some())
            .field("log_events", &self.log_events)
            .finish()
    }
}

fn reply(status: StatusCode, body: serde_json::Value) -> Response<String> {
    let mut response = Response::new(body.to_string());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
