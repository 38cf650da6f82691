use serde::{Deserialize, Serialize};

use super::identifier::TransportId;
use crate::domain::{
    MessagePayload, WebhookCampaign, WebhookConfig, WebhookConfigUpdate, WebhookDeletion,
    WebhookEvent, WebhookEventType, WebhookRegistration,
};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported webhook event type: {value}")]
    UnknownEventType { value: String },

    #[error("Webhook payload is not a JSON object")]
    NotAnObject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
enum TransportEventType {
    #[serde(rename = "message.sent")]
    MessageSent,
    #[serde(rename = "message.received")]
    MessageReceived,
}

impl From<WebhookEventType> for TransportEventType {
    fn from(value: WebhookEventType) -> Self {
        match value {
            WebhookEventType::MessageSent => Self::MessageSent,
            WebhookEventType::MessageReceived => Self::MessageReceived,
        }
    }
}

#[derive(Debug, Serialize)]
struct WebhookConfigBody<'a> {
    url: &'a str,
    events: Vec<TransportEventType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct WebhookUpdateBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<Vec<TransportEventType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct WebhookJsonRegistration {
    id: TransportId,
    url: String,
    #[serde(default)]
    events: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WebhookJsonDeletion {
    success: bool,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookJsonCampaign {
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    sender_phone: String,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    run_at: String,
}

#[derive(Debug, Deserialize)]
struct WebhookJsonEvent {
    campaign: WebhookJsonCampaign,
    from: String,
    to: String,
    message: String,
}

/// Outcome of classifying an inbound payload by its `type` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedEvent {
    Known(WebhookEvent),
    Unknown { tag: Option<String> },
}

pub fn encode_webhook_config_body(config: &WebhookConfig) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&WebhookConfigBody {
        url: &config.url,
        events: config.events.iter().copied().map(Into::into).collect(),
        secret: config.secret.as_deref(),
    })
}

pub fn encode_webhook_update_body(
    update: &WebhookConfigUpdate,
) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&WebhookUpdateBody {
        url: update.url.as_deref(),
        events: update
            .events
            .as_ref()
            .map(|events| events.iter().copied().map(Into::into).collect()),
        secret: update.secret.as_deref(),
    })
}

pub fn decode_webhook_registration(json: &str) -> Result<WebhookRegistration, TransportError> {
    let parsed: WebhookJsonRegistration = serde_json::from_str(json)?;
    registration_from_json(parsed)
}

pub fn decode_webhook_list(json: &str) -> Result<Vec<WebhookRegistration>, TransportError> {
    let parsed: Vec<WebhookJsonRegistration> = serde_json::from_str(json)?;
    parsed.into_iter().map(registration_from_json).collect()
}

pub fn decode_webhook_deletion(json: &str) -> Result<WebhookDeletion, TransportError> {
    let parsed: WebhookJsonDeletion = serde_json::from_str(json)?;
    Ok(WebhookDeletion {
        success: parsed.success,
        message: parsed.message,
    })
}

fn registration_from_json(
    parsed: WebhookJsonRegistration,
) -> Result<WebhookRegistration, TransportError> {
    let events = parsed
        .events
        .into_iter()
        .map(|value| {
            WebhookEventType::from_tag(&value).ok_or(TransportError::UnknownEventType { value })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WebhookRegistration {
        id: parsed.id.into_string(),
        url: parsed.url,
        events,
    })
}

/// Classify an inbound webhook body.
///
/// Only payloads tagged with a known type must carry the full event shape; any
/// other JSON object is reported as [`DecodedEvent::Unknown`], whatever the JSON
/// type of its `type` field. Non-string tags are reported in their JSON form.
pub fn decode_webhook_event(body: &[u8]) -> Result<DecodedEvent, TransportError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    let Some(object) = value.as_object() else {
        return Err(TransportError::NotAnObject);
    };

    let tag = match object.get("type") {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(tag)) => Some(tag.clone()),
        Some(other) => Some(other.to_string()),
    };
    let known = match object.get("type") {
        Some(serde_json::Value::String(tag)) => WebhookEventType::from_tag(tag),
        _ => None,
    };
    let Some(kind) = known else {
        return Ok(DecodedEvent::Unknown { tag });
    };

    let parsed: WebhookJsonEvent = serde_json::from_value(value)?;
    let payload = MessagePayload {
        campaign: WebhookCampaign {
            id: parsed.campaign.id,
            title: parsed.campaign.title,
            message: parsed.campaign.message,
            sender_phone: parsed.campaign.sender_phone,
            created_at: parsed.campaign.created_at,
            run_at: parsed.campaign.run_at,
        },
        from: parsed.from,
        to: parsed.to,
        message: parsed.message,
    };

    let event = match kind {
        WebhookEventType::MessageSent => WebhookEvent::MessageSent(payload),
        WebhookEventType::MessageReceived => WebhookEvent::MessageReceived(payload),
    };
    Ok(DecodedEvent::Known(event))
}
