use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Event types a webhook can subscribe to.
pub enum WebhookEventType {
    /// Outbound message delivered by the platform (`message.sent`).
    MessageSent,
    /// Inbound reply from a recipient (`message.received`).
    MessageReceived,
}

impl WebhookEventType {
    pub const ALL: [Self; 2] = [Self::MessageSent, Self::MessageReceived];

    /// Wire value of the `type` tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MessageSent => "message.sent",
            Self::MessageReceived => "message.received",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Campaign descriptor attached to every webhook event.
pub struct WebhookCampaign {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub sender_phone: String,
    pub created_at: String,
    pub run_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePayload {
    pub campaign: WebhookCampaign,
    pub from: String,
    pub to: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An inbound webhook notification, classified by its `type` tag.
pub enum WebhookEvent {
    MessageSent(MessagePayload),
    MessageReceived(MessagePayload),
}

impl WebhookEvent {
    pub fn event_type(&self) -> WebhookEventType {
        match self {
            Self::MessageSent(_) => WebhookEventType::MessageSent,
            Self::MessageReceived(_) => WebhookEventType::MessageReceived,
        }
    }

    pub fn payload(&self) -> &MessagePayload {
        match self {
            Self::MessageSent(payload) | Self::MessageReceived(payload) => payload,
        }
    }
}
