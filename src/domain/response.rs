use crate::domain::webhook::WebhookEventType;

#[derive(Debug, Clone, PartialEq, Default)]
/// Response to an SMS, MMS or email campaign request.
///
/// Every field is optional on the wire; anything not modelled here, or present
/// with an unexpected type, is kept in `extra`.
pub struct CampaignResponse {
    pub id: Option<String>,
    pub status: Option<String>,
    pub campaign_id: Option<String>,
    pub messages_sent: Option<u64>,
    pub timestamp: Option<String>,
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CampaignResponse {
    /// Key in `extra` holding a response body that was not a JSON object.
    pub const RAW_BODY: &'static str = "body";
}

#[derive(Debug, Clone, PartialEq)]
/// Pre-authorized upload target returned by the files service.
pub struct SignedUploadUrl {
    pub signed_s3_url: String,
    /// Always `{clientId}/campaign/{fileName}`, whatever the service proposed.
    pub file_key: String,
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRegistration {
    pub id: String,
    pub url: String,
    pub events: Vec<WebhookEventType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookDeletion {
    pub success: bool,
    pub message: String,
}
