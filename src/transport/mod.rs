//! Transport layer: wire-format details (serialization/deserialization).

mod campaign;
mod email;
mod identifier;
mod upload;
mod webhook;

pub use campaign::{decode_campaign_response, encode_mms_campaign_body, encode_sms_campaign_body};
pub use email::encode_email_campaign_body;
pub use upload::{
    TransportError as UploadTransportError, decode_signed_upload_url, encode_upload_url_body,
};
pub use webhook::{
    DecodedEvent, TransportError as WebhookTransportError, decode_webhook_deletion,
    decode_webhook_event, decode_webhook_list, decode_webhook_registration,
    encode_webhook_config_body, encode_webhook_update_body,
};
