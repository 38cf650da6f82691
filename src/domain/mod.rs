//! Domain layer: recipients, campaigns, responses and webhook events (no I/O).

mod request;
mod response;
pub(crate) mod validation;
mod value;
mod webhook;

pub use request::{
    Account, EmailAccount, EmailCampaign, EmailSender, MmsCampaign, ProgressCallback,
    SelectedList, SendOptions, SmsCampaign, WebhookConfig, WebhookConfigUpdate,
};
pub use response::{CampaignResponse, SignedUploadUrl, WebhookDeletion, WebhookRegistration};
pub use validation::ValidationError;
pub use value::{ApiKey, ClientId};
pub use webhook::{MessagePayload, WebhookCampaign, WebhookEvent, WebhookEventType};
