//! Typed Rust client for the CloudContactAI messaging API.
//!
//! The crate follows three layers: a domain layer of recipients, campaigns and
//! webhook events with no I/O, a transport layer for the JSON wire shapes, and a
//! client layer running the requests. One [`CcaiClient`] carries the credentials
//! and endpoints; each channel service is built from a clone of it.
//!
//! ```rust,no_run
//! use ccai::{Account, CcaiClient, Credentials, SendOptions, SmsService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CcaiClient::new(Credentials::new("1231", "api-key")?);
//!     let sms = SmsService::new(client.clone());
//!
//!     let accounts = vec![Account::new("John", "Doe", "+15551234567")];
//!     let options = SendOptions::default().with_progress(|status| println!("{status}"));
//!     let response = sms
//!         .send(accounts, "Hello ${firstName}!", "Greeting", &options)
//!         .await?;
//!     println!("campaign: {:?}", response.campaign_id);
//!     Ok(())
//! }
//! ```
//!
//! Inbound webhooks are handled with [`WebhookHandler`], which works on plain
//! [`http::Request`] values and can be mounted behind any HTTP server.
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;
pub mod webhook;

pub use client::{
    CcaiClient, CcaiClientBuilder, CcaiError, Credentials, EmailService, MmsService, SmsService,
    UploadError, WebhookRegistry, render_curl,
};
pub use domain::{
    Account, ApiKey, CampaignResponse, ClientId, EmailAccount, EmailCampaign, EmailSender,
    MessagePayload, MmsCampaign, ProgressCallback, SelectedList, SendOptions, SignedUploadUrl,
    SmsCampaign, ValidationError, WebhookCampaign, WebhookConfig, WebhookConfigUpdate,
    WebhookDeletion, WebhookEvent, WebhookEventType, WebhookRegistration,
};
pub use webhook::{
    HandlerError, SIGNATURE_HEADER, WebhookHandler, WebhookHandlerBuilder, sign_payload,
    verify_signature,
};
