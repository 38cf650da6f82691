use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::validation::{self, ValidationError};
use crate::domain::webhook::WebhookEventType;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A message recipient.
///
/// The phone number is expected in E.164 form (`+15551234567`); only its presence is
/// checked.
pub struct Account {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl Account {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An email recipient. `phone` is part of the remote shape but unused for email.
pub struct EmailAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl EmailAccount {
    /// Create a recipient with an empty phone number.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
/// One SMS broadcast. Construction validates the whole batch.
pub struct SmsCampaign {
    accounts: Vec<Account>,
    message: String,
    title: String,
}

impl SmsCampaign {
    pub fn new(
        accounts: Vec<Account>,
        message: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let message = message.into();
        let title = title.into();
        validation::validate_text_batch(&accounts, &message, &title)?;
        Ok(Self {
            accounts,
            message,
            title,
        })
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

#[derive(Debug, Clone)]
/// One MMS broadcast referencing an already uploaded picture.
pub struct MmsCampaign {
    picture_file_key: String,
    accounts: Vec<Account>,
    message: String,
    title: String,
}

impl MmsCampaign {
    /// Validates the picture key first, then the batch in the same order as SMS.
    pub fn new(
        picture_file_key: impl Into<String>,
        accounts: Vec<Account>,
        message: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let picture_file_key = picture_file_key.into();
        let message = message.into();
        let title = title.into();
        validation::require(&picture_file_key, validation::PICTURE_FILE_KEY)?;
        validation::validate_text_batch(&accounts, &message, &title)?;
        Ok(Self {
            picture_file_key,
            accounts,
            message,
            title,
        })
    }

    pub fn picture_file_key(&self) -> &str {
        &self.picture_file_key
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedList {
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
/// Email campaign resource, field for field as the email API expects it.
///
/// Required fields are checked by [`crate::EmailService::send_campaign`] before any
/// request is made.
pub struct EmailCampaign {
    pub subject: String,
    pub title: String,
    /// HTML body.
    pub message: String,
    pub editor: Option<String>,
    pub file_key: Option<String>,
    pub sender_email: String,
    pub reply_email: String,
    pub sender_name: String,
    pub accounts: Vec<EmailAccount>,
    pub campaign_type: String,
    pub scheduled_timestamp: Option<String>,
    pub scheduled_timezone: Option<String>,
    pub add_to_list: String,
    pub selected_list: Option<SelectedList>,
    pub list_id: Option<String>,
    pub contact_input: String,
    pub replace_contacts: Option<bool>,
    pub email_template_id: Option<String>,
    pub flux_id: Option<String>,
    pub from_type: String,
    pub senders: Vec<serde_json::Value>,
}

impl EmailCampaign {
    pub const CAMPAIGN_TYPE: &'static str = "EMAIL";
    pub const NO_LIST: &'static str = "noList";
    pub const CONTACT_INPUT_ACCOUNTS: &'static str = "accounts";
    pub const FROM_TYPE_SINGLE: &'static str = "single";

    /// Create an immediate campaign sent to the given accounts from a single sender.
    pub fn new(
        subject: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        sender_email: impl Into<String>,
        reply_email: impl Into<String>,
        sender_name: impl Into<String>,
        accounts: Vec<EmailAccount>,
    ) -> Self {
        Self {
            subject: subject.into(),
            title: title.into(),
            message: message.into(),
            editor: None,
            file_key: None,
            sender_email: sender_email.into(),
            reply_email: reply_email.into(),
            sender_name: sender_name.into(),
            accounts,
            campaign_type: Self::CAMPAIGN_TYPE.to_owned(),
            scheduled_timestamp: None,
            scheduled_timezone: None,
            add_to_list: Self::NO_LIST.to_owned(),
            selected_list: None,
            list_id: None,
            contact_input: Self::CONTACT_INPUT_ACCOUNTS.to_owned(),
            replace_contacts: None,
            email_template_id: None,
            flux_id: None,
            from_type: Self::FROM_TYPE_SINGLE.to_owned(),
            senders: Vec::new(),
        }
    }

    /// Schedule delivery at `timestamp` (ISO-8601) in `timezone` (IANA name).
    pub fn scheduled(mut self, timestamp: impl Into<String>, timezone: impl Into<String>) -> Self {
        self.scheduled_timestamp = Some(timestamp.into());
        self.scheduled_timezone = Some(timezone.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Sender identity for [`crate::EmailService::send_single`].
pub struct EmailSender {
    pub email: String,
    pub reply_email: String,
    pub name: String,
}

impl EmailSender {
    pub fn new(
        email: impl Into<String>,
        reply_email: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            reply_email: reply_email.into(),
            name: name.into(),
        }
    }
}

#[derive(Clone)]
/// Caller-supplied hook receiving human-readable stage labels during a send.
///
/// A panic inside the callback is caught and logged; it never aborts the send.
pub struct ProgressCallback(Arc<dyn Fn(&str) + Send + Sync>);

impl ProgressCallback {
    pub fn new(callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    pub(crate) fn notify(&self, status: &str) {
        let callback = &self.0;
        if catch_unwind(AssertUnwindSafe(|| callback(status))).is_err() {
            tracing::warn!(status, "progress callback panicked");
        }
    }
}

impl fmt::Debug for ProgressCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProgressCallback")
    }
}

#[derive(Debug, Clone, Default)]
/// Per-call options shared by the SMS, MMS and email services.
pub struct SendOptions {
    /// Timeout for the campaign request, forwarded to the HTTP client.
    pub timeout: Option<Duration>,
    /// Accepted for API compatibility; requests are never retried.
    pub retries: Option<u32>,
    pub on_progress: Option<ProgressCallback>,
}

impl SendOptions {
    pub fn with_progress(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(ProgressCallback::new(callback));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub(crate) fn notify(&self, status: &str) {
        if let Some(callback) = self.on_progress.as_ref() {
            callback.notify(status);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Desired webhook subscription state.
pub struct WebhookConfig {
    pub url: String,
    pub events: Vec<WebhookEventType>,
    /// Shared secret used to sign deliveries.
    pub secret: Option<String>,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>, events: Vec<WebhookEventType>) -> Self {
        Self {
            url: url.into(),
            events,
            secret: None,
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Partial webhook configuration; `None` fields are left unchanged remotely.
pub struct WebhookConfigUpdate {
    pub url: Option<String>,
    pub events: Option<Vec<WebhookEventType>>,
    pub secret: Option<String>,
}
