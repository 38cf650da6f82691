use http::{HeaderName, HeaderValue, Method};

use super::{ApiCall, CcaiClient, CcaiError};
use crate::domain::validation;
use crate::domain::{CampaignResponse, EmailAccount, EmailCampaign, EmailSender, SendOptions};
use crate::transport::{decode_campaign_response, encode_email_campaign_body};

const PREPARING: &str = "Preparing to send email campaign";
const SENDING: &str = "Sending email campaign";
const SENT: &str = "Email campaign sent successfully";
const FAILED: &str = "Email campaign sending failed";

const CLIENT_ID: HeaderName = HeaderName::from_static("clientid");
const ACCOUNT_ID: HeaderName = HeaderName::from_static("accountid");

#[derive(Clone)]
/// Sends email campaigns through the dedicated email campaigns API.
pub struct EmailService {
    client: CcaiClient,
}

impl EmailService {
    pub fn new(client: CcaiClient) -> Self {
        Self { client }
    }

    /// Send (or schedule) an email campaign.
    ///
    /// Required fields are checked before anything is sent. Network and API errors
    /// are returned unchanged after `Email campaign sending failed` is reported.
    pub async fn send_campaign(
        &self,
        campaign: &EmailCampaign,
        options: &SendOptions,
    ) -> Result<CampaignResponse, CcaiError> {
        validation::validate_email_campaign(campaign)?;

        options.notify(PREPARING);
        let result = async {
            let body = encode_email_campaign_body(campaign).map_err(CcaiError::Encode)?;
            let call = ApiCall::new(Method::POST, self.campaigns_url())
                .json_body(body)
                .header(CLIENT_ID, header_value(self.client.client_id().as_str())?)
                .header(ACCOUNT_ID, header_value(self.client.account_id())?)
                .timeout(options.timeout);

            options.notify(SENDING);
            self.post(call).await
        }
        .await;

        match result {
            Ok(response) => {
                tracing::info!(
                    recipients = campaign.accounts.len(),
                    scheduled = campaign.scheduled_timestamp.is_some(),
                    "email campaign sent"
                );
                options.notify(SENT);
                Ok(response)
            }
            Err(err) => {
                options.notify(FAILED);
                Err(err)
            }
        }
    }

    /// Send one email to one recipient from a single sender.
    pub async fn send_single(
        &self,
        recipient: EmailAccount,
        sender: EmailSender,
        subject: &str,
        message: &str,
        title: &str,
        options: &SendOptions,
    ) -> Result<CampaignResponse, CcaiError> {
        let campaign = EmailCampaign::new(
            subject,
            title,
            message,
            sender.email,
            sender.reply_email,
            sender.name,
            vec![recipient],
        );
        self.send_campaign(&campaign, options).await
    }

    fn campaigns_url(&self) -> String {
        format!("{}/campaigns", self.client.email_base_url())
    }

    async fn post(&self, call: ApiCall) -> Result<CampaignResponse, CcaiError> {
        let text = self.client.execute(call).await?;
        Ok(decode_campaign_response(&text))
    }
}

fn header_value(value: &str) -> Result<HeaderValue, CcaiError> {
    HeaderValue::from_str(value).map_err(|err| CcaiError::Request(Box::new(err)))
}
