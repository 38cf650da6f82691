use http::Method;

use super::{ApiCall, CcaiClient, CcaiError};
use crate::domain::{Account, CampaignResponse, SendOptions, SmsCampaign};
use crate::transport::{decode_campaign_response, encode_sms_campaign_body};

const PREPARING: &str = "Preparing to send SMS";
const SENDING: &str = "Sending SMS";
const SENT: &str = "SMS sent successfully";
const FAILED: &str = "SMS sending failed";

#[derive(Clone)]
/// Sends SMS campaigns through the direct-campaign endpoint.
pub struct SmsService {
    client: CcaiClient,
}

impl SmsService {
    pub fn new(client: CcaiClient) -> Self {
        Self { client }
    }

    /// Send `message` to every account. The message may reference `${firstName}`
    /// and `${lastName}`.
    ///
    /// Validation runs before anything is sent. Network and API errors are returned
    /// unchanged after `SMS sending failed` is reported to the progress callback.
    pub async fn send(
        &self,
        accounts: Vec<Account>,
        message: &str,
        title: &str,
        options: &SendOptions,
    ) -> Result<CampaignResponse, CcaiError> {
        let campaign = SmsCampaign::new(accounts, message, title)?;
        self.send_campaign(&campaign, options).await
    }

    /// Send to a single recipient.
    pub async fn send_single(
        &self,
        first_name: &str,
        last_name: &str,
        phone: &str,
        message: &str,
        title: &str,
        options: &SendOptions,
    ) -> Result<CampaignResponse, CcaiError> {
        let account = Account::new(first_name, last_name, phone);
        self.send(vec![account], message, title, options).await
    }

    /// Send an already validated campaign.
    pub async fn send_campaign(
        &self,
        campaign: &SmsCampaign,
        options: &SendOptions,
    ) -> Result<CampaignResponse, CcaiError> {
        options.notify(PREPARING);
        let result = async {
            let body = encode_sms_campaign_body(campaign).map_err(CcaiError::Encode)?;
            let call = ApiCall::new(Method::POST, self.client.campaigns_url())
                .json_body(body)
                .timeout(options.timeout);

            options.notify(SENDING);
            self.post(call).await
        }
        .await;

        match result {
            Ok(response) => {
                tracing::info!(
                    recipients = campaign.accounts().len(),
                    campaign_id = ?response.campaign_id,
                    "SMS campaign sent"
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

    async fn post(&self, call: ApiCall) -> Result<CampaignResponse, CcaiError> {
        let text = self.client.execute(call).await?;
        Ok(decode_campaign_response(&text))
    }
}
