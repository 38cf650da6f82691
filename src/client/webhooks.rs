use http::Method;

use super::{ApiCall, CcaiClient, CcaiError};
use crate::domain::{WebhookConfig, WebhookConfigUpdate, WebhookDeletion, WebhookRegistration};
use crate::transport::{
    decode_webhook_deletion, decode_webhook_list, decode_webhook_registration,
    encode_webhook_config_body, encode_webhook_update_body,
};

#[derive(Clone)]
/// Manages webhook subscriptions on the core API.
///
/// Inputs are forwarded as given; the API is the judge of their validity.
pub struct WebhookRegistry {
    client: CcaiClient,
}

impl WebhookRegistry {
    pub fn new(client: CcaiClient) -> Self {
        Self { client }
    }

    pub async fn register(&self, config: &WebhookConfig) -> Result<WebhookRegistration, CcaiError> {
        let body = encode_webhook_config_body(config).map_err(CcaiError::Encode)?;
        let call = ApiCall::new(Method::POST, self.client.api_url("/webhooks")).json_body(body);
        let text = self.client.execute(call).await?;
        let registration = decode_webhook_registration(&text)?;
        tracing::info!(id = %registration.id, url = %registration.url, "webhook registered");
        Ok(registration)
    }

    /// Change an existing subscription; unset fields are left as they are.
    pub async fn update(
        &self,
        id: &str,
        update: &WebhookConfigUpdate,
    ) -> Result<WebhookRegistration, CcaiError> {
        let body = encode_webhook_update_body(update).map_err(CcaiError::Encode)?;
        let call = ApiCall::new(Method::PUT, self.webhook_url(id)).json_body(body);
        let text = self.client.execute(call).await?;
        Ok(decode_webhook_registration(&text)?)
    }

    pub async fn list(&self) -> Result<Vec<WebhookRegistration>, CcaiError> {
        let call = ApiCall::new(Method::GET, self.client.api_url("/webhooks"));
        let text = self.client.execute(call).await?;
        Ok(decode_webhook_list(&text)?)
    }

    pub async fn delete(&self, id: &str) -> Result<WebhookDeletion, CcaiError> {
        let call = ApiCall::new(Method::DELETE, self.webhook_url(id));
        let text = self.client.execute(call).await?;
        Ok(decode_webhook_deletion(&text)?)
    }

    fn webhook_url(&self, id: &str) -> String {
        self.client.api_url(&format!("/webhooks/{id}"))
    }
}
