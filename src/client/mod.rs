//! Client layer: the shared request executor and the channel services built on it.

use std::error::Error as StdError;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};

use crate::domain::{ApiKey, ClientId, ValidationError};
use crate::transport::{UploadTransportError, WebhookTransportError};

mod curl;
mod email;
mod mms;
mod sms;
#[cfg(test)]
pub(crate) mod test_support;
mod webhooks;

pub use curl::render_curl;
pub use email::EmailService;
pub use mms::MmsService;
pub use sms::SmsService;
pub use webhooks::WebhookRegistry;

const DEFAULT_BASE_URL: &str = "https://core-test-cloudcontactai.allcode.com/api";
const DEFAULT_EMAIL_BASE_URL: &str = "https://email-campaigns-test-cloudcontactai.allcode.com/api/v1";
const DEFAULT_FILES_URL: &str = "https://files.cloudcontactai.com/upload/url";
const DEFAULT_ACCOUNT_ID: &str = "1223";

pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;
type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
pub(crate) struct HttpRequest {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<Vec<u8>>,
    pub(crate) timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

/// Why a request produced no HTTP response.
#[derive(Debug)]
pub(crate) enum SendError {
    /// The request went out but nothing usable came back (connect, timeout, body read).
    NoResponse(BoxError),
    /// The request could not be constructed locally.
    Build(BoxError),
}

pub(crate) trait HttpTransport: Send + Sync {
    fn send<'a>(&'a self, request: HttpRequest) -> BoxFuture<'a, Result<HttpResponse, SendError>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(&'a self, request: HttpRequest) -> BoxFuture<'a, Result<HttpResponse, SendError>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .request(request.method, request.url.as_str())
                .headers(request.headers);
            if let Some(body) = request.body {
                builder = builder.body(body);
            }
            if let Some(timeout) = request.timeout {
                builder = builder.timeout(timeout);
            }

            let response = builder.send().await.map_err(classify_reqwest_error)?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|err| SendError::NoResponse(Box::new(err)))?;
            Ok(HttpResponse { status, body })
        })
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> SendError {
    if err.is_builder() {
        SendError::Build(Box::new(err))
    } else {
        SendError::NoResponse(Box::new(err))
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`CcaiClient`] and the channel services.
pub enum CcaiError {
    /// A required input was missing; raised before any network activity.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The API answered with a non-2xx status.
    #[error("API Error: {status} - {body}")]
    Api { status: u16, body: String },

    /// The request was sent but no response arrived (DNS, TLS, timeouts, etc).
    #[error("No response received from API")]
    Transport(#[source] BoxError),

    /// The request could not be constructed locally.
    #[error("Invalid request: {0}")]
    Request(#[source] BoxError),

    /// A request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Response body could not be parsed as the expected format.
    #[error("Failed to parse response: {0}")]
    Parse(#[source] BoxError),

    /// The files service answered without a `signedS3Url`.
    #[error("Invalid response from upload URL API")]
    InvalidUploadResponse,

    #[error("Failed to get signed upload URL: {0}")]
    SignedUrl(#[source] Box<CcaiError>),

    #[error("Failed to upload file: {0}")]
    Upload(#[from] UploadError),

    /// Object storage answered the image upload with a non-2xx status.
    #[error("Failed to upload image to S3")]
    UploadRejected,

    #[error("Failed to send MMS: {0}")]
    Mms(#[source] Box<CcaiError>),
}

#[derive(Debug, thiserror::Error)]
/// Failures while pushing a local file to a signed URL.
pub enum UploadError {
    #[error("File does not exist: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No response received from storage")]
    Transport(#[source] BoxError),

    #[error("Invalid request: {0}")]
    Request(#[source] BoxError),
}

impl From<SendError> for CcaiError {
    fn from(value: SendError) -> Self {
        match value {
            SendError::NoResponse(err) => Self::Transport(err),
            SendError::Build(err) => Self::Request(err),
        }
    }
}

impl From<SendError> for UploadError {
    fn from(value: SendError) -> Self {
        match value {
            SendError::NoResponse(err) => Self::Transport(err),
            SendError::Build(err) => Self::Request(err),
        }
    }
}

impl From<UploadTransportError> for CcaiError {
    fn from(value: UploadTransportError) -> Self {
        match value {
            UploadTransportError::MissingSignedUrl => Self::InvalidUploadResponse,
            other => Self::Parse(Box::new(other)),
        }
    }
}

impl From<WebhookTransportError> for CcaiError {
    fn from(value: WebhookTransportError) -> Self {
        Self::Parse(Box::new(value))
    }
}

#[derive(Debug, Clone)]
/// Credentials attached to every API call.
pub struct Credentials {
    client_id: ClientId,
    api_key: ApiKey,
}

impl Credentials {
    /// Validate and pair a client id with its API key.
    pub fn new(
        client_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            client_id: ClientId::new(client_id)?,
            api_key: ApiKey::new(api_key)?,
        })
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }
}

#[derive(Debug, Clone)]
/// Builder for [`CcaiClient`].
///
/// Use this when you need to customize endpoints, the email account id, timeout,
/// or user-agent.
pub struct CcaiClientBuilder {
    credentials: Credentials,
    base_url: String,
    email_base_url: String,
    files_url: String,
    account_id: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl CcaiClientBuilder {
    pub const CLIENT_ID_VAR: &'static str = "CCAI_CLIENT_ID";
    pub const API_KEY_VAR: &'static str = "CCAI_API_KEY";
    pub const BASE_URL_VAR: &'static str = "CCAI_BASE_URL";
    pub const EMAIL_BASE_URL_VAR: &'static str = "CCAI_EMAIL_BASE_URL";
    pub const FILES_URL_VAR: &'static str = "CCAI_FILES_URL";
    pub const ACCOUNT_ID_VAR: &'static str = "CCAI_ACCOUNT_ID";

    /// Create a builder with the default endpoints and no timeout/user-agent override.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_owned(),
            email_base_url: DEFAULT_EMAIL_BASE_URL.to_owned(),
            files_url: DEFAULT_FILES_URL.to_owned(),
            account_id: DEFAULT_ACCOUNT_ID.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Read credentials and optional endpoint overrides from `CCAI_*` environment
    /// variables.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ValidationError> {
        let client_id = lookup(Self::CLIENT_ID_VAR).ok_or(ValidationError::MissingEnvVar {
            name: Self::CLIENT_ID_VAR,
        })?;
        let api_key = lookup(Self::API_KEY_VAR).ok_or(ValidationError::MissingEnvVar {
            name: Self::API_KEY_VAR,
        })?;

        let mut builder = Self::new(Credentials::new(client_id, api_key)?);
        if let Some(value) = lookup(Self::BASE_URL_VAR) {
            builder = builder.base_url(value);
        }
        if let Some(value) = lookup(Self::EMAIL_BASE_URL_VAR) {
            builder = builder.email_base_url(value);
        }
        if let Some(value) = lookup(Self::FILES_URL_VAR) {
            builder = builder.files_url(value);
        }
        if let Some(value) = lookup(Self::ACCOUNT_ID_VAR) {
            builder = builder.account_id(value);
        }
        Ok(builder)
    }

    /// Override the core API base URL (campaigns, webhooks).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the email campaigns API base URL.
    pub fn email_base_url(mut self, url: impl Into<String>) -> Self {
        self.email_base_url = url.into();
        self
    }

    /// Override the full URL of the files service upload-URL endpoint.
    pub fn files_url(mut self, url: impl Into<String>) -> Self {
        self.files_url = url.into();
        self
    }

    /// Override the `accountId` header sent to the email API.
    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = account_id.into();
        self
    }

    /// Set an HTTP client timeout applied to every request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`CcaiClient`].
    pub fn build(self) -> Result<CcaiClient, CcaiError> {
        let base_url = checked_url("base URL", self.base_url)?;
        let email_base_url = checked_url("email base URL", self.email_base_url)?;
        let files_url = checked_url("files URL", self.files_url)?;
        HeaderValue::from_str(&self.account_id).map_err(|err| CcaiError::Request(Box::new(err)))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| CcaiError::Request(Box::new(err)))?;

        Ok(CcaiClient {
            credentials: self.credentials,
            base_url,
            email_base_url,
            files_url,
            account_id: self.account_id,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

fn checked_url(field: &'static str, value: String) -> Result<String, ValidationError> {
    if url::Url::parse(&value).is_err() {
        return Err(ValidationError::InvalidUrl {
            field,
            input: value,
        });
    }
    Ok(value.trim_end_matches('/').to_owned())
}

/// A call against one of the CloudContactAI services.
#[derive(Debug)]
pub(crate) struct ApiCall {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    timeout: Option<Duration>,
}

impl ApiCall {
    pub(crate) fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    pub(crate) fn json_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub(crate) fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub(crate) fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Clone)]
/// Credentialed request executor shared by every channel service.
///
/// Build one client and hand clones of it to [`SmsService`], [`MmsService`],
/// [`EmailService`] and [`WebhookRegistry`]. It holds no mutable state.
///
/// Default endpoints:
/// - `https://core-test-cloudcontactai.allcode.com/api` for campaigns and webhooks
/// - `https://email-campaigns-test-cloudcontactai.allcode.com/api/v1` for email
/// - `https://files.cloudcontactai.com/upload/url` for MMS upload URLs
pub struct CcaiClient {
    credentials: Credentials,
    base_url: String,
    email_base_url: String,
    files_url: String,
    account_id: String,
    http: Arc<dyn HttpTransport>,
}

impl CcaiClient {
    /// Create a client using the default endpoints.
    ///
    /// For more customization, use [`CcaiClient::builder`].
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_owned(),
            email_base_url: DEFAULT_EMAIL_BASE_URL.to_owned(),
            files_url: DEFAULT_FILES_URL.to_owned(),
            account_id: DEFAULT_ACCOUNT_ID.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> CcaiClientBuilder {
        CcaiClientBuilder::new(credentials)
    }

    pub fn client_id(&self) -> &ClientId {
        self.credentials.client_id()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn email_base_url(&self) -> &str {
        &self.email_base_url
    }

    pub fn files_url(&self) -> &str {
        &self.files_url
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Make an authenticated JSON request to `{base_url}{endpoint}`.
    ///
    /// Errors:
    /// - [`CcaiError::Api`] for non-2xx responses,
    /// - [`CcaiError::Transport`] when no response arrived,
    /// - [`CcaiError::Parse`] when the body is not JSON.
    ///
    /// A blank response body yields `Value::Null`.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, CcaiError> {
        let url = format!("{}{endpoint}", self.base_url);
        self.request_json(method, url, body).await
    }

    /// Same as [`CcaiClient::request`] against `base_url` (or the configured base
    /// URL when `None`). The equivalent `curl` command is logged at debug level.
    pub async fn custom_request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
        base_url: Option<&str>,
    ) -> Result<serde_json::Value, CcaiError> {
        let url = format!("{}{endpoint}", base_url.unwrap_or(&self.base_url));
        tracing::debug!(
            curl = %render_curl(&method, &url, body),
            "equivalent curl command"
        );
        self.request_json(method, url, body).await
    }

    async fn request_json(
        &self,
        method: Method,
        url: String,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, CcaiError> {
        let mut call = ApiCall::new(method, url);
        if let Some(body) = body {
            call = call.json_body(serde_json::to_vec(body).map_err(CcaiError::Encode)?);
        }

        let text = self.execute(call).await?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text).map_err(|err| CcaiError::Parse(Box::new(err)))
    }

    pub(crate) fn api_url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    pub(crate) fn campaigns_url(&self) -> String {
        self.api_url(&format!("/clients/{}/campaigns/direct", self.client_id()))
    }

    /// Run an authenticated call and return the body of a 2xx response.
    pub(crate) async fn execute(&self, call: ApiCall) -> Result<String, CcaiError> {
        let mut headers = self.auth_headers()?;
        headers.extend(call.headers);

        tracing::debug!(method = %call.method, url = %call.url, "sending API request");
        let response = self
            .http
            .send(HttpRequest {
                method: call.method,
                url: call.url,
                headers,
                body: call.body,
                timeout: call.timeout,
            })
            .await?;

        if !(200..=299).contains(&response.status) {
            tracing::debug!(status = response.status, "API request failed");
            return Err(CcaiError::Api {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response.body)
    }

    /// Send a request as-is, without credentials or status mapping.
    pub(crate) async fn send_raw(&self, request: HttpRequest) -> Result<HttpResponse, SendError> {
        self.http.send(request).await
    }

    fn auth_headers(&self) -> Result<HeaderMap, CcaiError> {
        let bearer = HeaderValue::from_str(&self.credentials.api_key().bearer())
            .map_err(|err| CcaiError::Request(Box::new(err)))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        Ok(headers)
    }

    #[cfg(test)]
    pub(crate) fn with_transport(credentials: Credentials, http: Arc<dyn HttpTransport>) -> Self {
        Self {
            credentials,
            base_url: "https://api.example.invalid".to_owned(),
            email_base_url: "https://email.example.invalid/api/v1".to_owned(),
            files_url: "https://files.example.invalid/upload/url".to_owned(),
            account_id: DEFAULT_ACCOUNT_ID.to_owned(),
            http,
        }
    }
}
