use std::path::Path;

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method};

use super::{ApiCall, CcaiClient, CcaiError, HttpRequest, UploadError};
use crate::domain::validation::{self, ValidationError};
use crate::domain::{Account, CampaignResponse, MmsCampaign, SendOptions, SignedUploadUrl};
use crate::transport::{
    decode_campaign_response, decode_signed_upload_url, encode_mms_campaign_body,
    encode_upload_url_body,
};

const PREPARING: &str = "Preparing to send MMS";
const SENDING: &str = "Sending MMS";
const SENT: &str = "MMS sent successfully";
const FAILED: &str = "MMS sending failed";
const GETTING_UPLOAD_URL: &str = "Getting signed upload URL";
const UPLOADING: &str = "Uploading image to S3";
const UPLOADED: &str = "Image uploaded successfully, sending MMS";

const FORCE_NEW_CAMPAIGN: HeaderName = HeaderName::from_static("forcenewcampaign");

#[derive(Clone)]
/// Sends MMS campaigns and manages the image upload they reference.
///
/// A picture goes through three steps: ask the files service for a signed URL,
/// `PUT` the bytes to that URL, then send the campaign with the resulting file key.
/// [`MmsService::send_with_image`] runs all three in order.
pub struct MmsService {
    client: CcaiClient,
}

impl MmsService {
    pub fn new(client: CcaiClient) -> Self {
        Self { client }
    }

    /// The storage key an uploaded `file_name` ends up under.
    pub fn file_key(&self, file_name: &str) -> String {
        format!("{}/campaign/{file_name}", self.client.client_id())
    }

    /// Ask the files service for a pre-signed upload URL.
    ///
    /// `file_base_path` defaults to `{clientId}/campaign`. The returned `file_key` is
    /// always `{clientId}/campaign/{file_name}`, regardless of what the service
    /// proposed.
    pub async fn get_signed_upload_url(
        &self,
        file_name: &str,
        file_type: &str,
        file_base_path: Option<&str>,
        public_file: bool,
    ) -> Result<SignedUploadUrl, CcaiError> {
        validation::require(file_name, validation::FILE_NAME)?;
        validation::require(file_type, validation::FILE_TYPE)?;

        let default_base_path = format!("{}/campaign", self.client.client_id());
        let file_base_path = file_base_path.unwrap_or(&default_base_path);
        let file_key = self.file_key(file_name);

        self.request_upload_url(file_name, file_type, file_base_path, public_file, file_key)
            .await
            .map_err(|err| CcaiError::SignedUrl(Box::new(err)))
    }

    async fn request_upload_url(
        &self,
        file_name: &str,
        file_type: &str,
        file_base_path: &str,
        public_file: bool,
        file_key: String,
    ) -> Result<SignedUploadUrl, CcaiError> {
        let body = encode_upload_url_body(file_name, file_type, file_base_path, public_file)
            .map_err(CcaiError::Encode)?;
        let call = ApiCall::new(Method::POST, self.client.files_url()).json_body(body);
        let text = self.client.execute(call).await?;
        Ok(decode_signed_upload_url(&text, file_key)?)
    }

    /// Upload a local file to a signed URL with a single `PUT`.
    ///
    /// Returns `Ok(true)` for a 2xx answer and `Ok(false)` for any other status.
    pub async fn upload_image_to_signed_url(
        &self,
        signed_url: &str,
        file_path: impl AsRef<Path>,
        content_type: &str,
    ) -> Result<bool, CcaiError> {
        let file_path = file_path.as_ref();
        validation::require(signed_url, validation::SIGNED_URL)?;
        if file_path.as_os_str().is_empty() {
            return Err(ValidationError::Required {
                field: validation::FILE_PATH,
            }
            .into());
        }
        validation::require(content_type, validation::CONTENT_TYPE)?;

        Ok(self.put_file(signed_url, file_path, content_type).await?)
    }

    async fn put_file(
        &self,
        signed_url: &str,
        file_path: &Path,
        content_type: &str,
    ) -> Result<bool, UploadError> {
        if !tokio::fs::try_exists(file_path).await.unwrap_or(false) {
            return Err(UploadError::FileNotFound {
                path: file_path.to_path_buf(),
            });
        }
        let bytes = tokio::fs::read(file_path)
            .await
            .map_err(|source| UploadError::Read {
                path: file_path.to_path_buf(),
                source,
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(content_type).map_err(|err| UploadError::Request(Box::new(err)))?,
        );

        tracing::debug!(path = %file_path.display(), size = bytes.len(), "uploading file");
        let response = self
            .client
            .send_raw(HttpRequest {
                method: Method::PUT,
                url: signed_url.to_owned(),
                headers,
                body: Some(bytes),
                timeout: None,
            })
            .await?;

        let uploaded = (200..=299).contains(&response.status);
        if !uploaded {
            tracing::warn!(status = response.status, "signed URL rejected the upload");
        }
        Ok(uploaded)
    }

    /// Send an MMS referencing an already uploaded picture.
    ///
    /// With `force_new_campaign` the `ForceNewCampaign: true` header is sent.
    /// Network and API failures are wrapped as `Failed to send MMS: ...`.
    pub async fn send(
        &self,
        picture_file_key: &str,
        accounts: Vec<Account>,
        message: &str,
        title: &str,
        options: &SendOptions,
        force_new_campaign: bool,
    ) -> Result<CampaignResponse, CcaiError> {
        let campaign = MmsCampaign::new(picture_file_key, accounts, message, title)?;
        self.send_campaign(&campaign, options, force_new_campaign)
            .await
    }

    /// Send to a single recipient.
    #[allow(clippy::too_many_arguments)]
    pub async fn send_single(
        &self,
        picture_file_key: &str,
        first_name: &str,
        last_name: &str,
        phone: &str,
        message: &str,
        title: &str,
        options: &SendOptions,
        force_new_campaign: bool,
    ) -> Result<CampaignResponse, CcaiError> {
        let account = Account::new(first_name, last_name, phone);
        self.send(
            picture_file_key,
            vec![account],
            message,
            title,
            options,
            force_new_campaign,
        )
        .await
    }

    /// Send an already validated campaign.
    pub async fn send_campaign(
        &self,
        campaign: &MmsCampaign,
        options: &SendOptions,
        force_new_campaign: bool,
    ) -> Result<CampaignResponse, CcaiError> {
        options.notify(PREPARING);
        let result = async {
            let body = encode_mms_campaign_body(campaign).map_err(CcaiError::Encode)?;
            let mut call = ApiCall::new(Method::POST, self.client.campaigns_url())
                .json_body(body)
                .timeout(options.timeout);
            if force_new_campaign {
                call = call.header(FORCE_NEW_CAMPAIGN, HeaderValue::from_static("true"));
            }

            options.notify(SENDING);
            self.post(call).await
        }
        .await;

        match result {
            Ok(response) => {
                tracing::info!(
                    recipients = campaign.accounts().len(),
                    picture_file_key = campaign.picture_file_key(),
                    "MMS campaign sent"
                );
                options.notify(SENT);
                Ok(response)
            }
            Err(err) => {
                options.notify(FAILED);
                Err(CcaiError::Mms(Box::new(err)))
            }
        }
    }

    /// Upload `image_path` and send it as an MMS.
    ///
    /// Steps run strictly in sequence: signed URL, upload, send. The batch is
    /// validated before the first request. If the final send fails the uploaded
    /// image stays in storage.
    #[allow(clippy::too_many_arguments)]
    pub async fn send_with_image(
        &self,
        image_path: impl AsRef<Path>,
        content_type: &str,
        accounts: Vec<Account>,
        message: &str,
        title: &str,
        options: &SendOptions,
        force_new_campaign: bool,
    ) -> Result<CampaignResponse, CcaiError> {
        let image_path = image_path.as_ref();
        validation::validate_text_batch(&accounts, message, title)?;
        let file_name = image_path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();

        options.notify(GETTING_UPLOAD_URL);
        let upload = self
            .get_signed_upload_url(&file_name, content_type, None, true)
            .await?;

        options.notify(UPLOADING);
        let uploaded = self
            .upload_image_to_signed_url(&upload.signed_s3_url, image_path, content_type)
            .await?;
        if !uploaded {
            return Err(CcaiError::UploadRejected);
        }

        options.notify(UPLOADED);
        self.send(
            &upload.file_key,
            accounts,
            message,
            title,
            options,
            force_new_campaign,
        )
        .await
    }

    async fn post(&self, call: ApiCall) -> Result<CampaignResponse, CcaiError> {
        let text = self.client.execute(call).await?;
        Ok(decode_campaign_response(&text))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::client::test_support::{
        CLIENT_ID, FakeTransport, fake_client, header, json_body, recorder,
    };

    const SIGNED_URL: &str = "https://s3.example.invalid/bucket/signed";

    fn accounts() -> Vec<Account> {
        vec![Account::new("John", "Doe", "+15551234567")]
    }

    fn image_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("photo")
            .suffix(".jpg")
            .tempfile()
            .unwrap();
        file.write_all(b"test image data").unwrap();
        file
    }

    #[tokio::test]
    async fn signed_upload_url_overrides_file_key() {
        let transport = FakeTransport::new();
        transport.respond(200, r#"{"signedS3Url": "https://x", "fileKey": "anything"}"#);
        let mms = MmsService::new(fake_client(&transport));

        let signed = mms
            .get_signed_upload_url("photo.jpg", "image/jpeg", None, true)
            .await
            .unwrap();
        assert_eq!(signed.signed_s3_url, "https://x");
        assert_eq!(signed.file_key, format!("{CLIENT_ID}/campaign/photo.jpg"));

        let requests = transport.requests();
        let sent = &requests[0];
        assert_eq!(sent.url, "https://files.example.invalid/upload/url");
        assert_eq!(header(sent, "authorization"), Some("Bearer test-api-key"));
        assert_eq!(
            json_body(sent),
            json!({
                "fileName": "photo.jpg",
                "fileType": "image/jpeg",
                "fileBasePath": "test-client-id/campaign",
                "publicFile": true
            })
        );
    }

    #[tokio::test]
    async fn signed_upload_url_honours_base_path_and_visibility() {
        let transport = FakeTransport::new();
        transport.respond(200, r#"{"signedS3Url": "https://x"}"#);
        let mms = MmsService::new(fake_client(&transport));

        mms.get_signed_upload_url("photo.jpg", "image/jpeg", Some("custom/path"), false)
            .await
            .unwrap();
        let body = json_body(&transport.requests()[0]);
        assert_eq!(body["fileBasePath"], "custom/path");
        assert_eq!(body["publicFile"], false);
    }

    #[tokio::test]
    async fn signed_upload_url_validates_inputs_without_requests() {
        let transport = FakeTransport::new();
        let mms = MmsService::new(fake_client(&transport));

        let err = mms
            .get_signed_upload_url("", "image/jpeg", None, true)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "File name is required");

        let err = mms
            .get_signed_upload_url("photo.jpg", "", None, true)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "File type is required");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn signed_upload_url_rejects_response_without_url() {
        let transport = FakeTransport::new();
        transport.respond(200, r#"{"fileKey": "k"}"#);
        let mms = MmsService::new(fake_client(&transport));

        let err = mms
            .get_signed_upload_url("photo.jpg", "image/jpeg", None, true)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to get signed upload URL: Invalid response from upload URL API"
        );
    }

    #[tokio::test]
    async fn signed_upload_url_wraps_api_errors() {
        let transport = FakeTransport::new();
        transport.respond(500, "boom");
        let mms = MmsService::new(fake_client(&transport));

        let err = mms
            .get_signed_upload_url("photo.jpg", "image/jpeg", None, true)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to get signed upload URL: API Error: 500 - boom"
        );
    }

    #[tokio::test]
    async fn upload_puts_file_bytes_with_content_type() {
        let transport = FakeTransport::new();
        transport.respond(200, "");
        let mms = MmsService::new(fake_client(&transport));
        let file = image_file();

        let uploaded = mms
            .upload_image_to_signed_url(SIGNED_URL, file.path(), "image/jpeg")
            .await
            .unwrap();
        assert!(uploaded);

        let requests = transport.requests();
        let sent = &requests[0];
        assert_eq!(sent.method, Method::PUT);
        assert_eq!(sent.url, SIGNED_URL);
        assert_eq!(header(sent, "content-type"), Some("image/jpeg"));
        assert!(header(sent, "authorization").is_none());
        assert_eq!(sent.body.as_deref(), Some(b"test image data".as_slice()));
    }

    #[tokio::test]
    async fn upload_returns_false_for_non_success_status() {
        let transport = FakeTransport::new();
        transport.respond(403, "<Error>AccessDenied</Error>");
        let mms = MmsService::new(fake_client(&transport));
        let file = image_file();

        let uploaded = mms
            .upload_image_to_signed_url(SIGNED_URL, file.path(), "image/jpeg")
            .await
            .unwrap();
        assert!(!uploaded);
    }

    #[tokio::test]
    async fn upload_fails_for_missing_file() {
        let transport = FakeTransport::new();
        let mms = MmsService::new(fake_client(&transport));
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.jpg");

        let err = mms
            .upload_image_to_signed_url(SIGNED_URL, &missing, "image/jpeg")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CcaiError::Upload(UploadError::FileNotFound { .. })
        ));
        assert_eq!(
            err.to_string(),
            format!("Failed to upload file: File does not exist: {}", missing.display())
        );
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn upload_validates_arguments_in_order() {
        let transport = FakeTransport::new();
        let mms = MmsService::new(fake_client(&transport));

        let err = mms
            .upload_image_to_signed_url("", "", "")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Signed URL is required");
        let err = mms
            .upload_image_to_signed_url(SIGNED_URL, "", "")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "File path is required");
        let err = mms
            .upload_image_to_signed_url(SIGNED_URL, "/tmp/x.jpg", "")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Content type is required");
    }

    #[tokio::test]
    async fn send_sets_force_new_campaign_and_timeout() {
        let transport = FakeTransport::new();
        transport.respond(200, r#"{"campaignId": 55}"#);
        let mms = MmsService::new(fake_client(&transport));
        let (seen, callback) = recorder();
        let options = SendOptions::default()
            .with_progress(callback)
            .with_timeout(Duration::from_secs(30));

        let response = mms
            .send("k/campaign/a.jpg", accounts(), "Look", "Cats", &options, true)
            .await
            .unwrap();
        assert_eq!(response.campaign_id.as_deref(), Some("55"));
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["Preparing to send MMS", "Sending MMS", "MMS sent successfully"]
        );

        let requests = transport.requests();
        let sent = &requests[0];
        assert_eq!(header(sent, "forcenewcampaign"), Some("true"));
        assert_eq!(sent.timeout, Some(Duration::from_secs(30)));
        assert_eq!(json_body(sent)["pictureFileKey"], "k/campaign/a.jpg");
    }

    #[tokio::test]
    async fn send_without_force_flag_omits_header() {
        let transport = FakeTransport::new();
        transport.respond(200, "{}");
        let mms = MmsService::new(fake_client(&transport));

        mms.send_single(
            "k/campaign/a.jpg",
            "John",
            "Doe",
            "+15551234567",
            "Look",
            "Cats",
            &SendOptions::default(),
            false,
        )
        .await
        .unwrap();
        assert!(header(&transport.requests()[0], "forcenewcampaign").is_none());
    }

    #[tokio::test]
    async fn send_requires_picture_key_first() {
        let transport = FakeTransport::new();
        let mms = MmsService::new(fake_client(&transport));

        let err = mms
            .send("", Vec::new(), "", "", &SendOptions::default(), true)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Picture file key is required");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn send_wraps_failures_and_reports_progress() {
        let transport = FakeTransport::new();
        transport.respond(500, r#"{"error":"down"}"#);
        let mms = MmsService::new(fake_client(&transport));
        let (seen, callback) = recorder();
        let options = SendOptions::default().with_progress(callback);

        let err = mms
            .send("k", accounts(), "Look", "Cats", &options, true)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Failed to send MMS: API Error: 500 - {"error":"down"}"#
        );
        assert_eq!(seen.lock().unwrap().last().map(String::as_str), Some(FAILED));
    }

    #[tokio::test]
    async fn send_with_image_runs_upload_pipeline_in_order() {
        let transport = FakeTransport::new();
        transport.respond(
            200,
            format!(r#"{{"signedS3Url": "{SIGNED_URL}", "fileKey": "server/chosen/key"}}"#),
        );
        transport.respond(200, "");
        transport.respond(200, r#"{"id": "m-1"}"#);
        let mms = MmsService::new(fake_client(&transport));
        let file = image_file();
        let file_name = file.path().file_name().unwrap().to_str().unwrap().to_owned();
        let (seen, callback) = recorder();
        let options = SendOptions::default().with_progress(callback);

        let response = mms
            .send_with_image(file.path(), "image/jpeg", accounts(), "Look", "Cats", &options, true)
            .await
            .unwrap();
        assert_eq!(response.id.as_deref(), Some("m-1"));

        let requests = transport.requests();
        let steps: Vec<_> = requests
            .iter()
            .map(|r| (r.method.clone(), r.url.clone()))
            .collect();
        assert_eq!(
            steps,
            vec![
                (Method::POST, "https://files.example.invalid/upload/url".to_owned()),
                (Method::PUT, SIGNED_URL.to_owned()),
                (
                    Method::POST,
                    "https://api.example.invalid/clients/test-client-id/campaigns/direct"
                        .to_owned()
                ),
            ]
        );
        assert_eq!(json_body(&requests[0])["fileName"], file_name.as_str());
        assert_eq!(
            json_body(&requests[2])["pictureFileKey"],
            format!("{CLIENT_ID}/campaign/{file_name}")
        );
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                "Getting signed upload URL",
                "Uploading image to S3",
                "Image uploaded successfully, sending MMS",
                "Preparing to send MMS",
                "Sending MMS",
                "MMS sent successfully",
            ]
        );
    }

    #[tokio::test]
    async fn send_with_image_stops_when_upload_is_rejected() {
        let transport = FakeTransport::new();
        transport.respond(200, format!(r#"{{"signedS3Url": "{SIGNED_URL}"}}"#));
        transport.respond(403, "");
        let mms = MmsService::new(fake_client(&transport));
        let file = image_file();

        let err = mms
            .send_with_image(
                file.path(),
                "image/jpeg",
                accounts(),
                "Look",
                "Cats",
                &SendOptions::default(),
                true,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CcaiError::UploadRejected));
        assert_eq!(err.to_string(), "Failed to upload image to S3");
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn send_with_image_validates_batch_before_uploading() {
        let transport = FakeTransport::new();
        let mms = MmsService::new(fake_client(&transport));
        let file = image_file();

        let err = mms
            .send_with_image(
                file.path(),
                "image/jpeg",
                vec![Account::new("John", "", "+1555")],
                "Look",
                "Cats",
                &SendOptions::default(),
                true,
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Last name is required for account at index 0"
        );
        assert!(transport.requests().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn send_with_image_keeps_non_utf8_file_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OsStr::from_bytes(b"cat\xff.jpg"));
        std::fs::write(&path, b"test image data").unwrap();

        let transport = FakeTransport::new();
        transport.respond(200, format!(r#"{{"signedS3Url": "{SIGNED_URL}"}}"#));
        transport.respond(200, "");
        transport.respond(200, "{}");
        let mms = MmsService::new(fake_client(&transport));

        mms.send_with_image(
            &path,
            "image/jpeg",
            accounts(),
            "Look",
            "Cats",
            &SendOptions::default(),
            false,
        )
        .await
        .unwrap();

        let requests = transport.requests();
        assert_eq!(json_body(&requests[0])["fileName"], "cat\u{FFFD}.jpg");
        assert_eq!(
            json_body(&requests[2])["pictureFileKey"],
            format!("{CLIENT_ID}/campaign/cat\u{FFFD}.jpg")
        );
    }
}
