use serde::{Deserialize, Serialize};

use crate::domain::SignedUploadUrl;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response is missing signedS3Url")]
    MissingSignedUrl,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadUrlBody<'a> {
    file_name: &'a str,
    file_type: &'a str,
    file_base_path: &'a str,
    public_file: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignedUrlJsonResponse {
    #[serde(default)]
    signed_s3_url: Option<String>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

pub fn encode_upload_url_body(
    file_name: &str,
    file_type: &str,
    file_base_path: &str,
    public_file: bool,
) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&UploadUrlBody {
        file_name,
        file_type,
        file_base_path,
        public_file,
    })
}

/// Decode the files-service answer, replacing whatever `fileKey` it proposed with
/// `file_key`.
pub fn decode_signed_upload_url(
    json: &str,
    file_key: String,
) -> Result<SignedUploadUrl, TransportError> {
    let mut parsed: SignedUrlJsonResponse = serde_json::from_str(json)?;
    let signed_s3_url = parsed
        .signed_s3_url
        .filter(|url| !url.is_empty())
        .ok_or(TransportError::MissingSignedUrl)?;
    parsed.extra.remove("fileKey");

    Ok(SignedUploadUrl {
        signed_s3_url,
        file_key,
        extra: parsed.extra,
    })
}
