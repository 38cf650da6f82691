use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const PREFIX: &str = "sha256=";

/// Hex-encoded HMAC-SHA256 of `body` under `secret`, as sent in `x-ccai-signature`.
pub fn sign_payload(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Check a delivery signature against the raw request body.
///
/// Accepts a bare hex digest or one prefixed with `sha256=`. The comparison is
/// constant-time.
pub fn verify_signature(signature: &str, body: &[u8], secret: &str) -> bool {
    let signature = signature.trim();
    let digest = signature.strip_prefix(PREFIX).unwrap_or(signature);
    let Some(expected) = hex::decode(digest) else {
        return false;
    };

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    pub fn decode(text: &str) -> Option<Vec<u8>> {
        if text.len() % 2 != 0 || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        (0..text.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&text[i..i + 2], 16).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"{"type":"message.sent"}"#;

    #[test]
    fn matches_rfc_4231_vector() {
        // Test case 2 from RFC 4231.
        assert_eq!(
            sign_payload("Jefe", b"what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn accepts_own_signature_with_or_without_prefix() {
        let signature = sign_payload("s3cret", BODY);
        assert_eq!(signature.len(), 64);
        assert!(verify_signature(&signature, BODY, "s3cret"));
        assert!(verify_signature(&format!("sha256={signature}"), BODY, "s3cret"));
        assert!(verify_signature(&signature.to_uppercase(), BODY, "s3cret"));
    }

    #[test]
    fn rejects_wrong_secret_body_or_encoding() {
        let signature = sign_payload("s3cret", BODY);
        assert!(!verify_signature(&signature, BODY, "other"));
        assert!(!verify_signature(&signature, b"{}", "s3cret"));
        assert!(!verify_signature("not-hex", BODY, "s3cret"));
        assert!(!verify_signature("abc", BODY, "s3cret"));
        assert!(!verify_signature("", BODY, "s3cret"));
        assert!(!verify_signature(&signature[..62], BODY, "s3cret"));
    }
}
