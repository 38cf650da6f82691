use serde::Deserialize;

/// Identifier returned by the API as either a JSON string or a JSON number.
///
/// Untagged rather than raw-token based so it also works inside structs that
/// `#[serde(flatten)]` their unknown fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TransportId {
    String(String),
    Number(serde_json::Number),
}

impl TransportId {
    pub fn into_string(self) -> String {
        match self {
            Self::String(value) => value,
            Self::Number(value) => value.to_string(),
        }
    }
}
