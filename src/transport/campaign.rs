use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{Account, CampaignResponse, MmsCampaign, SmsCampaign};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccountBody<'a> {
    first_name: &'a str,
    last_name: &'a str,
    phone: &'a str,
}

impl<'a> From<&'a Account> for AccountBody<'a> {
    fn from(account: &'a Account) -> Self {
        Self {
            first_name: &account.first_name,
            last_name: &account.last_name,
            phone: &account.phone,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CampaignBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    picture_file_key: Option<&'a str>,
    accounts: Vec<AccountBody<'a>>,
    message: &'a str,
    title: &'a str,
}

/// `{accounts, message, title}`
pub fn encode_sms_campaign_body(campaign: &SmsCampaign) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&CampaignBody {
        picture_file_key: None,
        accounts: campaign.accounts().iter().map(AccountBody::from).collect(),
        message: campaign.message(),
        title: campaign.title(),
    })
}

/// `{pictureFileKey, accounts, message, title}`
pub fn encode_mms_campaign_body(campaign: &MmsCampaign) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&CampaignBody {
        picture_file_key: Some(campaign.picture_file_key()),
        accounts: campaign.accounts().iter().map(AccountBody::from).collect(),
        message: campaign.message(),
        title: campaign.title(),
    })
}

/// Decode the answer to an accepted campaign request.
///
/// Never fails: the request already succeeded remotely. Fields with an unexpected
/// shape stay in `extra`, and a body that is not a JSON object is kept whole under
/// [`CampaignResponse::RAW_BODY`]. Blank bodies decode to an empty response.
pub fn decode_campaign_response(body: &str) -> CampaignResponse {
    if body.trim().is_empty() {
        return CampaignResponse::default();
    }
    let value = serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_owned()));
    let mut extra = match value {
        Value::Object(map) => map,
        other => {
            let mut extra = Map::new();
            extra.insert(CampaignResponse::RAW_BODY.to_owned(), other);
            return CampaignResponse {
                extra,
                ..CampaignResponse::default()
            };
        }
    };

    CampaignResponse {
        id: take(&mut extra, "id", identifier),
        status: take(&mut extra, "status", text),
        campaign_id: take(&mut extra, "campaignId", identifier),
        messages_sent: take(&mut extra, "messagesSent", count),
        timestamp: take(&mut extra, "timestamp", text),
        extra,
    }
}

/// Remove `key` from `map` when it converts; `null` counts as absent.
fn take<T>(map: &mut Map<String, Value>, key: &str, convert: fn(&Value) -> Option<T>) -> Option<T> {
    match map.get(key)? {
        Value::Null => {
            map.remove(key);
            None
        }
        value => {
            let converted = convert(value)?;
            map.remove(key);
            Some(converted)
        }
    }
}

fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

fn count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(n) => n.trim().parse().ok(),
        _ => None,
    }
}
