use serde::Serialize;

use crate::domain::{EmailAccount, EmailCampaign, SelectedList};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailAccountBody<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    phone: &'a str,
}

impl<'a> From<&'a EmailAccount> for EmailAccountBody<'a> {
    fn from(account: &'a EmailAccount) -> Self {
        Self {
            first_name: &account.first_name,
            last_name: &account.last_name,
            email: &account.email,
            phone: &account.phone,
        }
    }
}

#[derive(Debug, Serialize)]
struct SelectedListBody<'a> {
    value: Option<&'a str>,
}

/// Absent optional fields are left out of the body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailCampaignBody<'a> {
    subject: &'a str,
    title: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    editor: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_key: Option<&'a str>,
    sender_email: &'a str,
    reply_email: &'a str,
    sender_name: &'a str,
    accounts: Vec<EmailAccountBody<'a>>,
    campaign_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    scheduled_timestamp: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scheduled_timezone: Option<&'a str>,
    add_to_list: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    selected_list: Option<SelectedListBody<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    list_id: Option<&'a str>,
    contact_input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    replace_contacts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_template_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    flux_id: Option<&'a str>,
    from_type: &'a str,
    senders: &'a [serde_json::Value],
}

pub fn encode_email_campaign_body(campaign: &EmailCampaign) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&EmailCampaignBody {
        subject: &campaign.subject,
        title: &campaign.title,
        message: &campaign.message,
        editor: campaign.editor.as_deref(),
        file_key: campaign.file_key.as_deref(),
        sender_email: &campaign.sender_email,
        reply_email: &campaign.reply_email,
        sender_name: &campaign.sender_name,
        accounts: campaign.accounts.iter().map(EmailAccountBody::from).collect(),
        campaign_type: &campaign.campaign_type,
        scheduled_timestamp: campaign.scheduled_timestamp.as_deref(),
        scheduled_timezone: campaign.scheduled_timezone.as_deref(),
        add_to_list: &campaign.add_to_list,
        selected_list: campaign
            .selected_list
            .as_ref()
            .map(|SelectedList { value }| SelectedListBody {
                value: value.as_deref(),
            }),
        list_id: campaign.list_id.as_deref(),
        contact_input: &campaign.contact_input,
        replace_contacts: campaign.replace_contacts,
        email_template_id: campaign.email_template_id.as_deref(),
        flux_id: campaign.flux_id.as_deref(),
        from_type: &campaign.from_type,
        senders: &campaign.senders,
    })
}
