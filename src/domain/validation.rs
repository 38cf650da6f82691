use std::fmt;

use crate::domain::request::{Account, EmailAccount, EmailCampaign};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NoAccounts,
    Required { field: &'static str },
    RequiredForAccount { field: &'static str, index: usize },
    MissingEnvVar { name: &'static str },
    InvalidUrl { field: &'static str, input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAccounts => f.write_str("At least one account is required"),
            Self::Required { field } => write!(f, "{field} is required"),
            Self::RequiredForAccount { field, index } => {
                write!(f, "{field} is required for account at index {index}")
            }
            Self::MissingEnvVar { name } => {
                write!(f, "{name} environment variable is required")
            }
            Self::InvalidUrl { field, input } => write!(f, "{field} is not a valid URL: {input}"),
        }
    }
}

impl std::error::Error for ValidationError {}

pub(crate) const MESSAGE: &str = "Message";
pub(crate) const TITLE: &str = "Campaign title";
pub(crate) const PICTURE_FILE_KEY: &str = "Picture file key";
pub(crate) const SUBJECT: &str = "Subject";
pub(crate) const MESSAGE_CONTENT: &str = "Message content";
pub(crate) const SENDER_EMAIL: &str = "Sender email";
pub(crate) const REPLY_EMAIL: &str = "Reply email";
pub(crate) const SENDER_NAME: &str = "Sender name";
pub(crate) const FIRST_NAME: &str = "First name";
pub(crate) const LAST_NAME: &str = "Last name";
pub(crate) const PHONE: &str = "Phone number";
pub(crate) const EMAIL: &str = "Email";
pub(crate) const FILE_NAME: &str = "File name";
pub(crate) const FILE_TYPE: &str = "File type";
pub(crate) const SIGNED_URL: &str = "Signed URL";
pub(crate) const FILE_PATH: &str = "File path";
pub(crate) const CONTENT_TYPE: &str = "Content type";

/// Fail with [`ValidationError::Required`] when `value` is empty.
pub(crate) fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

fn require_for_account(
    value: &str,
    field: &'static str,
    index: usize,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::RequiredForAccount { field, index });
    }
    Ok(())
}

/// Checks shared by SMS and MMS batches.
///
/// Batch-level fields are checked before any account; each account is checked
/// first name, last name, then phone.
pub(crate) fn validate_text_batch(
    accounts: &[Account],
    message: &str,
    title: &str,
) -> Result<(), ValidationError> {
    if accounts.is_empty() {
        return Err(ValidationError::NoAccounts);
    }
    require(message, MESSAGE)?;
    require(title, TITLE)?;

    for (index, account) in accounts.iter().enumerate() {
        require_for_account(&account.first_name, FIRST_NAME, index)?;
        require_for_account(&account.last_name, LAST_NAME, index)?;
        require_for_account(&account.phone, PHONE, index)?;
    }
    Ok(())
}

pub(crate) fn validate_email_campaign(campaign: &EmailCampaign) -> Result<(), ValidationError> {
    if campaign.accounts.is_empty() {
        return Err(ValidationError::NoAccounts);
    }
    require(&campaign.subject, SUBJECT)?;
    require(&campaign.title, TITLE)?;
    require(&campaign.message, MESSAGE_CONTENT)?;
    require(&campaign.sender_email, SENDER_EMAIL)?;
    require(&campaign.reply_email, REPLY_EMAIL)?;
    require(&campaign.sender_name, SENDER_NAME)?;

    for (index, account) in campaign.accounts.iter().enumerate() {
        validate_email_account(account, index)?;
    }
    Ok(())
}

fn validate_email_account(account: &EmailAccount, index: usize) -> Result<(), ValidationError> {
    require_for_account(&account.first_name, FIRST_NAME, index)?;
    require_for_account(&account.last_name, LAST_NAME, index)?;
    require_for_account(&account.email, EMAIL, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(first: &str, last: &str, phone: &str) -> Account {
        Account::new(first, last, phone)
    }

    #[test]
    fn display_messages_are_human_readable() {
        assert_eq!(
            ValidationError::NoAccounts.to_string(),
            "At least one account is required"
        );

        let err = ValidationError::Required { field: "Message" };
        assert_eq!(err.to_string(), "Message is required");

        let err = ValidationError::RequiredForAccount {
            field: "First name",
            index: 2,
        };
        assert_eq!(
            err.to_string(),
            "First name is required for account at index 2"
        );

        let err = ValidationError::MissingEnvVar {
            name: "CCAI_API_KEY",
        };
        assert_eq!(
            err.to_string(),
            "CCAI_API_KEY environment variable is required"
        );
    }

    #[test]
    fn empty_batch_is_checked_before_message_and_title() {
        let err = validate_text_batch(&[], "", "").unwrap_err();
        assert_eq!(err, ValidationError::NoAccounts);
    }

    #[test]
    fn message_is_checked_before_title() {
        let accounts = vec![account("John", "Doe", "+15551234567")];
        let err = validate_text_batch(&accounts, "", "").unwrap_err();
        assert_eq!(err.to_string(), "Message is required");

        let err = validate_text_batch(&accounts, "hi", "").unwrap_err();
        assert_eq!(err.to_string(), "Campaign title is required");
    }

    #[test]
    fn batch_fields_are_checked_before_accounts() {
        let accounts = vec![account("", "", "")];
        let err = validate_text_batch(&accounts, "", "title").unwrap_err();
        assert_eq!(err.to_string(), "Message is required");
    }

    #[test]
    fn first_offending_account_index_is_reported() {
        let accounts = vec![
            account("John", "Doe", "+15551234567"),
            account("Jane", "Smith", "+15557654321"),
            account("", "Roe", "+15550000000"),
            account("", "", ""),
        ];
        let err = validate_text_batch(&accounts, "hi", "title").unwrap_err();
        assert_eq!(
            err.to_string(),
            "First name is required for account at index 2"
        );
    }

    #[test]
    fn account_fields_are_checked_in_order() {
        let err = validate_text_batch(&[account("", "", "")], "m", "t").unwrap_err();
        assert_eq!(
            err,
            ValidationError::RequiredForAccount {
                field: FIRST_NAME,
                index: 0
            }
        );

        let err = validate_text_batch(&[account("A", "", "")], "m", "t").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Last name is required for account at index 0"
        );

        let err = validate_text_batch(&[account("A", "B", "")], "m", "t").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Phone number is required for account at index 0"
        );
    }

    #[test]
    fn repeated_failures_produce_identical_messages() {
        let accounts = vec![account("John", "", "+15551234567")];
        let first = validate_text_batch(&accounts, "m", "t").unwrap_err().to_string();
        let second = validate_text_batch(&accounts, "m", "t").unwrap_err().to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn email_campaign_fields_are_checked_in_order() {
        let recipient = EmailAccount::new("John", "Doe", "john@example.com");
        let mut campaign = EmailCampaign::new(
            "",
            "",
            "",
            "",
            "",
            "",
            vec![recipient],
        );

        let expected = [
            "Subject is required",
            "Campaign title is required",
            "Message content is required",
            "Sender email is required",
            "Reply email is required",
            "Sender name is required",
        ];
        let fill: [fn(&mut EmailCampaign); 6] = [
            |c| c.subject = "s".to_owned(),
            |c| c.title = "t".to_owned(),
            |c| c.message = "m".to_owned(),
            |c| c.sender_email = "a@b.c".to_owned(),
            |c| c.reply_email = "a@b.c".to_owned(),
            |c| c.sender_name = "n".to_owned(),
        ];

        for (message, step) in expected.into_iter().zip(fill) {
            let err = validate_email_campaign(&campaign).unwrap_err();
            assert_eq!(err.to_string(), message);
            step(&mut campaign);
        }
        assert!(validate_email_campaign(&campaign).is_ok());
    }

    #[test]
    fn email_accounts_require_email_not_phone() {
        let mut campaign = EmailCampaign::new(
            "s",
            "t",
            "m",
            "a@b.c",
            "a@b.c",
            "n",
            vec![EmailAccount::new("John", "Doe", "john@example.com")],
        );
        assert!(validate_email_campaign(&campaign).is_ok());

        campaign.accounts.push(EmailAccount::new("Jane", "Doe", ""));
        let err = validate_email_campaign(&campaign).unwrap_err();
        assert_eq!(err.to_string(), "Email is required for account at index 1");

        campaign.accounts.clear();
        let err = validate_email_campaign(&campaign).unwrap_err();
        assert_eq!(err, ValidationError::NoAccounts);
    }
}
