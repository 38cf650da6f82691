use std::io;

use ccai::{CcaiClientBuilder, EmailAccount, EmailSender, EmailService, SendOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "ccai=info".into()))
        .init();

    let recipient = std::env::var("CCAI_EMAIL_TO").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "CCAI_EMAIL_TO environment variable is required",
        )
    })?;

    let client = CcaiClientBuilder::from_env()?.build()?;
    let email = EmailService::new(client);

    let response = email
        .send_single(
            EmailAccount::new("John", "Doe", recipient),
            EmailSender::new("noreply@cloudcontactai.com", "support@cloudcontactai.com", "CCAI Demo"),
            "Test email from Rust",
            "<p>Hello ${firstName},</p><p>This is a test email.</p>",
            "Rust email demo",
            &SendOptions::default().with_progress(|status| println!("progress: {status}")),
        )
        .await?;
    println!("id: {:?}, status: {:?}", response.id, response.status);

    Ok(())
}
