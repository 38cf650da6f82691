use std::io;

use ccai::{Account, CcaiClientBuilder, SendOptions, SmsService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "ccai=info".into()))
        .init();

    let phone = std::env::var("CCAI_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "CCAI_PHONE environment variable is required",
        )
    })?;
    let message = std::env::var("CCAI_MESSAGE")
        .unwrap_or_else(|_| "Hello ${firstName}, this is a test message.".to_owned());

    let client = CcaiClientBuilder::from_env()?.build()?;
    let sms = SmsService::new(client);

    let options = SendOptions::default().with_progress(|status| println!("progress: {status}"));
    let response = sms
        .send(
            vec![Account::new("John", "Doe", phone)],
            &message,
            "Rust demo",
            &options,
        )
        .await?;
    println!(
        "id: {:?}, campaign_id: {:?}, status: {:?}",
        response.id, response.campaign_id, response.status
    );

    Ok(())
}
