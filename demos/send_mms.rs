use std::io;

use ccai::{Account, CcaiClientBuilder, MmsService, SendOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "ccai=info".into()))
        .init();

    let phone = required("CCAI_PHONE")?;
    let image = required("CCAI_IMAGE_PATH")?;
    let content_type = std::env::var("CCAI_IMAGE_TYPE").unwrap_or_else(|_| "image/jpeg".to_owned());

    let client = CcaiClientBuilder::from_env()?.build()?;
    let mms = MmsService::new(client);

    let options = SendOptions::default().with_progress(|status| println!("progress: {status}"));
    let response = mms
        .send_with_image(
            &image,
            &content_type,
            vec![Account::new("John", "Doe", phone)],
            "Hello ${firstName}, check out this image!",
            "Rust MMS demo",
            &options,
            true,
        )
        .await?;
    println!("id: {:?}, status: {:?}", response.id, response.status);

    Ok(())
}

fn required(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}
