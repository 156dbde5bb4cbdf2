use std::error::Error;

use ai_llm_service::telemetry::{self, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file when present.
    dotenvy::dotenv().ok();

    telemetry::init(&TelemetryConfig::from_env())?;

    api::start().await?;

    Ok(())
}
