use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tenant_loader::config::Config;
use tenant_loader::services::IngestService;

#[derive(Parser)]
#[command(name = "tenant-loader")]
#[command(about = "Load tenant records from a CSV file into MySQL", long_about = None)]
struct Cli {
    /// Path to the tenants CSV file
    #[arg(long, env = "TENANTS_CSV", default_value = "some_users.csv")]
    file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if it exists (ignore errors if not found)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tenant_loader=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::from_env();
    info!("Starting tenant loader with config: {:?}", config);

    let service = IngestService::new(&config)?;
    let result = service.run(&cli.file).await;
    service.close().await;

    let summary = result?;
    info!(
        rows_read = summary.rows_read,
        rows_upserted = summary.rows_upserted,
        "Import completed successfully!"
    );

    Ok(())
}
