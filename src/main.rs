//! Daily market-pulse collector.
//!
//! Fetches the tracked metrics once, assembles a single per-day record and
//! appends it to a Notion database. Intended to be invoked once a day by
//! cron or a workflow trigger.
//!
//! # Usage
//! ```sh
//! marketpulse run                 # collect and publish today's record
//! marketpulse run --dry-run       # collect, log the payload, skip the write
//! marketpulse run --date 2025-03-14
//! marketpulse check               # verify NOTION_TOKEN / NOTION_DB access
//! ```
//!
//! # Environment Variables
//! - `NOTION_TOKEN` - integration token for the destination database
//! - `NOTION_DB` - destination database id
//! - `FETCH_TIMEOUT_SECS` - per-source fetch deadline (default: 10)
//! - `MAX_CONCURRENT_FETCHES` - fan-out bound (default: 4)

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use marketpulse::application::pipeline::Pipeline;
use marketpulse::config::RunConfig;
use marketpulse::infrastructure::http_client_factory::HttpClientFactory;
use marketpulse::infrastructure::notion::NotionPublisher;
use marketpulse::infrastructure::sources::registry;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Daily crypto market-pulse collector", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect all metrics and publish one record for the run date
    Run {
        /// Run date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<String>,

        /// Collect and log the record without writing to the destination
        #[arg(long)]
        dry_run: bool,
    },
    /// Verify destination credentials and list the visible properties
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();
    let config = RunConfig::from_env()?;

    match cli.command.unwrap_or(Commands::Run {
        date: None,
        dry_run: false,
    }) {
        Commands::Run { date, dry_run } => {
            let date = match date {
                Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .with_context(|| format!("Invalid --date '{s}', expected YYYY-MM-DD"))?,
                None => Utc::now().date_naive(),
            };

            let client = HttpClientFactory::create_client(config.fetch_timeout);
            let sources = registry(&client);
            let sink = Arc::new(NotionPublisher::new(
                client,
                config.notion_token.clone(),
                config.notion_db.clone(),
            ));

            let pipeline = Pipeline::new(config, sources, sink);
            let report = pipeline.run(date, dry_run).await?;
            info!(
                "{}: {} present / {} absent",
                report.date, report.present, report.absent
            );
        }
        Commands::Check => {
            config.validate_destination()?;
            let client = HttpClientFactory::create_client(config.fetch_timeout);
            let publisher =
                NotionPublisher::new(client, config.notion_token, config.notion_db);

            let properties = publisher
                .describe_database()
                .await
                .context("Could not retrieve the destination database")?;
            info!("Database found. Properties visible to the integration:");
            for name in properties {
                info!("  - {name}");
            }
        }
    }

    Ok(())
}
