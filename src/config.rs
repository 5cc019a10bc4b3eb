use crate::domain::errors::PreconditionError;
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Run-scoped configuration, read once from the environment and passed
/// explicitly into the pipeline. Nothing here is global or mutable.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub notion_token: String,
    pub notion_db: String,
    pub fetch_timeout: Duration,
    pub max_concurrent_fetches: usize,
}

impl RunConfig {
    pub fn from_env() -> Result<Self> {
        let notion_token = env::var("NOTION_TOKEN").unwrap_or_default();
        let notion_db = env::var("NOTION_DB").unwrap_or_default();

        let fetch_timeout_secs = env::var("FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .context("Failed to parse FETCH_TIMEOUT_SECS")?;

        let max_concurrent_fetches = env::var("MAX_CONCURRENT_FETCHES")
            .unwrap_or_else(|_| "4".to_string())
            .parse::<usize>()
            .context("Failed to parse MAX_CONCURRENT_FETCHES")?;
        anyhow::ensure!(
            max_concurrent_fetches > 0,
            "MAX_CONCURRENT_FETCHES must be at least 1"
        );

        Ok(Self {
            notion_token,
            notion_db,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            max_concurrent_fetches,
        })
    }

    /// Precondition gate: both destination settings must be present before
    /// the run is allowed to touch the network.
    pub fn validate_destination(&self) -> Result<(), PreconditionError> {
        if self.notion_token.trim().is_empty() {
            return Err(PreconditionError::MissingCredential);
        }
        if self.notion_db.trim().is_empty() {
            return Err(PreconditionError::MissingDatabaseId);
        }
        Ok(())
    }
}
