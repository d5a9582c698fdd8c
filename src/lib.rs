//! outage-sync - Synchronizes device outages for a site
//!
//! This crate fetches device outages and a site's device directory from a
//! remote outage-tracking API, keeps the outages that began at or after a
//! cutoff and belong to a device at the site, names them, and submits the
//! result back to the API.

pub mod backoff;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod sync;
pub mod synchronizer;

use crate::client::RemoteClient;
use crate::config::Config;
use crate::error::AppError;
use crate::synchronizer::{OutageSynchronizer, SyncReport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version line printed by `--version`
pub fn version_string() -> String {
    format!("Outage Agent/{}", VERSION)
}

/// Run one synchronization with a validated configuration
pub async fn run(config: &Config) -> Result<SyncReport, AppError> {
    config.validate()?;

    let api_key = config.api.api_key.as_deref().unwrap_or_default();
    let policy = config.retry.to_policy()?;
    let cutoff = config.sync.cutoff_timestamp()?;

    let client =
        RemoteClient::with_policy(&config.api.base_uri, api_key, policy, config.api.timeout())?;
    let synchronizer = OutageSynchronizer::new(client);

    Ok(synchronizer
        .synchronize(&config.sync.site_id, &cutoff)
        .await?)
}
