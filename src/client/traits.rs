//! Outage API trait definition
//!
//! This module defines the remote operations the synchronizer depends on.
//! [`RemoteClient`](super::RemoteClient) is the HTTP implementation; tests
//! substitute the generated `MockOutageApi`.

use async_trait::async_trait;

use crate::error::SyncError;
use crate::models::{DeviceOutage, SiteDirectory, SiteOutage};

/// Remote outage-tracking service
///
/// Implementations must be safe to call concurrently; the synchronizer issues
/// `fetch_outages` and `fetch_site_directory` at the same time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OutageApi: Send + Sync {
    /// Fetch every known device outage
    async fn fetch_outages(&self) -> Result<Vec<DeviceOutage>, SyncError>;

    /// Fetch the device directory for a site
    async fn fetch_site_directory(&self, site_id: &str) -> Result<SiteDirectory, SyncError>;

    /// Submit the named outages for a site
    ///
    /// Called even when `outages` is empty.
    async fn submit(&self, site_id: &str, outages: &[SiteOutage]) -> Result<(), SyncError>;
}
