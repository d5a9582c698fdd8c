//! HTTP implementation of the outage API
//!
//! Endpoints, relative to the configured base URI:
//!
//! - `GET /outages`
//! - `GET /site-info/{siteId}`
//! - `POST /site-outages/{siteId}`
//!
//! Every request is retried independently according to the backoff policy.
//! Each attempt reads the whole body, so a timeout while it streams is retried
//! like any other transport failure. Decoding happens after the retry loop, so
//! a malformed body fails the call without another attempt.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::OutageApi;
use crate::backoff::BackoffPolicy;
use crate::error::SyncError;
use crate::models::{DeviceOutage, SiteDirectory, SiteInfo, SiteOutage};
use crate::sync::{decode_json, ApiHttpClient, RetryManager, DEFAULT_TIMEOUT};

/// Client for the remote outage-tracking service
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: ApiHttpClient,
    retry: RetryManager,
}

impl RemoteClient {
    /// Create a client with the default backoff policy and timeout
    pub fn new(base_uri: &str, api_key: &str) -> Result<Self, SyncError> {
        Self::with_policy(base_uri, api_key, BackoffPolicy::with_defaults(), DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom backoff policy and per-attempt timeout
    ///
    /// Fails with `InvalidArgument` when the base URI or API key is blank.
    pub fn with_policy(
        base_uri: &str,
        api_key: &str,
        policy: BackoffPolicy,
        timeout: Duration,
    ) -> Result<Self, SyncError> {
        let client = Client::builder().build().map_err(SyncError::transport)?;
        let http = ApiHttpClient::with_client(client, base_uri, api_key, timeout)?;

        Ok(Self::from_parts(http, RetryManager::new(policy)))
    }

    /// Assemble a client from an HTTP client and retry manager
    pub fn from_parts(http: ApiHttpClient, retry: RetryManager) -> Self {
        Self { http, retry }
    }

    /// Get the backoff policy
    pub fn policy(&self) -> &BackoffPolicy {
        self.retry.policy()
    }
}

#[async_trait]
impl OutageApi for RemoteClient {
    async fn fetch_outages(&self) -> Result<Vec<DeviceOutage>, SyncError> {
        let url = self.http.endpoint(&["outages"])?;

        let body = self.retry.execute(|| self.http.get(&url)).await?;
        let outages: Vec<DeviceOutage> = decode_json(&url, &body)?;

        debug!(count = outages.len(), "Fetched outages");
        Ok(outages)
    }

    async fn fetch_site_directory(&self, site_id: &str) -> Result<SiteDirectory, SyncError> {
        let url = self.http.endpoint(&["site-info", site_id])?;

        let body = self.retry.execute(|| self.http.get(&url)).await?;
        let info: SiteInfo = decode_json(&url, &body)?;
        let directory = SiteDirectory::try_from(info)?;

        debug!(site_id = %site_id, devices = directory.len(), "Fetched site directory");
        Ok(directory)
    }

    async fn submit(&self, site_id: &str, outages: &[SiteOutage]) -> Result<(), SyncError> {
        let url = self.http.endpoint(&["site-outages", site_id])?;

        self.retry
            .execute(|| self.http.post_json(&url, outages))
            .await?;

        info!(site_id = %site_id, count = outages.len(), "Submitted site outages");
        Ok(())
    }
}
