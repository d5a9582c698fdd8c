//! Outage synchronization pipeline
//!
//! A run fetches the outage list and the site's device directory
//! concurrently, keeps outages that began at or after the cutoff and belong to
//! a known device, attaches device names, and submits the result.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::client::OutageApi;
use crate::error::SyncError;
use crate::models::{timestamp, DeviceOutage, SiteDirectory, SiteOutage};

/// Summary of a completed synchronization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Outages returned by the API
    pub fetched: usize,
    /// Outages dropped for beginning before the cutoff
    pub discarded_before_cutoff: usize,
    /// Outages dropped because their device is not at the site
    pub discarded_unknown_device: usize,
    /// Outages submitted
    pub submitted: usize,
}

/// Result of joining outages against a site directory
#[derive(Debug, Clone, Default)]
pub struct JoinedOutages {
    /// Named outages to submit, in the order they were fetched
    pub outages: Vec<SiteOutage>,
    /// Outages dropped for beginning before the cutoff
    pub discarded_before_cutoff: usize,
    /// Outages dropped because their device is not in the directory
    pub discarded_unknown_device: usize,
}

/// Filter outages by cutoff and attach device names
///
/// Outages that begin strictly before `cutoff` are dropped, as are outages
/// whose device is missing from `directory`. Fails with `InvalidArgument` if a
/// matching device has a blank name.
pub fn join_outages(
    outages: Vec<DeviceOutage>,
    directory: &SiteDirectory,
    cutoff: &DateTime<FixedOffset>,
) -> Result<JoinedOutages, SyncError> {
    let mut joined = JoinedOutages::default();

    for outage in outages {
        if outage.begins_before(cutoff) {
            joined.discarded_before_cutoff += 1;
            continue;
        }

        match directory.name_of(&outage.device_id) {
            Some(name) => joined.outages.push(outage.with_device_name(name)?),
            None => {
                debug!(device_id = %outage.device_id, "Skipping outage for unknown device");
                joined.discarded_unknown_device += 1;
            }
        }
    }

    Ok(joined)
}

/// Runs the fetch, join and submit pipeline against an [`OutageApi`]
#[derive(Debug, Clone)]
pub struct OutageSynchronizer<A> {
    api: A,
}

impl<A: OutageApi> OutageSynchronizer<A> {
    /// Create a synchronizer over the given API
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Synchronize the outages of one site
    ///
    /// A blank `site_id` fails with `InvalidArgument` before any remote call.
    /// The two fetches run concurrently; the first to fail aborts the run and
    /// its error is returned. Submission happens even when nothing survives
    /// the join.
    pub async fn synchronize(
        &self,
        site_id: &str,
        cutoff: &DateTime<FixedOffset>,
    ) -> Result<SyncReport, SyncError> {
        if site_id.trim().is_empty() {
            return Err(SyncError::InvalidArgument(
                "A non-blank site id is required.".to_string(),
            ));
        }

        info!(
            site_id = %site_id,
            cutoff = %timestamp::format(cutoff),
            "Starting outage synchronization"
        );

        let (outages, directory) = tokio::try_join!(
            self.api.fetch_outages(),
            self.api.fetch_site_directory(site_id)
        )
        .map_err(|e| {
            warn!(site_id = %site_id, error = %e, "Failed to fetch outage data");
            e
        })?;

        let fetched = outages.len();
        let joined = join_outages(outages, &directory, cutoff)?;

        self.api.submit(site_id, &joined.outages).await?;

        let report = SyncReport {
            fetched,
            discarded_before_cutoff: joined.discarded_before_cutoff,
            discarded_unknown_device: joined.discarded_unknown_device,
            submitted: joined.outages.len(),
        };

        info!(
            site_id = %site_id,
            fetched = report.fetched,
            discarded_before_cutoff = report.discarded_before_cutoff,
            discarded_unknown_device = report.discarded_unknown_device,
            submitted = report.submitted,
            "Outage synchronization completed"
        );

        Ok(report)
    }

    /// Get the underlying API
    pub fn api(&self) -> &A {
        &self.api
    }
}
