//! Site-related domain models

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::outage::DeviceId;
use crate::error::SyncError;

/// A device belonging to a site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Device id, matching the ids used in outage records
    pub id: DeviceId,

    /// Human-readable device name
    pub name: String,
}

/// Site information returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteInfo {
    /// Site id, when the API includes it
    #[serde(default)]
    pub id: Option<String>,

    /// Site display name, when the API includes it
    #[serde(default)]
    pub name: Option<String>,

    /// Devices at the site
    pub devices: Vec<Device>,
}

/// Mapping from device id to device name for one site
///
/// Built fresh for every synchronization run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteDirectory {
    names: HashMap<DeviceId, String>,
}

impl SiteDirectory {
    /// Build a directory from a device list
    ///
    /// Fails if the same device id appears twice.
    pub fn from_devices(devices: Vec<Device>) -> Result<Self, SyncError> {
        let mut names = HashMap::with_capacity(devices.len());

        for device in devices {
            if names.contains_key(&device.id) {
                return Err(SyncError::remote(format!(
                    "Duplicate device id in site info: {}",
                    device.id
                )));
            }
            names.insert(device.id, device.name);
        }

        Ok(Self { names })
    }

    /// Look up a device name
    pub fn name_of(&self, id: &DeviceId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Whether the directory knows the device
    pub fn contains(&self, id: &DeviceId) -> bool {
        self.names.contains_key(id)
    }

    /// Number of devices
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the directory is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl TryFrom<SiteInfo> for SiteDirectory {
    type Error = SyncError;

    fn try_from(info: SiteInfo) -> Result<Self, Self::Error> {
        Self::from_devices(info.devices)
    }
}

impl FromIterator<(DeviceId, String)> for SiteDirectory {
    fn from_iter<I: IntoIterator<Item = (DeviceId, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}
