//! Domain models for outage-sync
//!
//! This module contains the core domain models used throughout the application.

pub mod outage;
pub mod site;
pub mod timestamp;

// Re-export commonly used types
pub use outage::{DeviceId, DeviceName, DeviceOutage, SiteOutage};
pub use site::{Device, SiteDirectory, SiteInfo};
