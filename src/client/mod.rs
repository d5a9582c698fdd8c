//! Outage API client
//!
//! - [`OutageApi`]: the remote operations the synchronizer needs
//! - [`RemoteClient`]: HTTP implementation with per-request retry

pub mod remote;
pub mod traits;

pub use remote::RemoteClient;
pub use traits::OutageApi;

#[cfg(test)]
pub use traits::MockOutageApi;
