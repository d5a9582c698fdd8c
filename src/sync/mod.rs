//! Remote call infrastructure
//!
//! This module provides the building blocks the API client is assembled from.
//!
//! # Components
//!
//! - [`retry`]: Retry manager with exponential backoff for handling transient failures
//! - [`http_client`]: Authorized HTTP client that classifies error statuses
//!
//! # Example
//!
//! ```ignore
//! use outage_sync::sync::{ApiHttpClient, RetryManager};
//!
//! let retry = RetryManager::with_defaults();
//! let client = ApiHttpClient::new("https://api.example.com/v1", "secret")?;
//! let url = client.endpoint(&["outages"])?;
//!
//! let response = retry.execute(|| client.get(&url)).await?;
//! ```

pub mod http_client;
pub mod retry;

pub use http_client::{decode_json, ApiHttpClient, API_KEY_HEADER, DEFAULT_TIMEOUT};
pub use retry::{RetryDecision, RetryManager};
