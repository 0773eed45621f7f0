//! HTTP client initialization.
//!
//! This module provides the HTTP client used for wiki site-info API requests.

use std::sync::Arc;

use reqwest::ClientBuilder;

use crate::config::{NAMESPACE_API_TIMEOUT, USER_AGENT};

/// Initializes the HTTP client for wiki API requests.
///
/// Creates a `reqwest::Client` configured with:
/// - The crate's User-Agent (wiki APIs reject anonymous agents)
/// - A short overall timeout, so one slow wiki cannot stall a search
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client() -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .timeout(NAMESPACE_API_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(Arc::new(client))
}
