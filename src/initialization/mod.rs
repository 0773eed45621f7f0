//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the process-wide resources:
//! - Logger
//! - HTTP client (site-info API)
//! - DNS resolver (replica host resolution, IP enrichment)
//!
//! Per-request resources (connection manager, aggregator) are created by the
//! search itself.

mod client;
mod logger;
mod resolver;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;
pub use resolver::init_resolver;
