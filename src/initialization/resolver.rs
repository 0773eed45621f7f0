//! DNS resolver initialization.
//!
//! The resolver serves two purposes: resolving replica host names to addresses
//! (so several logical shards on one physical host share a connection) and
//! the reverse/TXT lookups of IP enrichment.

use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

/// Initializes the DNS resolver.
///
/// Uses the system configuration when available and falls back to the default
/// public resolvers otherwise. Timeouts are short: every lookup here is an
/// optimisation or an enrichment, never something a search must wait for.
pub fn init_resolver() -> Arc<TokioAsyncResolver> {
    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(crate::config::DNS_TIMEOUT_SECS);
    opts.attempts = 2;
    opts.ndots = 0;

    let config = match hickory_resolver::system_conf::read_system_conf() {
        Ok((config, _)) => config,
        Err(e) => {
            log::debug!("No usable system DNS configuration ({e}), using defaults");
            ResolverConfig::default()
        }
    };

    Arc::new(TokioAsyncResolver::tokio(config, opts))
}
