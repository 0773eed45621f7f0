//! Configuration constants.
//!
//! This module defines the limits, timeouts and well-known names used throughout
//! the search pipeline.

use std::time::Duration;

// Result limits
/// Maximum number of contributions fetched per wiki
pub const CONTRIB_LIMIT: usize = 20;
/// Maximum number of distinct IP addresses enriched per request
pub const IP_HARVEST_LIMIT: usize = 10;
/// Maximum number of local accounts matched before falling back to name-text matching
pub const USER_MATCH_LIMIT: usize = 10;
/// Defensive cap on the number of rows read from the wiki directory
pub const WIKI_LIST_LIMIT: usize = 1500;
/// Maximum number of per-wiki probes combined into one UNION ALL statement.
///
/// Equal to the directory cap, so a shard is never split unless configured lower.
pub const MAX_WIKIS_PER_PROBE: usize = WIKI_LIST_LIMIT;

// Recent changes
/// Width of the "last hour" window in seconds
pub const LAST_HOUR_WINDOW_SECS: i64 = 3600;
/// `rc_type` of a regular edit
pub const MW_RC_EDIT: i32 = 0;
/// `rc_type` of a page creation
pub const MW_RC_NEW: i32 = 1;
// Other rc types: log events, categorization, external (e.g. Wikidata)

// Well-known clusters and databases
/// Cluster hosting the wiki directory (`meta_p.wiki`)
pub const META_CLUSTER: &str = "meta";
/// Cluster hosting the attachment registry (`centralauth_p.localuser`)
pub const CENTRALAUTH_CLUSTER: &str = "centralauth";
/// Database holding replication heartbeats
pub const HEARTBEAT_DATABASE: &str = "heartbeat";
/// Shards checked by the replication lag report
pub const REPLAG_SHARDS: &[&str] = &["s1", "s2", "s3", "s4", "s5", "s6", "s7", "s8"];

/// Domain appended to bare cluster names (`s1` → `s1.web.db.svc.wikimedia.cloud`)
pub const DEFAULT_HOST_SUFFIX: &str = "web.db.svc.wikimedia.cloud";
/// Legacy suffix still found in older directory rows
pub const LEGACY_HOST_SUFFIX: &str = "labsdb";

// Network operation timeouts
/// DNS query timeout in seconds
pub const DNS_TIMEOUT_SECS: u64 = 3;
/// Database connect timeout in seconds
pub const DB_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Timeout for one site-info API call
pub const NAMESPACE_API_TIMEOUT: Duration = Duration::from_secs(5);
/// Timeout for the complete enrichment of one IP address (ASN + description + PTR)
pub const IP_LOOKUP_TIMEOUT: Duration = Duration::from_secs(4);

// Paths
/// Default SQLite file holding the namespace name cache
pub const NAMESPACE_CACHE_PATH: &str = "./cache/namespaces.db";

/// User-Agent sent to wiki APIs
pub const USER_AGENT: &str = concat!(
    "global_contribs/",
    env!("CARGO_PKG_VERSION"),
    " (cross-wiki contribution search)"
);

// MediaWiki timestamp formats
/// Format of a 14-digit MediaWiki timestamp
pub const MW_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
/// Format used for change lines (`14:05, 02 Jan 2023`)
pub const CHANGE_DATE_FORMAT: &str = "%H:%M, %d %b %Y";
/// Format used for day headings in the chronological view
pub const DAY_HEADING_FORMAT: &str = "%d %b %Y";
