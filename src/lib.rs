//! global_contribs library: cross-wiki contribution search
//!
//! Given a user name, an IP address or a name prefix, this library finds the
//! wikis of a sharded wiki federation that hold matching edits, fetches the
//! latest contributions from each, and renders them grouped by wiki or merged
//! chronologically.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use global_contribs::config::{SearchOptions, Settings};
//! use global_contribs::initialization::{init_client, init_resolver};
//! use global_contribs::ipinfo::DnsIpLookup;
//! use global_contribs::namespace::NamespaceCache;
//! use global_contribs::shard::{ConnectionManager, Credentials, MySqlOpener};
//! use global_contribs::storage::{init_db_pool_with_path, run_migrations, NamespaceStore};
//! use global_contribs::{render_report, run_search, SearchContext};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::default();
//! let resolver = init_resolver();
//! let pool = init_db_pool_with_path(&settings.namespace_cache_path).await?;
//! run_migrations(&pool).await?;
//!
//! let credentials = Credentials {
//!     user: "reader".to_string(),
//!     password: "secret".to_string(),
//! };
//! let manager = ConnectionManager::new(
//!     Arc::new(MySqlOpener::new(Arc::clone(&resolver), credentials)),
//!     settings.host_suffix.clone(),
//! );
//! let namespaces = NamespaceCache::new(init_client()?, NamespaceStore::new(pool));
//! let ip_lookup = DnsIpLookup::new(resolver);
//!
//! let ctx = SearchContext {
//!     manager: &manager,
//!     namespaces: &namespaces,
//!     ip_lookup: &ip_lookup,
//!     settings: &settings,
//! };
//! let report = run_search(&ctx, "Example", &SearchOptions::default()).await?;
//! println!("{}", render_report(&report));
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

pub mod aggregate;
pub mod centralauth;
pub mod config;
pub mod contribs;
pub mod error_handling;
pub mod identity;
pub mod initialization;
pub mod ipinfo;
pub mod namespace;
pub mod reduce;
pub mod render;
pub mod replag;
pub mod search;
pub mod shard;
pub mod storage;
pub mod timestamp;
pub mod trace;
pub mod wiki;

// Re-export public API
pub use config::{GroupBy, SearchOptions, Settings, Source};
pub use error_handling::{SearchError, WikiError};
pub use identity::{IdentityKind, SearchIdentity};
pub use render::render_report;
pub use replag::{check_replag, ReplagReport};
pub use search::{run_search, run_search_at, SearchContext, SearchReport};
