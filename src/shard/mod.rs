//! Replica connections.
//!
//! Wikis live on a handful of shards, and several shards may be served by the
//! same physical host. The `ConnectionManager` hands out one connection per
//! resolved address and switches the default database per request.
//!
//! The database driver sits behind two traits:
//!
//! - `ConnectionOpener`: resolves host names and opens connections
//! - `ReplicaConnection`: runs the statements of `query`

mod host;
mod manager;
mod mysql;
pub mod query;

pub use host::{normalize_host, replica_database};
pub use manager::{ConnectionManager, ConnectionStats};
pub use mysql::{Credentials, MySqlOpener};
pub use query::{
    ActorFilter, ActorMatch, AttachmentQuery, ContributionQuery, LocalUser, ProbeCriterion,
    ProbeStatement, SqlParam, UserMatchQuery, WikiListQuery, WikiProbe,
};

use std::sync::Arc;

use async_trait::async_trait;

use crate::centralauth::AttachmentRecord;
use crate::contribs::RawContribution;
use crate::error_handling::DbError;
use crate::wiki::WikiRow;

/// One open connection to a replica host.
///
/// Implementations serialize statements internally; a connection may be shared
/// by several shards that resolve to the same address.
#[async_trait]
pub trait ReplicaConnection: Send + Sync {
    /// Switches the default database (`USE <name>`).
    async fn select_database(&self, database: &str) -> Result<(), DbError>;

    /// Reads the wiki directory.
    async fn fetch_wikis(&self, query: &WikiListQuery) -> Result<Vec<WikiRow>, DbError>;

    /// Reads the attachment records of one global account.
    async fn fetch_attachments(
        &self,
        query: &AttachmentQuery,
    ) -> Result<Vec<AttachmentRecord>, DbError>;

    /// Runs a combined existence probe; returns the database names that matched.
    async fn probe(&self, statement: &ProbeStatement) -> Result<Vec<String>, DbError>;

    /// Finds local accounts by name.
    async fn match_users(&self, query: &UserMatchQuery) -> Result<Vec<LocalUser>, DbError>;

    /// Reads contributions, newest first.
    async fn fetch_contributions(
        &self,
        query: &ContributionQuery,
    ) -> Result<Vec<RawContribution>, DbError>;

    /// Replication lag of a shard in seconds, `None` if the shard is unknown.
    async fn replication_lag(&self, shard: &str) -> Result<Option<i64>, DbError>;
}

/// Opens replica connections.
#[async_trait]
pub trait ConnectionOpener: Send + Sync {
    /// Resolves a host name to an address, `None` if it cannot be resolved.
    async fn resolve_host(&self, host: &str) -> Option<String>;

    /// Opens a new connection to `host`, optionally selecting a database.
    async fn open(
        &self,
        host: &str,
        database: Option<&str>,
    ) -> Result<Arc<dyn ReplicaConnection>, DbError>;
}
