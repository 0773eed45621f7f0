//! Global account attachment registry.
//!
//! One global account may be attached to a local account on many wikis. The
//! registry is read once per request, for exact name searches only, and its
//! connection is released right after.

use std::collections::HashMap;

use crate::config::Settings;
use crate::error_handling::DbError;
use crate::identity::SearchIdentity;
use crate::shard::{AttachmentQuery, ConnectionManager};
use crate::timestamp::MwTimestamp;

/// Database holding `localuser`.
pub const CENTRALAUTH_DATABASE: &str = "centralauth";

const ATTACHMENT_SQL: &str = "SELECT lu_wiki, CAST(lu_local_id AS SIGNED) AS lu_local_id, \
     lu_attached_timestamp FROM localuser WHERE lu_name = ?";

/// A local account known to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRecord {
    /// Database name of the wiki
    pub wiki: String,
    /// `user_id` of the local account
    pub local_user_id: u32,
    /// `None` if the local account exists but was never attached
    pub attached_at: Option<MwTimestamp>,
}

/// Registry state of one wiki for the current search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CentralAuthState {
    /// IP and pattern searches bypass the registry
    NotApplicable,
    /// The name has no local account on this wiki
    NoLocalAccount,
    Attached(AttachmentRecord),
}

impl CentralAuthState {
    pub fn record(&self) -> Option<&AttachmentRecord> {
        match self {
            CentralAuthState::Attached(record) => Some(record),
            _ => None,
        }
    }
}

/// Registry rows of one search, keyed by wiki.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachments {
    NotApplicable,
    Records(HashMap<String, AttachmentRecord>),
}

impl Attachments {
    pub fn from_records(records: impl IntoIterator<Item = AttachmentRecord>) -> Self {
        Attachments::Records(
            records
                .into_iter()
                .map(|record| (record.wiki.clone(), record))
                .collect(),
        )
    }

    /// Whether at least one local account is known (fast path applies).
    pub fn has_records(&self) -> bool {
        matches!(self, Attachments::Records(records) if !records.is_empty())
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Attachments::NotApplicable => 0,
            Attachments::Records(records) => records.len(),
        }
    }

    pub fn record(&self, dbname: &str) -> Option<&AttachmentRecord> {
        match self {
            Attachments::NotApplicable => None,
            Attachments::Records(records) => records.get(dbname),
        }
    }

    pub fn state_for(&self, dbname: &str) -> CentralAuthState {
        match self {
            Attachments::NotApplicable => CentralAuthState::NotApplicable,
            Attachments::Records(records) => match records.get(dbname) {
                Some(record) => CentralAuthState::Attached(record.clone()),
                None => CentralAuthState::NoLocalAccount,
            },
        }
    }
}

/// Reads the registry rows for `identity`.
///
/// Returns `Attachments::NotApplicable` without querying for IP addresses and
/// prefix patterns. The registry connection is closed before returning,
/// whether or not the query succeeded.
///
/// # Errors
///
/// Returns `DbError` if the registry cannot be reached or queried.
pub async fn load_attachments(
    manager: &ConnectionManager,
    settings: &Settings,
    identity: &SearchIdentity,
) -> Result<Attachments, DbError> {
    if !identity.uses_registry() {
        return Ok(Attachments::NotApplicable);
    }

    let cluster = settings.centralauth_cluster.as_str();
    let query = AttachmentQuery {
        sql: ATTACHMENT_SQL.to_string(),
        name: identity.normalized().to_string(),
    };

    let result = match manager.get(cluster, Some(CENTRALAUTH_DATABASE)).await {
        Ok(connection) => connection.fetch_attachments(&query).await,
        Err(e) => Err(e),
    };
    manager.close(cluster).await;

    let records = result?;
    log::debug!(
        "Found {} local account(s) for {}",
        records.len(),
        identity.normalized()
    );
    Ok(Attachments::from_records(records))
}
