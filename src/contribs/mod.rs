//! Per-wiki contribution fetching.
//!
//! For every candidate wiki the fetcher decides how to select the searched
//! actor (local user ids or name text), runs the contributions query, and
//! decorates each row with its namespace name.

mod query;
mod row;

pub use query::{contribution_query, user_match_query};
pub use row::{full_page_name, ContributionRow, RawContribution};

use chrono::{DateTime, Utc};

use crate::centralauth::CentralAuthState;
use crate::config::{Source, USER_MATCH_LIMIT};
use crate::error_handling::{DbError, WikiError};
use crate::identity::SearchIdentity;
use crate::namespace::NamespaceNames;
use crate::reduce::actor_matcher;
use crate::shard::{ActorFilter, ActorMatch, ConnectionManager, ReplicaConnection};
use crate::timestamp::last_hour_cutoff;
use crate::wiki::WikiDescriptor;

/// Successful result of one wiki.
#[derive(Debug, Clone)]
pub struct WikiContributions {
    pub centralauth: CentralAuthState,
    /// More local accounts matched than could be listed; rows were selected by name
    pub has_many_matches: bool,
    /// Names of the local accounts the pattern matched, at most `USER_MATCH_LIMIT`
    pub matched_users: Vec<String>,
    /// Newest first
    pub rows: Vec<ContributionRow>,
}

/// Fetches contributions of one identity, one wiki at a time.
pub struct ContributionFetcher<'a> {
    pub manager: &'a ConnectionManager,
    pub namespaces: &'a dyn NamespaceNames,
    pub identity: &'a SearchIdentity,
    pub src: Source,
    /// Reference time for the last-hour window
    pub now: DateTime<Utc>,
}

impl ContributionFetcher<'_> {
    /// Fetches and decorates the contributions on `wiki`.
    ///
    /// # Errors
    ///
    /// Returns `WikiError` if the wiki's shard cannot be reached, a statement
    /// fails, or a namespace name cannot be resolved.
    pub async fn fetch(
        &self,
        wiki: &WikiDescriptor,
        centralauth: CentralAuthState,
    ) -> Result<WikiContributions, WikiError> {
        let connection = self.manager.get(&wiki.shard, Some(&wiki.dbname)).await?;
        let selection = self.select_actors(connection.as_ref(), wiki, &centralauth).await?;

        let since = (self.src == Source::Hr).then(|| last_hour_cutoff(self.now));
        let query = contribution_query(&wiki.dbname, self.src, selection.filter, since);
        let raw_rows = connection.fetch_contributions(&query).await?;
        log::debug!("{}: {} contribution(s)", wiki.dbname, raw_rows.len());

        let mut rows = Vec::with_capacity(raw_rows.len());
        for raw in raw_rows {
            let namespace_name = self
                .namespaces
                .namespace_name(wiki, raw.page_namespace)
                .await?;
            let row = ContributionRow::from_raw(raw, namespace_name)
                .map_err(|e| DbError::Query(sqlx::Error::Decode(Box::new(e))))?;
            rows.push(row);
        }

        Ok(WikiContributions {
            centralauth,
            has_many_matches: selection.has_many_matches,
            matched_users: selection.matched_users,
            rows,
        })
    }

    /// Chooses between id-based and name-based actor selection.
    async fn select_actors(
        &self,
        connection: &dyn ReplicaConnection,
        wiki: &WikiDescriptor,
        centralauth: &CentralAuthState,
    ) -> Result<ActorSelection, DbError> {
        let matcher = actor_matcher(self.identity);

        if self.src.is_recent_changes() || self.identity.is_ip() {
            return Ok(ActorSelection::by_name(matcher));
        }
        if let Some(record) = centralauth.record() {
            return Ok(ActorSelection {
                filter: ActorFilter::UserIds(vec![record.local_user_id]),
                has_many_matches: false,
                matched_users: Vec::new(),
            });
        }

        let mut users = connection
            .match_users(&user_match_query(&wiki.dbname, matcher.clone()))
            .await?;
        if users.len() > USER_MATCH_LIMIT {
            // A long IN (...) list defeats the index; match by name instead
            log::debug!("{}: more than {USER_MATCH_LIMIT} users match", wiki.dbname);
            users.truncate(USER_MATCH_LIMIT);
            return Ok(ActorSelection {
                matched_users: users.into_iter().map(|user| user.name).collect(),
                has_many_matches: true,
                ..ActorSelection::by_name(matcher)
            });
        }
        if users.is_empty() {
            return Ok(ActorSelection::by_name(matcher));
        }
        let (ids, names) = users.into_iter().map(|user| (user.id, user.name)).unzip();
        Ok(ActorSelection {
            filter: ActorFilter::UserIds(ids),
            has_many_matches: false,
            matched_users: names,
        })
    }
}

struct ActorSelection {
    filter: ActorFilter,
    has_many_matches: bool,
    matched_users: Vec<String>,
}

impl ActorSelection {
    fn by_name(matcher: ActorMatch) -> Self {
        Self {
            filter: ActorFilter::Name(matcher),
            has_many_matches: false,
            matched_users: Vec::new(),
        }
    }
}
