// Shared test helpers: an in-memory wiki federation behind the replica traits,
// plus fake namespace and IP lookups.

#![allow(dead_code)] // Not every test file uses every helper

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use global_contribs::centralauth::AttachmentRecord;
use global_contribs::config::{Settings, Source};
use global_contribs::contribs::RawContribution;
use global_contribs::error_handling::{DbError, NamespaceError};
use global_contribs::ipinfo::{IpInfo, IpLookup};
use global_contribs::namespace::NamespaceNames;
use global_contribs::shard::{
    ActorFilter, AttachmentQuery, ConnectionManager, ConnectionOpener, ContributionQuery,
    LocalUser, ProbeCriterion, ProbeStatement, ReplicaConnection, UserMatchQuery, WikiListQuery,
};
use global_contribs::timestamp::MwTimestamp;
use global_contribs::wiki::{WikiDescriptor, WikiRow};
use global_contribs::{run_search_at, SearchContext, SearchError, SearchOptions, SearchReport};

/// Reference time of every test search: 2023-01-02 12:00:00 UTC.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 2, 12, 0, 0).unwrap()
}

/// One edit on a fake wiki.
#[derive(Debug, Clone)]
pub struct FakeEdit {
    pub actor: String,
    /// Local user id, `None` for IP edits
    pub user_id: Option<u32>,
    pub page_title: String,
    pub namespace: i32,
    pub timestamp: String,
    pub minor: bool,
    pub current: bool,
    pub comment: Option<String>,
    /// Also present in recent changes
    pub recent: bool,
}

/// An edit by `actor` at `timestamp`, in the main namespace, not recent.
pub fn edit(actor: &str, timestamp: &str) -> FakeEdit {
    FakeEdit {
        actor: actor.to_string(),
        user_id: None,
        page_title: "Sandbox".to_string(),
        namespace: 0,
        timestamp: timestamp.to_string(),
        minor: false,
        current: false,
        comment: None,
        recent: false,
    }
}

impl FakeEdit {
    pub fn by_user(mut self, id: u32) -> Self {
        self.user_id = Some(id);
        self
    }

    pub fn recent(mut self) -> Self {
        self.recent = true;
        self
    }

    pub fn in_namespace(mut self, namespace: i32) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }
}

/// The data behind every fake replica connection.
#[derive(Default)]
pub struct FakeFederation {
    pub wikis: Vec<WikiRow>,
    pub closed: HashSet<String>,
    /// Global name → attachment records
    pub attachments: HashMap<String, Vec<AttachmentRecord>>,
    /// dbname → local accounts
    pub users: HashMap<String, Vec<LocalUser>>,
    /// dbname → edits
    pub edits: HashMap<String, Vec<FakeEdit>>,
    /// Clusters (first host label) that refuse connections
    pub down: HashSet<String>,
    /// Wikis whose contributions query fails
    pub broken_wikis: HashSet<String>,
    /// shard → heartbeat lag
    pub lag: HashMap<String, i64>,

    pub registry_queries: AtomicUsize,
    pub probe_statements: AtomicUsize,
    pub user_queries: AtomicUsize,
    pub contribution_queries: AtomicUsize,
    pub opened: AtomicUsize,
}

impl FakeFederation {
    pub fn add_wiki(&mut self, dbname: &str, shard: &str) {
        self.wikis.push(WikiRow {
            dbname: dbname.to_string(),
            slice: shard.to_string(),
            family: "wikipedia".to_string(),
            url: format!("https://{dbname}.example.org"),
        });
    }

    pub fn add_edit(&mut self, dbname: &str, edit: FakeEdit) {
        self.edits.entry(dbname.to_string()).or_default().push(edit);
    }

    pub fn add_user(&mut self, dbname: &str, id: u32, name: &str) {
        self.users.entry(dbname.to_string()).or_default().push(LocalUser {
            id,
            name: name.to_string(),
        });
    }

    pub fn attach(&mut self, name: &str, dbname: &str, local_user_id: u32) {
        self.attachments
            .entry(name.to_string())
            .or_default()
            .push(AttachmentRecord {
                wiki: dbname.to_string(),
                local_user_id,
                attached_at: MwTimestamp::parse("20200101120000").ok(),
            });
    }

    fn edit_count(&self, dbname: &str, user_id: u32) -> usize {
        self.edits
            .get(dbname)
            .map_or(0, |edits| edits.iter().filter(|e| e.user_id == Some(user_id)).count())
    }

    fn in_window(edit: &FakeEdit, source: Source, since: Option<&str>) -> bool {
        if source.is_recent_changes() && !edit.recent {
            return false;
        }
        since.map_or(true, |since| edit.timestamp.as_str() >= since)
    }
}

/// Opens `FakeConnection`s; every host resolves to itself.
pub struct FakeOpener {
    pub federation: Arc<FakeFederation>,
}

#[async_trait]
impl ConnectionOpener for FakeOpener {
    async fn resolve_host(&self, host: &str) -> Option<String> {
        Some(host.to_string())
    }

    async fn open(
        &self,
        host: &str,
        database: Option<&str>,
    ) -> Result<Arc<dyn ReplicaConnection>, DbError> {
        let cluster = host.split('.').next().unwrap_or(host);
        if self.federation.down.contains(cluster) {
            return Err(DbError::Connect {
                host: host.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        self.federation.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FakeConnection {
            federation: Arc::clone(&self.federation),
            database: Mutex::new(database.map(str::to_string)),
        }))
    }
}

pub struct FakeConnection {
    federation: Arc<FakeFederation>,
    database: Mutex<Option<String>>,
}

#[async_trait]
impl ReplicaConnection for FakeConnection {
    async fn select_database(&self, database: &str) -> Result<(), DbError> {
        *self.database.lock().unwrap() = Some(database.to_string());
        Ok(())
    }

    async fn fetch_wikis(&self, query: &WikiListQuery) -> Result<Vec<WikiRow>, DbError> {
        let fed = &self.federation;
        Ok(fed
            .wikis
            .iter()
            .filter(|w| query.include_closed || !fed.closed.contains(&w.dbname))
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn fetch_attachments(
        &self,
        query: &AttachmentQuery,
    ) -> Result<Vec<AttachmentRecord>, DbError> {
        self.federation.registry_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .federation
            .attachments
            .get(&query.name)
            .cloned()
            .unwrap_or_default())
    }

    async fn probe(&self, statement: &ProbeStatement) -> Result<Vec<String>, DbError> {
        let fed = &self.federation;
        fed.probe_statements.fetch_add(1, Ordering::SeqCst);
        Ok(statement
            .probes
            .iter()
            .filter(|probe| match &probe.criterion {
                ProbeCriterion::EditCount { user_id } => fed.edit_count(&probe.dbname, *user_id) >= 1,
                ProbeCriterion::RecentChange { user_id, since } => {
                    fed.edits.get(&probe.dbname).is_some_and(|edits| {
                        edits.iter().any(|e| {
                            e.user_id == Some(*user_id)
                                && FakeFederation::in_window(e, Source::Rc, since.as_deref())
                        })
                    })
                }
                ProbeCriterion::Actor {
                    matcher,
                    source,
                    since,
                } => fed.edits.get(&probe.dbname).is_some_and(|edits| {
                    edits.iter().any(|e| {
                        matcher.matches(&e.actor)
                            && FakeFederation::in_window(e, *source, since.as_deref())
                    })
                }),
            })
            .map(|probe| probe.dbname.clone())
            .collect())
    }

    async fn match_users(&self, query: &UserMatchQuery) -> Result<Vec<LocalUser>, DbError> {
        self.federation.user_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .federation
            .users
            .get(&query.dbname)
            .map(|users| {
                users
                    .iter()
                    .filter(|u| query.matcher.matches(&u.name))
                    .take(query.limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch_contributions(
        &self,
        query: &ContributionQuery,
    ) -> Result<Vec<RawContribution>, DbError> {
        let fed = &self.federation;
        fed.contribution_queries.fetch_add(1, Ordering::SeqCst);
        if fed.broken_wikis.contains(&query.dbname) {
            return Err(DbError::Query(sqlx::Error::Protocol(
                "table revision_userindex is marked as crashed".to_string(),
            )));
        }

        let mut edits: Vec<&FakeEdit> = fed
            .edits
            .get(&query.dbname)
            .map(|edits| {
                edits
                    .iter()
                    .filter(|e| match &query.filter {
                        ActorFilter::UserIds(ids) => e.user_id.is_some_and(|id| ids.contains(&id)),
                        ActorFilter::Name(matcher) => matcher.matches(&e.actor),
                    })
                    .filter(|e| FakeFederation::in_window(e, query.source, query.since.as_deref()))
                    .collect()
            })
            .unwrap_or_default();
        edits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(edits
            .into_iter()
            .take(query.limit)
            .enumerate()
            .map(|(i, e)| RawContribution {
                page_title: e.page_title.clone(),
                page_namespace: e.namespace,
                timestamp: e.timestamp.clone(),
                is_minor: e.minor,
                length: Some(100),
                revision_id: 1000 + i as i64,
                actor_name: e.actor.clone(),
                is_current: e.current,
                comment_text: e.comment.clone(),
            })
            .collect())
    }

    async fn replication_lag(&self, shard: &str) -> Result<Option<i64>, DbError> {
        Ok(self.federation.lag.get(shard).copied())
    }
}

/// Main, Talk and User namespaces; anything else is unknown.
pub struct FakeNamespaces;

#[async_trait]
impl NamespaceNames for FakeNamespaces {
    async fn namespace_name(
        &self,
        wiki: &WikiDescriptor,
        namespace_id: i32,
    ) -> Result<String, NamespaceError> {
        match namespace_id {
            0 => Ok(String::new()),
            1 => Ok("Talk".to_string()),
            2 => Ok("User".to_string()),
            id => Err(NamespaceError::UnknownNamespace {
                id,
                server: wiki.canonical_server.clone(),
            }),
        }
    }
}

/// Records every looked-up address.
#[derive(Default)]
pub struct CountingIpLookup {
    pub looked_up: Mutex<Vec<String>>,
}

impl CountingIpLookup {
    pub fn calls(&self) -> Vec<String> {
        self.looked_up.lock().unwrap().clone()
    }
}

#[async_trait]
impl IpLookup for CountingIpLookup {
    async fn lookup(&self, ip: &str) -> IpInfo {
        self.looked_up.lock().unwrap().push(ip.to_string());
        IpInfo {
            host: Some(format!("host-{}.example.net", ip.replace(':', "-"))),
            asn: Some(64500),
            description: Some("EXAMPLE-AS, ZZ".to_string()),
            range: Some("192.0.2.0/24".to_string()),
            ..IpInfo::empty(ip)
        }
    }
}

/// A federation plus the collaborators a search needs.
pub struct Harness {
    pub federation: Arc<FakeFederation>,
    pub manager: ConnectionManager,
    pub namespaces: FakeNamespaces,
    pub ip_lookup: CountingIpLookup,
    pub settings: Settings,
}

impl Harness {
    pub fn new(federation: FakeFederation) -> Self {
        Self::with_settings(federation, Settings::default())
    }

    pub fn with_settings(federation: FakeFederation, settings: Settings) -> Self {
        let federation = Arc::new(federation);
        let opener = FakeOpener {
            federation: Arc::clone(&federation),
        };
        Self {
            manager: ConnectionManager::new(Arc::new(opener), settings.host_suffix.clone()),
            federation,
            namespaces: FakeNamespaces,
            ip_lookup: CountingIpLookup::default(),
            settings,
        }
    }

    pub async fn search(
        &self,
        raw: &str,
        options: &SearchOptions,
    ) -> Result<SearchReport, SearchError> {
        let ctx = SearchContext {
            manager: &self.manager,
            namespaces: &self.namespaces,
            ip_lookup: &self.ip_lookup,
            settings: &self.settings,
        };
        run_search_at(&ctx, raw, options, test_now()).await
    }

    pub fn counter(&self, pick: impl Fn(&FakeFederation) -> &AtomicUsize) -> usize {
        pick(&self.federation).load(Ordering::SeqCst)
    }
}
