//! Request-scoped connection manager.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use super::host::{normalize_host, replica_database};
use super::{ConnectionOpener, ReplicaConnection};
use crate::error_handling::DbError;

/// Connection counters of one manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionStats {
    /// Connections opened so far
    pub opened: usize,
    /// Highest number of connections open at the same time
    pub max_concurrent: usize,
}

#[derive(Default)]
struct State {
    /// host name → resolved address
    addresses: HashMap<String, String>,
    /// address → host names currently using its connection
    in_use: HashMap<String, HashSet<String>>,
    /// address → open connection
    connections: HashMap<String, Arc<dyn ReplicaConnection>>,
    stats: ConnectionStats,
}

/// Hands out one connection per resolved replica address.
///
/// Several cluster names may resolve to the same address; they share one
/// connection, and closing one of them keeps the connection open for the rest.
pub struct ConnectionManager {
    opener: Arc<dyn ConnectionOpener>,
    host_suffix: String,
    state: Mutex<State>,
}

impl ConnectionManager {
    pub fn new(opener: Arc<dyn ConnectionOpener>, host_suffix: impl Into<String>) -> Self {
        Self {
            opener,
            host_suffix: host_suffix.into(),
            state: Mutex::new(State::default()),
        }
    }

    /// Returns the connection for `cluster`, opening it on first use.
    ///
    /// When `dbname` is given, the connection's default database is switched
    /// to that wiki's replica database (`<dbname>_p`).
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the cluster or database name is invalid, or the
    /// connection cannot be opened or switched.
    pub async fn get(
        &self,
        cluster: &str,
        dbname: Option<&str>,
    ) -> Result<Arc<dyn ReplicaConnection>, DbError> {
        let host = normalize_host(cluster, &self.host_suffix)?;
        let database = dbname.map(replica_database).transpose()?;

        let mut state = self.state.lock().await;

        let address = match state.addresses.get(&host) {
            Some(address) => address.clone(),
            None => {
                // Unresolvable names are still tried by name
                let address = self
                    .opener
                    .resolve_host(&host)
                    .await
                    .unwrap_or_else(|| host.clone());
                state.addresses.insert(host.clone(), address.clone());
                address
            }
        };

        if let Some(connection) = state.connections.get(&address).cloned() {
            if let Some(database) = &database {
                connection.select_database(database).await?;
            }
            state.in_use.entry(address).or_default().insert(host);
            return Ok(connection);
        }

        log::debug!("Connecting to {host} ({address})");
        let connection = self.opener.open(&host, database.as_deref()).await?;
        state.connections.insert(address.clone(), Arc::clone(&connection));
        state.in_use.entry(address).or_default().insert(host);
        state.stats.opened += 1;
        state.stats.max_concurrent = state.stats.max_concurrent.max(state.connections.len());

        Ok(connection)
    }

    /// Releases `cluster`'s use of its connection.
    ///
    /// The connection is closed once no other cluster name uses its address.
    /// Unknown or already closed clusters are ignored.
    pub async fn close(&self, cluster: &str) {
        let Ok(host) = normalize_host(cluster, &self.host_suffix) else {
            return;
        };
        let mut state = self.state.lock().await;
        let Some(address) = state.addresses.get(&host).cloned() else {
            return;
        };

        let now_unused = match state.in_use.get_mut(&address) {
            Some(hosts) => {
                hosts.remove(&host);
                hosts.is_empty()
            }
            None => true,
        };
        if now_unused {
            state.in_use.remove(&address);
            if state.connections.remove(&address).is_some() {
                log::debug!("Closed connection to {address} ({host})");
            }
        }
    }

    /// Closes every connection. Safe to call any number of times.
    pub async fn close_all(&self) {
        let mut state = self.state.lock().await;
        let count = state.connections.len();
        state.connections.clear();
        state.in_use.clear();
        if count > 0 {
            log::debug!("Closed {count} remaining connection(s)");
        }
    }

    /// Number of connections currently open.
    pub async fn open_connections(&self) -> usize {
        self.state.lock().await.connections.len()
    }

    pub async fn stats(&self) -> ConnectionStats {
        self.state.lock().await.stats
    }
}
