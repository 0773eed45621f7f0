//! Two-level namespace name cache: memory in front of SQLite, filled from
//! the site-info API on a miss.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::api::fetch_namespaces;
use super::NamespaceNames;
use crate::error_handling::NamespaceError;
use crate::storage::NamespaceStore;
use crate::wiki::WikiDescriptor;

#[derive(Default)]
struct Memory {
    wikis: HashMap<String, HashMap<i32, String>>,
    /// Wikis already refreshed from the API by this cache
    refreshed: HashSet<String>,
}

/// Namespace names backed by a persisted store.
pub struct NamespaceCache {
    client: Arc<reqwest::Client>,
    store: NamespaceStore,
    memory: Mutex<Memory>,
}

impl NamespaceCache {
    pub fn new(client: Arc<reqwest::Client>, store: NamespaceStore) -> Self {
        Self {
            client,
            store,
            memory: Mutex::new(Memory::default()),
        }
    }
}

#[async_trait]
impl NamespaceNames for NamespaceCache {
    async fn namespace_name(
        &self,
        wiki: &WikiDescriptor,
        namespace_id: i32,
    ) -> Result<String, NamespaceError> {
        let mut memory = self.memory.lock().await;

        if !memory.wikis.contains_key(&wiki.dbname) {
            let stored = self.store.load_wiki(&wiki.dbname).await?;
            if !stored.is_empty() {
                memory.wikis.insert(wiki.dbname.clone(), stored);
            }
        }
        if let Some(name) = memory
            .wikis
            .get(&wiki.dbname)
            .and_then(|names| names.get(&namespace_id))
        {
            return Ok(name.clone());
        }

        // At most one refresh per wiki; namespaces do not appear that often.
        if !memory.refreshed.contains(&wiki.dbname) {
            let names = fetch_namespaces(&self.client, &wiki.canonical_server).await?;
            memory.refreshed.insert(wiki.dbname.clone());
            log::debug!(
                "Cached {} namespace name(s) of {}",
                names.len(),
                wiki.dbname
            );
            self.store.put_wiki(&wiki.dbname, &names).await?;
            memory.wikis.insert(wiki.dbname.clone(), names);
        }

        memory
            .wikis
            .get(&wiki.dbname)
            .and_then(|names| names.get(&namespace_id))
            .cloned()
            .ok_or_else(|| NamespaceError::UnknownNamespace {
                id: namespace_id,
                server: wiki.canonical_server.clone(),
            })
    }
}
