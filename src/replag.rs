//! Replication lag of the wiki replicas.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::HEARTBEAT_DATABASE;
use crate::shard::ConnectionManager;

/// Lag per shard, in seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplagReport {
    /// Shard → lag; `None` when the heartbeat table has no row for it
    pub lag: BTreeMap<String, Option<i64>>,
    /// Shards whose lag could not be read
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, String>,
    /// Highest lag, if any shard lags
    pub max_lag: Option<i64>,
    pub lagged: bool,
}

/// Reads the heartbeat lag of every shard in `shards`.
///
/// A shard that cannot be reached is listed under `errors`; the others are
/// still reported.
pub async fn check_replag(manager: &ConnectionManager, shards: &[&str]) -> ReplagReport {
    let mut report = ReplagReport::default();

    for shard in shards {
        let result = match manager.get(shard, Some(HEARTBEAT_DATABASE)).await {
            Ok(connection) => connection.replication_lag(shard).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(lag) => {
                report.lag.insert((*shard).to_string(), lag);
            }
            Err(e) => {
                log::warn!("Unable to read replication lag of {shard}: {e}");
                report.errors.insert((*shard).to_string(), e.to_string());
            }
        }
    }
    manager.close_all().await;

    report.max_lag = report.lag.values().flatten().copied().max().filter(|max| *max > 0);
    report.lagged = report.max_lag.is_some();
    report
}
