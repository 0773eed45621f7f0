//! MySQL replica connections.
//!
//! Replica tables store names and titles as binary strings, so text columns
//! are read as bytes and decoded lossily. Numeric columns are cast to
//! `SIGNED` in the statements, which makes them all decode as `i64`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::query::Query;
use sqlx::{ConnectOptions, Row};
use tokio::sync::Mutex;

use super::query::{
    AttachmentQuery, ContributionQuery, LocalUser, ProbeStatement, SqlParam, UserMatchQuery,
    WikiListQuery,
};
use super::{ConnectionOpener, ReplicaConnection};
use crate::centralauth::AttachmentRecord;
use crate::config::DB_CONNECT_TIMEOUT_SECS;
use crate::contribs::RawContribution;
use crate::error_handling::DbError;
use crate::ipinfo::resolve_host_to_ip;
use crate::timestamp::MwTimestamp;
use crate::wiki::WikiRow;

const MYSQL_PORT: u16 = 3306;

const HEARTBEAT_LAG_SQL: &str =
    "SELECT CAST(lag AS SIGNED) AS lag FROM heartbeat WHERE shard = ? LIMIT 1";

/// Replica account credentials.
#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Opens MySQL connections, resolving host names through DNS.
pub struct MySqlOpener {
    resolver: Arc<TokioAsyncResolver>,
    credentials: Credentials,
    connect_timeout: Duration,
}

impl MySqlOpener {
    pub fn new(resolver: Arc<TokioAsyncResolver>, credentials: Credentials) -> Self {
        Self {
            resolver,
            credentials,
            connect_timeout: Duration::from_secs(DB_CONNECT_TIMEOUT_SECS),
        }
    }
}

#[async_trait]
impl ConnectionOpener for MySqlOpener {
    async fn resolve_host(&self, host: &str) -> Option<String> {
        match resolve_host_to_ip(host, &self.resolver).await {
            Ok(address) => Some(address),
            Err(e) => {
                log::debug!("Could not resolve {host}: {e}");
                None
            }
        }
    }

    async fn open(
        &self,
        host: &str,
        database: Option<&str>,
    ) -> Result<Arc<dyn ReplicaConnection>, DbError> {
        let mut options = MySqlConnectOptions::new()
            .host(host)
            .port(MYSQL_PORT)
            .username(&self.credentials.user)
            .password(&self.credentials.password)
            .charset("utf8mb4")
            .log_statements(log::LevelFilter::Trace);
        if let Some(database) = database {
            options = options.database(database);
        }

        let connection = match tokio::time::timeout(self.connect_timeout, options.connect()).await
        {
            Ok(Ok(connection)) => connection,
            Ok(Err(e)) => {
                log::warn!("Unable to connect to {host}: {e}");
                return Err(DbError::Connect {
                    host: host.to_string(),
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                log::warn!("Connection to {host} timed out");
                return Err(DbError::Timeout {
                    host: host.to_string(),
                });
            }
        };

        Ok(Arc::new(MySqlReplica {
            host: host.to_string(),
            connection: Mutex::new(connection),
        }))
    }
}

/// One MySQL connection, used by one statement at a time.
pub struct MySqlReplica {
    host: String,
    connection: Mutex<MySqlConnection>,
}

impl MySqlReplica {
    async fn fetch_all(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<MySqlRow>, DbError> {
        log::debug!("[{}] {}", self.host, sql);
        let mut connection = self.connection.lock().await;
        let rows = bind_all(sql, params).fetch_all(&mut *connection).await?;
        Ok(rows)
    }
}

fn bind_all<'q>(sql: &'q str, params: &'q [SqlParam]) -> Query<'q, MySql, MySqlArguments> {
    params
        .iter()
        .fold(sqlx::query(sql), |query, param| match param {
            SqlParam::Text(value) => query.bind(value.as_str()),
            SqlParam::Int(value) => query.bind(*value),
        })
}

fn text(row: &MySqlRow, column: &str) -> Result<String, sqlx::Error> {
    let bytes: Vec<u8> = row.try_get(column)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn optional_text(row: &MySqlRow, column: &str) -> Result<Option<String>, sqlx::Error> {
    let bytes: Option<Vec<u8>> = row.try_get(column)?;
    Ok(bytes.map(|b| String::from_utf8_lossy(&b).into_owned()))
}

fn unsigned(row: &MySqlRow, column: &str) -> Result<u32, sqlx::Error> {
    let value: i64 = row.try_get(column)?;
    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn namespace_id(value: i64) -> Result<i32, sqlx::Error> {
    i32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: "page_namespace".to_string(),
        source: Box::new(e),
    })
}

#[async_trait]
impl ReplicaConnection for MySqlReplica {
    async fn select_database(&self, database: &str) -> Result<(), DbError> {
        // USE is not available as a prepared statement
        let sql = format!("USE `{database}`");
        log::debug!("[{}] {}", self.host, sql);
        let mut connection = self.connection.lock().await;
        sqlx::Executor::execute(&mut *connection, sql.as_str()).await?;
        Ok(())
    }

    async fn fetch_wikis(&self, query: &WikiListQuery) -> Result<Vec<WikiRow>, DbError> {
        let rows = self.fetch_all(&query.sql, &[]).await?;
        let wikis = rows
            .iter()
            .map(|row| {
                Ok(WikiRow {
                    dbname: text(row, "dbname")?,
                    slice: text(row, "slice")?,
                    family: text(row, "family")?,
                    url: text(row, "url")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;
        Ok(wikis)
    }

    async fn fetch_attachments(
        &self,
        query: &AttachmentQuery,
    ) -> Result<Vec<AttachmentRecord>, DbError> {
        let params = [SqlParam::from(query.name.as_str())];
        let rows = self.fetch_all(&query.sql, &params).await?;
        let records = rows
            .iter()
            .map(|row| {
                let attached_at = optional_text(row, "lu_attached_timestamp")?
                    .and_then(|raw| MwTimestamp::parse(&raw).ok());
                Ok(AttachmentRecord {
                    wiki: text(row, "lu_wiki")?,
                    local_user_id: unsigned(row, "lu_local_id")?,
                    attached_at,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;
        Ok(records)
    }

    async fn probe(&self, statement: &ProbeStatement) -> Result<Vec<String>, DbError> {
        let rows = self.fetch_all(&statement.sql, &statement.params).await?;
        let matched = rows
            .iter()
            .map(|row| text(row, "dbname"))
            .collect::<Result<Vec<_>, sqlx::Error>>()?;
        Ok(matched)
    }

    async fn match_users(&self, query: &UserMatchQuery) -> Result<Vec<LocalUser>, DbError> {
        let params = [SqlParam::from(query.matcher.value())];
        let rows = self.fetch_all(&query.sql, &params).await?;
        let users = rows
            .iter()
            .map(|row| {
                Ok(LocalUser {
                    id: unsigned(row, "user_id")?,
                    name: text(row, "user_name")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;
        Ok(users)
    }

    async fn fetch_contributions(
        &self,
        query: &ContributionQuery,
    ) -> Result<Vec<RawContribution>, DbError> {
        let rows = self.fetch_all(&query.sql, &query.params).await?;
        let contributions = rows
            .iter()
            .map(|row| {
                let namespace: i64 = row.try_get("page_namespace")?;
                let page_namespace = namespace_id(namespace)?;
                let minor: i64 = row.try_get("rev_minor_edit")?;
                let current: i64 = row.try_get("guc_is_cur")?;
                Ok(RawContribution {
                    page_title: text(row, "page_title")?,
                    page_namespace,
                    timestamp: text(row, "rev_timestamp")?,
                    is_minor: minor != 0,
                    length: row.try_get("rev_len")?,
                    revision_id: row.try_get("rev_id")?,
                    actor_name: text(row, "actor_name")?,
                    is_current: current != 0,
                    comment_text: optional_text(row, "comment_text")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;
        Ok(contributions)
    }

    async fn replication_lag(&self, shard: &str) -> Result<Option<i64>, DbError> {
        let params = [SqlParam::from(shard)];
        let rows = self.fetch_all(HEARTBEAT_LAG_SQL, &params).await?;
        match rows.first() {
            Some(row) => Ok(row.try_get::<Option<i64>, _>("lag")?),
            None => Ok(None),
        }
    }
}
