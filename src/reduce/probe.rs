//! Combined existence probes.
//!
//! Every wiki of a shard gets one `LIMIT 1` sub-query; the sub-queries are
//! joined with `UNION ALL` so a shard costs one round trip however many wikis
//! it hosts.

use crate::config::{Source, MW_RC_EDIT, MW_RC_NEW};
use crate::error_handling::DbError;
use crate::shard::{replica_database, ProbeCriterion, ProbeStatement, SqlParam, WikiProbe};

/// Accumulates the probes of one shard into a single statement.
pub struct ProbeBuilder {
    shard: String,
    parts: Vec<String>,
    params: Vec<SqlParam>,
    probes: Vec<WikiProbe>,
}

impl ProbeBuilder {
    pub fn new(shard: impl Into<String>) -> Self {
        Self {
            shard: shard.into(),
            parts: Vec::new(),
            params: Vec::new(),
            probes: Vec::new(),
        }
    }

    /// Adds one wiki's sub-query.
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidDatabaseName` if the wiki's database name
    /// cannot be used in SQL; the builder is left unchanged.
    pub fn push(&mut self, probe: WikiProbe) -> Result<(), DbError> {
        let database = replica_database(&probe.dbname)?;
        self.params.push(SqlParam::from(probe.dbname.as_str()));

        let part = match &probe.criterion {
            ProbeCriterion::EditCount { user_id } => {
                self.params.push(SqlParam::from(*user_id));
                format!(
                    "(SELECT 1, ? AS dbname FROM `{database}`.user \
                     WHERE user_id = ? AND user_editcount >= 1 LIMIT 1)"
                )
            }
            ProbeCriterion::RecentChange { user_id, since } => {
                self.params.push(SqlParam::from(*user_id));
                let window = self.window(since.as_deref());
                format!(
                    "(SELECT 1, ? AS dbname FROM `{database}`.recentchanges_userindex \
                     JOIN `{database}`.actor_recentchanges ON actor_id = rc_actor \
                     WHERE actor_user = ? AND rc_type IN ({MW_RC_EDIT}, {MW_RC_NEW}){window} \
                     LIMIT 1)"
                )
            }
            ProbeCriterion::Actor {
                matcher,
                source,
                since,
            } => {
                self.params.push(SqlParam::from(matcher.value()));
                let condition = matcher.condition("actor_name");
                match source {
                    Source::All => format!(
                        "(SELECT 1, ? AS dbname FROM `{database}`.revision_userindex \
                         JOIN `{database}`.actor_revision ON actor_id = rev_actor \
                         WHERE {condition} LIMIT 1)"
                    ),
                    Source::Rc | Source::Hr => {
                        let window = self.window(since.as_deref());
                        format!(
                            "(SELECT 1, ? AS dbname FROM `{database}`.recentchanges_userindex \
                             JOIN `{database}`.actor_recentchanges ON actor_id = rc_actor \
                             WHERE {condition} AND rc_type IN ({MW_RC_EDIT}, {MW_RC_NEW}){window} \
                             LIMIT 1)"
                        )
                    }
                }
            }
        };

        self.parts.push(part);
        self.probes.push(probe);
        Ok(())
    }

    /// Binds the last-hour bound, if any, and returns its condition.
    fn window(&mut self, since: Option<&str>) -> &'static str {
        match since {
            Some(since) => {
                self.params.push(SqlParam::from(since));
                " AND rc_timestamp >= ?"
            }
            None => "",
        }
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    pub fn finish(self) -> ProbeStatement {
        ProbeStatement {
            shard: self.shard,
            sql: self.parts.join(" UNION ALL "),
            params: self.params,
            probes: self.probes,
        }
    }
}
