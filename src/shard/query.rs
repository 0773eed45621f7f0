//! Statements sent to wiki replicas.
//!
//! Each statement carries its SQL text and bound parameters for the MySQL
//! driver, plus a structured description of what it asks for. The description
//! is what log lines and in-memory replicas work from.

use crate::config::Source;

/// A bound statement parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<u32> for SqlParam {
    fn from(value: u32) -> Self {
        SqlParam::Int(i64::from(value))
    }
}

/// How an actor name is matched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActorMatch {
    /// `actor_name = ?`
    Exact(String),
    /// `actor_name LIKE ?`, the pattern includes its `%` wildcards
    Like(String),
}

impl ActorMatch {
    /// The value bound to the placeholder.
    pub fn value(&self) -> &str {
        match self {
            ActorMatch::Exact(value) | ActorMatch::Like(value) => value,
        }
    }

    /// SQL condition for `column`, with one placeholder.
    pub fn condition(&self, column: &str) -> String {
        match self {
            ActorMatch::Exact(_) => format!("{column} = ?"),
            ActorMatch::Like(_) => format!("{column} LIKE ?"),
        }
    }

    /// Evaluates the match in memory, with `%` as the only wildcard.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            ActorMatch::Exact(expected) => expected == name,
            ActorMatch::Like(pattern) => like_matches(pattern, name),
        }
    }
}

fn like_matches(pattern: &str, name: &str) -> bool {
    let mut pieces = pattern.split('%');
    let first = pieces.next().unwrap_or_default();
    let Some(mut rest) = name.strip_prefix(first) else {
        return false;
    };
    let pieces: Vec<&str> = pieces.collect();
    let Some((last, middle)) = pieces.split_last() else {
        // No wildcard at all
        return rest.is_empty();
    };
    for piece in middle {
        match rest.find(piece) {
            Some(at) => rest = &rest[at + piece.len()..],
            None => return false,
        }
    }
    rest.ends_with(last)
}

/// Read the wiki directory.
#[derive(Debug, Clone)]
pub struct WikiListQuery {
    pub sql: String,
    pub include_closed: bool,
    pub limit: usize,
}

/// Read the attachment registry for one exact name.
#[derive(Debug, Clone)]
pub struct AttachmentQuery {
    pub sql: String,
    pub name: String,
}

/// What one wiki's sub-query inside a probe statement checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeCriterion {
    /// The local account has at least one edit (`user_editcount >= 1`)
    EditCount { user_id: u32 },
    /// The local account has a recent change (`actor_user = ?`)
    RecentChange {
        user_id: u32,
        /// Lower timestamp bound (last-hour window)
        since: Option<String>,
    },
    /// At least one revision or recent change by a matching actor
    Actor {
        matcher: ActorMatch,
        source: Source,
        /// Lower timestamp bound (last-hour window)
        since: Option<String>,
    },
}

/// One wiki's part of a probe statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiProbe {
    pub dbname: String,
    pub criterion: ProbeCriterion,
}

/// Existence probes for many wikis of one shard, combined with UNION ALL.
///
/// The statement returns one row per wiki that has a match, carrying the
/// wiki's database name.
#[derive(Debug, Clone)]
pub struct ProbeStatement {
    pub shard: String,
    pub sql: String,
    pub params: Vec<SqlParam>,
    pub probes: Vec<WikiProbe>,
}

/// Find local accounts by exact name or prefix.
#[derive(Debug, Clone)]
pub struct UserMatchQuery {
    pub dbname: String,
    pub sql: String,
    pub matcher: ActorMatch,
    /// Row cap; one more than the match limit, to detect overflow
    pub limit: usize,
}

/// A local account found by `UserMatchQuery`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalUser {
    pub id: u32,
    pub name: String,
}

/// Whose contributions a query selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActorFilter {
    /// `actor_user IN (...)`, uses the user id index
    UserIds(Vec<u32>),
    /// Name-text matching, uses the actor name index
    Name(ActorMatch),
}

/// The full contributions query of one wiki.
#[derive(Debug, Clone)]
pub struct ContributionQuery {
    pub dbname: String,
    pub sql: String,
    pub params: Vec<SqlParam>,
    pub source: Source,
    pub filter: ActorFilter,
    pub since: Option<String>,
    pub limit: usize,
}
