//! Candidate wiki reduction.
//!
//! Before any contributions query runs, the wiki directory is narrowed down to
//! the wikis that have at least one matching edit:
//!
//! - Registry path: the name has local accounts; probe their edit counts.
//! - Probe path: IP addresses, patterns and unknown names; probe the
//!   revision or recent changes tables directly.
//!
//! Either way one statement is sent per shard, not per wiki.

mod probe;

pub use probe::ProbeBuilder;

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::centralauth::Attachments;
use crate::config::Source;
use crate::identity::SearchIdentity;
use crate::shard::{ActorMatch, ConnectionManager, ProbeCriterion, WikiProbe};
use crate::timestamp::last_hour_cutoff;
use crate::wiki::WikiDescriptor;

/// How the candidates were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionPath {
    /// Edit counts of registry-known local accounts
    Registry,
    /// Existence probes on revisions or recent changes
    Probe,
}

/// A shard (or part of one) whose probe could not be run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShardFailure {
    pub shard: String,
    /// Wikis left out because of the failure
    pub wikis: usize,
    pub error: String,
}

/// Diagnostics of one reduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReductionReport {
    pub path: ReductionPath,
    /// Wikis probed
    pub probed: usize,
    /// Statements sent
    pub statements: usize,
    pub failures: Vec<ShardFailure>,
}

/// Candidate wikis, in directory order.
#[derive(Debug, Clone)]
pub struct Reduction {
    pub wikis: Vec<WikiDescriptor>,
    pub report: ReductionReport,
}

/// Inputs of one reduction.
pub struct ReductionRequest<'a> {
    pub wikis: &'a [WikiDescriptor],
    pub identity: &'a SearchIdentity,
    pub attachments: &'a Attachments,
    pub src: Source,
    /// Cap on sub-queries per statement
    pub max_wikis_per_probe: usize,
    /// Reference time for the last-hour window
    pub now: DateTime<Utc>,
}

/// Returns the wikis worth a full contributions query.
///
/// Shards that cannot be probed contribute no candidates; the failure is
/// logged and listed in the report, the reduction itself never fails.
pub async fn reduce_wikis(manager: &ConnectionManager, request: &ReductionRequest<'_>) -> Reduction {
    let (path, probes) = plan_probes(request);
    let mut report = ReductionReport {
        path,
        probed: probes.iter().map(|(_, p)| p.len()).sum(),
        statements: 0,
        failures: Vec::new(),
    };

    let mut matched: HashSet<String> = HashSet::new();
    let chunk_size = request.max_wikis_per_probe.max(1);

    for (shard, shard_probes) in probes {
        for chunk in shard_probes.chunks(chunk_size) {
            let mut builder = ProbeBuilder::new(shard.as_str());
            for probe in chunk {
                if let Err(e) = builder.push(probe.clone()) {
                    log::warn!("Skipping {} in probe of {shard}: {e}", probe.dbname);
                    report.failures.push(ShardFailure {
                        shard: shard.clone(),
                        wikis: 1,
                        error: e.to_string(),
                    });
                }
            }
            if builder.is_empty() {
                continue;
            }
            let size = builder.len();
            let statement = builder.finish();
            report.statements += 1;

            let result = match manager.get(&shard, None).await {
                Ok(connection) => connection.probe(&statement).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(dbnames) => matched.extend(dbnames),
                Err(e) => {
                    log::warn!("Probe of shard {shard} failed, skipping {size} wiki(s): {e}");
                    report.failures.push(ShardFailure {
                        shard: shard.clone(),
                        wikis: size,
                        error: e.to_string(),
                    });
                }
            }
        }
    }

    let wikis: Vec<WikiDescriptor> = request
        .wikis
        .iter()
        .filter(|wiki| matched.contains(&wiki.dbname))
        .cloned()
        .collect();

    log::debug!(
        "Reduced {} wiki(s) to {} candidate(s) via {:?} path in {} statement(s)",
        request.wikis.len(),
        wikis.len(),
        report.path,
        report.statements
    );

    Reduction { wikis, report }
}

/// Builds the per-wiki probes, grouped by shard in order of first appearance.
fn plan_probes(request: &ReductionRequest<'_>) -> (ReductionPath, Vec<(String, Vec<WikiProbe>)>) {
    let mut groups: Vec<(String, Vec<WikiProbe>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut add = |shard: &str, probe: WikiProbe| {
        let at = *index.entry(shard.to_string()).or_insert_with(|| {
            groups.push((shard.to_string(), Vec::new()));
            groups.len() - 1
        });
        groups[at].1.push(probe);
    };

    let since = (request.src == Source::Hr).then(|| last_hour_cutoff(request.now));

    // Preferred whenever the registry knows any local account, even if none
    // of those wikis turns out to have edits.
    if request.attachments.has_records() {
        for wiki in request.wikis {
            if let Some(record) = request.attachments.record(&wiki.dbname) {
                let user_id = record.local_user_id;
                let criterion = if request.src.is_recent_changes() {
                    ProbeCriterion::RecentChange {
                        user_id,
                        since: since.clone(),
                    }
                } else {
                    ProbeCriterion::EditCount { user_id }
                };
                add(
                    &wiki.shard,
                    WikiProbe {
                        dbname: wiki.dbname.clone(),
                        criterion,
                    },
                );
            }
        }
        return (ReductionPath::Registry, groups);
    }

    let matcher = actor_matcher(request.identity);
    for wiki in request.wikis {
        add(
            &wiki.shard,
            WikiProbe {
                dbname: wiki.dbname.clone(),
                criterion: ProbeCriterion::Actor {
                    matcher: matcher.clone(),
                    source: request.src,
                    since: since.clone(),
                },
            },
        );
    }
    (ReductionPath::Probe, groups)
}

/// Name matching for an identity: `LIKE` for patterns, equality otherwise.
pub fn actor_matcher(identity: &SearchIdentity) -> ActorMatch {
    if identity.is_pattern() {
        ActorMatch::Like(identity.normalized().to_string())
    } else {
        ActorMatch::Exact(identity.normalized().to_string())
    }
}
