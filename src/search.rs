//! One search request, end to end.
//!
//! Identity → wiki directory → attachment registry → candidate reduction →
//! per-wiki contributions → IP enrichment. Connections are closed when the
//! request ends, whether it succeeded or not.

use chrono::{DateTime, Utc};

use crate::aggregate::{ResultAggregator, WikiOutcome};
use crate::centralauth::load_attachments;
use crate::config::{SearchOptions, Settings};
use crate::contribs::ContributionFetcher;
use crate::error_handling::SearchError;
use crate::identity::SearchIdentity;
use crate::ipinfo::{enrich_ips, IpInfo, IpLookup};
use crate::namespace::NamespaceNames;
use crate::reduce::{reduce_wikis, ReductionReport, ReductionRequest};
use crate::render::SearchStatistics;
use crate::shard::{ConnectionManager, ConnectionStats};
use crate::trace::DebugTrace;
use crate::wiki::load_wiki_directory;

/// Collaborators of a search.
pub struct SearchContext<'a> {
    pub manager: &'a ConnectionManager,
    pub namespaces: &'a dyn NamespaceNames,
    pub ip_lookup: &'a dyn IpLookup,
    pub settings: &'a Settings,
}

/// Everything a finished search produced.
#[derive(Debug)]
pub struct SearchReport {
    pub identity: SearchIdentity,
    pub options: SearchOptions,
    /// Wikis in the directory
    pub wikis_searched: usize,
    pub reduction: ReductionReport,
    pub results: ResultAggregator,
    pub ip_infos: Vec<IpInfo>,
    pub connections: ConnectionStats,
    pub trace: DebugTrace,
}

impl SearchReport {
    pub fn statistics(&self) -> SearchStatistics {
        SearchStatistics {
            wikis_searched: self.wikis_searched,
            result_wikis: self.results.result_wikis(),
            failed_wikis: self.results.failed_wikis(),
            total_edits: self.results.total_rows(),
        }
    }
}

/// Runs a search for `raw` as of now.
///
/// # Errors
///
/// Returns `SearchError::InvalidInput` for a malformed query and
/// `SearchError::Infrastructure` when the wiki directory or the attachment
/// registry is unavailable. Failures of individual wikis are part of the report.
pub async fn run_search(
    ctx: &SearchContext<'_>,
    raw: &str,
    options: &SearchOptions,
) -> Result<SearchReport, SearchError> {
    run_search_at(ctx, raw, options, Utc::now()).await
}

/// Like `run_search`, with an explicit reference time for the last-hour window.
pub async fn run_search_at(
    ctx: &SearchContext<'_>,
    raw: &str,
    options: &SearchOptions,
    now: DateTime<Utc>,
) -> Result<SearchReport, SearchError> {
    let result = search(ctx, raw, options, now).await;
    ctx.manager.close_all().await;

    let mut report = result?;
    report.connections = ctx.manager.stats().await;
    report.trace.add("Closed all connections");
    Ok(report)
}

async fn search(
    ctx: &SearchContext<'_>,
    raw: &str,
    options: &SearchOptions,
    now: DateTime<Utc>,
) -> Result<SearchReport, SearchError> {
    let mut trace = DebugTrace::new();

    let identity = SearchIdentity::resolve(raw, options.is_prefix_pattern)?;
    trace.add(format!(
        "Searching {:?} {:?} in {} mode",
        identity.kind(),
        identity.normalized(),
        options.src
    ));

    let wikis = load_wiki_directory(ctx.manager, ctx.settings, options.include_closed_wikis)
        .await
        .map_err(|e| SearchError::infrastructure("Unable to load the wiki directory", e))?;
    trace.add(format!("Loaded {} wiki(s) from the directory", wikis.len()));

    let attachments = load_attachments(ctx.manager, ctx.settings, &identity)
        .await
        .map_err(|e| SearchError::infrastructure("Unable to query the account registry", e))?;
    if identity.uses_registry() {
        trace.add(format!("Registry lists {} local account(s)", attachments.len()));
    }

    let reduction = reduce_wikis(
        ctx.manager,
        &ReductionRequest {
            wikis: &wikis,
            identity: &identity,
            attachments: &attachments,
            src: options.src,
            max_wikis_per_probe: ctx.settings.max_wikis_per_probe,
            now,
        },
    )
    .await;
    trace.add(format!(
        "Reduced to {} candidate wiki(s) with {} statement(s), {} failure(s)",
        reduction.wikis.len(),
        reduction.report.statements,
        reduction.report.failures.len()
    ));

    let fetcher = ContributionFetcher {
        manager: ctx.manager,
        namespaces: ctx.namespaces,
        identity: &identity,
        src: options.src,
        now,
    };
    let mut results = ResultAggregator::new(&identity);
    for wiki in reduction.wikis {
        let centralauth = attachments.state_for(&wiki.dbname);
        let outcome = WikiOutcome::from(fetcher.fetch(&wiki, centralauth).await);
        if let WikiOutcome::Failed(e) = &outcome {
            log::warn!("Failed to fetch contributions from {}: {e}", wiki.dbname);
        }
        results.push(wiki, outcome);
    }
    trace.add(format!(
        "Fetched {} edit(s) from {} wiki(s), {} failed",
        results.total_rows(),
        results.result_wikis(),
        results.failed_wikis()
    ));

    let ips = if identity.is_ip() {
        vec![identity.normalized().to_string()]
    } else {
        results.harvested_ips().to_vec()
    };
    let ip_infos = enrich_ips(ctx.ip_lookup, &ips).await;
    if !ips.is_empty() {
        trace.add(format!(
            "Looked up {} IP address(es), skipped {}",
            ips.len(),
            results.skipped_ips()
        ));
    }

    Ok(SearchReport {
        identity,
        options: options.clone(),
        wikis_searched: wikis.len(),
        reduction: reduction.report,
        results,
        ip_infos,
        connections: ConnectionStats::default(),
        trace,
    })
}
