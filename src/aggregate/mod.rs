//! Per-wiki outcomes and the two result views.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::centralauth::CentralAuthState;
use crate::config::IP_HARVEST_LIMIT;
use crate::contribs::{ContributionRow, WikiContributions};
use crate::error_handling::WikiError;
use crate::identity::{is_valid_ip, SearchIdentity};
use crate::wiki::WikiDescriptor;

/// Result of one candidate wiki.
#[derive(Debug)]
pub enum WikiOutcome {
    Contributions(WikiContributions),
    Failed(WikiError),
}

impl From<Result<WikiContributions, WikiError>> for WikiOutcome {
    fn from(result: Result<WikiContributions, WikiError>) -> Self {
        match result {
            Ok(contributions) => WikiOutcome::Contributions(contributions),
            Err(error) => WikiOutcome::Failed(error),
        }
    }
}

#[derive(Debug)]
struct WikiResult {
    wiki: WikiDescriptor,
    outcome: WikiOutcome,
}

/// A section of the grouped view.
#[derive(Debug)]
pub enum WikiSection<'a> {
    Contributions {
        wiki: &'a WikiDescriptor,
        contributions: &'a WikiContributions,
    },
    Error {
        wiki: &'a WikiDescriptor,
        error: &'a WikiError,
    },
}

/// One row of the chronological view, with the wiki it came from.
#[derive(Debug, Clone, Copy)]
pub struct DatedRow<'a> {
    pub wiki: &'a WikiDescriptor,
    pub centralauth: &'a CentralAuthState,
    pub row: &'a ContributionRow,
}

/// Consecutive rows of one UTC day; `date` is `None` for `infinity`.
#[derive(Debug)]
pub struct DayGroup<'a> {
    pub date: Option<NaiveDate>,
    pub rows: Vec<DatedRow<'a>>,
}

/// All rows newest first, grouped by day, plus the failed wikis.
#[derive(Debug)]
pub struct ChronologicalView<'a> {
    pub days: Vec<DayGroup<'a>>,
    pub errors: Vec<(&'a WikiDescriptor, &'a WikiError)>,
}

/// Collects per-wiki outcomes in fetch order.
///
/// In pattern searches, IP addresses among the actors of wikis without a
/// registry record are harvested for enrichment, at most
/// `IP_HARVEST_LIMIT` for the whole request.
#[derive(Debug)]
pub struct ResultAggregator {
    harvest_ips: bool,
    results: Vec<WikiResult>,
    ips: Vec<String>,
    seen_ips: HashSet<String>,
    integrity_violations: usize,
}

impl ResultAggregator {
    pub fn new(identity: &SearchIdentity) -> Self {
        Self {
            harvest_ips: identity.is_pattern(),
            results: Vec::new(),
            ips: Vec::new(),
            seen_ips: HashSet::new(),
            integrity_violations: 0,
        }
    }

    /// Adds the outcome of `wiki`.
    ///
    /// A successful outcome without rows means the candidate reduction and
    /// the fetch disagree; it is logged, counted and left out of both views.
    pub fn push(&mut self, wiki: WikiDescriptor, outcome: WikiOutcome) {
        if let WikiOutcome::Contributions(contributions) = &outcome {
            if contributions.rows.is_empty() {
                log::error!(
                    "{} was a candidate but returned no contributions",
                    wiki.dbname
                );
                self.integrity_violations += 1;
                return;
            }
            if self.harvest_ips && contributions.centralauth.record().is_none() {
                self.harvest(&contributions.rows);
            }
        }
        self.results.push(WikiResult { wiki, outcome });
    }

    fn harvest(&mut self, rows: &[ContributionRow]) {
        for row in rows {
            if !is_valid_ip(&row.actor_name) || !self.seen_ips.insert(row.actor_name.clone()) {
                continue;
            }
            if self.ips.len() < IP_HARVEST_LIMIT {
                self.ips.push(row.actor_name.clone());
            } else {
                log::debug!("IP harvest limit reached, skipping {}", row.actor_name);
            }
        }
    }

    /// Distinct IP addresses to enrich, in order of discovery.
    pub fn harvested_ips(&self) -> &[String] {
        &self.ips
    }

    /// Distinct IP addresses seen but not harvested because of the limit.
    pub fn skipped_ips(&self) -> usize {
        self.seen_ips.len() - self.ips.len()
    }

    pub fn integrity_violations(&self) -> usize {
        self.integrity_violations
    }

    /// Wikis with at least one row.
    pub fn result_wikis(&self) -> usize {
        self.contributions().count()
    }

    pub fn failed_wikis(&self) -> usize {
        self.results.len() - self.result_wikis()
    }

    pub fn total_rows(&self) -> usize {
        self.contributions().map(|(_, c)| c.rows.len()).sum()
    }

    fn contributions(&self) -> impl Iterator<Item = (&WikiDescriptor, &WikiContributions)> {
        self.results.iter().filter_map(|result| match &result.outcome {
            WikiOutcome::Contributions(c) => Some((&result.wiki, c)),
            WikiOutcome::Failed(_) => None,
        })
    }

    fn errors(&self) -> impl Iterator<Item = (&WikiDescriptor, &WikiError)> {
        self.results.iter().filter_map(|result| match &result.outcome {
            WikiOutcome::Failed(e) => Some((&result.wiki, e)),
            WikiOutcome::Contributions(_) => None,
        })
    }

    /// One section per wiki, in fetch order; rows keep their fetched order.
    pub fn grouped_view(&self) -> Vec<WikiSection<'_>> {
        self.results
            .iter()
            .map(|result| match &result.outcome {
                WikiOutcome::Contributions(contributions) => WikiSection::Contributions {
                    wiki: &result.wiki,
                    contributions,
                },
                WikiOutcome::Failed(error) => WikiSection::Error {
                    wiki: &result.wiki,
                    error,
                },
            })
            .collect()
    }

    /// Every row, newest first, in runs of the same UTC date.
    pub fn chronological_view(&self) -> ChronologicalView<'_> {
        let mut rows: Vec<DatedRow<'_>> = self
            .contributions()
            .flat_map(|(wiki, contributions)| {
                contributions.rows.iter().map(move |row| DatedRow {
                    wiki,
                    centralauth: &contributions.centralauth,
                    row,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.row.timestamp.cmp(&a.row.timestamp));

        let mut days: Vec<DayGroup<'_>> = Vec::new();
        for row in rows {
            let date = row.row.timestamp.date();
            match days.last_mut() {
                Some(day) if day.date == date => day.rows.push(row),
                _ => days.push(DayGroup {
                    date,
                    rows: vec![row],
                }),
            }
        }

        ChronologicalView {
            days,
            errors: self.errors().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contribs::RawContribution;
    use crate::error_handling::DbError;
    use crate::wiki::WikiRow;

    fn wiki(dbname: &str) -> WikiDescriptor {
        WikiDescriptor::from_row(&WikiRow {
            dbname: dbname.to_string(),
            slice: "s1".to_string(),
            family: "wikipedia".to_string(),
            url: format!("https://{dbname}.example.org"),
        })
    }

    fn row(timestamp: &str, actor: &str) -> ContributionRow {
        ContributionRow::from_raw(
            RawContribution {
                page_title: format!("Page_{timestamp}"),
                page_namespace: 0,
                timestamp: timestamp.to_string(),
                is_minor: false,
                length: Some(10),
                revision_id: 1,
                actor_name: actor.to_string(),
                is_current: false,
                comment_text: None,
            },
            String::new(),
        )
        .unwrap()
    }

    fn contributions(rows: Vec<ContributionRow>) -> WikiOutcome {
        WikiOutcome::Contributions(WikiContributions {
            centralauth: CentralAuthState::NotApplicable,
            has_many_matches: false,
            matched_users: Vec::new(),
            rows,
        })
    }

    fn failure() -> WikiOutcome {
        WikiOutcome::Failed(WikiError::Database(DbError::InvalidCluster(String::new())))
    }

    fn identity(pattern: bool) -> SearchIdentity {
        SearchIdentity::resolve("192.0.2", pattern).unwrap()
    }

    #[test]
    fn test_grouped_view_keeps_order_and_errors() {
        let mut aggregator = ResultAggregator::new(&identity(false));
        aggregator.push(
            wiki("x"),
            contributions(vec![row("20230102000000", "A"), row("20230101000000", "A")]),
        );
        aggregator.push(wiki("y"), failure());

        let view = aggregator.grouped_view();
        assert_eq!(view.len(), 2);
        match &view[0] {
            WikiSection::Contributions {
                wiki,
                contributions,
            } => {
                assert_eq!(wiki.dbname, "x");
                let stamps: Vec<String> = contributions
                    .rows
                    .iter()
                    .map(|r| r.timestamp.to_string())
                    .collect();
                assert_eq!(stamps, vec!["20230102000000", "20230101000000"]);
            }
            other => panic!("unexpected section {other:?}"),
        }
        assert!(matches!(&view[1], WikiSection::Error { wiki, .. } if wiki.dbname == "y"));
        assert_eq!(aggregator.result_wikis(), 1);
        assert_eq!(aggregator.failed_wikis(), 1);
    }

    #[test]
    fn test_chronological_view_groups_by_day() {
        let mut aggregator = ResultAggregator::new(&identity(false));
        aggregator.push(wiki("a"), contributions(vec![row("20230101000000", "A")]));
        aggregator.push(
            wiki("b"),
            contributions(vec![row("20230102000000", "A"), row("20230101120000", "A")]),
        );
        aggregator.push(wiki("c"), failure());

        let view = aggregator.chronological_view();
        let order: Vec<String> = view
            .days
            .iter()
            .flat_map(|d| d.rows.iter().map(|r| r.row.timestamp.to_string()))
            .collect();
        assert_eq!(
            order,
            vec!["20230102000000", "20230101120000", "20230101000000"]
        );
        let dates: Vec<_> = view.days.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2023, 1, 2),
                NaiveDate::from_ymd_opt(2023, 1, 1)
            ]
        );
        assert_eq!(view.errors.len(), 1);
        assert_eq!(view.errors[0].0.dbname, "c");
    }

    #[test]
    fn test_empty_success_is_an_integrity_violation() {
        let mut aggregator = ResultAggregator::new(&identity(false));
        aggregator.push(wiki("a"), contributions(Vec::new()));

        assert_eq!(aggregator.integrity_violations(), 1);
        assert!(aggregator.grouped_view().is_empty());
        assert!(aggregator.chronological_view().days.is_empty());
        assert_eq!(aggregator.total_rows(), 0);
    }

    #[test]
    fn test_ip_harvest_is_capped_per_request() {
        let mut aggregator = ResultAggregator::new(&identity(true));
        for w in 0..3 {
            let rows = (0..5)
                .map(|i| row("20230101000000", &format!("192.0.2.{}", w * 5 + i)))
                .collect();
            aggregator.push(wiki(&format!("w{w}")), contributions(rows));
        }

        assert_eq!(aggregator.harvested_ips().len(), 10);
        assert_eq!(aggregator.skipped_ips(), 5);
        assert_eq!(aggregator.harvested_ips()[0], "192.0.2.0");
    }

    #[test]
    fn test_harvest_skips_names_duplicates_and_exact_searches() {
        let mut aggregator = ResultAggregator::new(&identity(true));
        aggregator.push(
            wiki("a"),
            contributions(vec![
                row("20230101000000", "192.0.2.1"),
                row("20230101000000", "192.0.2.1"),
                row("20230101000000", "Example"),
            ]),
        );
        assert_eq!(aggregator.harvested_ips(), ["192.0.2.1".to_string()]);

        let mut exact = ResultAggregator::new(&identity(false));
        exact.push(wiki("a"), contributions(vec![row("20230101000000", "192.0.2.1")]));
        assert!(exact.harvested_ips().is_empty());
    }
}
