//! The statistics line.

use serde::Serialize;

/// Counters of one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStatistics {
    /// Wikis in the directory
    pub wikis_searched: usize,
    /// Wikis with at least one row
    pub result_wikis: usize,
    /// Wikis whose fetch failed
    pub failed_wikis: usize,
    pub total_edits: usize,
}

pub fn render_statistics(stats: &SearchStatistics) -> String {
    let mut line = format!(
        "{} wikis searched. {} edits found",
        stats.wikis_searched, stats.total_edits
    );
    if stats.result_wikis > 0 {
        line.push_str(&format!(" in {} projects", stats.result_wikis));
    }
    format!("<p class=\"statistics\">{line}.</p>")
}
