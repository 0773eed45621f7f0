//! HTML fragments for search results.
//!
//! Everything here is pure: rendering reads a finished `SearchReport` and
//! never touches a database.

mod change;
mod chronology;
mod comment;
mod ip_table;
mod per_wiki;
mod stats;

pub use change::ChangeLine;
pub use chronology::render_chronological;
pub use comment::render_comment;
pub use ip_table::render_ip_table;
pub use per_wiki::{render_grouped, user_tools};
pub use stats::{render_statistics, SearchStatistics};

use std::borrow::Cow;

use crate::config::{GroupBy, CONTRIB_LIMIT};
use crate::search::SearchReport;

/// Escapes text for element content and quoted attributes.
pub(crate) fn escape(text: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(text)
}

/// Renders a complete result fragment in the report's grouping.
pub fn render_report(report: &SearchReport) -> String {
    let permalink = report.options.permalink(Some(report.identity.raw().trim()));
    let mut html = format!(
        "<p class=\"permalink\"><a href=\"{}\">Permalink</a></p>\n",
        escape(&permalink)
    );
    html.push_str(&render_statistics(&report.statistics()));
    html.push_str("\n<div class=\"results\">\n");
    html.push_str(&render_ip_table(&report.ip_infos));
    match report.options.by {
        GroupBy::Wiki => html.push_str(&render_grouped(
            &report.results.grouped_view(),
            &report.identity,
        )),
        GroupBy::Date => {
            html.push_str(&render_chronological(&report.results.chronological_view()))
        }
    }
    html.push_str("\n</div>\n");
    html.push_str(&format!(
        "<p class=\"limit-note\">At most {CONTRIB_LIMIT} edits are shown per wiki.</p>\n"
    ));
    html
}
