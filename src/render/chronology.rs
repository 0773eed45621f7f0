//! Results merged across wikis, newest first.

use super::change::ChangeLine;
use super::escape;
use crate::aggregate::ChronologicalView;
use crate::config::DAY_HEADING_FORMAT;

/// Renders the failed wikis, then one `<h2>` and `<ul>` per day.
pub fn render_chronological(view: &ChronologicalView<'_>) -> String {
    let mut html = String::new();

    for (wiki, error) in &view.errors {
        html.push_str(&format!(
            "<div class=\"error\"><p><strong>{}</strong><br/>{}</p></div>",
            escape(wiki.label()),
            escape(&error.to_string())
        ));
    }

    for day in &view.days {
        let heading = match day.date {
            Some(date) => date.format(DAY_HEADING_FORMAT).to_string(),
            None => "infinity".to_string(),
        };
        html.push_str(&format!("<h2>{heading}</h2>\n\n<ul>\n"));
        for dated in &day.rows {
            html.push_str(&ChangeLine::new(dated.wiki, dated.row).to_html(true, true));
            html.push('\n');
        }
        html.push_str("</ul>\n");
    }

    html
}
