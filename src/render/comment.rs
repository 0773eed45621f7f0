//! Edit summary formatting.
//!
//! Summaries are plain wikitext. Two constructs are rendered:
//!
//! - `/* Section */ rest`: a link to the section plus an autocomment span
//! - `[[Target|text]]trail`: a link to the target page

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::escape;
use crate::wiki::{escape_id, urlencode_title};

static AUTOCOMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/\*\s*(.*?)\s*\*/").unwrap_or_else(|e| panic!("invalid autocomment regex: {e}"))
});

static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[:?([^\]|]+)(?:\|((?:\]?[^\]|])*))*\]\]([^\[]*)")
        .unwrap_or_else(|e| panic!("invalid link regex: {e}"))
});

static SECTION_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ _]+").unwrap_or_else(|e| panic!("invalid regex: {e}")));

/// Left-to-right mark placed after the section arrow
const LRM: char = '\u{200E}';

/// Renders an edit summary of `page` as HTML.
///
/// `server` is the wiki's display URL; links point to its `index.php`.
pub fn render_comment(raw: &str, page: &str, server: &str) -> String {
    let text = raw.replace('\n', " ");
    let decoded = html_escape::decode_html_entities(&text);
    let escaped = escape(&decoded).into_owned();

    let with_sections = format_autocomments(&escaped, page, server);
    format_links(&with_sections, server)
}

fn format_autocomments(comment: &str, page: &str, server: &str) -> String {
    let mut out = String::with_capacity(comment.len());
    let mut last = 0;
    let mut open_spans = 0;

    for caps in AUTOCOMMENT.captures_iter(comment) {
        let Some(whole) = caps.get(0) else { continue };
        let mut auto = caps.get(1).map_or("", |m| m.as_str()).to_string();

        let section = auto.replace("[[:", "").replace("[[", "").replace("]]", "");
        let section = SECTION_SPACE.replace_all(&section, " ");
        let target = format!(
            "{server}/w/index.php?title={}#{}",
            urlencode_title(page),
            escape_id(section.trim())
        );

        // Text follows the autocomment
        if whole.end() < comment.len() {
            auto.push_str(":&#32;");
        }

        out.push_str(&comment[last..whole.start()]);
        out.push_str(&format!(
            "<a href=\"{}\">→</a>{LRM}<span dir=\"auto\"><span class=\"autocomment\">{auto}</span>",
            escape(&target)
        ));
        open_spans += 1;
        last = whole.end();
    }

    out.push_str(&comment[last..]);
    for _ in 0..open_spans {
        out.push_str("</span>");
    }
    out
}

fn format_links(comment: &str, server: &str) -> String {
    LINK.replace_all(comment, |caps: &Captures<'_>| {
        let target = caps.get(1).map_or("", |m| m.as_str());
        let text = caps
            .get(2)
            .map(|m| m.as_str())
            .filter(|text| !text.is_empty())
            .unwrap_or(target);
        let trail = caps.get(3).map_or("", |m| m.as_str());

        // The comment is already escaped; the URL needs the raw title.
        let title = html_escape::decode_html_entities(target);
        let href = format!("{server}/w/index.php?title={}", urlencode_title(&title));
        format!("<a href=\"{}\">{text}</a>{trail}", escape(&href))
    })
    .into_owned()
}
