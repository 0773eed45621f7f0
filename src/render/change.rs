//! One contribution as a list item.

use super::{comment::render_comment, escape};
use crate::config::CHANGE_DATE_FORMAT;
use crate::contribs::ContributionRow;
use crate::wiki::{urlencode_title, WikiDescriptor};

/// The pieces of a change line, joined with non-breaking spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeLine {
    pub diff_hist: String,
    pub date: String,
    /// Wiki label, for lists mixing several wikis
    pub wiki: String,
    /// Actor with links, for lists mixing several users
    pub user: String,
    pub minor: Option<String>,
    pub page: String,
    pub comment: Option<String>,
    pub current: Option<String>,
}

impl ChangeLine {
    pub fn new(wiki: &WikiDescriptor, row: &ContributionRow) -> Self {
        let title = urlencode_title(&row.full_page_name);
        let diff = wiki.index_url(&format!(
            "title={title}&diff=prev&oldid={}",
            row.revision_id
        ));
        let history = wiki.index_url(&format!("title={title}&action=history"));
        let diff_hist = format!(
            "(<a href=\"{}\">diff</a>&nbsp;|&nbsp;<a href=\"{}\">hist</a>)",
            escape(&diff),
            escape(&history)
        );

        let actor = &row.actor_name;
        let user = format!(
            "<a href=\"{}\">{}</a>&nbsp;(<a href=\"{}\">talk</a>&nbsp;| \
             <a href=\"{}\" title=\"Special:Contributions\">contribs</a>)&nbsp;. .",
            escape(&wiki.page_url(&format!("User:{actor}"))),
            escape(actor),
            escape(&wiki.page_url(&format!("User_talk:{actor}"))),
            escape(&wiki.page_url(&format!("Special:Contributions/{actor}"))),
        );

        let page = format!(
            "<a href=\"{}\">{}</a>",
            escape(&wiki.page_url(&row.full_page_name)),
            escape(&row.full_page_name)
        );

        let comment = row
            .comment_text
            .as_deref()
            .filter(|text| !text.is_empty())
            .map(|text| {
                format!(
                    "<span class=\"comment\">({})</span>",
                    render_comment(text, &row.full_page_name, &wiki.display_url)
                )
            });

        Self {
            diff_hist,
            date: row.timestamp.format(CHANGE_DATE_FORMAT),
            wiki: format!(". .&nbsp;{}&nbsp;. .", escape(wiki.label())),
            user,
            minor: row
                .is_minor
                .then(|| "<span class=\"minor\">m</span>".to_string()),
            page,
            comment,
            current: row
                .is_current_revision
                .then(|| "<span class=\"rev_cur\">(current)</span>".to_string()),
        }
    }

    /// `<li>` element, optionally with the wiki label and the user links.
    pub fn to_html(&self, with_wiki: bool, with_user: bool) -> String {
        let mut chunks: Vec<&str> = vec![self.diff_hist.as_str(), self.date.as_str()];
        if with_wiki {
            chunks.push(&self.wiki);
        }
        if with_user {
            chunks.push(&self.user);
        }
        chunks.extend(self.minor.as_deref());
        chunks.push(&self.page);
        chunks.extend(self.comment.as_deref());
        chunks.extend(self.current.as_deref());
        format!("<li>{}</li>", chunks.join("&nbsp;"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contribs::RawContribution;
    use crate::wiki::WikiRow;

    fn wiki() -> WikiDescriptor {
        WikiDescriptor::from_row(&WikiRow {
            dbname: "awiki".to_string(),
            slice: "s1".to_string(),
            family: "wikipedia".to_string(),
            url: "http://a.example.org".to_string(),
        })
    }

    fn row(minor: bool, current: bool, comment: Option<&str>) -> ContributionRow {
        ContributionRow::from_raw(
            RawContribution {
                page_title: "Foo_bar".to_string(),
                page_namespace: 1,
                timestamp: "20230102030405".to_string(),
                is_minor: minor,
                length: Some(5),
                revision_id: 1234,
                actor_name: "192.0.2.1".to_string(),
                is_current: current,
                comment_text: comment.map(str::to_string),
            },
            "Talk".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_links_and_date() {
        let line = ChangeLine::new(&wiki(), &row(false, false, None));
        assert_eq!(
            line.diff_hist,
            "(<a href=\"//a.example.org/w/index.php?title=Talk:Foo_bar&amp;diff=prev&amp;oldid=1234\">diff</a>\
             &nbsp;|&nbsp;<a href=\"//a.example.org/w/index.php?title=Talk:Foo_bar&amp;action=history\">hist</a>)"
        );
        assert_eq!(line.date, "03:04, 02 Jan 2023");
        assert_eq!(
            line.page,
            "<a href=\"//a.example.org/wiki/Talk:Foo_bar\">Talk:Foo bar</a>"
        );
        assert_eq!(line.wiki, ". .&nbsp;a.example.org&nbsp;. .");
    }

    #[test]
    fn test_optional_chunks() {
        let plain = ChangeLine::new(&wiki(), &row(false, false, Some(""))).to_html(false, false);
        assert!(!plain.contains("minor"));
        assert!(!plain.contains("comment"));
        assert!(!plain.contains("(current)"));
        assert!(!plain.contains("User:192.0.2.1"));

        let full = ChangeLine::new(&wiki(), &row(true, true, Some("hello"))).to_html(true, true);
        assert!(full.starts_with("<li>(<a"));
        assert!(full.contains("<span class=\"minor\">m</span>"));
        assert!(full.contains("<span class=\"comment\">(hello)</span>"));
        assert!(full.ends_with("<span class=\"rev_cur\">(current)</span></li>"));
        assert!(full.contains("/wiki/User:192.0.2.1"));
        assert!(full.contains(". .&nbsp;a.example.org&nbsp;. ."));
    }
}
