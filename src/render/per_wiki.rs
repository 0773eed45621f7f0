//! Results grouped by wiki.

use super::change::ChangeLine;
use super::escape;
use crate::aggregate::WikiSection;
use crate::centralauth::CentralAuthState;
use crate::config::CHANGE_DATE_FORMAT;
use crate::contribs::WikiContributions;
use crate::identity::SearchIdentity;
use crate::wiki::{urlencode_title, WikiDescriptor};

/// Renders one `<div class="wiki">` per section.
pub fn render_grouped(sections: &[WikiSection<'_>], identity: &SearchIdentity) -> String {
    let mut html = String::new();
    for section in sections {
        match section {
            WikiSection::Error { wiki, error } => {
                html.push_str(&format!(
                    "<div class=\"wiki wiki--error\"><h1>{}</h1>{}</div>",
                    escape(wiki.label()),
                    escape(&error.to_string())
                ));
            }
            WikiSection::Contributions {
                wiki,
                contributions,
            } => html.push_str(&render_section(wiki, contributions, identity)),
        }
    }
    html
}

fn render_section(
    wiki: &WikiDescriptor,
    contributions: &WikiContributions,
    identity: &SearchIdentity,
) -> String {
    let class = if contributions.centralauth == CentralAuthState::NoLocalAccount {
        "wiki wiki--noSul"
    } else {
        "wiki"
    };

    let mut info = Vec::new();
    if identity.is_pattern() {
        info.push(matched_users(wiki, contributions));
    } else {
        info.push(user_tools(wiki, identity.normalized()));
        match &contributions.centralauth {
            CentralAuthState::NoLocalAccount => info.push("SUL: Account not attached.".to_string()),
            CentralAuthState::Attached(record) => {
                if let Some(at) = record.attached_at {
                    info.push(format!(
                        "SUL: Account attached at {}",
                        at.format(CHANGE_DATE_FORMAT)
                    ));
                }
            }
            CentralAuthState::NotApplicable => {}
        }
    }

    let lines: String = contributions
        .rows
        .iter()
        .map(|row| ChangeLine::new(wiki, row).to_html(false, identity.is_pattern()))
        .collect();

    format!(
        "<div class=\"{class}\"><h1>{}</h1><p class=\"wiki-info\">{}</p><ul>{lines}</ul></div>",
        escape(wiki.label()),
        info.join(" | ")
    )
}

/// Who a pattern search found on one wiki.
fn matched_users(wiki: &WikiDescriptor, contributions: &WikiContributions) -> String {
    match contributions.matched_users.as_slice() {
        [] => "Multiple users".to_string(),
        [user] => user_tools(wiki, user),
        users => {
            let names: Vec<_> = users.iter().map(|name| escape(name)).collect();
            format!(
                "{}{} users: {}",
                if contributions.has_many_matches {
                    "More than "
                } else {
                    ""
                },
                users.len(),
                names.join(", ")
            )
        }
    }
}

/// Links to the user's pages and logs on one wiki.
pub fn user_tools(wiki: &WikiDescriptor, user: &str) -> String {
    let encoded = urlencode_title(user);
    let links = [
        (
            wiki.page_url(&format!("Special:Contributions/{user}")),
            "Special:Contributions",
            "contribs",
        ),
        (wiki.page_url(&format!("User_talk:{user}")), "", "talk"),
        (
            format!("{}?page=User:{encoded}", wiki.page_url("Special:Log/block")),
            "Special:Log/block",
            "block log",
        ),
        (
            wiki.page_url(&format!("Special:ListFiles/{user}")),
            "Special:ListFiles",
            "uploads",
        ),
        (
            wiki.page_url(&format!("Special:Log/{user}")),
            "Special:Log",
            "logs",
        ),
        (
            format!("{}?wpSearchUser={encoded}", wiki.page_url("Special:AbuseLog")),
            "Edit Filter log for this user",
            "filter log",
        ),
    ];

    let tools: Vec<String> = links
        .iter()
        .map(|(href, title, text)| {
            if title.is_empty() {
                format!("<a href=\"{}\">{text}</a>", escape(href))
            } else {
                format!("<a href=\"{}\" title=\"{title}\">{text}</a>", escape(href))
            }
        })
        .collect();

    format!(
        "For <a href=\"{}\">{}</a> ({})",
        escape(&wiki.page_url(&format!("User:{user}"))),
        escape(user),
        tools.join("&nbsp;| ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::centralauth::AttachmentRecord;
    use crate::contribs::{ContributionRow, RawContribution};
    use crate::error_handling::{DbError, WikiError};
    use crate::timestamp::MwTimestamp;
    use crate::wiki::WikiRow;

    fn wiki() -> WikiDescriptor {
        WikiDescriptor::from_row(&WikiRow {
            dbname: "awiki".to_string(),
            slice: "s1".to_string(),
            family: "wikipedia".to_string(),
            url: "https://a.example.org".to_string(),
        })
    }

    fn contributions(centralauth: CentralAuthState) -> WikiContributions {
        let row = ContributionRow::from_raw(
            RawContribution {
                page_title: "Foo".to_string(),
                page_namespace: 0,
                timestamp: "20230102030405".to_string(),
                is_minor: false,
                length: None,
                revision_id: 1,
                actor_name: "Example".to_string(),
                is_current: false,
                comment_text: None,
            },
            String::new(),
        )
        .unwrap();
        WikiContributions {
            centralauth,
            has_many_matches: false,
            matched_users: Vec::new(),
            rows: vec![row],
        }
    }

    fn pattern_section(matched_users: &[&str], has_many_matches: bool) -> String {
        let identity = SearchIdentity::resolve("Exa", true).unwrap();
        let wiki = wiki();
        let mut contributions = contributions(CentralAuthState::NotApplicable);
        contributions.matched_users = matched_users.iter().map(|s| s.to_string()).collect();
        contributions.has_many_matches = has_many_matches;
        render_grouped(
            &[WikiSection::Contributions {
                wiki: &wiki,
                contributions: &contributions,
            }],
            &identity,
        )
    }

    #[test]
    fn test_pattern_section_with_one_matched_user() {
        let html = pattern_section(&["Example"], false);
        assert!(html.contains(
            "<p class=\"wiki-info\">For <a href=\"https://a.example.org/wiki/User:Example\">Example</a> ("
        ));
        assert!(!html.contains("users:"));
    }

    #[test]
    fn test_pattern_section_lists_matched_users() {
        let html = pattern_section(&["Example", "Exact <b>"], false);
        assert!(html.contains("<p class=\"wiki-info\">2 users: Example, Exact &lt;b&gt;</p>"));
    }

    #[test]
    fn test_pattern_section_with_many_matches() {
        let names: Vec<String> = (0..10).map(|i| format!("Exa{i}")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let html = pattern_section(&names, true);
        assert!(html.contains("<p class=\"wiki-info\">More than 10 users: Exa0, Exa1,"));
        assert!(html.contains("Exa9</p>"));
    }

    #[test]
    fn test_unattached_section() {
        let identity = SearchIdentity::resolve("Example", false).unwrap();
        let wiki = wiki();
        let contributions = contributions(CentralAuthState::NoLocalAccount);
        let html = render_grouped(
            &[WikiSection::Contributions {
                wiki: &wiki,
                contributions: &contributions,
            }],
            &identity,
        );
        assert!(html.starts_with("<div class=\"wiki wiki--noSul\"><h1>a.example.org</h1>"));
        assert!(html.contains("SUL: Account not attached."));
        assert!(html.contains("For <a href=\"https://a.example.org/wiki/User:Example\">Example</a>"));
        assert!(html.contains("Special:Log/block?page=User:Example"));
        assert_eq!(html.matches("<li>").count(), 1);
    }

    #[test]
    fn test_attached_section() {
        let identity = SearchIdentity::resolve("Example", false).unwrap();
        let wiki = wiki();
        let contributions = contributions(CentralAuthState::Attached(AttachmentRecord {
            wiki: "awiki".to_string(),
            local_user_id: 1,
            attached_at: MwTimestamp::parse("20200101120000").ok(),
        }));
        let html = render_grouped(
            &[WikiSection::Contributions {
                wiki: &wiki,
                contributions: &contributions,
            }],
            &identity,
        );
        assert!(html.starts_with("<div class=\"wiki\">"));
        assert!(html.contains("SUL: Account attached at 12:00, 01 Jan 2020"));
    }

    #[test]
    fn test_pattern_section_and_error() {
        let identity = SearchIdentity::resolve("Exa", true).unwrap();
        let wiki = wiki();
        let contributions = contributions(CentralAuthState::NotApplicable);
        let error = WikiError::Database(DbError::Timeout {
            host: "s1.example".to_string(),
        });
        let html = render_grouped(
            &[
                WikiSection::Contributions {
                    wiki: &wiki,
                    contributions: &contributions,
                },
                WikiSection::Error {
                    wiki: &wiki,
                    error: &error,
                },
            ],
            &identity,
        );
        assert!(html.contains("<p class=\"wiki-info\">Multiple users</p>"));
        assert!(html.contains("/wiki/User_talk:Example"));
        assert!(html.contains(
            "<div class=\"wiki wiki--error\"><h1>a.example.org</h1>Database error: Connection to s1.example timed out</div>"
        ));
    }
}
