//! Contribution and user match statements.
//!
//! Statements run against the wiki's replica database, selected beforehand
//! with `USE`, so table names are unqualified.

use crate::config::{Source, CONTRIB_LIMIT, MW_RC_EDIT, MW_RC_NEW, USER_MATCH_LIMIT};
use crate::shard::{ActorFilter, ActorMatch, ContributionQuery, SqlParam, UserMatchQuery};

/// Local accounts matching `matcher`, one more than the match limit.
pub fn user_match_query(dbname: &str, matcher: ActorMatch) -> UserMatchQuery {
    let limit = USER_MATCH_LIMIT + 1;
    let sql = format!(
        "SELECT CAST(user_id AS SIGNED) AS user_id, user_name FROM user WHERE {} LIMIT {limit}",
        matcher.condition("user_name")
    );
    UserMatchQuery {
        dbname: dbname.to_string(),
        sql,
        matcher,
        limit,
    }
}

/// The contributions query of one wiki.
///
/// `since` is only used by the recent changes sources. Recent changes are
/// always matched by name, `actor_user` is not indexed there.
pub fn contribution_query(
    dbname: &str,
    src: Source,
    filter: ActorFilter,
    since: Option<String>,
) -> ContributionQuery {
    let mut params: Vec<SqlParam> = Vec::new();
    let condition = match &filter {
        ActorFilter::UserIds(ids) => {
            params.extend(ids.iter().map(|id| SqlParam::from(*id)));
            let placeholders = vec!["?"; ids.len()].join(", ");
            format!("actor_user IN ({placeholders})")
        }
        ActorFilter::Name(matcher) => {
            params.push(SqlParam::from(matcher.value()));
            matcher.condition("actor_name")
        }
    };

    let since = if src.is_recent_changes() { since } else { None };
    let sql = match src {
        Source::All => format!(
            "SELECT page_title, CAST(page_namespace AS SIGNED) AS page_namespace, \
             rev_timestamp, CAST(rev_minor_edit AS SIGNED) AS rev_minor_edit, \
             CAST(rev_len AS SIGNED) AS rev_len, CAST(rev_id AS SIGNED) AS rev_id, \
             actor_name, CAST(page_latest = rev_id AS SIGNED) AS guc_is_cur, comment_text \
             FROM revision_userindex \
             JOIN actor_revision ON actor_id = rev_actor \
             JOIN page ON page_id = rev_page \
             LEFT JOIN comment_revision ON comment_id = rev_comment_id \
             WHERE rev_deleted = 0 AND {condition} \
             ORDER BY rev_timestamp DESC LIMIT {CONTRIB_LIMIT}"
        ),
        Source::Rc | Source::Hr => {
            let mut window = String::new();
            if let Some(since) = &since {
                params.push(SqlParam::from(since.as_str()));
                window.push_str(" AND rc_timestamp >= ?");
            }
            format!(
                "SELECT rc_title AS page_title, CAST(rc_namespace AS SIGNED) AS page_namespace, \
                 rc_timestamp AS rev_timestamp, CAST(rc_minor AS SIGNED) AS rev_minor_edit, \
                 CAST(rc_new_len AS SIGNED) AS rev_len, CAST(rc_this_oldid AS SIGNED) AS rev_id, \
                 actor_name, CAST(0 AS SIGNED) AS guc_is_cur, comment_text \
                 FROM recentchanges_userindex \
                 JOIN actor_recentchanges ON actor_id = rc_actor \
                 LEFT JOIN comment_rc ON comment_id = rc_comment_id \
                 WHERE rc_deleted = 0 AND rc_type IN ({MW_RC_EDIT}, {MW_RC_NEW}) \
                 AND {condition}{window} \
                 ORDER BY rc_timestamp DESC LIMIT {CONTRIB_LIMIT}"
            )
        }
    };

    ContributionQuery {
        dbname: dbname.to_string(),
        sql,
        params,
        source: src,
        filter,
        since,
        limit: CONTRIB_LIMIT,
    }
}
