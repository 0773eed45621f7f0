//! Loading the wiki directory.

use crate::config::Settings;
use crate::error_handling::DbError;
use crate::shard::{ConnectionManager, WikiListQuery};

use super::WikiDescriptor;

/// Database holding the `wiki` table.
pub const DIRECTORY_DATABASE: &str = "meta";

/// Builds the directory query.
pub fn wiki_list_query(include_closed: bool, limit: usize) -> WikiListQuery {
    let filter = if include_closed {
        ""
    } else {
        " WHERE is_closed = 0"
    };
    WikiListQuery {
        sql: format!("SELECT dbname, slice, family, url FROM wiki{filter} LIMIT {limit}"),
        include_closed,
        limit,
    }
}

/// Reads every open wiki (or every wiki, with `include_closed`) in directory order.
///
/// # Errors
///
/// Returns `DbError` if the directory cluster cannot be reached or queried.
pub async fn load_wiki_directory(
    manager: &ConnectionManager,
    settings: &Settings,
    include_closed: bool,
) -> Result<Vec<WikiDescriptor>, DbError> {
    let query = wiki_list_query(include_closed, settings.wiki_list_limit);
    let cluster = settings.meta_cluster.as_str();

    let result = match manager.get(cluster, Some(DIRECTORY_DATABASE)).await {
        Ok(connection) => connection.fetch_wikis(&query).await,
        Err(e) => Err(e),
    };
    manager.close(cluster).await;

    let rows = result?;
    if rows.len() >= query.limit {
        log::warn!("Wiki directory truncated at {} rows", query.limit);
    }
    Ok(rows.iter().map(WikiDescriptor::from_row).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_wikis_only_by_default() {
        let query = wiki_list_query(false, 1500);
        assert_eq!(
            query.sql,
            "SELECT dbname, slice, family, url FROM wiki WHERE is_closed = 0 LIMIT 1500"
        );
        assert!(!query.include_closed);
    }

    #[test]
    fn test_include_closed_drops_filter() {
        let query = wiki_list_query(true, 10);
        assert_eq!(query.sql, "SELECT dbname, slice, family, url FROM wiki LIMIT 10");
        assert_eq!(query.limit, 10);
    }
}
