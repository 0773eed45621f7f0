//! Wiki directory entries.
//!
//! A `WikiRow` is what the directory table returns; a `WikiDescriptor` adds the
//! derived display fields used for links and headings.

mod directory;
mod url;

pub use self::directory::{load_wiki_directory, wiki_list_query, DIRECTORY_DATABASE};
pub use self::url::{escape_id, urlencode_title};

use serde::{Deserialize, Serialize};

/// One row of the wiki directory (`meta_p.wiki`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiRow {
    /// Database name, unique across the federation (e.g. `enwiki`)
    pub dbname: String,
    /// Shard (cluster) hosting the database (e.g. `s1`)
    pub slice: String,
    /// Product family (e.g. `wikipedia`)
    pub family: String,
    /// Canonical server, `http://` or `https://`
    pub url: String,
}

/// A federation member, immutable for the lifetime of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiDescriptor {
    pub dbname: String,
    pub shard: String,
    pub family: String,
    /// Server as stored in the directory, used for API calls
    pub canonical_server: String,
    /// Server without scheme, for display
    pub domain: String,
    /// Protocol-relative unless the directory already says https
    pub display_url: String,
}

impl WikiDescriptor {
    pub fn from_row(row: &WikiRow) -> Self {
        let url = row.url.as_str();
        let domain = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(url)
            .to_string();
        let display_url = match url.strip_prefix("http://") {
            Some(rest) => format!("//{rest}"),
            None => url.to_string(),
        };

        Self {
            dbname: row.dbname.clone(),
            shard: row.slice.clone(),
            family: row.family.clone(),
            canonical_server: row.url.clone(),
            domain,
            display_url,
        }
    }

    /// Article URL of a page.
    pub fn page_url(&self, page_name: &str) -> String {
        format!("{}/wiki/{}", self.display_url, urlencode_title(page_name))
    }

    /// `index.php` URL with a raw query string.
    pub fn index_url(&self, query: &str) -> String {
        format!("{}/w/index.php?{}", self.display_url, query)
    }

    /// Label for headings; falls back to the database name.
    pub fn label(&self) -> &str {
        if self.domain.is_empty() {
            &self.dbname
        } else {
            &self.domain
        }
    }
}

impl From<WikiRow> for WikiDescriptor {
    fn from(row: WikiRow) -> Self {
        WikiDescriptor::from_row(&row)
    }
}
