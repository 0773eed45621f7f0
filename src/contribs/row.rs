//! Contribution rows.

use serde::Serialize;

use crate::timestamp::{InvalidTimestamp, MwTimestamp};

/// A contribution as read from the replica, before decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContribution {
    /// Title without namespace, with underscores
    pub page_title: String,
    pub page_namespace: i32,
    /// 14-digit timestamp or `infinity`
    pub timestamp: String,
    pub is_minor: bool,
    pub length: Option<i64>,
    pub revision_id: i64,
    pub actor_name: String,
    pub is_current: bool,
    pub comment_text: Option<String>,
}

/// One edit, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributionRow {
    /// Title without namespace, as stored (underscores)
    pub page_title: String,
    pub namespace_id: i32,
    /// Local namespace name, empty for the main namespace
    pub namespace_name: String,
    /// `Namespace:Title` with spaces
    pub full_page_name: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: MwTimestamp,
    pub is_minor: bool,
    pub length: Option<i64>,
    pub revision_id: i64,
    /// Actor name with spaces
    pub actor_name: String,
    pub is_current_revision: bool,
    /// Raw wikitext comment
    pub comment_text: Option<String>,
}

fn serialize_timestamp<S: serde::Serializer>(
    timestamp: &MwTimestamp,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(timestamp)
}

impl ContributionRow {
    /// Decorates a raw row with its namespace name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTimestamp` if the row's timestamp is malformed.
    pub fn from_raw(raw: RawContribution, namespace_name: String) -> Result<Self, InvalidTimestamp> {
        let timestamp = MwTimestamp::parse(&raw.timestamp)?;
        let full_page_name = full_page_name(&namespace_name, &raw.page_title);
        Ok(Self {
            page_title: raw.page_title,
            namespace_id: raw.page_namespace,
            namespace_name,
            full_page_name,
            timestamp,
            is_minor: raw.is_minor,
            length: raw.length,
            revision_id: raw.revision_id,
            actor_name: raw.actor_name.replace('_', " "),
            is_current_revision: raw.is_current,
            comment_text: raw.comment_text,
        })
    }
}

/// `Talk` + `Foo_bar` → `Talk:Foo bar`; main namespace titles stay bare.
pub fn full_page_name(namespace_name: &str, title: &str) -> String {
    let name = if namespace_name.is_empty() {
        title.to_string()
    } else {
        format!("{namespace_name}:{title}")
    };
    name.replace('_', " ")
}
