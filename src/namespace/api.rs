//! Site-info API client.

use std::collections::HashMap;

use serde_json::Value;

use crate::config::NAMESPACE_API_TIMEOUT;
use crate::error_handling::NamespaceError;

/// `api.php` endpoint of a wiki server.
pub fn api_url(server: &str) -> String {
    let server = server.trim_end_matches('/');
    if server.starts_with("//") {
        format!("https:{server}/w/api.php")
    } else {
        format!("{server}/w/api.php")
    }
}

/// Fetches every namespace name of the wiki at `server`.
///
/// # Errors
///
/// Returns `NamespaceError::Api` if the request fails, or
/// `NamespaceError::MalformedResponse` if the answer has no namespace list.
pub async fn fetch_namespaces(
    client: &reqwest::Client,
    server: &str,
) -> Result<HashMap<i32, String>, NamespaceError> {
    let url = api_url(server);
    log::debug!("Fetching namespaces from {url}");

    let api_error = |source| NamespaceError::Api {
        server: server.to_string(),
        source,
    };
    let response = client
        .post(&url)
        .form(&[
            ("action", "query"),
            ("meta", "siteinfo"),
            ("siprop", "namespaces"),
            ("format", "json"),
        ])
        .timeout(NAMESPACE_API_TIMEOUT)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(api_error)?;
    let body: Value = response.json().await.map_err(api_error)?;

    parse_namespaces(&body).ok_or_else(|| NamespaceError::MalformedResponse {
        server: server.to_string(),
    })
}

/// Reads `query.namespaces` of a site-info response.
///
/// Entries are keyed by namespace id; the name is in `*` (or `name` in newer
/// response formats).
pub fn parse_namespaces(body: &Value) -> Option<HashMap<i32, String>> {
    let entries = body.get("query")?.get("namespaces")?.as_object()?;
    let mut names = HashMap::with_capacity(entries.len());
    for (key, entry) in entries {
        let id = match entry.get("id").and_then(Value::as_i64) {
            Some(id) => i32::try_from(id).ok()?,
            None => key.parse().ok()?,
        };
        let name = entry
            .get("*")
            .or_else(|| entry.get("name"))
            .and_then(Value::as_str)?;
        names.insert(id, name.to_string());
    }
    Some(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_url() {
        assert_eq!(api_url("https://a.example.org"), "https://a.example.org/w/api.php");
        assert_eq!(api_url("http://a.example.org/"), "http://a.example.org/w/api.php");
        assert_eq!(api_url("//a.example.org"), "https://a.example.org/w/api.php");
    }

    #[test]
    fn test_parse_namespaces() {
        let body = json!({
            "batchcomplete": "",
            "query": {"namespaces": {
                "-1": {"id": -1, "case": "first-letter", "*": "Special"},
                "0": {"id": 0, "case": "first-letter", "content": "", "*": ""},
                "1": {"id": 1, "case": "first-letter", "subpages": "", "*": "Talk"}
            }}
        });
        let names = parse_namespaces(&body).unwrap();
        assert_eq!(names.len(), 3);
        assert_eq!(names[&-1], "Special");
        assert_eq!(names[&0], "");
        assert_eq!(names[&1], "Talk");
    }

    #[test]
    fn test_parse_formatversion_2() {
        let body = json!({"query": {"namespaces": {"4": {"id": 4, "name": "Project"}}}});
        assert_eq!(parse_namespaces(&body).unwrap()[&4], "Project");
    }

    #[test]
    fn test_parse_rejects_missing_list() {
        assert!(parse_namespaces(&json!({"error": {"code": "x"}})).is_none());
        assert!(parse_namespaces(&json!({"query": {}})).is_none());
    }
}
