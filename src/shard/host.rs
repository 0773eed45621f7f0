//! Replica host names.

use crate::config::LEGACY_HOST_SUFFIX;
use crate::error_handling::DbError;

/// Turns a cluster name into the host name to connect to.
///
/// - `s1` → `s1.<suffix>`
/// - `s1.labsdb` → `s1.<suffix>` (legacy directory entries)
/// - `db.example` → `db.example` (already a host name)
///
/// # Errors
///
/// Returns `DbError::InvalidCluster` for empty names or names with whitespace.
pub fn normalize_host(cluster: &str, suffix: &str) -> Result<String, DbError> {
    if cluster.is_empty() || cluster.chars().any(char::is_whitespace) {
        return Err(DbError::InvalidCluster(cluster.to_string()));
    }
    if !cluster.contains('.') {
        return Ok(format!("{cluster}.{suffix}"));
    }
    let legacy = format!(".{LEGACY_HOST_SUFFIX}");
    match cluster.strip_suffix(&legacy) {
        Some(bare) => Ok(format!("{bare}.{suffix}")),
        None => Ok(cluster.to_string()),
    }
}

/// Database name of a wiki's public replica views (`enwiki` → `enwiki_p`).
///
/// # Errors
///
/// Returns `DbError::InvalidDatabaseName` unless the name is a plain
/// identifier, since it is interpolated into SQL.
pub fn replica_database(dbname: &str) -> Result<String, DbError> {
    if is_safe_identifier(dbname) {
        Ok(format!("{dbname}_p"))
    } else {
        Err(DbError::InvalidDatabaseName(dbname.to_string()))
    }
}

fn is_safe_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUFFIX: &str = "web.db.svc.wikimedia.cloud";

    #[test]
    fn test_bare_cluster_is_expanded() {
        assert_eq!(
            normalize_host("eg1", SUFFIX).unwrap(),
            "eg1.web.db.svc.wikimedia.cloud"
        );
    }

    #[test]
    fn test_full_host_is_kept() {
        assert_eq!(normalize_host("eg1.example", SUFFIX).unwrap(), "eg1.example");
    }

    #[test]
    fn test_legacy_suffix_is_rewritten() {
        assert_eq!(
            normalize_host("s3.labsdb", SUFFIX).unwrap(),
            "s3.web.db.svc.wikimedia.cloud"
        );
    }

    #[test]
    fn test_invalid_clusters() {
        for cluster in ["", " ", "s1 s2"] {
            assert!(matches!(
                normalize_host(cluster, SUFFIX),
                Err(DbError::InvalidCluster(_))
            ));
        }
    }

    #[test]
    fn test_replica_database() {
        assert_eq!(replica_database("testwiki").unwrap(), "testwiki_p");
        assert!(replica_database("bad`name").is_err());
        assert!(replica_database("").is_err());
    }
}
