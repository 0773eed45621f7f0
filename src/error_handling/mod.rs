//! Error handling.
//!
//! Error types are split by blast radius:
//! - **Request-level** (`SearchError`): invalid input or missing infrastructure,
//!   the search fails before or without any partial result
//! - **Per-wiki** (`WikiError`): connection, query or namespace failures captured
//!   in that wiki's outcome
//! - **Supporting** (`DbError`, `NamespaceError`, `DatabaseError`,
//!   `InitializationError`): the building blocks of the above

mod types;

// Re-export public API
pub use types::{
    DatabaseError, DbError, InitializationError, NamespaceError, SearchError, WikiError,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_error_message() {
        let err = DbError::Connect {
            host: "s1.web.db.svc.wikimedia.cloud".to_string(),
            reason: "refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Database error: Unable to connect to s1.web.db.svc.wikimedia.cloud"
        );
    }

    #[test]
    fn test_wiki_error_is_transparent() {
        let err = WikiError::from(NamespaceError::UnknownNamespace {
            id: 3000,
            server: "https://en.wikipedia.org".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Unknown namespace number 3000 for https://en.wikipedia.org"
        );
    }

    #[test]
    fn test_infrastructure_error_message() {
        let err = SearchError::infrastructure(
            "Unable to load the wiki directory",
            DbError::Timeout {
                host: "meta.web.db.svc.wikimedia.cloud".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "Unable to load the wiki directory: Database error: Connection to meta.web.db.svc.wikimedia.cloud timed out"
        );
    }

    #[test]
    fn test_invalid_input_message() {
        let err = SearchError::invalid_input("No username or IP");
        assert_eq!(err.to_string(), "No username or IP");
    }
}
