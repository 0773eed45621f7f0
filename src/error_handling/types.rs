//! Error type definitions.
//!
//! This module defines the error types of every layer, from process
//! initialization down to a single wiki's contribution query.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error opening the namespace cache storage.
    #[error("Storage initialization error: {0}")]
    StorageError(#[from] DatabaseError),
}

/// Error types for the local SQLite storage (namespace cache).
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Error types for wiki replica connections and queries.
#[derive(Error, Debug)]
pub enum DbError {
    /// The cluster name is empty or otherwise unusable.
    #[error("Invalid DB cluster name: {0:?}")]
    InvalidCluster(String),

    /// A database name that cannot be safely used as an identifier.
    #[error("Invalid database name: {0:?}")]
    InvalidDatabaseName(String),

    /// Could not connect to a replica host.
    #[error("Database error: Unable to connect to {host}")]
    Connect {
        /// Host name the connection was attempted for
        host: String,
        /// Driver-level reason
        reason: String,
    },

    /// Connecting took longer than the configured timeout.
    #[error("Database error: Connection to {host} timed out")]
    Timeout {
        /// Host name the connection was attempted for
        host: String,
    },

    /// Statement execution or row decoding failed.
    #[error("Database error: {0}")]
    Query(#[from] sqlx::Error),
}

/// Error types for namespace name resolution.
#[derive(Error, Debug)]
pub enum NamespaceError {
    /// The site-info API request failed.
    #[error("Unable to retrieve namespaces from {server}: {source}")]
    Api {
        /// Canonical server of the wiki
        server: String,
        /// Underlying HTTP error
        #[source]
        source: ReqwestError,
    },

    /// The API answered, but without a namespace list.
    #[error("Unable to retrieve namespaces from {server}")]
    MalformedResponse {
        /// Canonical server of the wiki
        server: String,
    },

    /// The namespace id is not known to the wiki, even after a refresh.
    #[error("Unknown namespace number {id} for {server}")]
    UnknownNamespace {
        /// Namespace id from the contribution row
        id: i32,
        /// Canonical server of the wiki
        server: String,
    },

    /// Reading or writing the persisted cache failed.
    #[error("Namespace cache error: {0}")]
    Storage(#[from] DatabaseError),
}

/// Failure scoped to one wiki. Captured in that wiki's outcome, never fatal to a search.
#[derive(Error, Debug)]
pub enum WikiError {
    /// Connection or query failure.
    #[error(transparent)]
    Database(#[from] DbError),

    /// Namespace names could not be resolved.
    #[error(transparent)]
    Namespace(#[from] NamespaceError),
}

/// Request-level failures. Everything else is contained per wiki.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Malformed search identity; no wiki is queried.
    #[error("{0}")]
    InvalidInput(String),

    /// A collaborator every search depends on is unavailable.
    #[error("{what}: {source}")]
    Infrastructure {
        /// What the search was trying to do
        what: &'static str,
        /// Underlying database error
        #[source]
        source: DbError,
    },
}

impl SearchError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        SearchError::InvalidInput(message.into())
    }

    pub(crate) fn infrastructure(what: &'static str, source: DbError) -> Self {
        SearchError::Infrastructure { what, source }
    }
}
