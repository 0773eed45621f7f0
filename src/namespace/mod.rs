//! Namespace display names.
//!
//! Contribution rows carry a namespace id; the local name (`Talk`,
//! `Diskussion`, ...) is looked up per wiki.

mod api;
mod cache;

pub use api::{api_url, fetch_namespaces, parse_namespaces};
pub use cache::NamespaceCache;

use async_trait::async_trait;

use crate::error_handling::NamespaceError;
use crate::wiki::WikiDescriptor;

/// Source of namespace names.
#[async_trait]
pub trait NamespaceNames: Send + Sync {
    /// Local name of namespace `namespace_id` on `wiki`, empty for the main
    /// namespace.
    ///
    /// # Errors
    ///
    /// Returns `NamespaceError` if the names cannot be retrieved or the id is
    /// unknown to the wiki.
    async fn namespace_name(
        &self,
        wiki: &WikiDescriptor,
        namespace_id: i32,
    ) -> Result<String, NamespaceError>;
}
