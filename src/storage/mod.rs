//! Local SQLite storage.
//!
//! Only the namespace name cache is persisted; contribution data never is.

pub mod migrations;
mod namespaces;
pub mod pool;
#[cfg(test)]
pub(crate) mod test_helpers;

pub use migrations::run_migrations;
pub use namespaces::NamespaceStore;
pub use pool::init_db_pool_with_path;
