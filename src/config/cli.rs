//! Command-line interface definitions.
//!
//! Database credentials fall back to the `GUC_DB_USER` and `GUC_DB_PASSWORD`
//! environment variables, which may also come from a `.env` file.
//!
//! # Examples
//!
//! ```bash
//! # All contributions of one user, grouped by wiki
//! global_contribs search Example
//!
//! # Recent changes of every name starting with "Exa", newest first
//! global_contribs search Exa --prefix --src rc --by date
//!
//! # Replication lag as JSON
//! global_contribs replag
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::constants::{DEFAULT_HOST_SUFFIX, NAMESPACE_CACHE_PATH};
use crate::config::types::{GroupBy, LogFormat, LogLevel, SearchOptions, Settings, Source};

#[derive(Debug, Parser)]
#[command(
    name = "global_contribs",
    version,
    about = "Searches every wiki of a wiki federation for the contributions of a user or IP address."
)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    /// Replica database user
    #[arg(long, env = "GUC_DB_USER", global = true)]
    pub db_user: Option<String>,

    /// Replica database password
    #[arg(long, env = "GUC_DB_PASSWORD", hide_env_values = true, global = true)]
    pub db_password: Option<String>,

    /// Domain appended to bare cluster names
    #[arg(long, default_value = DEFAULT_HOST_SUFFIX, global = true)]
    pub host_suffix: String,

    /// SQLite file caching namespace names
    #[arg(long, value_parser, default_value = NAMESPACE_CACHE_PATH, global = true)]
    pub cache_db: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search contributions and print the HTML result fragment
    Search(SearchArgs),
    /// Print the replication lag of every shard as JSON
    Replag,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// User name, IP address, or name prefix (with --prefix)
    pub user: String,

    /// Treat the user as a name prefix
    #[arg(long)]
    pub prefix: bool,

    /// Where to read contributions: all|rc|hr
    #[arg(long, value_enum, default_value_t = Source::All)]
    pub src: Source,

    /// Result grouping: wiki|date
    #[arg(long, value_enum, default_value_t = GroupBy::Wiki)]
    pub by: GroupBy,

    /// Also search closed wikis
    #[arg(long)]
    pub include_closed: bool,

    /// Append the timed debug trace
    #[arg(long)]
    pub debug: bool,
}

impl SearchArgs {
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            is_prefix_pattern: self.prefix,
            src: self.src,
            by: self.by,
            include_closed_wikis: self.include_closed,
        }
    }
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            host_suffix: self.host_suffix.clone(),
            namespace_cache_path: self.cache_db.clone(),
            ..Settings::default()
        }
    }
}
