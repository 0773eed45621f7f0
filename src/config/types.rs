//! Configuration types and search options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and for configuring a single search request.

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;

use crate::config::constants::{
    CENTRALAUTH_CLUSTER, DEFAULT_HOST_SUFFIX, MAX_WIKIS_PER_PROBE, META_CLUSTER,
    NAMESPACE_CACHE_PATH, WIKI_LIST_LIMIT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Which table the contributions are read from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum Source {
    /// Full revision history
    #[default]
    All,
    /// Recent changes (about 30 days)
    Rc,
    /// Recent changes of the last hour
    Hr,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::All => "all",
            Source::Rc => "rc",
            Source::Hr => "hr",
        }
    }

    /// Whether this source reads the recent changes table.
    pub fn is_recent_changes(&self) -> bool {
        matches!(self, Source::Rc | Source::Hr)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How results are presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum GroupBy {
    /// One section per wiki
    #[default]
    Wiki,
    /// One merged list, newest first, with day headings
    Date,
}

impl GroupBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupBy::Wiki => "wiki",
            GroupBy::Date => "date",
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options of one search request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Treat the query as a name prefix (`Foo` matches `Foo`, `Foobar`, ...)
    pub is_prefix_pattern: bool,
    /// Table to read contributions from
    pub src: Source,
    /// Output grouping
    pub by: GroupBy,
    /// Include wikis marked as closed in the directory
    pub include_closed_wikis: bool,
}

impl SearchOptions {
    /// Builds the permalink query string for a search, omitting default values.
    ///
    /// Returns `./` when nothing differs from the defaults.
    pub fn permalink(&self, user: Option<&str>) -> String {
        let defaults = SearchOptions::default();
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        if self.is_prefix_pattern != defaults.is_prefix_pattern {
            query.append_pair("isPrefixPattern", "1");
        }
        if self.src != defaults.src {
            query.append_pair("src", self.src.as_str());
        }
        if self.by != defaults.by {
            query.append_pair("by", self.by.as_str());
        }
        if self.include_closed_wikis != defaults.include_closed_wikis {
            query.append_pair("includeClosedWikis", "1");
        }
        if let Some(user) = user.filter(|u| !u.is_empty()) {
            query.append_pair("user", user);
        }
        let query = query.finish();
        if query.is_empty() {
            "./".to_string()
        } else {
            format!("./?{query}")
        }
    }
}

/// Deployment settings shared by all requests of one process.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Domain appended to bare cluster names
    pub host_suffix: String,
    /// Cluster hosting the wiki directory
    pub meta_cluster: String,
    /// Cluster hosting the attachment registry
    pub centralauth_cluster: String,
    /// Cap on wiki directory rows
    pub wiki_list_limit: usize,
    /// Cap on probes per UNION ALL statement
    pub max_wikis_per_probe: usize,
    /// SQLite file for the namespace name cache
    pub namespace_cache_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host_suffix: DEFAULT_HOST_SUFFIX.to_string(),
            meta_cluster: META_CLUSTER.to_string(),
            centralauth_cluster: CENTRALAUTH_CLUSTER.to_string(),
            wiki_list_limit: WIKI_LIST_LIMIT,
            max_wikis_per_probe: MAX_WIKIS_PER_PROBE,
            namespace_cache_path: PathBuf::from(NAMESPACE_CACHE_PATH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_search_options_default() {
        let options = SearchOptions::default();
        assert!(!options.is_prefix_pattern);
        assert_eq!(options.src, Source::All);
        assert_eq!(options.by, GroupBy::Wiki);
        assert!(!options.include_closed_wikis);
    }

    #[test]
    fn test_permalink_strips_defaults() {
        let options = SearchOptions::default();
        assert_eq!(options.permalink(None), "./");
        assert_eq!(options.permalink(Some("Example")), "./?user=Example");
    }

    #[test]
    fn test_permalink_keeps_non_defaults() {
        let options = SearchOptions {
            is_prefix_pattern: true,
            src: Source::Hr,
            by: GroupBy::Date,
            include_closed_wikis: false,
        };
        assert_eq!(
            options.permalink(Some("Foo bar")),
            "./?isPrefixPattern=1&src=hr&by=date&user=Foo+bar"
        );
    }

    #[test]
    fn test_source_is_recent_changes() {
        assert!(!Source::All.is_recent_changes());
        assert!(Source::Rc.is_recent_changes());
        assert!(Source::Hr.is_recent_changes());
    }

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.host_suffix, "web.db.svc.wikimedia.cloud");
        assert_eq!(settings.wiki_list_limit, 1500);
        assert_eq!(settings.meta_cluster, "meta");
        assert_eq!(settings.centralauth_cluster, "centralauth");
    }
}
