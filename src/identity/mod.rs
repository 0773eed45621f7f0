//! Search identity classification.
//!
//! The raw query is normalized the way wiki titles are (underscores become
//! spaces, first letter uppercased) and classified as a single IP address,
//! an exact user name, or a name prefix pattern.

mod ip;

pub use ip::{canonical_ip, is_valid_ip, normalize_ip, parse_ip};

use crate::error_handling::SearchError;

/// SQL `LIKE` wildcard appended to prefix patterns.
pub const WILDCARD: char = '%';

/// What kind of identity a search is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityKind {
    /// One IPv4 or IPv6 address (anonymous edits)
    SingleIp,
    /// One registered or unregistered user name
    ExactName,
    /// Every actor whose name starts with a prefix
    PrefixPattern,
}

/// The normalized search query. Created once per request, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchIdentity {
    raw: String,
    kind: IdentityKind,
    normalized: String,
}

impl SearchIdentity {
    /// Classifies and normalizes a raw query.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidInput` when the query is empty, or, in
    /// pattern mode, contains `_` or starts with the wildcard.
    pub fn resolve(raw: &str, is_prefix_pattern: bool) -> Result<Self, SearchError> {
        let trimmed = raw.trim();
        let normalized = uppercase_first(&trimmed.replace('_', " "));

        if normalized.is_empty() {
            return Err(SearchError::invalid_input("No username or IP"));
        }

        if is_prefix_pattern {
            // `_` is the single-character LIKE wildcard, not a prefix character.
            if trimmed.contains('_') {
                return Err(SearchError::invalid_input("Illegal \"_\" character found"));
            }
            // Leading wildcards cannot use the name index.
            if normalized.starts_with(WILDCARD) {
                return Err(SearchError::invalid_input(format!(
                    "Wildcard search can not start with \"{WILDCARD}\"."
                )));
            }
            // A "%" inside the query is honoured; only the trailing one is implied.
            let mut pattern = normalized;
            if !pattern.ends_with(WILDCARD) {
                pattern.push(WILDCARD);
            }
            log::debug!("Performing a pattern search: {pattern}");
            return Ok(Self {
                raw: raw.to_string(),
                kind: IdentityKind::PrefixPattern,
                normalized: pattern,
            });
        }

        if let Some(ip) = normalize_ip(&normalized) {
            return Ok(Self {
                raw: raw.to_string(),
                kind: IdentityKind::SingleIp,
                normalized: ip,
            });
        }

        Ok(Self {
            raw: raw.to_string(),
            kind: IdentityKind::ExactName,
            normalized,
        })
    }

    /// The query exactly as supplied.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> IdentityKind {
        self.kind
    }

    /// Name, canonical IP, or pattern including its trailing wildcard.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn is_ip(&self) -> bool {
        self.kind == IdentityKind::SingleIp
    }

    pub fn is_pattern(&self) -> bool {
        self.kind == IdentityKind::PrefixPattern
    }

    /// Whether the attachment registry applies (exact names only).
    pub fn uses_registry(&self) -> bool {
        self.kind == IdentityKind::ExactName
    }
}

/// Uppercases the first character, leaving the rest untouched.
fn uppercase_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
