//! Wiki URL encoding helpers.
//!
//! Page names are encoded the way MediaWiki builds its own links, so the links
//! we render are the same ones a reader would find on the wiki.

use url::form_urlencoded;

/// Characters MediaWiki leaves readable in page URLs.
const READABLE: &[(&str, &str)] = &[
    ("%3B", ";"),
    ("%40", "@"),
    ("%24", "$"),
    ("%21", "!"),
    ("%2A", "*"),
    ("%28", "("),
    ("%29", ")"),
    ("%2C", ","),
    ("%2F", "/"),
    ("%3A", ":"),
];

/// Encodes a page name for use in a URL path or query value.
///
/// Spaces become underscores; a handful of punctuation characters stay readable.
pub fn urlencode_title(page_name: &str) -> String {
    let mut encoded: String =
        form_urlencoded::byte_serialize(page_name.replace(' ', "_").as_bytes()).collect();
    for (escaped, readable) in READABLE {
        encoded = encoded.replace(escaped, readable);
    }
    encoded
}

/// Encodes a section heading as an HTML4-style anchor id.
///
/// `Foo bar` → `Foo_bar`, `Foo/bar` → `Foo.2Fbar`.
pub fn escape_id(section: &str) -> String {
    let encoded: String =
        form_urlencoded::byte_serialize(section.replace(' ', "_").as_bytes()).collect();
    encoded.replace("%3A", ":").replace('%', ".")
}
