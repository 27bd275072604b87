// src/discover/extract.rs
// =============================================================================
// Finds resource references in a raw document.
//
// This is NOT an HTML parser. We scan the bytes for text shaped like
// `href="..."` or `src='...'` (any letter case, any whitespace around `=`).
// Matches inside comments, scripts or plain text count too.
//
// Two passes make up the resource list:
// - href values, kept only when the path looks like a stylesheet or script
// - src values, always kept
// =============================================================================

use percent_encoding::{percent_encode, CONTROLS};
use regex::bytes::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::debug;
use url::{ParseError, Url};

use super::resolve::{authority, canonicalize, local_file_name, resolve_link};

// matches href="link" as well as something like hReF =  'link'
// (?-u:.) lets the value hold any byte, so Latin-1 and other non-UTF-8 pages still match
static HREF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(href)[\s]*=[\s]*("|')((?-u:.)*?)("|')"#).expect("hardcoded regex pattern is valid")
});

// matches src="link" or SrC    =  'link'
static SRC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(src)[\s]*=[\s]*("|')((?-u:.)*?)("|')"#).expect("hardcoded regex pattern is valid")
});

/// href targets with one of these in their path are treated as assets
pub const ASSET_SUFFIXES: [&str; 4] = [".css", ".scss", ".js", ".mjs"];

/// Which attribute family to scan for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Href,
    Src,
}

impl Attribute {
    fn pattern(self) -> &'static Regex {
        match self {
            Attribute::Href => &*HREF_PATTERN,
            Attribute::Src => &*SRC_PATTERN,
        }
    }
}

/// One resource reference found in the document.
///
/// `raw` holds exactly the bytes between the quotes. The rewriter searches
/// for those bytes later, so they are never modified or re-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLink {
    pub raw: Vec<u8>,
    pub resolved: Url,
    pub clean: Url,
}

impl ResourceLink {
    /// Resolves `raw` against the page's host. `None` if it can't be made
    /// into a valid absolute URL.
    pub fn new(raw: &[u8], base_authority: &str, default_scheme: &str) -> Option<Self> {
        let resolved = resolve_link(&url_text(raw), base_authority, default_scheme).ok()?;
        let clean = canonicalize(&resolved);
        Some(Self {
            raw: raw.to_vec(),
            resolved,
            clean,
        })
    }

    /// `raw` for logs and reports; invalid UTF-8 shows up as U+FFFD
    pub fn raw_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.raw)
    }

    /// Name of the file this resource is saved under
    pub fn file_name(&self) -> String {
        local_file_name(&self.clean)
    }

    fn is_fetchable(&self) -> bool {
        matches!(self.resolved.scheme(), "http" | "https")
    }

    // ".js" also matches ".json"; the check is a plain substring test
    fn looks_like_asset(&self) -> bool {
        let path = self.resolved.path();
        ASSET_SUFFIXES.iter().any(|suffix| path.contains(suffix))
    }
}

/// Returns every raw value of `attribute` in document order, byte for byte.
///
/// Duplicates are kept. Empty values and values that don't parse as a URL
/// reference are skipped.
pub fn extract_attribute_links(document: &[u8], attribute: Attribute) -> Vec<Vec<u8>> {
    attribute
        .pattern()
        .find_iter(document)
        .filter_map(|found| quoted_value(found.as_bytes()))
        .filter(|raw| is_url_reference(raw))
        .collect()
}

/// Asset-looking href links followed by all src links, both in document
/// order, resolved against `base`.
pub fn discover_resource_links(document: &[u8], base: &Url, default_scheme: &str) -> Vec<ResourceLink> {
    let base_authority = authority(base).unwrap_or_default();
    let resolve = |raw: Vec<u8>| {
        let link = ResourceLink::new(&raw, &base_authority, default_scheme);
        if link.is_none() {
            debug!(raw = %String::from_utf8_lossy(&raw), "skipping reference that does not resolve");
        }
        link
    };

    let hrefs = extract_attribute_links(document, Attribute::Href)
        .into_iter()
        .filter_map(&resolve)
        .filter(ResourceLink::looks_like_asset);
    let srcs = extract_attribute_links(document, Attribute::Src)
        .into_iter()
        .filter_map(&resolve);

    hrefs
        .chain(srcs)
        .filter(|link| {
            let fetchable = link.is_fetchable();
            if !fetchable {
                debug!(raw = %link.raw_text(), "skipping non-HTTP reference");
            }
            fetchable
        })
        .collect()
}

// Bytes between the first and last double quote of the match, or between the
// first and last single quote when there is no double quote at all.
fn quoted_value(span: &[u8]) -> Option<Vec<u8>> {
    let quote = if span.contains(&b'"') { b'"' } else { b'\'' };
    let start = span.iter().position(|&b| b == quote)?;
    let end = span.iter().rposition(|&b| b == quote)?;

    if end <= start + 1 {
        return None;
    }

    Some(span[start + 1..end].to_vec())
}

// Text handed to the url crate. Valid UTF-8 goes through untouched; anything
// else gets its non-ASCII bytes percent-encoded (0xE9 -> %E9), the way a
// browser requests a Latin-1 path.
fn url_text(raw: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(raw) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(percent_encode(raw, CONTROLS).to_string()),
    }
}

// Same test the resolver applies later: absolute URLs and plain relative
// references pass, anything the url crate rejects outright does not.
fn is_url_reference(raw: &[u8]) -> bool {
    matches!(
        Url::parse(&url_text(raw)),
        Ok(_) | Err(ParseError::RelativeUrlWithoutBase)
    )
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why regex::bytes and not the normal str regex?
//    - A page is only bytes until we know its charset, and we never find out
//    - bytes::Regex searches &[u8] directly, so a Latin-1 page is scanned as
//      is instead of failing UTF-8 validation
//
// 2. What does (?-u:.) mean?
//    - Inside a bytes regex, Unicode mode is on by default and "." only
//      matches whole UTF-8 characters
//    - (?-u:.) turns Unicode off for that one item: it matches any single
//      byte except a newline
//
// 3. Why LazyLock?
//    - Compiling a regex is much slower than running it. LazyLock compiles
//      each pattern once, the first time it is used, and shares it from then on
//
// 4. Why is `raw` a Vec<u8> and not a String?
//    - The rewriter looks for these exact bytes later. Converting to String
//      would either fail or replace bytes with U+FFFD, and the lossy text
//      would no longer be found in the page
// -----------------------------------------------------------------------------
