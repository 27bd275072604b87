// src/discover/resolve.rs
// =============================================================================
// Turns raw attribute values into absolute URLs and local file names.
//
// Three steps, each a small function:
// 1. resolve_link: fill in a missing scheme and/or host
// 2. clean_link: drop the query string and fragment
// 3. local_file_name: last path segment of the clean URL
//
// Relative references are resolved against the ROOT of the page's host,
// not the page's directory: "img/a.png" on https://site.test/docs/page
// becomes https://site.test/img/a.png.
// =============================================================================

use url::{ParseError, Url};

/// Host plus explicit port (e.g. "localhost:8080"), the part a scheme-less
/// reference borrows from the page. `None` for host-less URLs like `mailto:`.
pub fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Makes `raw` absolute.
///
/// A reference that already carries a scheme is returned as parsed. Otherwise
/// an empty scheme becomes `default_scheme` and an empty host becomes
/// `base_authority`; a host that is present (`//cdn.test/x.js`) is kept.
///
/// Examples (default scheme "https", base "site.test"):
///   "https://cdn.test/lib.js" -> "https://cdn.test/lib.js"
///   "//cdn.test/lib.js"       -> "https://cdn.test/lib.js"
///   "/static/app.js"          -> "https://site.test/static/app.js"
pub fn resolve_link(raw: &str, base_authority: &str, default_scheme: &str) -> Result<Url, ParseError> {
    match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(ParseError::RelativeUrlWithoutBase) => {
            let root = Url::parse(&format!("{}://{}/", default_scheme, base_authority))?;
            root.join(raw)
        }
        Err(e) => Err(e),
    }
}

/// Scheme, host and path only.
pub fn canonicalize(resolved: &Url) -> Url {
    let mut clean = resolved.clone();
    clean.set_query(None);
    clean.set_fragment(None);
    clean
}

/// Resolves `raw` against `host` first, then canonicalizes.
pub fn clean_link(raw: &str, host: &str, default_scheme: &str) -> Result<Url, ParseError> {
    resolve_link(raw, host, default_scheme).map(|resolved| canonicalize(&resolved))
}

/// Final segment of the clean URL, ignoring trailing slashes.
///
/// Two resources ending in the same segment (/x/logo.png, /y/logo.png) get
/// the same name and overwrite each other on disk.
pub fn local_file_name(clean: &Url) -> String {
    let trimmed = clean.as_str().trim_end_matches('/');
    match trimmed.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => "/".to_string(),
    }
}
