// src/mirror/rewrite.rs
// =============================================================================
// Points the saved page at the local copies of its resources.
//
// Plain text substitution: every byte-exact occurrence of a link's raw text
// is replaced, one link after another in discovery order. There is no
// markup awareness, so a raw value that also appears inside another value
// (e.g. "a.js" inside "/lib/a.js") gets replaced there too.
// =============================================================================

use regex::bytes::{NoExpand, Regex};
use std::collections::HashSet;
use tracing::warn;

use super::bundle::Bundle;
use crate::config::FailedResourcePolicy;
use crate::discover::ResourceLink;
use crate::fetch::ResourceOutcome;

/// Replace every occurrence of the `raw` bytes with `local`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub raw: Vec<u8>,
    pub local: String,
}

/// Decides which references get rewritten.
///
/// `outcomes` must line up with `links` (as returned by `fetch_resources`).
/// Identical raw texts produce a single rewrite; applying it twice would
/// match again inside the local path written by the first pass.
pub fn plan_rewrites(
    links: &[ResourceLink],
    outcomes: &[ResourceOutcome],
    bundle: &Bundle,
    policy: FailedResourcePolicy,
) -> Vec<Rewrite> {
    // a raw text is rewritten if any of its downloads made it to disk
    let saved: HashSet<&[u8]> = links
        .iter()
        .zip(outcomes)
        .filter(|(_, outcome)| outcome.is_saved())
        .map(|(link, _)| link.raw.as_slice())
        .collect();

    let mut seen = HashSet::new();
    let mut rewrites = Vec::new();

    for link in links {
        // first occurrence wins; later duplicates would point at the same file anyway
        if !seen.insert(link.raw.as_slice()) {
            continue;
        }

        let keep = match policy {
            FailedResourcePolicy::RewriteToLocal => true,
            FailedResourcePolicy::KeepOriginal => saved.contains(link.raw.as_slice()),
        };

        if keep {
            rewrites.push(Rewrite {
                raw: link.raw.clone(),
                local: bundle.local_reference(&link.file_name()),
            });
        }
    }

    rewrites
}

/// Applies `rewrites` in order to a copy of `document`.
pub fn rewrite_document(document: &[u8], rewrites: &[Rewrite]) -> Vec<u8> {
    let mut body = document.to_vec();

    for rewrite in rewrites {
        let pattern = match Regex::new(&literal_pattern(&rewrite.raw)) {
            Ok(pattern) => pattern,
            Err(e) => {
                warn!(raw = %String::from_utf8_lossy(&rewrite.raw), error = %e, "cannot rewrite reference");
                continue;
            }
        };

        // NoExpand: a '$' in the local path is text, not a capture reference
        body = pattern
            .replace_all(&body, NoExpand(rewrite.local.as_bytes()))
            .into_owned();
    }

    body
}

// Regex source that matches exactly `raw`, byte for byte. ASCII is escaped
// with regex::escape; every other byte becomes \xNN under (?-u) so that
// non-UTF-8 values match too.
fn literal_pattern(raw: &[u8]) -> String {
    let mut pattern = String::from("(?-u)");
    for &byte in raw {
        if byte.is_ascii() {
            pattern.push_str(&regex::escape(char::from(byte).encode_utf8(&mut [0; 4])));
        } else {
            pattern.push_str(&format!("\\x{:02X}", byte));
        }
    }
    pattern
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a regex for a plain "find and replace"?
//    - regex::bytes works on &[u8], so the page never has to be valid UTF-8
//    - replace_all does the global replacement in a single pass
//    - literal_pattern makes sure nothing in the raw text (".", "?", "+")
//      is read as regex syntax
//
// 2. What is NoExpand?
//    - By default the replacement may contain $1 or $name to insert capture
//      groups
//    - NoExpand(bytes) says "insert these bytes exactly as they are"
//
// 3. Why rewrite the raw text and not the resolved URL?
//    - The page contains "/a.js?v=2", not "https://site.test/a.js?v=2"
//    - Only the exact original bytes can be found again in the document
// -----------------------------------------------------------------------------
