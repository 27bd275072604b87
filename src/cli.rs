// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
//   mirror --url https://example.com/page [--output-dir DIR] [--concurrency N]
//          [--timeout SECS] [--rewrite-failed] [--json]
//
// The URL is declared optional on purpose: a missing or blank value is
// handled by main.rs, which prints our own usage message to stdout instead
// of clap's error on stderr.
//
// The single-dash spellings `-url`, `-help` and `-version` are accepted too;
// normalize_args rewrites them to their `--` forms before clap sees them.
// =============================================================================

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use page_mirror::{FailedResourcePolicy, MirrorConfig, MirrorError};

// #[derive(Parser)] tells clap to generate the parsing code from this struct
#[derive(Parser, Debug)]
#[command(
    name = "mirror",
    version,
    about = "Save a web page and the resources it references for offline viewing",
    long_about = "mirror downloads a single web page together with the scripts, stylesheets, \
                  images and other files it references, rewrites the page to point at the local \
                  copies, and writes <host>_<path>.html plus a <host>_<path>_files directory."
)]
pub struct Cli {
    /// URL of the web page to save (e.g., https://example.com/page)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Directory to write the page file and resource directory into
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Maximum number of resources downloaded at the same time
    #[arg(long, default_value_t = 16)]
    pub concurrency: usize,

    /// Per-request timeout in seconds (default: no timeout)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Point references to resources that failed to download at their
    /// (missing) local path instead of keeping the original URL
    #[arg(long)]
    pub rewrite_failed: bool,

    /// Output the report in JSON format instead of a table
    #[arg(long)]
    pub json: bool,
}

// Long flags that may also be written with a single dash
const SINGLE_DASH_FLAGS: [&str; 3] = ["url", "help", "version"];

/// Rewrites `-url`, `-url=X`, `-help` and `-version` to their `--` forms.
///
/// clap reads `-url` as `-u rl`, so these have to be fixed up first. Every
/// other argument passes through untouched, including non-UTF-8 ones.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let Some(rest) = text.strip_prefix('-') else {
                return arg;
            };
            if rest.starts_with('-') {
                return arg;
            }

            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if SINGLE_DASH_FLAGS.contains(&name) {
                OsString::from(format!("-{}", text))
            } else {
                arg
            }
        })
        .collect()
}

impl Cli {
    /// The page URL, or `None` when the flag is missing or blank.
    pub fn page_url(&self) -> Result<Option<Url>, MirrorError> {
        let raw = match self.url.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(None),
        };

        let url = Url::parse(raw).map_err(|source| MirrorError::InvalidUrl {
            url: raw.to_string(),
            source,
        })?;

        if url.host_str().is_none() {
            return Err(MirrorError::MissingHost(raw.to_string()));
        }

        Ok(Some(url))
    }

    pub fn config(&self) -> MirrorConfig {
        MirrorConfig {
            output_dir: self.output_dir.clone(),
            concurrency: self.concurrency,
            timeout: self.timeout.map(Duration::from_secs),
            failed_resources: if self.rewrite_failed {
                FailedResourcePolicy::RewriteToLocal
            } else {
                FailedResourcePolicy::KeepOriginal
            },
            ..MirrorConfig::default()
        }
    }
}


// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Option<String> for --url?
//    - If we marked it required, clap would reject a missing flag itself and
//      print to stderr. We want "URL flag has not been set" plus the help on
//      stdout, and a blank value ("--url ''") treated the same way.
//
// 2. Why is the default scheme not a flag?
//    - References like "//cdn.example.com/x.js" or "/x.js" always get https.
//      MirrorConfig keeps it as a field so tests can point the engine at a
//      plain-HTTP local server.
//
// 3. Why not just add `-url` as an alias in clap?
//    - clap short flags are one character. "-url" is parsed as "-u" with the
//      value "rl", so the argument list is fixed up before parsing instead.
// -----------------------------------------------------------------------------
