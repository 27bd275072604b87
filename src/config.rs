// src/config.rs
// =============================================================================
// Runtime settings for one mirroring run.
//
// Nothing is read from or written to disk: every value comes from the
// command line (see cli.rs) or from the defaults below.
// =============================================================================

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// What to do with references to resources whose download failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedResourcePolicy {
    /// Leave the original remote URL in the saved page
    #[default]
    KeepOriginal,
    /// Point the reference at the local path anyway (the file will be missing)
    RewriteToLocal,
}

/// Settings for `mirror_page`.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Directory the page file and resource directory are written into
    pub output_dir: PathBuf,
    /// Maximum number of resource downloads in flight at once
    pub concurrency: usize,
    /// Per-request timeout; `None` keeps the HTTP client's defaults
    pub timeout: Option<Duration>,
    /// Scheme filled in for references that don't carry one
    pub default_scheme: String,
    pub failed_resources: FailedResourcePolicy,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            concurrency: 16,
            timeout: None,
            default_scheme: "https".to_string(),
            failed_resources: FailedResourcePolicy::KeepOriginal,
        }
    }
}

impl MirrorConfig {
    /// Concurrency clamped to at least one task
    pub fn fetch_limit(&self) -> usize {
        self.concurrency.max(1)
    }
}
