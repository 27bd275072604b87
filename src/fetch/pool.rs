// src/fetch/pool.rs
// =============================================================================
// Downloads every discovered resource into the resource directory.
//
// How it works:
// - Each link becomes one future: fetch, then write `<dir>/<file name>`
// - buffer_unordered(limit) keeps at most `limit` of them in flight
// - Awaiting the collected stream is the join point: when fetch_resources
//   returns, every resource has either been saved or has failed
//
// A failure never stops the batch. It is logged and recorded as a
// ResourceOutcome so the caller can report it at the end.
// =============================================================================

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

use super::http::Fetch;
use crate::discover::ResourceLink;

/// What happened to one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResourceStatus {
    /// Downloaded and written to disk
    Saved { bytes: usize },
    /// Download or write failed; the resource is skipped
    Failed { reason: String },
}

/// Result of fetching a single resource link.
///
/// `raw` is the lossy text form of the link's raw bytes; it is for people
/// reading the report, not for matching.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceOutcome {
    /// Text as it appeared in the page
    pub raw: String,
    /// URL that was requested
    pub url: String,
    /// Name inside the resource directory
    pub file_name: String,
    #[serde(flatten)]
    pub status: ResourceStatus,
}

impl ResourceOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self.status, ResourceStatus::Saved { .. })
    }
}

/// Fetches all `links` with at most `limit` downloads running at once.
///
/// Returns one outcome per link, in the same order as `links`, regardless
/// of the order the downloads finished in.
pub async fn fetch_resources<F: Fetch>(
    fetcher: &F,
    links: &[ResourceLink],
    resource_dir: &Path,
    limit: usize,
) -> Vec<ResourceOutcome> {
    // Nothing runs yet: this is a lazy iterator of futures. Each one carries
    // its index so we can restore discovery order after the unordered join.
    let tasks = links
        .iter()
        .enumerate()
        .map(move |(index, link)| async move { (index, fetch_one(fetcher, link, resource_dir).await) });

    let mut finished: Vec<(usize, ResourceOutcome)> = stream::iter(tasks)
        .buffer_unordered(limit.max(1))
        .collect()
        .await;

    // every future has finished here, successful or not
    finished.sort_by_key(|(index, _)| *index);
    finished.into_iter().map(|(_, outcome)| outcome).collect()
}

async fn fetch_one<F: Fetch>(fetcher: &F, link: &ResourceLink, resource_dir: &Path) -> ResourceOutcome {
    let file_name = link.file_name();
    let destination = resource_dir.join(&file_name);

    // the resolved URL keeps its query string; only the file name drops it
    let status = match fetcher.fetch(&link.resolved).await {
        Ok(body) => match tokio::fs::write(&destination, &body).await {
            Ok(()) => {
                debug!(url = %link.resolved, file = %destination.display(), bytes = body.len(), "saved resource");
                ResourceStatus::Saved { bytes: body.len() }
            }
            Err(e) => {
                warn!(url = %link.resolved, file = %destination.display(), error = %e, "failed to write resource");
                ResourceStatus::Failed {
                    reason: format!("failed to write {}: {}", destination.display(), e),
                }
            }
        },
        Err(e) => {
            warn!(url = %link.resolved, error = %e, "failed to fetch resource");
            ResourceStatus::Failed { reason: e.to_string() }
        }
    };

    ResourceOutcome {
        raw: link.raw_text().into_owned(),
        url: link.resolved.to_string(),
        file_name,
        status,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why buffer_unordered instead of tokio::spawn for every link?
//    - spawn would start every download at once, with no upper bound
//    - buffer_unordered(N) polls at most N futures at a time and starts the
//      next one as soon as a slot frees up
//    - all futures run inside the current task, so they can borrow `fetcher`
//      and `links` instead of needing Arc or 'static data
//
// 2. Where is the "wait for everything" step?
//    - .collect().await only resolves once the stream is exhausted, which
//      means every future in it has completed
//    - that is the single join point before the page gets rewritten
//
// 3. Why carry an index through the futures?
//    - "unordered" means results arrive in completion order
//    - sorting by the index afterwards gives callers a stable,
//      discovery-ordered list, which makes reports and tests predictable
//
// 4. Why return outcomes instead of Result?
//    - one broken image must not throw away the other forty resources
//    - each failure is kept as data (ResourceStatus::Failed) and shown in
//      the final report
// -----------------------------------------------------------------------------
