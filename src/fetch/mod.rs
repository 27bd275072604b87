// src/fetch/mod.rs
// =============================================================================
// Network side of mirroring.
//
// Submodules:
// - http: the Fetch trait and its reqwest implementation
// - pool: bounded concurrent download of all resources, one outcome each
// =============================================================================

mod http;
mod pool;

#[cfg(test)]
pub(crate) mod testing;

pub use http::{Fetch, HttpFetcher};
pub use pool::{fetch_resources, ResourceOutcome, ResourceStatus};
