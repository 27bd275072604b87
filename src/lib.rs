// src/lib.rs
// =============================================================================
// page-mirror: save one web page plus the scripts, stylesheets, images and
// other resources it references, rewritten to work from local disk.
//
// Flow of a run (see mirror::mirror_page):
//   fetch page -> discover links -> fetch resources (bounded, concurrent)
//   -> rewrite references -> write bundle
//
// The `mirror` binary (src/main.rs) is a thin command-line wrapper around
// this library.
// =============================================================================

pub mod config;
pub mod discover;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod mirror;

pub use config::{FailedResourcePolicy, MirrorConfig};
pub use error::{FetchError, MirrorError};
pub use fetch::{Fetch, HttpFetcher};
pub use mirror::{mirror_page, MirrorReport};
