// src/mirror/mod.rs
// =============================================================================
// Putting a page on disk.
//
// Submodules:
// - bundle: names and writes the page file and its resource directory
// - rewrite: swaps remote references for local ones in the page bytes
// - page: the end-to-end mirror_page run
// =============================================================================

mod bundle;
mod page;
mod rewrite;

pub use bundle::Bundle;
pub use page::{mirror_page, MirrorReport};
pub use rewrite::{plan_rewrites, rewrite_document, Rewrite};
