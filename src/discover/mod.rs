// src/discover/mod.rs
// =============================================================================
// Link discovery: everything between "we have the page bytes" and "we know
// which URLs to download and what to call them locally".
//
// Submodules:
// - extract: scans raw bytes for href=/src= values
// - resolve: makes those values absolute and derives file names
// =============================================================================

mod extract;
mod resolve;

pub use extract::{discover_resource_links, extract_attribute_links, Attribute, ResourceLink};
pub use resolve::{authority, canonicalize, clean_link, local_file_name, resolve_link};
