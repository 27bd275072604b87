// src/mirror/bundle.rs
// =============================================================================
// On-disk layout of a saved page.
//
// For https://site.test/docs/intro saved into DIR we produce two siblings:
//   DIR/site.test__docs_intro.html         the rewritten page
//   DIR/site.test__docs_intro_files/       every downloaded resource
//
// Slashes in the URL path become underscores so each name is a single
// filesystem entry.
// =============================================================================

use std::path::{Path, PathBuf};
use url::Url;

use crate::discover::authority;
use crate::error::MirrorError;

/// Where one page and its resources are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub page_file: PathBuf,
    pub resource_dir: PathBuf,
    /// Bare directory name, used in the page's relative references
    pub resource_dir_name: String,
}

impl Bundle {
    /// Derives both paths from the page URL's host and path.
    pub fn for_url(page_url: &Url, output_dir: &Path) -> Result<Self, MirrorError> {
        let stem = bundle_stem(page_url)?;
        let resource_dir_name = format!("{}_files", stem);

        Ok(Self {
            page_file: output_dir.join(format!("{}.html", stem)),
            resource_dir: output_dir.join(&resource_dir_name),
            resource_dir_name,
        })
    }

    /// Creates the resource directory (and any missing parents).
    pub async fn create_resource_dir(&self) -> Result<(), MirrorError> {
        tokio::fs::create_dir_all(&self.resource_dir)
            .await
            .map_err(|source| MirrorError::CreateResourceDir {
                path: self.resource_dir.clone(),
                source,
            })
    }

    /// Writes the (rewritten) page, replacing any earlier copy.
    pub async fn write_page(&self, body: &[u8]) -> Result<(), MirrorError> {
        tokio::fs::write(&self.page_file, body)
            .await
            .map_err(|source| MirrorError::WritePage {
                path: self.page_file.clone(),
                source,
            })
    }

    /// Reference to a saved resource, relative to the page file
    pub fn local_reference(&self, file_name: &str) -> String {
        format!("./{}/{}", self.resource_dir_name, file_name)
    }
}

// "<host>_<path with / replaced by _>"; Url::path() is already percent-escaped
fn bundle_stem(page_url: &Url) -> Result<String, MirrorError> {
    let host = authority(page_url).ok_or_else(|| MirrorError::MissingHost(page_url.to_string()))?;
    Ok(format!("{}_{}", host, page_url.path().replace('/', "_")))
}
