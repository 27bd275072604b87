// src/mirror/page.rs
// =============================================================================
// The whole mirroring run for one page.
//
// Steps:
// 1. Work out the bundle paths (needs a host)
// 2. Fetch the page; failure here stops everything before touching disk
// 3. Discover resource links in the raw bytes
// 4. Create the resource directory
// 5. Download resources concurrently and wait for ALL of them
// 6. Rewrite references in the page
// 7. Write the page file
//
// Only steps 1, 2, 4 and 7 can fail the run. Resource failures end up in
// the returned MirrorReport.
// =============================================================================

use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use url::Url;

use super::bundle::Bundle;
use super::rewrite::{plan_rewrites, rewrite_document};
use crate::config::MirrorConfig;
use crate::discover::discover_resource_links;
use crate::error::MirrorError;
use crate::fetch::{fetch_resources, Fetch, ResourceOutcome};

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct MirrorReport {
    pub page_url: String,
    pub page_file: PathBuf,
    pub resource_dir: PathBuf,
    /// One entry per discovered resource link, in discovery order
    pub resources: Vec<ResourceOutcome>,
}

impl MirrorReport {
    pub fn saved_count(&self) -> usize {
        self.resources.iter().filter(|r| r.is_saved()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.resources.len() - self.saved_count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ResourceOutcome> {
        self.resources.iter().filter(|r| !r.is_saved())
    }
}

/// Saves `page_url` and its directly referenced resources under
/// `config.output_dir`.
pub async fn mirror_page<F: Fetch>(
    fetcher: &F,
    page_url: &Url,
    config: &MirrorConfig,
) -> Result<MirrorReport, MirrorError> {
    // only computes paths; nothing touches the disk until the page is in hand
    let bundle = Bundle::for_url(page_url, &config.output_dir)?;

    // the page is the one fetch whose failure is fatal
    info!(url = %page_url, "fetching page");
    let document = fetcher
        .fetch(page_url)
        .await
        .map_err(|source| MirrorError::PageFetch {
            url: page_url.to_string(),
            source,
        })?;

    let links = discover_resource_links(&document, page_url, &config.default_scheme);
    info!(count = links.len(), "discovered resource links");

    bundle.create_resource_dir().await?;

    // join point: returns only after every resource has been attempted
    let outcomes = fetch_resources(fetcher, &links, &bundle.resource_dir, config.fetch_limit()).await;

    let rewrites = plan_rewrites(&links, &outcomes, &bundle, config.failed_resources);
    // rewriting works on the original bytes, never on a decoded string
    let rewritten = rewrite_document(&document, &rewrites);
    bundle.write_page(&rewritten).await?;

    info!(file = %bundle.page_file.display(), "page saved");

    Ok(MirrorReport {
        page_url: page_url.to_string(),
        page_file: bundle.page_file,
        resource_dir: bundle.resource_dir,
        resources: outcomes,
    })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is mirror_page generic over F: Fetch?
//    - The binary passes an HttpFetcher; the tests pass a StaticFetcher with
//      canned responses. Same pipeline, no network needed in unit tests
//
// 2. Why `?` on some steps and not on others?
//    - `?` returns the error to the caller and stops the run. That is right
//      for the page and the bundle files
//    - fetch_resources never returns an error; every failure becomes a
//      ResourceOutcome so one broken image can't lose the whole page
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FailedResourcePolicy;
    use crate::fetch::testing::StaticFetcher;
    use crate::fetch::HttpFetcher;
    use scraper::{Html, Selector};
    use std::fs;

    const PAGE: &str = r#"<html><head>
<link rel="stylesheet" href="/b.css">
<script src="/a.js"></script>
</head><body><a href="/about">About</a></body></html>"#;

    fn config_in(dir: &std::path::Path) -> MirrorConfig {
        MirrorConfig {
            output_dir: dir.to_path_buf(),
            ..MirrorConfig::default()
        }
    }

    fn page_url() -> Url {
        Url::parse("https://site.test/page").unwrap()
    }

    // every script src and stylesheet href in the saved page points into the bundle
    fn assert_all_assets_local(html: &str) {
        let document = Html::parse_document(html);
        let scripts = Selector::parse("script[src]").unwrap();
        let links = Selector::parse("link[href]").unwrap();

        for element in document.select(&scripts) {
            let src = element.value().attr("src").unwrap();
            assert!(src.starts_with("./site.test__page_files/"), "remote script left: {}", src);
        }
        for element in document.select(&links) {
            let href = element.value().attr("href").unwrap();
            assert!(href.starts_with("./site.test__page_files/"), "remote stylesheet left: {}", href);
        }
    }

    #[tokio::test]
    async fn test_mirrors_page_and_resources() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StaticFetcher::new()
            .with_body("https://site.test/page", PAGE)
            .with_body("https://site.test/a.js", "alert(1)")
            .with_body("https://site.test/b.css", "body{}");

        let report = mirror_page(&fetcher, &page_url(), &config_in(dir.path())).await.unwrap();

        assert_eq!(report.saved_count(), 2);
        assert_eq!(report.failed_count(), 0);

        let resource_dir = dir.path().join("site.test__page_files");
        assert_eq!(report.resource_dir, resource_dir);
        assert_eq!(fs::read(resource_dir.join("a.js")).unwrap(), b"alert(1)");
        assert_eq!(fs::read(resource_dir.join("b.css")).unwrap(), b"body{}");

        let saved = fs::read_to_string(dir.path().join("site.test__page.html")).unwrap();
        assert!(saved.contains(r#"src="./site.test__page_files/a.js""#));
        assert!(saved.contains(r#"href="./site.test__page_files/b.css""#));
        assert!(!saved.contains(r#""/a.js""#));
        assert!(!saved.contains(r#""/b.css""#));
        // navigation links are not assets
        assert!(saved.contains(r#"href="/about""#));
        assert_all_assets_local(&saved);
    }

    #[tokio::test]
    async fn test_failed_resource_does_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StaticFetcher::new()
            .with_body("https://site.test/page", PAGE)
            .with_body("https://site.test/b.css", "body{}");

        let report = mirror_page(&fetcher, &page_url(), &config_in(dir.path())).await.unwrap();

        assert_eq!(report.saved_count(), 1);
        let failed: Vec<_> = report.failures().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].raw, "/a.js");

        let resource_dir = dir.path().join("site.test__page_files");
        assert!(resource_dir.join("b.css").exists());
        assert!(!resource_dir.join("a.js").exists());

        // default policy: the failed script still points at its original URL
        let saved = fs::read_to_string(&report.page_file).unwrap();
        assert!(saved.contains(r#"src="/a.js""#));
        assert!(saved.contains(r#"href="./site.test__page_files/b.css""#));
    }

    #[tokio::test]
    async fn test_failed_resource_rewritten_with_policy() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StaticFetcher::new()
            .with_body("https://site.test/page", PAGE)
            .with_status("https://site.test/a.js", 503)
            .with_body("https://site.test/b.css", "body{}");
        let config = MirrorConfig {
            failed_resources: FailedResourcePolicy::RewriteToLocal,
            ..config_in(dir.path())
        };

        let report = mirror_page(&fetcher, &page_url(), &config).await.unwrap();

        assert_eq!(report.failed_count(), 1);
        let saved = fs::read_to_string(&report.page_file).unwrap();
        assert_all_assets_local(&saved);
    }

    #[tokio::test]
    async fn test_colliding_file_names_leave_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let page = r#"<img src="/x/logo.png"><img src="/y/logo.png">"#;
        let fetcher = StaticFetcher::new()
            .with_body("https://site.test/page", page)
            .with_body("https://site.test/x/logo.png", "XXXX")
            .with_body("https://site.test/y/logo.png", "YYYY");

        let report = mirror_page(&fetcher, &page_url(), &config_in(dir.path())).await.unwrap();
        assert_eq!(report.saved_count(), 2);

        let entries: Vec<_> = fs::read_dir(&report.resource_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("logo.png")]);

        let content = fs::read(report.resource_dir.join("logo.png")).unwrap();
        assert!(content == b"XXXX" || content == b"YYYY");

        let saved = fs::read_to_string(&report.page_file).unwrap();
        assert_eq!(
            saved,
            r#"<img src="./site.test__page_files/logo.png"><img src="./site.test__page_files/logo.png">"#
        );
    }

    #[tokio::test]
    async fn test_latin1_page_is_mirrored() {
        let dir = tempfile::tempdir().unwrap();
        let page = b"<p>caf\xe9</p><img src=\"/img/caf\xe9.png\">".to_vec();
        let fetcher = StaticFetcher::new()
            .with_body("https://site.test/page", page)
            .with_body("https://site.test/img/caf%E9.png", "PNG");

        let report = mirror_page(&fetcher, &page_url(), &config_in(dir.path())).await.unwrap();

        assert_eq!(report.saved_count(), 1);
        assert_eq!(fs::read(report.resource_dir.join("caf%E9.png")).unwrap(), b"PNG");
        assert_eq!(
            fs::read(&report.page_file).unwrap(),
            b"<p>caf\xe9</p><img src=\"./site.test__page_files/caf%E9.png\">".to_vec()
        );
    }

    #[tokio::test]
    async fn test_page_fetch_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StaticFetcher::new().with_status("https://site.test/page", 404);

        let err = mirror_page(&fetcher, &page_url(), &config_in(dir.path()))
            .await
            .unwrap_err();

        assert!(matches!(err, MirrorError::PageFetch { .. }));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_page_without_resources() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StaticFetcher::new().with_body("https://site.test/page", "<p>plain</p>");

        let report = mirror_page(&fetcher, &page_url(), &config_in(dir.path())).await.unwrap();

        assert!(report.resources.is_empty());
        assert!(report.resource_dir.is_dir());
        assert_eq!(fs::read_to_string(&report.page_file).unwrap(), "<p>plain</p>");
    }

    #[tokio::test]
    async fn test_mirrors_over_http() {
        let mut server = mockito::Server::new_async().await;
        let _page = server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(PAGE)
            .create_async()
            .await;
        let _script = server
            .mock("GET", "/a.js")
            .with_status(500)
            .create_async()
            .await;
        let _style = server
            .mock("GET", "/b.css")
            .with_status(200)
            .with_body("body{}")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = MirrorConfig {
            default_scheme: "http".to_string(),
            concurrency: 2,
            ..config_in(dir.path())
        };
        let url = Url::parse(&format!("{}/page", server.url())).unwrap();
        let fetcher = HttpFetcher::new(config.timeout).unwrap();

        let report = mirror_page(&fetcher, &url, &config).await.unwrap();

        assert_eq!(report.saved_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert!(report.resource_dir.join("b.css").exists());
        assert!(report.page_file.exists());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["resources"][0]["raw"], "/b.css");
        assert_eq!(json["resources"][1]["status"], "failed");
    }
}
