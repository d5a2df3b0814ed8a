//! Scrape a listing page for play links and append them as new tasks.

use std::time::Duration;

use thiserror::Error;

use crate::config::Config;
use crate::error::PersistenceError;
use crate::header::{formatted_header, HeaderKind};
use crate::record::TaskRecord;
use crate::search;
use crate::store::ConfigStore;
use crate::transport::Transport;

/// Read timeout for the listing page request.
pub const PAGE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("listing url {0} has no namespace segment")]
    BadPageUrl(String),
    /// Any non-200 response or transport failure. The cause cannot be told
    /// apart from a challenge page, so it is reported as a block.
    #[error("response: {detail}, status code: {status}, cloudflare blocked")]
    Blocked { status: u32, detail: String },
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Namespace and `scheme://host[:port]` prefix of a listing URL.
///
/// `https://site.example/room1/listing` → (`room1`, `https://site.example`).
///
/// The namespace is always the *first* path segment. Listing URLs shaped like
/// `/<kind>/<name>/...` yield `<kind>`, not `<name>`; add such pages' videos
/// with `recu add` instead.
pub fn split_page_url(page_url: &str) -> Result<(String, String), DiscoverError> {
    let bad = || DiscoverError::BadPageUrl(page_url.to_string());
    let parsed = url::Url::parse(page_url).map_err(|_| bad())?;
    let namespace = parsed
        .path_segments()
        .and_then(|mut segs| segs.next())
        .filter(|s| !s.is_empty())
        .ok_or_else(bad)?
        .to_string();
    let prefix = parsed.origin().ascii_serialization();
    if prefix == "null" {
        return Err(bad());
    }
    Ok((namespace, prefix))
}

/// Play URLs linked from `body`, one per matching line, in page order, deduplicated.
pub fn extract_links(body: &str, namespace: &str, prefix: &str) -> Vec<String> {
    let start = format!(r#"href="/{namespace}/video/"#);
    let mut links: Vec<String> = Vec::new();
    for line in body.lines() {
        let Some(id) = search::between(line, &start, r#"/play""#) else {
            continue;
        };
        if id.is_empty() || id.contains('"') {
            continue;
        }
        let link = format!("{prefix}/{namespace}/video/{id}/play");
        if !links.contains(&link) {
            links.push(link);
        }
    }
    links
}

/// Fetches `page_url`, appends every play link not already tracked as a new
/// single-url task, and saves the task file once. Returns the number added.
pub fn discover_links<T: Transport>(
    store: &ConfigStore,
    config: &mut Config,
    transport: &T,
    page_url: &str,
) -> Result<usize, DiscoverError> {
    let (namespace, prefix) = split_page_url(page_url)?;

    tracing::info!(%page_url, "downloading listing page");
    let headers = formatted_header(&config.header, "", HeaderKind::Page);
    let resp = match transport.get(page_url, PAGE_TIMEOUT, &headers) {
        Ok(resp) if resp.is_ok() => resp,
        Ok(resp) => {
            return Err(DiscoverError::Blocked {
                status: resp.status,
                detail: resp.text(),
            })
        }
        Err(e) => {
            return Err(DiscoverError::Blocked {
                status: 0,
                detail: format!("{e:#}"),
            })
        }
    };

    tracing::info!(%namespace, "searching for links");
    let mut added = 0;
    for link in extract_links(&resp.text(), &namespace, &prefix) {
        if config.contains_url(&link) {
            tracing::debug!(%link, "already tracked");
            continue;
        }
        config.urls.push(TaskRecord::new(link).into());
        added += 1;
    }
    tracing::info!(added, "link discovery finished");

    store.save(config)?;
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::HeaderMap;
    use crate::transport::{HttpResponse, Method};
    use serde_json::json;
    use std::cell::RefCell;

    struct StaticPage {
        status: u32,
        body: &'static str,
        seen: RefCell<Vec<(String, HeaderMap)>>,
    }

    impl StaticPage {
        fn new(status: u32, body: &'static str) -> Self {
            Self {
                status,
                body,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for StaticPage {
        fn request(
            &self,
            url: &str,
            _timeout: Duration,
            headers: &HeaderMap,
            _body: Option<&[u8]>,
            _method: Method,
        ) -> anyhow::Result<HttpResponse> {
            self.seen
                .borrow_mut()
                .push((url.to_string(), headers.clone()));
            Ok(HttpResponse {
                status: self.status,
                body: self.body.as_bytes().to_vec(),
            })
        }
    }

    struct Unreachable;

    impl Transport for Unreachable {
        fn request(
            &self,
            url: &str,
            _timeout: Duration,
            _headers: &HeaderMap,
            _body: Option<&[u8]>,
            _method: Method,
        ) -> anyhow::Result<HttpResponse> {
            anyhow::bail!("could not connect to {url}")
        }
    }

    fn config() -> Config {
        serde_json::from_value(json!({
            "urls": [["https://site.example/room1/video/old/play", "COMPLETE"]],
            "header": {"Cookie": "c=1", "User-Agent": "ua"}
        }))
        .unwrap()
    }

    const PAGE: &str = r#"<html>
<div><a href="/room1/video/abc123/play">one</a></div>
<div><a href="/room1/video/old/play">seen</a></div>
<div><a href="/room2/video/zzz/play">other room</a></div>
<div><a href="/room1/video/def456/play">two</a></div>
<div><a href="/room1/video/abc123/play">dup</a></div>
</html>"#;

    #[test]
    fn split_listing_url() {
        let (ns, prefix) = split_page_url("https://site.example/room1/listing").unwrap();
        assert_eq!(ns, "room1");
        assert_eq!(prefix, "https://site.example");
        let (_, prefix) = split_page_url("http://127.0.0.1:8080/r/page").unwrap();
        assert_eq!(prefix, "http://127.0.0.1:8080");
        assert!(split_page_url("https://site.example/").is_err());
        assert!(split_page_url("not a url").is_err());
    }

    #[test]
    fn namespace_is_first_segment_even_when_nested() {
        let (ns, _) = split_page_url("https://site.example/user/room1/videos").unwrap();
        assert_eq!(ns, "user");
    }

    #[test]
    fn extracts_links_for_namespace_only() {
        let links = extract_links(PAGE, "room1", "https://site.example");
        assert_eq!(
            links,
            vec![
                "https://site.example/room1/video/abc123/play",
                "https://site.example/room1/video/old/play",
                "https://site.example/room1/video/def456/play",
            ]
        );
    }

    #[test]
    fn appends_new_links_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        let page = StaticPage::new(200, PAGE);
        let mut cfg = config();

        let added =
            discover_links(&store, &mut cfg, &page, "https://site.example/room1/listing").unwrap();
        assert_eq!(added, 2);
        assert_eq!(cfg.urls.len(), 3);
        assert_eq!(
            cfg.urls[1].as_value(),
            &json!(["https://site.example/room1/video/abc123/play"])
        );
        assert_eq!(store.load().unwrap(), cfg);

        let seen = page.seen.borrow();
        assert_eq!(seen[0].0, "https://site.example/room1/listing");
        assert_eq!(seen[0].1.get("Cookie").unwrap(), "c=1");
    }

    #[test]
    fn single_link_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        let page = StaticPage::new(200, r#"<a href="/room1/video/abc123/play">x</a>"#);
        let mut cfg = config();
        cfg.urls.clear();

        discover_links(&store, &mut cfg, &page, "https://site.example/room1/listing").unwrap();
        assert_eq!(
            cfg.urls[0].as_value(),
            &json!(["https://site.example/room1/video/abc123/play"])
        );
        assert_eq!(cfg.urls.len(), 1);
    }

    #[test]
    fn non_200_is_reported_as_blocked() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        let page = StaticPage::new(403, "Just a moment...");
        let mut cfg = config();
        let before = cfg.clone();

        let err = discover_links(&store, &mut cfg, &page, "https://site.example/room1/listing")
            .unwrap_err();
        assert!(matches!(err, DiscoverError::Blocked { status: 403, .. }));
        assert!(err.to_string().contains("cloudflare blocked"));
        assert_eq!(cfg, before);
        assert!(!store.path().exists());
    }

    #[test]
    fn transport_error_is_reported_as_blocked() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        let mut cfg = config();
        let err = discover_links(&store, &mut cfg, &Unreachable, "https://site.example/room1/x")
            .unwrap_err();
        assert!(matches!(err, DiscoverError::Blocked { status: 0, .. }));
    }
}
