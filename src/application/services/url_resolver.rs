//! Unwrapping of shortened, gallery and hosting-page URLs into direct media URLs.

use std::sync::{Arc, LazyLock};

use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::domain::ports::WebPort;

const SHORTENER_HOSTS: [&str; 1] = ["bit.ly"];

const GALLERY_PREFIXES: [&str; 2] = [
    "https://www.reddit.com/gallery/",
    "https://reddit.com/gallery/",
];

const LEGACY_ALBUM_PREFIX: &str = "https://imgur.com/gallery/";
const ALBUM_PREFIX: &str = "https://imgur.com/a/";

const OPEN_GRAPH_PREFIXES: [&str; 4] = [
    "https://postimg.cc/",
    "https://www.flickr.com/",
    "https://imgur.com/",
    "https://gfycat.com/",
];

static FIGURE_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("figure img").unwrap());
static OG_VIDEO: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:video"]"#).unwrap());
static OG_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:image"]"#).unwrap());

/// Runs an attachment URL through every unwrapping stage in order.
///
/// Every stage either rewrites the URL or passes it through; failures are logged
/// and never surface.
#[derive(Clone)]
pub struct UrlResolver {
    web: Arc<dyn WebPort>,
}

impl UrlResolver {
    /// Creates new resolver.
    #[must_use]
    pub fn new(web: Arc<dyn WebPort>) -> Self {
        Self { web }
    }

    /// Returns the most direct URL known for `url`.
    pub async fn resolve(&self, url: &str) -> String {
        let url = self.follow_shortener(url.to_string()).await;
        let url = self.unwrap_gallery(url).await;
        let url = rewrite_legacy_album(url);
        let resolved = self.scrape_open_graph(url).await;
        debug!(url = %resolved, "Resolved attachment url");
        resolved
    }

    async fn follow_shortener(&self, url: String) -> String {
        let is_shortened = url::Url::parse(&url)
            .ok()
            .and_then(|u| u.host_str().map(|h| SHORTENER_HOSTS.contains(&h)))
            .unwrap_or(false);
        if !is_shortened {
            return url;
        }

        match self.web.final_location(&url).await {
            Ok(location) => location,
            Err(e) => {
                warn!(url = %url, error = %e, "Could not follow shortened url");
                url
            }
        }
    }

    async fn unwrap_gallery(&self, url: String) -> String {
        if !GALLERY_PREFIXES.iter().any(|p| url.starts_with(p)) {
            return url;
        }

        match self.web.fetch_text(&url).await {
            Ok(html) => first_figure_image(&html).unwrap_or(url),
            Err(e) => {
                warn!(url = %url, error = %e, "Could not fetch gallery page");
                url
            }
        }
    }

    async fn scrape_open_graph(&self, url: String) -> String {
        if !OPEN_GRAPH_PREFIXES.iter().any(|p| url.starts_with(p)) {
            return url;
        }

        match self.web.fetch_text(&url).await {
            Ok(html) => open_graph_media(&html).unwrap_or(url),
            Err(e) => {
                warn!(url = %url, error = %e, "Could not scrape hosting page");
                url
            }
        }
    }
}

fn rewrite_legacy_album(url: String) -> String {
    url.strip_prefix(LEGACY_ALBUM_PREFIX)
        .map_or(url.clone(), |rest| format!("{ALBUM_PREFIX}{rest}"))
}

fn first_figure_image(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&FIGURE_IMAGE)
        .next()
        .and_then(|img| img.value().attr("src"))
        .filter(|src| !src.is_empty())
        .map(str::to_string)
}

fn open_graph_media(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    [&*OG_VIDEO, &*OG_IMAGE].into_iter().find_map(|selector| {
        document
            .select(selector)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .filter(|content| !content.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::WebError;
    use crate::domain::ports::mocks::MockWebPort;

    const GALLERY_HTML: &str = r#"<html><body>
        <figure><a href="/x"><img src="https://preview.redd.it/one.jpg?width=640&amp;s=abc"></a></figure>
        <figure><img src="https://preview.redd.it/two.jpg"></figure>
    </body></html>"#;

    const OG_BOTH_HTML: &str = r#"<html><head>
        <meta property="og:image" content="https://i.imgur.com/I42mS3H.jpg?fb" />
        <meta property="og:video" content="https://i.imgur.com/Xob3epw.mp4" />
    </head><body></body></html>"#;

    const OG_IMAGE_HTML: &str = r#"<html><head>
        <meta property="og:image" content="https://i.postimg.cc/abc/pic.png" />
    </head></html>"#;

    fn resolver(web: MockWebPort) -> UrlResolver {
        UrlResolver::new(Arc::new(web))
    }

    #[tokio::test]
    async fn test_unknown_host_passes_through_without_requests() {
        let r = resolver(MockWebPort::new());
        assert_eq!(
            r.resolve("https://example.com/a/b").await,
            "https://example.com/a/b"
        );
    }

    #[tokio::test]
    async fn test_shortener_is_followed() {
        let mut web = MockWebPort::new();
        web.expect_final_location()
            .withf(|url| url == "https://bit.ly/abc")
            .times(1)
            .returning(|_| Ok("https://example.com/target".to_string()));

        assert_eq!(
            resolver(web).resolve("https://bit.ly/abc").await,
            "https://example.com/target"
        );
    }

    #[tokio::test]
    async fn test_shortener_failure_keeps_url() {
        let mut web = MockWebPort::new();
        web.expect_final_location()
            .returning(|url| Err(WebError::network(url, "connection reset")));

        assert_eq!(
            resolver(web).resolve("https://bit.ly/abc").await,
            "https://bit.ly/abc"
        );
    }

    #[tokio::test]
    async fn test_gallery_takes_first_figure_image() {
        let mut web = MockWebPort::new();
        web.expect_fetch_text()
            .withf(|url| url == "https://www.reddit.com/gallery/abc123")
            .times(1)
            .returning(|_| Ok(GALLERY_HTML.to_string()));

        assert_eq!(
            resolver(web)
                .resolve("https://www.reddit.com/gallery/abc123")
                .await,
            "https://preview.redd.it/one.jpg?width=640&s=abc"
        );
    }

    #[tokio::test]
    async fn test_gallery_without_figure_keeps_url() {
        let mut web = MockWebPort::new();
        web.expect_fetch_text()
            .returning(|_| Ok("<html><body><p>nothing</p></body></html>".to_string()));

        assert_eq!(
            resolver(web).resolve("https://reddit.com/gallery/abc").await,
            "https://reddit.com/gallery/abc"
        );
    }

    #[tokio::test]
    async fn test_legacy_album_is_rewritten_then_scraped() {
        let mut web = MockWebPort::new();
        web.expect_fetch_text()
            .withf(|url| url == "https://imgur.com/a/xyz")
            .times(1)
            .returning(|_| Ok(OG_BOTH_HTML.to_string()));

        assert_eq!(
            resolver(web).resolve("https://imgur.com/gallery/xyz").await,
            "https://i.imgur.com/Xob3epw.mp4"
        );
    }

    #[test]
    fn test_legacy_album_rewrite_is_syntactic() {
        assert_eq!(
            rewrite_legacy_album("https://imgur.com/gallery/xyz".into()),
            "https://imgur.com/a/xyz"
        );
        assert_eq!(
            rewrite_legacy_album("https://imgur.com/a/xyz".into()),
            "https://imgur.com/a/xyz"
        );
    }

    #[tokio::test]
    async fn test_open_graph_image_when_no_video() {
        let mut web = MockWebPort::new();
        web.expect_fetch_text()
            .returning(|_| Ok(OG_IMAGE_HTML.to_string()));

        assert_eq!(
            resolver(web).resolve("https://postimg.cc/abc").await,
            "https://i.postimg.cc/abc/pic.png"
        );
    }

    #[tokio::test]
    async fn test_open_graph_failure_keeps_url() {
        let mut web = MockWebPort::new();
        web.expect_fetch_text()
            .returning(|url| Err(WebError::status(url, 503)));

        assert_eq!(
            resolver(web).resolve("https://www.flickr.com/photos/1").await,
            "https://www.flickr.com/photos/1"
        );
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let mut web = MockWebPort::new();
        web.expect_final_location()
            .returning(|_| Ok("https://imgur.com/gallery/xyz".to_string()));
        web.expect_fetch_text()
            .returning(|_| Ok(OG_BOTH_HTML.to_string()));
        let r = resolver(web);

        for input in [
            "https://bit.ly/abc",
            "https://imgur.com/gallery/xyz",
            "https://example.com/page",
        ] {
            let once = r.resolve(input).await;
            assert_eq!(r.resolve(&once).await, once);
        }
    }
}
