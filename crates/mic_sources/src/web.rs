use image::DynamicImage;
use mic_core::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

// Lazy-load fallbacks checked after the primary src attribute; the first
// non-empty value wins.
const IMAGE_ATTRIBUTES: [&str; 5] = ["src", "data-src", "data-lazy", "data-original", "data-url"];

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

/// Fetches a page and the images it references. The client identifies as a
/// regular browser to get past the common anti-bot checks.
pub struct PageScraper {
    client: Client,
    page_timeout: Duration,
    image_timeout: Duration,
}

impl PageScraper {
    pub fn new(page_timeout: Duration, image_timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            page_timeout,
            image_timeout,
        })
    }

    /// GETs the page HTML. A non-success status is a run-level failure and
    /// surfaces as `Error::Status`.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .timeout(self.page_timeout)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }

    /// Downloads and decodes one image. Failures here are per-item: the
    /// caller logs and skips, they never abort the batch.
    pub async fn fetch_image(&self, url: &str) -> Result<DynamicImage> {
        let response = self
            .client
            .get(url)
            .timeout(self.image_timeout)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(image::load_from_memory(&bytes)?)
    }
}

/// Finds every `<img>` element and returns `(dom_index, resolved_url)` in
/// document order. Elements without a usable location are dropped.
pub fn extract_image_urls(html: &str, page_url: &str) -> Vec<(usize, String)> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("img").unwrap();

    document
        .select(&selector)
        .enumerate()
        .filter_map(|(index, element)| {
            let raw = IMAGE_ATTRIBUTES
                .iter()
                .find_map(|attr| element.value().attr(attr).map(str::trim).filter(|v| !v.is_empty()))?;
            resolve_image_url(page_url, raw).map(|url| (index, url))
        })
        .collect()
}

/// Canonical resolution rule: protocol-relative locations get `https:`,
/// root-relative ones are joined to the page's own origin, absolute
/// http(s) passes through, everything else is skipped.
pub fn resolve_image_url(page_url: &str, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.starts_with("//") {
        Some(format!("https:{raw}"))
    } else if raw.starts_with('/') {
        Some(format!("{}{}", page_origin(page_url)?, raw))
    } else if raw.starts_with("http") {
        Some(raw.to_string())
    } else {
        None
    }
}

/// `scheme://host[:port]` of the page, without any path or trailing slash.
fn page_origin(page_url: &str) -> Option<String> {
    let parsed = Url::parse(page_url).ok()?;
    let host = parsed.host_str()?;
    let mut origin = format!("{}://{}", parsed.scheme(), host);
    if let Some(port) = parsed.port() {
        origin.push_str(&format!(":{port}"));
    }
    Some(origin)
}
