//! Product-page metadata extraction.
//!
//! Strategies are tried in order of reliability: JSON-LD structured
//! data, then Open Graph tags, then generic page content. The winning
//! structured record is merged over the generic extraction so fields
//! the structured data leaves blank are filled from the page itself.

pub mod error;
mod fallback;
mod html;
mod jsonld;
mod opengraph;

use std::time::Duration;

use adgen_models::ProductMetadata;
use tracing::{debug, warn};

pub use error::{ScrapeError, ScrapeResult};

const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches product pages and extracts structured metadata.
pub struct Scraper {
    http: reqwest::Client,
}

impl Scraper {
    pub fn new() -> ScrapeResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { http })
    }

    /// Fetch the page at `url` and extract product metadata.
    pub async fn extract(&self, url: &str) -> ScrapeResult<ProductMetadata> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus(status.as_u16()));
        }
        let page = response.text().await?;
        Ok(extract_from_page(&page, url))
    }

    /// Like [`extract`](Self::extract), but a failed fetch degrades to
    /// a record derived from the URL itself so the pipeline can keep
    /// going with a readable product name.
    pub async fn extract_or_fallback(&self, url: &str) -> ProductMetadata {
        match self.extract(url).await {
            Ok(metadata) if !metadata.title.is_empty() => metadata,
            Ok(_) => {
                warn!(url, "Page yielded no usable metadata, deriving from URL");
                ProductMetadata::fallback_from_url(url)
            }
            Err(e) => {
                warn!(url, error = %e, "Metadata extraction failed, deriving from URL");
                ProductMetadata::fallback_from_url(url)
            }
        }
    }
}

/// Run the extraction strategies over an already-fetched page.
///
/// Structured data wins for any field it carries; gaps are filled from
/// the generic extraction, so a JSON-LD record without images still
/// picks up the page's product shots.
pub fn extract_from_page(page: &str, url: &str) -> ProductMetadata {
    let structured = match jsonld::extract(page, url).filter(|m| !m.title.is_empty()) {
        Some(metadata) => {
            debug!(url, "Extracted metadata from JSON-LD");
            Some(metadata)
        }
        None => opengraph::extract(page, url).map(|metadata| {
            debug!(url, "Extracted metadata from Open Graph tags");
            metadata
        }),
    };

    let base = fallback::extract(page, url);
    match structured {
        Some(metadata) => base.merged_with(metadata),
        None => {
            debug!(url, "Falling back to generic page extraction");
            base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://shop.example/product/1";

    #[test]
    fn json_ld_takes_priority_over_open_graph() {
        let page = r#"
            <script type="application/ld+json">
                {"@type": "Product", "name": "Structured Name"}
            </script>
            <meta property="og:title" content="OG Name">
        "#;
        assert_eq!(extract_from_page(page, URL).title, "Structured Name");
    }

    #[test]
    fn open_graph_used_when_json_ld_has_no_title() {
        let page = r#"
            <script type="application/ld+json">{"@type": "Product"}</script>
            <meta property="og:title" content="OG Name">
        "#;
        assert_eq!(extract_from_page(page, URL).title, "OG Name");
    }

    #[test]
    fn generic_fallback_when_nothing_structured() {
        let page = "<title>Plain Page</title>";
        assert_eq!(extract_from_page(page, URL).title, "Plain Page");
    }

    #[test]
    fn structured_record_is_filled_from_page_content() {
        let page = r#"
            <script type="application/ld+json">
                {"@type": "Product", "name": "Espresso Maker", "brand": {"name": "BrewCo"}}
            </script>
            <meta name="description" content="Compact machine">
            <img src="https://cdn/hero.jpg">
        "#;
        let meta = extract_from_page(page, URL);
        assert_eq!(meta.title, "Espresso Maker");
        assert_eq!(meta.brand.as_deref(), Some("BrewCo"));
        assert_eq!(meta.description.as_deref(), Some("Compact machine"));
        assert_eq!(meta.images, vec!["https://cdn/hero.jpg"]);
    }

    #[test]
    fn structured_fields_win_over_page_content() {
        let page = r#"
            <title>Noise | MegaShop</title>
            <meta name="description" content="Generic site blurb">
            <script type="application/ld+json">
                {"@type": "Product", "name": "Turntable",
                 "description": "Belt-driven deck",
                 "image": "https://cdn/deck.jpg"}
            </script>
            <img src="https://cdn/banner.jpg">
        "#;
        let meta = extract_from_page(page, URL);
        assert_eq!(meta.title, "Turntable");
        assert_eq!(meta.description.as_deref(), Some("Belt-driven deck"));
        assert_eq!(meta.images[0], "https://cdn/deck.jpg");
        assert!(meta.images.contains(&"https://cdn/banner.jpg".to_string()));
    }
}
