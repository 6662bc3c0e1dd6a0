//! Open Graph meta-tag extraction.

use adgen_models::ProductMetadata;
use url::Url;

use crate::html;

/// Extract product metadata from Open Graph tags. Returns `None` when
/// the page carries no `og:title`.
pub fn extract(page: &str, url: &str) -> Option<ProductMetadata> {
    let title = html::meta_content(page, "property", "og:title")?;

    let images = html::meta_contents(page, "property", "og:image")
        .into_iter()
        .filter_map(|img| resolve(url, &img))
        .collect();

    let price = html::meta_content(page, "property", "product:price:amount").map(|amount| {
        let currency =
            html::meta_content(page, "property", "product:price:currency").unwrap_or_default();
        format!("{currency} {amount}").trim().to_string()
    });

    Some(ProductMetadata {
        title,
        description: html::meta_content(page, "property", "og:description"),
        images,
        price,
        brand: html::meta_content(page, "property", "product:brand"),
        features: Vec::new(),
        url: url.to_string(),
    })
}

/// Resolve a possibly relative image reference against the page URL.
pub(crate) fn resolve(base: &str, reference: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    base.join(reference).ok().map(String::from)
}
