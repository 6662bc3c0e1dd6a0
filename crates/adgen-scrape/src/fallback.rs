//! Last-resort extraction from generic page content.

use adgen_models::ProductMetadata;

use crate::html;
use crate::opengraph::resolve;

const MAX_IMAGES: usize = 5;
const MIN_IMAGE_DIMENSION: u32 = 200;
const SKIP_HINTS: [&str; 4] = ["icon", "logo", "sprite", "pixel"];

/// Build metadata from the page title, first heading, meta description
/// and the largest-looking images.
pub fn extract(page: &str, url: &str) -> ProductMetadata {
    let mut title = html::title_text(page).unwrap_or_default();
    // A heading is usually the product name without the site suffix.
    if let Some(h1) = html::h1_text(page) {
        if h1.len() < title.len() || title.is_empty() {
            title = h1;
        }
    }

    ProductMetadata {
        title,
        description: html::meta_content(page, "name", "description"),
        images: collect_images(page, url),
        price: None,
        brand: None,
        features: Vec::new(),
        url: url.to_string(),
    }
}

fn collect_images(page: &str, url: &str) -> Vec<String> {
    let mut images = Vec::new();
    for img in html::img_tags(page) {
        let Some(src) = img.attr("src").or_else(|| img.attr("data-src")) else {
            continue;
        };
        let lowered = src.to_ascii_lowercase();
        if SKIP_HINTS.iter().any(|hint| lowered.contains(hint)) {
            continue;
        }
        if is_small(img.attr("width")) || is_small(img.attr("height")) {
            continue;
        }
        if let Some(resolved) = resolve(url, src) {
            images.push(resolved);
        }
        if images.len() == MAX_IMAGES {
            break;
        }
    }
    images
}

fn is_small(dimension: Option<&str>) -> bool {
    dimension
        .and_then(|d| d.trim().parse::<u32>().ok())
        .is_some_and(|d| d < MIN_IMAGE_DIMENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://shop.example/product/1";

    #[test]
    fn shorter_heading_wins_over_title() {
        let html = "<title>Ceramic Mug | Example Shop</title><h1>Ceramic Mug</h1>";
        assert_eq!(extract(html, URL).title, "Ceramic Mug");
    }

    #[test]
    fn small_and_decorative_images_are_skipped() {
        let html = r#"
            <img src="/img/logo.png">
            <img src="/img/thumb.jpg" width="64" height="64">
            <img src="/img/hero.jpg" width="1200">
            <img data-src="/img/lazy.jpg">
        "#;
        assert_eq!(
            extract(html, URL).images,
            vec![
                "https://shop.example/img/hero.jpg",
                "https://shop.example/img/lazy.jpg"
            ]
        );
    }

    #[test]
    fn image_count_is_capped() {
        let tags: String = (0..10)
            .map(|i| format!("<img src=\"/img/{i}.jpg\">"))
            .collect();
        assert_eq!(extract(&tags, URL).images.len(), MAX_IMAGES);
    }
}
