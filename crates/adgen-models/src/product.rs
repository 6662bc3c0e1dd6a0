//! Product metadata extracted from a product detail page.

use serde::{Deserialize, Serialize};
use url::Url;

/// Normalized product record produced by the metadata extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductMetadata {
    /// Product name
    pub title: String,
    /// Product description, if found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Product image URLs
    #[serde(default)]
    pub images: Vec<String>,
    /// Price with currency, e.g. "USD 199.99"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// Brand or manufacturer name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Key product features
    #[serde(default)]
    pub features: Vec<String>,
    /// Source page URL
    pub url: String,
}

impl ProductMetadata {
    /// Create an empty record for a URL.
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            description: None,
            images: Vec::new(),
            price: None,
            brand: None,
            features: Vec::new(),
            url: url.into(),
        }
    }

    /// Build a fallback record from the URL alone.
    ///
    /// Used when every extraction strategy fails: the last path segment
    /// becomes a readable title and the host becomes the brand.
    pub fn fallback_from_url(url: &str) -> Self {
        let parsed = Url::parse(url).ok();

        let title = parsed
            .as_ref()
            .and_then(|u| {
                u.path_segments()
                    .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            })
            .map(slug_to_title)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Product".to_string());

        let brand = parsed
            .as_ref()
            .and_then(|u| u.host_str())
            .map(|host| {
                let host = host.strip_prefix("www.").unwrap_or(host);
                let name = host.split('.').next().unwrap_or(host);
                capitalize(name)
            })
            .filter(|b| !b.is_empty());

        Self {
            title,
            brand,
            ..Self::empty(url)
        }
    }

    /// Merge another record into this one, preferring the other's values.
    ///
    /// Scalars from `preferred` win when non-empty; image and feature
    /// lists are combined with duplicates removed, preferred-first.
    pub fn merged_with(self, preferred: ProductMetadata) -> Self {
        fn prefer(a: Option<String>, b: Option<String>) -> Option<String> {
            match a {
                Some(v) if !v.is_empty() => Some(v),
                _ => b,
            }
        }

        fn dedup_concat(first: Vec<String>, second: Vec<String>) -> Vec<String> {
            let mut seen = std::collections::HashSet::new();
            first
                .into_iter()
                .chain(second)
                .filter(|v| !v.is_empty() && seen.insert(v.clone()))
                .collect()
        }

        Self {
            title: if preferred.title.is_empty() {
                self.title
            } else {
                preferred.title
            },
            description: prefer(preferred.description, self.description),
            images: dedup_concat(preferred.images, self.images),
            price: prefer(preferred.price, self.price),
            brand: prefer(preferred.brand, self.brand),
            features: dedup_concat(preferred.features, self.features),
            url: self.url,
        }
    }
}

fn slug_to_title(slug: &str) -> String {
    let decoded = percent_decode(slug);
    decoded
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Minimal percent-decoding for URL path segments.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(byte) = u8::from_str_radix(&s[i + 1..i + 3], 16) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
