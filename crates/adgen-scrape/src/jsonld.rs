//! schema.org Product extraction from JSON-LD script blocks.

use adgen_models::ProductMetadata;
use serde_json::Value;

use crate::html;

/// Extract product metadata from the first `schema.org/Product` object
/// found in the page's JSON-LD blocks.
pub fn extract(page: &str, url: &str) -> Option<ProductMetadata> {
    for block in html::ld_json_blocks(page) {
        let Ok(data) = serde_json::from_str::<Value>(&block) else {
            continue;
        };
        if let Some(product) = find_product(&data) {
            return Some(parse_product(product, url));
        }
    }
    None
}

/// Walk a JSON-LD document: top-level object, `@graph` wrapper or array.
fn find_product(data: &Value) -> Option<&Value> {
    if let Some(graph) = data.get("@graph") {
        return find_product(graph);
    }
    if let Some(items) = data.as_array() {
        return items.iter().find(|item| is_product(item));
    }
    is_product(data).then_some(data)
}

fn is_product(data: &Value) -> bool {
    match data.get("@type") {
        Some(Value::String(t)) => t == "Product",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("Product")),
        _ => false,
    }
}

fn parse_product(data: &Value, url: &str) -> ProductMetadata {
    ProductMetadata {
        title: str_field(data, "name").unwrap_or_default(),
        description: str_field(data, "description"),
        images: parse_images(data.get("image")),
        price: parse_price(data.get("offers")),
        brand: parse_brand(data.get("brand")),
        features: Vec::new(),
        url: url.to_string(),
    }
}

/// `image` may be a string, an array of strings, or an array of
/// ImageObject entries with `url`/`contentUrl`.
fn parse_images(image: Option<&Value>) -> Vec<String> {
    match image {
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(obj) => obj
                    .get("url")
                    .or_else(|| obj.get("contentUrl"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// `offers` may be a single Offer or an array; the price is joined with
/// its currency when one is present.
fn parse_price(offers: Option<&Value>) -> Option<String> {
    let offer = match offers {
        Some(Value::Object(_)) => offers?,
        Some(Value::Array(items)) => items.first()?,
        _ => return None,
    };
    let price = match offer.get("price")? {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let currency = str_field(offer, "priceCurrency").unwrap_or_default();
    Some(format!("{currency} {price}").trim().to_string())
}

fn parse_brand(brand: Option<&Value>) -> Option<String> {
    match brand {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Object(obj)) => obj
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

fn str_field(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
