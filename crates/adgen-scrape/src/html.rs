//! Minimal tag-level HTML helpers.
//!
//! Product pages only need a handful of well-known tags (meta, title,
//! h1, img, ld+json scripts), so a few regexes over the raw document
//! are enough; no DOM is built.

use std::sync::LazyLock;

use regex::Regex;

static META_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").unwrap());
static IMG_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>").unwrap());
static ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z][a-zA-Z0-9:_-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});
static TITLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());
static H1_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").unwrap());
static LD_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .unwrap()
});
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// One opening tag with its parsed attributes.
#[derive(Debug)]
pub struct Tag {
    attrs: Vec<(String, String)>,
}

impl Tag {
    fn parse(raw: &str) -> Self {
        let attrs = ATTR
            .captures_iter(raw)
            .map(|c| {
                let value = c.get(2).or_else(|| c.get(3)).map_or("", |m| m.as_str());
                (c[1].to_ascii_lowercase(), decode_entities(value))
            })
            .collect();
        Self { attrs }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// All `<meta>` tags in document order.
pub fn meta_tags(html: &str) -> Vec<Tag> {
    META_TAG
        .find_iter(html)
        .map(|m| Tag::parse(m.as_str()))
        .collect()
}

/// All `<img>` tags in document order.
pub fn img_tags(html: &str) -> Vec<Tag> {
    IMG_TAG
        .find_iter(html)
        .map(|m| Tag::parse(m.as_str()))
        .collect()
}

/// The `content` of the first meta tag whose `key_attr` equals `key`.
pub fn meta_content(html: &str, key_attr: &str, key: &str) -> Option<String> {
    meta_contents(html, key_attr, key).into_iter().next()
}

/// The `content` values of every meta tag whose `key_attr` equals `key`.
pub fn meta_contents(html: &str, key_attr: &str, key: &str) -> Vec<String> {
    meta_tags(html)
        .iter()
        .filter(|tag| tag.attr(key_attr).is_some_and(|v| v.eq_ignore_ascii_case(key)))
        .filter_map(|tag| tag.attr("content"))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Text of the document `<title>`, entities decoded.
pub fn title_text(html: &str) -> Option<String> {
    TITLE_TAG
        .captures(html)
        .map(|c| clean_text(&c[1]))
        .filter(|t| !t.is_empty())
}

/// Text of the first `<h1>`, inner markup stripped.
pub fn h1_text(html: &str) -> Option<String> {
    H1_TAG
        .captures(html)
        .map(|c| clean_text(&c[1]))
        .filter(|t| !t.is_empty())
}

/// Bodies of all `application/ld+json` script blocks.
pub fn ld_json_blocks(html: &str) -> Vec<String> {
    LD_JSON
        .captures_iter(html)
        .map(|c| c[1].trim().to_string())
        .filter(|b| !b.is_empty())
        .collect()
}

fn clean_text(fragment: &str) -> String {
    let stripped = ANY_TAG.replace_all(fragment, " ");
    decode_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode the entities that actually occur in product-page metadata.
pub fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
}
