//! URL to run-directory naming.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use url::Url;
use uuid::Uuid;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).unwrap());

/// Directory names longer than this get truncated with a hash suffix.
const MAX_NAME_LEN: usize = 200;
const TRUNCATED_LEN: usize = 190;

/// Filesystem-safe directory name for a product URL.
///
/// Host and path are joined with underscores; names over 200 chars are
/// truncated and suffixed with a short URL-keyed hash so distinct long
/// URLs stay distinct.
pub fn dir_name_for_url(url: &str) -> String {
    let (host, path) = match Url::parse(url) {
        Ok(parsed) => (
            parsed.host_str().unwrap_or("unknown").to_string(),
            parsed.path().trim_matches('/').replace('/', "_"),
        ),
        Err(_) => ("unknown".to_string(), String::new()),
    };
    let path = if path.is_empty() {
        "root".to_string()
    } else {
        path
    };

    let mut name = UNSAFE_CHARS
        .replace_all(&format!("{host}_{path}"), "_")
        .into_owned();
    if name.len() > MAX_NAME_LEN {
        let hash = Uuid::new_v5(&Uuid::NAMESPACE_URL, url.as_bytes()).simple().to_string();
        name.truncate(TRUNCATED_LEN);
        name.push('_');
        name.push_str(&hash[..8]);
    }
    name
}

/// Run directory for a product URL under `base`.
pub fn run_dir_for_url(base: &Path, url: &str) -> PathBuf {
    base.join(dir_name_for_url(url))
}
