//! Display metadata scraped from Wowhead HTML pages.

use std::sync::LazyLock;

use regex::Regex;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<h1[^>]*class="[^"]*\bheading-size-1\b[^"]*"[^>]*>(.*?)</h1>"#)
        .expect("valid regex")
});

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex"));

static ICON_CREATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"Icon\.create\(\s*['"]([A-Za-z0-9_\-]+)['"]"#).expect("valid regex")
});

static ICON_JSON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""icon"\s*:\s*"([A-Za-z0-9_\-]+)""#).expect("valid regex"));

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// The display name of a page: the main heading, else the first part of
/// the `<title>`.
pub fn scrape_name(html: &str) -> Option<String> {
    if let Some(name) = HEADING_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|s| !s.is_empty())
    {
        return Some(name);
    }

    let title = TITLE_RE.captures(html)?.get(1)?.as_str();
    let title = clean_text(title);
    // "Bolt of Linen Cloth - Item - World of Warcraft"
    let name = title.split(" - ").next().unwrap_or_default().trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// The icon slug of a page (`inv_misc_bag_10`).
pub fn scrape_icon(html: &str) -> Option<String> {
    ICON_CREATE_RE
        .captures(html)
        .or_else(|| ICON_JSON_RE.captures(html))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn clean_text(fragment: &str) -> String {
    let text = TAG_RE.replace_all(fragment, "");
    decode_entities(text.trim())
}

fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
