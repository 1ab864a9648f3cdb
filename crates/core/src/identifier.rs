//! Wowhead resource identifier parsing and URL normalization.
//!
//! Every URL handled by the service points at one of two resources on the
//! encyclopedia site: a recipe (`.../recipe=<id>`) or the item it produces
//! (`.../item=<id>`). Functions here never fail; anything that does not
//! match collapses to `None` or is passed through unchanged.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Host used when a URL carries no host of its own.
pub const DEFAULT_HOST: &str = "www.wowhead.com";

/// Edition path segment used when a URL carries none.
pub const DEFAULT_EDITION: &str = "classic";

/// Locale path segment used when a URL carries none.
pub const DEFAULT_LOCALE: &str = "fr";

static RESOURCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(recipe|item)=(\d+)").expect("valid regex"));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The two resource kinds the site exposes for crafting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Recipe,
    Item,
}

impl ResourceKind {
    /// Path keyword used in URLs (`recipe` / `item`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recipe => "recipe",
            Self::Item => "item",
        }
    }

    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "recipe" => Some(Self::Recipe),
            "item" => Some(Self::Item),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `{kind, id}` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub id: u64,
}

/// Host / edition / locale fallbacks used when building canonical URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlDefaults {
    pub host: String,
    pub edition: String,
    pub locale: String,
}

impl Default for UrlDefaults {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            edition: DEFAULT_EDITION.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

/// Where a resource segment sits inside a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
struct UrlLayout {
    host: Option<String>,
    edition: Option<String>,
    locale: Option<String>,
    resource: ResourceRef,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Extract the first `recipe=<digits>` or `item=<digits>` segment of `url`.
///
/// Returns `None` when neither pattern is present or the id overflows.
pub fn parse_resource(url: &str) -> Option<ResourceRef> {
    let caps = RESOURCE_RE.captures(url)?;
    let kind = ResourceKind::from_keyword(caps.get(1)?.as_str())?;
    let id = caps.get(2)?.as_str().parse().ok()?;
    Some(ResourceRef { kind, id })
}

/// Find the first identifier of the given kind anywhere in `text`.
///
/// Used for scanning resolved URLs and raw HTML bodies.
pub fn find_resource_id(kind: ResourceKind, text: &str) -> Option<u64> {
    RESOURCE_RE
        .captures_iter(text)
        .filter(|caps| caps.get(1).map(|m| m.as_str()) == Some(kind.as_str()))
        .find_map(|caps| caps.get(2)?.as_str().parse().ok())
}

/// The numeric recipe id of a recipe URL, `None` for anything else.
pub fn recipe_id_from_url(url: &str) -> Option<u64> {
    parse_resource(url)
        .filter(|r| r.kind == ResourceKind::Recipe)
        .map(|r| r.id)
}

fn is_locale_segment(segment: &str) -> bool {
    segment.len() == 2 && segment.bytes().all(|b| b.is_ascii_lowercase())
}

fn layout(url: &str) -> Option<UrlLayout> {
    let caps = RESOURCE_RE.captures(url)?;
    let resource = parse_resource(url)?;
    let kind_start = caps.get(1)?.start();
    let prefix = &url[..kind_start];

    let (host, path) = match prefix.split_once("://") {
        Some((_, rest)) => match rest.split_once('/') {
            Some((host, path)) => (Some(host.to_string()), path),
            None => (Some(rest.to_string()), ""),
        },
        None => (None, prefix),
    };
    let host = host.filter(|h| !h.is_empty());

    // Path segments only count when the resource is itself a path segment.
    if !(path.is_empty() || path.ends_with('/')) {
        return Some(UrlLayout {
            host,
            edition: None,
            locale: None,
            resource,
        });
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let (edition, locale) = match segments.as_slice() {
        [.., edition, last] if is_locale_segment(last) => {
            (Some(edition.to_string()), Some(last.to_string()))
        }
        [last] if is_locale_segment(last) => (None, Some(last.to_string())),
        [.., last] => (Some(last.to_string()), None),
        [] => (None, None),
    };

    Some(UrlLayout {
        host,
        edition,
        locale,
        resource,
    })
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Build `https://<host>/<edition>/<locale>/<kind>=<id>`.
pub fn canonical_url(host: &str, edition: &str, locale: &str, kind: ResourceKind, id: u64) -> String {
    format!("https://{host}/{edition}/{locale}/{kind}={id}")
}

/// Rewrite `url` to its canonical locale/edition form.
///
/// URLs that already carry a locale segment directly before the resource
/// segment are returned unchanged, as are URLs with no resource segment.
/// An edition segment already present is kept; missing parts come from
/// `defaults`.
pub fn normalize_url(url: &str, defaults: &UrlDefaults) -> String {
    let Some(layout) = layout(url) else {
        return url.to_string();
    };
    if layout.locale.is_some() {
        return url.to_string();
    }
    canonical_url(
        layout.host.as_deref().unwrap_or(&defaults.host),
        layout.edition.as_deref().unwrap_or(&defaults.edition),
        &defaults.locale,
        layout.resource.kind,
        layout.resource.id,
    )
}

/// Canonical URL for `target`, on the same host/edition/locale as `url`.
///
/// Parts `url` does not carry fall back to `defaults`.
pub fn sibling_url(url: &str, target: ResourceRef, defaults: &UrlDefaults) -> String {
    let layout = layout(url);
    let host = layout
        .as_ref()
        .and_then(|l| l.host.as_deref())
        .unwrap_or(&defaults.host);
    let edition = layout
        .as_ref()
        .and_then(|l| l.edition.as_deref())
        .unwrap_or(&defaults.edition);
    let locale = layout
        .as_ref()
        .and_then(|l| l.locale.as_deref())
        .unwrap_or(&defaults.locale);
    canonical_url(host, edition, locale, target.kind, target.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> UrlDefaults {
        UrlDefaults::default()
    }

    // -- parse_resource ------------------------------------------------------

    #[test]
    fn parses_item_url() {
        let r = parse_resource("https://www.wowhead.com/classic/fr/item=14048/bolt-of-runecloth");
        assert_eq!(
            r,
            Some(ResourceRef {
                kind: ResourceKind::Item,
                id: 14048
            })
        );
    }

    #[test]
    fn parses_recipe_url() {
        let r = parse_resource("https://site/ed/fr/recipe=222");
        assert_eq!(
            r,
            Some(ResourceRef {
                kind: ResourceKind::Recipe,
                id: 222
            })
        );
    }

    #[test]
    fn non_matching_url_is_none() {
        assert_eq!(parse_resource("https://www.wowhead.com/classic/fr/npc=12"), None);
        assert_eq!(parse_resource(""), None);
        assert_eq!(parse_resource("https://example.com/myitem=5"), None);
    }

    #[test]
    fn overflowing_id_is_none() {
        assert_eq!(parse_resource("https://site/item=99999999999999999999999"), None);
    }

    #[test]
    fn recipe_id_only_for_recipes() {
        assert_eq!(recipe_id_from_url("https://site/ed/fr/recipe=222"), Some(222));
        assert_eq!(recipe_id_from_url("https://site/ed/fr/item=111"), None);
    }

    #[test]
    fn find_resource_id_skips_other_kind() {
        let body = r#"<a href="/classic/fr/item=5">x</a> <a href="/classic/fr/recipe=77">y</a>"#;
        assert_eq!(find_resource_id(ResourceKind::Recipe, body), Some(77));
        assert_eq!(find_resource_id(ResourceKind::Item, body), Some(5));
    }

    // -- normalize_url -------------------------------------------------------

    #[test]
    fn locale_url_passes_through() {
        let url = "https://site/ed/fr/item=111";
        assert_eq!(normalize_url(url, &defaults()), url);
    }

    #[test]
    fn locale_without_edition_passes_through() {
        let url = "https://www.wowhead.com/de/item=1/slug";
        assert_eq!(normalize_url(url, &defaults()), url);
    }

    #[test]
    fn bare_url_gets_default_edition_and_locale() {
        assert_eq!(
            normalize_url("https://www.wowhead.com/item=19019/thunderfury", &defaults()),
            "https://www.wowhead.com/classic/fr/item=19019"
        );
    }

    #[test]
    fn existing_edition_is_kept() {
        assert_eq!(
            normalize_url("https://www.wowhead.com/cata/recipe=3", &defaults()),
            "https://www.wowhead.com/cata/fr/recipe=3"
        );
    }

    #[test]
    fn hostless_url_uses_default_host() {
        assert_eq!(
            normalize_url("item=42", &defaults()),
            "https://www.wowhead.com/classic/fr/item=42"
        );
    }

    #[test]
    fn unrelated_url_is_unchanged() {
        let url = "https://example.com/guide";
        assert_eq!(normalize_url(url, &defaults()), url);
    }

    // -- sibling_url ---------------------------------------------------------

    #[test]
    fn sibling_keeps_host_edition_locale() {
        let target = ResourceRef {
            kind: ResourceKind::Recipe,
            id: 222,
        };
        assert_eq!(
            sibling_url("https://site/ed/fr/item=111", target, &defaults()),
            "https://site/ed/fr/recipe=222"
        );
    }

    #[test]
    fn sibling_of_unparseable_url_uses_defaults() {
        let target = ResourceRef {
            kind: ResourceKind::Item,
            id: 9,
        };
        assert_eq!(
            sibling_url("not a url", target, &defaults()),
            "https://www.wowhead.com/classic/fr/item=9"
        );
    }
}
