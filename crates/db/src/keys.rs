//! Store key conventions.
//!
//! | key                          | value                                 |
//! |------------------------------|---------------------------------------|
//! | `character:<shareId>`        | JSON `CharacterDocument`              |
//! | `community:crafts[:<sfx>]`   | JSON array of `CraftRecord`           |
//! | `xref:<kind>:<id>`           | cached counterpart resource id        |

use craftbook_core::identifier::ResourceKind;

pub const CHARACTER_PREFIX: &str = "character:";
pub const CHARACTER_PATTERN: &str = "character:*";
pub const COMMUNITY_CRAFTS_KEY: &str = "community:crafts";
pub const XREF_PREFIX: &str = "xref:";

/// Page size used for cursor scans.
pub const DEFAULT_SCAN_PAGE_SIZE: usize = 200;

pub fn character_key(share_id: &str) -> String {
    format!("{CHARACTER_PREFIX}{share_id}")
}

/// The share id part of a `character:` key.
pub fn share_id_from_key(key: &str) -> Option<&str> {
    key.strip_prefix(CHARACTER_PREFIX).filter(|id| !id.is_empty())
}

/// `community:crafts` or `community:crafts:<suffix>`.
pub fn community_key(suffix: Option<&str>) -> String {
    match suffix.map(str::trim).filter(|s| !s.is_empty()) {
        Some(suffix) => format!("{COMMUNITY_CRAFTS_KEY}:{suffix}"),
        None => COMMUNITY_CRAFTS_KEY.to_string(),
    }
}

/// Community list suffixes are short slugs (`horde`, `eu-sulfuron`).
pub fn is_valid_suffix(suffix: &str) -> bool {
    !suffix.is_empty()
        && suffix.len() <= 64
        && suffix
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Cache key for the cross-reference of resource `kind=id`.
pub fn xref_key(kind: ResourceKind, id: u64) -> String {
    format!("{XREF_PREFIX}{kind}:{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_keys_round_trip() {
        let key = character_key("Ab12");
        assert_eq!(key, "character:Ab12");
        assert_eq!(share_id_from_key(&key), Some("Ab12"));
        assert_eq!(share_id_from_key("character:"), None);
        assert_eq!(share_id_from_key("community:crafts"), None);
    }

    #[test]
    fn community_key_suffix_is_optional() {
        assert_eq!(community_key(None), "community:crafts");
        assert_eq!(community_key(Some(" ")), "community:crafts");
        assert_eq!(community_key(Some("horde")), "community:crafts:horde");
    }

    #[test]
    fn suffix_validation() {
        assert!(is_valid_suffix("eu-sulfuron"));
        assert!(!is_valid_suffix(""));
        assert!(!is_valid_suffix("a:b"));
        assert!(!is_valid_suffix("*"));
    }

    #[test]
    fn xref_key_names_kind_and_id() {
        assert_eq!(xref_key(ResourceKind::Item, 111), "xref:item:111");
    }
}
