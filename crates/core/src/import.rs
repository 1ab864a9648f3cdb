//! Markdown link-list import.
//!
//! Accepts the subset of markdown people paste from their notes:
//!
//! ```text
//! # Tailoring
//! - [Bolt of Runecloth](https://www.wowhead.com/classic/fr/recipe=18401)
//! * [Runecloth Bag](https://www.wowhead.com/classic/fr/item=14046)
//! ```
//!
//! Headings open a profession section; list items holding a link become
//! [`CraftRecord`]s. Everything else is ignored.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::craft::CraftRecord;
use crate::types::ProfessionName;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s+(.+?)\s*#*\s*$").expect("valid regex"));

static LINK_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*+]|\d+\.)\s+\[([^\]]+)\]\(\s*([^)\s]+)[^)]*\)").expect("valid regex")
});

/// Parse a markdown link list into profession sections.
///
/// Items before the first heading go to `default_profession`. Sections that
/// end up empty are omitted. Order of items inside a section is preserved.
pub fn parse_markdown_crafts(
    markdown: &str,
    default_profession: &str,
) -> BTreeMap<ProfessionName, Vec<CraftRecord>> {
    let mut sections: BTreeMap<ProfessionName, Vec<CraftRecord>> = BTreeMap::new();
    let mut current = default_profession.trim().to_string();

    for line in markdown.lines() {
        if let Some(caps) = HEADING_RE.captures(line.trim_start()) {
            current = caps[1].trim().to_string();
            continue;
        }
        if let Some(caps) = LINK_ITEM_RE.captures(line) {
            let name = caps[1].trim();
            if name.is_empty() {
                continue;
            }
            sections
                .entry(current.clone())
                .or_default()
                .push(CraftRecord::from_link(name, &caps[2]));
        }
    }

    sections.retain(|profession, crafts| !profession.is_empty() && !crafts.is_empty());
    sections
}
