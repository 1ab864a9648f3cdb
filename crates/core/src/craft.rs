//! Craft records: one recipe known to a character or a community list.
//!
//! Stored JSON comes in several historical shapes (`recipeUrl`,
//! `recipe_url`, `recipeurl`, ...). All of them are folded into the single
//! canonical [`CraftRecord`] at deserialization time through
//! [`RawCraftRecord`]; nothing downstream looks at aliases again.

use serde::{Deserialize, Serialize};

use crate::identifier::{parse_resource, recipe_id_from_url, ResourceKind};

/// A single craftable recipe.
///
/// `recipe_id` is always derived from `recipe_url` and cannot be set on its
/// own. Serialized in camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawCraftRecord")]
pub struct CraftRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    recipe_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    item_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recipe_id: Option<u64>,
}

impl CraftRecord {
    /// A record with a name and no cross-references.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            recipe_url: None,
            item_url: None,
            recipe_id: None,
        }
    }

    pub fn with_recipe_url(mut self, url: impl Into<String>) -> Self {
        self.set_recipe_url(url);
        self
    }

    pub fn with_item_url(mut self, url: impl Into<String>) -> Self {
        self.set_item_url(url);
        self
    }

    /// A record whose URL is filed under `recipe_url` or `item_url`
    /// according to the resource kind it points at. Unrecognised URLs
    /// produce a name-only record.
    pub fn from_link(name: impl Into<String>, url: &str) -> Self {
        let record = Self::new(name);
        match parse_resource(url).map(|r| r.kind) {
            Some(ResourceKind::Recipe) => record.with_recipe_url(url),
            Some(ResourceKind::Item) => record.with_item_url(url),
            None => record,
        }
    }

    pub fn recipe_url(&self) -> Option<&str> {
        self.recipe_url.as_deref()
    }

    pub fn item_url(&self) -> Option<&str> {
        self.item_url.as_deref()
    }

    pub fn recipe_id(&self) -> Option<u64> {
        self.recipe_id
    }

    /// Set the recipe URL and re-derive `recipe_id` from it.
    pub fn set_recipe_url(&mut self, url: impl Into<String>) {
        let url = url.into();
        self.recipe_id = recipe_id_from_url(&url);
        self.recipe_url = Some(url);
    }

    pub fn set_item_url(&mut self, url: impl Into<String>) {
        self.item_url = Some(url.into());
    }

    /// `true` when at least one cross-reference is present.
    pub fn is_enrichable(&self) -> bool {
        self.recipe_url.is_some() || self.item_url.is_some()
    }
}

/// Boundary shape accepting every historical field spelling.
///
/// Legacy values sometimes carry several spellings of the same field at
/// once, so each spelling gets its own slot. The first non-empty one wins,
/// in declaration order. Empty strings are treated as absent. A stored
/// `recipeId` is ignored: the id is always re-derived from the URL.
#[derive(Debug, Deserialize)]
pub struct RawCraftRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "Name")]
    name_capitalized: Option<String>,
    #[serde(default)]
    title: Option<String>,

    #[serde(default, rename = "recipeUrl")]
    recipe_url_camel: Option<String>,
    #[serde(default)]
    recipe_url: Option<String>,
    #[serde(default, rename = "recipeurl")]
    recipe_url_lower: Option<String>,
    #[serde(default, rename = "recipeURL")]
    recipe_url_upper: Option<String>,
    #[serde(default, rename = "spellUrl")]
    spell_url_camel: Option<String>,
    #[serde(default)]
    spell_url: Option<String>,

    #[serde(default, rename = "itemUrl")]
    item_url_camel: Option<String>,
    #[serde(default)]
    item_url: Option<String>,
    #[serde(default, rename = "itemurl")]
    item_url_lower: Option<String>,
    #[serde(default, rename = "itemURL")]
    item_url_upper: Option<String>,
}

impl From<RawCraftRecord> for CraftRecord {
    fn from(raw: RawCraftRecord) -> Self {
        let name = first_non_empty([raw.name, raw.name_capitalized, raw.title]);
        let mut record = CraftRecord::new(name.unwrap_or_default());

        let recipe_url = first_non_empty([
            raw.recipe_url_camel,
            raw.recipe_url,
            raw.recipe_url_lower,
            raw.recipe_url_upper,
            raw.spell_url_camel,
            raw.spell_url,
        ]);
        if let Some(url) = recipe_url {
            record.set_recipe_url(url);
        }

        let item_url = first_non_empty([
            raw.item_url_camel,
            raw.item_url,
            raw.item_url_lower,
            raw.item_url_upper,
        ]);
        if let Some(url) = item_url {
            record.set_item_url(url);
        }
        record
    }
}

/// The first trimmed, non-empty value among several spellings of a field.
pub(crate) fn first_non_empty<const N: usize>(values: [Option<String>; N]) -> Option<String> {
    values
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}
