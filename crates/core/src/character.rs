//! Character documents: a character's professions and their craft lists.
//!
//! Like [`CraftRecord`], documents are normalized once at the boundary
//! through [`RawCharacterDocument`], so historical spellings of `shareId` and
//! the visibility flag never leak past deserialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::craft::{first_non_empty, CraftRecord};
use crate::error::CoreError;
use crate::types::{ProfessionName, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const FACTION_ALLIANCE: &str = "alliance";
pub const FACTION_HORDE: &str = "horde";
pub const VALID_FACTIONS: &[&str] = &[FACTION_ALLIANCE, FACTION_HORDE];

/// Maximum length of a character or server name.
pub const MAX_NAME_LENGTH: usize = 64;

/// Highest level accepted on a character.
pub const MAX_LEVEL: u32 = 80;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A character profile and the recipes it knows, keyed by profession.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawCharacterDocument")]
pub struct CharacterDocument {
    pub share_id: String,
    pub name: String,
    pub server: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Whether the character appears in public listings.
    pub public: bool,
    pub professions: BTreeMap<ProfessionName, Vec<CraftRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl CharacterDocument {
    /// The `name-server` key used to detect duplicate characters.
    pub fn natural_key(&self) -> String {
        natural_key(&self.name, &self.server)
    }

    /// Total number of craft records across all professions.
    pub fn craft_count(&self) -> usize {
        self.professions.values().map(Vec::len).sum()
    }

    /// Replace one profession's list, dropping the profession when empty.
    pub fn replace_profession(&mut self, profession: &str, crafts: Vec<CraftRecord>) {
        if crafts.is_empty() {
            self.professions.remove(profession);
        } else {
            self.professions.insert(profession.to_string(), crafts);
        }
    }
}

/// Build the `name-server` natural key.
pub fn natural_key(name: &str, server: &str) -> String {
    format!("{name}-{server}")
}

/// Boundary shape accepting historical field spellings.
///
/// Every spelling has its own slot so a document carrying two of them
/// (`id` and `shareId`, `public` and `isPublic`) still loads. The first
/// non-empty spelling wins, in declaration order.
#[derive(Debug, Deserialize)]
pub struct RawCharacterDocument {
    #[serde(default, rename = "shareId")]
    share_id_camel: Option<String>,
    #[serde(default)]
    share_id: Option<String>,
    #[serde(default, rename = "shareid")]
    share_id_lower: Option<String>,
    #[serde(default)]
    id: Option<String>,

    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    server: Option<String>,
    #[serde(default)]
    realm: Option<String>,
    #[serde(default)]
    level: Option<u32>,
    #[serde(default)]
    faction: Option<String>,
    #[serde(default)]
    class: Option<String>,
    #[serde(default, rename = "className")]
    class_name_camel: Option<String>,
    #[serde(default)]
    class_name: Option<String>,

    #[serde(default)]
    public: Option<bool>,
    #[serde(default, rename = "isPublic")]
    is_public_camel: Option<bool>,
    #[serde(default)]
    is_public: Option<bool>,

    #[serde(default)]
    professions: BTreeMap<ProfessionName, Vec<CraftRecord>>,
    #[serde(default, rename = "createdAt")]
    created_at_camel: Option<Timestamp>,
    #[serde(default)]
    created_at: Option<Timestamp>,
    #[serde(default, rename = "updatedAt")]
    updated_at_camel: Option<Timestamp>,
    #[serde(default)]
    updated_at: Option<Timestamp>,
}

impl From<RawCharacterDocument> for CharacterDocument {
    fn from(raw: RawCharacterDocument) -> Self {
        Self {
            share_id: first_non_empty([
                raw.share_id_camel,
                raw.share_id,
                raw.share_id_lower,
                raw.id,
            ])
            .unwrap_or_default(),
            name: first_non_empty([raw.name]).unwrap_or_default(),
            server: first_non_empty([raw.server, raw.realm]).unwrap_or_default(),
            level: raw.level,
            faction: first_non_empty([raw.faction]).map(|f| f.to_lowercase()),
            class: first_non_empty([raw.class, raw.class_name_camel, raw.class_name]),
            public: raw
                .public
                .or(raw.is_public_camel)
                .or(raw.is_public)
                .unwrap_or(false),
            professions: raw.professions,
            created_at: raw.created_at_camel.or(raw.created_at),
            updated_at: raw.updated_at_camel.or(raw.updated_at),
        }
    }
}

// ---------------------------------------------------------------------------
// Creation input
// ---------------------------------------------------------------------------

/// Client-supplied fields for a new character.
#[derive(Debug, Clone, Deserialize)]
pub struct CharacterDraft {
    pub name: String,
    pub server: String,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub faction: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default, alias = "isPublic")]
    pub public: bool,
}

impl CharacterDraft {
    /// Check required fields and value ranges.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_name("name", &self.name)?;
        validate_name("server", &self.server)?;
        if let Some(level) = self.level {
            if level == 0 || level > MAX_LEVEL {
                return Err(CoreError::Validation(format!(
                    "level must be between 1 and {MAX_LEVEL}, got {level}"
                )));
            }
        }
        if let Some(faction) = &self.faction {
            let lowered = faction.to_lowercase();
            if !VALID_FACTIONS.contains(&lowered.as_str()) {
                return Err(CoreError::Validation(format!(
                    "Invalid faction '{faction}'. Must be one of: {}",
                    VALID_FACTIONS.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Turn a validated draft into an empty document.
    pub fn into_document(self, share_id: String, now: Timestamp) -> CharacterDocument {
        CharacterDocument {
            share_id,
            name: self.name.trim().to_string(),
            server: self.server.trim().to_string(),
            level: self.level,
            faction: self.faction.map(|f| f.to_lowercase()),
            class: self.class,
            public: self.public,
            professions: BTreeMap::new(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

fn validate_name(field: &str, value: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a profession name from a path or import heading.
pub fn validate_profession(profession: &str) -> Result<(), CoreError> {
    validate_name("profession", profession)
}
