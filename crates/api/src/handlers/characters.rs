//! Handlers for the `/characters` resource.
//!
//! A character is addressed only by its share id; whoever holds the id can
//! read the character. Characters are created temporary (configured TTL)
//! unless the client asks for a permanent one.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use craftbook_core::character::{validate_profession, CharacterDocument, CharacterDraft};
use craftbook_core::craft::CraftRecord;
use craftbook_core::error::CoreError;
use craftbook_core::import::parse_markdown_crafts;
use craftbook_core::share_id::{generate_share_id, is_valid_share_id};
use craftbook_core::types::ProfessionName;
use craftbook_db::maintenance::{self, CharacterEnrichment};
use craftbook_db::repositories::CharacterRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::query::DryRunParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Attempts at drawing an unused share id before giving up.
const MAX_SHARE_ID_ATTEMPTS: usize = 5;

/// Profession used for imported items listed before any heading.
const DEFAULT_IMPORT_PROFESSION: &str = "Divers";

/// Request body for `POST /characters`.
#[derive(Debug, Deserialize)]
pub struct CreateCharacterRequest {
    #[serde(flatten)]
    pub draft: CharacterDraft,
    /// Store without expiration.
    #[serde(default)]
    pub permanent: bool,
    #[serde(default)]
    pub professions: BTreeMap<ProfessionName, Vec<CraftRecord>>,
}

/// Response body for `POST /characters`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCharacter {
    pub share_id: String,
    /// Seconds until expiry; absent for permanent characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_secs: Option<u64>,
    pub character: CharacterDocument,
}

/// Request body for `PUT /characters/{share_id}/professions/{profession}`.
#[derive(Debug, Deserialize)]
pub struct ReplaceProfessionRequest {
    pub crafts: Vec<CraftRecord>,
}

/// Request body for `POST /characters/{share_id}/import`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub markdown: String,
    /// Section for items listed before the first heading.
    #[serde(default)]
    pub default_profession: Option<String>,
    /// Replace the imported professions instead of appending to them.
    #[serde(default)]
    pub replace: bool,
}

/// Response body for `POST /characters/{share_id}/import`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
    pub professions: Vec<ProfessionName>,
    pub character: CharacterDocument,
}

/// POST /api/v1/characters
///
/// Create a character and return its new share id.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCharacterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedCharacter>>)> {
    input.draft.validate()?;
    for profession in input.professions.keys() {
        validate_profession(profession)?;
    }

    let ttl = (!input.permanent).then_some(state.config.character_ttl_secs);
    let now = Utc::now();

    for _ in 0..MAX_SHARE_ID_ATTEMPTS {
        let share_id = generate_share_id();
        let mut document = input.draft.clone().into_document(share_id.clone(), now);
        for (profession, crafts) in &input.professions {
            document.replace_profession(profession, crafts.clone());
        }

        if CharacterRepo::create_if_absent(state.store.as_ref(), &document, ttl).await? {
            tracing::info!(share_id = %share_id, permanent = input.permanent, "Character created");
            return Ok((
                StatusCode::CREATED,
                Json(DataResponse {
                    data: CreatedCharacter {
                        share_id,
                        expires_in_secs: ttl,
                        character: document,
                    },
                }),
            ));
        }
        tracing::debug!(share_id = %share_id, "Share id collision, retrying");
    }

    tracing::warn!(attempts = MAX_SHARE_ID_ATTEMPTS, "Share id space exhausted");
    Err(AppError::Core(CoreError::Conflict(
        "Could not allocate a unique share id".into(),
    )))
}

/// GET /api/v1/characters/{share_id}
///
/// Read-only shared view of a character.
pub async fn get_shared(
    State(state): State<AppState>,
    Path(share_id): Path<String>,
) -> AppResult<Json<DataResponse<CharacterDocument>>> {
    let document = load(&state, &share_id).await?;
    Ok(Json(DataResponse { data: document }))
}

/// PUT /api/v1/characters/{share_id}/professions/{profession}
///
/// Replace one profession's craft list. An empty list removes the
/// profession.
pub async fn replace_profession(
    State(state): State<AppState>,
    Path((share_id, profession)): Path<(String, String)>,
    Json(input): Json<ReplaceProfessionRequest>,
) -> AppResult<Json<DataResponse<CharacterDocument>>> {
    validate_profession(&profession)?;
    let mut document = load(&state, &share_id).await?;

    document.replace_profession(profession.trim(), input.crafts);
    save(&state, &mut document).await?;

    Ok(Json(DataResponse { data: document }))
}

/// POST /api/v1/characters/{share_id}/import
///
/// Import a markdown link list. Each heading opens a profession; by
/// default imported crafts are appended, skipping exact duplicates.
pub async fn import_markdown(
    State(state): State<AppState>,
    Path(share_id): Path<String>,
    Json(input): Json<ImportRequest>,
) -> AppResult<Json<DataResponse<ImportSummary>>> {
    let default_profession = input
        .default_profession
        .as_deref()
        .unwrap_or(DEFAULT_IMPORT_PROFESSION);
    let sections = parse_markdown_crafts(&input.markdown, default_profession);
    if sections.is_empty() {
        return Err(AppError::BadRequest(
            "No craft links found in the imported text".into(),
        ));
    }
    for profession in sections.keys() {
        validate_profession(profession)?;
    }

    let mut document = load(&state, &share_id).await?;
    let mut imported = 0;
    let professions: Vec<ProfessionName> = sections.keys().cloned().collect();

    for (profession, crafts) in sections {
        if input.replace {
            imported += crafts.len();
            document.replace_profession(&profession, crafts);
            continue;
        }
        let list = document.professions.entry(profession).or_default();
        for craft in crafts {
            if !list.contains(&craft) {
                list.push(craft);
                imported += 1;
            }
        }
    }

    save(&state, &mut document).await?;
    tracing::info!(share_id = %share_id, imported, "Markdown imported");

    Ok(Json(DataResponse {
        data: ImportSummary {
            imported,
            professions,
            character: document,
        },
    }))
}

/// POST /api/v1/characters/{share_id}/enrich?dry_run=
///
/// Fill missing recipe/item links. With `dry_run=true` the enriched
/// document is returned but not stored.
pub async fn enrich(
    State(state): State<AppState>,
    Path(share_id): Path<String>,
    Query(params): Query<DryRunParams>,
) -> AppResult<Json<DataResponse<CharacterEnrichment>>> {
    check_share_id(&share_id)?;
    let result = maintenance::enrich_character(
        state.store.as_ref(),
        state.resolver.as_ref(),
        &share_id,
        params.dry_run,
        state.config.enrich_concurrency,
    )
    .await?
    .ok_or_else(|| not_found(&share_id))?;

    Ok(Json(DataResponse { data: result }))
}

// ---- private helpers ----

fn check_share_id(share_id: &str) -> AppResult<()> {
    if is_valid_share_id(share_id) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "Invalid share id '{share_id}'"
        ))))
    }
}

fn not_found(share_id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Character",
        id: share_id.to_string(),
    })
}

async fn load(state: &AppState, share_id: &str) -> AppResult<CharacterDocument> {
    check_share_id(share_id)?;
    CharacterRepo::find(state.store.as_ref(), share_id)
        .await?
        .ok_or_else(|| not_found(share_id))
}

/// Write back an edited document, keeping its lifetime.
async fn save(state: &AppState, document: &mut CharacterDocument) -> AppResult<()> {
    document.updated_at = Some(Utc::now());
    if CharacterRepo::update(state.store.as_ref(), document).await? {
        Ok(())
    } else {
        Err(not_found(&document.share_id))
    }
}
