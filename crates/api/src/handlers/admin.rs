//! Handlers for store administration.
//!
//! Destructive operations require the configured confirmation code. This
//! guards against accidents only; it is not access control.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use craftbook_core::admin::check_confirm_code;
use craftbook_core::cleanup::Lifetime;
use craftbook_core::error::CoreError;
use craftbook_core::types::Timestamp;
use craftbook_db::keys::DEFAULT_SCAN_PAGE_SIZE;
use craftbook_db::maintenance::{self, CleanupReport};
use craftbook_db::repositories::{CharacterRepo, StoredCharacter};
use craftbook_db::scan::scan_keys;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::query::ConfirmParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Lifetime filter for the admin listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifetimeFilter {
    Permanent,
    Temporary,
}

/// Query parameters for `GET /admin/characters`.
#[derive(Debug, Default, Deserialize)]
pub struct CharacterFilter {
    /// Case-insensitive substring of the character name.
    pub search: Option<String>,
    /// Exact server name, case-insensitive.
    pub server: Option<String>,
    pub public: Option<bool>,
    pub lifetime: Option<LifetimeFilter>,
}

impl CharacterFilter {
    fn matches(&self, stored: &StoredCharacter) -> bool {
        let doc = &stored.document;
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            if !doc.name.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        if let Some(server) = self.server.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            if !doc.server.eq_ignore_ascii_case(server) {
                return false;
            }
        }
        if self.public.is_some_and(|p| p != doc.public) {
            return false;
        }
        match self.lifetime {
            Some(LifetimeFilter::Permanent) => stored.lifetime.is_permanent(),
            Some(LifetimeFilter::Temporary) => !stored.lifetime.is_permanent(),
            None => true,
        }
    }
}

/// One row of the admin character listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSummary {
    pub share_id: String,
    pub name: String,
    pub server: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
    pub public: bool,
    pub craft_count: usize,
    pub lifetime: Lifetime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl From<StoredCharacter> for CharacterSummary {
    fn from(stored: StoredCharacter) -> Self {
        let craft_count = stored.document.craft_count();
        let doc = stored.document;
        Self {
            share_id: doc.share_id,
            name: doc.name,
            server: doc.server,
            faction: doc.faction,
            public: doc.public,
            craft_count,
            lifetime: stored.lifetime,
            updated_at: doc.updated_at,
        }
    }
}

/// Query parameters for `GET /admin/keys`.
#[derive(Debug, Default, Deserialize)]
pub struct KeysParams {
    pub pattern: Option<String>,
}

/// One stored key with its lifetime.
#[derive(Debug, Serialize)]
pub struct KeyInfo {
    pub key: String,
    pub lifetime: Lifetime,
}

/// GET /api/v1/admin/characters?search=&server=&public=&lifetime=
///
/// List every stored character matching all given filters.
pub async fn list_characters(
    State(state): State<AppState>,
    Query(filter): Query<CharacterFilter>,
) -> AppResult<Json<DataResponse<Vec<CharacterSummary>>>> {
    let listing = CharacterRepo::list_all(state.store.as_ref()).await?;
    let rows = listing
        .characters
        .into_iter()
        .filter(|c| filter.matches(c))
        .map(CharacterSummary::from)
        .collect();
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/admin/keys?pattern=
///
/// Raw key listing. The pattern is a store glob and defaults to `*`.
pub async fn list_keys(
    State(state): State<AppState>,
    Query(params): Query<KeysParams>,
) -> AppResult<Json<DataResponse<Vec<KeyInfo>>>> {
    let pattern = params
        .pattern
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or("*");

    let store = state.store.as_ref();
    let mut rows = Vec::new();
    for key in scan_keys(store, pattern, DEFAULT_SCAN_PAGE_SIZE).await? {
        let lifetime = store.ttl(&key).await?;
        rows.push(KeyInfo { key, lifetime });
    }
    Ok(Json(DataResponse { data: rows }))
}

/// DELETE /api/v1/admin/characters/{share_id}?confirm_code=
///
/// Delete one character. Returns 403 on a missing or wrong code, 404 when
/// the character does not exist.
pub async fn delete_character(
    State(state): State<AppState>,
    Path(share_id): Path<String>,
    Query(params): Query<ConfirmParams>,
) -> AppResult<StatusCode> {
    check_confirm_code(
        params.confirm_code.as_deref(),
        &state.config.admin_confirm_code,
    )?;

    if CharacterRepo::delete(state.store.as_ref(), &share_id).await? {
        tracing::info!(share_id = %share_id, "Character deleted by admin");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id: share_id,
        }))
    }
}

/// POST /api/v1/admin/cleanup?confirm_code=
///
/// Delete duplicate characters, keeping one per `name-server`.
pub async fn run_cleanup(
    State(state): State<AppState>,
    Query(params): Query<ConfirmParams>,
) -> AppResult<Json<DataResponse<CleanupReport>>> {
    check_confirm_code(
        params.confirm_code.as_deref(),
        &state.config.admin_confirm_code,
    )?;

    let report =
        maintenance::run_cleanup(state.store.as_ref(), state.config.cleanup_tie_break).await?;
    Ok(Json(DataResponse { data: report }))
}
