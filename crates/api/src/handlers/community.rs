//! Handlers for the shared community craft lists.

use axum::extract::{Query, State};
use axum::Json;
use craftbook_core::craft::CraftRecord;
use craftbook_core::error::CoreError;
use craftbook_db::keys::is_valid_suffix;
use craftbook_db::maintenance::{self, CommunityEnrichment};
use craftbook_db::repositories::CommunityRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::query::{DryRunParams, SuffixParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /community/crafts`.
#[derive(Debug, Deserialize)]
pub struct AppendCraftsRequest {
    pub crafts: Vec<CraftRecord>,
}

/// Response body for `POST /community/crafts`.
#[derive(Debug, Serialize)]
pub struct AppendSummary {
    pub added: usize,
    pub crafts: Vec<CraftRecord>,
}

/// GET /api/v1/community/crafts?suffix=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SuffixParams>,
) -> AppResult<Json<DataResponse<Vec<CraftRecord>>>> {
    let suffix = suffix(&params)?;
    let crafts = CommunityRepo::get(state.store.as_ref(), suffix).await?;
    Ok(Json(DataResponse { data: crafts }))
}

/// POST /api/v1/community/crafts?suffix=
///
/// Append crafts to a community list; exact duplicates are skipped.
pub async fn append(
    State(state): State<AppState>,
    Query(params): Query<SuffixParams>,
    Json(input): Json<AppendCraftsRequest>,
) -> AppResult<Json<DataResponse<AppendSummary>>> {
    let suffix = suffix(&params)?;
    if input.crafts.iter().any(|c| c.name.trim().is_empty()) {
        return Err(CoreError::Validation("Every craft needs a name".into()).into());
    }

    let (added, crafts) = CommunityRepo::append(state.store.as_ref(), suffix, input.crafts).await?;
    tracing::info!(suffix, added, "Community crafts appended");

    Ok(Json(DataResponse {
        data: AppendSummary { added, crafts },
    }))
}

/// POST /api/v1/community/crafts/enrich?suffix=&dry_run=
pub async fn enrich(
    State(state): State<AppState>,
    Query(params): Query<SuffixParams>,
    Query(dry_run): Query<DryRunParams>,
) -> AppResult<Json<DataResponse<CommunityEnrichment>>> {
    let suffix = suffix(&params)?;
    let result = maintenance::enrich_community(
        state.store.as_ref(),
        state.resolver.as_ref(),
        suffix,
        dry_run.dry_run,
        state.config.enrich_concurrency,
    )
    .await?;
    Ok(Json(DataResponse { data: result }))
}

/// The validated, non-empty suffix of a request.
fn suffix(params: &SuffixParams) -> AppResult<Option<&str>> {
    match params.suffix.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if is_valid_suffix(s) => Ok(Some(s)),
        Some(s) => Err(CoreError::Validation(format!("Invalid list suffix '{s}'")).into()),
    }
}
