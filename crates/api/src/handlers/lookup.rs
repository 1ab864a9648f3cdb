use axum::extract::{Query, State};
use axum::Json;
use craftbook_core::error::CoreError;
use craftbook_wowhead::{lookup, LookupResult};
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    pub url: String,
}

/// GET /api/v1/lookup?url=
///
/// Resolve the recipe/item counterpart of one URL plus its display name
/// and icon.
pub async fn lookup_url(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> AppResult<Json<DataResponse<LookupResult>>> {
    let result = lookup(
        state.resolver.as_ref(),
        state.metadata.as_ref(),
        &state.config.wowhead.defaults,
        params.url.trim(),
    )
    .await
    .ok_or_else(|| {
        CoreError::Validation(format!("'{}' is not a recipe or item URL", params.url))
    })?;

    Ok(Json(DataResponse { data: result }))
}
