//! Stateless batch enrichment.

use axum::extract::State;
use axum::Json;
use craftbook_core::craft::CraftRecord;
use craftbook_core::enrichment::{enrich_records, EnrichmentOutcome};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Largest batch accepted by `POST /enrich`.
pub const MAX_BATCH_SIZE: usize = 500;

/// Request body for `POST /enrich`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichRequest {
    pub records: Vec<CraftRecord>,
    #[serde(default, alias = "dry_run")]
    pub dry_run: bool,
}

/// POST /api/v1/enrich
///
/// Enrich client-supplied records. Nothing is read from or written to the
/// store; `dryRun` is echoed back.
pub async fn enrich_batch(
    State(state): State<AppState>,
    Json(input): Json<EnrichRequest>,
) -> AppResult<Json<DataResponse<EnrichmentOutcome>>> {
    if input.records.len() > MAX_BATCH_SIZE {
        return Err(AppError::BadRequest(format!(
            "At most {MAX_BATCH_SIZE} records per batch"
        )));
    }

    let outcome = enrich_records(
        state.resolver.as_ref(),
        input.records,
        input.dry_run,
        state.config.enrich_concurrency,
    )
    .await;
    Ok(Json(DataResponse { data: outcome }))
}
