//! Stateless enrichment and lookup routes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{enrichment, lookup};
use crate::state::AppState;

/// Routes merged at the `/api/v1` root.
///
/// ```text
/// POST   /enrich          -> enrichment::enrich_batch
/// GET    /lookup?url=     -> lookup::lookup_url
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/enrich", post(enrichment::enrich_batch))
        .route("/lookup", get(lookup::lookup_url))
}
