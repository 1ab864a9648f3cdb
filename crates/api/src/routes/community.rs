//! Route definitions for the shared community craft lists.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::community;
use crate::state::AppState;

/// Routes mounted at `/community`.
///
/// ```text
/// GET    /crafts?suffix=          -> list
/// POST   /crafts?suffix=          -> append
/// POST   /crafts/enrich?suffix=   -> enrich
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/crafts", get(community::list).post(community::append))
        .route("/crafts/enrich", post(community::enrich))
}
