//! Route definitions for the `/characters` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::characters;
use crate::state::AppState;

/// Routes mounted at `/characters`.
///
/// ```text
/// POST   /                                    -> create
/// GET    /{share_id}                          -> get_shared
/// PUT    /{share_id}/professions/{profession} -> replace_profession
/// POST   /{share_id}/import                   -> import_markdown
/// POST   /{share_id}/enrich                   -> enrich
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(characters::create))
        .route("/{share_id}", get(characters::get_shared))
        .route(
            "/{share_id}/professions/{profession}",
            put(characters::replace_profession),
        )
        .route("/{share_id}/import", post(characters::import_markdown))
        .route("/{share_id}/enrich", post(characters::enrich))
}
