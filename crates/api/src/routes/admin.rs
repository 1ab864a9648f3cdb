//! Route definitions for store administration.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /characters                 -> list_characters
/// DELETE /characters/{share_id}      -> delete_character
/// GET    /keys                       -> list_keys
/// POST   /cleanup                    -> run_cleanup
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/characters", get(admin::list_characters))
        .route("/characters/{share_id}", delete(admin::delete_character))
        .route("/keys", get(admin::list_keys))
        .route("/cleanup", post(admin::run_cleanup))
}
