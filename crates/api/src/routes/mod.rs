pub mod admin;
pub mod characters;
pub mod community;
pub mod enrichment;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /characters                                       create (POST)
/// /characters/{share_id}                            shared read-only view (GET)
/// /characters/{share_id}/professions/{profession}   replace crafts (PUT)
/// /characters/{share_id}/import                     markdown import (POST)
/// /characters/{share_id}/enrich                     enrich, persist unless dry run (POST)
///
/// /community/crafts                                 list, append (GET, POST; ?suffix=)
/// /community/crafts/enrich                          enrich community list (POST)
///
/// /enrich                                           stateless batch enrichment (POST)
/// /lookup                                           resolve one URL (GET ?url=)
///
/// /admin/characters                                 filtered listing (GET)
/// /admin/characters/{share_id}                      delete (DELETE ?confirm_code=)
/// /admin/keys                                       raw key listing (GET ?pattern=)
/// /admin/cleanup                                    duplicate cleanup (POST ?confirm_code=)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/characters", characters::router())
        .nest("/community", community::router())
        .nest("/admin", admin::router())
        .merge(enrichment::router())
}
