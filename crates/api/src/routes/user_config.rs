//! Route definitions for per-user notification settings.

use axum::routing::get;
use axum::Router;

use crate::handlers::user_config;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /{user_id}/notification-config   -> get_user_config
/// PUT    /{user_id}/notification-config   -> update_user_config
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{user_id}/notification-config",
        get(user_config::get_user_config).put(user_config::update_user_config),
    )
}
