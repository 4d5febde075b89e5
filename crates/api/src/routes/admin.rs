use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /notification-settings   -> get_settings
/// PUT    /notification-settings   -> update_settings
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/notification-settings",
        get(admin::get_settings).put(admin::update_settings),
    )
}
