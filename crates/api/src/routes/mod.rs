pub mod admin;
pub mod health;
pub mod notification;
pub mod user_config;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /notifications                                   event intake, subscriber query
/// /users/{user_id}/notification-config             per-user settings
/// /admin/notification-settings                     global switch
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/notifications", notification::router())
        .nest("/users", user_config::router())
        .nest("/admin", admin::router())
}
