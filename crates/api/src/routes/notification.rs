//! Route definitions for the `/notifications` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// POST   /                            -> receive_notification
/// GET    /subscribers/new-question    -> list_new_question_subscribers
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(notification::receive_notification))
        .route(
            "/subscribers/new-question",
            get(notification::list_new_question_subscribers),
        )
}
