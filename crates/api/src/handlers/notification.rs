//! Handlers for the `/notifications` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use qa_relay_core::error::CoreError;
use qa_relay_core::event::NotificationEvent;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/notifications
///
/// Intake for host-emitted events. Runs the pipeline to completion and
/// answers 202 whether or not a webhook was posted; per-user failures are
/// logged, never surfaced to the emitter.
pub async fn receive_notification(
    State(state): State<AppState>,
    Json(event): Json<NotificationEvent>,
) -> AppResult<StatusCode> {
    if event.receiver_user_id.trim().is_empty() {
        return Err(CoreError::Validation("receiver_user_id must not be empty".into()).into());
    }

    state.dispatcher.notify(&event).await;
    Ok(StatusCode::ACCEPTED)
}

/// GET /api/v1/notifications/subscribers/new-question
///
/// User ids with `all_new_questions` enabled, sorted.
pub async fn list_new_question_subscribers(
    State(state): State<AppState>,
) -> Json<DataResponse<Vec<String>>> {
    let data = state.dispatcher.list_new_question_subscribers().await;
    Json(DataResponse { data })
}
