//! Handlers for per-user notification settings.

use axum::extract::{Path, State};
use axum::Json;
use qa_relay_core::error::CoreError;
use qa_relay_core::user_config::{validate_user_config, UserNotificationConfig};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users/{user_id}/notification-config
///
/// Served through the cache; 404 when the user never saved settings.
pub async fn get_user_config(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<DataResponse<UserNotificationConfig>>> {
    let config = state
        .store()
        .get(&user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "UserNotificationConfig",
            id: user_id,
        })?;

    Ok(Json(DataResponse { data: config }))
}

/// PUT /api/v1/users/{user_id}/notification-config
///
/// Validate, persist through the backend, then refresh the cached entry so
/// the next event for this user sees the new settings.
pub async fn update_user_config(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<UserNotificationConfig>,
) -> AppResult<Json<DataResponse<UserNotificationConfig>>> {
    validate_user_config(&input)?;

    let store = state.store();
    let saved = store.backend().save_user_config(&user_id, &input).await?;
    store.update(&user_id, Some(saved.clone())).await;

    tracing::info!(user_id = %user_id, "Notification config updated");
    Ok(Json(DataResponse { data: saved }))
}
