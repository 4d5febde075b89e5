//! Handlers for the global notification switch.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::response::DataResponse;
use crate::state::AppState;

/// Global delivery settings.
#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub enabled: bool,
}

/// GET /api/v1/admin/notification-settings
pub async fn get_settings(State(state): State<AppState>) -> Json<DataResponse<NotificationSettings>> {
    Json(DataResponse {
        data: NotificationSettings {
            enabled: state.dispatcher.is_enabled(),
        },
    })
}

/// PUT /api/v1/admin/notification-settings
///
/// Takes effect for the next event; no restart needed.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(input): Json<NotificationSettings>,
) -> Json<DataResponse<NotificationSettings>> {
    state.dispatcher.set_enabled(input.enabled);
    Json(DataResponse {
        data: NotificationSettings {
            enabled: state.dispatcher.is_enabled(),
        },
    })
}
