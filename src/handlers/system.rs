// ---------------------------------------------------------------------------
// handlers/system.rs -- GET / status message
// ---------------------------------------------------------------------------

use axum::Json;

use crate::models::StatusResponse;

pub const STATUS_MESSAGE: &str = "Mood journal server is running.";

/// GET / -- liveness message.
#[utoipa::path(get, path = "/", tag = "system",
    responses((status = 200, description = "Server is up", body = StatusResponse))
)]
pub async fn home() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: STATUS_MESSAGE.to_string(),
    })
}
