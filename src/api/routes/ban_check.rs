//! Ban check handler: GET|POST /api/check.

use super::{BanCheckResponse, CHECK_BANNED_ACTION, CheckQuery};
use crate::api::AppState;
use crate::error::{BanCheckError, Error};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// GET|POST /api/check - Look up a player's ban status
///
/// The player ID is validated before the action, so a request without `id`
/// is always answered with `player_id_required`.
#[utoipa::path(
    get,
    path = "/api/check",
    tag = "ban-check",
    params(CheckQuery),
    responses(
        (status = 200, description = "Ban status of the player", body = BanCheckResponse),
        (status = 400, description = "Missing player ID or unsupported action", body = crate::error::ApiError),
        (status = 500, description = "Upstream ban-status service failed", body = crate::error::ApiError)
    )
)]
pub async fn check_ban(State(state): State<AppState>, Query(query): Query<CheckQuery>) -> Response {
    let player_id = match query.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => return Error::BanCheck(BanCheckError::MissingPlayerId).into_response(),
    };

    match query.check.as_deref() {
        Some(CHECK_BANNED_ACTION) => {}
        other => {
            return Error::InvalidAction(other.unwrap_or_default().to_string()).into_response();
        }
    }

    match state.hub.check_ban(&player_id).await {
        Ok(status) => (StatusCode::OK, Json(BanCheckResponse::from(status))).into_response(),
        Err(e) => e.into_response(),
    }
}
