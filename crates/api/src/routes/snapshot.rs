use crate::{error::ApiError, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use types::Snapshot;

#[utoipa::path(
    put,
    path = "/v1/snapshot",
    request_body = Snapshot,
    responses(
        (status = 204, description = "Snapshot loaded, previous assignments dropped"),
        (status = 400, description = "Snapshot rejected", body = crate::error::ErrorBody)
    )
)]
pub async fn put_snapshot(
    State(state): State<AppState>,
    Json(snapshot): Json<Snapshot>,
) -> Result<StatusCode, ApiError> {
    state.store.load(snapshot)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/v1/snapshot",
    responses((status = 200, description = "Currently loaded snapshot", body = Snapshot))
)]
pub async fn get_snapshot(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.store.snapshot())
}
