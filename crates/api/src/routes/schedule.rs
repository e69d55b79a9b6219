use crate::{error::ApiError, state::AppState};
use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use store::ClassSchedule;
use tracing::{info, warn};
use types::{AllocatorKind, Assignment, ClassId, GenerateParams, GenerateResult, OverrideRequest};
use utoipa::{IntoParams, ToSchema};

/// Every field falls back to the server's configured default.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GenerateIn {
    pub allocator: Option<AllocatorKind>,
    pub seed: Option<u64>,
}

impl GenerateIn {
    pub fn resolve(self, defaults: GenerateParams) -> GenerateParams {
        GenerateParams {
            allocator: self.allocator.unwrap_or(defaults.allocator),
            seed: self.seed.unwrap_or(defaults.seed),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScheduleQuery {
    /// Only this class.
    pub class_id: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct Cleared {
    pub cleared: usize,
}

/// Regenerates the whole timetable. The run holds the store's write lock on
/// the blocking pool. On timeout the caller gets 503, but the run cannot be
/// cancelled: it still finishes and its result replaces the committed
/// timetable.
#[utoipa::path(
    post,
    path = "/v1/schedule/generate",
    request_body(content = GenerateIn, description = "Optional; empty body uses server defaults"),
    responses(
        (status = 200, description = "Generated timetable", body = GenerateResult),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 503, description = "Generation timed out; the run still commits when it finishes", body = crate::error::ErrorBody)
    )
)]
pub async fn generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResult>, ApiError> {
    let params: GenerateIn = if body.iter().all(u8::is_ascii_whitespace) {
        GenerateIn::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::bad_request(e.to_string()))?
    };
    let GenerateParams { allocator: kind, seed } = params.resolve(state.config.solver.params());
    let allocator = state.allocators.pick(kind);
    let store = state.store.clone();
    let limit = Duration::from_secs(state.config.solver.timeout_secs);

    let run = tokio::task::spawn_blocking(move || store.generate(allocator.as_ref(), seed));
    let res = match tokio::time::timeout(limit, run).await {
        Ok(joined) => joined.map_err(|e| ApiError::internal(format!("generation task failed: {e}")))??,
        Err(_) => {
            warn!(?kind, seed, secs = limit.as_secs(), "generation timed out");
            return Err(ApiError::new(
                http::StatusCode::SERVICE_UNAVAILABLE,
                format!("generation did not finish within {}s", limit.as_secs()),
            ));
        }
    };
    info!(?kind, seed, placed = res.stats.placed, needed = res.stats.needed, "generate served");
    Ok(Json(res))
}

#[utoipa::path(
    get,
    path = "/v1/schedule",
    params(ScheduleQuery),
    responses((status = 200, description = "Committed timetable grouped by class", body = [ClassSchedule]))
)]
pub async fn view(
    State(state): State<AppState>,
    Query(q): Query<ScheduleQuery>,
) -> Json<Vec<ClassSchedule>> {
    Json(state.store.schedule(q.class_id.map(ClassId)))
}

#[utoipa::path(
    post,
    path = "/v1/schedule/clear",
    responses((status = 200, description = "Assignments discarded", body = Cleared))
)]
pub async fn clear(State(state): State<AppState>) -> Json<Cleared> {
    Json(Cleared {
        cleared: state.store.clear(),
    })
}

#[utoipa::path(
    post,
    path = "/v1/schedule/override",
    request_body = OverrideRequest,
    responses(
        (status = 200, description = "Cell replaced", body = Assignment),
        (status = 400, description = "No such cell or unknown entity", body = crate::error::ErrorBody),
        (status = 409, description = "Teacher or room already booked", body = crate::error::ErrorBody)
    )
)]
pub async fn override_slot(
    State(state): State<AppState>,
    Json(req): Json<OverrideRequest>,
) -> Result<Json<Assignment>, ApiError> {
    Ok(Json(state.store.override_slot(&req)?))
}
