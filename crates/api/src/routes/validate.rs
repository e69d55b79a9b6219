use axum::Json;
use sched_core::validate;
use serde::Serialize;
use types::Snapshot;

#[derive(Serialize, utoipa::ToSchema)]
pub struct ValidationReport {
    pub ok: bool,
    pub errors: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/v1/validate",
    request_body = Snapshot,
    responses(
    (status = 200, description = "Validation result", body = ValidationReport)
    )
)]
pub async fn validate_handler(Json(snap): Json<Snapshot>) -> Json<ValidationReport> {
    match validate(&snap) {
        Ok(()) => Json(ValidationReport { ok: true, errors: vec![] }),
        Err(e) => Json(ValidationReport {
            ok: false,
            errors: e.messages().to_vec(),
        }),
    }
}
