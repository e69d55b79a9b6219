pub mod config;
pub mod error;
pub mod state;
pub mod telemetry;
pub mod routes {
    pub mod audit;
    pub mod health;
    pub mod schedule;
    pub mod snapshot;
    pub mod validate;
}

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            routes::health::health,
            routes::snapshot::put_snapshot,
            routes::snapshot::get_snapshot,
            routes::validate::validate_handler,
            routes::schedule::generate,
            routes::schedule::view,
            routes::schedule::clear,
            routes::schedule::override_slot,
            routes::audit::audit_handler,
        ),
        components(schemas(
            types::Snapshot, types::Teacher, types::Subject, types::Qualification,
            types::ClassGroup, types::Room, types::TimeSlot, types::SubjectRequirement,
            types::Assignment, types::AllocatorKind,
            types::GenerateResult, types::GenerateStatus, types::Stats, types::UnmetDemand,
            types::OverrideRequest, types::Violation, types::TeacherId, types::SubjectId,
            types::ClassId, types::RoomId, types::TimeslotId,
            store::ClassSchedule, store::ScheduleEntry,
            error::ErrorBody,
            routes::validate::ValidationReport,
            routes::schedule::GenerateIn,
            routes::schedule::Cleared,
            routes::audit::AuditIn,
            routes::audit::AuditOut,
            routes::audit::Repeats
        )),
        tags(
            (name = "timetable", description = "School timetable API")
        )
    )]
pub struct ApiDoc;

pub fn app(app_state: state::AppState) -> Router {
    let body_limit = app_state.config.server.body_limit;
    Router::new()
        .route("/v1/health", get(routes::health::health))
        .route(
            "/v1/snapshot",
            get(routes::snapshot::get_snapshot).put(routes::snapshot::put_snapshot),
        )
        .route("/v1/validate", post(routes::validate::validate_handler))
        .route("/v1/schedule", get(routes::schedule::view))
        .route("/v1/schedule/generate", post(routes::schedule::generate))
        .route("/v1/schedule/clear", post(routes::schedule::clear))
        .route("/v1/schedule/override", post(routes::schedule::override_slot))
        .route("/v1/audit", post(routes::audit::audit_handler))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::disable())
        .layer(telemetry::stack(body_limit))
        .with_state(app_state)
}
