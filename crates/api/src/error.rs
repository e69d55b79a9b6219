use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use sched_core::{OverrideError, ScheduleError, ValidationError};
use serde::Serialize;
use tracing::error;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Vec<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "invalid snapshot".into(),
            details: e.messages().to_vec(),
        }
    }
}

impl From<OverrideError> for ApiError {
    fn from(e: OverrideError) -> Self {
        let status = match e {
            OverrideError::InvalidTarget { .. } | OverrideError::UnknownEntity { .. } => {
                StatusCode::BAD_REQUEST
            }
            OverrideError::TeacherConflict { .. } | OverrideError::RoomConflict { .. } => {
                StatusCode::CONFLICT
            }
            OverrideError::Invariant(ref inner) => {
                error!(error = %inner, "timetable invariant broken during override");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, e.to_string())
    }
}

impl From<ScheduleError> for ApiError {
    fn from(e: ScheduleError) -> Self {
        error!(error = %e, "timetable invariant broken during generation");
        Self::internal(e.to_string())
    }
}
