use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use sched_core::audit::audit;
use types::{Assignment, Snapshot, Violation};

#[derive(Deserialize, ToSchema)]
pub struct AuditIn {
    pub snapshot: Snapshot,
    pub assignments: Vec<Assignment>,
}

#[derive(Serialize, ToSchema)]
pub struct AuditOut {
    pub ok: bool,
    pub violations: Vec<Violation>,
    pub repeats: Repeats,
}

/// Same-subject periods beyond the first per class and day.
#[derive(Serialize, ToSchema)]
pub struct Repeats {
    pub total: u32,
    /// Keyed by class id.
    pub by_class: BTreeMap<String, u32>,
}

#[utoipa::path(
    post,
    path = "/v1/audit",
    request_body = AuditIn,
    responses(
    (status = 200, description = "Hard-rule violations and daily subject repeats", body = AuditOut)
    )
)]
pub async fn audit_handler(Json(input): Json<AuditIn>) -> Json<AuditOut> {
    let a = audit(&input.snapshot, &input.assignments);
    Json(AuditOut {
        ok: a.is_clean(),
        repeats: Repeats {
            total: a.repeats_total,
            by_class: a
                .repeats_by_class
                .iter()
                .map(|(c, n)| (c.to_string(), *n))
                .collect(),
        },
        violations: a.violations,
    })
}
