use crate::{Demand, Timetable};
use types::{GenerateResult, GenerateStatus, Stats};

/// Summarises a finished run. `needed` is the obligation total before the
/// run started; `remaining` is what the allocator left unplaced.
pub fn report(allocator: &str, needed: u32, remaining: &Demand, timetable: Timetable) -> GenerateResult {
    let placed = u32::try_from(timetable.len()).unwrap_or(u32::MAX);
    debug_assert_eq!(placed.saturating_add(remaining.total()), needed);
    let unmet = remaining.unmet();
    GenerateResult {
        status: if unmet.is_empty() {
            GenerateStatus::Complete
        } else {
            GenerateStatus::Partial
        },
        allocator: allocator.to_string(),
        assignments: timetable.into_assignments(),
        stats: Stats { placed, needed },
        unmet,
    }
}
