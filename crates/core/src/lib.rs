pub mod audit;
pub mod catalog;
pub mod demand;
pub mod occupancy;
pub mod report;
pub mod timetable;

use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use thiserror::Error;
use tracing::info;

pub use catalog::Catalog;
pub use demand::Demand;
pub use occupancy::{Occupancy, Occupant};
pub use timetable::{OverrideError, Timetable};
pub use types::{
    Assignment, ClassGroup, GenerateParams, GenerateResult, OverrideRequest, Room, Snapshot,
    Stats, Subject, SubjectRequirement, Teacher, TimeSlot, DAYS_PER_WEEK,
};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid snapshot: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl ValidationError {
    pub fn messages(&self) -> &[String] {
        match self {
            ValidationError::Invalid(m) => m,
        }
    }
}

/// Raised when a committed timetable would hold the same (resource, timeslot)
/// pair twice. Allocators check occupancy before committing, so seeing this
/// means the allocator itself is broken.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("{occupant} already booked in timeslot {timeslot_id}")]
    DoubleBooked {
        occupant: Occupant,
        timeslot_id: types::TimeslotId,
    },
}

pub fn validate(snap: &Snapshot) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();

    fn chk_unique<I: ToString>(name: &str, ids: impl Iterator<Item = I>, errors: &mut Vec<String>) {
        let mut seen = HashSet::new();
        for id in ids {
            let s = id.to_string();
            if !seen.insert(s.clone()) {
                errors.push(format!("duplicate {name} id: {s}"));
            }
        }
    }
    chk_unique("teacher", snap.teachers.iter().map(|x| x.id), &mut errors);
    chk_unique("subject", snap.subjects.iter().map(|x| x.id), &mut errors);
    chk_unique("class", snap.classes.iter().map(|x| x.id), &mut errors);
    chk_unique("room", snap.rooms.iter().map(|x| x.id), &mut errors);
    chk_unique("timeslot", snap.timeslots.iter().map(|x| x.id), &mut errors);

    let mut cells = HashSet::new();
    for t in &snap.timeslots {
        if t.day >= DAYS_PER_WEEK {
            errors.push(format!("timeslot {} has day {} outside 0..{}", t.id, t.day, DAYS_PER_WEEK));
        }
        if !cells.insert(t.grid_key()) {
            errors.push(format!(
                "timeslot {} repeats day {} slot {}",
                t.id, t.day, t.slot
            ));
        }
    }

    let teachers: HashSet<_> = snap.teachers.iter().map(|t| t.id).collect();
    let subjects: HashSet<_> = snap.subjects.iter().map(|s| s.id).collect();
    let classes: HashSet<_> = snap.classes.iter().map(|c| c.id).collect();

    let mut quals = HashSet::new();
    for q in &snap.qualifications {
        if !teachers.contains(&q.teacher_id) {
            errors.push(format!(
                "qualification references missing teacher {}",
                q.teacher_id
            ));
        }
        if !subjects.contains(&q.subject_id) {
            errors.push(format!(
                "qualification references missing subject {}",
                q.subject_id
            ));
        }
        if !quals.insert((q.teacher_id, q.subject_id)) {
            errors.push(format!(
                "duplicate qualification: teacher {} subject {}",
                q.teacher_id, q.subject_id
            ));
        }
    }

    let grid = i64::try_from(snap.timeslots.len()).unwrap_or(i64::MAX);
    let mut reqs = HashSet::new();
    for r in &snap.requirements {
        if !classes.contains(&r.class_id) {
            errors.push(format!(
                "requirement references missing class {}",
                r.class_id
            ));
        }
        if !subjects.contains(&r.subject_id) {
            errors.push(format!(
                "requirement references missing subject {}",
                r.subject_id
            ));
        }
        if grid > 0 && i64::from(r.periods_per_week) > grid {
            errors.push(format!(
                "requirement class {} subject {} asks for {} periods but the week has {} timeslots",
                r.class_id, r.subject_id, r.periods_per_week, grid
            ));
        }
        if !reqs.insert((r.class_id, r.subject_id)) {
            errors.push(format!(
                "duplicate requirement: class {} subject {}",
                r.class_id, r.subject_id
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Invalid(errors))
    }
}

/// A placement strategy. Given the catalog and the outstanding demand it
/// returns a conflict-free timetable, consuming from `demand` one obligation
/// per committed assignment.
///
/// The generator is owned by the caller's run; implementations draw from it
/// and never seed their own.
pub trait Allocator: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn allocate(
        &self,
        catalog: &Catalog<'_>,
        demand: &mut Demand,
        rng: &mut ChaCha8Rng,
    ) -> Result<Timetable, ScheduleError>;
}

/// Full regeneration: expands demand from scratch and runs `allocator` on an
/// empty timetable. Prior assignments are never consulted.
pub fn generate(
    snap: &Snapshot,
    allocator: &dyn Allocator,
    seed: u64,
) -> Result<GenerateResult, ScheduleError> {
    let catalog = Catalog::new(snap);
    let mut demand = Demand::expand(&catalog);
    let needed = demand.total();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    info!(
        allocator = allocator.name(),
        seed,
        needed,
        classes = snap.classes.len(),
        timeslots = snap.timeslots.len(),
        "generating timetable"
    );
    let timetable = allocator.allocate(&catalog, &mut demand, &mut rng)?;
    let result = report::report(allocator.name(), needed, &demand, timetable);
    info!(
        placed = result.stats.placed,
        needed = result.stats.needed,
        "timetable generated"
    );
    Ok(result)
}

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures {
    use types::*;

    /// Two classes, four subjects, three teachers: Maths(t1), Science and
    /// History (t2), English (t3). Five days of six periods.
    pub fn school() -> Snapshot {
        let teachers = vec![
            Teacher { id: TeacherId(1), name: "Anita Sen".into() },
            Teacher { id: TeacherId(2), name: "Rahul Mehta".into() },
            Teacher { id: TeacherId(3), name: "Joseph D".into() },
        ];
        let subjects = vec![
            Subject { id: SubjectId(1), name: "Mathematics".into() },
            Subject { id: SubjectId(2), name: "Science".into() },
            Subject { id: SubjectId(3), name: "English".into() },
            Subject { id: SubjectId(4), name: "History".into() },
        ];
        let q = |t, s| Qualification { teacher_id: TeacherId(t), subject_id: SubjectId(s) };
        let qualifications = vec![q(1, 1), q(2, 2), q(3, 3), q(2, 4)];
        let classes = vec![
            ClassGroup { id: ClassId(1), name: "Grade 8 - A".into(), size: 28 },
            ClassGroup { id: ClassId(2), name: "Grade 8 - B".into(), size: 30 },
        ];
        let rooms = vec![
            Room {
                id: RoomId(1),
                name: "Room 101".into(),
                capacity: 30,
                has_projector: true,
                has_smart_board: false,
            },
            Room {
                id: RoomId(2),
                name: "Room 102".into(),
                capacity: 32,
                has_projector: false,
                has_smart_board: true,
            },
        ];
        let mut timeslots = Vec::new();
        for day in 0..5u8 {
            for slot in 0..6u8 {
                timeslots.push(TimeSlot {
                    id: TimeslotId(u32::from(day) * 6 + u32::from(slot) + 1),
                    day,
                    slot,
                    label: format!("P{}", slot + 1),
                });
            }
        }
        let mut requirements = Vec::new();
        for class in [1, 2] {
            for (subject, n) in [(1, 5), (2, 4), (3, 4), (4, 3)] {
                requirements.push(SubjectRequirement {
                    class_id: ClassId(class),
                    subject_id: SubjectId(subject),
                    periods_per_week: n,
                });
            }
        }
        Snapshot {
            teachers,
            subjects,
            qualifications,
            classes,
            rooms,
            timeslots,
            requirements,
        }
    }
}
