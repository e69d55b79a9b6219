use parking_lot::RwLock;
use sched_core::{
    validate, Allocator, Catalog, OverrideError, ScheduleError, Timetable, ValidationError,
};
use std::collections::BTreeMap;
use tracing::{info, warn};
use types::{Assignment, ClassId, GenerateResult, OverrideRequest, RoomId, Snapshot, SubjectId, TeacherId, TimeslotId};
use utoipa::ToSchema;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub timeslot_id: TimeslotId,
    pub day: u8,
    pub slot: u8,
    pub label: String,
    pub subject_id: SubjectId,
    pub subject: String,
    pub teacher_id: TeacherId,
    pub teacher: String,
    pub room_id: RoomId,
    pub room: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema, PartialEq, Eq)]
pub struct ClassSchedule {
    pub class_id: ClassId,
    pub class: String,
    pub entries: Vec<ScheduleEntry>,
}

#[derive(Default)]
struct State {
    snapshot: Snapshot,
    timetable: Timetable,
}

/// In-memory owner of the current snapshot and its committed timetable.
///
/// Generation and overrides both take the write lock for their whole
/// duration, so they never interleave.
#[derive(Default)]
pub struct TimetableStore {
    inner: RwLock<State>,
}

impl TimetableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Result<Self, ValidationError> {
        let store = Self::new();
        store.load(snapshot)?;
        Ok(store)
    }

    /// Replaces the snapshot. Assignments made against the old one are
    /// dropped.
    pub fn load(&self, snapshot: Snapshot) -> Result<(), ValidationError> {
        validate(&snapshot)?;
        let mut w = self.inner.write();
        info!(
            teachers = snapshot.teachers.len(),
            classes = snapshot.classes.len(),
            rooms = snapshot.rooms.len(),
            timeslots = snapshot.timeslots.len(),
            dropped = w.timetable.len(),
            "snapshot loaded"
        );
        w.snapshot = snapshot;
        w.timetable = Timetable::new();
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.read().snapshot.clone()
    }

    pub fn assignments(&self) -> Vec<Assignment> {
        self.inner.read().timetable.assignments().to_vec()
    }

    /// Full regeneration: the committed timetable is discarded before the
    /// allocator runs and replaced by its output.
    pub fn generate(
        &self,
        allocator: &dyn Allocator,
        seed: u64,
    ) -> Result<GenerateResult, ScheduleError> {
        let mut w = self.inner.write();
        w.timetable = Timetable::new();
        let res = sched_core::generate(&w.snapshot, allocator, seed)?;
        w.timetable = Timetable::from_assignments(&res.assignments)?;
        Ok(res)
    }

    /// Returns how many assignments were discarded.
    pub fn clear(&self) -> usize {
        let mut w = self.inner.write();
        let n = w.timetable.len();
        w.timetable = Timetable::new();
        info!(cleared = n, "timetable cleared");
        n
    }

    pub fn override_slot(&self, req: &OverrideRequest) -> Result<Assignment, OverrideError> {
        let mut guard = self.inner.write();
        let state = &mut *guard;
        let catalog = Catalog::new(&state.snapshot);
        match state.timetable.override_slot(&catalog, req) {
            Ok(a) => {
                info!(class = %a.class_id, timeslot = %a.timeslot_id, "override applied");
                Ok(a)
            }
            Err(e) => {
                warn!(error = %e, class = %req.class_id, day = req.day, slot = req.slot, "override rejected");
                Err(e)
            }
        }
    }

    /// Committed assignments joined with names, one block per class in id
    /// order, entries in grid order. `class` narrows to a single class.
    pub fn schedule(&self, class: Option<ClassId>) -> Vec<ClassSchedule> {
        let r = self.inner.read();
        let catalog = Catalog::new(&r.snapshot);
        let teacher_name: BTreeMap<_, _> = r
            .snapshot
            .teachers
            .iter()
            .map(|t| (t.id, t.name.as_str()))
            .collect();
        let subject_name: BTreeMap<_, _> = r
            .snapshot
            .subjects
            .iter()
            .map(|s| (s.id, s.name.as_str()))
            .collect();

        let mut by_class: BTreeMap<ClassId, Vec<(usize, ScheduleEntry)>> = BTreeMap::new();
        for a in r.timetable.assignments() {
            if class.is_some_and(|c| c != a.class_id) {
                continue;
            }
            let (Some(ts), Some(idx)) = (catalog.timeslot(a.timeslot_id), catalog.grid_index(a.timeslot_id)) else {
                continue;
            };
            let entry = ScheduleEntry {
                timeslot_id: ts.id,
                day: ts.day,
                slot: ts.slot,
                label: ts.label.clone(),
                subject_id: a.subject_id,
                subject: subject_name.get(&a.subject_id).copied().unwrap_or_default().to_string(),
                teacher_id: a.teacher_id,
                teacher: teacher_name.get(&a.teacher_id).copied().unwrap_or_default().to_string(),
                room_id: a.room_id,
                room: catalog.room(a.room_id).map(|x| x.name.clone()).unwrap_or_default(),
            };
            by_class.entry(a.class_id).or_default().push((idx, entry));
        }

        by_class
            .into_iter()
            .map(|(class_id, mut entries)| {
                entries.sort_by_key(|(idx, _)| *idx);
                ClassSchedule {
                    class_id,
                    class: catalog.class(class_id).map(|c| c.name.clone()).unwrap_or_default(),
                    entries: entries.into_iter().map(|(_, e)| e).collect(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc_greedy::GreedyAllocator;
    use sched_core::fixtures::school;

    #[test]
    fn invalid_snapshot_is_not_loaded() {
        let store = TimetableStore::with_snapshot(school()).unwrap();
        let mut bad = school();
        bad.requirements[0].class_id = ClassId(9);
        assert!(store.load(bad).is_err());
        assert_eq!(store.snapshot(), school());
    }

    #[test]
    fn regenerating_replaces_everything() {
        let store = TimetableStore::with_snapshot(school()).unwrap();
        let alloc = GreedyAllocator::new();
        let first = store.generate(&alloc, 42).unwrap();
        let second = store.generate(&alloc, 42).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.stats.placed, 32);
        assert_eq!(store.assignments(), second.assignments);
    }

    #[test]
    fn reload_drops_assignments() {
        let store = TimetableStore::with_snapshot(school()).unwrap();
        store.generate(&GreedyAllocator::new(), 42).unwrap();
        store.load(school()).unwrap();
        assert!(store.assignments().is_empty());
    }

    #[test]
    fn clear_reports_count() {
        let store = TimetableStore::with_snapshot(school()).unwrap();
        store.generate(&GreedyAllocator::new(), 42).unwrap();
        assert_eq!(store.clear(), 32);
        assert_eq!(store.clear(), 0);
    }

    #[test]
    fn teacher_conflict_keeps_existing_cell() {
        let store = TimetableStore::with_snapshot(school()).unwrap();
        store.generate(&GreedyAllocator::new(), 42).unwrap();
        let before = store.assignments();
        // Monday P1: class 1 has Maths with teacher 1.
        let held = before
            .iter()
            .find(|a| a.class_id == ClassId(1) && a.timeslot_id == TimeslotId(1))
            .copied()
            .unwrap();

        let err = store
            .override_slot(&OverrideRequest {
                class_id: ClassId(2),
                day: 0,
                slot: 0,
                subject_id: held.subject_id,
                teacher_id: held.teacher_id,
                room_id: RoomId(2),
            })
            .unwrap_err();
        assert!(matches!(err, OverrideError::TeacherConflict { held_by: ClassId(1), .. }));
        assert_eq!(store.assignments(), before);
    }

    #[test]
    fn override_shows_up_in_schedule() {
        let store = TimetableStore::with_snapshot(school()).unwrap();
        store
            .override_slot(&OverrideRequest {
                class_id: ClassId(2),
                day: 1,
                slot: 2,
                subject_id: SubjectId(3),
                teacher_id: TeacherId(3),
                room_id: RoomId(1),
            })
            .unwrap();
        store
            .override_slot(&OverrideRequest {
                class_id: ClassId(2),
                day: 0,
                slot: 4,
                subject_id: SubjectId(1),
                teacher_id: TeacherId(1),
                room_id: RoomId(2),
            })
            .unwrap();

        let view = store.schedule(None);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].class, "Grade 8 - B");
        let cells: Vec<_> = view[0]
            .entries
            .iter()
            .map(|e| (e.day, e.slot, e.subject.as_str(), e.room.as_str()))
            .collect();
        assert_eq!(
            cells,
            vec![(0, 4, "Mathematics", "Room 102"), (1, 2, "English", "Room 101")]
        );
        assert!(store.schedule(Some(ClassId(1))).is_empty());

        let json = serde_json::to_value(&view[0].entries[0]).unwrap();
        assert_eq!(json["teacher"], "Anita Sen");
        assert_eq!(json["label"], "P5");
    }

    #[test]
    fn unknown_cell_is_rejected() {
        let store = TimetableStore::with_snapshot(school()).unwrap();
        let err = store
            .override_slot(&OverrideRequest {
                class_id: ClassId(1),
                day: 0,
                slot: 9,
                subject_id: SubjectId(1),
                teacher_id: TeacherId(1),
                room_id: RoomId(1),
            })
            .unwrap_err();
        assert_eq!(err, OverrideError::InvalidTarget { day: 0, slot: 9 });
    }
}
