use crate::{Catalog, Occupancy, Occupant, ScheduleError};
use thiserror::Error;
use types::{Assignment, ClassId, OverrideRequest, RoomId, TeacherId, TimeslotId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OverrideError {
    #[error("no timeslot at day {day}, slot {slot}")]
    InvalidTarget { day: u8, slot: u8 },
    #[error("unknown {kind} {id}")]
    UnknownEntity { kind: &'static str, id: u32 },
    #[error("teacher {teacher_id} already booked in timeslot {timeslot_id} by class {held_by}")]
    TeacherConflict {
        teacher_id: TeacherId,
        timeslot_id: TimeslotId,
        held_by: ClassId,
    },
    #[error("room {room_id} already booked in timeslot {timeslot_id} by class {held_by}")]
    RoomConflict {
        room_id: RoomId,
        timeslot_id: TimeslotId,
        held_by: ClassId,
    },
    #[error(transparent)]
    Invariant(#[from] ScheduleError),
}

/// Committed assignments together with the occupancy they hold. Every
/// assignment owns exactly one teacher, one room and one class entry.
#[derive(Clone, Debug, Default)]
pub struct Timetable {
    assignments: Vec<Assignment>,
    occupancy: Occupancy,
}

impl Timetable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_assignments<'a>(
        assignments: impl IntoIterator<Item = &'a Assignment>,
    ) -> Result<Self, ScheduleError> {
        let mut tt = Self::new();
        for a in assignments {
            tt.commit(*a)?;
        }
        Ok(tt)
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn into_assignments(self) -> Vec<Assignment> {
        self.assignments
    }

    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Appends `a`. Either all three bookings are taken or none is.
    pub fn commit(&mut self, a: Assignment) -> Result<(), ScheduleError> {
        let ts = a.timeslot_id;
        for who in occupants(&a) {
            if self.occupancy.is_busy(who, ts) {
                return Err(ScheduleError::DoubleBooked {
                    occupant: who,
                    timeslot_id: ts,
                });
            }
        }
        for who in occupants(&a) {
            self.occupancy.mark_busy(who, ts)?;
        }
        self.assignments.push(a);
        Ok(())
    }

    /// Removes the assignment of `class` at `ts` and frees its bookings.
    pub fn retract(&mut self, class: ClassId, ts: TimeslotId) -> Option<Assignment> {
        let pos = self
            .assignments
            .iter()
            .position(|a| a.class_id == class && a.timeslot_id == ts)?;
        let a = self.assignments.remove(pos);
        for who in occupants(&a) {
            self.occupancy.release(who, ts);
        }
        Some(a)
    }

    pub fn holder(&self, who: Occupant, ts: TimeslotId) -> Option<&Assignment> {
        if !self.occupancy.is_busy(who, ts) {
            return None;
        }
        self.assignments
            .iter()
            .filter(|a| a.timeslot_id == ts)
            .find(|a| occupants(a).contains(&who))
    }

    /// Manual edit of a single cell. Checks everything first and only then
    /// swaps out the class's previous assignment for that cell, so a rejected
    /// request leaves the timetable as it was.
    pub fn override_slot(
        &mut self,
        catalog: &Catalog<'_>,
        req: &OverrideRequest,
    ) -> Result<Assignment, OverrideError> {
        let slot = catalog
            .timeslot_at(req.day, req.slot)
            .ok_or(OverrideError::InvalidTarget {
                day: req.day,
                slot: req.slot,
            })?;
        if catalog.class(req.class_id).is_none() {
            return Err(unknown("class", req.class_id.0));
        }
        if !catalog.has_subject(req.subject_id) {
            return Err(unknown("subject", req.subject_id.0));
        }
        if !catalog.has_teacher(req.teacher_id) {
            return Err(unknown("teacher", req.teacher_id.0));
        }
        if catalog.room(req.room_id).is_none() {
            return Err(unknown("room", req.room_id.0));
        }

        let ts = slot.id;
        // The class's own assignment for this cell is being replaced, so its
        // teacher and room do not count as conflicts.
        if let Some(other) = self.holder(Occupant::Teacher(req.teacher_id), ts) {
            if other.class_id != req.class_id {
                return Err(OverrideError::TeacherConflict {
                    teacher_id: req.teacher_id,
                    timeslot_id: ts,
                    held_by: other.class_id,
                });
            }
        }
        if let Some(other) = self.holder(Occupant::Room(req.room_id), ts) {
            if other.class_id != req.class_id {
                return Err(OverrideError::RoomConflict {
                    room_id: req.room_id,
                    timeslot_id: ts,
                    held_by: other.class_id,
                });
            }
        }

        self.retract(req.class_id, ts);
        let a = Assignment {
            class_id: req.class_id,
            timeslot_id: ts,
            subject_id: req.subject_id,
            teacher_id: req.teacher_id,
            room_id: req.room_id,
        };
        self.commit(a)?;
        Ok(a)
    }
}

fn occupants(a: &Assignment) -> [Occupant; 3] {
    [
        Occupant::Teacher(a.teacher_id),
        Occupant::Room(a.room_id),
        Occupant::Class(a.class_id),
    ]
}

fn unknown(kind: &'static str, id: u32) -> OverrideError {
    OverrideError::UnknownEntity { kind, id }
}
