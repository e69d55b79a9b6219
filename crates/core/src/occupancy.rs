use crate::ScheduleError;
use std::collections::HashSet;
use std::fmt;
use types::{ClassId, RoomId, TeacherId, TimeslotId};

/// Something that can be booked for a timeslot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Occupant {
    Teacher(TeacherId),
    Room(RoomId),
    Class(ClassId),
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occupant::Teacher(id) => write!(f, "teacher {id}"),
            Occupant::Room(id) => write!(f, "room {id}"),
            Occupant::Class(id) => write!(f, "class {id}"),
        }
    }
}

/// Committed (resource, timeslot) pairs, one set per resource kind.
#[derive(Default, Clone, Debug)]
pub struct Occupancy {
    teacher: HashSet<(TeacherId, TimeslotId)>,
    room: HashSet<(RoomId, TimeslotId)>,
    class: HashSet<(ClassId, TimeslotId)>,
}

impl Occupancy {
    pub fn is_busy(&self, who: Occupant, ts: TimeslotId) -> bool {
        match who {
            Occupant::Teacher(id) => self.teacher.contains(&(id, ts)),
            Occupant::Room(id) => self.room.contains(&(id, ts)),
            Occupant::Class(id) => self.class.contains(&(id, ts)),
        }
    }

    /// Books `who` for `ts`. A pair may be booked once; a second booking is
    /// rejected and leaves the tracker unchanged.
    pub fn mark_busy(&mut self, who: Occupant, ts: TimeslotId) -> Result<(), ScheduleError> {
        let fresh = match who {
            Occupant::Teacher(id) => self.teacher.insert((id, ts)),
            Occupant::Room(id) => self.room.insert((id, ts)),
            Occupant::Class(id) => self.class.insert((id, ts)),
        };
        if fresh {
            Ok(())
        } else {
            Err(ScheduleError::DoubleBooked {
                occupant: who,
                timeslot_id: ts,
            })
        }
    }

    /// Frees a booking. Returns whether it was held.
    pub fn release(&mut self, who: Occupant, ts: TimeslotId) -> bool {
        match who {
            Occupant::Teacher(id) => self.teacher.remove(&(id, ts)),
            Occupant::Room(id) => self.room.remove(&(id, ts)),
            Occupant::Class(id) => self.class.remove(&(id, ts)),
        }
    }

    pub fn len(&self) -> usize {
        self.teacher.len() + self.room.len() + self.class.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
