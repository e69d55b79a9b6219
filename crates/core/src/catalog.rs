//! Read-only index over a [`Snapshot`], built once per run.
//!
//! Fixes the iteration orders every allocator relies on: timeslots by
//! (day, slot), classes by id, rooms by capacity then id, and qualified
//! teachers per subject by id.

use std::collections::{HashMap, HashSet};
use types::{
    ClassGroup, ClassId, Room, RoomId, Snapshot, SubjectId, TeacherId, TimeSlot, TimeslotId,
};

pub struct Catalog<'a> {
    pub snapshot: &'a Snapshot,
    timeslots: Vec<&'a TimeSlot>,
    classes: Vec<&'a ClassGroup>,
    rooms: Vec<&'a Room>,
    qualified: HashMap<SubjectId, Vec<TeacherId>>,
    qual_pairs: HashSet<(TeacherId, SubjectId)>,
    idx_ts: HashMap<TimeslotId, usize>,
    idx_class: HashMap<ClassId, usize>,
    idx_room: HashMap<RoomId, usize>,
    teachers: HashSet<TeacherId>,
    subjects: HashSet<SubjectId>,
}

impl<'a> Catalog<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        let mut timeslots: Vec<&TimeSlot> = snapshot.timeslots.iter().collect();
        timeslots.sort_by_key(|t| (t.grid_key(), t.id));

        let mut classes: Vec<&ClassGroup> = snapshot.classes.iter().collect();
        classes.sort_by_key(|c| c.id);

        let mut rooms: Vec<&Room> = snapshot.rooms.iter().collect();
        rooms.sort_by_key(|r| (r.capacity, r.id));

        let mut qualified: HashMap<SubjectId, Vec<TeacherId>> = HashMap::new();
        let mut qual_pairs = HashSet::new();
        for q in &snapshot.qualifications {
            if qual_pairs.insert((q.teacher_id, q.subject_id)) {
                qualified.entry(q.subject_id).or_default().push(q.teacher_id);
            }
        }
        for list in qualified.values_mut() {
            list.sort_unstable();
        }

        let idx_ts = timeslots.iter().enumerate().map(|(i, t)| (t.id, i)).collect();
        let idx_class = classes.iter().enumerate().map(|(i, c)| (c.id, i)).collect();
        let idx_room = rooms.iter().enumerate().map(|(i, r)| (r.id, i)).collect();

        Self {
            snapshot,
            timeslots,
            classes,
            rooms,
            qualified,
            qual_pairs,
            idx_ts,
            idx_class,
            idx_room,
            teachers: snapshot.teachers.iter().map(|t| t.id).collect(),
            subjects: snapshot.subjects.iter().map(|s| s.id).collect(),
        }
    }

    /// The weekly grid in ascending (day, slot) order.
    pub fn timeslots(&self) -> &[&'a TimeSlot] {
        &self.timeslots
    }

    /// Classes in ascending id order.
    pub fn classes(&self) -> &[&'a ClassGroup] {
        &self.classes
    }

    /// Rooms smallest first; equal capacities fall back to id.
    pub fn rooms_by_capacity(&self) -> &[&'a Room] {
        &self.rooms
    }

    pub fn qualified_teachers(&self, subject: SubjectId) -> &[TeacherId] {
        self.qualified
            .get(&subject)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_qualified(&self, teacher: TeacherId, subject: SubjectId) -> bool {
        self.qual_pairs.contains(&(teacher, subject))
    }

    pub fn timeslot(&self, id: TimeslotId) -> Option<&'a TimeSlot> {
        self.idx_ts.get(&id).map(|&i| self.timeslots[i])
    }

    /// Position of a timeslot in grid order.
    pub fn grid_index(&self, id: TimeslotId) -> Option<usize> {
        self.idx_ts.get(&id).copied()
    }

    pub fn timeslot_at(&self, day: u8, slot: u8) -> Option<&'a TimeSlot> {
        self.timeslots
            .binary_search_by_key(&(day, slot), |t| t.grid_key())
            .ok()
            .map(|i| self.timeslots[i])
    }

    pub fn class(&self, id: ClassId) -> Option<&'a ClassGroup> {
        self.idx_class.get(&id).map(|&i| self.classes[i])
    }

    pub fn room(&self, id: RoomId) -> Option<&'a Room> {
        self.idx_room.get(&id).map(|&i| self.rooms[i])
    }

    pub fn has_teacher(&self, id: TeacherId) -> bool {
        self.teachers.contains(&id)
    }

    pub fn has_subject(&self, id: SubjectId) -> bool {
        self.subjects.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use types::Qualification;

    #[test]
    fn grid_is_walked_by_day_then_slot() {
        let mut snap = fixtures::school();
        snap.timeslots.reverse();
        let cat = Catalog::new(&snap);
        let keys: Vec<_> = cat.timeslots().iter().map(|t| t.grid_key()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(cat.timeslot_at(2, 3).map(|t| t.id), Some(TimeslotId(16)));
        assert!(cat.timeslot_at(2, 6).is_none());
        assert_eq!(cat.grid_index(TimeslotId(1)), Some(0));
    }

    #[test]
    fn rooms_smallest_first() {
        let mut snap = fixtures::school();
        snap.rooms.reverse();
        snap.rooms.push(Room {
            id: RoomId(0),
            name: "Annex".into(),
            capacity: 32,
            has_projector: false,
            has_smart_board: false,
        });
        let cat = Catalog::new(&snap);
        let ids: Vec<_> = cat.rooms_by_capacity().iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![1, 0, 2]);
    }

    #[test]
    fn qualified_teachers_sorted_and_deduplicated() {
        let mut snap = fixtures::school();
        snap.qualifications.push(Qualification {
            teacher_id: TeacherId(3),
            subject_id: SubjectId(1),
        });
        snap.qualifications.push(Qualification {
            teacher_id: TeacherId(3),
            subject_id: SubjectId(1),
        });
        let cat = Catalog::new(&snap);
        assert_eq!(cat.qualified_teachers(SubjectId(1)), &[TeacherId(1), TeacherId(3)]);
        assert!(cat.qualified_teachers(SubjectId(99)).is_empty());
        assert!(cat.is_qualified(TeacherId(2), SubjectId(4)));
        assert!(!cat.is_qualified(TeacherId(2), SubjectId(1)));
    }
}
