//! Independent re-check of a finished timetable.
//!
//! Recomputes the hard rules from the raw assignment list, without trusting
//! any occupancy state, and measures how often a class sees the same subject
//! more than once a day.

use std::collections::{BTreeMap, HashMap, HashSet};
use types::{Assignment, ClassId, Snapshot, SubjectId, Violation};

#[derive(Clone, Debug, Default)]
pub struct Audit {
    pub violations: Vec<Violation>,
    /// Periods beyond the first of the same subject on the same day.
    pub repeats_by_class: BTreeMap<ClassId, u32>,
    pub repeats_total: u32,
}

impl Audit {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

fn violation(kind: &str, details: serde_json::Value) -> Violation {
    Violation {
        r#type: kind.into(),
        details,
    }
}

pub fn audit(snap: &Snapshot, assignments: &[Assignment]) -> Audit {
    let day_of: HashMap<_, _> = snap.timeslots.iter().map(|t| (t.id, t.day)).collect();
    let class_size: HashMap<_, _> = snap.classes.iter().map(|c| (c.id, c.size)).collect();
    let room_cap: HashMap<_, _> = snap.rooms.iter().map(|r| (r.id, r.capacity)).collect();
    let quals: HashSet<_> = snap
        .qualifications
        .iter()
        .map(|q| (q.teacher_id, q.subject_id))
        .collect();

    let mut violations = Vec::new();
    let mut seen_teacher = HashSet::new();
    let mut seen_room = HashSet::new();
    let mut seen_class = HashSet::new();
    let mut per_day: HashMap<(ClassId, u8, SubjectId), u32> = HashMap::new();

    for a in assignments {
        let ts = a.timeslot_id;
        if !seen_teacher.insert((a.teacher_id, ts)) {
            violations.push(violation(
                "teacher_double_booked",
                serde_json::json!({"teacher_id": a.teacher_id, "timeslot_id": ts}),
            ));
        }
        if !seen_room.insert((a.room_id, ts)) {
            violations.push(violation(
                "room_double_booked",
                serde_json::json!({"room_id": a.room_id, "timeslot_id": ts}),
            ));
        }
        if !seen_class.insert((a.class_id, ts)) {
            violations.push(violation(
                "class_double_booked",
                serde_json::json!({"class_id": a.class_id, "timeslot_id": ts}),
            ));
        }

        let size = class_size.get(&a.class_id).copied().unwrap_or(0);
        match room_cap.get(&a.room_id) {
            Some(&cap) if cap >= size => {}
            cap => violations.push(violation(
                "room_too_small",
                serde_json::json!({
                    "room_id": a.room_id,
                    "capacity": cap,
                    "class_id": a.class_id,
                    "size": size,
                }),
            )),
        }

        if !quals.contains(&(a.teacher_id, a.subject_id)) {
            violations.push(violation(
                "unqualified_teacher",
                serde_json::json!({"teacher_id": a.teacher_id, "subject_id": a.subject_id}),
            ));
        }

        match day_of.get(&ts) {
            Some(&day) => *per_day.entry((a.class_id, day, a.subject_id)).or_default() += 1,
            None => violations.push(violation(
                "unknown_timeslot",
                serde_json::json!({"timeslot_id": ts}),
            )),
        }
    }

    let mut repeats_by_class: BTreeMap<ClassId, u32> = BTreeMap::new();
    for (&(class, _day, _subject), &n) in &per_day {
        if n > 1 {
            *repeats_by_class.entry(class).or_default() += n - 1;
        }
    }
    let repeats_total = repeats_by_class.values().sum();

    Audit {
        violations,
        repeats_by_class,
        repeats_total,
    }
}
