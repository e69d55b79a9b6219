#![allow(dead_code)]

use types::*;

pub fn week(days: u8, slots: u8) -> Vec<TimeSlot> {
    let mut out = Vec::new();
    for day in 0..days {
        for slot in 0..slots {
            out.push(TimeSlot {
                id: TimeslotId(u32::from(day) * 100 + u32::from(slot) + 1),
                day,
                slot,
                label: format!("D{day}P{slot}"),
            });
        }
    }
    out
}

pub fn room(id: u32, capacity: u32) -> Room {
    Room {
        id: RoomId(id),
        name: format!("Room {id}"),
        capacity,
        has_projector: false,
        has_smart_board: false,
    }
}

/// Grade 8 A/B: Maths by t1, Science and History by t2, English by t3;
/// 5+4+4+3 periods per class, rooms of 30 and 32 seats, 5 x 6 grid.
pub fn school() -> Snapshot {
    let teachers = (1..=3)
        .map(|i| Teacher { id: TeacherId(i), name: format!("Teacher {i}") })
        .collect();
    let subjects = ["Mathematics", "Science", "English", "History"]
        .iter()
        .zip(1..)
        .map(|(n, i)| Subject { id: SubjectId(i), name: (*n).into() })
        .collect();
    let qualifications = [(1, 1), (2, 2), (3, 3), (2, 4)]
        .iter()
        .map(|&(t, s)| Qualification { teacher_id: TeacherId(t), subject_id: SubjectId(s) })
        .collect();
    let classes = vec![
        ClassGroup { id: ClassId(1), name: "Grade 8 - A".into(), size: 28 },
        ClassGroup { id: ClassId(2), name: "Grade 8 - B".into(), size: 30 },
    ];
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
        rooms: vec![room(1, 30), room(2, 32)],
        timeslots: week(5, 6),
        requirements,
    }
}

/// Panics with the audit findings if any hard rule is broken.
pub fn assert_clean(snap: &Snapshot, assignments: &[Assignment]) {
    let audit = sched_core::audit::audit(snap, assignments);
    assert!(audit.is_clean(), "violations: {:?}", audit.violations);
}
