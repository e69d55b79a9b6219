pub mod policy;

use rand_chacha::ChaCha8Rng;
use sched_core::{Allocator, Catalog, Demand, Occupant, ScheduleError, Timetable};
use tracing::{debug, info};
use types::{Assignment, ClassGroup, SubjectId, TimeSlot};

pub use policy::{DayTally, LeastPlacedToday, SeededShuffle, SubjectRanking, TeacherOrder};

/// Single sweep over the grid: every timeslot, every class, at most one
/// period each. No backtracking; whatever does not fit stays in `demand`.
pub struct GreedyAllocator<R = LeastPlacedToday, T = SeededShuffle> {
    ranking: R,
    teachers: T,
}

impl GreedyAllocator {
    pub fn new() -> Self {
        Self {
            ranking: LeastPlacedToday,
            teachers: SeededShuffle,
        }
    }
}

impl Default for GreedyAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: SubjectRanking, T: TeacherOrder> GreedyAllocator<R, T> {
    pub fn with_policies(ranking: R, teachers: T) -> Self {
        Self { ranking, teachers }
    }

    fn try_place(
        &self,
        catalog: &Catalog<'_>,
        timetable: &Timetable,
        class: &ClassGroup,
        slot: &TimeSlot,
        subject: SubjectId,
        rng: &mut ChaCha8Rng,
    ) -> Option<Assignment> {
        let occ = timetable.occupancy();
        let ts = slot.id;

        let teacher_id = self
            .teachers
            .order(catalog.qualified_teachers(subject), rng)
            .into_iter()
            .find(|&t| !occ.is_busy(Occupant::Teacher(t), ts))?;
        let room = catalog
            .rooms_by_capacity()
            .iter()
            .find(|r| r.capacity >= class.size && !occ.is_busy(Occupant::Room(r.id), ts))?;
        if occ.is_busy(Occupant::Class(class.id), ts) {
            return None;
        }

        Some(Assignment {
            class_id: class.id,
            timeslot_id: ts,
            subject_id: subject,
            teacher_id,
            room_id: room.id,
        })
    }
}

impl<R, T> Allocator for GreedyAllocator<R, T>
where
    R: SubjectRanking + 'static,
    T: TeacherOrder + 'static,
{
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn allocate(
        &self,
        catalog: &Catalog<'_>,
        demand: &mut Demand,
        rng: &mut ChaCha8Rng,
    ) -> Result<Timetable, ScheduleError> {
        let mut timetable = Timetable::new();
        let mut tally = DayTally::default();

        for &slot in catalog.timeslots() {
            for &class in catalog.classes() {
                if demand.is_settled(class.id) {
                    continue;
                }
                let mut owed: Vec<SubjectId> = demand.owed(class.id).collect();
                self.ranking.rank(&mut owed, &tally, class.id, slot.day);

                for subject in owed {
                    let Some(a) = self.try_place(catalog, &timetable, class, slot, subject, rng)
                    else {
                        continue;
                    };
                    timetable.commit(a)?;
                    demand.take(class.id, subject);
                    tally.bump(class.id, slot.day, subject);
                    debug!(
                        class = %a.class_id,
                        timeslot = %a.timeslot_id,
                        subject = %a.subject_id,
                        teacher = %a.teacher_id,
                        room = %a.room_id,
                        "placed"
                    );
                    break;
                }
            }
        }

        info!(
            placed = timetable.len(),
            unplaced = demand.total(),
            "greedy sweep finished"
        );
        Ok(timetable)
    }
}
