#[cfg(feature = "with-milp")]
mod milp_core;

use alloc_greedy::GreedyAllocator;
use rand_chacha::ChaCha8Rng;
use sched_core::{Allocator, Catalog, Demand, ScheduleError, Timetable};
#[cfg(not(feature = "with-milp"))]
use tracing::debug;
#[cfg(feature = "with-milp")]
use tracing::{info, warn};

/// Exact allocator: maximises the number of placed periods with an integer
/// program. Built without `with-milp`, or when the solver gives up, it runs
/// the greedy sweep instead.
pub struct MilpAllocator {
    fallback: GreedyAllocator,
}

impl MilpAllocator {
    pub fn new() -> Self {
        Self {
            fallback: GreedyAllocator::new(),
        }
    }
}

impl Default for MilpAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Allocator for MilpAllocator {
    fn name(&self) -> &'static str {
        "milp"
    }

    fn allocate(
        &self,
        catalog: &Catalog<'_>,
        demand: &mut Demand,
        rng: &mut ChaCha8Rng,
    ) -> Result<Timetable, ScheduleError> {
        #[cfg(feature = "with-milp")]
        {
            match milp_core::solve(catalog, demand) {
                Ok(chosen) => {
                    info!(placed = chosen.len(), "integer program solved");
                    return commit_all(demand, chosen);
                }
                Err(e) => warn!(error = %e, "integer program failed, using greedy sweep"),
            }
        }
        #[cfg(not(feature = "with-milp"))]
        debug!("built without with-milp, using greedy sweep");

        self.fallback.allocate(catalog, demand, rng)
    }
}

#[cfg(feature = "with-milp")]
fn commit_all(
    demand: &mut Demand,
    chosen: Vec<types::Assignment>,
) -> Result<Timetable, ScheduleError> {
    let mut timetable = Timetable::new();
    for a in chosen {
        if demand.remaining(a.class_id, a.subject_id) == 0 {
            continue;
        }
        timetable.commit(a)?;
        demand.take(a.class_id, a.subject_id);
    }
    Ok(timetable)
}
