//! The two tunable knobs of the greedy sweep: which owed subject a class tries
//! first, and in which order qualified teachers are offered.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use types::{ClassId, SubjectId, TeacherId};

/// Periods already placed per (class, day, subject) during the current run.
#[derive(Default, Clone, Debug)]
pub struct DayTally {
    counts: HashMap<(ClassId, u8, SubjectId), u32>,
}

impl DayTally {
    pub fn get(&self, class: ClassId, day: u8, subject: SubjectId) -> u32 {
        self.counts.get(&(class, day, subject)).copied().unwrap_or(0)
    }

    pub fn bump(&mut self, class: ClassId, day: u8, subject: SubjectId) {
        *self.counts.entry((class, day, subject)).or_default() += 1;
    }
}

pub trait SubjectRanking: Send + Sync {
    /// Reorders `owed` in place, most preferred first. `owed` arrives in
    /// ascending subject id.
    fn rank(&self, owed: &mut [SubjectId], tally: &DayTally, class: ClassId, day: u8);
}

/// Balance heuristic: subjects taught least often today first, ties by id.
#[derive(Default, Clone, Copy, Debug)]
pub struct LeastPlacedToday;

impl SubjectRanking for LeastPlacedToday {
    fn rank(&self, owed: &mut [SubjectId], tally: &DayTally, class: ClassId, day: u8) {
        owed.sort_by_key(|&s| (tally.get(class, day, s), s));
    }
}

pub trait TeacherOrder: Send + Sync {
    /// Order in which `qualified` teachers are offered. `qualified` arrives
    /// in ascending teacher id.
    fn order(&self, qualified: &[TeacherId], rng: &mut ChaCha8Rng) -> Vec<TeacherId>;
}

/// Uniform shuffle drawn from the run's generator. No load balancing: any
/// free qualified teacher is as good as another.
#[derive(Default, Clone, Copy, Debug)]
pub struct SeededShuffle;

impl TeacherOrder for SeededShuffle {
    fn order(&self, qualified: &[TeacherId], rng: &mut ChaCha8Rng) -> Vec<TeacherId> {
        let mut out = qualified.to_vec();
        out.shuffle(rng);
        out
    }
}
