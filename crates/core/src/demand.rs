use crate::Catalog;
use std::collections::BTreeMap;
use types::{ClassId, SubjectId, UnmetDemand};

/// Per-class bags of outstanding obligations. A bag is a counted multiset:
/// subject -> periods still owed. Subjects with nothing owed are removed, so
/// the keys of a bag are exactly the subjects a class still needs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Demand {
    bags: BTreeMap<ClassId, BTreeMap<SubjectId, u32>>,
}

impl Demand {
    /// Expands every requirement into `periods_per_week` obligations.
    /// Requirements with no positive period count, or for classes outside the
    /// catalog, contribute nothing; an empty grid leaves every class with no
    /// timeslot to use, so nothing is owed at all.
    pub fn expand(catalog: &Catalog<'_>) -> Self {
        let mut bags: BTreeMap<ClassId, BTreeMap<SubjectId, u32>> = BTreeMap::new();
        if catalog.timeslots().is_empty() {
            return Self { bags };
        }
        for r in &catalog.snapshot.requirements {
            if r.periods_per_week <= 0 || catalog.class(r.class_id).is_none() {
                continue;
            }
            let count = bags
                .entry(r.class_id)
                .or_default()
                .entry(r.subject_id)
                .or_default();
            *count = count.saturating_add(r.periods_per_week.unsigned_abs());
        }
        Self { bags }
    }

    /// Distinct subjects still owed to `class`, ascending by id.
    pub fn owed(&self, class: ClassId) -> impl Iterator<Item = SubjectId> + '_ {
        self.bags
            .get(&class)
            .into_iter()
            .flat_map(|bag| bag.keys().copied())
    }

    pub fn remaining(&self, class: ClassId, subject: SubjectId) -> u32 {
        self.bags
            .get(&class)
            .and_then(|bag| bag.get(&subject))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_settled(&self, class: ClassId) -> bool {
        self.bags.get(&class).map_or(true, |bag| bag.is_empty())
    }

    /// Removes one obligation. Returns false if none was owed.
    pub fn take(&mut self, class: ClassId, subject: SubjectId) -> bool {
        let Some(bag) = self.bags.get_mut(&class) else {
            return false;
        };
        let Some(count) = bag.get_mut(&subject) else {
            return false;
        };
        *count -= 1;
        if *count == 0 {
            bag.remove(&subject);
            if bag.is_empty() {
                self.bags.remove(&class);
            }
        }
        true
    }

    /// Saturates at `u32::MAX`.
    pub fn total(&self) -> u32 {
        self.bags
            .values()
            .flat_map(|bag| bag.values())
            .fold(0u32, |acc, &n| acc.saturating_add(n))
    }

    /// Leftover obligations, ascending by class then subject.
    pub fn unmet(&self) -> Vec<UnmetDemand> {
        self.bags
            .iter()
            .flat_map(|(&class_id, bag)| {
                bag.iter().map(move |(&subject_id, &missing)| UnmetDemand {
                    class_id,
                    subject_id,
                    missing,
                })
            })
            .collect()
    }
}
