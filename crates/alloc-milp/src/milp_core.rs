use anyhow::Context;
use good_lp::{default_solver, Expression, ProblemVariables, Solution, SolverModel, Variable};
use sched_core::{Catalog, Demand};
use std::collections::BTreeMap;
use types::{Assignment, ClassId, RoomId, SubjectId, TeacherId, TimeslotId};

/// One way to place one period: x = 1 if `class` takes `subject` with
/// `teacher` in `room` at grid position `t`.
#[derive(Clone)]
pub(crate) struct StartVar {
    pub t: usize,
    pub ts: TimeslotId,
    pub class: ClassId,
    pub subject: SubjectId,
    pub teacher: TeacherId,
    pub room: RoomId,
    pub var: Variable,
}

/// Only combinations with a qualified teacher and a large enough room get a
/// variable, so qualification and capacity hold by construction.
pub(crate) fn declare_starts(
    catalog: &Catalog<'_>,
    demand: &Demand,
    vars: &mut ProblemVariables,
) -> Vec<StartVar> {
    let mut starts = Vec::new();
    for &class in catalog.classes() {
        let rooms: Vec<RoomId> = catalog
            .rooms_by_capacity()
            .iter()
            .filter(|r| r.capacity >= class.size)
            .map(|r| r.id)
            .collect();
        for subject in demand.owed(class.id) {
            for (t, slot) in catalog.timeslots().iter().enumerate() {
                for &teacher in catalog.qualified_teachers(subject) {
                    for &room in &rooms {
                        let var = vars.add(good_lp::variable().binary());
                        starts.push(StartVar {
                            t,
                            ts: slot.id,
                            class: class.id,
                            subject,
                            teacher,
                            room,
                            var,
                        });
                    }
                }
            }
        }
    }
    starts
}

fn sum_of(vars: &[Variable]) -> Expression {
    vars.iter().fold(Expression::from(0.0), |e, &v| e + v)
}

fn group_by<K: Ord>(starts: &[StartVar], key: impl Fn(&StartVar) -> K) -> BTreeMap<K, Vec<Variable>> {
    let mut groups: BTreeMap<K, Vec<Variable>> = BTreeMap::new();
    for s in starts {
        groups.entry(key(s)).or_default().push(s.var);
    }
    groups
}

pub(crate) fn add_demand_constraints<M: SolverModel>(
    mut model: M,
    demand: &Demand,
    starts: &[StartVar],
) -> M {
    for ((class, subject), vars) in group_by(starts, |s| (s.class, s.subject)) {
        let owed = demand.remaining(class, subject) as f64;
        model = model.with(sum_of(&vars).leq(owed));
    }
    model
}

/// At most one start per (resource, timeslot) for each resource kind.
pub(crate) fn add_booking_constraints<M: SolverModel>(mut model: M, starts: &[StartVar]) -> M {
    for (_, vars) in group_by(starts, |s| (s.t, s.class)) {
        model = model.with(sum_of(&vars).leq(1.0));
    }
    for (_, vars) in group_by(starts, |s| (s.t, s.teacher)) {
        model = model.with(sum_of(&vars).leq(1.0));
    }
    for (_, vars) in group_by(starts, |s| (s.t, s.room)) {
        model = model.with(sum_of(&vars).leq(1.0));
    }
    model
}

pub(crate) fn extract_solution(starts: &[StartVar], sol: &impl Solution) -> Vec<Assignment> {
    let mut chosen: Vec<&StartVar> = starts.iter().filter(|s| sol.value(s.var) > 0.5).collect();
    chosen.sort_by_key(|s| (s.t, s.class));
    chosen
        .into_iter()
        .map(|s| Assignment {
            class_id: s.class,
            timeslot_id: s.ts,
            subject_id: s.subject,
            teacher_id: s.teacher,
            room_id: s.room,
        })
        .collect()
}

/// Returns the chosen placements in grid order, classes ascending within a
/// timeslot. `demand` is only read.
pub(crate) fn solve(catalog: &Catalog<'_>, demand: &Demand) -> anyhow::Result<Vec<Assignment>> {
    let mut pvars = ProblemVariables::new();
    let starts = declare_starts(catalog, demand, &mut pvars);
    if starts.is_empty() {
        return Ok(Vec::new());
    }
    let objective = starts
        .iter()
        .fold(Expression::from(0.0), |e, s| e + s.var);

    let mut model = pvars.maximise(objective).using(default_solver);
    model = add_demand_constraints(model, demand, &starts);
    model = add_booking_constraints(model, &starts);

    let sol = model
        .solve()
        .with_context(|| format!("solving over {} start variables", starts.len()))?;
    Ok(extract_solution(&starts, &sol))
}
