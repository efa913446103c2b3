//! Lucky-phase model attempts: constant polarities and the saved phases,
//! tried before the search proper starts learning anything.
use {
    super::search::{decide, satisfied},
    crate::{
        assign::{AssignIF, AssignStack, PropagateIF},
        cdb::{ClauseDB, ClauseIF},
        state::State,
        types::*,
    },
};

/// try to satisfy the formula without learning: all-true, all-false, then
/// the saved phases. Assumptions disable the constant attempts since a
/// forced polarity cannot respect them.
pub(super) fn lucky_phases(asg: &mut AssignStack, cdb: &mut ClauseDB, state: &mut State) -> i32 {
    if state.config.lucky == 0 || state.unsat || asg.num_vars == 0 {
        return 0;
    }
    if !state.assumptions.is_empty() {
        return 0;
    }
    debug_assert!(!state.searching_lucky_phases);
    state.searching_lucky_phases = true;
    let mut res = try_constant_phase(asg, cdb, state, true);
    if res == 0 {
        res = try_constant_phase(asg, cdb, state, false);
    }
    if res == 0 {
        res = try_to_satisfy_formula_by_saved_phases(asg, cdb, state);
    }
    if res == 10 {
        state.stats.luckies += 1;
    }
    state.searching_lucky_phases = false;
    res
}

/// decide every variable with one polarity. A cheap syntactic screen
/// rejects most formulas before any assignment is made.
fn try_constant_phase(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    state: &mut State,
    positive: bool,
) -> i32 {
    debug_assert_eq!(asg.decision_level(), 0);
    for (_, c) in cdb.iter_living() {
        if c.is_redundant() {
            continue;
        }
        if c.iter().any(|&l| l.is_positive() == positive) {
            continue;
        }
        if c.iter().any(|&l| 0 < asg.val(l)) {
            continue;
        }
        return 0;
    }
    loop {
        if satisfied(asg, state) {
            return 10;
        }
        let Some(vi) =
            (1..=asg.num_vars).find(|&vi| asg.flags(vi).is_active() && asg.var_val(vi) == 0)
        else {
            return 0;
        };
        asg.num_decision += 1;
        asg.assign_by_decision(Lit::from_assign(vi, positive));
        if asg.propagate(cdb).is_some() {
            // a redundant clause got in the way; leave it to the search
            asg.backtrack(0);
            state.conflict = None;
            return 0;
        }
    }
}

/// attempt to turn the saved phases into a model by plain decisions and
/// propagation. A conflict only means the saved phases contradict some
/// redundant clause, so it is swallowed and 0 is returned; this step
/// never learns and never proves unsatisfiability of the formula itself.
pub(super) fn try_to_satisfy_formula_by_saved_phases(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    state: &mut State,
) -> i32 {
    debug_assert_eq!(asg.decision_level(), 0);
    debug_assert!(!state.force_saved_phase);
    debug_assert_eq!(asg.propagated, asg.stack_len());
    state.force_saved_phase = true;
    let mut res = 0;
    loop {
        if satisfied(asg, state) {
            res = 10;
            break;
        }
        if decide(asg, cdb, state) != 0 {
            // inconsistent assumptions with redundant clauses and phases
            res = 20;
            break;
        }
        if asg.propagate(cdb).is_some() {
            debug_assert!(0 < asg.decision_level());
            asg.backtrack(0);
            state.conflict = None;
            break;
        }
    }
    debug_assert!(state.force_saved_phase);
    state.force_saved_phase = false;
    res
}
