//! The main CDCL loop with interleaved inprocessing, and the top-level
//! incremental solve lifecycle.
use {
    super::{
        analyze::{analyze, derive_failed_assumptions, learn_empty_clause},
        lucky::lucky_phases,
        restart::{restart, restarting, Restarter},
        walk::local_search,
        Solver,
    },
    crate::{
        assign::{rephase, AssignIF, AssignStack, PropagateIF, VarManipulateIF},
        cdb::ClauseDB,
        processor::{compact, eliminate, probe, subsume, Eliminator},
        state::{State, StateIF},
        types::*,
    },
};

impl Solver {
    /// decide the satisfiability of the loaded formula under the current
    /// assumptions: 0 (unknown), 10 (satisfiable) or 20 (unsatisfiable).
    ///
    /// The attempt ladder runs restore, preprocessing, local search and
    /// the lucky phases in order before the CDCL loop takes over.
    pub(super) fn solve_core(&mut self) -> i32 {
        let Solver {
            ref mut asg,
            ref mut cdb,
            ref mut elim,
            ref mut rst,
            ref mut state,
        } = self;
        debug_assert!(state.original.is_empty());
        state.stats.solves += 1;
        state.conflicts.clear();
        if 0 < asg.decision_level() {
            asg.backtrack(0);
        }
        let mut res = 0;
        if state.unsat {
            res = 20;
        } else if asg.propagate(cdb).is_some() {
            state.conflict = None;
            learn_empty_clause(state);
            res = 20;
        } else {
            state.init_limits(asg, rst);

            if state.config.restore_all <= 1 && elim.tainted.is_empty() {
                state.report('*');
            } else {
                state.report('+');
                elim.restore_clauses(asg, cdb, state);
                state.report('r');
                if !state.unsat && asg.propagate(cdb).is_some() {
                    state.conflict = None;
                    learn_empty_clause(state);
                    res = 20;
                }
            }

            if res == 0 {
                res = preprocess(asg, cdb, elim, state);
            }
            if res == 0 {
                res = local_search(asg, cdb, rst, state);
            }
            if res == 0 {
                res = lucky_phases(asg, cdb, state);
            }
            if res == 0 && !state.terminating(asg) {
                res = cdcl_loop_with_inprocessing(asg, cdb, elim, rst, state);
            }
        }
        state
            .termination_forced
            .store(false, std::sync::atomic::Ordering::Relaxed);
        // search budgets are one-shot
        state.inc.conflicts = -1;
        state.inc.decisions = -1;
        state.inc.preprocessing = 0;
        state.inc.localsearch = 0;
        if res == 10 {
            state.model = elim.extend_model(asg);
        } else {
            state.model.clear();
        }
        for a in std::mem::take(&mut state.assumptions) {
            asg.melt_var(a.vi());
        }
        asg.backtrack(0);
        match res {
            10 => state.report('1'),
            20 => state.report('0'),
            _ => state.report('?'),
        }
        res
    }
}

/// Central dispatch of the search. At each iteration the first matching
/// action is taken; conflict handling and satisfaction detection come
/// before any inprocessing trigger so that a conflict or model found by
/// propagation short-circuits the expensive passes.
pub fn cdcl_loop_with_inprocessing(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    elim: &mut Eliminator,
    rst: &mut Restarter,
    state: &mut State,
) -> i32 {
    let mut res = 0;
    state.report(if state.stable { '[' } else { '{' });
    loop {
        if state.unsat {
            res = 20;
        } else if let Some(cid) = asg.propagate(cdb) {
            state.conflict = Some(cid);
            analyze(asg, cdb, rst, state);
        } else if state.iterating {
            iterate(state);
        } else if satisfied(asg, state) {
            res = 10;
        } else if state.terminating(asg) {
            break;
        } else if restarting(asg, rst, state) {
            restart(asg, state);
        } else if rephasing(asg, state) {
            rephase(asg, state);
        } else if reducing(asg, state) {
            cdb.reduce(asg, state);
        } else if probing(asg, state) {
            probe(asg, cdb, state, true);
        } else if subsuming(asg, state) {
            subsume(asg, cdb, elim, state, true);
        } else if eliminating(asg, state) {
            eliminate(asg, cdb, elim, state, true);
        } else if compacting(asg, state) {
            compact(asg, cdb, elim, state);
        } else {
            res = decide(asg, cdb, state);
        }
        if res != 0 {
            break;
        }
    }
    state.report(if state.stable { ']' } else { '}' });
    res
}

/// true iff the trail is fully propagated, every active variable carries
/// a value and every assumption holds.
pub(super) fn satisfied(asg: &AssignStack, state: &State) -> bool {
    asg.all_assigned() && state.assumptions.iter().all(|&a| 0 < asg.val(a))
}

/// acknowledge a learnt unit and clear the flag.
fn iterate(state: &mut State) {
    state.stats.iterations += 1;
    state.iterating = false;
}

/// assign the next pending assumption, or pick a variable and polarity.
/// Returns 20 when an assumption clashes with the current assignment
/// (the failed set is derived on the spot), 0 otherwise.
pub(crate) fn decide(asg: &mut AssignStack, cdb: &ClauseDB, state: &mut State) -> i32 {
    for i in 0..state.assumptions.len() {
        let a = state.assumptions[i];
        let v = asg.val(a);
        if 0 < v {
            continue;
        }
        if v < 0 {
            derive_failed_assumptions(asg, cdb, state, a);
            return 20;
        }
        asg.num_decision += 1;
        asg.assign_by_decision(a);
        return 0;
    }
    if let Some(vi) = asg.select_decision_var(state.stable) {
        let positive = decide_phase(asg, state, vi);
        asg.num_decision += 1;
        asg.assign_by_decision(Lit::from_assign(vi, positive));
    } else {
        debug_assert!(asg.all_assigned());
    }
    0
}

/// the phase oracle: saved phases are forced during the saved-phase model
/// attempt; stable mode prefers target phases; the saved phase is the
/// everyday default.
fn decide_phase(asg: &AssignStack, state: &State, vi: VarId) -> bool {
    let initial = state.config.phase != 0;
    let saved = asg.phases.saved[vi];
    if state.force_saved_phase {
        return if saved == 0 { initial } else { 0 < saved };
    }
    if state.config.force_phase != 0 {
        return initial;
    }
    if state.stable && state.config.target_phase != 0 && asg.phases.target[vi] != 0 {
        return 0 < asg.phases.target[vi];
    }
    if saved == 0 {
        initial
    } else {
        0 < saved
    }
}

//
//## inprocessing triggers
//
fn rephasing(asg: &AssignStack, state: &State) -> bool {
    state.config.rephase != 0 && state.lim.rephase <= asg.num_conflict
}

fn reducing(asg: &AssignStack, state: &State) -> bool {
    state.config.reduce != 0 && state.lim.reduce <= asg.num_conflict
}

fn probing(asg: &AssignStack, state: &State) -> bool {
    state.config.probe != 0 && state.lim.probe <= asg.num_conflict
}

fn subsuming(asg: &AssignStack, state: &State) -> bool {
    state.config.subsume != 0 && state.lim.subsume <= asg.num_conflict
}

fn eliminating(asg: &AssignStack, state: &State) -> bool {
    state.config.elim != 0
        && state.lim.elim <= asg.num_conflict
        && state.last.elim_marked < state.stats.mark_elim
}

fn compacting(asg: &AssignStack, state: &State) -> bool {
    state.config.compact != 0
        && state.lim.compact <= asg.num_conflict
        && 0 < asg.num_vars
        && state.config.compact_lim * asg.num_vars <= 100 * asg.num_inactive()
}

//
//## preprocessing driver
//
/// run up to `lim.preprocessing` rounds of probing and elimination,
/// stopping as soon as a round makes no progress.
pub(super) fn preprocess(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    elim: &mut Eliminator,
    state: &mut State,
) -> i32 {
    if state.config.simplify != 0 {
        for round in 1..=state.lim.preprocessing {
            if !preprocess_round(asg, cdb, elim, state, round) {
                break;
            }
        }
    }
    if state.unsat {
        20
    } else {
        0
    }
}

/// one bounded round of probing and elimination. Progress means fewer
/// active variables or a relaxed elimination cost bound.
fn preprocess_round(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    elim: &mut Eliminator,
    state: &mut State,
    _round: i64,
) -> bool {
    if state.unsat {
        return false;
    }
    if asg.num_vars == 0 {
        return false;
    }
    let before_vars = asg.num_active;
    let old_elimbound = state.lim.elimbound;
    state.stats.preprocessings += 1;
    debug_assert!(!state.preprocessing);
    state.preprocessing = true;
    if state.config.probe != 0 {
        probe(asg, cdb, state, false);
    }
    if state.config.elim != 0 {
        eliminate(asg, cdb, elim, state, false);
    }
    let after_vars = asg.num_active;
    debug_assert!(state.preprocessing);
    state.preprocessing = false;
    state.report('P');
    if state.unsat {
        return false;
    }
    after_vars < before_vars || old_elimbound < state.lim.elimbound
}
