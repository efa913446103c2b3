//! Conflict analysis: first-UIP clause learning and the derivation of
//! failed assumptions.
use {
    super::restart::Restarter,
    super::search::decide,
    crate::{
        assign::{AssignIF, AssignReason, AssignStack, PropagateIF},
        cdb::{ClauseDB, ClauseIF},
        state::State,
        types::*,
    },
};

/// resolve the conflict recorded in `state.conflict` into a first-UIP
/// learnt clause, backjump and assert the UIP. A conflict at the root
/// level derives the empty clause instead.
pub fn analyze(asg: &mut AssignStack, cdb: &mut ClauseDB, rst: &mut Restarter, state: &mut State) {
    let Some(conflict) = state.conflict.take() else {
        debug_assert!(false, "analyze without a conflict");
        return;
    };
    asg.num_conflict += 1;
    if asg.decision_level() == 0 {
        learn_empty_clause(state);
        return;
    }
    debug_assert!(state.clause.is_empty());
    let level = asg.decision_level();
    let mut analyzed: Vec<VarId> = Vec::new();
    let mut path = 0usize;
    let mut ti = asg.stack_len();
    let mut skip_vi: VarId = 0;
    let mut c = conflict;
    let uip: Lit;
    loop {
        if cdb[c].is_redundant() {
            cdb[c].turn_on(FlagClause::USED);
        }
        for k in 0..cdb[c].len() {
            let q = cdb[c].lit_at(k);
            let vi = q.vi();
            if vi == skip_vi || asg.marks[vi] != 0 || asg.level(vi) == 0 {
                continue;
            }
            asg.marks[vi] = 1;
            analyzed.push(vi);
            asg.bump_score(vi);
            if level <= asg.level(vi) {
                path += 1;
            } else {
                state.clause.push(q);
            }
        }
        debug_assert!(0 < path);
        // seek the next marked literal on the current-level trail block
        loop {
            ti -= 1;
            if asg.marks[asg.stack(ti).vi()] != 0 {
                break;
            }
        }
        let l = asg.stack(ti);
        debug_assert_eq!(asg.trail_position(l), ti as i32);
        path -= 1;
        if path == 0 {
            uip = !l;
            break;
        }
        skip_vi = l.vi();
        match asg.reason(l.vi()) {
            AssignReason::Implication(r) => c = r,
            _ => {
                // only the decision itself can remain on the path
                debug_assert!(false, "broken implication graph");
                uip = !l;
                break;
            }
        }
    }
    // shed literals whose reasons are fully covered by the rest
    let kept: Vec<Lit> = state
        .clause
        .iter()
        .copied()
        .filter(|&q| match asg.reason(q.vi()) {
            AssignReason::Implication(r) => !cdb[r]
                .iter()
                .all(|&x| x.vi() == q.vi() || asg.level(x.vi()) == 0 || asg.marks[x.vi()] != 0),
            _ => true,
        })
        .collect();
    state.clause = kept;
    let mut lvs: Vec<DecisionLevel> = state
        .clause
        .iter()
        .map(|&q| asg.level(q.vi()))
        .collect();
    lvs.sort_unstable();
    lvs.dedup();
    let glue = (lvs.len() + 1).min(u16::MAX as usize) as u16;
    if state.clause.is_empty() {
        asg.backtrack(0);
        asg.assign_at_root(uip);
        state.iterating = true;
        state.stats.learned += 1;
        state.stats.learned_units += 1;
        notify_learner(state, &[i32::from(uip)]);
    } else {
        // the backjump-level literal becomes the second watch
        let mut bi = 0;
        let mut bl = 0;
        for (i, &q) in state.clause.iter().enumerate() {
            let lv = asg.level(q.vi());
            if bl < lv {
                bl = lv;
                bi = i;
            }
        }
        state.clause.swap(0, bi);
        let mut lits = Vec::with_capacity(1 + state.clause.len());
        lits.push(uip);
        lits.extend_from_slice(&state.clause);
        asg.backtrack(bl);
        let learnt = cdb.new_clause(&lits, true, glue);
        cdb[learnt].turn_on(FlagClause::USED);
        asg.assign_by_implication(uip, learnt);
        state.stats.learned += 1;
        notify_learner(state, &i32s(&lits));
    }
    rst.update_after_conflict(glue as f64, state.stable);
    asg.decay_scores(state.config.var_decay);
    for vi in analyzed {
        asg.marks[vi] = 0;
    }
    state.clause.clear();
}

/// record that the formula became unconditionally unsatisfiable.
pub fn learn_empty_clause(state: &mut State) {
    state.unsat = true;
}

fn notify_learner(state: &mut State, lits: &[i32]) {
    if let Some((maxlen, cb)) = &mut state.learner {
        if lits.len() <= *maxlen {
            cb(lits);
        }
    }
}

/// collect the assumptions reachable from the falsified assumption's
/// implication graph into `state.conflicts`, the failed-assumption set.
pub fn derive_failed_assumptions(
    asg: &mut AssignStack,
    cdb: &ClauseDB,
    state: &mut State,
    failing: Lit,
) {
    state.conflicts.clear();
    state.conflicts.push(failing);
    let mut stack = vec![failing.vi()];
    let mut visited = vec![failing.vi()];
    asg.marks[failing.vi()] = 1;
    while let Some(vi) = stack.pop() {
        match asg.reason(vi) {
            AssignReason::Implication(cid) => {
                for k in 0..cdb[cid].len() {
                    let w = cdb[cid].lit_at(k).vi();
                    if w != vi && asg.marks[w] == 0 {
                        asg.marks[w] = 1;
                        visited.push(w);
                        stack.push(w);
                    }
                }
            }
            AssignReason::Decision(lvl) if 0 < lvl => {
                let t = Lit::from_assign(vi, 0 < asg.var_val(vi));
                if state.assumptions.contains(&t) && !state.conflicts.contains(&t) {
                    state.conflicts.push(t);
                }
            }
            _ => (),
        }
    }
    for vi in visited {
        asg.marks[vi] = 0;
    }
}

/// drive decisions and propagation over the assumptions until either a
/// clash pins down a failed set or the formula itself turns out to be
/// unconditionally unsatisfiable.
pub fn produce_failed_assumptions(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    rst: &mut Restarter,
    state: &mut State,
) {
    debug_assert_eq!(asg.decision_level(), 0);
    debug_assert!(!state.assumptions.is_empty());
    while !state.unsat {
        if decide(asg, cdb, state) != 0 {
            break;
        }
        loop {
            match asg.propagate(cdb) {
                None => break,
                Some(cid) => {
                    state.conflict = Some(cid);
                    analyze(asg, cdb, rst, state);
                    if state.unsat {
                        break;
                    }
                }
            }
        }
    }
}
