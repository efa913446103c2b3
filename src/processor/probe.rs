//! Failed-literal probing: trial propagation of unassigned literals at
//! the root level under a propagation budget.
use {
    crate::{
        assign::{AssignIF, AssignStack, PropagateIF},
        cdb::ClauseDB,
        solver::learn_empty_clause,
        state::State,
        types::*,
    },
};

/// probe unassigned active literals one level deep. A conflicting probe
/// fixes the opposite literal at the root; a conflict on that fix derives
/// the empty clause. The trial scans run through the second propagation
/// index, leaving the primary fixed point untouched.
pub fn probe(asg: &mut AssignStack, cdb: &mut ClauseDB, state: &mut State, _inprocessing: bool) {
    state.stats.probings += 1;
    if 0 < asg.decision_level() {
        asg.backtrack(0);
    }
    if asg.propagate(cdb).is_some() {
        state.conflict = None;
        learn_empty_clause(state);
        return;
    }
    asg.phase_saving = false;
    let budget = state.config.probe_min_eff;
    let start = asg.num_propagation;
    'all_vars: for vi in 1..=asg.num_vars {
        if budget <= asg.num_propagation - start {
            break;
        }
        if !asg.flags(vi).is_active() || asg.var_val(vi) != 0 {
            continue;
        }
        for positive in [true, false] {
            if asg.var_val(vi) != 0 {
                break;
            }
            let l = Lit::from_assign(vi, positive);
            asg.assign_by_decision(l);
            let conflicting = asg.propagate_trial(cdb).is_some();
            asg.backtrack(0);
            if conflicting {
                state.stats.failed_literals += 1;
                asg.assign_at_root(!l);
                if asg.propagate(cdb).is_some() {
                    state.conflict = None;
                    learn_empty_clause(state);
                    break 'all_vars;
                }
            }
        }
    }
    asg.phase_saving = true;
    state.lim.probe = asg.num_conflict + state.config.probe_int * (state.stats.probings + 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::VarManipulateIF;

    fn lits(v: &[i32]) -> Vec<Lit> {
        v.iter().map(|&i| Lit::from(i)).collect()
    }

    #[test]
    fn test_probe_fixes_failed_literal() {
        let cnf = CNFDescription {
            num_of_variables: 3,
            ..CNFDescription::default()
        };
        let config = Config::default();
        let mut asg = AssignStack::instantiate(&config, &cnf);
        let mut cdb = ClauseDB::instantiate(&config, &cnf);
        let mut state = State::instantiate(&config, &cnf);
        cdb.grow_watchers(asg.num_vars + 1);
        for vi in 1..=3 {
            asg.make_var_used(vi);
        }
        // 1 implies 2 and -2, so probing 1 must fail and fix -1
        cdb.new_clause(&lits(&[-1, 2]), false, 0);
        cdb.new_clause(&lits(&[-1, -2]), false, 0);
        probe(&mut asg, &mut cdb, &mut state, false);
        assert!(!state.unsat);
        assert_eq!(asg.fixed(1), -1);
        assert_eq!(asg.decision_level(), 0);
        assert!(0 < state.stats.failed_literals);
    }

    #[test]
    fn test_probe_derives_empty_clause() {
        let cnf = CNFDescription {
            num_of_variables: 2,
            ..CNFDescription::default()
        };
        let config = Config::default();
        let mut asg = AssignStack::instantiate(&config, &cnf);
        let mut cdb = ClauseDB::instantiate(&config, &cnf);
        let mut state = State::instantiate(&config, &cnf);
        cdb.grow_watchers(asg.num_vars + 1);
        for vi in 1..=2 {
            asg.make_var_used(vi);
        }
        cdb.new_clause(&lits(&[-1, 2]), false, 0);
        cdb.new_clause(&lits(&[-1, -2]), false, 0);
        cdb.new_clause(&lits(&[1, 2]), false, 0);
        cdb.new_clause(&lits(&[1, -2]), false, 0);
        probe(&mut asg, &mut cdb, &mut state, false);
        assert!(state.unsat);
    }
}
