//! Backward subsumption and strengthening over the occurrence lists.
use {
    super::Eliminator,
    crate::{
        assign::{AssignIF, AssignStack},
        cdb::{ClauseDB, ClauseIF, ClauseId, RefClause},
        solver::learn_empty_clause,
        state::State,
        types::*,
    },
};

/// remove clauses subsumed by a smaller one and strengthen clauses by
/// self-subsuming resolution, working outward from recently touched
/// variables under an occurrence budget.
pub fn subsume(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    elim: &mut Eliminator,
    state: &mut State,
    _inprocessing: bool,
) {
    state.stats.subsumptions += 1;
    if 0 < asg.decision_level() {
        asg.backtrack(0);
    }
    elim.prepare(asg, cdb);
    let mut cands: Vec<(usize, ClauseId)> = Vec::new();
    for (cid, c) in cdb.iter_living() {
        if c.is_redundant() || state.config.subsume_cls_lim < c.len() {
            continue;
        }
        if c
            .iter()
            .any(|&l| asg.flags(l.vi()).is(FlagVar::MARK_SUBSUME))
        {
            cands.push((c.len(), cid));
        }
    }
    cands.sort_unstable();
    let mut checked = 0usize;
    for (_, cid) in cands {
        if cdb[cid].is_dead() {
            continue;
        }
        if state.config.subsume_occ_lim * 10 < checked {
            break;
        }
        try_subsume(asg, cdb, elim, state, cid, &mut checked);
        if state.unsat {
            break;
        }
    }
    for vi in 1..=asg.num_vars {
        asg.flags_mut(vi).turn_off(FlagVar::MARK_SUBSUME);
    }
    cdb.garbage_collect();
    state.lim.subsume = asg.num_conflict + state.scale(state.config.subsume_int, asg);
}

/// check one candidate against the occurrences of its rarest literal.
/// Binary candidates work through the permanent subsuming clause.
fn try_subsume(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    elim: &mut Eliminator,
    state: &mut State,
    cid: ClauseId,
    checked: &mut usize,
) {
    debug_assert!(cid != ClauseId::subsuming());
    let small = if cdb[cid].len() == 2 {
        // route the check through the permanent binary clause
        let pair = cdb[cid].iter().copied().collect::<Vec<_>>();
        cdb[ClauseId::subsuming()].lits = pair;
        ClauseId::subsuming()
    } else {
        cid
    };
    let n = cdb[small].len();
    for k in 0..n {
        let q = cdb[small].lit_at(k);
        asg.marks[q.vi()] = if q.is_positive() { 1 } else { -1 };
    }
    // the rarest literal gives the shortest occurrence list
    let mut key = cdb[small].lit0();
    for k in 0..n {
        let q = cdb[small].lit_at(k);
        if elim.occurrences(q).len() < elim.occurrences(key).len() {
            key = q;
        }
    }
    let mut occurrences = elim.occurrences(key).to_vec();
    // self-subsumption needs the mirror lists too
    occurrences.extend_from_slice(elim.occurrences(!key));
    for did in occurrences {
        if did == cid || cdb[did].is_dead() || cdb[did].len() < n {
            continue;
        }
        *checked += 1;
        let mut found = 0usize;
        let mut negated: Option<Lit> = None;
        let mut give_up = false;
        for j in 0..cdb[did].len() {
            let x = cdb[did].lit_at(j);
            let m = asg.marks[x.vi()];
            if m == 0 {
                continue;
            }
            if (0 < m) == x.is_positive() {
                found += 1;
            } else if negated.is_some() {
                give_up = true;
                break;
            } else {
                negated = Some(x);
            }
        }
        if give_up {
            continue;
        }
        if found == n && negated.is_none() {
            cdb.remove_clause(did);
            state.stats.subsumed += 1;
        } else if found + 1 == n {
            if let Some(x) = negated {
                match cdb.shrink_clause(did, x, asg) {
                    RefClause::EmptyClause => {
                        learn_empty_clause(state);
                        break;
                    }
                    RefClause::UnitClause(u) => {
                        if asg.val(u) == 0 {
                            asg.assign_at_root(u);
                        }
                        state.stats.strengthened += 1;
                    }
                    RefClause::Clause(_) => {
                        state.stats.strengthened += 1;
                        mark_elim_candidates(asg, cdb, state, did);
                    }
                    RefClause::Dead => (),
                }
            }
        }
    }
    for k in 0..cdb[small].len() {
        let q = cdb[small].lit_at(k);
        asg.marks[q.vi()] = 0;
    }
}

/// a strengthened or fresh clause re-opens elimination on its variables.
pub(super) fn mark_elim_candidates(
    asg: &mut AssignStack,
    cdb: &ClauseDB,
    state: &mut State,
    cid: ClauseId,
) {
    for k in 0..cdb[cid].len() {
        let vi = cdb[cid].lit_at(k).vi();
        let f = asg.flags_mut(vi);
        if !f.is(FlagVar::MARK_ELIM) {
            f.turn_on(FlagVar::MARK_ELIM);
            state.stats.mark_elim += 1;
        }
        asg.flags_mut(vi).turn_on(FlagVar::MARK_SUBSUME);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::VarManipulateIF;

    fn lits(v: &[i32]) -> Vec<Lit> {
        v.iter().map(|&i| Lit::from(i)).collect()
    }

    #[test]
    fn test_backward_subsumption_and_strengthening() {
        let cnf = CNFDescription {
            num_of_variables: 4,
            ..CNFDescription::default()
        };
        let config = Config::default();
        let mut asg = AssignStack::instantiate(&config, &cnf);
        let mut cdb = ClauseDB::instantiate(&config, &cnf);
        let mut elim = Eliminator::instantiate(&config, &cnf);
        let mut state = State::instantiate(&config, &cnf);
        cdb.grow_watchers(asg.num_vars + 1);
        for vi in 1..=4 {
            asg.make_var_used(vi);
            asg.flags_mut(vi).turn_on(FlagVar::MARK_SUBSUME);
        }
        let small = cdb.new_clause(&lits(&[1, 2]), false, 0);
        let wide = cdb.new_clause(&lits(&[1, 2, 3]), false, 0);
        let strengthenable = cdb.new_clause(&lits(&[-1, 2, 4]), false, 0);
        subsume(&mut asg, &mut cdb, &mut elim, &mut state, false);
        assert!(!cdb[small].is_dead());
        // (1 2) subsumes (1 2 3)
        assert!(cdb[wide].is_dead());
        assert_eq!(state.stats.subsumed, 1);
        // (1 2) strengthens (-1 2 4) into (2 4)
        assert_eq!(state.stats.strengthened, 1);
        assert_eq!(cdb[strengthenable].len(), 2);
        assert!(!cdb[strengthenable].contains(Lit::from(-1)));
    }
}
