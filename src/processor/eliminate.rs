//! Bounded variable elimination by clause distribution, with pure-literal
//! removal and the relaxing occurrence bound.
use {
    super::{subsume::mark_elim_candidates, Eliminator},
    crate::{
        assign::{AssignIF, AssignStack, VarManipulateIF},
        cdb::{ClauseDB, ClauseIF, ClauseId},
        solver::learn_empty_clause,
        state::State,
        types::*,
    },
};

/// eliminate variables whose occurrence count stays under `lim.elimbound`
/// and whose resolvents do not outgrow the retired clauses. When only the
/// bound stood in the way and nothing was eliminated, the bound doubles
/// so a later pass can make progress.
pub fn eliminate(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    elim: &mut Eliminator,
    state: &mut State,
    _inprocessing: bool,
) {
    state.stats.eliminations += 1;
    if 0 < asg.decision_level() {
        asg.backtrack(0);
    }
    elim.prepare(asg, cdb);
    let mut eliminated_any = false;
    let mut bounded = false;
    let mut retired_vars = false;
    for vi in 1..=asg.num_vars {
        if state.unsat {
            break;
        }
        if !asg.flags(vi).is_active() || asg.var_val(vi) != 0 || asg.is_frozen(vi) {
            continue;
        }
        if !asg.flags(vi).is(FlagVar::MARK_ELIM) {
            continue;
        }
        let plit = Lit::from_assign(vi, true);
        let pos: Vec<ClauseId> = living_occurrences(cdb, elim, plit);
        let neg: Vec<ClauseId> = living_occurrences(cdb, elim, !plit);
        if pos.is_empty() && neg.is_empty() {
            // no occurrences left; the unit record pins the extension
            // order but never comes back as a clause
            elim.push_witness(true, false, vec![plit.into()]);
            asg.make_var_pure(vi);
            state.stats.eliminated += 1;
            retired_vars = true;
            continue;
        }
        if pos.is_empty() || neg.is_empty() {
            // pure literal: retire the occurrence side
            let l = if pos.is_empty() { !plit } else { plit };
            for &cid in if pos.is_empty() { &neg } else { &pos } {
                elim.push_witness(true, true, externalized(cdb, cid, l));
                cdb.remove_clause(cid);
            }
            asg.make_var_pure(vi);
            state.stats.eliminated += 1;
            eliminated_any = true;
            retired_vars = true;
            continue;
        }
        if state.lim.elimbound < (pos.len() + neg.len()) as i64 {
            bounded = true;
            continue;
        }
        if state.config.elim_occ_lim < pos.len() * neg.len() {
            continue;
        }
        let Some(resolvents) = distribute(asg, cdb, &pos, &neg, vi, state.config.elim_grow_lim)
        else {
            continue;
        };
        // commit: retire the originals, keep the smaller side as witness
        let witness_positive = pos.len() <= neg.len();
        for &cid in pos.iter() {
            elim.push_witness(witness_positive, true, externalized(cdb, cid, plit));
            cdb.remove_clause(cid);
        }
        for &cid in neg.iter() {
            elim.push_witness(!witness_positive, true, externalized(cdb, cid, !plit));
            cdb.remove_clause(cid);
        }
        for r in resolvents {
            match r.len() {
                0 => {
                    learn_empty_clause(state);
                    break;
                }
                1 => {
                    if asg.val(r[0]) == 0 {
                        asg.assign_at_root(r[0]);
                    }
                }
                _ => {
                    let new_cid = cdb.new_clause(&r, false, 0);
                    for &l in r.iter() {
                        elim.register_occurrence(l, new_cid);
                    }
                    mark_elim_candidates(asg, cdb, state, new_cid);
                }
            }
        }
        asg.make_var_eliminated(vi);
        state.stats.eliminated += 1;
        eliminated_any = true;
        retired_vars = true;
    }
    if retired_vars {
        // learnt clauses over retired vars are meaningless now
        let stale: Vec<ClauseId> = cdb
            .iter_living()
            .filter(|(_, c)| {
                c.is_redundant()
                    && c.iter().any(|&l| {
                        asg.flags(l.vi())
                            .intersects(FlagVar::ELIMINATED | FlagVar::PURE)
                    })
            })
            .map(|(cid, _)| cid)
            .collect();
        for cid in stale {
            cdb.remove_clause(cid);
        }
    }
    for vi in 1..=asg.num_vars {
        asg.flags_mut(vi).turn_off(FlagVar::MARK_ELIM);
    }
    state.last.elim_marked = state.stats.mark_elim;
    if bounded && !eliminated_any && state.lim.elimbound < state.config.elim_bound_max {
        state.lim.elimbound = (2 * state.lim.elimbound).min(state.config.elim_bound_max);
    }
    cdb.garbage_collect();
    state.lim.elim = asg.num_conflict + state.scale(state.config.elim_int, asg);
}

fn living_occurrences(cdb: &ClauseDB, elim: &Eliminator, l: Lit) -> Vec<ClauseId> {
    elim.occurrences(l)
        .iter()
        .copied()
        .filter(|&cid| !cdb[cid].is_dead() && cdb[cid].contains(l))
        .collect()
}

/// the clause as external integers with the occurrence of the eliminated
/// variable in front.
fn externalized(cdb: &ClauseDB, cid: ClauseId, target: Lit) -> Vec<i32> {
    let mut v: Vec<i32> = Vec::with_capacity(cdb[cid].len());
    v.push(target.into());
    for &l in cdb[cid].iter() {
        if l != target {
            v.push(l.into());
        }
    }
    v
}

/// all non-tautological resolvents of the two occurrence sides, or None
/// when they outgrow the allowance.
fn distribute(
    asg: &mut AssignStack,
    cdb: &ClauseDB,
    pos: &[ClauseId],
    neg: &[ClauseId],
    vi: VarId,
    grow: usize,
) -> Option<Vec<Vec<Lit>>> {
    let allowance = pos.len() + neg.len() + grow;
    let mut resolvents: Vec<Vec<Lit>> = Vec::new();
    for &ci in pos.iter() {
        for &cj in neg.iter() {
            if let Some(r) = resolve(asg, cdb, ci, cj, vi) {
                resolvents.push(r);
                if allowance < resolvents.len() {
                    return None;
                }
            }
        }
    }
    Some(resolvents)
}

/// resolve two clauses on a variable; None for tautologies.
fn resolve(
    asg: &mut AssignStack,
    cdb: &ClauseDB,
    ci: ClauseId,
    cj: ClauseId,
    vi: VarId,
) -> Option<Vec<Lit>> {
    let mut r: Vec<Lit> = Vec::new();
    let mut tautology = false;
    for cid in [ci, cj] {
        for k in 0..cdb[cid].len() {
            let l = cdb[cid].lit_at(k);
            let w = l.vi();
            if w == vi || asg.val(l) < 0 {
                continue;
            }
            let m = asg.marks[w];
            let s: i8 = if l.is_positive() { 1 } else { -1 };
            if m == s {
                continue;
            }
            if m == -s {
                tautology = true;
                break;
            }
            asg.marks[w] = s;
            r.push(l);
        }
        if tautology {
            break;
        }
    }
    for &l in r.iter() {
        asg.marks[l.vi()] = 0;
    }
    (!tautology).then_some(r)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(v: &[i32]) -> Vec<Lit> {
        v.iter().map(|&i| Lit::from(i)).collect()
    }

    fn setup(nv: usize) -> (AssignStack, ClauseDB, Eliminator, State) {
        let cnf = CNFDescription {
            num_of_variables: nv,
            ..CNFDescription::default()
        };
        let config = Config::default();
        let mut asg = AssignStack::instantiate(&config, &cnf);
        let mut cdb = ClauseDB::instantiate(&config, &cnf);
        let elim = Eliminator::instantiate(&config, &cnf);
        let mut state = State::instantiate(&config, &cnf);
        state.lim.elimbound = config.elim_bound_min;
        cdb.grow_watchers(asg.num_vars + 1);
        for vi in 1..=nv {
            asg.make_var_used(vi);
            asg.flags_mut(vi).turn_on(FlagVar::MARK_ELIM);
        }
        (asg, cdb, elim, state)
    }

    #[test]
    fn test_eliminate_by_distribution() {
        let (mut asg, mut cdb, mut elim, mut state) = setup(3);
        let a = cdb.new_clause(&lits(&[1, 2]), false, 0);
        let b = cdb.new_clause(&lits(&[-1, 3]), false, 0);
        eliminate(&mut asg, &mut cdb, &mut elim, &mut state, false);
        // var 1 resolves into (2 3); vars 2 and 3 turn pure afterwards
        assert!(cdb[a].is_dead());
        assert!(cdb[b].is_dead());
        assert!(!asg.flags(1).is_active());
        assert!(0 < state.stats.eliminated);
        assert_eq!(asg.num_active + asg.num_inactive(), asg.num_vars);
    }

    #[test]
    fn test_elimbound_relaxes_without_progress() {
        let (mut asg, mut cdb, mut elim, mut state) = setup(2);
        state.lim.elimbound = 1;
        // two occurrences on each side exceed the bound of one
        cdb.new_clause(&lits(&[1, 2]), false, 0);
        cdb.new_clause(&lits(&[1, -2]), false, 0);
        cdb.new_clause(&lits(&[-1, 2]), false, 0);
        cdb.new_clause(&lits(&[-1, -2]), false, 0);
        eliminate(&mut asg, &mut cdb, &mut elim, &mut state, false);
        assert_eq!(state.lim.elimbound, 2);
    }
}
