//! Local-search driver: bounded WalkSAT-style rounds over the irredundant
//! clauses, feeding the result back through the saved phases.
use {
    super::{
        analyze::produce_failed_assumptions,
        lucky::try_to_satisfy_formula_by_saved_phases,
        restart::Restarter,
    },
    crate::{
        assign::{AssignIF, AssignStack},
        cdb::{ClauseDB, ClauseIF},
        state::{State, StateIF},
        types::*,
    },
};

/// run bounded walk rounds with a quadratically growing flip budget.
/// A satisfying walk is turned into a real trail through the saved-phase
/// model attempt; a clash with the assumptions produces the failed set.
pub(super) fn local_search(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    rst: &mut Restarter,
    state: &mut State,
) -> i32 {
    if state.unsat || asg.num_vars == 0 || state.config.walk == 0 {
        return 0;
    }
    let mut res = 0;
    for round in 1..=state.lim.localsearch {
        if res != 0 {
            break;
        }
        res = local_search_round(asg, cdb, state, round);
    }
    if res == 10 {
        res = try_to_satisfy_formula_by_saved_phases(asg, cdb, state);
    } else if res == 20 {
        debug_assert!(!state.assumptions.is_empty());
        produce_failed_assumptions(asg, cdb, rst, state);
    }
    res
}

fn local_search_round(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    state: &mut State,
    round: i64,
) -> i32 {
    debug_assert!(0 < round);
    if state.unsat || asg.num_vars == 0 {
        return 0;
    }
    debug_assert!(!state.localsearching);
    state.localsearching = true;
    // flip budget scaled quadratically with the round number
    let mut limit = state.config.walk_min_eff.saturating_mul(round);
    match limit.checked_mul(round) {
        Some(l) => limit = l,
        None => limit = i64::MAX,
    }
    let res = walk_round(asg, cdb, state, limit, true);
    debug_assert!(state.localsearching);
    state.localsearching = false;
    state.report('L');
    res
}

/// one walk over the irredundant clauses: 0 (undetermined), 10 (found a
/// satisfying assignment, stored in the saved phases) or 20 (an
/// assumption is already falsified at the root).
pub(crate) fn walk_round(
    asg: &mut AssignStack,
    cdb: &ClauseDB,
    state: &mut State,
    limit: i64,
    external: bool,
) -> i32 {
    debug_assert_eq!(asg.decision_level(), 0);
    state.stats.walks += 1;
    if external {
        for &a in &state.assumptions {
            if asg.val(a) < 0 {
                return 20;
            }
        }
    }
    let n = asg.num_vars;
    // candidate assignment: fixed values, then assumptions, then phases
    let mut cand = vec![0i8; n + 1];
    let mut pinned = vec![false; n + 1];
    for vi in 1..=n {
        let v = asg.var_val(vi);
        if v != 0 {
            cand[vi] = v;
            pinned[vi] = true;
        } else {
            cand[vi] = asg.phases.saved[vi];
        }
    }
    for &a in &state.assumptions {
        cand[a.vi()] = if a.is_positive() { 1 } else { -1 };
        pinned[a.vi()] = true;
    }
    let holds = |cand: &[i8], l: Lit| {
        if l.is_positive() {
            0 < cand[l.vi()]
        } else {
            cand[l.vi()] < 0
        }
    };
    // snapshot the living irredundant clauses with occurrence lists
    let mut clauses: Vec<Vec<Lit>> = Vec::new();
    for (_, c) in cdb.iter_living() {
        if c.is_redundant() {
            continue;
        }
        if c.iter().any(|&l| 0 < asg.val(l)) {
            continue;
        }
        clauses.push(c.iter().copied().filter(|&l| asg.val(l) == 0).collect());
    }
    let mut occ: Vec<Vec<usize>> = vec![Vec::new(); 2 * n + 2];
    let mut nsat: Vec<usize> = vec![0; clauses.len()];
    let mut unsat_pos: Vec<i32> = vec![-1; clauses.len()];
    let mut falsified: Vec<usize> = Vec::new();
    for (ci, c) in clauses.iter().enumerate() {
        for &l in c.iter() {
            occ[l.index()].push(ci);
            if holds(&cand, l) {
                nsat[ci] += 1;
            }
        }
        if nsat[ci] == 0 {
            unsat_pos[ci] = falsified.len() as i32;
            falsified.push(ci);
        }
    }
    let mut rng = XorShift64::new(state.config.walk_seed ^ state.stats.walks as u64);
    let mut best = falsified.len();
    let mut best_cand = cand.clone();
    let mut steps: i64 = 0;
    while !falsified.is_empty() && steps < limit {
        steps += 1;
        state.stats.walk_flips += 1;
        let ci = falsified[rng.next_below(falsified.len())];
        // candidate flips: the unpinned literals of the falsified clause
        let mut flip: Option<Lit> = None;
        let mut flip_breaks = usize::MAX;
        for &l in clauses[ci].iter() {
            if pinned[l.vi()] {
                continue;
            }
            // breaks: satisfied clauses in which the flipped literal was
            // the only satisfying one
            let breaks = occ[(!l).index()]
                .iter()
                .filter(|&&cj| nsat[cj] == 1 && holds(&cand, !l))
                .count();
            if breaks < flip_breaks || (breaks == flip_breaks && rng.next_below(2) == 0) {
                flip_breaks = breaks;
                flip = Some(l);
            }
        }
        let Some(l) = flip else {
            // every literal is pinned; this clause cannot be repaired
            break;
        };
        let vi = l.vi();
        let was_true = Lit::from_assign(vi, 0 < cand[vi]);
        cand[vi] = -cand[vi];
        for &cj in occ[was_true.index()].iter() {
            nsat[cj] -= 1;
            if nsat[cj] == 0 {
                unsat_pos[cj] = falsified.len() as i32;
                falsified.push(cj);
            }
        }
        for &cj in occ[(!was_true).index()].iter() {
            if nsat[cj] == 0 {
                let p = unsat_pos[cj];
                debug_assert!(0 <= p);
                let last = falsified.len() - 1;
                let moved = falsified[last];
                falsified[p as usize] = moved;
                unsat_pos[moved] = p;
                falsified.pop();
                unsat_pos[cj] = -1;
            }
            nsat[cj] += 1;
        }
        if falsified.len() < best {
            best = falsified.len();
            best_cand.copy_from_slice(&cand);
        }
    }
    // hand the best assignment seen to the phase records
    for vi in 1..=n {
        if !pinned[vi] && best_cand[vi] != 0 {
            asg.phases.min[vi] = best_cand[vi];
        }
    }
    if falsified.is_empty() {
        for vi in 1..=n {
            if !pinned[vi] && cand[vi] != 0 {
                asg.phases.saved[vi] = cand[vi];
            }
        }
        return 10;
    }
    0
}

/// A small xorshift generator; local search needs speed and
/// reproducibility, not quality.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> XorShift64 {
        XorShift64 { state: seed | 1 }
    }
    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
    fn next_below(&mut self, n: usize) -> usize {
        debug_assert!(0 < n);
        (self.next() % n as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Instantiate;

    #[test]
    fn test_walk_satisfies_an_easy_formula() {
        let cnf = CNFDescription {
            num_of_variables: 3,
            ..CNFDescription::default()
        };
        let config = Config::default();
        let mut asg = AssignStack::instantiate(&config, &cnf);
        let mut cdb = ClauseDB::instantiate(&config, &cnf);
        let mut state = State::instantiate(&config, &cnf);
        cdb.grow_watchers(asg.num_vars + 1);
        use crate::assign::VarManipulateIF;
        for vi in 1..=3 {
            asg.make_var_used(vi);
        }
        let c = |v: &[i32]| v.iter().map(|&i| Lit::from(i)).collect::<Vec<_>>();
        cdb.new_clause(&c(&[1, 2]), false, 0);
        cdb.new_clause(&c(&[-1, 3]), false, 0);
        cdb.new_clause(&c(&[-2, -3]), false, 0);
        let res = walk_round(&mut asg, &cdb, &mut state, 10_000, true);
        assert_eq!(res, 10);
        // the saved phases satisfy every clause now
        let val = |vi: usize| 0 < asg.phases.saved[vi];
        assert!(val(1) || val(2));
        assert!(!val(1) || val(3));
        assert!(!val(2) || !val(3));
    }
}
