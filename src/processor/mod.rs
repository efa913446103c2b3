//! Module `processor` provides the bounded simplification passes scheduled
//! by the search: failed-literal probing, clause subsumption, variable
//! elimination and compaction, plus the witness bookkeeping that makes
//! elimination reversible.

/// inactive-variable and arena compaction
mod compact;
/// bounded variable elimination
mod eliminate;
/// failed-literal probing
mod probe;
/// backward subsumption and strengthening
mod subsume;

pub use self::{compact::compact, eliminate::eliminate, probe::probe, subsume::subsume};

use crate::{
    assign::{AssignIF, AssignStack, VarManipulateIF},
    cdb::{ClauseDB, ClauseIF, ClauseId},
    solver::build::add_new_clause,
    state::State,
    types::*,
};

/// One record of the elimination stack. The first literal is the
/// occurrence of the eliminated variable. Records of the chosen witness
/// side drive model extension; restorable records are real retired
/// clauses and come back verbatim on restore, while the fabricated unit
/// of a var without occurrences only pins its extension order.
#[derive(Clone, Debug)]
pub struct Witness {
    pub witness: bool,
    pub restore: bool,
    pub lits: Vec<i32>,
}

/// Bookkeeping of the simplification passes: occurrence lists rebuilt per
/// pass, the elimination witness stack, and the externally re-used
/// eliminated variables awaiting restore.
#[derive(Clone, Debug, Default)]
pub struct Eliminator {
    /// occurrence lists over living irredundant clauses, by `Lit::index()`
    occur: Vec<Vec<ClauseId>>,
    /// elimination witnesses in chronological order
    witnesses: Vec<Witness>,
    /// eliminated vars re-used by `add` or `assume` since the last solve
    pub tainted: Vec<VarId>,
    /// clauses over tainted vars, parked until the next restore
    pending: Vec<Vec<i32>>,
}

impl Instantiate for Eliminator {
    fn instantiate(_config: &Config, _cnf: &CNFDescription) -> Eliminator {
        Eliminator::default()
    }
}

impl Eliminator {
    /// rebuild the occurrence lists, retiring root-satisfied clauses on
    /// the way. Only unassigned literals of irredundant clauses occur.
    pub fn prepare(&mut self, asg: &AssignStack, cdb: &mut ClauseDB) {
        debug_assert_eq!(asg.decision_level(), 0);
        let want = 2 * asg.num_vars + 2;
        if self.occur.len() < want {
            self.occur.resize(want, Vec::new());
        }
        for ws in self.occur.iter_mut() {
            ws.clear();
        }
        let mut satisfied: Vec<ClauseId> = Vec::new();
        for (cid, c) in cdb.iter_living() {
            if c.is_redundant() {
                continue;
            }
            if c.iter().any(|&l| 0 < asg.val(l)) {
                satisfied.push(cid);
                continue;
            }
            for &l in c.iter() {
                if asg.val(l) == 0 {
                    self.occur[l.index()].push(cid);
                }
            }
        }
        for cid in satisfied {
            cdb.remove_clause(cid);
        }
    }
    /// the living clauses currently containing a literal.
    pub fn occurrences(&self, l: Lit) -> &[ClauseId] {
        self.occur
            .get(l.index())
            .map_or(&[][..], |v| v.as_slice())
    }
    pub(super) fn register_occurrence(&mut self, l: Lit, cid: ClauseId) {
        if l.index() < self.occur.len() {
            self.occur[l.index()].push(cid);
        }
    }
    /// release the pass-local memory; called by compaction.
    pub fn shrink_occurs(&mut self) {
        for ws in self.occur.iter_mut() {
            ws.clear();
            ws.shrink_to_fit();
        }
    }
    pub(super) fn push_witness(&mut self, witness: bool, restore: bool, lits: Vec<i32>) {
        self.witnesses.push(Witness {
            witness,
            restore,
            lits,
        });
    }
    /// remember that an eliminated variable reappeared externally.
    pub fn taint(&mut self, vi: VarId) {
        if !self.tainted.contains(&vi) {
            self.tainted.push(vi);
        }
    }
    /// park a clause over tainted variables until the next restore.
    pub fn defer(&mut self, lits: Vec<i32>) {
        self.pending.push(lits);
    }
    /// reactivate tainted variables (all eliminated ones under
    /// `restore_all = 2`) and re-add their retired clauses.
    pub fn restore_clauses(&mut self, asg: &mut AssignStack, cdb: &mut ClauseDB, state: &mut State) {
        let mut targets: Vec<VarId> = if state.config.restore_all == 2 {
            (1..=asg.num_vars)
                .filter(|&vi| {
                    asg.flags(vi)
                        .intersects(FlagVar::ELIMINATED | FlagVar::PURE)
                })
                .collect()
        } else {
            std::mem::take(&mut self.tainted)
        };
        targets.retain(|&vi| {
            asg.flags(vi)
                .intersects(FlagVar::ELIMINATED | FlagVar::PURE)
        });
        // close over entangled eliminations: a restored witness clause
        // must not bring back a literal of a still-eliminated var
        loop {
            let mut grew = false;
            for w in self.witnesses.iter() {
                let tvi = w.lits[0].unsigned_abs() as VarId;
                if !targets.contains(&tvi) {
                    continue;
                }
                for &x in &w.lits[1..] {
                    let u = x.unsigned_abs() as VarId;
                    if asg
                        .flags(u)
                        .intersects(FlagVar::ELIMINATED | FlagVar::PURE)
                        && !targets.contains(&u)
                    {
                        targets.push(u);
                        grew = true;
                    }
                }
            }
            if !grew {
                break;
            }
        }
        targets.sort_unstable();
        targets.dedup();
        for &vi in &targets {
            asg.reactivate_var(vi);
        }
        let mut kept: Vec<Witness> = Vec::with_capacity(self.witnesses.len());
        let mut restored: Vec<Vec<i32>> = Vec::new();
        for w in std::mem::take(&mut self.witnesses) {
            let vi = w.lits[0].unsigned_abs() as VarId;
            if targets.binary_search(&vi).is_ok() {
                if w.restore {
                    restored.push(w.lits);
                }
            } else {
                kept.push(w);
            }
        }
        self.witnesses = kept;
        for lits in restored {
            add_new_clause(asg, cdb, state, &lits);
        }
        for lits in std::mem::take(&mut self.pending) {
            add_new_clause(asg, cdb, state, &lits);
        }
        self.tainted.clear();
    }
    /// extend the current assignment over eliminated, pure and unused
    /// variables by replaying the witness stack backwards; unused slots
    /// fall back to the saved phase.
    pub fn extend_model(&self, asg: &AssignStack) -> Vec<i8> {
        let n = asg.num_vars;
        let mut ext = vec![0i8; n + 1];
        for vi in 1..=n {
            ext[vi] = asg.var_val(vi);
        }
        let holds = |ext: &[i8], l: i32| {
            let v = ext[l.unsigned_abs() as usize];
            if 0 < l {
                0 < v
            } else {
                v < 0
            }
        };
        for w in self.witnesses.iter().rev() {
            if !w.witness {
                continue;
            }
            let t = w.lits[0];
            let vi = t.unsigned_abs() as usize;
            if w.lits.iter().any(|&l| holds(&ext, l)) {
                // satisfied anyway; the other side is the sound default
                if ext[vi] == 0 {
                    ext[vi] = if 0 < t { -1 } else { 1 };
                }
            } else {
                ext[vi] = if 0 < t { 1 } else { -1 };
            }
        }
        for vi in 1..=n {
            if ext[vi] == 0 {
                ext[vi] = asg.phases.saved[vi];
            }
        }
        ext
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_model_forces_witness_targets() {
        let cnf = CNFDescription {
            num_of_variables: 3,
            ..CNFDescription::default()
        };
        let config = Config::default();
        let mut asg = AssignStack::instantiate(&config, &cnf);
        let mut elim = Eliminator::instantiate(&config, &cnf);
        for vi in 1..=3 {
            asg.make_var_used(vi);
        }
        // var 2 eliminated from (2 v -1) and (-2 v 3): witness side +2
        asg.make_var_eliminated(2);
        elim.push_witness(true, true, vec![2, -1]);
        elim.push_witness(false, true, vec![-2, 3]);
        asg.assign_at_root(Lit::from(1));
        asg.assign_at_root(Lit::from(3));
        let ext = elim.extend_model(&asg);
        // (2 v -1) forces 2 under 1 = true
        assert_eq!(ext[1], 1);
        assert_eq!(ext[2], 1);
        assert_eq!(ext[3], 1);
    }

    #[test]
    fn test_extend_model_defaults_to_saved_phase() {
        let cnf = CNFDescription {
            num_of_variables: 2,
            ..CNFDescription::default()
        };
        let config = Config::default();
        let asg = AssignStack::instantiate(&config, &cnf);
        let elim = Eliminator::instantiate(&config, &cnf);
        let ext = elim.extend_model(&asg);
        assert_eq!(ext[1], 1);
        assert_eq!(ext[2], 1);
    }
}
