//! Clause database transactions: construction, watcher upkeep, learnt
//! reduction and garbage collection.
use {
    super::{Clause, ClauseDB, ClauseIF, ClauseId, Watch},
    crate::{
        assign::{AssignIF, AssignReason, AssignStack},
        state::State,
        types::*,
    },
};

/// Outcome of a database transaction on one clause.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RefClause {
    /// a regular clause was produced or kept.
    Clause(ClauseId),
    /// the clause is permanently satisfied or tautological.
    Dead,
    /// the clause shrank to nothing.
    EmptyClause,
    /// the clause shrank to a single literal.
    UnitClause(Lit),
}

impl ClauseDB {
    /// register a new clause over at least two literals. The first two
    /// become the watched pair.
    pub fn new_clause(&mut self, lits: &[Lit], learnt: bool, rank: u16) -> ClauseId {
        debug_assert!(2 <= lits.len());
        let cid = if let Some(cid) = self.freelist.pop() {
            let c = &mut self.clause[cid.ordinal as usize];
            c.lits.clear();
            c.lits.extend_from_slice(lits);
            c.flags = FlagClause::empty();
            c.rank = rank;
            cid
        } else {
            let cid = ClauseId::from(self.clause.len());
            self.clause.push(Clause {
                lits: lits.to_vec(),
                flags: FlagClause::empty(),
                rank,
            });
            cid
        };
        if learnt {
            self[cid].turn_on(FlagClause::LEARNT);
            self.num_redundant += 1;
        } else {
            self.num_irredundant += 1;
        }
        self.watch[lits[0].index()].push(Watch {
            blocker: lits[1],
            c: cid,
        });
        self.watch[lits[1].index()].push(Watch {
            blocker: lits[0],
            c: cid,
        });
        cid
    }
    /// schedule a clause for collection; its watches die at the next
    /// `garbage_collect`.
    pub fn remove_clause(&mut self, cid: ClauseId) {
        debug_assert!(cid != ClauseId::subsuming());
        if self[cid].is_dead() {
            return;
        }
        if self[cid].is_redundant() {
            self.num_redundant -= 1;
        } else {
            self.num_irredundant -= 1;
        }
        self[cid].turn_on(FlagClause::GARBAGE);
    }
    /// true iff the clause is the reason of a current assignment.
    pub fn is_locked(&self, cid: ClauseId, asg: &AssignStack) -> bool {
        let c = &self[cid];
        !c.is_empty()
            && 0 < asg.val(c.lit0())
            && asg.reason(c.lit0().vi()) == AssignReason::Implication(cid)
    }

    //
    //## watcher upkeep
    //
    pub(crate) fn take_watchers(&mut self, l: Lit) -> Vec<Watch> {
        std::mem::take(&mut self.watch[l.index()])
    }
    pub(crate) fn restore_watchers(&mut self, l: Lit, ws: Vec<Watch>) {
        debug_assert!(self.watch[l.index()].is_empty());
        self.watch[l.index()] = ws;
    }
    /// swap the watched pair so the falsified literal sits at position 1;
    /// return the other watched literal.
    pub(crate) fn normalize_watch(&mut self, cid: ClauseId, false_lit: Lit) -> Lit {
        let c = &mut self.clause[cid.ordinal as usize];
        if c.lits[0] == false_lit {
            c.lits.swap(0, 1);
        }
        debug_assert_eq!(c.lits[1], false_lit);
        c.lits[0]
    }
    /// replace the second watch with the k-th literal.
    pub(crate) fn rewatch(&mut self, cid: ClauseId, k: usize) {
        let c = &mut self.clause[cid.ordinal as usize];
        c.lits.swap(1, k);
        let blocker = c.lits[0];
        let w = c.lits[1];
        self.watch[w.index()].push(Watch { blocker, c: cid });
    }
    fn detach_watch(&mut self, cid: ClauseId, l: Lit) {
        self.watch[l.index()].retain(|w| w.c != cid);
    }
    /// remove a literal from a clause at the root level, re-establishing
    /// the watch invariant afterwards.
    pub fn shrink_clause(&mut self, cid: ClauseId, l: Lit, asg: &AssignStack) -> RefClause {
        debug_assert_eq!(asg.decision_level(), 0);
        debug_assert!(self[cid].contains(l));
        self.detach_watch(cid, self[cid].lit0());
        self.detach_watch(cid, self[cid].lit1());
        if self[cid].lits.iter().any(|&lk| 0 < asg.val(lk)) {
            // got satisfied at the root in the meantime
            self.remove_clause(cid);
            return RefClause::Dead;
        }
        let c = &mut self.clause[cid.ordinal as usize];
        c.lits.retain(|&lk| lk != l && asg.val(lk) == 0);
        match self[cid].len() {
            0 => {
                self.remove_clause(cid);
                RefClause::EmptyClause
            }
            1 => {
                let unit = self[cid].lit0();
                self.remove_clause(cid);
                RefClause::UnitClause(unit)
            }
            _ => {
                let c = &self[cid];
                let (l0, l1) = (c.lit0(), c.lit1());
                self.watch[l0.index()].push(Watch {
                    blocker: l1,
                    c: cid,
                });
                self.watch[l1.index()].push(Watch {
                    blocker: l0,
                    c: cid,
                });
                RefClause::Clause(cid)
            }
        }
    }
    /// drop watches of dead clauses and recycle their slots.
    pub fn garbage_collect(&mut self) {
        let ClauseDB {
            ref clause,
            ref mut watch,
            ..
        } = *self;
        for ws in watch.iter_mut() {
            ws.retain(|w| !clause[w.c.ordinal as usize].is_dead());
        }
        for (i, c) in self.clause.iter_mut().enumerate().skip(1) {
            if c.is_dead() && !c.lits.is_empty() {
                c.lits.clear();
                self.freelist.push(ClauseId::from(i));
            }
        }
    }

    //
    //## reduction
    //
    /// delete low-utility learnt clauses, or all of them when the flush
    /// limit has been reached.
    pub fn reduce(&mut self, asg: &mut AssignStack, state: &mut State) {
        state.stats.reductions += 1;
        let flushing = state.config.flush != 0 && state.lim.flush <= state.stats.reductions;
        let mut targets: Vec<(u16, usize, ClauseId)> = Vec::new();
        for i in 1..self.clause.len() {
            let cid = ClauseId::from(i);
            let c = &self.clause[i];
            if c.is_dead() || !c.is_redundant() {
                continue;
            }
            if c.is(FlagClause::USED) {
                // clauses touched since the last reduction get one more life
                self.clause[i].turn_off(FlagClause::USED);
                if !flushing {
                    continue;
                }
            }
            let c = &self.clause[i];
            if !flushing && c.rank <= 2 {
                continue;
            }
            if self.is_locked(cid, asg) {
                continue;
            }
            let c = &self.clause[i];
            targets.push((c.rank, c.len(), cid));
        }
        if flushing {
            state.stats.flushes += 1;
            state.inc.flush *= 2;
            state.lim.flush = state.stats.reductions + state.inc.flush;
            for (_, _, cid) in targets.iter() {
                self.remove_clause(*cid);
            }
        } else {
            // big glue first, long clauses first among equals
            targets.sort_unstable_by(|a, b| b.cmp(a));
            for (_, _, cid) in targets.iter().take(targets.len() / 2) {
                self.remove_clause(*cid);
            }
        }
        self.garbage_collect();
        state.last.reduce_conflicts = asg.num_conflict;
        state.lim.reduce =
            asg.num_conflict + state.config.reduce_int * (state.stats.reductions + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Instantiate;

    fn lits(v: &[i32]) -> Vec<Lit> {
        v.iter().map(|&i| Lit::from(i)).collect()
    }

    #[test]
    fn test_new_clause_sets_watches() {
        let cnf = CNFDescription {
            num_of_variables: 4,
            ..CNFDescription::default()
        };
        let config = Config::default();
        let mut cdb = ClauseDB::instantiate(&config, &cnf);
        cdb.grow_watchers(8);
        let cid = cdb.new_clause(&lits(&[1, -2, 3]), false, 0);
        assert_ne!(cid, ClauseId::subsuming());
        assert_eq!(cdb.num_irredundant, 1);
        assert_eq!(cdb.watch[Lit::from(1).index()].len(), 1);
        assert_eq!(cdb.watch[Lit::from(-2).index()].len(), 1);
        assert_eq!(cdb.watch[Lit::from(3).index()].len(), 0);
    }

    #[test]
    fn test_remove_and_collect_recycles_slot() {
        let cnf = CNFDescription {
            num_of_variables: 4,
            ..CNFDescription::default()
        };
        let config = Config::default();
        let mut cdb = ClauseDB::instantiate(&config, &cnf);
        cdb.grow_watchers(8);
        let cid = cdb.new_clause(&lits(&[1, -2, 3]), false, 0);
        cdb.remove_clause(cid);
        assert_eq!(cdb.num_irredundant, 0);
        cdb.garbage_collect();
        assert!(cdb.watch[Lit::from(1).index()].is_empty());
        let cid2 = cdb.new_clause(&lits(&[2, 4]), true, 2);
        assert_eq!(cid, cid2);
        assert_eq!(cdb.num_redundant, 1);
    }
}
