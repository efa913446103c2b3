//! Boolean constraint propagation over two-watched literals
use {
    super::AssignStack,
    crate::cdb::{ClauseDB, ClauseIF, ClauseId},
};

/// API for Boolean constraint propagation.
pub trait PropagateIF {
    /// propagate the trail to a fixed point; return the conflicting clause
    /// if one is found.
    fn propagate(&mut self, cdb: &mut ClauseDB) -> Option<ClauseId>;
    /// propagate a trial assignment, scanning through the second index so
    /// the primary one keeps pointing at the pre-trial fixed point.
    fn propagate_trial(&mut self, cdb: &mut ClauseDB) -> Option<ClauseId>;
}

impl PropagateIF for AssignStack {
    fn propagate(&mut self, cdb: &mut ClauseDB) -> Option<ClauseId> {
        propagate_core(self, cdb, false)
    }
    fn propagate_trial(&mut self, cdb: &mut ClauseDB) -> Option<ClauseId> {
        self.propagated2 = self.propagated;
        propagate_core(self, cdb, true)
    }
}

fn propagate_core(asg: &mut AssignStack, cdb: &mut ClauseDB, trial: bool) -> Option<ClauseId> {
    loop {
        let i = if trial { asg.propagated2 } else { asg.propagated };
        if asg.trail.len() <= i {
            if !trial {
                asg.no_conflict_until = asg.trail.len();
            }
            return None;
        }
        let p = asg.trail[i];
        if trial {
            asg.propagated2 += 1;
        } else {
            asg.propagated += 1;
        }
        asg.num_propagation += 1;
        let false_lit = !p;
        // take the watcher list to release the borrow on the database
        let mut watches = cdb.take_watchers(false_lit);
        let mut conflict = None;
        let mut i = 0;
        'next_watch: while i < watches.len() {
            let w = watches[i];
            if 0 < asg.val(w.blocker) {
                i += 1;
                continue;
            }
            let cid = w.c;
            // afterwards the false literal sits at the second watch position
            let other = cdb.normalize_watch(cid, false_lit);
            let other_val = asg.val(other);
            if 0 < other_val {
                watches[i].blocker = other;
                i += 1;
                continue;
            }
            // search a replacement watch among the tail literals
            let len = cdb[cid].len();
            for k in 2..len {
                let lk = cdb[cid].lit_at(k);
                if 0 <= asg.val(lk) {
                    cdb.rewatch(cid, k);
                    watches.swap_remove(i);
                    continue 'next_watch;
                }
            }
            if other_val < 0 {
                conflict = Some(cid);
                break;
            }
            asg.assign_by_implication(other, cid);
            i += 1;
        }
        cdb.restore_watchers(false_lit, watches);
        if conflict.is_some() {
            return conflict;
        }
    }
}
