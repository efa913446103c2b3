//! main struct AssignStack
use {
    super::{
        heap::VarHeapIF, AssignIF, AssignReason, Level, PhaseRec, Var, VarIdHeap,
        VarManipulateIF, VarQueue,
    },
    crate::types::*,
    std::fmt,
};

/// A record of assignments and the per-variable tables, called 'trail' in
/// Glucose. Values are accessible directly by literal through a buffer
/// shifted by `vsize`, so that indices in `[-max_var, +max_var]` are legal.
#[derive(Clone, Debug)]
pub struct AssignStack {
    /// assignment vector, one byte per literal in `[-vsize, vsize]`
    vals: Vec<i8>,
    /// capacity of the per-variable tables; `max_var < vsize`
    pub(super) vsize: usize,
    /// the number of allocated vars
    pub num_vars: usize,
    /// record of assignment
    pub(super) trail: Vec<Lit>,
    /// decision level records; `control.len() == decision_level() + 1`
    pub(super) control: Vec<Level>,
    /// the next-to-propagate index on the trail
    pub(crate) propagated: usize,
    /// the scan index of trial propagation
    pub(crate) propagated2: usize,
    /// per-variable assignment records
    vtab: Vec<Var>,
    /// per-variable status and marker flags
    ftab: Vec<FlagVar>,
    /// per-literal trail positions, -1 while unassigned
    ptab: Vec<i32>,
    /// per-variable activity scores
    pub(super) stab: Vec<f64>,
    /// score increment added on each bump
    pub(super) scinc: f64,
    /// variable order for stable mode
    pub(super) var_order: VarIdHeap,
    /// variable order for non-stable mode
    pub(super) queue: VarQueue,
    /// per-variable freeze counts
    frozentab: Vec<u32>,
    /// saved / target / best / prev / min phases
    pub phases: PhaseRec,
    /// scratch marks used by analysis and resolution
    pub marks: Vec<i8>,
    /// initial saved phase of fresh vars
    initial_phase: i8,
    /// phase saving on backtrack; switched off during probing
    pub(crate) phase_saving: bool,
    /// trail size of the largest assignment seen so far
    pub best_assigned: usize,
    /// trail size of the largest assignment of the current stable phase
    pub target_assigned: usize,
    /// trail position below which no conflict has been seen
    pub no_conflict_until: usize,

    //
    //## var accounting
    //
    pub num_active: usize,
    pub num_unused: usize,
    pub num_fixed: usize,
    pub num_eliminated: usize,
    pub num_substituted: usize,
    pub num_pure: usize,

    //
    //## search statistics
    //
    pub num_conflict: i64,
    pub num_decision: i64,
    pub num_propagation: i64,
    pub num_restart: i64,
}

impl Default for AssignStack {
    fn default() -> AssignStack {
        AssignStack {
            vals: vec![0],
            vsize: 0,
            num_vars: 0,
            trail: Vec::new(),
            control: vec![Level {
                decision: None,
                trail_at: 0,
            }],
            propagated: 0,
            propagated2: 0,
            vtab: Vec::new(),
            ftab: Vec::new(),
            ptab: Vec::new(),
            stab: Vec::new(),
            scinc: 1.0,
            var_order: VarIdHeap::default(),
            queue: VarQueue::default(),
            frozentab: Vec::new(),
            phases: PhaseRec::default(),
            marks: Vec::new(),
            initial_phase: 1,
            phase_saving: true,
            best_assigned: 0,
            target_assigned: 0,
            no_conflict_until: 0,
            num_active: 0,
            num_unused: 0,
            num_fixed: 0,
            num_eliminated: 0,
            num_substituted: 0,
            num_pure: 0,
            num_conflict: 0,
            num_decision: 0,
            num_propagation: 0,
            num_restart: 0,
        }
    }
}

impl Instantiate for AssignStack {
    fn instantiate(config: &Config, cnf: &CNFDescription) -> AssignStack {
        let mut asg = AssignStack {
            initial_phase: if config.phase == 0 { -1 } else { 1 },
            ..AssignStack::default()
        };
        asg.grow_to(cnf.num_of_variables);
        asg
    }
}

impl fmt::Display for AssignStack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let v = self.trail.iter().map(i32::from).collect::<Vec<_>>();
        write!(
            f,
            "ASG:: trail({}):{:?}\n      level: {}, fixed: {}, eliminated: {}",
            self.trail.len(),
            v,
            self.decision_level(),
            self.num_fixed,
            self.num_eliminated,
        )
    }
}

impl AssignIF for AssignStack {
    fn fixed(&self, vi: VarId) -> i8 {
        if self.ftab[vi].is(FlagVar::FIXED) {
            self.var_val(vi)
        } else {
            0
        }
    }
    fn decision_level(&self) -> DecisionLevel {
        self.control.len() as DecisionLevel - 1
    }
    fn stack(&self, i: usize) -> Lit {
        self.trail[i]
    }
    fn stack_len(&self) -> usize {
        self.trail.len()
    }
    fn len_upto(&self, n: DecisionLevel) -> usize {
        self.control
            .get(n as usize + 1)
            .map_or(self.trail.len(), |l| l.trail_at)
    }
    fn all_assigned(&self) -> bool {
        self.propagated == self.trail.len()
            && self.trail.len() == self.num_active + self.num_fixed
    }
}

impl AssignStack {
    /// return the value of a literal in {-1, 0, 1}.
    #[inline]
    pub fn val(&self, l: Lit) -> i8 {
        self.vals[(i32::from(l) + self.vsize as i32) as usize]
    }
    /// return the value of the positive literal of a var.
    #[inline]
    pub fn var_val(&self, vi: VarId) -> i8 {
        self.vals[vi + self.vsize]
    }
    #[inline]
    fn set_val(&mut self, l: Lit) {
        let i = i32::from(l) + self.vsize as i32;
        let j = -i32::from(l) + self.vsize as i32;
        self.vals[i as usize] = 1;
        self.vals[j as usize] = -1;
    }
    #[inline]
    fn clear_val(&mut self, l: Lit) {
        let i = i32::from(l) + self.vsize as i32;
        let j = -i32::from(l) + self.vsize as i32;
        self.vals[i as usize] = 0;
        self.vals[j as usize] = 0;
    }
    /// return the assignment level of a var.
    #[inline]
    pub fn level(&self, vi: VarId) -> DecisionLevel {
        self.vtab[vi].level
    }
    /// return the reason of assignment of a var.
    #[inline]
    pub fn reason(&self, vi: VarId) -> AssignReason {
        self.vtab[vi].reason
    }
    /// return a copy of the flags of a var.
    #[inline]
    pub fn flags(&self, vi: VarId) -> FlagVar {
        self.ftab[vi]
    }
    /// return a mutable reference to the flags of a var.
    #[inline]
    pub fn flags_mut(&mut self, vi: VarId) -> &mut FlagVar {
        &mut self.ftab[vi]
    }
    /// return the trail position of a literal, -1 while unassigned.
    #[inline]
    pub fn trail_position(&self, l: Lit) -> i32 {
        self.ptab[l.index()]
    }
    /// return the decision literal of a level.
    pub fn decision_of(&self, lv: DecisionLevel) -> Option<Lit> {
        self.control[lv as usize].decision
    }
    /// the current capacity of the per-variable tables.
    pub fn vsize(&self) -> usize {
        self.vsize
    }
    pub fn num_inactive(&self) -> usize {
        self.num_unused
            + self.num_fixed
            + self.num_eliminated
            + self.num_substituted
            + self.num_pure
    }
    /// check the variable accounting identity.
    pub fn check_var_accounting(&self) {
        debug_assert_eq!(self.num_vars, self.num_active + self.num_inactive());
    }

    //
    //## variable-space growth
    //
    /// allocate per-variable tables up to `new_max_var`, preserving prior
    /// contents. A no-op when the space is already large enough.
    pub fn grow_to(&mut self, new_max_var: usize) {
        if new_max_var <= self.num_vars {
            return;
        }
        if 0 < self.decision_level() {
            self.backtrack(0);
        }
        if self.vsize <= new_max_var {
            self.enlarge(new_max_var);
        }
        debug_assert!((self.num_vars + 1..=new_max_var).all(|vi| self.var_val(vi) == 0));
        debug_assert!((self.num_vars + 1..=new_max_var)
            .all(|vi| self.ptab[2 * vi] == -1 && self.ptab[2 * vi + 1] == -1));
        let old_max_var = self.num_vars;
        self.num_vars = new_max_var;
        for vi in old_max_var + 1..=new_max_var {
            self.ftab[vi].turn_on(FlagVar::UNUSED);
            self.queue.enqueue(vi);
            self.insert_heap(vi);
        }
        self.num_unused += new_max_var - old_max_var;
        self.check_var_accounting();
    }
    /// double the capacity of every per-variable and per-literal table.
    /// Ordered in the size of allocated memory (larger blocks first);
    /// the watch tables are grown by the clause database beforehand.
    fn enlarge(&mut self, new_max_var: usize) {
        debug_assert_eq!(self.decision_level(), 0);
        let mut new_vsize = if self.vsize == 0 {
            new_max_var + 1
        } else {
            2 * self.vsize
        };
        while new_vsize <= new_max_var {
            new_vsize *= 2;
        }
        self.vtab.resize(new_vsize, Var::default());
        self.queue.resize(new_vsize);
        self.var_order.resize(new_vsize);
        self.stab.resize(new_vsize, 0.0);
        self.ptab.resize(2 * new_vsize, -1);
        self.ftab.resize(new_vsize, FlagVar::empty());
        self.enlarge_vals(new_vsize);
        self.frozentab.resize(new_vsize, 0);
        self.phases.saved.resize(new_vsize, self.initial_phase);
        self.phases.target.resize(new_vsize, 0);
        self.phases.best.resize(new_vsize, 0);
        self.phases.prev.resize(new_vsize, 0);
        self.phases.min.resize(new_vsize, 0);
        self.marks.resize(new_vsize, 0);
        self.vsize = new_vsize;
    }
    /// reallocate the two-sided assignment vector and re-center it.
    fn enlarge_vals(&mut self, new_vsize: usize) {
        let mut new_vals = vec![0i8; 2 * new_vsize + 1];
        let m = self.num_vars;
        for i in 0..=2 * m {
            // old index range [-m, m] maps onto the new center
            new_vals[new_vsize - m + i] = self.vals[self.vsize - m + i];
        }
        self.vals = new_vals;
    }

    //
    //## assignment and backtracking
    //
    fn assign_core(&mut self, l: Lit, lvl: DecisionLevel, reason: AssignReason) {
        debug_assert_eq!(self.val(l), 0, "double assignment of {l}");
        let vi = l.vi();
        self.set_val(l);
        self.vtab[vi] = Var { level: lvl, reason };
        self.ptab[l.index()] = self.trail.len() as i32;
        self.trail.push(l);
        if lvl == 0 && !self.ftab[vi].is(FlagVar::FIXED) {
            debug_assert!(self.ftab[vi].is_active());
            self.ftab[vi].turn_on(FlagVar::FIXED);
            self.num_fixed += 1;
            self.num_active -= 1;
        }
    }
    /// assert a literal at the root level.
    pub fn assign_at_root(&mut self, l: Lit) {
        debug_assert_eq!(self.decision_level(), 0);
        self.assign_core(l, 0, AssignReason::Decision(0));
    }
    /// open a new decision level and assign its decision literal.
    pub fn assign_by_decision(&mut self, l: Lit) {
        self.control.push(Level {
            decision: Some(l),
            trail_at: self.trail.len(),
        });
        let lvl = self.decision_level();
        self.assign_core(l, lvl, AssignReason::Decision(lvl));
    }
    /// assign a literal implied by a clause at the current level.
    pub fn assign_by_implication(&mut self, l: Lit, cid: crate::cdb::ClauseId) {
        let lvl = self.decision_level();
        let reason = if lvl == 0 {
            AssignReason::Decision(0)
        } else {
            AssignReason::Implication(cid)
        };
        self.assign_core(l, lvl, reason);
    }
    /// record the current assignment into the target and best phases when it
    /// is the largest one seen so far.
    pub fn save_phases(&mut self, stable: bool) {
        if stable && self.target_assigned < self.trail.len() {
            self.target_assigned = self.trail.len();
            for l in &self.trail {
                self.phases.target[l.vi()] = if l.is_positive() { 1 } else { -1 };
            }
        }
        if self.best_assigned < self.trail.len() {
            self.best_assigned = self.trail.len();
            for l in &self.trail {
                self.phases.best[l.vi()] = if l.is_positive() { 1 } else { -1 };
            }
        }
    }
    /// cancel assignments down to `to_lvl`, saving phases on the way.
    pub fn backtrack(&mut self, to_lvl: DecisionLevel) {
        if self.decision_level() <= to_lvl {
            return;
        }
        let keep = self.control[to_lvl as usize + 1].trail_at;
        for l in self.trail.split_off(keep).into_iter().rev() {
            let vi = l.vi();
            if self.phase_saving {
                self.phases.saved[vi] = if l.is_positive() { 1 } else { -1 };
            }
            self.clear_val(l);
            self.ptab[l.index()] = -1;
            self.vtab[vi].reason = AssignReason::None;
            if self.ftab[vi].is_active() {
                self.insert_heap(vi);
                self.queue.touch(vi);
            }
        }
        self.control.truncate(to_lvl as usize + 1);
        self.propagated = self.propagated.min(self.trail.len());
        self.propagated2 = self.propagated2.min(self.trail.len());
        self.no_conflict_until = self.no_conflict_until.min(self.trail.len());
    }

    //
    //## var rewarding
    //
    /// return the activity score of a var.
    #[inline]
    pub fn activity(&self, vi: VarId) -> f64 {
        self.stab[vi]
    }
    /// add the current increment to a var's score and reorder it.
    pub fn bump_score(&mut self, vi: VarId) {
        self.stab[vi] += self.scinc;
        if 1e100 < self.stab[vi] {
            for s in self.stab.iter_mut() {
                *s *= 1e-100;
            }
            self.scinc *= 1e-100;
        }
        self.update_heap(vi);
        self.queue.bump(vi);
    }
    /// geometrically grow the score increment; called once per conflict.
    pub fn decay_scores(&mut self, decay: f64) {
        self.scinc /= decay;
    }
    /// drop inactive variables from the decision structures.
    pub fn shed_inactive(&mut self) {
        for vi in 1..=self.num_vars {
            if !self.ftab[vi].is_active() {
                self.remove_from_heap(vi);
                self.queue.dequeue(vi);
            }
        }
    }
    /// pick the unassigned active variable to decide next.
    pub fn select_decision_var(&mut self, stable: bool) -> Option<VarId> {
        if stable {
            while let Some(vi) = self.pop_heap_root() {
                if self.ftab[vi].is_active() && self.var_val(vi) == 0 {
                    return Some(vi);
                }
            }
            None
        } else {
            let AssignStack {
                ref ftab,
                ref vals,
                vsize,
                ref mut queue,
                ..
            } = *self;
            queue.next_unassigned(|vi| ftab[vi].is_active() && vals[vi + vsize] == 0)
        }
    }
}

impl VarManipulateIF for AssignStack {
    fn make_var_used(&mut self, vi: VarId) {
        if self.ftab[vi].is(FlagVar::UNUSED) {
            self.ftab[vi].turn_off(FlagVar::UNUSED);
            self.num_unused -= 1;
            self.num_active += 1;
        }
    }
    fn make_var_eliminated(&mut self, vi: VarId) {
        debug_assert!(self.ftab[vi].is_active());
        debug_assert_eq!(self.var_val(vi), 0);
        self.ftab[vi].turn_on(FlagVar::ELIMINATED);
        self.num_eliminated += 1;
        self.num_active -= 1;
        self.remove_from_heap(vi);
        self.queue.dequeue(vi);
    }
    fn make_var_pure(&mut self, vi: VarId) {
        debug_assert!(self.ftab[vi].is_active());
        debug_assert_eq!(self.var_val(vi), 0);
        self.ftab[vi].turn_on(FlagVar::PURE);
        self.num_pure += 1;
        self.num_active -= 1;
        self.remove_from_heap(vi);
        self.queue.dequeue(vi);
    }
    fn reactivate_var(&mut self, vi: VarId) {
        let f = self.ftab[vi];
        if f.is(FlagVar::ELIMINATED) {
            self.num_eliminated -= 1;
        } else if f.is(FlagVar::PURE) {
            self.num_pure -= 1;
        } else {
            return;
        }
        self.ftab[vi]
            .remove(FlagVar::ELIMINATED | FlagVar::PURE);
        self.num_active += 1;
        self.insert_heap(vi);
        self.queue.enqueue(vi);
    }
    fn freeze_var(&mut self, vi: VarId) {
        self.frozentab[vi] += 1;
    }
    fn melt_var(&mut self, vi: VarId) {
        debug_assert!(0 < self.frozentab[vi]);
        self.frozentab[vi] -= 1;
    }
    fn is_frozen(&self, vi: VarId) -> bool {
        0 < self.frozentab[vi]
    }
}
