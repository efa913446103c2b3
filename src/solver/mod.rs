//! Module `solver` provides the top-level API as an incremental SAT
//! solver: clause intake, assumptions, the solve lifecycle and the model
//! and failed-assumption queries.

/// conflict analysis and failed assumptions
mod analyze;
/// solver builder and clause intake
pub(crate) mod build;
/// clause traversal and DIMACS dump
mod dump;
/// lucky-phase model attempts
mod lucky;
/// restart management and the search-mode controller
mod restart;
/// the CDCL loop and the solve ladder
mod search;
/// bounded local search
mod walk;

pub use self::{
    analyze::learn_empty_clause,
    dump::ClauseIterator,
    restart::Restarter,
    search::cdcl_loop_with_inprocessing,
};

use crate::{
    assign::{AssignStack, VarManipulateIF},
    cdb::ClauseDB,
    processor::Eliminator,
    state::State,
    types::*,
};

/// Hook for proof emission: called as each original clause is finalized.
pub trait ProofIF {
    fn add_original_clause(&mut self, lits: &[i32]);
}

/// Normal results returned by Solver.
#[derive(Debug, Eq, PartialEq)]
pub enum Certificate {
    SAT(Vec<i32>),
    UNSAT,
}

/// The return type of `Solver::solve_result`, capturing a satisfying
/// assignment, a refutation, or an interrupted run.
pub type SolverResult = Result<Certificate, SolverError>;

/// The incremental solver API in IPASIR shape. Result codes are 0
/// (unknown), 10 (satisfiable) and 20 (unsatisfiable).
///
/// # Example
///
/// ```
/// use spica::solver::{SatSolverIF, Solver};
///
/// let mut s = Solver::default();
/// s.add(1); s.add(2); s.add(0);
/// assert_eq!(s.solve(), 10);
/// s.assume(-1);
/// s.assume(-2);
/// assert_eq!(s.solve(), 20);
/// assert!(s.failed(-1) && s.failed(-2));
/// ```
pub trait SatSolverIF {
    /// add one literal of the pending clause; zero finalizes the clause.
    fn add(&mut self, lit: i32);
    /// force a literal true for the next `solve` only.
    fn assume(&mut self, lit: i32);
    /// decide satisfiability under the pending assumptions.
    fn solve(&mut self) -> i32;
    /// the model value of a literal after a satisfiable solve: the
    /// literal itself if true, its negation if false, 0 if unknown.
    fn val(&self, lit: i32) -> i32;
    /// whether an assumption is part of the failed set after an
    /// unsatisfiable solve.
    fn failed(&self, lit: i32) -> bool;
}

/// The SAT solver object consisting of 5 sub modules.
#[derive(Debug)]
pub struct Solver {
    /// assignment management
    pub asg: AssignStack,
    /// clause container
    pub cdb: ClauseDB,
    /// simplification passes and elimination witnesses
    pub elim: Eliminator,
    /// restart management
    pub rst: Restarter,
    /// misc data holder
    pub state: State,
}

impl SatSolverIF for Solver {
    fn add(&mut self, lit: i32) {
        if lit == 0 {
            self.finalize_original_clause();
        } else {
            self.reserve(lit.unsigned_abs() as usize);
            self.state.original.push(lit);
        }
    }
    fn assume(&mut self, lit: i32) {
        debug_assert!(lit != 0);
        let vi = lit.unsigned_abs() as usize;
        self.reserve(vi);
        self.asg.make_var_used(vi);
        if self
            .asg
            .flags(vi)
            .intersects(FlagVar::ELIMINATED | FlagVar::PURE)
        {
            self.elim.taint(vi);
        }
        self.asg.freeze_var(vi);
        self.state.assumptions.push(Lit::from(lit));
    }
    fn solve(&mut self) -> i32 {
        self.solve_core()
    }
    fn val(&self, lit: i32) -> i32 {
        let vi = lit.unsigned_abs() as usize;
        match self.state.model.get(vi) {
            None | Some(&0) => 0,
            Some(&v) => {
                if (0 < v) == (0 < lit) {
                    lit
                } else {
                    -lit
                }
            }
        }
    }
    fn failed(&self, lit: i32) -> bool {
        lit != 0 && self.state.conflicts.contains(&Lit::from(lit))
    }
}

impl Solver {
    /// run `solve` and package the outcome as a [`Certificate`].
    pub fn solve_result(&mut self) -> SolverResult {
        match self.solve() {
            10 => {
                let model = (1..=self.asg.num_vars)
                    .map(|vi| self.val(vi as i32))
                    .collect::<Vec<i32>>();
                Ok(Certificate::SAT(model))
            }
            20 => Ok(Certificate::UNSAT),
            _ => Err(SolverError::Interrupted),
        }
    }
    /// install a termination callback, polled at the safe points of the
    /// search; returning true stops the solve with result 0.
    pub fn set_terminate(&mut self, cb: impl FnMut() -> bool + 'static) {
        self.state.terminator = Some(Box::new(cb));
    }
    pub fn clear_terminate(&mut self) {
        self.state.terminator = None;
    }
    /// a flag shared with signal handlers; storing true stops the solve
    /// at the next safe point.
    pub fn terminator_handle(&self) -> std::sync::Arc<std::sync::atomic::AtomicBool> {
        self.state.termination_forced.clone()
    }
    /// install a callback receiving each learnt clause of external length
    /// at most `maxlen`.
    pub fn set_learn(&mut self, maxlen: usize, cb: impl FnMut(&[i32]) + 'static) {
        self.state.learner = Some((maxlen, Box::new(cb)));
    }
    pub fn clear_learn(&mut self) {
        self.state.learner = None;
    }
    /// attach a proof consumer fed with every original clause.
    pub fn set_proof(&mut self, proof: Box<dyn ProofIF>) {
        self.state.proof = Some(proof);
    }
    /// budget the next `solve` call: "conflicts" and "decisions" cap the
    /// search (negative means none), "preprocessing" and "localsearch"
    /// grant rounds. Returns false for an unknown category.
    pub fn limit(&mut self, name: &str, val: i64) -> bool {
        match name {
            "conflicts" => self.state.inc.conflicts = val,
            "decisions" => self.state.inc.decisions = val,
            "preprocessing" => self.state.inc.preprocessing = val,
            "localsearch" => self.state.inc.localsearch = val,
            _ => return false,
        }
        true
    }
}
