//! `spica` is an incremental CDCL SAT solver with interleaved
//! inprocessing: failed-literal probing, clause subsumption, bounded
//! variable elimination and compaction are scheduled from the search
//! loop itself, and bounded local search and lucky-phase attempts run
//! before the search proper.
//!
//! # Examples
//!
//! ```
//! use spica::solver::{SatSolverIF, Solver};
//!
//! let mut s = Solver::default();
//! s.add_clause(&[1, 2]);
//! s.add_clause(&[-1, 2]);
//! assert_eq!(s.solve(), 10);
//! assert_eq!(s.val(2), 2);
//! ```
/// Module `assign` implements assignment management and propagation.
pub mod assign;
/// Module `cdb` provides the clause database.
pub mod cdb;
/// Module `config` provides solver's configuration and CLI.
pub mod config;
/// Module `processor` provides the bounded simplification passes.
pub mod processor;
/// Module `solver` provides the top-level API as a SAT solver.
pub mod solver;
/// Module `state` is the data holder: statistics, limits, reporting.
pub mod state;
/// Module `types` provides various building blocks.
pub mod types;

pub use {
    config::Config,
    solver::{Certificate, SatSolverIF, Solver, SolverResult},
    types::SolverError,
};
