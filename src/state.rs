//! Crate `state` is a collection of internal data, the limit and budget
//! manager, and the progress reporter.
use {
    crate::{
        assign::AssignStack,
        cdb::ClauseId,
        solver::Restarter,
        types::*,
    },
    std::{
        fmt,
        sync::{
            atomic::{AtomicBool, Ordering},
            Arc,
        },
    },
};

/// Monotonic counters of solver events.
#[derive(Clone, Debug, Default)]
pub struct Stats {
    pub solves: i64,
    pub preprocessings: i64,
    pub reductions: i64,
    pub flushes: i64,
    pub rephased: i64,
    pub probings: i64,
    pub failed_literals: i64,
    pub subsumptions: i64,
    pub subsumed: i64,
    pub strengthened: i64,
    pub eliminations: i64,
    pub eliminated: i64,
    pub compacts: i64,
    pub walks: i64,
    pub walk_flips: i64,
    pub luckies: i64,
    pub iterations: i64,
    pub learned: i64,
    pub learned_units: i64,
    /// vars marked as elimination candidates so far
    pub mark_elim: i64,
}

/// Absolute thresholds gating the inprocessing passes. Compared against
/// `asg.num_conflict` unless noted otherwise.
#[derive(Clone, Debug)]
pub struct Limit {
    pub initialized: bool,
    pub reduce: i64,
    /// compared against `stats.reductions`
    pub flush: i64,
    pub subsume: i64,
    pub elim: i64,
    /// occurrence bound of variable elimination, relaxed between rounds
    pub elimbound: i64,
    pub probe: i64,
    pub compact: i64,
    pub rephase: i64,
    /// conflict counts of the last rephase, per search mode
    pub rephased: [i64; 2],
    pub restart: i64,
    pub report: i64,
    pub stabilize: i64,
    /// conflict cap of this call; -1 means none
    pub conflicts: i64,
    /// decision cap of this call; -1 means none
    pub decisions: i64,
    /// preprocessing rounds of this call
    pub preprocessing: i64,
    /// local search rounds of this call
    pub localsearch: i64,
}

impl Default for Limit {
    fn default() -> Limit {
        Limit {
            initialized: false,
            reduce: 0,
            flush: 0,
            subsume: 0,
            elim: 0,
            elimbound: 0,
            probe: 0,
            compact: 0,
            rephase: 0,
            rephased: [0; 2],
            restart: 0,
            report: 0,
            stabilize: 0,
            conflicts: -1,
            decisions: -1,
            preprocessing: 0,
            localsearch: 0,
        }
    }
}

/// Per-category increments feeding [`Limit`].
#[derive(Clone, Debug)]
pub struct Inc {
    pub flush: i64,
    pub stabilize: i64,
    pub conflicts: i64,
    pub decisions: i64,
    pub preprocessing: i64,
    pub localsearch: i64,
}

impl Default for Inc {
    fn default() -> Inc {
        Inc {
            flush: 0,
            stabilize: 0,
            conflicts: -1,
            decisions: -1,
            preprocessing: 0,
            localsearch: 0,
        }
    }
}

/// Trigger points of the previous pass of each category.
#[derive(Clone, Debug, Default)]
pub struct Last {
    pub reduce_conflicts: i64,
    pub elim_marked: i64,
    /// reset to -1 on every fresh start; no pass consumes this marker
    /// currently (see DESIGN.md).
    pub ternary_marked: i64,
}

/// Miscellaneous data holder: statistics, limits, search-mode flags, the
/// assumption vector, and the external hooks.
pub struct State {
    pub config: Config,
    pub stats: Stats,
    pub lim: Limit,
    pub inc: Inc,
    pub last: Last,

    //
    //## search-mode flags
    //
    /// an empty clause was derived; every later solve returns 20
    pub unsat: bool,
    /// a learnt unit is pending a report
    pub iterating: bool,
    pub localsearching: bool,
    pub preprocessing: bool,
    /// force `decide` to pick the saved phase
    pub force_saved_phase: bool,
    pub searching_lucky_phases: bool,
    /// stable search mode (reluctant-doubling restart cadence)
    pub stable: bool,
    pub reported: bool,

    /// the clause that falsified the last propagation; None if none
    pub conflict: Option<ClauseId>,
    /// the learnt-clause buffer; empty outside conflict analysis
    pub clause: Vec<Lit>,
    /// the original-clause intake buffer of the incremental API
    pub original: Vec<i32>,
    /// assumptions of the ongoing solve
    pub assumptions: Vec<Lit>,
    /// failed assumptions of the last unsatisfiable solve
    pub conflicts: Vec<Lit>,
    /// the model of the last satisfiable solve, indexed by var
    pub model: Vec<i8>,

    //
    //## external hooks
    //
    pub termination_forced: Arc<AtomicBool>,
    pub terminator: Option<Box<dyn FnMut() -> bool>>,
    pub learner: Option<(usize, Box<dyn FnMut(&[i32])>)>,
    pub proof: Option<Box<dyn crate::solver::ProofIF>>,
    /// the report characters emitted so far
    pub report_log: Vec<char>,
}

impl Default for State {
    fn default() -> State {
        State {
            config: Config::default(),
            stats: Stats::default(),
            lim: Limit::default(),
            inc: Inc::default(),
            last: Last::default(),
            unsat: false,
            iterating: false,
            localsearching: false,
            preprocessing: false,
            force_saved_phase: false,
            searching_lucky_phases: false,
            stable: false,
            reported: false,
            conflict: None,
            clause: Vec::new(),
            original: Vec::new(),
            assumptions: Vec::new(),
            conflicts: Vec::new(),
            model: Vec::new(),
            termination_forced: Arc::new(AtomicBool::new(false)),
            terminator: None,
            learner: None,
            proof: None,
            report_log: Vec::new(),
        }
    }
}

impl Instantiate for State {
    fn instantiate(config: &Config, _cnf: &CNFDescription) -> State {
        State {
            config: config.clone(),
            ..State::default()
        }
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "State{{unsat:{}, stable:{}, assumptions:{}, report:{:?}}}",
            self.unsat,
            self.stable,
            self.assumptions.len(),
            self.report_log,
        )
    }
}

/// API for the progress reporter and the termination predicate.
pub trait StateIF {
    /// emit one character of the progress alphabet.
    fn report(&mut self, c: char);
    /// poll the termination callback, the forced-termination flag and the
    /// conflict and decision caps.
    fn terminating(&mut self, asg: &AssignStack) -> bool;
}

impl StateIF for State {
    fn report(&mut self, c: char) {
        self.report_log.push(c);
        self.reported = true;
        if !self.config.quiet_mode {
            println!("c {c}");
        }
    }
    fn terminating(&mut self, asg: &AssignStack) -> bool {
        if self.termination_forced.load(Ordering::Relaxed) {
            return true;
        }
        if let Some(cb) = &mut self.terminator {
            if cb() {
                return true;
            }
        }
        if 0 <= self.lim.conflicts && self.lim.conflicts <= asg.num_conflict {
            return true;
        }
        if 0 <= self.lim.decisions && self.lim.decisions <= asg.num_decision {
            return true;
        }
        false
    }
}

impl State {
    /// a monotone function of the current problem scale, stretching the
    /// subsumption and elimination cadences on large instances.
    pub fn scale(&self, x: i64, asg: &AssignStack) -> i64 {
        let a = asg.num_active.max(1) as f64;
        let f = (a / 1e3).log10().max(0.0) + 1.0;
        (x as f64 * f) as i64
    }
    /// initialize the limits at the start of a solve. Most categories are
    /// set up once on the first call and kept over incremental calls;
    /// `rephase`, `restart`, `report`, `stabilize` and the elimination
    /// bound start over on every call.
    pub fn init_limits(&mut self, asg: &AssignStack, rst: &mut Restarter) {
        let incremental = self.lim.initialized;
        let conflicts = asg.num_conflict;

        if !incremental {
            self.last.reduce_conflicts = -1;
            self.lim.reduce = conflicts + self.config.reduce_int;
        }

        if !incremental {
            self.lim.flush = self.config.flush_int;
            self.inc.flush = self.config.flush_int;
        }

        if !incremental {
            self.lim.subsume = conflicts + self.scale(self.config.subsume_int, asg);
        }

        if !incremental {
            self.last.elim_marked = -1;
            self.lim.elim = conflicts + self.scale(self.config.elim_int, asg);
        }

        // Initialize and reset elimination bounds in any case.
        self.lim.elimbound = self.config.elim_bound_min;

        if !incremental {
            self.lim.probe = conflicts + self.config.probe_int;
        }

        if !incremental {
            self.last.ternary_marked = -1;
            self.lim.compact = conflicts + self.config.compact_int;
        }

        // Initialize or reset 'rephase' limits in any case.
        self.lim.rephase = conflicts + self.config.rephase_int;
        self.lim.rephased[0] = 0;
        self.lim.rephased[1] = 0;

        // Initialize or reset 'restart' limits in any case.
        self.lim.restart = conflicts + self.config.restart_int;

        // Initialize or reset 'report' limits in any case.
        self.reported = false;
        self.lim.report = 0;

        if !incremental {
            self.stable = self.config.stabilize != 0 && self.config.stabilize_only != 0;
            rst.init_averages();
        } else if self.config.stabilize != 0 && self.config.stabilize_only != 0 {
            debug_assert!(self.stable);
        } else if self.stable {
            self.stable = false;
            rst.swap_averages();
        }

        self.inc.stabilize = self.config.stabilize_int;
        self.lim.stabilize = conflicts + self.inc.stabilize;

        if self.config.stabilize != 0 && 0 < self.config.reluctant {
            rst.reluctant.enable(
                self.config.reluctant as u64,
                self.config.reluctant_max as u64,
            );
        } else {
            rst.reluctant.disable();
        }

        // Conflict and decision caps.
        self.lim.conflicts = if self.inc.conflicts < 0 {
            -1
        } else {
            conflicts + self.inc.conflicts
        };
        self.lim.decisions = if self.inc.decisions < 0 {
            -1
        } else {
            asg.num_decision + self.inc.decisions
        };

        // Initial preprocessing and local search rounds.
        self.lim.preprocessing = self.inc.preprocessing.max(0);
        self.lim.localsearch = self.inc.localsearch.max(0);

        self.lim.initialized = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Restarter;

    #[test]
    fn test_limits_fresh_then_incremental() {
        let cnf = CNFDescription::default();
        let config = Config::default();
        let mut state = State::instantiate(&config, &cnf);
        let mut asg = AssignStack::instantiate(&config, &cnf);
        let mut rst = Restarter::instantiate(&config, &cnf);
        state.init_limits(&asg, &mut rst);
        assert!(state.lim.initialized);
        assert_eq!(state.lim.reduce, config.reduce_int);
        assert_eq!(state.lim.elimbound, config.elim_bound_min);
        assert_eq!(state.last.ternary_marked, -1);
        let reduce = state.lim.reduce;
        let subsume = state.lim.subsume;
        let elim = state.lim.elim;
        let probe = state.lim.probe;
        // simulate some search, then a second incremental call
        asg.num_conflict = 500;
        state.lim.elimbound = 4096;
        state.init_limits(&asg, &mut rst);
        assert_eq!(state.lim.reduce, reduce);
        assert_eq!(state.lim.subsume, subsume);
        assert_eq!(state.lim.elim, elim);
        assert_eq!(state.lim.probe, probe);
        assert_eq!(state.lim.elimbound, config.elim_bound_min);
        assert_eq!(state.lim.restart, 500 + config.restart_int);
        assert_eq!(state.lim.rephase, 500 + config.rephase_int);
        assert_eq!(state.lim.stabilize, 500 + config.stabilize_int);
    }

    #[test]
    fn test_conflict_cap() {
        let cnf = CNFDescription::default();
        let config = Config::default();
        let mut state = State::instantiate(&config, &cnf);
        let mut asg = AssignStack::instantiate(&config, &cnf);
        let mut rst = Restarter::instantiate(&config, &cnf);
        assert!(!state.terminating(&asg));
        state.inc.conflicts = 10;
        state.init_limits(&asg, &mut rst);
        assert_eq!(state.lim.conflicts, 10);
        asg.num_conflict = 10;
        assert!(state.terminating(&asg));
    }

    #[test]
    fn test_mode_switch_on_incremental_call() {
        let cnf = CNFDescription::default();
        let config = Config::default();
        let mut state = State::instantiate(&config, &cnf);
        let asg = AssignStack::instantiate(&config, &cnf);
        let mut rst = Restarter::instantiate(&config, &cnf);
        state.init_limits(&asg, &mut rst);
        state.stable = true;
        state.init_limits(&asg, &mut rst);
        // stable-only is off, so an incremental call falls back to
        // non-stable mode
        assert!(!state.stable);
    }
}
