//! Boundary behaviors, invariants and traversal round-trips.
use {
    spica::{
        solver::{ClauseIterator, ProofIF, SatSolverIF, Solver},
        types::Lit,
    },
    std::sync::{Arc, Mutex},
};

fn duality_holds(s: &Solver) -> bool {
    (1..=s.asg.num_vars as i32)
        .all(|v| s.asg.val(Lit::from(v)) + s.asg.val(Lit::from(-v)) == 0)
}

fn accounting_holds(s: &Solver) -> bool {
    s.asg.num_vars == s.asg.num_active + s.asg.num_inactive()
}

#[test]
fn empty_formula_is_sat() {
    let mut s = Solver::default();
    assert_eq!(s.solve(), 10);
    assert_eq!(s.state.stats.preprocessings, 0);
    assert_eq!(s.state.stats.walks, 0);
}

#[test]
fn unsat_flag_short_circuits() {
    let mut s = Solver::default();
    s.add_clause(&[1]);
    s.add_clause(&[-1]);
    assert!(s.state.unsat);
    let walks = s.state.stats.walks;
    let preps = s.state.stats.preprocessings;
    assert_eq!(s.solve(), 20);
    // no ladder stage ran
    assert_eq!(s.state.stats.walks, walks);
    assert_eq!(s.state.stats.preprocessings, preps);
    assert!(!s.state.report_log.contains(&'['));
    assert!(!s.state.report_log.contains(&'{'));
}

#[test]
fn single_unused_variable_gets_the_default_phase() {
    let mut s = Solver::default();
    s.reserve(1);
    assert_eq!(s.solve(), 10);
    assert_eq!(s.val(1), 1);
}

#[test]
fn zero_preprocessing_rounds_by_default() {
    let mut s = Solver::default();
    s.add_clause(&[1, 2]);
    s.add_clause(&[-1, 2]);
    assert_eq!(s.solve(), 10);
    assert_eq!(s.state.stats.preprocessings, 0);
}

#[test]
fn reserve_is_idempotent_and_monotone() {
    let mut s = Solver::default();
    s.reserve(8);
    let vars = s.asg.num_vars;
    let vsize = s.asg.vsize();
    s.reserve(8);
    assert_eq!(s.asg.num_vars, vars);
    assert_eq!(s.asg.vsize(), vsize);
    s.reserve(3);
    assert_eq!(s.asg.num_vars, vars);
    assert!(accounting_holds(&s));
}

#[test]
fn invariants_hold_around_solves() {
    let mut s = Solver::default();
    s.add_clause(&[1, 2, 3]);
    s.add_clause(&[-1, -2]);
    s.add_clause(&[-2, -3]);
    assert!(duality_holds(&s) && accounting_holds(&s));
    assert_eq!(s.solve(), 10);
    assert!(duality_holds(&s) && accounting_holds(&s));
    s.assume(2);
    assert_eq!(s.solve(), 10);
    assert!(duality_holds(&s) && accounting_holds(&s));
    assert_eq!(s.val(2), 2);
    assert_eq!(s.val(1), -1);
    assert_eq!(s.val(3), -3);
}

struct Collect(Vec<Vec<i32>>);
impl ClauseIterator for Collect {
    fn clause(&mut self, lits: &[i32]) -> bool {
        self.0.push(lits.to_vec());
        true
    }
}

/// feed the traversal of one solver into a fresh one and compare the
/// verdicts.
fn round_trip(clauses: &[Vec<i32>]) {
    let mut a = Solver::default();
    for c in clauses {
        a.add_clause(c);
    }
    let mut it = Collect(Vec::new());
    assert!(a.traverse_clauses(&mut it));
    let mut b = Solver::default();
    b.reserve(a.asg.num_vars);
    for c in it.0.iter() {
        b.add_clause(c);
    }
    assert_eq!(a.solve(), b.solve());
}

#[test]
fn traversal_round_trip_preserves_the_verdict() {
    round_trip(&[vec![1, 2], vec![-1, 2], vec![-2, 3]]);
    round_trip(&[vec![1], vec![-1, 2], vec![-2, -1]]);
    round_trip(&[vec![1], vec![-1]]);
    round_trip(&[
        vec![1, 2],
        vec![1, -2],
        vec![-1, 2],
        vec![-1, -2],
    ]);
}

#[test]
fn report_alphabet_is_closed() {
    let mut s = Solver::default();
    s.add_clause(&[1, 2]);
    s.add_clause(&[-1, 3]);
    s.add_clause(&[-2, -3]);
    s.limit("preprocessing", 1);
    s.limit("localsearch", 1);
    assert_eq!(s.solve(), 10);
    s.assume(-3);
    assert_eq!(s.solve(), 10);
    for &c in s.state.report_log.iter() {
        assert!(
            matches!(c, '[' | ']' | '{' | '}' | '*' | '+' | 'r' | 'P' | 'L' | '1' | '0' | '?'),
            "unexpected report character {c:?}"
        );
    }
}

struct Tracer(Arc<Mutex<Vec<Vec<i32>>>>);
impl ProofIF for Tracer {
    fn add_original_clause(&mut self, lits: &[i32]) {
        self.0.lock().expect("poisoned").push(lits.to_vec());
    }
}

#[test]
fn proof_hook_sees_every_original_clause() {
    let seen: Arc<Mutex<Vec<Vec<i32>>>> = Arc::new(Mutex::new(Vec::new()));
    let mut s = Solver::default();
    s.set_proof(Box::new(Tracer(seen.clone())));
    s.add_clause(&[1, 2]);
    s.add_clause(&[-1]);
    assert_eq!(s.solve(), 10);
    let log = seen.lock().expect("poisoned");
    assert_eq!(*log, vec![vec![1, 2], vec![-1]]);
}

#[test]
fn stats_move_forward_only() {
    let mut s = Solver::default();
    s.add_clause(&[1, 2, 3]);
    s.add_clause(&[-1, -2]);
    assert_eq!(s.solve(), 10);
    let solves = s.state.stats.solves;
    let learned = s.state.stats.learned;
    s.add_clause(&[-3]);
    assert_eq!(s.solve(), 10);
    assert_eq!(s.state.stats.solves, solves + 1);
    assert!(learned <= s.state.stats.learned);
}
