//! End-to-end scenarios of the incremental solver API.
use {
    spica::solver::{SatSolverIF, Solver},
    std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

/// pigeonhole principle: `p` pigeons into `h` holes; unsatisfiable
/// whenever `h < p`. Variable of pigeon i in hole k is `h * i + k + 1`.
fn add_php(s: &mut Solver, p: i32, h: i32) {
    let v = |i: i32, k: i32| h * i + k + 1;
    for i in 0..p {
        let mut c: Vec<i32> = Vec::new();
        for k in 0..h {
            c.push(v(i, k));
        }
        s.add_clause(&c);
    }
    for k in 0..h {
        for i in 0..p {
            for j in i + 1..p {
                s.add_clause(&[-v(i, k), -v(j, k)]);
            }
        }
    }
}

#[test]
fn trivially_unsat() {
    let mut s = Solver::default();
    s.add_clause(&[1]);
    s.add_clause(&[-1]);
    assert_eq!(s.solve(), 20);
    assert_eq!(s.solve(), 20);
}

#[test]
fn trivially_sat() {
    let mut s = Solver::default();
    s.add_clause(&[1, 2]);
    s.add_clause(&[-1, 2]);
    assert_eq!(s.solve(), 10);
    assert_eq!(s.val(2), 2);
}

#[test]
fn assumption_driven_unsat() {
    let mut s = Solver::default();
    s.add_clause(&[1, 2]);
    s.assume(-1);
    s.assume(-2);
    assert_eq!(s.solve(), 20);
    assert!(s.failed(-1));
    assert!(s.failed(-2));
    // assumptions do not outlive the call
    assert_eq!(s.solve(), 10);
}

#[test]
fn incremental_reuse() {
    let mut s = Solver::default();
    s.add_clause(&[1, 2, 3]);
    assert_eq!(s.solve(), 10);
    s.add_clause(&[-1]);
    assert_eq!(s.solve(), 10);
    assert_eq!(s.val(1), -1);
    s.add_clause(&[-2]);
    s.add_clause(&[-3]);
    assert_eq!(s.solve(), 20);
}

#[test]
fn model_satisfies_every_clause() {
    let mut s = Solver::default();
    let clauses: Vec<Vec<i32>> = vec![
        vec![1, 2],
        vec![-1, 3],
        vec![-2, -3],
        vec![2, 3],
        vec![-3, 4, -5],
        vec![5, -4],
    ];
    for c in clauses.iter() {
        s.add_clause(c);
    }
    assert_eq!(s.solve(), 10);
    for c in clauses.iter() {
        assert!(
            c.iter().any(|&l| s.val(l) == l),
            "clause {c:?} is unsatisfied"
        );
    }
}

#[test]
fn cdcl_proves_pigeonhole_unsat() {
    let mut s = Solver::default();
    add_php(&mut s, 3, 2);
    assert_eq!(s.solve(), 20);
}

#[test]
fn cdcl_finds_model_without_lucky_shortcuts() {
    let mut s = Solver::default();
    s.state.config.lucky = 0;
    s.add_clause(&[1, 2]);
    s.add_clause(&[-1, 3]);
    s.add_clause(&[-2, -3]);
    s.add_clause(&[2, 3]);
    assert_eq!(s.solve(), 10);
    assert!(s.val(1) == 1 || s.val(2) == 2);
}

#[test]
fn termination_callback_yields_unknown() {
    let mut s = Solver::default();
    add_php(&mut s, 4, 3);
    s.set_terminate(|| true);
    assert_eq!(s.solve(), 0);
    // a later solve without the terminator reaches a verdict
    s.clear_terminate();
    assert_eq!(s.solve(), 20);
}

#[test]
fn forced_termination_flag_is_reset_by_solve() {
    let mut s = Solver::default();
    add_php(&mut s, 4, 3);
    let handle = s.terminator_handle();
    handle.store(true, Ordering::Relaxed);
    assert_eq!(s.solve(), 0);
    assert!(!handle.load(Ordering::Relaxed));
    assert_eq!(s.solve(), 20);
}

#[test]
fn conflict_budget_yields_unknown() {
    let mut s = Solver::default();
    add_php(&mut s, 4, 3);
    assert!(s.limit("conflicts", 0));
    assert!(!s.limit("frobnications", 1));
    assert_eq!(s.solve(), 0);
    // the budget holds for a single call only
    assert_eq!(s.solve(), 20);
}

#[test]
fn learnt_clause_export() {
    let mut s = Solver::default();
    add_php(&mut s, 3, 2);
    let learnt: Arc<Mutex<Vec<Vec<i32>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = learnt.clone();
    s.set_learn(10, move |c| {
        sink.lock().expect("poisoned").push(c.to_vec());
    });
    assert_eq!(s.solve(), 20);
    assert!(!learnt.lock().expect("poisoned").is_empty());
}

#[test]
fn terminator_is_polled() {
    let mut s = Solver::default();
    add_php(&mut s, 4, 3);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    s.set_terminate(move || {
        counter.fetch_add(1, Ordering::Relaxed);
        false
    });
    assert_eq!(s.solve(), 20);
    assert!(0 < calls.load(Ordering::Relaxed));
}

#[test]
fn restore_path_reports_markers() {
    let mut s = Solver::default();
    s.state.config.restore_all = 2;
    s.add_clause(&[1, 2]);
    s.add_clause(&[-1, 3]);
    assert!(s.limit("preprocessing", 2));
    assert_eq!(s.solve(), 10);
    // elimination must have retired something for the test to bite
    assert!(0 < s.state.stats.eliminated);
    s.add_clause(&[1]);
    s.state.report_log.clear();
    assert_eq!(s.solve(), 10);
    assert_eq!(s.val(1), 1);
    let log = &s.state.report_log;
    let plus = log.iter().position(|&c| c == '+');
    let r = log.iter().position(|&c| c == 'r');
    assert!(plus.is_some() && r.is_some());
    assert!(plus < r);
    assert!(!log.contains(&'*'));
}

#[test]
fn local_search_round_reports_and_solves() {
    let mut s = Solver::default();
    s.add_clause(&[1, 2]);
    s.add_clause(&[-1, 3]);
    s.add_clause(&[-2, -3]);
    assert!(s.limit("localsearch", 1));
    assert_eq!(s.solve(), 10);
    assert!(s.state.report_log.contains(&'L'));
    assert!(0 < s.state.stats.walks);
}

#[test]
fn assumptions_respected_by_model() {
    let mut s = Solver::default();
    s.add_clause(&[1, 2, 3]);
    s.assume(-1);
    s.assume(-2);
    assert_eq!(s.solve(), 10);
    assert_eq!(s.val(1), -1);
    assert_eq!(s.val(2), -2);
    assert_eq!(s.val(3), 3);
}
