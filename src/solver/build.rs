//! Solver builder: instantiation, clause intake and variable-space growth.
use {
    super::{Restarter, SatSolverIF, Solver},
    crate::{
        assign::{AssignIF, AssignStack, VarManipulateIF},
        cdb::{ClauseDB, RefClause},
        processor::Eliminator,
        state::State,
        types::*,
    },
};

#[cfg(not(feature = "no_IO"))]
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

impl Default for Solver {
    fn default() -> Solver {
        Solver::instantiate(&Config::default(), &CNFDescription::default())
    }
}

impl Instantiate for Solver {
    /// ```
    /// use spica::{config::Config, types::*};
    /// use spica::solver::Solver;
    /// let s = Solver::instantiate(&Config::default(), &CNFDescription::default());
    /// ```
    fn instantiate(config: &Config, cnf: &CNFDescription) -> Solver {
        let mut s = Solver {
            asg: AssignStack::instantiate(config, cnf),
            cdb: ClauseDB::instantiate(config, cnf),
            elim: Eliminator::instantiate(config, cnf),
            rst: Restarter::instantiate(config, cnf),
            state: State::instantiate(config, cnf),
        };
        s.cdb.grow_watchers(s.asg.num_vars + 1);
        s
    }
}

#[cfg(not(feature = "no_IO"))]
impl TryFrom<&str> for Solver {
    type Error = SolverError;
    /// return a new solver built for a CNF file.
    ///
    /// # Example
    /// ```
    /// use spica::solver::{SatSolverIF, Solver};
    ///
    /// if let Ok(mut s) = Solver::try_from("cnfs/sample.cnf") {
    ///     s.solve();
    /// }
    /// ```
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Solver::try_from(Path::new(s))
    }
}

#[cfg(not(feature = "no_IO"))]
impl TryFrom<&Path> for Solver {
    type Error = SolverError;
    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let CNFReader { cnf, reader } = CNFReader::try_from(path)?;
        let config = Config {
            cnf_file: path.to_path_buf(),
            ..Config::default()
        };
        Solver::instantiate(&config, &cnf).inject(reader)
    }
}

impl Solver {
    /// make sure the solver can talk about variables up to `new_max_var`.
    /// Existing state is preserved; growth is monotone.
    pub fn reserve(&mut self, new_max_var: usize) {
        if new_max_var <= self.asg.num_vars {
            return;
        }
        // watch tables first, the largest blocks of the reallocation
        let new_vsize = next_table_size(self.asg.vsize(), new_max_var);
        self.cdb.grow_watchers(new_vsize);
        self.asg.grow_to(new_max_var);
    }
    /// add a whole clause of external literals; a shorthand over `add`.
    ///
    /// # Example
    /// ```
    /// use spica::solver::{SatSolverIF, Solver};
    ///
    /// let mut s = Solver::default();
    /// s.add_clause(&[1, 2]);
    /// s.add_clause(&[-1, 2]);
    /// assert_eq!(s.solve(), 10);
    /// assert_eq!(s.val(2), 2);
    /// ```
    pub fn add_clause(&mut self, lits: &[i32]) {
        for &l in lits {
            self.add(l);
        }
        self.add(0);
    }
    pub(super) fn finalize_original_clause(&mut self) {
        let lits = std::mem::take(&mut self.state.original);
        if let Some(proof) = &mut self.state.proof {
            proof.add_original_clause(&lits);
        }
        let mut tainting = false;
        for &x in &lits {
            let vi = x.unsigned_abs() as usize;
            if self
                .asg
                .flags(vi)
                .intersects(FlagVar::ELIMINATED | FlagVar::PURE)
            {
                self.elim.taint(vi);
                tainting = true;
            }
        }
        if tainting {
            // parked until the restore step of the next solve
            self.elim.defer(lits);
            return;
        }
        add_new_clause(&mut self.asg, &mut self.cdb, &mut self.state, &lits);
    }

    #[cfg(not(feature = "no_IO"))]
    fn inject(mut self, mut reader: BufReader<File>) -> Result<Solver, SolverError> {
        let mut buf = String::new();
        loop {
            buf.clear();
            match reader.read_line(&mut buf) {
                Ok(0) => break,
                Ok(_) if buf.starts_with('c') || buf.starts_with('p') => continue,
                Ok(_) => {
                    for s in buf.split_whitespace() {
                        match s.parse::<i32>() {
                            Ok(val) => self.add(val),
                            Err(_) => (),
                        }
                    }
                }
                Err(_) => return Err(SolverError::IOError),
            }
        }
        if !self.state.original.is_empty() {
            // a missing terminating zero still closes the last clause
            self.add(0);
        }
        Ok(self)
    }
}

/// register one clause of external literals at the root level: dedupe,
/// drop falsified literals, detect tautologies and satisfied clauses, and
/// route units straight onto the trail.
pub(crate) fn add_new_clause(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    state: &mut State,
    lits: &[i32],
) -> RefClause {
    debug_assert_eq!(asg.decision_level(), 0);
    for &x in lits {
        debug_assert!(x != 0 && x.unsigned_abs() as usize <= asg.num_vars);
        asg.make_var_used(x.unsigned_abs() as usize);
    }
    let mut v: Vec<Lit> = Vec::with_capacity(lits.len());
    let mut result: Option<RefClause> = None;
    for &x in lits {
        let l = Lit::from(x);
        let val = asg.val(l);
        if 0 < val {
            result = Some(RefClause::Dead);
            break;
        }
        if val < 0 {
            continue;
        }
        let m = asg.marks[l.vi()];
        let s: i8 = if l.is_positive() { 1 } else { -1 };
        if m == s {
            continue;
        }
        if m == -s {
            result = Some(RefClause::Dead);
            break;
        }
        asg.marks[l.vi()] = s;
        v.push(l);
    }
    for &l in v.iter() {
        asg.marks[l.vi()] = 0;
    }
    if let Some(r) = result {
        return r;
    }
    for &l in v.iter() {
        let f = asg.flags_mut(l.vi());
        if !f.is(FlagVar::MARK_ELIM) {
            f.turn_on(FlagVar::MARK_ELIM);
            state.stats.mark_elim += 1;
        }
        asg.flags_mut(l.vi()).turn_on(FlagVar::MARK_SUBSUME);
    }
    match v.len() {
        0 => {
            state.unsat = true;
            RefClause::EmptyClause
        }
        1 => {
            asg.assign_at_root(v[0]);
            RefClause::UnitClause(v[0])
        }
        _ => RefClause::Clause(cdb.new_clause(&v, false, 0)),
    }
}

/// the table capacity the assignment stack will pick for `new_max_var`.
fn next_table_size(vsize: usize, new_max_var: usize) -> usize {
    let mut n = if vsize == 0 { new_max_var + 1 } else { vsize };
    while n <= new_max_var {
        n *= 2;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdb::ClauseIF;

    #[test]
    fn test_add_clause_simplifies_at_root() {
        let mut s = Solver::default();
        s.add_clause(&[1]);
        assert_eq!(s.asg.fixed(1), 1);
        // satisfied and tautological clauses leave no trace
        s.add_clause(&[1, 2]);
        s.add_clause(&[2, -2, 3]);
        assert_eq!(s.cdb.num_irredundant, 0);
        // a falsified literal is dropped on intake
        s.add_clause(&[-1, 2, 3]);
        assert_eq!(s.cdb.num_irredundant, 1);
        let (_, c) = s.cdb.iter_living().next().expect("no clause");
        assert_eq!(crate::types::i32s(&c.iter().copied().collect::<Vec<_>>()), vec![2, 3]);
    }

    #[test]
    fn test_empty_clause_on_intake() {
        let mut s = Solver::default();
        s.add_clause(&[1]);
        s.add_clause(&[-1]);
        assert!(s.state.unsat);
    }
}
