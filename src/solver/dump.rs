//! Clause traversal and DIMACS dump for proof and model consumers.
use {
    super::Solver,
    crate::{
        assign::AssignIF,
        cdb::ClauseIF,
        types::*,
    },
    std::io::{self, Write},
};

/// Consumer of externalized clauses; returning false aborts the
/// traversal.
pub trait ClauseIterator {
    fn clause(&mut self, lits: &[i32]) -> bool;
}

impl Solver {
    /// hand every irredundant living clause to the consumer, skipping
    /// root-falsified literals and dropping root-satisfied clauses. An
    /// unsatisfiable solver reports one empty clause.
    pub fn traverse_clauses(&self, it: &mut dyn ClauseIterator) -> bool {
        let mut eclause: Vec<i32> = Vec::new();
        if self.state.unsat {
            return it.clause(&eclause);
        }
        for (_, c) in self.cdb.iter_living() {
            if c.is_redundant() {
                continue;
            }
            let mut satisfied = false;
            for &l in c.iter() {
                let f = self.asg.fixed(l.vi());
                let tmp = if l.is_positive() { f } else { -f };
                if 0 < tmp {
                    satisfied = true;
                    break;
                }
                if tmp < 0 {
                    continue;
                }
                eclause.push(l.into());
            }
            if !satisfied && !it.clause(&eclause) {
                return false;
            }
            eclause.clear();
        }
        true
    }
    /// write the formula as DIMACS: fixed units first, then the living
    /// clauses, then the pending assumptions as units.
    pub fn dump(&self, out: &mut impl Write) -> io::Result<()> {
        let mut m = self.state.assumptions.len() as i64;
        for vi in 1..=self.asg.num_vars {
            if self.asg.fixed(vi) != 0 {
                m += 1;
            }
        }
        m += self.cdb.iter_living().count() as i64;
        writeln!(out, "p cnf {} {}", self.asg.num_vars, m)?;
        for vi in 1..=self.asg.num_vars {
            let f = self.asg.fixed(vi);
            if f != 0 {
                writeln!(out, "{} 0", if f < 0 { -(vi as i32) } else { vi as i32 })?;
            }
        }
        for (_, c) in self.cdb.iter_living() {
            for &l in c.iter() {
                write!(out, "{} ", i32::from(l))?;
            }
            writeln!(out, "0")?;
        }
        for &a in &self.state.assumptions {
            writeln!(out, "{} 0", i32::from(a))?;
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SatSolverIF;

    struct Collect(Vec<Vec<i32>>);
    impl ClauseIterator for Collect {
        fn clause(&mut self, lits: &[i32]) -> bool {
            self.0.push(lits.to_vec());
            true
        }
    }

    #[test]
    fn test_traverse_skips_fixed_literals() {
        let mut s = Solver::default();
        s.add_clause(&[1]);
        s.add_clause(&[-1, 2, 3]);
        let mut it = Collect(Vec::new());
        assert!(s.traverse_clauses(&mut it));
        assert_eq!(it.0, vec![vec![2, 3]]);
    }

    #[test]
    fn test_traverse_reports_empty_clause_when_unsat() {
        let mut s = Solver::default();
        s.add_clause(&[1]);
        s.add_clause(&[-1]);
        let mut it = Collect(Vec::new());
        assert!(s.traverse_clauses(&mut it));
        assert_eq!(it.0, vec![Vec::<i32>::new()]);
    }

    #[test]
    fn test_dump_format() {
        let mut s = Solver::default();
        s.add_clause(&[1]);
        s.add_clause(&[-1, 2, 3]);
        s.assume(-3);
        let mut buf: Vec<u8> = Vec::new();
        s.dump(&mut buf).expect("dump failed");
        let text = String::from_utf8(buf).expect("broken dump");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("p cnf 3 3"));
        assert_eq!(lines.next(), Some("1 0"));
        assert_eq!(lines.next(), Some("2 3 0"));
        assert_eq!(lines.next(), Some("-3 0"));
        assert_eq!(lines.next(), None);
    }
}
