use {
    crate::types::*,
    std::{fmt, slice::Iter},
};

/// A representation of 'clause'
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Clause {
    /// The literals in a clause; the first two are the watched ones.
    pub(crate) lits: Vec<Lit>,
    /// Flags (8 bits)
    pub(crate) flags: FlagClause,
    /// A static clause evaluation criterion; the glue (LBD) for learnts.
    pub rank: u16,
}

/// API for Clause, providing literal accessors.
pub trait ClauseIF {
    /// return true if the clause is scheduled for collection.
    fn is_dead(&self) -> bool;
    /// return true if the clause was derived by conflict analysis.
    fn is_redundant(&self) -> bool;
    /// return the first watched literal.
    fn lit0(&self) -> Lit;
    /// return the second watched literal.
    fn lit1(&self) -> Lit;
    /// return the k-th literal.
    fn lit_at(&self, k: usize) -> Lit;
    /// return `true` if the clause contains the literal.
    fn contains(&self, lit: Lit) -> bool;
    /// return an iterator over its literals.
    fn iter(&self) -> Iter<'_, Lit>;
    /// return the number of literals.
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool;
}

impl ClauseIF for Clause {
    #[inline]
    fn is_dead(&self) -> bool {
        self.flags.is(FlagClause::GARBAGE)
    }
    #[inline]
    fn is_redundant(&self) -> bool {
        self.flags.is(FlagClause::LEARNT)
    }
    #[inline]
    fn lit0(&self) -> Lit {
        self.lits[0]
    }
    #[inline]
    fn lit1(&self) -> Lit {
        self.lits[1]
    }
    #[inline]
    fn lit_at(&self, k: usize) -> Lit {
        self.lits[k]
    }
    fn contains(&self, lit: Lit) -> bool {
        self.lits.contains(&lit)
    }
    fn iter(&self) -> Iter<'_, Lit> {
        self.lits.iter()
    }
    #[inline]
    fn len(&self) -> usize {
        self.lits.len()
    }
    fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }
}

impl FlagIF for Clause {
    type FlagType = FlagClause;
    #[inline]
    fn is(&self, flag: Self::FlagType) -> bool {
        self.flags.contains(flag)
    }
    #[inline]
    fn set(&mut self, f: Self::FlagType, b: bool) {
        self.flags.set(f, b);
    }
    #[inline]
    fn turn_off(&mut self, flag: Self::FlagType) {
        self.flags.remove(flag);
    }
    #[inline]
    fn turn_on(&mut self, flag: Self::FlagType) {
        self.flags.insert(flag);
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "C{{{:?}{}{}}}",
            i32s(&self.lits),
            if self.is_redundant() { ", learnt" } else { "" },
            if self.is_dead() { ", dead" } else { "" },
        )
    }
}

impl Clause {
    /// the permanent binary-subsumption scratch clause: irredundant and of
    /// size two, its literal slots rewritten per subsumption check.
    pub(super) fn sentinel() -> Clause {
        Clause {
            lits: Vec::with_capacity(2),
            flags: FlagClause::SUBSUMING,
            rank: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clause_accessors() {
        let c = Clause {
            lits: vec![Lit::from(1), Lit::from(-2), Lit::from(3)],
            flags: FlagClause::LEARNT,
            rank: 2,
        };
        assert_eq!(c.len(), 3);
        assert_eq!(c.lit0(), Lit::from(1));
        assert_eq!(c.lit1(), Lit::from(-2));
        assert!(c.contains(Lit::from(3)));
        assert!(!c.contains(Lit::from(2)));
        assert!(c.is_redundant());
        assert!(!c.is_dead());
    }
}
