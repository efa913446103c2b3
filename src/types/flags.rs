use bitflags::bitflags;

/// API for flag holders.
pub trait FlagIF {
    type FlagType;
    /// return true if the flag is on.
    fn is(&self, flag: Self::FlagType) -> bool;
    /// set the flag.
    fn set(&mut self, f: Self::FlagType, b: bool);
    /// toggle the flag off.
    fn turn_off(&mut self, flag: Self::FlagType);
    /// toggle the flag on.
    fn turn_on(&mut self, flag: Self::FlagType);
}

bitflags! {
    /// Misc flags used by [`Clause`](`crate::cdb::Clause`).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
    pub struct FlagClause: u8 {
        /// a clause derived by conflict analysis; removable.
        const LEARNT    = 0b0000_0001;
        /// a clause scheduled for collection.
        const GARBAGE   = 0b0000_0010;
        /// a clause that took part in conflict analysis recently.
        const USED      = 0b0000_0100;
        /// the permanent binary-subsumption scratch clause.
        const SUBSUMING = 0b0000_1000;
    }
}

bitflags! {
    /// Misc flags stored in the per-variable flag table.
    ///
    /// A variable is *active* iff none of the five status bits is set.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
    pub struct FlagVar: u16 {
        /// assigned at decision level 0; permanent.
        const FIXED        = 0b0000_0000_0001;
        /// removed by bounded variable elimination.
        const ELIMINATED   = 0b0000_0000_0010;
        /// replaced by an equivalent representative.
        const SUBSTITUTED  = 0b0000_0000_0100;
        /// removed as a pure literal.
        const PURE         = 0b0000_0000_1000;
        /// allocated but never occurred in a clause yet.
        const UNUSED       = 0b0000_0001_0000;
        /// visited during the current conflict analysis.
        const SEEN         = 0b0000_0010_0000;
        /// candidate marker consumed by the subsumption pass.
        const MARK_SUBSUME = 0b0000_0100_0000;
        /// candidate marker consumed by the elimination pass.
        const MARK_ELIM    = 0b0000_1000_0000;
    }
}

impl FlagVar {
    /// return true iff no status bit excludes the variable from search.
    #[inline]
    pub fn is_active(self) -> bool {
        !self.intersects(
            FlagVar::FIXED
                | FlagVar::ELIMINATED
                | FlagVar::SUBSTITUTED
                | FlagVar::PURE
                | FlagVar::UNUSED,
        )
    }
}

macro_rules! impl_flag_if {
    ($t: ty) => {
        impl FlagIF for $t {
            type FlagType = $t;
            #[inline]
            fn is(&self, flag: Self::FlagType) -> bool {
                self.contains(flag)
            }
            #[inline]
            fn set(&mut self, f: Self::FlagType, b: bool) {
                if b {
                    self.insert(f);
                } else {
                    self.remove(f);
                }
            }
            #[inline]
            fn turn_off(&mut self, flag: Self::FlagType) {
                self.remove(flag);
            }
            #[inline]
            fn turn_on(&mut self, flag: Self::FlagType) {
                self.insert(flag);
            }
        }
    };
}

impl_flag_if!(FlagClause);
impl_flag_if!(FlagVar);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_activity_bits() {
        let mut f = FlagVar::UNUSED;
        assert!(!f.is_active());
        f.turn_off(FlagVar::UNUSED);
        assert!(f.is_active());
        f.turn_on(FlagVar::MARK_ELIM);
        assert!(f.is_active());
        f.turn_on(FlagVar::ELIMINATED);
        assert!(!f.is_active());
    }
}
