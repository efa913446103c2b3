//! Compaction: reclaim the bookkeeping of inactive variables and dead
//! clauses. Variable indices are not renumbered; slots stay allocated and
//! only their search-side structures are shed.
use {
    super::Eliminator,
    crate::{
        assign::{AssignIF, AssignStack},
        cdb::ClauseDB,
        state::State,
    },
};

pub fn compact(asg: &mut AssignStack, cdb: &mut ClauseDB, elim: &mut Eliminator, state: &mut State) {
    state.stats.compacts += 1;
    if 0 < asg.decision_level() {
        asg.backtrack(0);
    }
    cdb.garbage_collect();
    elim.shrink_occurs();
    asg.shed_inactive();
    state.lim.compact =
        asg.num_conflict + state.config.compact_int * (state.stats.compacts + 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assign::VarManipulateIF,
        types::*,
    };

    #[test]
    fn test_compact_advances_its_limit() {
        let cnf = CNFDescription {
            num_of_variables: 4,
            ..CNFDescription::default()
        };
        let config = Config::default();
        let mut asg = AssignStack::instantiate(&config, &cnf);
        let mut cdb = ClauseDB::instantiate(&config, &cnf);
        let mut elim = Eliminator::instantiate(&config, &cnf);
        let mut state = State::instantiate(&config, &cnf);
        cdb.grow_watchers(asg.num_vars + 1);
        for vi in 1..=4 {
            asg.make_var_used(vi);
        }
        asg.make_var_eliminated(3);
        asg.num_conflict = 42;
        compact(&mut asg, &mut cdb, &mut elim, &mut state);
        assert_eq!(state.stats.compacts, 1);
        assert_eq!(state.lim.compact, 42 + 2 * config.compact_int);
        // an eliminated var never comes back from the decision structures
        assert_ne!(asg.select_decision_var(true), Some(3));
    }
}
