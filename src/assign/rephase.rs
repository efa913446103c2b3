//! Phase resetting heuristics
use {
    super::AssignStack,
    crate::state::State,
};

/// reset the saved phases to one of several heuristics, cycling over the
/// initial polarity, its inversion, the best assignment seen so far and
/// the best local-search assignment. Target phases start over afterwards.
pub fn rephase(asg: &mut AssignStack, state: &mut State) {
    state.stats.rephased += 1;
    asg.save_phases(state.stable);
    let initial: i8 = if state.config.phase == 0 { -1 } else { 1 };
    for vi in 1..=asg.num_vars {
        asg.phases.prev[vi] = asg.phases.saved[vi];
    }
    match state.stats.rephased % 5 {
        0 => {
            for vi in 1..=asg.num_vars {
                asg.phases.saved[vi] = initial;
            }
        }
        1 => {
            for vi in 1..=asg.num_vars {
                asg.phases.saved[vi] = -asg.phases.saved[vi];
            }
        }
        2 => {
            for vi in 1..=asg.num_vars {
                if asg.phases.best[vi] != 0 {
                    asg.phases.saved[vi] = asg.phases.best[vi];
                }
            }
        }
        3 => {
            for vi in 1..=asg.num_vars {
                if asg.phases.min[vi] != 0 {
                    asg.phases.saved[vi] = asg.phases.min[vi];
                }
            }
        }
        _ => {
            for vi in 1..=asg.num_vars {
                if asg.phases.prev[vi] != 0 {
                    asg.phases.saved[vi] = asg.phases.prev[vi];
                }
            }
        }
    }
    for t in asg.phases.target.iter_mut() {
        *t = 0;
    }
    asg.target_assigned = 0;
    state.lim.rephased[state.stable as usize] = asg.num_conflict;
    state.lim.rephase =
        asg.num_conflict + state.config.rephase_int * (state.stats.rephased + 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;

    #[test]
    fn test_rephase_cycles_and_clears_targets() {
        let cnf = CNFDescription {
            num_of_variables: 3,
            ..CNFDescription::default()
        };
        let config = Config::default();
        let mut asg = AssignStack::instantiate(&config, &cnf);
        let mut state = State::instantiate(&config, &cnf);
        asg.phases.saved[1] = -1;
        asg.phases.target[2] = 1;
        asg.num_conflict = 7;
        rephase(&mut asg, &mut state);
        // the first call inverts the saved phases
        assert_eq!(state.stats.rephased, 1);
        assert_eq!(asg.phases.saved[1], 1);
        assert_eq!(asg.phases.saved[2], -1);
        assert_eq!(asg.phases.prev[1], -1);
        assert_eq!(asg.phases.target[2], 0);
        assert_eq!(state.lim.rephased[0], 7);
        assert_eq!(state.lim.rephase, 7 + 2 * config.rephase_int);
    }
}
