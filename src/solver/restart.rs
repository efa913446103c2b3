//! Restart management and the stable / non-stable mode controller
use {
    crate::{
        assign::{AssignIF, AssignStack},
        state::{State, StateIF},
        types::*,
    },
    std::fmt,
};

/// Running averages of one search mode.
#[derive(Clone, Debug)]
pub struct Averages {
    /// glue of learnt clauses, fast and slow windows
    pub glue: Ema2,
}

impl Default for Averages {
    fn default() -> Averages {
        Averages {
            glue: Ema2::new(32).with_slow(8192),
        }
    }
}

/// Restart management: the reluctant-doubling sequence driving stable
/// mode, and one set of running averages per search mode. Only the
/// averages of the current mode are updated; the other set sleeps in
/// `saved` until the next mode switch.
#[derive(Clone, Debug, Default)]
pub struct Restarter {
    pub reluctant: Reluctant,
    avg: Averages,
    saved: Averages,
}

impl fmt::Display for Restarter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Restarter[{}, glue:{}]", self.reluctant, self.avg.glue)
    }
}

impl Instantiate for Restarter {
    fn instantiate(_config: &Config, _cnf: &CNFDescription) -> Restarter {
        Restarter::default()
    }
}

impl Restarter {
    pub fn init_averages(&mut self) {
        self.avg = Averages::default();
        self.saved = Averages::default();
    }
    pub fn swap_averages(&mut self) {
        std::mem::swap(&mut self.avg, &mut self.saved);
    }
    /// feed the glue of the latest learnt clause.
    pub fn update_after_conflict(&mut self, glue: f64, stable: bool) {
        self.avg.glue.update(glue);
        if stable {
            self.reluctant.tick();
        }
    }
    pub fn glue_trend(&self) -> f64 {
        self.avg.glue.trend()
    }
}

/// combine the restart limit check with the mode controller: crossing the
/// stabilization limit toggles the search mode before the restart
/// decision of the new mode is taken.
pub fn restarting(asg: &mut AssignStack, rst: &mut Restarter, state: &mut State) -> bool {
    if state.config.restart == 0 {
        return false;
    }
    if state.config.stabilize != 0 && state.lim.stabilize <= asg.num_conflict {
        switch_search_mode(asg, rst, state);
    }
    if asg.decision_level() == 0 {
        return false;
    }
    if state.stable {
        return rst.reluctant.triggered();
    }
    if asg.num_conflict < state.lim.restart {
        return false;
    }
    if rst.glue_trend() < state.config.restart_margin {
        // search is converging; postpone
        state.lim.restart = asg.num_conflict + state.config.restart_int;
        return false;
    }
    true
}

/// discard the decision stack and resume from the root.
pub fn restart(asg: &mut AssignStack, state: &mut State) {
    asg.num_restart += 1;
    asg.save_phases(state.stable);
    asg.backtrack(0);
    state.lim.restart = asg.num_conflict + state.config.restart_int;
}

fn switch_search_mode(asg: &AssignStack, rst: &mut Restarter, state: &mut State) {
    state.report(if state.stable { ']' } else { '}' });
    if state.config.stabilize_only == 0 {
        state.stable = !state.stable;
        rst.swap_averages();
    }
    state.inc.stabilize = (2 * state.inc.stabilize).min(state.config.stabilize_max_int);
    state.lim.stabilize = asg.num_conflict + state.inc.stabilize;
    state.report(if state.stable { '[' } else { '{' });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::VarManipulateIF;

    #[test]
    fn test_mode_switch_updates_limits() {
        let cnf = CNFDescription::default();
        let config = Config::default();
        let mut asg = AssignStack::instantiate(&config, &cnf);
        let mut rst = Restarter::instantiate(&config, &cnf);
        let mut state = State::instantiate(&config, &cnf);
        state.init_limits(&asg, &mut rst);
        assert!(!state.stable);
        asg.num_conflict = state.lim.stabilize;
        let _ = restarting(&mut asg, &mut rst, &mut state);
        assert!(state.stable);
        assert_eq!(state.inc.stabilize, 2 * config.stabilize_int);
        assert!(asg.num_conflict < state.lim.stabilize);
        assert_eq!(state.report_log, vec!['}', '[']);
    }

    #[test]
    fn test_nonstable_restart_needs_diverging_glue() {
        let cnf = CNFDescription::default();
        let config = Config::default();
        let mut asg = AssignStack::instantiate(&config, &cnf);
        asg.grow_to(2);
        let mut rst = Restarter::instantiate(&config, &cnf);
        let mut state = State::instantiate(&config, &cnf);
        state.init_limits(&asg, &mut rst);
        state.lim.stabilize = i64::MAX;
        asg.make_var_used(1);
        asg.assign_by_decision(Lit::from(1));
        asg.num_conflict = state.lim.restart;
        // flat glue average blocks the restart and pushes the limit out
        for _ in 0..100 {
            rst.update_after_conflict(4.0, false);
        }
        assert!(!restarting(&mut asg, &mut rst, &mut state));
        assert_eq!(state.lim.restart, asg.num_conflict + config.restart_int);
        // a burst of bad glues brings the trend over the margin
        asg.num_conflict = state.lim.restart;
        for _ in 0..8 {
            rst.update_after_conflict(40.0, false);
        }
        assert!(restarting(&mut asg, &mut rst, &mut state));
    }
}
