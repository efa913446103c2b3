/// Crate `config` provides solver's configuration and CLI.
use std::path::PathBuf;

#[cfg(not(feature = "no_IO"))]
use structopt::StructOpt;

/// Configuration built from command line options
#[derive(Clone, Debug)]
#[cfg_attr(not(feature = "no_IO"), derive(StructOpt))]
#[cfg_attr(not(feature = "no_IO"), structopt(name = "spica", about, author))]
pub struct Config {
    //
    //## I/O configuration
    //
    /// CNF file in DIMACS format
    #[cfg_attr(not(feature = "no_IO"), structopt(parse(from_os_str), default_value = ""))]
    pub cnf_file: PathBuf,

    /// Disable any progress message
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "quiet", short = "q"))]
    pub quiet_mode: bool,

    //
    //## phase handling
    //
    /// Initial saved phase (1: positive, 0: negative)
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "phase", default_value = "1"))]
    pub phase: i32,

    /// Always decide the initial phase, ignoring saved ones
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "FPH", default_value = "0"))]
    pub force_phase: i32,

    /// Use target phases in stable mode
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "TPH", default_value = "1"))]
    pub target_phase: i32,

    /// Rephasing switch
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "RPH", default_value = "1"))]
    pub rephase: i32,

    /// #conflicts between rephasings
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "rpi", default_value = "1000"))]
    pub rephase_int: i64,

    /// Lucky-phase attempts before search
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "LCK", default_value = "1"))]
    pub lucky: i32,

    //
    //## restart and search mode
    //
    /// Restart switch
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "RST", default_value = "1"))]
    pub restart: i32,

    /// Base #conflicts between restarts
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "rs", default_value = "10"))]
    pub restart_int: i64,

    /// Glue trend blocking restarts below this margin
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "rm", default_value = "1.1"))]
    pub restart_margin: f64,

    /// Stabilization (mode alternation) switch
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "STB", default_value = "1"))]
    pub stabilize: i32,

    /// Never leave stable mode
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "SBO", default_value = "0"))]
    pub stabilize_only: i32,

    /// Initial #conflicts of a stabilization phase
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "sbi", default_value = "1000"))]
    pub stabilize_int: i64,

    /// Cap on the stabilization phase length
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "sbm", default_value = "1073741824"))]
    pub stabilize_max_int: i64,

    /// Reluctant-doubling base period (0: disable)
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "rlt", default_value = "1024"))]
    pub reluctant: i64,

    /// Cap on the reluctant-doubling interval
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "rlm", default_value = "1048576"))]
    pub reluctant_max: i64,

    //
    //## clause DB
    //
    /// Clause reduction switch
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "RDC", default_value = "1"))]
    pub reduce: i32,

    /// Base #conflicts between reductions
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "rdi", default_value = "300"))]
    pub reduce_int: i64,

    /// Learnt-clause flushing switch
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "FLS", default_value = "0"))]
    pub flush: i32,

    /// #reductions between flushes
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "fli", default_value = "100"))]
    pub flush_int: i64,

    //
    //## pre/in-processing
    //
    /// Preprocessing rounds switch
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "SMP", default_value = "1"))]
    pub simplify: i32,

    /// Failed-literal probing switch
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "PRB", default_value = "1"))]
    pub probe: i32,

    /// Base #conflicts between probings
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "pri", default_value = "5000"))]
    pub probe_int: i64,

    /// Propagation budget of one probing pass
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "pre", default_value = "20000"))]
    pub probe_min_eff: i64,

    /// Clause subsumption switch
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "SUB", default_value = "1"))]
    pub subsume: i32,

    /// Base #conflicts between subsumption passes
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "sui", default_value = "10000"))]
    pub subsume_int: i64,

    /// Max #lit for clause subsumption
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "scl", default_value = "100"))]
    pub subsume_cls_lim: usize,

    /// Max occurrence-list length visited while subsuming
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "sol", default_value = "1000"))]
    pub subsume_occ_lim: usize,

    /// Bounded variable elimination switch
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "ELM", default_value = "1"))]
    pub elim: i32,

    /// Base #conflicts between elimination passes
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "eli", default_value = "2000"))]
    pub elim_int: i64,

    /// Initial occurrence bound of variable elimination
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "ebn", default_value = "16"))]
    pub elim_bound_min: i64,

    /// Final occurrence bound of variable elimination
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "ebx", default_value = "8192"))]
    pub elim_bound_max: i64,

    /// Grow limit of #cls in var elimination
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "egr", default_value = "0"))]
    pub elim_grow_lim: usize,

    /// Max #cls on one side to try resolution on a var
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "evo", default_value = "1000"))]
    pub elim_occ_lim: usize,

    /// Variable compaction switch
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "CPT", default_value = "1"))]
    pub compact: i32,

    /// Base #conflicts between compactions
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "cpi", default_value = "2000"))]
    pub compact_int: i64,

    /// Min percentage of inactive vars to trigger compaction
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "cpl", default_value = "10"))]
    pub compact_lim: usize,

    /// Restore policy for eliminated clauses (0-1: tainted only, 2: all)
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "rsa", default_value = "0"))]
    pub restore_all: i32,

    //
    //## local search
    //
    /// Local-search (walk) switch
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "WLK", default_value = "1"))]
    pub walk: i32,

    /// Min flip budget of one walk round
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "wme", default_value = "100000"))]
    pub walk_min_eff: i64,

    /// Seed of the walk's random number generator
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "seed", default_value = "20220429"))]
    pub walk_seed: u64,

    //
    //## var rewarding
    //
    /// Var score decay per conflict
    #[cfg_attr(not(feature = "no_IO"), structopt(long = "vdc", default_value = "0.95"))]
    pub var_decay: f64,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            cnf_file: PathBuf::new(),
            quiet_mode: true,
            phase: 1,
            force_phase: 0,
            target_phase: 1,
            rephase: 1,
            rephase_int: 1000,
            lucky: 1,
            restart: 1,
            restart_int: 10,
            restart_margin: 1.1,
            stabilize: 1,
            stabilize_only: 0,
            stabilize_int: 1000,
            stabilize_max_int: 1 << 30,
            reluctant: 1024,
            reluctant_max: 1 << 20,
            reduce: 1,
            reduce_int: 300,
            flush: 0,
            flush_int: 100,
            simplify: 1,
            probe: 1,
            probe_int: 5000,
            probe_min_eff: 20_000,
            subsume: 1,
            subsume_int: 10_000,
            subsume_cls_lim: 100,
            subsume_occ_lim: 1000,
            elim: 1,
            elim_int: 2000,
            elim_bound_min: 16,
            elim_bound_max: 8192,
            elim_grow_lim: 0,
            elim_occ_lim: 1000,
            compact: 1,
            compact_int: 2000,
            compact_lim: 10,
            restore_all: 0,
            walk: 1,
            walk_min_eff: 100_000,
            walk_seed: 20220429,
            var_decay: 0.95,
        }
    }
}

impl<T> From<T> for Config
where
    PathBuf: From<T>,
{
    fn from(path: T) -> Config {
        Config {
            cnf_file: PathBuf::from(path),
            ..Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_quiet() {
        let config = Config::default();
        assert!(config.quiet_mode);
        assert_eq!(config.phase, 1);
        assert!(config.elim_bound_min <= config.elim_bound_max);
    }
}
