// DIMACS front-end: load a CNF file, solve it and print the verdict in
// competition format.
#[cfg(not(feature = "no_IO"))]
use {
    spica::{solver::Solver, Certificate, Config},
    structopt::StructOpt,
};

#[cfg(not(feature = "no_IO"))]
fn main() {
    let config = Config::from_args();
    let mut solver = match Solver::try_from(config.cnf_file.as_path()) {
        Ok(s) => s,
        Err(e) => {
            println!("c failed to load {}: {}", config.cnf_file.display(), e);
            std::process::exit(1);
        }
    };
    solver.state.config.quiet_mode = config.quiet_mode;
    match solver.solve_result() {
        Ok(Certificate::SAT(model)) => {
            println!("s SATISFIABLE");
            let mut line = String::from("v");
            for x in model.iter() {
                line.push(' ');
                line.push_str(&x.to_string());
            }
            line.push_str(" 0");
            println!("{line}");
            std::process::exit(10);
        }
        Ok(Certificate::UNSAT) => {
            println!("s UNSATISFIABLE");
            std::process::exit(20);
        }
        Err(e) => {
            println!("s UNKNOWN ({e})");
            std::process::exit(0);
        }
    }
}

#[cfg(feature = "no_IO")]
fn main() {}
