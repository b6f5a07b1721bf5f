use std::{fs::File, io::BufWriter, path::PathBuf, time::Duration};

use anyhow::Context;
use clique_sat::{
    algorithm::IterativeAlgorithm,
    encoding::checked_clique_size,
    log::build_logger_for_verbosity,
    prelude::*,
    utils::signal_handling,
};
use log::{LevelFilter, info};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(about = "Encode and solve the k-clique / max-clique problem via SAT.")]
struct Opts {
    /// Graph instance file in DIMACS edge format
    #[structopt(short, long, parse(from_os_str), default_value = "graph.clq")]
    input: PathBuf,

    /// Output file for the DIMACS CNF formula; overwritten for every k
    #[structopt(short, long, parse(from_os_str), default_value = "formula.cnf")]
    output: PathBuf,

    /// SAT solver binary (called as `<solver> -model -verb=<v> <cnf>`)
    #[structopt(short, long, default_value = "glucose-syrup")]
    solver: String,

    /// Verbosity of the SAT solver
    #[structopt(short = "v", long = "verb", default_value = "0", possible_values = &["0", "1"])]
    verb: u8,

    /// Only solve for a clique of this size; search for a maximum clique if omitted
    #[structopt(short = "k", long = "kclique", allow_hyphen_values = true)]
    kclique: Option<i64>,

    /// Only write the CNF; do not call the SAT solver
    #[structopt(long)]
    dump_cnf_only: bool,

    /// Kill the solver after this many seconds
    #[structopt(short = "T", long)]
    timeout: Option<f64>,

    /// Write a JSON summary of all attempts to this file
    #[structopt(long, parse(from_os_str))]
    report: Option<PathBuf>,

    /// Print the raw solver output of each invocation
    #[structopt(long)]
    show_solver_output: bool,

    /// Log verbosity (-l, -ll, ...)
    #[structopt(short = "l", parse(from_occurrences))]
    log_level: usize,
}

const RULE: &str = "##################################################################";

fn print_cycle(opts: &Opts, cycle: &Cycle) {
    if opts.show_solver_output && !cycle.solver_output.is_empty() {
        println!("========== Solver raw output ==========");
        print!("{}", cycle.solver_output);
        println!("=======================================\n");
    }

    if let CycleOutcome::Found(_) = cycle.outcome {
        if !cycle.statistics.is_empty() {
            println!("---------- Solver statistics ----------");
            for line in &cycle.statistics {
                println!("{line}");
            }
            println!("---------------------------------------");
        }
    }
}

fn write_report(path: &Option<PathBuf>, report: &SearchReport) -> anyhow::Result<()> {
    if let Some(path) = path {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, report)?;
        info!("Report written to {path:?}");
    }
    Ok(())
}

fn solve_fixed<O: SolverOracle>(
    opts: &Opts,
    mut driver: SearchDriver<'_, AdjArray, O>,
    clique_size: NumNodes,
) -> anyhow::Result<()> {
    let result = driver.solve_fixed(clique_size);
    write_report(&opts.report, &SearchReport::from_fixed(&result, clique_size))?;
    let cycle = result?;

    print_cycle(opts, &cycle);
    match &cycle.outcome {
        CycleOutcome::Dumped => println!(
            "CNF for k={clique_size} written to {:?}. (solver not called)",
            driver.cnf_path()
        ),
        CycleOutcome::NoClique => println!("UNSAT: no clique of size {clique_size}."),
        CycleOutcome::Found(clique) => {
            println!("{RULE}");
            println!("###########[ Human readable result of the clique problem ]########");
            println!("{RULE}\n");
            println!("SAT: clique of size {clique_size} found.");
            println!("Vertices in the clique: {clique}\n");
        }
    }

    Ok(())
}

fn solve_max<O: SolverOracle>(
    opts: &Opts,
    driver: SearchDriver<'_, AdjArray, O>,
) -> anyhow::Result<()> {
    let mut search = driver.max_clique();

    while !signal_handling::received_ctrl_c() && !search.is_completed() {
        if let Some(k) = search.pending_clique_size() {
            println!("====================================================");
            println!("Trying clique size k = {k}");
            println!("====================================================");
        }

        search.execute_step();

        let Some(cycle) = search.last_cycle() else {
            continue;
        };
        print_cycle(opts, cycle);

        match &cycle.outcome {
            CycleOutcome::Dumped => println!(
                "(dump-only) CNF for k={} written to {:?}",
                cycle.clique_size,
                search.driver().cnf_path()
            ),
            CycleOutcome::NoClique => println!(
                "No clique of size {}. Maximum clique size is {}.",
                cycle.clique_size,
                search.best().len()
            ),
            CycleOutcome::Found(clique) => println!(
                "SAT: clique of size {} found. Vertices: {clique}\n",
                cycle.clique_size
            ),
        }
    }

    write_report(&opts.report, &search.report())?;

    println!();
    println!("{RULE}");
    println!("###########[ Final maximum clique result ]########################");
    println!("{RULE}\n");
    println!("Maximum clique size: {}", search.best().len());
    println!("Vertices: {}", search.best());

    match search.termination() {
        None => {
            println!("(interrupted before k = {})", search.next_clique_size());
            Ok(())
        }
        Some(Termination::Failed(e)) => {
            anyhow::bail!("search aborted at k = {}: {e}", search.next_clique_size())
        }
        Some(_) => Ok(()),
    }
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    build_logger_for_verbosity(LevelFilter::Warn, opts.log_level);
    signal_handling::initialize();

    let graph = AdjArray::try_read_dimacs_file(&opts.input)
        .with_context(|| format!("Cannot read graph from {:?}", opts.input))?;
    info!(
        "Loaded graph with n={} m={}",
        graph.number_of_nodes(),
        graph.number_of_edges()
    );

    let timeout = match opts.timeout {
        Some(secs) => Some(Duration::try_from_secs_f64(secs).context("invalid timeout")?),
        None => None,
    };
    let oracle = ExternalSolver::glucose(&opts.solver, opts.verb).with_timeout(timeout);
    let config = SearchConfig::new(&opts.output).dump_only(opts.dump_cnf_only);
    let driver = SearchDriver::new(&graph, oracle, config);

    match opts.kclique {
        Some(k) => solve_fixed(&opts, driver, checked_clique_size(k)?),
        None => solve_max(&opts, driver),
    }
}
