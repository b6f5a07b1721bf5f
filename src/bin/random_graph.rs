use std::path::PathBuf;

use clique_sat::{log::build_logger_for_verbosity, prelude::*};
use log::{LevelFilter, info};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use structopt::StructOpt;

/// Emits a G(n,p) graph in DIMACS edge format
#[derive(Debug, StructOpt)]
struct Opt {
    #[structopt(short, long)]
    nodes: NumNodes,

    /// Either the edge probability p ...
    #[structopt(short, long)]
    probability: Option<f64>,

    /// ... or the expected average degree
    #[structopt(short = "d", long)]
    avg_deg: Option<f64>,

    /// Seed of the generator; drawn at random and recorded in the output if omitted
    #[structopt(short, long)]
    seed: Option<u64>,

    /// Write to this file instead of STDOUT
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();
    build_logger_for_verbosity(LevelFilter::Warn, opt.verbose);

    let n = opt.nodes;
    let p = match (opt.probability, opt.avg_deg) {
        (Some(p), None) => p,
        (None, Some(d)) if n > 1 => d / (n - 1) as f64,
        (None, Some(_)) => 0.0,
        _ => anyhow::bail!("Provide exactly one of --probability and --avg-deg"),
    };
    anyhow::ensure!((0.0..=1.0).contains(&p), "Edge probability {p} not in [0, 1]");

    let seed = opt.seed.unwrap_or_else(rand::random);
    let mut rng = Pcg64Mcg::seed_from_u64(seed);

    let graph = AdjArray::random_gnp(&mut rng, n, p);
    info!(
        "Generated G({n}, {p}) with {} edges",
        graph.number_of_edges()
    );

    let comments = [
        format!("G(n,p) with n = {n}, p = {p}"),
        format!("seed = {seed} (rand_pcg::Pcg64Mcg)"),
    ];

    if let Some(path) = &opt.output {
        graph.try_write_dimacs_file(path, &comments)?;
    } else {
        graph.try_write_annotated_dimacs(std::io::stdout().lock(), &comments)?;
    }

    Ok(())
}
