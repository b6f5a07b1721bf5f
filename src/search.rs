//! Drives encode -> write -> solve -> decode cycles, either once for a fixed clique size or
//! for k = 1, 2, ... until the formula becomes unsatisfiable.

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    algorithm::{IterativeAlgorithm, TerminatingIterativeAlgorithm},
    encoding::{CnfWriter, Variable, decode_clique, encode_clique},
    errors::{CliqueSatError, Result},
    graph::{AdjacencyTest, GraphNodeOrder, Node, NumNodes},
    solver::{SolverOracle, Verdict},
    utils::Clique,
};

#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// The formula of each cycle is written here, overwriting the previous one
    pub cnf_path: PathBuf,

    /// Only write the formulas; never invoke the solver
    pub dump_only: bool,
}

impl SearchConfig {
    pub fn new(cnf_path: impl Into<PathBuf>) -> Self {
        Self {
            cnf_path: cnf_path.into(),
            dump_only: false,
        }
    }

    pub fn dump_only(mut self, dump_only: bool) -> Self {
        self.dump_only = dump_only;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    Found(Clique),
    NoClique,
    /// The formula was written but not solved
    Dumped,
}

/// Everything a single encode/solve cycle produced
#[derive(Clone, Debug)]
pub struct Cycle {
    pub clique_size: NumNodes,
    pub number_of_variables: Variable,
    pub number_of_clauses: usize,
    pub outcome: CycleOutcome,
    pub elapsed: Duration,
    pub statistics: Vec<String>,
    pub solver_output: String,
}

/// Serializable record of one attempted clique size
#[derive(Clone, Debug, Serialize)]
pub struct Attempt {
    pub clique_size: NumNodes,
    pub number_of_variables: Variable,
    pub number_of_clauses: usize,
    pub outcome: AttemptOutcome,
    pub seconds: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AttemptOutcome {
    Found { vertices: Vec<Node> },
    NoClique,
    Dumped,
    Failed { message: String },
}

impl Cycle {
    pub fn attempt(&self) -> Attempt {
        Attempt {
            clique_size: self.clique_size,
            number_of_variables: self.number_of_variables,
            number_of_clauses: self.number_of_clauses,
            outcome: match &self.outcome {
                CycleOutcome::Found(clique) => AttemptOutcome::Found {
                    vertices: clique.labels().collect(),
                },
                CycleOutcome::NoClique => AttemptOutcome::NoClique,
                CycleOutcome::Dumped => AttemptOutcome::Dumped,
            },
            seconds: self.elapsed.as_secs_f64(),
        }
    }
}

/// Runs single cycles for a graph against a solver oracle
pub struct SearchDriver<'a, G, O> {
    graph: &'a G,
    oracle: O,
    config: SearchConfig,
}

impl<'a, G, O> SearchDriver<'a, G, O>
where
    G: AdjacencyTest + GraphNodeOrder,
    O: SolverOracle,
{
    pub fn new(graph: &'a G, oracle: O, config: SearchConfig) -> Self {
        Self {
            graph,
            oracle,
            config,
        }
    }

    pub fn graph(&self) -> &'a G {
        self.graph
    }

    pub fn cnf_path(&self) -> &Path {
        &self.config.cnf_path
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Performs one full encode -> write -> solve -> decode cycle for `clique_size`
    pub fn run_cycle(&mut self, clique_size: NumNodes) -> Result<Cycle> {
        let start = Instant::now();
        let number_of_nodes = self.graph.number_of_nodes();

        let formula = encode_clique(self.graph, clique_size)?;
        let cnf_text = formula.to_cnf_bytes();
        fs::write(&self.config.cnf_path, &cnf_text)?;

        info!(
            "k={clique_size}: wrote {} variables and {} clauses to {:?}",
            formula.number_of_variables(),
            formula.number_of_clauses(),
            self.config.cnf_path
        );

        let mut cycle = Cycle {
            clique_size,
            number_of_variables: formula.number_of_variables(),
            number_of_clauses: formula.number_of_clauses(),
            outcome: CycleOutcome::Dumped,
            elapsed: Duration::ZERO,
            statistics: Vec::new(),
            solver_output: String::new(),
        };

        if self.config.dump_only {
            cycle.elapsed = start.elapsed();
            return Ok(cycle);
        }

        let response = self.oracle.submit(&self.config.cnf_path, &cnf_text)?;
        for line in response.output.lines() {
            debug!("solver> {line}");
        }

        cycle.statistics = response.statistics();
        cycle.outcome = match &response.verdict {
            Verdict::Satisfiable(assignment) => {
                let clique = decode_clique(assignment, clique_size, number_of_nodes)?;
                if clique.len() != clique_size as usize || !clique.is_valid(self.graph) {
                    warn!("Model for k={clique_size} decodes to {clique}, which is no {clique_size}-clique");
                }
                CycleOutcome::Found(clique)
            }
            Verdict::Unsatisfiable => CycleOutcome::NoClique,
        };
        cycle.solver_output = response.output;
        cycle.elapsed = start.elapsed();

        Ok(cycle)
    }

    /// Fixed-k mode: a single cycle; solver faults are returned as errors
    pub fn solve_fixed(&mut self, clique_size: NumNodes) -> Result<Cycle> {
        let cycle = self.run_cycle(clique_size)?;
        match &cycle.outcome {
            CycleOutcome::Found(clique) => info!("Clique of size {clique_size} found: {clique}"),
            CycleOutcome::NoClique => info!("No clique of size {clique_size}"),
            CycleOutcome::Dumped => info!("CNF for k={clique_size} written; solver not called"),
        }
        Ok(cycle)
    }

    /// Max-clique mode; see [`MaxCliqueSearch`]
    pub fn max_clique(self) -> MaxCliqueSearch<'a, G, O> {
        MaxCliqueSearch::new(self)
    }
}

/// Why a [`MaxCliqueSearch`] stopped
#[derive(Debug)]
pub enum Termination {
    /// The formula for this clique size was unsatisfiable
    Unsatisfiable(NumNodes),
    /// Every size up to the number of nodes was satisfiable (or dumped)
    Exhausted,
    /// The solver (or writing the formula) failed; this is no evidence of unsatisfiability
    Failed(CliqueSatError),
}

/// Probes k = 1, 2, ... and keeps the largest clique found. Stops at the first unsatisfiable
/// k, at the first failure, or after k = n. Interruption is only checked between cycles.
pub struct MaxCliqueSearch<'a, G, O> {
    driver: SearchDriver<'a, G, O>,
    next_clique_size: NumNodes,
    best: Clique,
    attempts: Vec<Attempt>,
    last_cycle: Option<Cycle>,
    termination: Option<Termination>,
}

impl<'a, G, O> MaxCliqueSearch<'a, G, O>
where
    G: AdjacencyTest + GraphNodeOrder,
    O: SolverOracle,
{
    pub fn new(driver: SearchDriver<'a, G, O>) -> Self {
        let number_of_nodes = driver.graph().number_of_nodes();
        Self {
            driver,
            next_clique_size: 1,
            best: Clique::new(number_of_nodes),
            attempts: Vec::new(),
            last_cycle: None,
            termination: None,
        }
    }

    /// The largest clique found so far; empty before the first successful cycle
    pub fn best(&self) -> &Clique {
        &self.best
    }

    /// The clique size the next step will try
    pub fn next_clique_size(&self) -> NumNodes {
        self.next_clique_size
    }

    /// The clique size the next step will encode and solve, or `None` if the next step
    /// performs no cycle (the search is completed or every size up to n was tried)
    pub fn pending_clique_size(&self) -> Option<NumNodes> {
        (!self.is_completed() && self.next_clique_size <= self.driver.graph().number_of_nodes())
            .then_some(self.next_clique_size)
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    /// The cycle carried out by the most recent step, if it completed
    pub fn last_cycle(&self) -> Option<&Cycle> {
        self.last_cycle.as_ref()
    }

    /// `None` while the search is running or if it was interrupted
    pub fn termination(&self) -> Option<&Termination> {
        self.termination.as_ref()
    }

    pub fn driver(&self) -> &SearchDriver<'a, G, O> {
        &self.driver
    }

    pub fn report(&self) -> SearchReport {
        SearchReport {
            status: match &self.termination {
                None => SearchStatus::Interrupted,
                Some(Termination::Unsatisfiable(k)) => SearchStatus::Unsatisfiable {
                    clique_size: *k,
                },
                Some(Termination::Exhausted) => SearchStatus::Exhausted,
                Some(Termination::Failed(e)) => SearchStatus::Failed {
                    message: e.to_string(),
                },
            },
            best_clique_size: self.best.len(),
            best_clique: self.best.labels().collect(),
            attempts: self.attempts.clone(),
        }
    }
}

impl<G, O> IterativeAlgorithm<Clique> for MaxCliqueSearch<'_, G, O>
where
    G: AdjacencyTest + GraphNodeOrder,
    O: SolverOracle,
{
    fn execute_step(&mut self) {
        if self.is_completed() {
            return;
        }

        let k = self.next_clique_size;
        self.last_cycle = None;

        if k > self.driver.graph().number_of_nodes() {
            info!("Every clique size up to {} is satisfiable", k - 1);
            self.termination = Some(Termination::Exhausted);
            return;
        }

        let start = Instant::now();
        match self.driver.run_cycle(k) {
            Ok(cycle) => {
                match &cycle.outcome {
                    CycleOutcome::Found(clique) => {
                        info!("Clique of size {k} found: {clique}");
                        self.best = clique.clone();
                        self.next_clique_size += 1;
                    }
                    CycleOutcome::Dumped => {
                        self.next_clique_size += 1;
                    }
                    CycleOutcome::NoClique => {
                        info!(
                            "No clique of size {k}. Maximum clique size is {}",
                            self.best.len()
                        );
                        self.termination = Some(Termination::Unsatisfiable(k));
                    }
                }

                self.attempts.push(cycle.attempt());
                self.last_cycle = Some(cycle);
            }

            Err(e) => {
                warn!("Search for k={k} failed: {e}");
                self.attempts.push(Attempt {
                    clique_size: k,
                    number_of_variables: 0,
                    number_of_clauses: 0,
                    outcome: AttemptOutcome::Failed {
                        message: e.to_string(),
                    },
                    seconds: start.elapsed().as_secs_f64(),
                });
                self.termination = Some(Termination::Failed(e));
            }
        }
    }

    fn is_completed(&self) -> bool {
        self.termination.is_some()
    }

    fn best_known_solution(&mut self) -> Option<Clique> {
        Some(self.best.clone())
    }
}

impl<G, O> TerminatingIterativeAlgorithm<Clique> for MaxCliqueSearch<'_, G, O>
where
    G: AdjacencyTest + GraphNodeOrder,
    O: SolverOracle,
{
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SearchStatus {
    /// Fixed-k mode found a clique
    Satisfiable { clique_size: NumNodes },
    Unsatisfiable { clique_size: NumNodes },
    /// Fixed-k mode only wrote the formula
    Dumped,
    Exhausted,
    Failed { message: String },
    Interrupted,
}

/// Summary of a search, suitable for JSON export
#[derive(Clone, Debug, Serialize)]
pub struct SearchReport {
    pub status: SearchStatus,
    pub best_clique_size: usize,
    pub best_clique: Vec<Node>,
    pub attempts: Vec<Attempt>,
}

impl SearchReport {
    /// Report of a fixed-k run
    pub fn from_fixed(result: &Result<Cycle>, clique_size: NumNodes) -> Self {
        match result {
            Ok(cycle) => {
                let (status, best) = match &cycle.outcome {
                    CycleOutcome::Found(clique) => {
                        (SearchStatus::Satisfiable { clique_size }, clique.labels().collect())
                    }
                    CycleOutcome::NoClique => (SearchStatus::Unsatisfiable { clique_size }, Vec::new()),
                    CycleOutcome::Dumped => (SearchStatus::Dumped, Vec::new()),
                };
                Self {
                    status,
                    best_clique_size: best.len(),
                    best_clique: best,
                    attempts: vec![cycle.attempt()],
                }
            }
            Err(e) => Self {
                status: SearchStatus::Failed {
                    message: e.to_string(),
                },
                best_clique_size: 0,
                best_clique: Vec::new(),
                attempts: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{graph::*, testing::*};
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> SearchConfig {
        SearchConfig::new(dir.path().join("formula.cnf"))
    }

    fn triangle() -> AdjArray {
        AdjArray::from_edges(3, [(0, 1), (0, 2), (1, 2)])
    }

    fn path() -> AdjArray {
        AdjArray::from_edges(3, [(0, 1), (1, 2)])
    }

    fn found(cycle: &Cycle) -> Vec<Node> {
        match &cycle.outcome {
            CycleOutcome::Found(clique) => clique.labels().collect(),
            other => panic!("expected a clique, got {other:?}"),
        }
    }

    #[test]
    fn triangle_fixed_k() {
        let dir = TempDir::new().unwrap();
        let graph = triangle();
        let mut driver = SearchDriver::new(&graph, DpllOracle::default(), config(&dir));

        let cycle = driver.solve_fixed(3).unwrap();
        assert_eq!(found(&cycle), vec![1, 2, 3]);
        assert_eq!(cycle.number_of_variables, 9);

        // k > n is no error but unsatisfiable
        let cycle = driver.solve_fixed(4).unwrap();
        assert_eq!(cycle.outcome, CycleOutcome::NoClique);
        assert_eq!(cycle.number_of_variables, 12);

        assert_eq!(driver.oracle().number_of_submissions(), 2);
    }

    #[test]
    fn path_fixed_k() {
        let dir = TempDir::new().unwrap();
        let graph = path();
        let mut driver = SearchDriver::new(&graph, DpllOracle::default(), config(&dir));

        let clique = found(&driver.solve_fixed(2).unwrap());
        assert!(clique == vec![1, 2] || clique == vec![2, 3], "{clique:?}");

        assert_eq!(
            driver.solve_fixed(3).unwrap().outcome,
            CycleOutcome::NoClique
        );
    }

    #[test]
    fn empty_clique_size() {
        let dir = TempDir::new().unwrap();
        let graph = path();
        let mut driver = SearchDriver::new(&graph, DpllOracle::default(), config(&dir));

        let cycle = driver.solve_fixed(0).unwrap();
        assert_eq!(found(&cycle), Vec::<Node>::new());
        assert_eq!(cycle.number_of_clauses, 0);
        assert_eq!(
            fs::read_to_string(dir.path().join("formula.cnf")).unwrap(),
            "p cnf 0 0\n"
        );
    }

    #[test]
    fn path_max_clique() {
        let dir = TempDir::new().unwrap();
        let graph = path();
        let mut search =
            SearchDriver::new(&graph, DpllOracle::default(), config(&dir)).max_clique();

        let best = search.run_to_completion().unwrap();
        assert_eq!(best.len(), 2);
        assert!(best.is_valid(&graph));
        assert!(matches!(
            search.termination(),
            Some(Termination::Unsatisfiable(3))
        ));

        let report = search.report();
        assert_eq!(report.best_clique_size, 2);
        assert_eq!(
            report.attempts.iter().map(|a| a.clique_size).collect_vec(),
            vec![1, 2, 3]
        );
        assert_eq!(report.attempts[2].outcome, AttemptOutcome::NoClique);
    }

    #[test]
    fn complete_graph_exhausts() {
        let dir = TempDir::new().unwrap();
        let graph = AdjArray::complete(4);
        let mut search =
            SearchDriver::new(&graph, DpllOracle::default(), config(&dir)).max_clique();

        let best = search.run_to_completion().unwrap();
        assert_eq!(best.labels().collect_vec(), vec![1, 2, 3, 4]);
        assert!(matches!(search.termination(), Some(Termination::Exhausted)));

        // k = n + 1 is never submitted
        assert_eq!(search.driver().oracle().number_of_submissions(), 4);
    }

    #[test]
    fn graph_without_nodes() {
        let dir = TempDir::new().unwrap();
        let graph = AdjArray::new(0);
        let mut search =
            SearchDriver::new(&graph, DpllOracle::default(), config(&dir)).max_clique();

        let best = search.run_to_completion().unwrap();
        assert!(best.is_empty());
        assert!(matches!(search.termination(), Some(Termination::Exhausted)));
        assert!(search.attempts().is_empty());
    }

    #[test]
    fn edgeless_graph() {
        let dir = TempDir::new().unwrap();
        let graph = AdjArray::new(3);
        let mut search =
            SearchDriver::new(&graph, DpllOracle::default(), config(&dir)).max_clique();

        assert_eq!(search.run_to_completion().unwrap().len(), 1);
        assert!(matches!(
            search.termination(),
            Some(Termination::Unsatisfiable(2))
        ));
    }

    #[test]
    fn solver_failure_halts_search() {
        let dir = TempDir::new().unwrap();
        let graph = AdjArray::complete(5);

        // k=1 and k=2 succeed, k=3 crashes
        let oracle = ScriptedOracle::new([
            Scripted::Model(vec![1, -2, -3, -4, -5]),
            Scripted::Model(vec![-1, -2, 3, -4, -5, -6, -7, -8, 9, -10]),
            Scripted::Exit(Some(139)),
            Scripted::Unsat,
        ]);

        let mut search = SearchDriver::new(&graph, oracle, config(&dir)).max_clique();
        let best = search.run_to_completion().unwrap();

        assert_eq!(best.labels().collect_vec(), vec![3, 4]);
        assert!(matches!(
            search.termination(),
            Some(Termination::Failed(CliqueSatError::UnexpectedSolverExit {
                code: Some(139),
                ..
            }))
        ));
        assert_eq!(search.driver().oracle().remaining(), 1);
        assert!(matches!(
            search.report().attempts[2].outcome,
            AttemptOutcome::Failed { .. }
        ));
    }

    #[test]
    fn short_model_is_reported() {
        let dir = TempDir::new().unwrap();
        let graph = triangle();
        let oracle = ScriptedOracle::new([Scripted::Model(vec![1, -2])]);
        let mut driver = SearchDriver::new(&graph, oracle, config(&dir));

        assert!(matches!(
            driver.solve_fixed(2),
            Err(CliqueSatError::AssignmentTooShort {
                expected: 6,
                actual: 2
            })
        ));
    }

    #[test]
    fn dump_only() {
        let dir = TempDir::new().unwrap();
        let graph = triangle();
        let mut search =
            SearchDriver::new(&graph, ScriptedOracle::new(Vec::<Scripted>::new()), config(&dir).dump_only(true))
                .max_clique();

        search.run_to_completion();
        assert!(matches!(search.termination(), Some(Termination::Exhausted)));
        assert!(
            search
                .attempts()
                .iter()
                .all(|a| a.outcome == AttemptOutcome::Dumped)
        );

        // the last formula (k = 3) remains on disk
        let content = fs::read_to_string(dir.path().join("formula.cnf")).unwrap();
        assert!(content.starts_with("p cnf 9 "));
    }

    #[test]
    fn cnf_file_matches_submission() {
        let dir = TempDir::new().unwrap();
        let graph = triangle();
        let mut driver = SearchDriver::new(&graph, DpllOracle::default(), config(&dir));
        driver.solve_fixed(2).unwrap();

        let written = fs::read(dir.path().join("formula.cnf")).unwrap();
        assert_eq!(driver.oracle().last_submission(), Some(written.as_slice()));
    }

    #[test]
    fn cross_with_brute_force() {
        let mut rng = Pcg64Mcg::seed_from_u64(0x123612873);
        let dir = TempDir::new().unwrap();

        for graph in random_graph_stream(&mut rng, 0, 8).take(80) {
            let mut search =
                SearchDriver::new(&graph, DpllOracle::default(), config(&dir)).max_clique();

            let best = search.run_to_completion().unwrap();
            assert_eq!(best.len(), max_clique_size(&graph), "{graph:?}");
            assert!(best.is_valid(&graph));
        }
    }

    #[test]
    fn tiny_instances() {
        use crate::io::GraphDimacsReader;

        let dir = TempDir::new().unwrap();
        for file in glob::glob("instances/tiny/*.clq").unwrap() {
            let file = file.unwrap();
            let graph = AdjArray::try_read_dimacs_file(&file).unwrap();

            let mut search =
                SearchDriver::new(&graph, DpllOracle::default(), config(&dir)).max_clique();
            let best = search.run_to_completion().unwrap();

            assert_eq!(best.len(), max_clique_size(&graph), "{file:?}");
            assert!(best.is_valid(&graph), "{file:?}");
        }
    }

    #[test]
    fn stopped_between_cycles() {
        let dir = TempDir::new().unwrap();
        let graph = AdjArray::complete(4);
        let mut search =
            SearchDriver::new(&graph, DpllOracle::default(), config(&dir)).max_clique();

        // a single step, then the caller stops the search
        search.run_while(|_| false);

        assert!(search.termination().is_none());
        assert!(!search.is_completed());
        assert_eq!(search.next_clique_size(), 2);
        assert_eq!(search.best().len(), 1);

        let report = search.report();
        assert_eq!(report.status, SearchStatus::Interrupted);
        assert_eq!(report.best_clique_size, 1);
        assert_eq!(report.attempts.len(), 1);

        // resuming continues at the next clique size
        let best = search.run_to_completion().unwrap();
        assert_eq!(best.len(), 4);
        assert_eq!(search.driver().oracle().number_of_submissions(), 4);
    }

    #[test]
    fn pending_sizes_are_announced_before_each_cycle() {
        let dir = TempDir::new().unwrap();
        let graph = path();
        let mut search =
            SearchDriver::new(&graph, DpllOracle::default(), config(&dir)).max_clique();

        let mut announced = Vec::new();
        while let Some(k) = search.pending_clique_size() {
            announced.push(k);
            let submissions = search.driver().oracle().number_of_submissions();
            search.execute_step();
            assert_eq!(search.driver().oracle().number_of_submissions(), submissions + 1);
            assert_eq!(search.last_cycle().map(|c| c.clique_size), Some(k));
        }

        assert_eq!(announced, vec![1, 2, 3]);
        assert!(search.is_completed());

        // for a complete graph the final step tries no cycle
        let graph = AdjArray::complete(2);
        let mut search =
            SearchDriver::new(&graph, DpllOracle::default(), config(&dir)).max_clique();
        search.execute_step();
        search.execute_step();
        assert_eq!(search.pending_clique_size(), None);
        assert!(!search.is_completed());
        search.execute_step();
        assert!(matches!(search.termination(), Some(Termination::Exhausted)));
    }

    #[test]
    fn fixed_report() {
        let dir = TempDir::new().unwrap();
        let graph = path();
        let mut driver = SearchDriver::new(&graph, DpllOracle::default(), config(&dir));

        let report = SearchReport::from_fixed(&driver.solve_fixed(2), 2);
        assert_eq!(report.status, SearchStatus::Satisfiable { clique_size: 2 });
        assert_eq!(report.best_clique_size, 2);

        let report = SearchReport::from_fixed(&driver.solve_fixed(3), 3);
        assert_eq!(report.status, SearchStatus::Unsatisfiable { clique_size: 3 });
        assert!(report.best_clique.is_empty());
        assert_eq!(report.attempts.len(), 1);
    }

    #[test]
    fn report_serializes() {
        let dir = TempDir::new().unwrap();
        let graph = triangle();
        let mut search =
            SearchDriver::new(&graph, DpllOracle::default(), config(&dir)).max_clique();
        search.run_to_completion();

        let json = serde_json::to_value(search.report()).unwrap();
        assert_eq!(json["status"]["kind"], "exhausted");
        assert_eq!(json["best_clique"], serde_json::json!([1, 2, 3]));
        assert_eq!(json["attempts"][0]["outcome"]["kind"], "found");
    }
}
