use std::{collections::VecDeque, fs, path::Path};

use itertools::Itertools;
use rand::Rng;

use crate::{
    encoding::{Assignment, Clause, CnfFormula, Literal},
    errors::{CliqueSatError, Result},
    graph::*,
    solver::{EXIT_SATISFIABLE, EXIT_UNSATISFIABLE, SolverOracle, SolverResponse},
};

/// Endless stream of G(n,p) graphs with `min_n <= n <= max_n` and varying density
pub fn random_graph_stream(
    rng: &mut impl Rng,
    min_n: NumNodes,
    max_n: NumNodes,
) -> impl Iterator<Item = AdjArray> {
    std::iter::repeat_with(move || {
        let n = rng.gen_range(min_n..=max_n);
        let p = rng.gen_range(0.1..0.9);
        AdjArray::random_gnp(&mut *rng, n, p)
    })
}

/// All cliques (as ascending 0-based node lists), including the empty one
pub fn all_cliques(graph: &AdjArray) -> Vec<Vec<Node>> {
    graph
        .vertices()
        .powerset()
        .filter(|set| {
            set.iter()
                .tuple_combinations()
                .all(|(&u, &v)| graph.has_edge(u, v))
        })
        .collect()
}

pub fn max_clique_size(graph: &AdjArray) -> usize {
    all_cliques(graph)
        .iter()
        .map(|c| c.len())
        .max()
        .unwrap_or(0)
}

/// In-process solver with unit propagation; only suited for tiny formulas
#[derive(Default)]
pub struct DpllOracle {
    submissions: usize,
    last_submission: Option<Vec<u8>>,
}

impl DpllOracle {
    pub fn number_of_submissions(&self) -> usize {
        self.submissions
    }

    pub fn last_submission(&self) -> Option<&[u8]> {
        self.last_submission.as_deref()
    }

    pub fn solve_formula(formula: &CnfFormula) -> Option<Assignment> {
        Self::solve(formula.number_of_variables(), formula.clauses())
    }

    fn solve(number_of_variables: u32, clauses: &[Clause]) -> Option<Assignment> {
        let mut values = vec![None; number_of_variables as usize + 1];
        if !dpll(clauses, &mut values) {
            return None;
        }

        Some(Assignment::new(
            (1..=number_of_variables as Literal)
                .map(|v| if values[v as usize] == Some(true) { v } else { -v })
                .collect(),
        ))
    }
}

fn value_of(values: &[Option<bool>], lit: Literal) -> Option<bool> {
    values[lit.unsigned_abs() as usize].map(|x| x == (lit > 0))
}

fn assign(values: &mut [Option<bool>], lit: Literal) {
    values[lit.unsigned_abs() as usize] = Some(lit > 0);
}

fn dpll(clauses: &[Clause], values: &mut Vec<Option<bool>>) -> bool {
    let mut trail = Vec::new();
    let undo = |values: &mut Vec<Option<bool>>, trail: &[Literal]| {
        for &lit in trail {
            values[lit.unsigned_abs() as usize] = None;
        }
    };

    let branch_literal = loop {
        let mut propagated = false;
        let mut branch: Option<(usize, Literal)> = None;

        for clause in clauses {
            let mut unassigned = 0;
            let mut candidate = 0;
            let mut satisfied = false;

            for &lit in clause {
                match value_of(values, lit) {
                    Some(true) => {
                        satisfied = true;
                        break;
                    }
                    Some(false) => {}
                    None => {
                        unassigned += 1;
                        candidate = lit;
                    }
                }
            }

            if satisfied {
                continue;
            }

            match unassigned {
                0 => {
                    undo(values, &trail);
                    return false;
                }
                1 => {
                    assign(values, candidate);
                    trail.push(candidate);
                    propagated = true;
                }
                _ => {
                    if branch.is_none_or(|(len, _)| unassigned < len) {
                        branch = Some((unassigned, candidate));
                    }
                }
            }
        }

        if !propagated {
            break branch.map(|(_, lit)| lit);
        }
    };

    let Some(lit) = branch_literal else {
        return true;
    };

    for choice in [lit, -lit] {
        assign(values, choice);
        if dpll(clauses, values) {
            return true;
        }
        values[choice.unsigned_abs() as usize] = None;
    }

    undo(values, &trail);
    false
}

/// Parses the DIMACS CNF text produced by [`crate::encoding::CnfWriter`]
fn parse_cnf(text: &[u8]) -> (u32, Vec<Clause>) {
    let text = std::str::from_utf8(text).unwrap();
    let mut number_of_variables = 0;
    let mut clauses = Vec::new();
    let mut current = Clause::new();

    for line in text.lines() {
        if line.starts_with('c') {
            continue;
        }

        if let Some(header) = line.strip_prefix("p cnf ") {
            let (vars, _) = header.split_whitespace().collect_tuple().unwrap();
            number_of_variables = vars.parse().unwrap();
            continue;
        }

        for token in line.split_whitespace() {
            let lit: Literal = token.parse().unwrap();
            if lit == 0 {
                clauses.push(std::mem::take(&mut current));
            } else {
                current.push(lit);
            }
        }
    }

    assert!(current.is_empty());
    (number_of_variables, clauses)
}

impl SolverOracle for DpllOracle {
    fn submit(&mut self, cnf_path: &Path, cnf_text: &[u8]) -> Result<SolverResponse> {
        assert_eq!(fs::read(cnf_path)?, cnf_text);
        self.submissions += 1;
        self.last_submission = Some(cnf_text.to_vec());

        let (number_of_variables, clauses) = parse_cnf(cnf_text);
        match Self::solve(number_of_variables, &clauses) {
            Some(assignment) => SolverResponse::from_exit_code(
                Some(EXIT_SATISFIABLE),
                format!(
                    "c decisions : 0\ns SATISFIABLE\nv {} 0\n",
                    assignment.literals().iter().join(" ")
                ),
            ),
            None => SolverResponse::from_exit_code(
                Some(EXIT_UNSATISFIABLE),
                "c conflicts : 1\ns UNSATISFIABLE\n".into(),
            ),
        }
    }
}

#[derive(Clone, Debug)]
pub enum Scripted {
    Model(Vec<Literal>),
    Unsat,
    Exit(Option<i32>),
}

/// Answers submissions with a fixed sequence of responses, regardless of the formula
pub struct ScriptedOracle {
    script: VecDeque<Scripted>,
}

impl ScriptedOracle {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl SolverOracle for ScriptedOracle {
    fn submit(&mut self, _cnf_path: &Path, _cnf_text: &[u8]) -> Result<SolverResponse> {
        match self.script.pop_front() {
            Some(Scripted::Model(literals)) => SolverResponse::from_exit_code(
                Some(EXIT_SATISFIABLE),
                format!("s SATISFIABLE\nv {} 0\n", literals.iter().join(" ")),
            ),
            Some(Scripted::Unsat) => {
                SolverResponse::from_exit_code(Some(EXIT_UNSATISFIABLE), String::new())
            }
            Some(Scripted::Exit(code)) => SolverResponse::from_exit_code(code, String::new()),
            None => Err(CliqueSatError::UnexpectedSolverExit {
                code: None,
                output: "script exhausted".into(),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dpll_small() {
        let mut formula = CnfFormula::new(3);
        formula.add_clause([1, 2]);
        formula.add_clause([-1, 3]);
        formula.add_clause([-3]);
        let model = DpllOracle::solve_formula(&formula).unwrap();
        assert_eq!(model.literals(), &[-1, 2, -3]);

        formula.add_clause([-2]);
        assert!(DpllOracle::solve_formula(&formula).is_none());

        assert!(DpllOracle::solve_formula(&CnfFormula::new(0)).is_some());
    }

    #[test]
    fn brute_force() {
        assert_eq!(max_clique_size(&AdjArray::new(0)), 0);
        assert_eq!(max_clique_size(&AdjArray::new(3)), 1);
        assert_eq!(max_clique_size(&AdjArray::complete(4)), 4);
        assert_eq!(all_cliques(&AdjArray::new(2)).len(), 3);
    }
}
