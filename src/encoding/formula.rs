use super::{Assignment, Literal, Variable};
use crate::errors::{CliqueSatError, InvariantCheck};

/// Disjunction of literals. The terminating `0` of the DIMACS format is not stored.
pub type Clause = Vec<Literal>;

/// Conjunction of clauses over the variables `1..=number_of_variables`.
/// Clauses keep their insertion order, which is also the order in which they are written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CnfFormula {
    number_of_variables: Variable,
    clauses: Vec<Clause>,
}

impl CnfFormula {
    pub fn new(number_of_variables: Variable) -> Self {
        Self {
            number_of_variables,
            clauses: Vec::new(),
        }
    }

    pub fn add_clause(&mut self, clause: impl Into<Clause>) {
        let clause = clause.into();
        debug_assert!(clause.iter().all(|&lit| {
            lit != 0 && lit.unsigned_abs() <= self.number_of_variables
        }));
        self.clauses.push(clause);
    }

    pub fn number_of_variables(&self) -> Variable {
        self.number_of_variables
    }

    pub fn number_of_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns true iff every clause contains a literal made true by `assignment`.
    /// Variables not covered by the assignment satisfy no literal.
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.clauses.iter().all(|clause| {
            clause
                .iter()
                .any(|&lit| assignment.satisfies(lit) == Some(true))
        })
    }
}

impl InvariantCheck<CliqueSatError> for CnfFormula {
    fn is_correct(&self) -> Result<(), CliqueSatError> {
        for (i, clause) in self.clauses.iter().enumerate() {
            if let Some(&lit) = clause
                .iter()
                .find(|&&lit| lit == 0 || lit.unsigned_abs() > self.number_of_variables)
            {
                return Err(CliqueSatError::Invariant(format!(
                    "clause {i} contains literal {lit} outside of [1, {}]",
                    self.number_of_variables
                )));
            }
        }

        Ok(())
    }
}
