use super::{Literal, Variable};

/// Model returned by a solver: entry `i` holds the signed literal of variable `i + 1`,
/// positive for true and negative for false.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment {
    literals: Vec<Literal>,
}

impl Assignment {
    pub fn new(literals: Vec<Literal>) -> Self {
        Self { literals }
    }

    /// Assignment of `number_of_variables` variables where exactly the given ones are true
    pub fn from_true_variables(
        number_of_variables: Variable,
        true_variables: impl IntoIterator<Item = Variable>,
    ) -> Self {
        let mut literals: Vec<Literal> = (1..=number_of_variables as Literal).map(|x| -x).collect();
        for var in true_variables {
            let slot = &mut literals[var as usize - 1];
            *slot = slot.abs();
        }
        Self { literals }
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// Returns the value of `variable` or `None` if the assignment does not cover it
    pub fn value_of(&self, variable: Variable) -> Option<bool> {
        let idx = (variable as usize).checked_sub(1)?;
        self.literals.get(idx).map(|&lit| lit > 0)
    }

    /// Returns the value of the literal or `None` if its variable is not covered
    pub fn satisfies(&self, literal: Literal) -> Option<bool> {
        let value = self.value_of(literal.unsigned_abs())?;
        Some(value == (literal > 0))
    }
}

impl From<Vec<Literal>> for Assignment {
    fn from(literals: Vec<Literal>) -> Self {
        Self::new(literals)
    }
}
