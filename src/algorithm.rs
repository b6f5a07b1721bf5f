//! Long running searches implement the [`IterativeAlgorithm`] trait.
//!
//! An algorithm does a bounded unit of work per step and then returns control to the caller,
//! which decides whether to continue. Interruption requests are honoured only between steps.

use crate::utils::signal_handling;

/// [`IterativeAlgorithm`] provides a consistent interface to execute step-wise searches. It does
/// not prescribe any constructor; the construction phase should be cheap.
///
/// As an adopter of [`IterativeAlgorithm`], you have to implement the methods
///   [`IterativeAlgorithm::execute_step`],
///   [`IterativeAlgorithm::is_completed`] and [`IterativeAlgorithm::best_known_solution`].
///
/// # Example
/// ```
/// use clique_sat::algorithm::{IterativeAlgorithm, TerminatingIterativeAlgorithm};
///
/// struct CountToTen {
///     counter: u32,
/// }
///
/// impl IterativeAlgorithm<u32> for CountToTen {
///     fn execute_step(&mut self) {
///         self.counter += 1;
///     }
///
///     fn is_completed(&self) -> bool {
///         self.counter == 10
///     }
///
///     fn best_known_solution(&mut self) -> Option<u32> {
///         Some(self.counter)
///     }
/// }
///
/// impl TerminatingIterativeAlgorithm<u32> for CountToTen {}
///
/// let mut algo = CountToTen { counter: 0 };
/// algo.run_while(|algo| algo.counter < 3);
/// assert_eq!(algo.best_known_solution(), Some(3));
/// assert_eq!(algo.run_to_completion(), Some(10));
/// ```
pub trait IterativeAlgorithm<Solution> {
    /// Advances the computation by one unit of work.
    fn execute_step(&mut self);

    /// Returns true iff the algorithm is completed and [`IterativeAlgorithm::execute_step`] may not
    /// be called again.
    fn is_completed(&self) -> bool;

    /// Returns the currently best known solution or None if no solution is known yet.
    fn best_known_solution(&mut self) -> Option<Solution>;

    /// Keeps calling [`IterativeAlgorithm::execute_step`] until the `predicate` becomes false,
    /// a termination signal was received, or [`IterativeAlgorithm::is_completed`] becomes true.
    /// The function `predicate` is evaluated after each iteration, i.e. a step is carried out
    /// even if the predicate always returns false.
    fn run_while<F: FnMut(&mut Self) -> bool>(&mut self, mut predicate: F) {
        while !self.is_completed() && !signal_handling::received_ctrl_c() {
            self.execute_step();

            if !predicate(self) {
                break;
            }
        }
    }
}

/// Marker trait for algorithms that eventually terminate.
pub trait TerminatingIterativeAlgorithm<Solution>: IterativeAlgorithm<Solution> {
    /// Execute the algorithm until it completed (or the termination signal was received) and
    /// return the solution if it was found.
    fn run_to_completion(&mut self) -> Option<Solution> {
        while !self.is_completed() && !signal_handling::received_ctrl_c() {
            self.execute_step();
        }
        self.best_known_solution()
    }
}
