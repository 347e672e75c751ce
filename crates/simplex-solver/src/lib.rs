mod dictionary;
mod dual;
mod error;
mod gomory;
mod linear;
mod model;
mod primal;
mod rational;
mod solution;
mod solver;
mod standard;
mod two_phase;

pub use dictionary::{as_dictionary, back_to_standard, is_dual_feasible, is_primal_feasible};
pub use dual::dual_simplex;
pub use error::{ModelError, SolverError};
pub use gomory::gomory;
pub use linear::{Equation, Expression, Relation, Term, Variable};
pub use model::{Aim, LpModel, Objective, PivotStep, Stage};
pub use primal::run_simplex;
pub use rational::Rational;
pub use solution::Solution;
pub use solver::Solver;
pub use standard::standardize;
pub use two_phase::{to_first_phase, to_second_phase, two_phase_simplex};

/// Solve `model` with the default [`Solver`].
pub fn solve(model: LpModel) -> Result<Solution, SolverError> {
    Solver::default().solve(model)
}

/// Re-optimize `model` with the dual simplex using the default [`Solver`].
pub fn solve_dual(model: LpModel) -> Result<LpModel, SolverError> {
    Solver::default().solve_dual(model)
}

/// Solve `model` as an integer program with the default [`Solver`].
pub fn solve_integer(model: LpModel) -> Result<Solution, SolverError> {
    Solver::default().solve_integer(model)
}
