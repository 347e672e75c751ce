use serde::{Deserialize, Serialize};
use simplex_solver::{Solution, Solver, SolverError};
use tracing::warn;

use crate::dto::LpTaskDto;
use crate::error::TaskError;

pub const NO_SOLUTION: &str = "The provided linear programming problem has no solution.";
pub const NO_LIMIT: &str = "The provided linear programming problem has no limit.";
pub const INTEGER_NO_SOLUTION: &str = "The provided integer linear programming problem has no solution.";
pub const INTEGER_NO_LIMIT: &str = "The provided integer linear programming problem has no limit.";
pub const CUT_LIMIT_EXCEEDED: &str = "The cut limit was reached before an integral solution was found.";
pub const PIVOT_LIMIT_EXCEEDED: &str = "The pivot limit was reached before the simplex method finished.";
pub const GENERAL_ERROR: &str = "An error occured while solving...";

/// Outcome of a solved task: either a solution or the reason there is none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LpTaskResult {
    pub solution_found: bool,
    pub message: Option<String>,
    pub solution: Option<Solution>,
}

impl LpTaskResult {
    pub fn found(solution: Solution) -> Self {
        Self {
            solution_found: true,
            message: None,
            solution: Some(solution),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            solution_found: false,
            message: Some(message.into()),
            solution: None,
        }
    }

    /// Map a solver failure to the user-facing message.
    pub fn from_error(error: &SolverError, integer_programming: bool) -> Self {
        let message = match (error, integer_programming) {
            (SolverError::Infeasible, false) => NO_SOLUTION,
            (SolverError::Unbounded, false) => NO_LIMIT,
            (SolverError::Infeasible, true) => INTEGER_NO_SOLUTION,
            (SolverError::Unbounded, true) => INTEGER_NO_LIMIT,
            (SolverError::CutLimitExceeded(cuts), _) => {
                warn!(cuts = *cuts, "cut limit exceeded");
                CUT_LIMIT_EXCEEDED
            }
            (SolverError::PivotLimitExceeded(pivots), _) => {
                warn!(pivots = *pivots, "pivot limit exceeded");
                PIVOT_LIMIT_EXCEEDED
            }
            (other, _) => {
                warn!(error = %other, "solve failed");
                GENERAL_ERROR
            }
        };
        Self::not_found(message)
    }
}

/// Validate and solve a task. Format problems are errors; a problem without
/// a solution is a regular result carrying the reason.
pub fn solve_task(task: &LpTaskDto, solver: &Solver) -> Result<LpTaskResult, TaskError> {
    let model = task.to_model()?;
    let outcome = if task.integer_programming {
        solver.solve_integer(model)
    } else {
        solver.solve(model)
    };
    Ok(match outcome {
        Ok(solution) => LpTaskResult::found(solution),
        Err(error) => LpTaskResult::from_error(&error, task.integer_programming),
    })
}
