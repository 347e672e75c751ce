use tracing::info;

use crate::dictionary::{as_dictionary, is_dual_feasible, is_primal_feasible};
use crate::dual::dual_simplex;
use crate::error::SolverError;
use crate::gomory::gomory;
use crate::model::{LpModel, Stage};
use crate::primal::run_simplex;
use crate::solution::Solution;
use crate::standard::standardize;
use crate::two_phase::{two_phase_from_dictionary, two_phase_simplex};

/// Exact simplex solver for linear and integer programs
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots in a single simplex run
    max_pivots: usize,
    /// Maximum Gomory cuts before giving up on an integer program
    max_cuts: usize,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_pivots: 10_000,
            max_cuts: 500,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_pivots(mut self, max: usize) -> Self {
        self.max_pivots = max;
        self
    }

    pub fn with_max_cuts(mut self, max: usize) -> Self {
        self.max_cuts = max;
        self
    }

    /// Solve the LP with the two-phase simplex method
    pub fn solve(&self, model: LpModel) -> Result<Solution, SolverError> {
        info!(variables = model.decision_variables().len(), constraints = model.constraints().len(), "solving linear program");
        let objective = model.objective().expression().clone();
        let model = two_phase_simplex(model, self.max_pivots)?;
        Ok(Solution::extract(&model, &objective))
    }

    /// Bring the model to an optimal dictionary, starting with the dual
    /// simplex when the objective row is already dual feasible.
    ///
    /// Returns the optimal dictionary itself; use [`Solution::extract`] to read
    /// values from it.
    pub fn solve_dual(&self, model: LpModel) -> Result<LpModel, SolverError> {
        let model = as_dictionary(standardize(model));
        if is_primal_feasible(&model) || !is_dual_feasible(&model) {
            info!("dual simplex not applicable, falling back to two-phase simplex");
            return two_phase_from_dictionary(model, self.max_pivots);
        }
        let model = dual_simplex(model, self.max_pivots)?;
        run_simplex(model, Stage::PhaseTwo, self.max_pivots)
    }

    /// Solve the LP relaxation, then add Gomory cuts until every decision
    /// variable is integral. All model data must be integers.
    pub fn solve_integer(&self, model: LpModel) -> Result<Solution, SolverError> {
        model.ensure_integral_data()?;
        info!(variables = model.decision_variables().len(), constraints = model.constraints().len(), "solving integer program");
        let objective = model.objective().expression().clone();
        let model = two_phase_simplex(model, self.max_pivots)?;
        let model = gomory(model, self.max_pivots, self.max_cuts)?;
        Ok(Solution::extract(&model, &objective))
    }
}
