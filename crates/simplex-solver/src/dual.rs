//! Dual simplex: restores primal feasibility of a dictionary whose objective
//! row is already optimal, e.g. after a cutting plane was appended.

use num_traits::Zero;
use tracing::debug;

use crate::dictionary::pivot;
use crate::error::SolverError;
use crate::linear::Variable;
use crate::model::{LpModel, Stage};
use crate::rational::Rational;

pub fn dual_simplex(mut model: LpModel, max_pivots: usize) -> Result<LpModel, SolverError> {
    let mut pivots = 0;
    loop {
        let Some(row) = leaving_row(&model) else {
            debug!(pivots, objective = %model.objective.value(), "dual simplex restored feasibility");
            return Ok(model);
        };
        let Some(entering) = entering_variable(&model, row) else {
            debug!(row, "negative row without a positive coefficient");
            return Err(SolverError::Infeasible);
        };
        if pivots == max_pivots {
            return Err(SolverError::PivotLimitExceeded(max_pivots));
        }
        pivot(&mut model, row, &entering, Stage::Dual);
        pivots += 1;
    }
}

/// The row with the most negative constant, ties to the smallest basic index.
fn leaving_row(model: &LpModel) -> Option<usize> {
    model
        .constraints
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let constant = row.right.constant();
            if !constant.is_negative() {
                return None;
            }
            let basic = row.basic_variable()?;
            Some((i, constant, basic.index))
        })
        .min_by(|a, b| a.1.cmp(&b.1).then(a.2.cmp(&b.2)))
        .map(|(i, _, _)| i)
}

/// Among variables with a positive coefficient in `row`, the one minimizing
/// `|objective coefficient / row coefficient|`, ties to the smallest index.
/// This keeps every objective coefficient non-positive after the pivot.
fn entering_variable(model: &LpModel, row: usize) -> Option<Variable> {
    let objective = model.objective.expression();
    model.constraints[row]
        .right
        .linear_terms()
        .filter(|(c, _)| c.is_positive())
        .map(|(c, v)| {
            let cost = objective.coefficient(v).cloned().unwrap_or_else(Rational::zero);
            ((cost / c).abs(), v)
        })
        .min_by(|a, b| a.0.cmp(&b.0).then(a.1.index.cmp(&b.1.index)))
        .map(|(_, v)| v.clone())
}
