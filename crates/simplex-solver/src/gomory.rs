//! Gomory fractional cutting planes on top of an optimal dictionary.

use num_traits::{One, Zero};
use tracing::{debug, info};

use crate::dictionary::into_dictionary_row;
use crate::dual::dual_simplex;
use crate::error::SolverError;
use crate::linear::{Equation, Expression, Relation, Term};
use crate::model::LpModel;
use crate::rational::Rational;

/// Add cuts to an optimal dictionary until every integer variable has an
/// integral value, re-optimizing with the dual simplex after each cut.
pub fn gomory(mut model: LpModel, max_pivots: usize, max_cuts: usize) -> Result<LpModel, SolverError> {
    let mut cuts = 0;
    while let Some(row) = fractional_row(&model) {
        if cuts == max_cuts {
            return Err(SolverError::CutLimitExceeded(max_cuts));
        }
        let cut = make_cut(&model.constraints[row]);
        debug!(row, %cut, "adding cut");
        add_cut(&mut model, cut);
        model = dual_simplex(model, max_pivots)?;
        cuts += 1;
    }
    info!(cuts, objective = %model.objective.value(), "integer optimum reached");
    Ok(model)
}

/// First row whose basic variable must be integral but has a fractional value.
pub(crate) fn fractional_row(model: &LpModel) -> Option<usize> {
    let integer_variables = model.integer_variables();
    model.constraints.iter().position(|row| {
        row.basic_variable().is_some_and(|v| integer_variables.contains(v)) && !row.right.constant().is_integer()
    })
}

/// For the row `basic = c + Σ a·x` build `Σ frac(-a)·x >= frac(c)`, already
/// multiplied by -1 into `Σ -frac(-a)·x <= -frac(c)`.
pub(crate) fn make_cut(row: &Equation) -> Equation {
    let left: Expression = row
        .right
        .linear_terms()
        .map(|(c, v)| Term::linear((-c).fraction(), v.clone()))
        .filter(|t| !t.coefficient().is_zero())
        .collect();
    let right = Expression::constant_only(row.right.constant().fraction());
    let mut cut = Equation::new(left, Relation::GreaterOrEqual, right);
    cut.multiply(&-Rational::one());
    cut
}

/// Append `cut` as the dictionary row of a fresh slack.
fn add_cut(model: &mut LpModel, mut cut: Equation) {
    for variable in cut.variables().cloned().collect::<Vec<_>>() {
        if !model.all_variables.contains(&variable) {
            model.register(variable);
        }
    }
    let name = model.variable_name().to_string();
    let slack = model.fresh_variable(&name);
    into_dictionary_row(&mut cut, slack);
    model.constraints.push(cut);
}
