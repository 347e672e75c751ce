//! Primal simplex with Bland's rule.

use tracing::debug;

use crate::dictionary::pivot;
use crate::error::SolverError;
use crate::linear::Variable;
use crate::model::{LpModel, Stage};
use crate::rational::Rational;

/// Pivot a feasible dictionary until no objective coefficient is positive.
///
/// Entering and leaving variables are both chosen by smallest index among
/// the candidates, so the method terminates even on degenerate dictionaries.
pub fn run_simplex(mut model: LpModel, stage: Stage, max_pivots: usize) -> Result<LpModel, SolverError> {
    let mut pivots = 0;
    loop {
        let Some(entering) = entering_variable(&model) else {
            debug!(%stage, pivots, objective = %model.objective.value(), "optimal");
            return Ok(model);
        };
        let Some(row) = leaving_row(&model, &entering) else {
            debug!(%stage, %entering, "no row limits the entering variable");
            return Err(SolverError::Unbounded);
        };
        if pivots == max_pivots {
            return Err(SolverError::PivotLimitExceeded(max_pivots));
        }
        pivot(&mut model, row, &entering, stage);
        pivots += 1;
    }
}

/// Smallest-index variable with a positive objective coefficient.
pub(crate) fn entering_variable(model: &LpModel) -> Option<Variable> {
    model
        .objective
        .expression()
        .linear_terms()
        .filter(|(c, _)| c.is_positive())
        .map(|(_, v)| v)
        .min_by_key(|v| v.index)
        .cloned()
}

/// Ratio test: among rows where `entering` has a negative coefficient, the
/// one with the smallest `constant / |coefficient|`, ties to the smallest
/// basic index. `None` means nothing bounds `entering`.
pub(crate) fn leaving_row(model: &LpModel, entering: &Variable) -> Option<usize> {
    model
        .constraints
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let coefficient = row.right.coefficient(entering)?;
            if !coefficient.is_negative() {
                return None;
            }
            let basic = row.basic_variable()?;
            let ratio: Rational = row.right.constant() / coefficient.abs();
            Some((i, ratio, basic.index))
        })
        .min_by(|a, b| a.1.cmp(&b.1).then(a.2.cmp(&b.2)))
        .map(|(i, _, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::as_dictionary;
    use crate::linear::{Equation, Expression, Relation, Term};
    use crate::model::{Aim, Objective};

    fn x(index: u32) -> Variable {
        Variable::new("x", index)
    }

    fn r(n: i64) -> Rational {
        Rational::from(n)
    }

    fn dictionary(objective: &[i64], rows: &[(&[i64], i64)]) -> LpModel {
        let variables: Vec<Variable> = (1..=objective.len() as u32).map(x).collect();
        let objective = Objective::from_expression(
            Aim::Maximize,
            Variable::new("z", 0),
            objective.iter().zip(&variables).map(|(&c, v)| Term::linear(c, v.clone())).collect(),
        );
        let mut model = LpModel::new(variables.clone(), objective).unwrap();
        for (coefficients, rhs) in rows {
            let left = coefficients.iter().zip(&variables).map(|(&c, v)| Term::linear(c, v.clone())).collect();
            model
                .add_constraint(Equation::new(left, Relation::LessOrEqual, Expression::constant_only(r(*rhs))))
                .unwrap();
        }
        for v in &variables {
            model.add_lower_bound(v, Rational::from(0)).unwrap();
        }
        as_dictionary(model)
    }

    #[test]
    fn test_reaches_optimum() {
        // max 3x1 + 4x2, 3x1 + x2 <= 80, -3x1 + x2 <= 0
        let model = run_simplex(dictionary(&[3, 4], &[(&[3, 1], 80), (&[-3, 1], 0)]), Stage::PhaseTwo, 100).unwrap();
        assert_eq!(model.objective().value(), r(200));
        assert_eq!(model.value_of(&x(1)), Rational::new(40, 3).unwrap());
        assert_eq!(model.value_of(&x(2)), r(40));
        assert!(model.objective().expression().linear_terms().all(|(c, _)| !c.is_positive()));
        // Bland's rule: x1 enters first
        assert_eq!(model.steps()[0].entering, x(1));
        assert_eq!(model.steps().len(), 2);
    }

    #[test]
    fn test_detects_unbounded() {
        // max x1 + x2, x1 - x2 <= 1
        let result = run_simplex(dictionary(&[1, 1], &[(&[1, -1], 1)]), Stage::PhaseTwo, 100);
        assert_eq!(result.unwrap_err(), SolverError::Unbounded);
    }

    #[test]
    fn test_ratio_tie_goes_to_smallest_basic_index() {
        // both rows allow x1 up to 2; the row of x3 must leave
        let model = dictionary(&[1, 0], &[(&[1, 0], 2), (&[2, 1], 4)]);
        let entering = entering_variable(&model).unwrap();
        assert_eq!(entering, x(1));
        assert_eq!(leaving_row(&model, &entering), Some(0));
    }

    #[test]
    fn test_pivot_limit() {
        let model = dictionary(&[3, 4], &[(&[3, 1], 80), (&[-3, 1], 0)]);
        assert_eq!(
            run_simplex(model, Stage::PhaseTwo, 1).unwrap_err(),
            SolverError::PivotLimitExceeded(1)
        );
    }

    #[test]
    fn test_degenerate_dictionary_terminates() {
        // a classic cycling example under the largest-coefficient rule
        let model = dictionary(
            &[10, -57, -9, -24],
            &[(&[1, -11, -5, 18], 0), (&[1, -3, -1, 2], 0), (&[1, 0, 0, 0], 1)],
        );
        let model = run_simplex(model, Stage::PhaseTwo, 100).unwrap();
        assert_eq!(model.objective().value(), r(1));
    }
}
