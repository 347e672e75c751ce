//! Dictionary form: every constraint reads `basic = constant + Σ coefficient·non-basic`.

use num_traits::One;
use tracing::{debug, trace};

use crate::linear::{Equation, Expression, Relation, Term, Variable};
use crate::model::{LpModel, PivotStep, Stage};
use crate::rational::Rational;

/// Give every standard-form constraint `Σ a·x <= b` its own slack `s` and
/// rewrite it as the row `s = b - Σ a·x`.
pub fn as_dictionary(mut model: LpModel) -> LpModel {
    let name = model.variable_name().to_string();
    for i in 0..model.constraints.len() {
        let slack = model.fresh_variable(&name);
        into_dictionary_row(&mut model.constraints[i], slack);
    }
    model
}

/// `left <= right` becomes `slack = right - left`.
pub(crate) fn into_dictionary_row(constraint: &mut Equation, slack: Variable) {
    let moved: Vec<Term> = constraint
        .left
        .scaled(&-Rational::one())
        .terms()
        .to_vec();
    constraint.add(moved);
    constraint.add_to_left([Term::linear(Rational::one(), slack)]);
    constraint.relation = Relation::Equal;
}

/// Undo [`as_dictionary`]: each row `s = b + Σ c·x` turns back into
/// `Σ -c·x <= b`, and the slack disappears from the model.
pub fn back_to_standard(mut model: LpModel) -> LpModel {
    let mut slacks = Vec::new();
    for constraint in &mut model.constraints {
        let Some(slack) = constraint.basic_variable().cloned() else {
            continue;
        };
        let mut left = constraint.right.clone();
        let constant = left.remove_constant();
        left.scale(&-Rational::one());
        *constraint = Equation::new(left, Relation::LessOrEqual, Expression::constant_only(constant));
        slacks.push(slack);
    }
    for slack in &slacks {
        model.unregister(slack);
    }
    model
}

/// A dictionary is primal feasible when no row constant is negative.
pub fn is_primal_feasible(model: &LpModel) -> bool {
    model.constraints.iter().all(|c| !c.right.constant().is_negative())
}

/// A dictionary is dual feasible when no objective coefficient is positive.
pub fn is_dual_feasible(model: &LpModel) -> bool {
    model.objective.expression().linear_terms().all(|(c, _)| !c.is_positive())
}

/// Exchange the basic variable of `row` for `entering`: solve the row for
/// `entering`, then substitute the result into every other row and into
/// the objective.
pub(crate) fn pivot(model: &mut LpModel, row: usize, entering: &Variable, stage: Stage) {
    let leaving = model.constraints[row]
        .basic_variable()
        .cloned()
        .unwrap_or_else(|| entering.clone());
    let solved = model.constraints[row].solve_for(entering);
    debug_assert!(solved, "pivot on {} which is absent from row {}", entering, row);

    let replacement = model.constraints[row].right.clone();
    for (i, constraint) in model.constraints.iter_mut().enumerate() {
        if i != row {
            constraint.right.substitute(entering, &replacement);
        }
    }
    model.objective.expression_mut().substitute(entering, &replacement);

    let objective_value = model.objective.value();
    debug!(%stage, %entering, %leaving, objective = %objective_value, "pivot");
    trace!("dictionary after pivot:\n{}", model);
    model.steps.push(PivotStep {
        stage,
        entering: entering.clone(),
        leaving,
        objective_value,
    });
}
