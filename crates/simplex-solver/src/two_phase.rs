//! Two-phase simplex driver.
//!
//! The model moves through the stages as owned state: each stage consumes
//! the model and hands the rewritten one to the next.

use num_traits::{One, Zero};
use tracing::{debug, info};

use crate::dictionary::{as_dictionary, back_to_standard, is_primal_feasible, pivot};
use crate::error::SolverError;
use crate::linear::{Expression, Relation, Term, Variable};
use crate::model::{Aim, LpModel, Objective, Stage};
use crate::primal::run_simplex;
use crate::rational::Rational;
use crate::standard::standardize;

enum State {
    Standardizing(LpModel),
    Dictionary(LpModel),
    PhaseOneCheck(LpModel),
    PhaseOneSolve(LpModel),
    PhaseTwoSetup(LpModel),
    PhaseTwoSolve(LpModel),
}

/// Solve `model` to an optimal dictionary, or report it infeasible or unbounded.
pub fn two_phase_simplex(model: LpModel, max_pivots: usize) -> Result<LpModel, SolverError> {
    run(State::Standardizing(model), max_pivots)
}

/// Continue from a dictionary that is already built, running phase one only
/// if some row constant is negative.
pub(crate) fn two_phase_from_dictionary(model: LpModel, max_pivots: usize) -> Result<LpModel, SolverError> {
    run(State::PhaseOneCheck(model), max_pivots)
}

fn run(mut state: State, max_pivots: usize) -> Result<LpModel, SolverError> {
    loop {
        state = match state {
            State::Standardizing(model) => State::Dictionary(standardize(model)),
            State::Dictionary(model) => State::PhaseOneCheck(as_dictionary(model)),
            State::PhaseOneCheck(model) => {
                if is_primal_feasible(&model) {
                    State::PhaseTwoSolve(model)
                } else {
                    info!("initial dictionary is infeasible, running phase one");
                    State::PhaseOneSolve(to_first_phase(back_to_standard(model)))
                }
            }
            State::PhaseOneSolve(model) => {
                let model = run_simplex(model, Stage::PhaseOne, max_pivots)?;
                let optimum = model.objective.value();
                if !optimum.is_zero() {
                    info!(auxiliary_optimum = %optimum, "phase one optimum is not zero, problem is infeasible");
                    return Err(SolverError::Infeasible);
                }
                State::PhaseTwoSetup(model)
            }
            State::PhaseTwoSetup(model) => State::PhaseTwoSolve(to_second_phase(model)),
            State::PhaseTwoSolve(model) => return run_simplex(model, Stage::PhaseTwo, max_pivots),
        };
    }
}

/// The phase-one auxiliary variable, `x0` for decision variables named `x`.
fn auxiliary_variable(model: &LpModel) -> Variable {
    Variable::new(model.variable_name(), 0)
}

/// Build the auxiliary problem on a standard-form model.
///
/// Every constraint `Σ a·x <= b` gets `-x0` on its left and a fresh slack,
/// giving rows `s = b - Σ a·x + x0`. The row with the most negative `b` is
/// solved for `x0` and the result substituted into every other row, which
/// makes all constants non-negative. The objective becomes `max w = -x0`;
/// the real one is saved aside.
pub fn to_first_phase(mut model: LpModel) -> LpModel {
    let auxiliary = auxiliary_variable(&model);
    model.register(auxiliary.clone());

    let name = model.variable_name().to_string();
    for i in 0..model.constraints.len() {
        let slack = model.fresh_variable(&name);
        let constraint = &mut model.constraints[i];
        constraint.add_to_left([Term::linear(-Rational::one(), auxiliary.clone())]);
        constraint.add_to_left([Term::linear(Rational::one(), slack.clone())]);
        constraint.relation = Relation::Equal;
        constraint.solve_for(&slack);
    }

    let function = Variable::new(model.first_phase_function_name.clone(), 0);
    let auxiliary_objective = Objective::from_expression(
        Aim::Maximize,
        function,
        Expression::from(Term::linear(-Rational::one(), auxiliary.clone())),
    );
    model.saved_objective = Some(std::mem::replace(&mut model.objective, auxiliary_objective));

    let most_negative = model
        .constraints
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.right.constant().cmp(&b.1.right.constant()))
        .map(|(i, _)| i);
    if let Some(row) = most_negative {
        let leaving = model.constraints[row].basic_variable().cloned();
        debug!(row, ?leaving, "solving for the auxiliary variable");
        model.constraints[row].solve_for(&auxiliary);
        let replacement = model.constraints[row].right.clone();
        for (i, constraint) in model.constraints.iter_mut().enumerate() {
            if i != row {
                constraint.right.substitute(&auxiliary, &replacement);
            }
        }
        model.objective.expression_mut().substitute(&auxiliary, &replacement);
    }
    model
}

/// Turn an optimal phase-one dictionary (auxiliary optimum 0) back into a
/// dictionary of the real problem.
///
/// If `x0` is still basic its row reads `x0 = 0 + ...`: the row is dropped
/// when nothing else is in it, otherwise `x0` is pivoted out in exchange for
/// the smallest-index variable of the row. Remaining `x0` columns are deleted
/// and the saved objective is restored with every basic variable replaced by
/// its row.
pub fn to_second_phase(mut model: LpModel) -> LpModel {
    let auxiliary = auxiliary_variable(&model);

    if let Some(row) = model.row_of(&auxiliary) {
        let entering = model.constraints[row]
            .right
            .variables()
            .min_by_key(|v| v.index)
            .cloned();
        match entering {
            Some(entering) => pivot(&mut model, row, &entering, Stage::PhaseTwoSetup),
            None => {
                model.constraints.remove(row);
            }
        }
    }

    for constraint in &mut model.constraints {
        constraint.right.remove(&auxiliary);
    }
    model.unregister(&auxiliary);

    if let Some(objective) = model.saved_objective.take() {
        model.objective = objective;
    }
    for constraint in &model.constraints {
        if let Some(basic) = constraint.basic_variable() {
            model.objective.expression_mut().substitute(basic, &constraint.right);
        }
    }
    info!(objective = %model.objective.function(), "phase two objective restored");
    model
}
