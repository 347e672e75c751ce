use simplex_solver::{
    Aim, Equation, Expression, LpModel, Objective, Rational, Relation, Solution, Solver, SolverError, Term, Variable,
    solve, solve_integer,
};

fn x(index: u32) -> Variable {
    Variable::new("x", index)
}

fn r(n: i64) -> Rational {
    Rational::from(n)
}

fn linear(coefficients: &[i64]) -> Expression {
    coefficients
        .iter()
        .enumerate()
        .map(|(i, &c)| Term::linear(c, x(i as u32 + 1)))
        .collect()
}

/// Build a model the way a flat task description reads: one coefficient
/// row per constraint and an optional lower bound per variable.
fn model(aim: Aim, objective: &[i64], rows: &[(&[i64], Relation, i64)], bounds: &[Option<i64>]) -> LpModel {
    let variables: Vec<Variable> = (1..=objective.len() as u32).map(x).collect();
    let objective = Objective::from_expression(aim, Variable::new("z", 0), linear(objective));
    let mut model = LpModel::new(variables.clone(), objective).unwrap();
    for (coefficients, relation, rhs) in rows {
        model
            .add_constraint(Equation::new(linear(coefficients), *relation, Expression::constant_only(r(*rhs))))
            .unwrap();
    }
    for (v, bound) in variables.iter().zip(bounds) {
        if let Some(b) = bound {
            model.add_lower_bound(v, r(*b)).unwrap();
        }
    }
    model
}

fn value(solution: &Solution, index: u32) -> Rational {
    solution.value_of(&x(index)).cloned().unwrap()
}

fn lhs(coefficients: &[i64], values: &[Rational]) -> Rational {
    coefficients.iter().zip(values).map(|(&c, v)| r(c) * v).sum()
}

#[test]
fn test_maximization_vertex() {
    // max 3x1 + 4x2, 3x1 + x2 <= 80, 3x1 - x2 >= 0
    let rows: &[(&[i64], Relation, i64)] = &[
        (&[3, 1], Relation::LessOrEqual, 80),
        (&[3, -1], Relation::GreaterOrEqual, 0),
    ];
    let solution = solve(model(Aim::Maximize, &[3, 4], rows, &[Some(0), Some(0)])).unwrap();

    let values = [value(&solution, 1), value(&solution, 2)];
    assert_eq!(values[0], Rational::new(40, 3).unwrap());
    assert_eq!(values[1], r(40));
    assert_eq!(solution.objective_function_value, r(200));

    // both constraints are binding at the optimum
    assert_eq!(lhs(&[3, 1], &values), r(80));
    assert_eq!(lhs(&[3, -1], &values), r(0));

    // the neighbouring vertices (0, 0) and (80/3, 0) are feasible and worse
    for vertex in [[r(0), r(0)], [Rational::new(80, 3).unwrap(), r(0)]] {
        assert!(lhs(&[3, 1], &vertex) <= r(80));
        assert!(lhs(&[3, -1], &vertex) >= r(0));
        assert!(solution.objective_function_value > lhs(&[3, 4], &vertex));
    }
}

#[test]
fn test_minimization_needs_phase_one() {
    // min 2x1 + 3x2, x1 + x2 >= 4, x1 <= 3, x2 <= 3
    let rows: &[(&[i64], Relation, i64)] = &[
        (&[1, 1], Relation::GreaterOrEqual, 4),
        (&[1, 0], Relation::LessOrEqual, 3),
        (&[0, 1], Relation::LessOrEqual, 3),
    ];
    let solution = solve(model(Aim::Minimize, &[2, 3], rows, &[Some(0), Some(0)])).unwrap();
    assert_eq!(value(&solution, 1), r(3));
    assert_eq!(value(&solution, 2), r(1));
    assert_eq!(solution.objective_function_value, r(9));
    assert!(!solution.steps.is_empty());
}

#[test]
fn test_infeasible_bound() {
    // x1 <= -1 with x1 >= 0
    let rows: &[(&[i64], Relation, i64)] = &[(&[1], Relation::LessOrEqual, -1)];
    let result = solve(model(Aim::Maximize, &[1], rows, &[Some(0)]));
    assert_eq!(result.unwrap_err(), SolverError::Infeasible);
}

#[test]
fn test_infeasible_constraints() {
    // x1 free, x1 <= -1 and x1 >= 0 as constraints
    let rows: &[(&[i64], Relation, i64)] = &[
        (&[1], Relation::LessOrEqual, -1),
        (&[1], Relation::GreaterOrEqual, 0),
    ];
    let result = solve(model(Aim::Minimize, &[1], rows, &[None]));
    assert_eq!(result.unwrap_err(), SolverError::Infeasible);
}

#[test]
fn test_unbounded() {
    // max x1 with only x1 >= 0
    let result = solve(model(Aim::Maximize, &[1], &[], &[Some(0)]));
    assert_eq!(result.unwrap_err(), SolverError::Unbounded);
}

#[test]
fn test_equality_constraint() {
    // max x1 + x2, x1 + 2x2 = 4, x1 <= 2
    let rows: &[(&[i64], Relation, i64)] = &[
        (&[1, 2], Relation::Equal, 4),
        (&[1, 0], Relation::LessOrEqual, 2),
    ];
    let solution = solve(model(Aim::Maximize, &[1, 1], rows, &[Some(0), Some(0)])).unwrap();
    assert_eq!(value(&solution, 1), r(2));
    assert_eq!(value(&solution, 2), r(1));
    assert_eq!(solution.objective_function_value, r(3));
}

#[test]
fn test_shifted_lower_bounds() {
    // min 2x1 + x2, x1 + x2 >= 1, x1 >= 2, x2 >= -3
    let rows: &[(&[i64], Relation, i64)] = &[(&[1, 1], Relation::GreaterOrEqual, 1)];
    let solution = solve(model(Aim::Minimize, &[2, 1], rows, &[Some(2), Some(-3)])).unwrap();
    assert_eq!(value(&solution, 1), r(2));
    assert_eq!(value(&solution, 2), r(-1));
    assert_eq!(solution.objective_function_value, r(3));
}

#[test]
fn test_free_variable() {
    // min x1, x1 >= -5, x1 unbounded below
    let rows: &[(&[i64], Relation, i64)] = &[(&[1], Relation::GreaterOrEqual, -5)];
    let solution = solve(model(Aim::Minimize, &[1], rows, &[None])).unwrap();
    assert_eq!(value(&solution, 1), r(-5));
    assert_eq!(solution.objective_function_value, r(-5));
    assert_eq!(solution.decision_variables_and_values.len(), 1);
}

#[test]
fn test_integer_program() {
    // max x2, 3x1 + 2x2 <= 6, -3x1 + 2x2 <= 0; the relaxation peaks at (1, 3/2)
    let rows: &[(&[i64], Relation, i64)] = &[
        (&[3, 2], Relation::LessOrEqual, 6),
        (&[-3, 2], Relation::LessOrEqual, 0),
    ];
    let relaxed = solve(model(Aim::Maximize, &[0, 1], rows, &[Some(0), Some(0)])).unwrap();
    assert_eq!(relaxed.objective_function_value, Rational::new(3, 2).unwrap());
    assert!(!relaxed.is_integral());

    let solution = solve_integer(model(Aim::Maximize, &[0, 1], rows, &[Some(0), Some(0)])).unwrap();
    assert!(solution.is_integral());
    assert_eq!(value(&solution, 1), r(1));
    assert_eq!(value(&solution, 2), r(1));
    assert_eq!(solution.objective_function_value, r(1));
}

#[test]
fn test_integer_program_with_redundant_direction() {
    // max x1 + x2, 2x1 + 2x2 <= 3
    let rows: &[(&[i64], Relation, i64)] = &[(&[2, 2], Relation::LessOrEqual, 3)];
    let solution = solve_integer(model(Aim::Maximize, &[1, 1], rows, &[Some(0), Some(0)])).unwrap();
    assert!(solution.is_integral());
    assert_eq!(solution.objective_function_value, r(1));
}

#[test]
fn test_cut_limit_is_reported() {
    let rows: &[(&[i64], Relation, i64)] = &[
        (&[3, 2], Relation::LessOrEqual, 6),
        (&[-3, 2], Relation::LessOrEqual, 0),
    ];
    let result = Solver::new()
        .with_max_cuts(1)
        .solve_integer(model(Aim::Maximize, &[0, 1], rows, &[Some(0), Some(0)]));
    assert_eq!(result.unwrap_err(), SolverError::CutLimitExceeded(1));
}

#[test]
fn test_strict_relation_is_rejected() {
    let objective = Objective::from_expression(Aim::Maximize, Variable::new("z", 0), linear(&[1]));
    let mut model = LpModel::new(vec![x(1)], objective).unwrap();
    let strict = Equation::new(linear(&[1]), Relation::Less, Expression::constant_only(r(3)));
    assert!(model.add_constraint(strict).is_err());
}
