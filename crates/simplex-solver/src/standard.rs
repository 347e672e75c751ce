//! Standard form: only `<=` constraints, every variable bounded below by 0,
//! and a maximization aim.

use num_traits::{One, Zero};
use tracing::debug;

use crate::linear::{Equation, Expression, Relation, Term, Variable};
use crate::model::LpModel;
use crate::rational::Rational;

pub fn standardize(mut model: LpModel) -> LpModel {
    split_equalities(&mut model);
    replace_shifted_and_free_variables(&mut model);
    flip_greater_or_equal(&mut model);
    model.objective.negate_to_maximize();
    model
}

/// `a = b` becomes the pair `a <= b`, `a >= b`.
fn split_equalities(model: &mut LpModel) {
    let mut constraints = Vec::with_capacity(model.constraints.len());
    for constraint in model.constraints.drain(..) {
        if constraint.relation == Relation::Equal {
            let mut lower = constraint.clone();
            lower.relation = Relation::LessOrEqual;
            let mut upper = constraint;
            upper.relation = Relation::GreaterOrEqual;
            constraints.push(lower);
            constraints.push(upper);
        } else {
            constraints.push(constraint);
        }
    }
    model.constraints = constraints;
}

/// A decision variable with lower bound `b != 0` is replaced by `v' + b`; one
/// with no lower bound at all by `v' - v''`. The new variables are bounded
/// below by 0 and the substitution is kept as an alias.
fn replace_shifted_and_free_variables(model: &mut LpModel) {
    for variable in model.decision_variables.clone() {
        let replacement = match model.lower_bound_of(&variable) {
            Some(bound) if bound.is_zero() => continue,
            Some(bound) => {
                model.unregister_range(&variable);
                let shifted = model.fresh_variable(&variable.name);
                Expression::from_terms([Term::linear(Rational::one(), shifted), Term::Constant(bound)])
            }
            None => {
                let positive = model.fresh_variable(&variable.name);
                let negative = model.fresh_variable(&variable.name);
                Expression::from_terms([
                    Term::linear(Rational::one(), positive),
                    Term::linear(-Rational::one(), negative),
                ])
            }
        };
        debug!(%variable, replacement = %replacement, "replacing variable for standard form");
        substitute_everywhere(model, &variable, &replacement);
        model.standard_form_aliases.push(Equation::new(
            Expression::from(Term::linear(Rational::one(), variable)),
            Relation::Equal,
            replacement,
        ));
    }
}

fn substitute_everywhere(model: &mut LpModel, variable: &Variable, replacement: &Expression) {
    for constraint in &mut model.constraints {
        constraint.substitute(variable, replacement);
        constraint.normalize();
    }
    model.objective.expression_mut().substitute(variable, replacement);
}

fn flip_greater_or_equal(model: &mut LpModel) {
    for constraint in &mut model.constraints {
        if constraint.relation == Relation::GreaterOrEqual {
            constraint.multiply(&-Rational::one());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Aim, Objective};

    fn x(index: u32) -> Variable {
        Variable::new("x", index)
    }

    fn r(n: i64) -> Rational {
        Rational::from(n)
    }

    fn model(aim: Aim, bounds: &[Option<i64>]) -> LpModel {
        let variables: Vec<Variable> = (1..=bounds.len() as u32).map(x).collect();
        let objective = Objective::from_expression(
            aim,
            Variable::new("z", 0),
            variables.iter().map(|v| Term::linear(2, v.clone())).collect(),
        );
        let mut model = LpModel::new(variables.clone(), objective).unwrap();
        for (v, bound) in variables.iter().zip(bounds) {
            if let Some(b) = bound {
                model.add_lower_bound(v, r(*b)).unwrap();
            }
        }
        model
    }

    fn constraint(coefficients: &[i64], relation: Relation, rhs: i64) -> Equation {
        Equation::new(
            coefficients
                .iter()
                .enumerate()
                .map(|(i, &c)| Term::linear(c, x(i as u32 + 1)))
                .collect(),
            relation,
            Expression::constant_only(r(rhs)),
        )
    }

    #[test]
    fn test_every_constraint_becomes_less_or_equal() {
        let mut m = model(Aim::Minimize, &[Some(0), Some(0)]);
        m.add_constraint(constraint(&[1, 1], Relation::GreaterOrEqual, 4)).unwrap();
        m.add_constraint(constraint(&[1, -1], Relation::Equal, 1)).unwrap();
        m.add_constraint(constraint(&[1, 0], Relation::LessOrEqual, 3)).unwrap();

        let m = standardize(m);
        assert_eq!(m.constraints().len(), 4);
        assert!(m.constraints().iter().all(|c| c.relation == Relation::LessOrEqual));
        assert_eq!(m.constraints()[0].to_string(), "-1x1 -1x2 <= -4");
        assert_eq!(m.constraints()[1].to_string(), "+1x1 -1x2 <= +1");
        assert_eq!(m.constraints()[2].to_string(), "-1x1 +1x2 <= -1");
        assert_eq!(m.objective().aim(), Aim::Maximize);
        assert_eq!(m.objective().function().to_string(), "+1z0 = -2x1 -2x2");
        assert!(m.standard_form_aliases().is_empty());
    }

    #[test]
    fn test_shifted_variable_gets_alias() {
        // x1 >= 3, x2 >= 0
        let mut m = model(Aim::Maximize, &[Some(3), Some(0)]);
        m.add_constraint(constraint(&[2, 1], Relation::LessOrEqual, 10)).unwrap();

        let m = standardize(m);
        assert_eq!(m.standard_form_aliases()[0].to_string(), "+1x1 = +3 +1x3");
        // 2(x3 + 3) + x2 <= 10
        assert_eq!(m.constraints()[0].to_string(), "+1x2 +2x3 <= +4");
        assert_eq!(m.objective().function().to_string(), "+1z0 = +6 +2x2 +2x3");
        assert_eq!(m.lower_bound_of(&x(1)), None);
        assert_eq!(m.lower_bound_of(&x(3)), Some(Rational::zero()));
        assert!(m
            .interpretation_ranges()
            .iter()
            .all(|range| range.right.constant().is_zero()));
    }

    #[test]
    fn test_free_variable_is_split() {
        let mut m = model(Aim::Maximize, &[None, Some(0)]);
        m.add_constraint(constraint(&[1, 1], Relation::LessOrEqual, 5)).unwrap();

        let m = standardize(m);
        assert_eq!(m.standard_form_aliases()[0].to_string(), "+1x1 = +1x3 -1x4");
        assert_eq!(m.constraints()[0].to_string(), "+1x2 +1x3 -1x4 <= +5");
        assert_eq!(m.all_variables().len(), 4);
        assert_eq!(m.lower_bound_of(&x(3)), Some(Rational::zero()));
        assert_eq!(m.lower_bound_of(&x(4)), Some(Rational::zero()));
    }

    #[test]
    fn test_replacement_indices_grow() {
        let m = standardize(model(Aim::Maximize, &[None, Some(-1), None]));
        let indices: Vec<u32> = m.all_variables().iter().map(|v| v.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
