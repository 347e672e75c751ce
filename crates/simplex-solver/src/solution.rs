use std::fmt;

use crate::linear::{Expression, Variable};
use crate::model::{LpModel, PivotStep};
use crate::rational::Rational;

/// The optimal vertex of a solved model
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Optimal objective value, in terms of the objective as given
    pub objective_function_value: Rational,
    /// Value of every decision variable, in declaration order
    pub decision_variables_and_values: Vec<(Variable, Rational)>,
    /// Every pivot performed while solving
    pub steps: Vec<PivotStep>,
}

impl Solution {
    /// Read the solution out of an optimal dictionary.
    ///
    /// `objective` is the objective expression before any rewriting; it is
    /// evaluated at the extracted values, so aliasing and negation for
    /// minimization do not leak into the reported value.
    pub fn extract(model: &LpModel, objective: &Expression) -> Self {
        let decision_variables_and_values: Vec<(Variable, Rational)> = model
            .decision_variables()
            .iter()
            .map(|v| (v.clone(), model.value_of(v)))
            .collect();
        let objective_function_value = objective.evaluate(|v| {
            decision_variables_and_values
                .iter()
                .find(|(d, _)| d == v)
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| model.value_of(v))
        });
        Self {
            objective_function_value,
            decision_variables_and_values,
            steps: model.steps().to_vec(),
        }
    }

    pub fn value_of(&self, variable: &Variable) -> Option<&Rational> {
        self.decision_variables_and_values
            .iter()
            .find(|(v, _)| v == variable)
            .map(|(_, value)| value)
    }

    /// All decision variables take integral values.
    pub fn is_integral(&self) -> bool {
        self.decision_variables_and_values.iter().all(|(_, value)| value.is_integer())
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Objective value: {}", self.objective_function_value)?;
        for (variable, value) in &self.decision_variables_and_values {
            writeln!(f, "{} = {}", variable, value)?;
        }
        Ok(())
    }
}
