use serde::{Deserialize, Serialize};
use simplex_solver::{Aim, Equation, Expression, LpModel, Objective, Rational, Relation, Term, Variable};

use crate::error::TaskError;

/// A linear program in flat numeric form: one coefficient row per
/// constraint and one optional lower bound per decision variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LpTaskDto {
    /// Optional label, shown by the CLI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub decision_variable_name: char,
    pub function_variable_name: char,
    pub first_phase_function_variable_name: char,
    pub number_of_decision_variables: usize,
    pub number_of_constraints: usize,
    pub constraints_left_side_matrix: Vec<Vec<i64>>,
    pub constraint_connections_vector: Vec<Relation>,
    pub constraints_right_vector: Vec<i64>,
    /// Lower bound per variable, `null` for a variable unbounded below
    pub interpretation_ranges: Vec<Option<i64>>,
    pub maximization: bool,
    pub objective_coefficient_vector: Vec<i64>,
    /// Solve with Gomory cuts so every decision variable is integral
    #[serde(default)]
    pub integer_programming: bool,
}

impl LpTaskDto {
    /// Check names, counts and shapes. The first offending field is reported.
    pub fn validate(&self) -> Result<(), TaskError> {
        let names = [
            ("DecisionVariableName", self.decision_variable_name),
            ("FunctionVariableName", self.function_variable_name),
            ("FirstPhaseFunctionVariableName", self.first_phase_function_variable_name),
        ];
        for (i, &(field, name)) in names.iter().enumerate() {
            let clashes = names.iter().enumerate().any(|(j, &(_, other))| i != j && other == name);
            if !name.is_ascii_lowercase() || clashes {
                return Err(TaskError::wrong_format(field));
            }
        }

        let n = self.number_of_decision_variables;
        let m = self.number_of_constraints;
        if n == 0 {
            return Err(TaskError::wrong_format("NumberOfDecisionVariables"));
        }
        if m == 0 {
            return Err(TaskError::wrong_format("NumberOfConstraints"));
        }
        if self.constraints_left_side_matrix.len() != m
            || self.constraints_left_side_matrix.iter().any(|row| row.len() != n)
        {
            return Err(TaskError::wrong_format("ConstraintsLeftSideMatrix"));
        }
        if self.constraint_connections_vector.len() != m
            || self.constraint_connections_vector.iter().any(|r| r.is_strict())
        {
            return Err(TaskError::wrong_format("ConstraintConnectionsVector"));
        }
        if self.constraints_right_vector.len() != m {
            return Err(TaskError::wrong_format("ConstraintsRightVector"));
        }
        if self.interpretation_ranges.len() != n {
            return Err(TaskError::wrong_format("InterpretationRanges"));
        }
        if self.objective_coefficient_vector.len() != n {
            return Err(TaskError::wrong_format("ObjectiveCoefficientVector"));
        }
        Ok(())
    }

    /// Validate, then build the model: variables `x1..xn`, objective
    /// variable `z0`, one constraint per matrix row and one `>=` range per
    /// non-null bound.
    pub fn to_model(&self) -> Result<LpModel, TaskError> {
        self.validate()?;

        let name = self.decision_variable_name.to_string();
        let variables: Vec<Variable> = (1..=self.number_of_decision_variables as u32)
            .map(|i| Variable::new(name.clone(), i))
            .collect();
        let linear = |coefficients: &[i64]| -> Expression {
            coefficients
                .iter()
                .zip(&variables)
                .map(|(&c, v)| Term::linear(c, v.clone()))
                .collect()
        };

        let aim = if self.maximization { Aim::Maximize } else { Aim::Minimize };
        let objective = Objective::from_expression(
            aim,
            Variable::new(self.function_variable_name.to_string(), 0),
            linear(&self.objective_coefficient_vector),
        );
        let mut model = LpModel::new(variables.clone(), objective)?
            .with_first_phase_function_name(self.first_phase_function_variable_name.to_string())?;

        let rows = self
            .constraints_left_side_matrix
            .iter()
            .zip(&self.constraint_connections_vector)
            .zip(&self.constraints_right_vector);
        for ((coefficients, relation), rhs) in rows {
            let right = Expression::constant_only(Rational::from(*rhs));
            model.add_constraint(Equation::new(linear(coefficients), *relation, right))?;
        }
        for (variable, bound) in variables.iter().zip(&self.interpretation_ranges) {
            if let Some(bound) = bound {
                model.add_lower_bound(variable, Rational::from(*bound))?;
            }
        }
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> LpTaskDto {
        LpTaskDto {
            name: None,
            decision_variable_name: 'x',
            function_variable_name: 'z',
            first_phase_function_variable_name: 'w',
            number_of_decision_variables: 2,
            number_of_constraints: 2,
            constraints_left_side_matrix: vec![vec![3, 1], vec![3, -1]],
            constraint_connections_vector: vec![Relation::LessOrEqual, Relation::GreaterOrEqual],
            constraints_right_vector: vec![80, 0],
            interpretation_ranges: vec![Some(0), None],
            maximization: true,
            objective_coefficient_vector: vec![3, 4],
            integer_programming: false,
        }
    }

    fn wrong_field(dto: &LpTaskDto) -> Option<&'static str> {
        match dto.validate() {
            Err(TaskError::WrongFormat { field }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn test_valid_task() {
        assert_eq!(task().validate(), Ok(()));
    }

    #[test]
    fn test_variable_names_must_be_distinct_lowercase_letters() {
        let mut dto = task();
        dto.function_variable_name = 'x';
        assert_eq!(wrong_field(&dto), Some("DecisionVariableName"));

        let mut dto = task();
        dto.first_phase_function_variable_name = 'W';
        assert_eq!(wrong_field(&dto), Some("FirstPhaseFunctionVariableName"));
    }

    #[test]
    fn test_shapes_are_checked() {
        let mut dto = task();
        dto.number_of_constraints = 0;
        assert_eq!(wrong_field(&dto), Some("NumberOfConstraints"));

        let mut dto = task();
        dto.constraints_left_side_matrix[1].push(7);
        assert_eq!(wrong_field(&dto), Some("ConstraintsLeftSideMatrix"));

        let mut dto = task();
        dto.constraint_connections_vector[0] = Relation::Less;
        assert_eq!(wrong_field(&dto), Some("ConstraintConnectionsVector"));

        let mut dto = task();
        dto.constraints_right_vector.pop();
        assert_eq!(wrong_field(&dto), Some("ConstraintsRightVector"));

        let mut dto = task();
        dto.interpretation_ranges.push(None);
        assert_eq!(wrong_field(&dto), Some("InterpretationRanges"));

        let mut dto = task();
        dto.objective_coefficient_vector = vec![1];
        assert_eq!(wrong_field(&dto), Some("ObjectiveCoefficientVector"));
    }

    #[test]
    fn test_wrong_format_message() {
        let mut dto = task();
        dto.number_of_decision_variables = 0;
        assert_eq!(
            dto.validate().unwrap_err().to_string(),
            "The provided linear programming model has a wrong format. Check the following field: NumberOfDecisionVariables."
        );
    }

    #[test]
    fn test_to_model() {
        let model = task().to_model().unwrap();
        let names: Vec<String> = model.decision_variables().iter().map(|v| v.to_string()).collect();
        assert_eq!(names, vec!["x1", "x2"]);
        assert_eq!(model.objective().function().to_string(), "+1z0 = +3x1 +4x2");
        assert_eq!(model.constraints()[0].to_string(), "+3x1 +1x2 <= +80");
        assert_eq!(model.constraints()[1].to_string(), "+3x1 -1x2 >= 0");
        assert_eq!(model.lower_bound_of(&Variable::new("x", 1)), Some(Rational::from(0)));
        assert_eq!(model.lower_bound_of(&Variable::new("x", 2)), None);
    }
}
