use std::fmt;

use num_traits::{One, Zero};

use crate::error::ModelError;
use crate::linear::{Equation, Expression, Relation, Term, Variable};
use crate::rational::Rational;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aim {
    Minimize,
    Maximize,
}

/// `aim z = expression`, where the left side is exactly `1 * z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Objective {
    aim: Aim,
    function: Equation,
}

impl Objective {
    /// Fails unless `function` has the shape `z = ...` with a unit coefficient on `z`.
    pub fn new(aim: Aim, function: Equation) -> Result<Self, ModelError> {
        if function.basic_variable().is_none() || function.relation != Relation::Equal {
            return Err(ModelError::ObjectiveShape(function.to_string()));
        }
        Ok(Self { aim, function })
    }

    pub fn from_expression(aim: Aim, variable: Variable, expression: Expression) -> Self {
        Self {
            aim,
            function: Equation::new(
                Expression::from(Term::linear(Rational::one(), variable)),
                Relation::Equal,
                expression,
            ),
        }
    }

    pub fn aim(&self) -> Aim {
        self.aim
    }

    pub fn function(&self) -> &Equation {
        &self.function
    }

    pub fn variable(&self) -> &Variable {
        match self.function.left.terms() {
            [Term::Linear(_, v)] => v,
            _ => unreachable!("objective shape is checked on construction"),
        }
    }

    pub fn expression(&self) -> &Expression {
        &self.function.right
    }

    /// Current value of the objective in a dictionary: its constant term.
    pub fn value(&self) -> Rational {
        self.function.right.constant()
    }

    pub(crate) fn expression_mut(&mut self) -> &mut Expression {
        &mut self.function.right
    }

    /// Turn `min z = e` into `max z = -e`.
    pub(crate) fn negate_to_maximize(&mut self) {
        if self.aim == Aim::Minimize {
            let variable = self.variable().clone();
            self.function.multiply(&-Rational::one());
            // multiplying the whole equation negated the left side too
            self.function.left = Expression::from(Term::linear(Rational::one(), variable));
            self.aim = Aim::Maximize;
        }
    }
}

/// Which engine performed a pivot.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PhaseOne,
    PhaseTwoSetup,
    PhaseTwo,
    Dual,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::PhaseOne => "phase one",
            Stage::PhaseTwoSetup => "phase two setup",
            Stage::PhaseTwo => "phase two",
            Stage::Dual => "dual simplex",
        };
        f.write_str(name)
    }
}

/// One basis exchange, kept as the iteration log of a solve.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotStep {
    pub stage: Stage,
    pub entering: Variable,
    pub leaving: Variable,
    /// Objective constant after the pivot.
    pub objective_value: Rational,
}

/// A linear program, rewritten stage by stage until it is an optimal dictionary.
#[derive(Debug, Clone)]
pub struct LpModel {
    pub(crate) decision_variables: Vec<Variable>,
    pub(crate) all_variables: Vec<Variable>,
    pub(crate) constraints: Vec<Equation>,
    pub(crate) interpretation_ranges: Vec<Equation>,
    pub(crate) standard_form_aliases: Vec<Equation>,
    pub(crate) objective: Objective,
    /// The real objective while phase one's auxiliary objective is active.
    pub(crate) saved_objective: Option<Objective>,
    pub(crate) first_phase_function_name: String,
    pub(crate) steps: Vec<PivotStep>,
    /// Largest index ever registered. Unregistered indices are never reused.
    pub(crate) highest_index: u32,
}

impl LpModel {
    pub fn new(decision_variables: Vec<Variable>, objective: Objective) -> Result<Self, ModelError> {
        if decision_variables.is_empty() {
            return Err(ModelError::NoDecisionVariables);
        }
        for (i, v) in decision_variables.iter().enumerate() {
            if v.index == 0 {
                return Err(ModelError::ReservedIndex(v.clone()));
            }
            if decision_variables[..i].contains(v) || v == objective.variable() {
                return Err(ModelError::DuplicateVariable(v.clone()));
            }
        }
        if let Some(unknown) = objective.expression().variables().find(|v| !decision_variables.contains(v)) {
            return Err(ModelError::UnknownVariable(unknown.clone()));
        }
        let auxiliary = Variable::new(decision_variables[0].name.clone(), 0);
        if objective.variable() == &auxiliary {
            return Err(ModelError::ReservedIndex(auxiliary));
        }
        let highest_index = decision_variables.iter().map(|v| v.index).max().unwrap_or(0);
        Ok(Self {
            all_variables: decision_variables.clone(),
            decision_variables,
            constraints: Vec::new(),
            interpretation_ranges: Vec::new(),
            standard_form_aliases: Vec::new(),
            objective,
            saved_objective: None,
            first_phase_function_name: "w".to_string(),
            steps: Vec::new(),
            highest_index,
        })
    }

    /// Name of the auxiliary objective variable used in phase one. It must
    /// differ from the decision and objective variable names.
    pub fn with_first_phase_function_name(mut self, name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        if name == self.variable_name() || name == self.objective.variable().name {
            return Err(ModelError::FirstPhaseNameClash(name));
        }
        self.first_phase_function_name = name;
        Ok(self)
    }

    pub fn add_constraint(&mut self, constraint: Equation) -> Result<(), ModelError> {
        if constraint.relation.is_strict() {
            return Err(ModelError::StrictRelation(constraint.relation, constraint.to_string()));
        }
        if let Some(unknown) = constraint.variables().find(|v| !self.all_variables.contains(v)) {
            return Err(ModelError::UnknownVariable(unknown.clone()));
        }
        self.constraints.push(constraint);
        Ok(())
    }

    /// Record the interpretation range `variable >= bound`. Variables without
    /// one are unbounded below.
    pub fn add_lower_bound(&mut self, variable: &Variable, bound: Rational) -> Result<(), ModelError> {
        if !self.decision_variables.contains(variable) {
            return Err(ModelError::UnknownVariable(variable.clone()));
        }
        if self.lower_bound_of(variable).is_some() {
            return Err(ModelError::DuplicateBound(variable.clone()));
        }
        self.interpretation_ranges.push(variable.lower_bound_range(bound));
        Ok(())
    }

    pub fn decision_variables(&self) -> &[Variable] {
        &self.decision_variables
    }

    pub fn all_variables(&self) -> &[Variable] {
        &self.all_variables
    }

    pub fn constraints(&self) -> &[Equation] {
        &self.constraints
    }

    pub fn interpretation_ranges(&self) -> &[Equation] {
        &self.interpretation_ranges
    }

    pub fn standard_form_aliases(&self) -> &[Equation] {
        &self.standard_form_aliases
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub fn saved_objective(&self) -> Option<&Objective> {
        self.saved_objective.as_ref()
    }

    /// Pivots performed on this model so far.
    pub fn steps(&self) -> &[PivotStep] {
        &self.steps
    }

    /// The lower bound from the interpretation range of `variable`, if any.
    pub fn lower_bound_of(&self, variable: &Variable) -> Option<Rational> {
        self.interpretation_ranges
            .iter()
            .find(|range| range_variable(range) == Some(variable))
            .map(|range| range.right.constant())
    }

    /// Row index of the dictionary row whose basic variable is `variable`.
    pub fn row_of(&self, variable: &Variable) -> Option<usize> {
        self.constraints.iter().position(|c| c.basic_variable() == Some(variable))
    }

    /// Value of any variable in the current dictionary: its row constant when
    /// basic, its alias evaluated when eliminated by standardization, else 0.
    pub fn value_of(&self, variable: &Variable) -> Rational {
        if let Some(row) = self.row_of(variable) {
            return self.constraints[row].right.constant();
        }
        match self.alias_of(variable) {
            Some(alias) => alias.right.evaluate(|v| self.value_of(v)),
            None => Rational::zero(),
        }
    }

    /// Variables that must take integral values in an integer program: the
    /// decision variables and the variables standing in for them.
    pub fn integer_variables(&self) -> Vec<Variable> {
        let mut variables = self.decision_variables.clone();
        for alias in &self.standard_form_aliases {
            for v in alias.right.variables() {
                if !variables.contains(v) {
                    variables.push(v.clone());
                }
            }
        }
        variables
    }

    /// Gomory cuts are only valid when every constraint coefficient, right
    /// side and bound is an integer.
    pub fn ensure_integral_data(&self) -> Result<(), ModelError> {
        let fractional = self
            .constraints
            .iter()
            .chain(&self.interpretation_ranges)
            .find(|c| c.left.terms().iter().chain(c.right.terms()).any(|t| !t.coefficient().is_integer()));
        match fractional {
            Some(c) => Err(ModelError::NonIntegralData(c.to_string())),
            None => Ok(()),
        }
    }

    pub(crate) fn alias_of(&self, variable: &Variable) -> Option<&Equation> {
        self.standard_form_aliases
            .iter()
            .find(|alias| alias.basic_variable() == Some(variable))
    }

    /// Name shared by decision, slack and replacement variables.
    pub(crate) fn variable_name(&self) -> &str {
        &self.decision_variables[0].name
    }

    pub(crate) fn next_index(&self) -> u32 {
        self.highest_index + 1
    }

    /// Register `variable` together with its `>= 0` interpretation range.
    pub(crate) fn register(&mut self, variable: Variable) {
        self.highest_index = self.highest_index.max(variable.index);
        self.interpretation_ranges.push(variable.non_negative_range());
        self.all_variables.push(variable);
    }

    /// Create and register a fresh non-negative variable named `name`.
    pub(crate) fn fresh_variable(&mut self, name: &str) -> Variable {
        let variable = Variable::new(name, self.next_index());
        self.register(variable.clone());
        variable
    }

    /// Forget a variable and its interpretation range.
    pub(crate) fn unregister(&mut self, variable: &Variable) {
        self.all_variables.retain(|v| v != variable);
        self.unregister_range(variable);
    }

    pub(crate) fn unregister_range(&mut self, variable: &Variable) {
        self.interpretation_ranges.retain(|range| range_variable(range) != Some(variable));
    }
}

/// The variable an interpretation range `v >= bound` is about.
pub(crate) fn range_variable(range: &Equation) -> Option<&Variable> {
    range.basic_variable()
}

impl fmt::Display for LpModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for constraint in &self.constraints {
            writeln!(f, "{}", constraint)?;
        }
        writeln!(f, "----")?;
        writeln!(f, "{}", self.objective.function)?;
        writeln!(f, "----")?;
        let ranges: Vec<String> = self.interpretation_ranges.iter().map(|r| r.to_string()).collect();
        writeln!(f, "Interpretation ranges: {}", ranges.join(", "))?;
        let variables: Vec<String> = self.decision_variables.iter().map(|v| v.to_string()).collect();
        writeln!(f, "Decision variables: {}", variables.join(", "))?;
        writeln!(f, "----")
    }
}
