use thiserror::Error;

use crate::linear::{Relation, Variable};

/// Structural problems with a model, rejected before any pivoting happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Denominator of a rational number cannot be zero")]
    ZeroDenominator,
    #[error("Objective left side must be exactly one variable with coefficient 1, got: {0}")]
    ObjectiveShape(String),
    #[error("A model needs at least one decision variable")]
    NoDecisionVariables,
    #[error("Index 0 is reserved for the phase one auxiliary variable, got: {0}")]
    ReservedIndex(Variable),
    #[error("First phase function name '{0}' clashes with a variable name of the model")]
    FirstPhaseNameClash(String),
    #[error("Duplicate variable: {0}")]
    DuplicateVariable(Variable),
    #[error("Unknown variable: {0}")]
    UnknownVariable(Variable),
    #[error("Strict relation '{0}' is not supported in constraint: {1}")]
    StrictRelation(Relation, String),
    #[error("Variable {0} already has a lower bound")]
    DuplicateBound(Variable),
    #[error("Integer programming requires integral constraint data, got: {0}")]
    NonIntegralData(String),
}

/// Terminal conditions of a solve other than an optimal solution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("The provided linear programming problem has no solution")]
    Infeasible,
    #[error("The provided linear programming problem has no limit")]
    Unbounded,
    #[error("Malformed model: {0}")]
    Malformed(#[from] ModelError),
    #[error("Gomory cut limit of {0} exceeded without reaching an integral solution")]
    CutLimitExceeded(usize),
    #[error("Pivot limit of {0} exceeded")]
    PivotLimitExceeded(usize),
}
