use simplex_solver::ModelError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("The provided linear programming model has a wrong format. Check the following field: {field}.")]
    WrongFormat { field: &'static str },
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl TaskError {
    pub(crate) fn wrong_format(field: &'static str) -> Self {
        Self::WrongFormat { field }
    }
}
