pub mod dto;
pub mod error;
pub mod result;

pub use dto::LpTaskDto;
pub use error::TaskError;
pub use result::{LpTaskResult, solve_task};
