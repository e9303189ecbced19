mod problem;
mod solver;

pub use problem::{TrimEvaluation, TrimPoint, TrimProblem};
pub use solver::{solve, sweep};
