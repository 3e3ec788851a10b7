mod backend;
mod problem;
mod solution;

pub use backend::{LpSolver, MicrolpSolver};
pub use problem::{Constraint, ConstraintOp, LpProblem, Objective};
pub use solution::{Solution, SolutionStatus};
