use microlp::{ComparisonOp, OptimizationDirection};

use crate::problem::{ConstraintOp, LpProblem};
use crate::solution::{Solution, SolutionStatus};

/// A linear programming backend.
///
/// The contract is the black-box solve: optimize `c·x` subject to the
/// problem's constraint rows and per-variable bounds. Implementations report
/// the outcome through the [`Solution`] status and must leave `values` empty
/// for any non-optimal outcome, so callers never read a partial vector.
pub trait LpSolver {
    fn solve(&self, problem: &LpProblem) -> Solution;
}

/// Backend on the `microlp` simplex solver
#[derive(Debug, Clone, Copy, Default)]
pub struct MicrolpSolver;

impl MicrolpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl LpSolver for MicrolpSolver {
    fn solve(&self, problem: &LpProblem) -> Solution {
        // microlp rejects variable-free problems; an empty problem is
        // trivially optimal with an empty vector.
        if problem.num_variables() == 0 {
            return Solution {
                status: SolutionStatus::Optimal,
                values: Vec::new(),
                objective_value: 0.0,
            };
        }

        let direction = if problem.objective.minimize {
            OptimizationDirection::Minimize
        } else {
            OptimizationDirection::Maximize
        };

        let mut lp = microlp::Problem::new(direction);
        let vars: Vec<microlp::Variable> = problem
            .objective
            .coefficients
            .iter()
            .zip(&problem.bounds)
            .map(|(&coeff, &(min, max))| lp.add_var(coeff, (min, max)))
            .collect();

        for constraint in &problem.constraints {
            let terms: Vec<(microlp::Variable, f64)> = constraint
                .terms
                .iter()
                .map(|&(index, coeff)| (vars[index], coeff))
                .collect();
            let op = match constraint.op {
                ConstraintOp::Le => ComparisonOp::Le,
                ConstraintOp::Ge => ComparisonOp::Ge,
                ConstraintOp::Eq => ComparisonOp::Eq,
            };
            lp.add_constraint(terms.as_slice(), op, constraint.rhs);
        }

        match lp.solve() {
            Ok(solved) => Solution {
                status: SolutionStatus::Optimal,
                values: vars.iter().map(|&v| solved[v]).collect(),
                objective_value: solved.objective(),
            },
            Err(microlp::Error::Infeasible) => Solution::infeasible(),
            Err(microlp::Error::Unbounded) => Solution::unbounded(),
            Err(_) => Solution::error(),
        }
    }
}
