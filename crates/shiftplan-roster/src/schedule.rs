use shiftplan_solver::{LpSolver, Solution, SolutionStatus};
use thiserror::Error;

use crate::formulate::{self, CompiledRoster, Direction, FormulateError};
use crate::roster::Roster;

/// One scheduled (location, worker, day) shift
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub location: String,
    pub worker: String,
    pub day: String,
}

/// A full week's schedule. Assignments are in increasing variable-position
/// order: grouped by location, then worker, then day.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub assignments: Vec<Assignment>,
    /// Objective value of the underlying LP solution
    pub objective_value: f64,
}

/// Failure modes of a solve. The solver's verdict is surfaced as-is; no
/// recovery is attempted and a failed solve never yields a partial schedule.
#[derive(Error, Debug)]
pub enum SolveError {
    #[error(transparent)]
    Formulate(#[from] FormulateError),
    #[error("No schedule satisfies all coverage, workload, and single-assignment constraints")]
    Infeasible,
    #[error("The formulation is unbounded; variable bounds were not applied")]
    Unbounded,
    #[error("Solver failed without a verdict")]
    Solver,
}

impl CompiledRoster {
    /// Decode a solver solution back into assignment records. Every position
    /// with a strictly positive value becomes one assignment; the index
    /// bijection guarantees one record per position. Non-optimal statuses
    /// are mapped to [`SolveError`] without reading the value vector.
    pub fn decode(&self, solution: &Solution) -> Result<Schedule, SolveError> {
        match solution.status {
            SolutionStatus::Optimal => {}
            SolutionStatus::Infeasible => return Err(SolveError::Infeasible),
            SolutionStatus::Unbounded => return Err(SolveError::Unbounded),
            SolutionStatus::Error => return Err(SolveError::Solver),
        }

        let mut assignments = Vec::new();
        for (position, &value) in solution.values.iter().enumerate() {
            if value > 0.0 {
                let (location, worker, day) = self.index.triple(position);
                assignments.push(Assignment {
                    location: self.locations[location].clone(),
                    worker: self.workers[worker].clone(),
                    day: self.days[day].clone(),
                });
            }
        }

        Ok(Schedule {
            assignments,
            objective_value: solution.objective_value,
        })
    }
}

/// Build and solve a roster in one call: compile the configuration, hand the
/// assembled problem to the given solver backend, decode the result.
pub fn solve_roster<S: LpSolver>(
    roster: &Roster,
    direction: Direction,
    solver: &S,
) -> Result<Schedule, SolveError> {
    let compiled = formulate::compile(roster, direction)?;
    let solution = solver.solve(&compiled.lp_problem);
    compiled.decode(&solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Location, Worker};
    use shiftplan_solver::{LpProblem, MicrolpSolver};

    /// Solver stub that returns a canned solution regardless of the problem
    struct FixedSolver(Solution);

    impl LpSolver for FixedSolver {
        fn solve(&self, _problem: &LpProblem) -> Solution {
            self.0.clone()
        }
    }

    const WEEK: [&str; 6] = ["mon", "tues", "weds", "thurs", "fri", "sat"];

    fn uniform_location(name: &str, requirement: u32) -> Location {
        WEEK.iter().fold(Location::new(name), |location, &day| {
            location.require(day, requirement)
        })
    }

    fn uniform_worker(name: &str, target_days: u32, weight: f64) -> Worker {
        WEEK.iter().fold(Worker::new(name, target_days), |worker, &day| {
            worker.prefer(day, weight)
        })
    }

    fn week_days() -> Vec<String> {
        WEEK.iter().map(|d| d.to_string()).collect()
    }

    fn assigned_count(schedule: &Schedule, pick: impl Fn(&Assignment) -> bool) -> usize {
        schedule.assignments.iter().filter(|a| pick(a)).count()
    }

    #[test]
    fn test_decode_maps_positions_to_names() {
        let roster = Roster {
            days: vec!["mon".to_string(), "tue".to_string()],
            locations: vec![
                Location::new("depot").require("mon", 0).require("tue", 0),
                Location::new("annex").require("mon", 0).require("tue", 0),
            ],
            workers: vec![
                Worker::new("ana", 0).prefer("mon", 1.0).prefer("tue", 1.0),
                Worker::new("ben", 0).prefer("mon", 1.0).prefer("tue", 1.0),
            ],
        };
        let compiled = formulate::compile(&roster, Direction::Minimize).unwrap();

        // hand-crafted solution: annex/ana/tue and depot/ben/mon
        let mut values = vec![0.0; compiled.index.len()];
        values[compiled.index.position(1, 0, 1)] = 1.0;
        values[compiled.index.position(0, 1, 0)] = 1.0;
        let solution = Solution {
            status: SolutionStatus::Optimal,
            values,
            objective_value: 2.0,
        };

        let schedule = compiled.decode(&solution).unwrap();

        // increasing position order: depot rows come before annex rows
        assert_eq!(
            schedule.assignments,
            vec![
                Assignment {
                    location: "depot".to_string(),
                    worker: "ben".to_string(),
                    day: "mon".to_string(),
                },
                Assignment {
                    location: "annex".to_string(),
                    worker: "ana".to_string(),
                    day: "tue".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_decode_surfaces_solver_verdicts() {
        let roster = Roster {
            days: vec!["mon".to_string()],
            locations: vec![Location::new("depot").require("mon", 1)],
            workers: vec![Worker::new("ana", 1).prefer("mon", 1.0)],
        };

        let infeasible = solve_roster(
            &roster,
            Direction::Minimize,
            &FixedSolver(Solution::infeasible()),
        );
        assert!(matches!(infeasible.unwrap_err(), SolveError::Infeasible));

        let unbounded = solve_roster(
            &roster,
            Direction::Minimize,
            &FixedSolver(Solution::unbounded()),
        );
        assert!(matches!(unbounded.unwrap_err(), SolveError::Unbounded));

        let failed = solve_roster(
            &roster,
            Direction::Minimize,
            &FixedSolver(Solution::error()),
        );
        assert!(matches!(failed.unwrap_err(), SolveError::Solver));
    }

    #[test]
    fn test_coverage_outranks_workload_target() {
        // One location needs one worker all six days; the only worker wants
        // five. The workload target is a lower bound, so coverage wins and
        // the worker is scheduled all six days.
        let roster = Roster {
            days: week_days(),
            locations: vec![uniform_location("museum", 1)],
            workers: vec![uniform_worker("ana", 5, 1.0)],
        };

        let schedule = solve_roster(&roster, Direction::Minimize, &MicrolpSolver::new()).unwrap();

        assert_eq!(schedule.assignments.len(), 6);
        for day in WEEK {
            assert_eq!(assigned_count(&schedule, |a| a.day == day), 1, "day {day} uncovered");
        }
    }

    #[test]
    fn test_two_locations_three_workers_is_feasible() {
        // 2 locations x 6 days of coverage = 12 worker-days; three workers
        // with targets 5 + 4 + 4 = 13 and a per-day cap of 1 each.
        let roster = Roster {
            days: week_days(),
            locations: vec![uniform_location("east_hall", 1), uniform_location("west_hall", 1)],
            workers: vec![
                uniform_worker("ana", 5, 1.0),
                uniform_worker("ben", 4, 1.0),
                uniform_worker("chris", 4, 1.0),
            ],
        };
        let compiled = formulate::compile(&roster, Direction::Minimize).unwrap();

        let solution = MicrolpSolver::new().solve(&compiled.lp_problem);
        assert!(solution.is_optimal());

        // check the constraint families directly against the raw solution
        let index = &compiled.index;
        for l in 0..2 {
            for d in 0..6 {
                let present: f64 = (0..3).map(|w| solution.values[index.position(l, w, d)]).sum();
                assert!(present >= 1.0 - 1e-6, "location {l} day {d} covered by {present}");
            }
        }
        for (w, target) in [(0, 5.0), (1, 4.0), (2, 4.0)] {
            let worked: f64 = (0..2)
                .flat_map(|l| (0..6).map(move |d| index.position(l, w, d)))
                .map(|p| solution.values[p])
                .sum();
            assert!(worked >= target - 1e-6, "worker {w} worked {worked} of {target}");
        }
        for w in 0..3 {
            for d in 0..6 {
                let places: f64 = (0..2).map(|l| solution.values[index.position(l, w, d)]).sum();
                assert!(places <= 1.0 + 1e-6, "worker {w} day {d} in {places} places");
            }
        }
    }

    #[test]
    fn test_capacity_shortfall_is_infeasible() {
        // 2 locations x 6 days of coverage need 12 worker-days, but a lone
        // worker can supply at most 6 under the per-day cap; the solve must
        // report infeasible rather than a best-effort schedule.
        let roster = Roster {
            days: week_days(),
            locations: vec![uniform_location("east_hall", 1), uniform_location("west_hall", 1)],
            workers: vec![uniform_worker("ana", 5, 1.0)],
        };

        let result = solve_roster(&roster, Direction::Minimize, &MicrolpSolver::new());

        assert!(matches!(result.unwrap_err(), SolveError::Infeasible));
    }

    #[test]
    fn test_weights_steer_minimization_toward_cheap_days() {
        // Each worker must take one of the two days; minimizing sends each
        // to their low-weight day.
        let roster = Roster {
            days: vec!["fri".to_string(), "sat".to_string()],
            locations: vec![Location::new("museum").require("fri", 1).require("sat", 1)],
            workers: vec![
                Worker::new("ana", 1).prefer("fri", 1.0).prefer("sat", 9.0),
                Worker::new("ben", 1).prefer("fri", 9.0).prefer("sat", 1.0),
            ],
        };

        let schedule = solve_roster(&roster, Direction::Minimize, &MicrolpSolver::new()).unwrap();

        assert_eq!(schedule.assignments.len(), 2);
        assert_eq!(assigned_count(&schedule, |a| a.worker == "ana" && a.day == "fri"), 1);
        assert_eq!(assigned_count(&schedule, |a| a.worker == "ben" && a.day == "sat"), 1);
        assert!((schedule.objective_value - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_maximize_fills_every_allowed_slot() {
        // With no upper bound on workload, maximizing preference weight
        // makes every additional assignment an improvement: the optimum
        // saturates each worker-day up to the single-assignment cap.
        let roster = Roster {
            days: vec!["fri".to_string(), "sat".to_string()],
            locations: vec![Location::new("museum").require("fri", 1).require("sat", 1)],
            workers: vec![
                Worker::new("ana", 1).prefer("fri", 1.0).prefer("sat", 9.0),
                Worker::new("ben", 1).prefer("fri", 9.0).prefer("sat", 1.0),
            ],
        };

        let schedule = solve_roster(&roster, Direction::Maximize, &MicrolpSolver::new()).unwrap();

        assert_eq!(schedule.assignments.len(), 4);
        assert!((schedule.objective_value + 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_identical_configurations_solve_identically() {
        let roster = Roster {
            days: week_days(),
            locations: vec![uniform_location("east_hall", 1), uniform_location("west_hall", 1)],
            workers: vec![
                uniform_worker("ana", 5, 1.0),
                uniform_worker("ben", 4, 1.0),
                uniform_worker("chris", 4, 1.0).prefer("fri", 9.0).prefer("sat", 9.0),
            ],
        };

        let first = solve_roster(&roster, Direction::Minimize, &MicrolpSolver::new()).unwrap();
        let second = solve_roster(&roster, Direction::Minimize, &MicrolpSolver::new()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_roster_yields_empty_schedule() {
        let roster = Roster {
            days: Vec::new(),
            locations: Vec::new(),
            workers: Vec::new(),
        };

        let schedule = solve_roster(&roster, Direction::Minimize, &MicrolpSolver::new()).unwrap();

        assert!(schedule.assignments.is_empty());
    }
}
