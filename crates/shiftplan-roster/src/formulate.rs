use std::collections::HashSet;

use shiftplan_solver::{ConstraintOp, LpProblem};
use thiserror::Error;

use crate::index::VarIndex;
use crate::roster::Roster;

#[derive(Error, Debug)]
pub enum FormulateError {
    #[error("Duplicate day label: {0}")]
    DuplicateDay(String),
    #[error("Duplicate location name: {0}")]
    DuplicateLocation(String),
    #[error("Duplicate worker name: {0}")]
    DuplicateWorker(String),
    #[error("Location {location} has no requirement for day {day}")]
    MissingRequirement { location: String, day: String },
    #[error("Worker {worker} has no weight for day {day}")]
    MissingWeight { worker: String, day: String },
    #[error("Worker {worker} has a non-finite weight for day {day}")]
    NonFiniteWeight { worker: String, day: String },
    #[error("Worker {worker} has a negative weight for day {day}")]
    NegativeWeight { worker: String, day: String },
}

/// Objective sense applied to the preference weights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Minimize the total preference weight of the chosen assignments
    Minimize,
    /// Maximize preference satisfaction; weights are negated so the
    /// assembled problem stays a literal minimization
    Maximize,
}

/// Which constraint family a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// At least the required number of workers present at a location on a day
    Coverage { location: usize, day: usize },
    /// A worker's assigned days over the week reach their weekly target
    Workload { worker: usize },
    /// A worker is at no more than one location on a day
    SingleAssignment { worker: usize, day: usize },
}

/// One linear inequality row in the solver's `lhs <= rhs` convention
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub kind: RowKind,
    /// Sparse (variable position, coefficient) terms
    pub terms: Vec<(usize, f64)>,
    pub rhs: f64,
}

impl Row {
    /// Human-readable label for diagnostics, resolved against the roster
    pub fn label(&self, roster: &Roster) -> String {
        match self.kind {
            RowKind::Coverage { location, day } => {
                format!("coverage {}: {}", roster.locations[location].name, roster.days[day])
            }
            RowKind::Workload { worker } => {
                format!("workload {}", roster.workers[worker].name)
            }
            RowKind::SingleAssignment { worker, day } => {
                format!("single assignment {}: {}", roster.workers[worker].name, roster.days[day])
            }
        }
    }
}

/// Objective coefficients: one entry per assignment variable, the worker's
/// preference weight for the day, repeated for every location. Location
/// identity never affects the coefficient, so preference steers *when* a
/// worker works, not *where*.
pub fn objective(
    roster: &Roster,
    index: &VarIndex,
    direction: Direction,
) -> Result<Vec<f64>, FormulateError> {
    let sign = match direction {
        Direction::Minimize => 1.0,
        Direction::Maximize => -1.0,
    };

    let mut coefficients = vec![0.0; index.len()];
    for location in 0..roster.locations.len() {
        for (w, worker) in roster.workers.iter().enumerate() {
            for (d, day) in roster.days.iter().enumerate() {
                let weight = *worker.weights.get(day).ok_or_else(|| {
                    FormulateError::MissingWeight {
                        worker: worker.name.clone(),
                        day: day.clone(),
                    }
                })?;
                if !weight.is_finite() {
                    return Err(FormulateError::NonFiniteWeight {
                        worker: worker.name.clone(),
                        day: day.clone(),
                    });
                }
                if weight < 0.0 {
                    return Err(FormulateError::NegativeWeight {
                        worker: worker.name.clone(),
                        day: day.clone(),
                    });
                }
                coefficients[index.position(location, w, d)] = sign * weight;
            }
        }
    }
    Ok(coefficients)
}

/// Coverage rows: for every (location, day), at least the required number of
/// workers present. Emitted in the `<=` convention: minus the sum of that
/// location-day's variables across all workers, against the negated
/// requirement.
pub fn coverage_rows(roster: &Roster, index: &VarIndex) -> Result<Vec<Row>, FormulateError> {
    let mut rows = Vec::with_capacity(roster.locations.len() * roster.days.len());
    for (l, location) in roster.locations.iter().enumerate() {
        for (d, day) in roster.days.iter().enumerate() {
            let requirement = *location.requirements.get(day).ok_or_else(|| {
                FormulateError::MissingRequirement {
                    location: location.name.clone(),
                    day: day.clone(),
                }
            })?;
            let terms = (0..roster.workers.len())
                .map(|w| (index.position(l, w, d), -1.0))
                .collect();
            rows.push(Row {
                kind: RowKind::Coverage { location: l, day: d },
                terms,
                rhs: -f64::from(requirement),
            });
        }
    }
    Ok(rows)
}

/// Workload rows: each worker's total assigned days across all locations and
/// days reaches their weekly target. This is a lower bound only; nothing in
/// the formulation caps how far above target a worker can be scheduled.
pub fn workload_rows(roster: &Roster, index: &VarIndex) -> Vec<Row> {
    roster
        .workers
        .iter()
        .enumerate()
        .map(|(w, worker)| {
            let mut terms = Vec::with_capacity(roster.locations.len() * roster.days.len());
            for l in 0..roster.locations.len() {
                for d in 0..roster.days.len() {
                    terms.push((index.position(l, w, d), -1.0));
                }
            }
            Row {
                kind: RowKind::Workload { worker: w },
                terms,
                rhs: -f64::from(worker.target_days),
            }
        })
        .collect()
}

/// Single-assignment rows: a worker is at no more than one location per day
pub fn single_assignment_rows(roster: &Roster, index: &VarIndex) -> Vec<Row> {
    let mut rows = Vec::with_capacity(roster.workers.len() * roster.days.len());
    for w in 0..roster.workers.len() {
        for d in 0..roster.days.len() {
            let terms = (0..roster.locations.len())
                .map(|l| (index.position(l, w, d), 1.0))
                .collect();
            rows.push(Row {
                kind: RowKind::SingleAssignment { worker: w, day: d },
                terms,
                rhs: 1.0,
            });
        }
    }
    rows
}

/// Box bounds: every assignment variable is relaxed to [0, 1]
pub fn bounds(index: &VarIndex) -> Vec<(f64, f64)> {
    vec![(0.0, 1.0); index.len()]
}

/// A roster compiled into a solver-ready LP problem
#[derive(Debug, Clone)]
pub struct CompiledRoster {
    /// Location names in index order
    pub locations: Vec<String>,
    /// Worker names in index order
    pub workers: Vec<String>,
    /// Day labels in index order
    pub days: Vec<String>,
    /// The indexing convention shared by the problem and the decoder
    pub index: VarIndex,
    pub lp_problem: LpProblem,
}

/// Compile a roster into an LP problem: objective, the three constraint
/// families stacked in order (coverage, workload, single-assignment), and
/// box bounds, all over one shared [`VarIndex`].
pub fn compile(roster: &Roster, direction: Direction) -> Result<CompiledRoster, FormulateError> {
    check_unique_names(roster)?;

    let index = VarIndex::new(
        roster.locations.len(),
        roster.workers.len(),
        roster.days.len(),
    );

    // Variables in index order: day fastest, then worker, then location
    let mut variables = Vec::with_capacity(index.len());
    for location in &roster.locations {
        for worker in &roster.workers {
            for day in &roster.days {
                variables.push(format!("{}: {}: {}", location.name, worker.name, day));
            }
        }
    }

    let mut lp = LpProblem::new(variables);
    lp.set_objective(objective(roster, &index, direction)?, true);
    lp.set_bounds(bounds(&index));

    let mut rows = coverage_rows(roster, &index)?;
    rows.extend(workload_rows(roster, &index));
    rows.extend(single_assignment_rows(roster, &index));
    for row in rows {
        lp.add_constraint(row.label(roster), row.terms, ConstraintOp::Le, row.rhs);
    }

    Ok(CompiledRoster {
        locations: roster.locations.iter().map(|l| l.name.clone()).collect(),
        workers: roster.workers.iter().map(|w| w.name.clone()).collect(),
        days: roster.days.clone(),
        index,
        lp_problem: lp,
    })
}

fn check_unique_names(roster: &Roster) -> Result<(), FormulateError> {
    let mut seen = HashSet::new();
    for day in &roster.days {
        if !seen.insert(day.as_str()) {
            return Err(FormulateError::DuplicateDay(day.clone()));
        }
    }

    let mut seen = HashSet::new();
    for location in &roster.locations {
        if !seen.insert(location.name.as_str()) {
            return Err(FormulateError::DuplicateLocation(location.name.clone()));
        }
    }

    let mut seen = HashSet::new();
    for worker in &roster.workers {
        if !seen.insert(worker.name.as_str()) {
            return Err(FormulateError::DuplicateWorker(worker.name.clone()));
        }
    }

    Ok(())
}
