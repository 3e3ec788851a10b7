use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use shiftplan_roster::{Direction, Roster, Schedule, SolveError};
use shiftplan_solver::MicrolpSolver;

#[derive(Parser)]
#[command(name = "shiftplan")]
#[command(about = "Weekly shift scheduling as a linear program", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a roster and output the weekly schedule
    Solve {
        /// JSON roster file
        file: PathBuf,
        /// Objective sense for the preference weights (min, max)
        #[arg(short, long, default_value = "min")]
        direction: String,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Check a roster file and report the problem dimensions
    Check {
        /// JSON roster file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { file, direction, format } => {
            let roster = load_roster(&file);

            let direction = match direction.as_str() {
                "min" => Direction::Minimize,
                "max" => Direction::Maximize,
                other => {
                    eprintln!("Unknown direction: {} (expected min or max)", other);
                    std::process::exit(1);
                }
            };

            match shiftplan_roster::solve_roster(&roster, direction, &MicrolpSolver::new()) {
                Ok(schedule) => {
                    if format == "json" {
                        println!("{}", serde_json::to_string_pretty(&schedule).unwrap_or_else(|_| {
                            "Error: failed to encode schedule".to_string()
                        }));
                    } else {
                        print_schedule(&roster, &schedule, direction);
                    }
                }
                Err(SolveError::Infeasible) => {
                    println!("Status: INFEASIBLE");
                    println!("No schedule satisfies all coverage, workload, and single-assignment constraints.");
                    std::process::exit(1);
                }
                Err(SolveError::Unbounded) => {
                    println!("Status: UNBOUNDED");
                    println!("The formulation has no finite optimum; variable bounds were not applied.");
                    std::process::exit(1);
                }
                Err(SolveError::Solver) => {
                    println!("Status: ERROR");
                    println!("Solver encountered an error.");
                    std::process::exit(1);
                }
                Err(SolveError::Formulate(e)) => {
                    eprintln!("Roster error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Check { file } => {
            let roster = load_roster(&file);

            match shiftplan_roster::compile(&roster, Direction::Minimize) {
                Ok(compiled) => {
                    println!("✓ {} is a valid roster", file.display());
                    println!("  {} days", roster.days.len());
                    println!("  {} locations", roster.locations.len());
                    println!("  {} workers", roster.workers.len());
                    println!("  {} assignment variables", compiled.lp_problem.num_variables());
                    println!("  {} constraint rows", compiled.lp_problem.num_constraints());
                }
                Err(e) => {
                    eprintln!("✗ {} has errors:", file.display());
                    eprintln!("  {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn load_roster(path: &Path) -> Roster {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };

    match serde_json::from_str(&source) {
        Ok(roster) => roster,
        Err(e) => {
            eprintln!("Error parsing {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

fn print_schedule(roster: &Roster, schedule: &Schedule, direction: Direction) {
    println!("Status: OPTIMAL");
    println!(
        "Schedule for {} days, {} locations, {} workers",
        roster.days.len(),
        roster.locations.len(),
        roster.workers.len()
    );

    // the maximize sense negates the weights going in, so flip the optimum
    // back into weight units for display
    let total_weight = match direction {
        Direction::Minimize => schedule.objective_value,
        Direction::Maximize => -schedule.objective_value,
    };
    println!("Total preference weight: {:.2}", total_weight);
    println!();

    println!("Assignments:");
    for a in &schedule.assignments {
        println!("  {:16} {:12} {}", a.location, a.worker, a.day);
    }
}
