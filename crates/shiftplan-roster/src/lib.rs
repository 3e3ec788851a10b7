pub mod formulate;
pub mod index;
pub mod roster;
pub mod schedule;

pub use formulate::{compile, CompiledRoster, Direction, FormulateError, Row, RowKind};
pub use index::VarIndex;
pub use roster::{Location, Roster, Worker};
pub use schedule::{solve_roster, Assignment, Schedule, SolveError};
