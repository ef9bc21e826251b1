//! Orchestration of the XFOIL panel-method solver.
//!
//! XFOIL is an interactive, line-oriented program. Each evaluation gets its
//! own runtime workspace under the XFOIL install directory holding the
//! geometry file and a command script; XFOIL is run with the install
//! directory as its working directory and the script on standard input, and
//! writes a polar table back into the workspace.

pub mod command;
pub mod error;
pub mod invoker;
pub mod polar;
pub mod settings;
pub mod workspace;

pub use command::{CommandScript, Instruction};
pub use error::{PolarFormatError, XfoilError, XfoilResult};
pub use invoker::{SolverExit, SolverInvoker, XfoilProcess};
pub use polar::{POLAR_HEADER_LINES, PerformanceRecord, PolarRow, PolarTable, parse};
pub use settings::{AlphaSweep, AnalysisSettings};
pub use workspace::{
    IdSource, PurgeReport, RandomIds, WORKSPACE_PREFIX, Workspace, WorkspaceManager,
    is_workspace_name,
};
