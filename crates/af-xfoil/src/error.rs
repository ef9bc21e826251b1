//! Error types for solver orchestration.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures while preparing, running, or reading back an XFOIL run.
#[derive(Error, Debug)]
pub enum XfoilError {
    #[error("Failed to create workspace at {path}: {source}")]
    WorkspaceCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No free workspace identifier under {base} after {attempts} attempts")]
    WorkspaceIdsExhausted { base: PathBuf, attempts: usize },

    #[error("Failed to launch solver '{executable}': {source}")]
    SolverLaunchFailed {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Solver output not found: {path}")]
    ResultUnavailable { path: PathBuf },

    #[error("Malformed solver output in {path}: {source}")]
    MalformedResult {
        path: PathBuf,
        #[source]
        source: PolarFormatError,
    },

    #[error("Solver exceeded time limit of {limit:?} and was killed")]
    SolverTimeout { limit: Duration },
}

pub type XfoilResult<T> = Result<T, XfoilError>;

/// Why a polar table could not be read.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolarFormatError {
    #[error("table has no data rows")]
    Empty,

    #[error("could not read table: {0}")]
    Unreadable(String),

    #[error("line {line}: expected at least {expected} columns, found {found}")]
    MissingColumns {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: '{token}' is not a number")]
    NotNumeric { line: usize, token: String },

    #[error("line {line}: non-finite value in {column}")]
    NonFinite { line: usize, column: &'static str },

    #[error("line {line}: drag coefficient must be positive, got {cd}")]
    NonPositiveDrag { line: usize, cd: f64 },
}

impl XfoilError {
    /// The workspace could not be made, whatever the cause.
    pub fn is_workspace_failure(&self) -> bool {
        matches!(
            self,
            XfoilError::WorkspaceCreationFailed { .. } | XfoilError::WorkspaceIdsExhausted { .. }
        )
    }
}
