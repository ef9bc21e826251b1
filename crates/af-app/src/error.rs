//! Error types for the af-app service layer.

use std::path::PathBuf;

use af_geometry::GeometryError;
use af_xfoil::XfoilError;

use crate::progress::EvaluationStage;

/// Failure categories an outer search can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidParameters,
    WorkspaceCreationFailed,
    SolverLaunchFailed,
    ResultUnavailable,
    MalformedResult,
    SolverTimeout,
}

/// The lower-level error behind an [`EvaluationFailed`].
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Solver(#[from] XfoilError),
}

impl StageError {
    pub fn kind(&self) -> FailureKind {
        match self {
            StageError::Geometry(_) => FailureKind::InvalidParameters,
            StageError::Solver(e) => match e {
                XfoilError::WorkspaceCreationFailed { .. }
                | XfoilError::WorkspaceIdsExhausted { .. } => FailureKind::WorkspaceCreationFailed,
                XfoilError::SolverLaunchFailed { .. } => FailureKind::SolverLaunchFailed,
                XfoilError::ResultUnavailable { .. } => FailureKind::ResultUnavailable,
                XfoilError::MalformedResult { .. } => FailureKind::MalformedResult,
                XfoilError::SolverTimeout { .. } => FailureKind::SolverTimeout,
            },
        }
    }
}

/// An evaluation that did not produce a performance record.
///
/// There is no partial result: the caller should treat the design point as
/// infeasible rather than as a poor performer.
#[derive(Debug, thiserror::Error)]
#[error("Evaluation failed during {stage}: {source}")]
pub struct EvaluationFailed {
    pub stage: EvaluationStage,
    /// Workspace left behind for inspection, if one was created.
    pub workspace: Option<PathBuf>,
    #[source]
    pub source: StageError,
}

impl EvaluationFailed {
    pub fn new(stage: EvaluationStage, source: impl Into<StageError>) -> Self {
        Self {
            stage,
            workspace: None,
            source: source.into(),
        }
    }

    pub fn in_workspace(mut self, dir: PathBuf) -> Self {
        self.workspace = Some(dir);
        self
    }

    pub fn kind(&self) -> FailureKind {
        self.source.kind()
    }
}

/// Application error type for configuration and front-end plumbing.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read config file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write config file: {path}")]
    ConfigFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error(transparent)]
    Evaluation(#[from] EvaluationFailed),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for af-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<af_core::AfError> for AppError {
    fn from(err: af_core::AfError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<XfoilError> for AppError {
    fn from(err: XfoilError) -> Self {
        AppError::Solver(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_core::AfError;
    use std::time::Duration;

    #[test]
    fn failure_names_stage_and_cause() {
        let err = EvaluationFailed::new(
            EvaluationStage::ParsingResults,
            XfoilError::ResultUnavailable {
                path: PathBuf::from("RunTime_1/polar_output.dat"),
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("during parse"));
        assert!(msg.contains("polar_output.dat"));
        assert_eq!(err.kind(), FailureKind::ResultUnavailable);
    }

    #[test]
    fn kinds_follow_lower_errors() {
        let geometry = StageError::from(GeometryError::InvalidParameters(AfError::OutOfRange {
            what: "camber",
            value: -1.0,
        }));
        assert_eq!(geometry.kind(), FailureKind::InvalidParameters);

        let timeout = StageError::from(XfoilError::SolverTimeout {
            limit: Duration::from_secs(1),
        });
        assert_eq!(timeout.kind(), FailureKind::SolverTimeout);

        let exhausted = StageError::from(XfoilError::WorkspaceIdsExhausted {
            base: PathBuf::from("."),
            attempts: 2,
        });
        assert_eq!(exhausted.kind(), FailureKind::WorkspaceCreationFailed);
    }
}
