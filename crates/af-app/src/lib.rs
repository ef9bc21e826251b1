//! Evaluation service layer for airfoil design points.
//!
//! This crate is the single entry point an outer design-space search needs:
//! shape parameters in, performance record out, with every failure reported
//! as an [`EvaluationFailed`] tagged with the stage that broke.

pub mod batch;
pub mod boundary;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod progress;

pub use batch::{BatchSummary, evaluate_batch};
pub use boundary::{OutputValue, evaluate_named, output_map, shape_from_inputs};
pub use config::{
    EvaluatorConfig, GeometryConfig, SolverConfig, WorkspaceConfig, WorkspaceRetention,
    load_config, save_config, validate_config,
};
pub use error::{AppError, AppResult, EvaluationFailed, FailureKind, StageError};
pub use evaluator::{Evaluation, Evaluator};
pub use progress::{EvaluationProgressEvent, EvaluationStage};
