//! The evaluation facade: shape parameters in, performance record out.

use std::path::Path;
use std::time::Instant;

use af_geometry::{AirfoilContour, DEFAULT_STATIONS, ShapeParameters, generate_with_stations};
use af_xfoil::{
    AnalysisSettings, IdSource, PerformanceRecord, PurgeReport, RandomIds, SolverInvoker,
    Workspace, WorkspaceManager, XfoilProcess,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{EvaluatorConfig, WorkspaceRetention, validate_config};
use crate::error::{AppResult, EvaluationFailed};
use crate::progress::{EvaluationProgressEvent, EvaluationStage};

/// A successful evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub params: ShapeParameters,
    pub contour: AirfoilContour,
    pub performance: PerformanceRecord,
    pub workspace: String,
    pub solver_exit_code: Option<i32>,
    pub solver_time_s: f64,
    pub total_time_s: f64,
}

/// Runs one design point at a time through geometry, workspace, solver and
/// parser. Safe to share across threads; each call gets its own workspace.
pub struct Evaluator<S: SolverInvoker = XfoilProcess, I: IdSource = RandomIds> {
    workspaces: WorkspaceManager<I>,
    solver: S,
    settings: AnalysisSettings,
    stations: usize,
    retention: WorkspaceRetention,
}

impl Evaluator<XfoilProcess, RandomIds> {
    /// Build the XFOIL-backed evaluator, purging stale workspaces if asked to.
    pub fn from_config(config: &EvaluatorConfig) -> AppResult<Self> {
        validate_config(config)?;
        let solver = XfoilProcess::new(&config.solver.executable)
            .with_args(config.solver.args.iter().cloned())
            .with_timeout(config.solver.timeout()?);
        let evaluator = Evaluator::new(WorkspaceManager::new(&config.solver.install_dir), solver)
            .with_settings(config.analysis)
            .with_stations(config.geometry.stations)
            .with_retention(config.workspace.retention);
        if config.workspace.purge_on_start {
            evaluator.purge_stale();
        }
        Ok(evaluator)
    }
}

impl<S: SolverInvoker, I: IdSource> Evaluator<S, I> {
    pub fn new(workspaces: WorkspaceManager<I>, solver: S) -> Self {
        Self {
            workspaces,
            solver,
            settings: AnalysisSettings::default(),
            stations: DEFAULT_STATIONS,
            retention: WorkspaceRetention::default(),
        }
    }

    pub fn with_settings(mut self, settings: AnalysisSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_stations(mut self, stations: usize) -> Self {
        self.stations = stations;
        self
    }

    pub fn with_retention(mut self, retention: WorkspaceRetention) -> Self {
        self.retention = retention;
        self
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn install_dir(&self) -> &Path {
        self.workspaces.base_dir()
    }

    /// Remove workspaces left behind by earlier processes.
    pub fn purge_stale(&self) -> PurgeReport {
        let report = self.workspaces.purge_all();
        if !report.removed.is_empty() || !report.is_clean() {
            info!(
                removed = report.removed.len(),
                failed = report.failed.len(),
                dir = %self.workspaces.base_dir().display(),
                "purged stale workspaces"
            );
        }
        report
    }

    pub fn evaluate(&self, params: &ShapeParameters) -> Result<Evaluation, EvaluationFailed> {
        self.evaluate_with_progress(params, None)
    }

    /// Evaluate one design point and stream stage events.
    pub fn evaluate_with_progress(
        &self,
        params: &ShapeParameters,
        mut progress_cb: Option<&mut dyn FnMut(EvaluationProgressEvent)>,
    ) -> Result<Evaluation, EvaluationFailed> {
        let started = Instant::now();

        emit_progress(
            &mut progress_cb,
            EvaluationStage::GeneratingGeometry,
            started,
            None,
            Some(params.designation()),
        );
        let contour = generate_with_stations(params, self.stations)
            .map_err(|e| EvaluationFailed::new(EvaluationStage::GeneratingGeometry, e))?;

        emit_progress(
            &mut progress_cb,
            EvaluationStage::PreparingWorkspace,
            started,
            None,
            None,
        );
        let (workspace, _script) = self
            .workspaces
            .prepare(&contour, &self.settings)
            .map_err(|e| EvaluationFailed::new(EvaluationStage::PreparingWorkspace, e))?;
        let workspace_name = workspace.name().to_string();

        let outcome = self.run_and_parse(&workspace, &mut progress_cb, started);

        emit_progress(
            &mut progress_cb,
            EvaluationStage::CleaningUp,
            started,
            Some(workspace_name.clone()),
            None,
        );
        let kept_dir = workspace.dir().to_path_buf();
        self.finish_workspace(workspace, outcome.is_ok());

        let (exit, performance) = match outcome {
            Ok(ok) => ok,
            Err(e) => {
                warn!(
                    params = %params.designation(),
                    stage = %e.stage,
                    error = %e.source,
                    "evaluation failed"
                );
                let e = if self.retention.keeps(false) {
                    e.in_workspace(kept_dir)
                } else {
                    e
                };
                return Err(e);
            }
        };

        info!(
            params = %params.designation(),
            e_max = performance.max_efficiency,
            alpha = performance.alpha_at_max_efficiency,
            "evaluation complete"
        );
        emit_progress(
            &mut progress_cb,
            EvaluationStage::Completed,
            started,
            Some(workspace_name.clone()),
            None,
        );

        Ok(Evaluation {
            params: *params,
            contour,
            performance,
            workspace: workspace_name,
            solver_exit_code: exit.code,
            solver_time_s: exit.elapsed.as_secs_f64(),
            total_time_s: started.elapsed().as_secs_f64(),
        })
    }

    fn run_and_parse(
        &self,
        workspace: &Workspace,
        progress_cb: &mut Option<&mut dyn FnMut(EvaluationProgressEvent)>,
        started: Instant,
    ) -> Result<(af_xfoil::SolverExit, PerformanceRecord), EvaluationFailed> {
        emit_progress(
            progress_cb,
            EvaluationStage::RunningSolver,
            started,
            Some(workspace.name().to_string()),
            None,
        );
        let exit = self
            .solver
            .run_instructions(workspace)
            .map_err(|e| EvaluationFailed::new(EvaluationStage::RunningSolver, e))?;

        emit_progress(
            progress_cb,
            EvaluationStage::ParsingResults,
            started,
            Some(workspace.name().to_string()),
            None,
        );
        let performance = af_xfoil::parse(workspace)
            .map_err(|e| EvaluationFailed::new(EvaluationStage::ParsingResults, e))?;
        Ok((exit, performance))
    }

    /// Apply the retention policy; removal failures are only logged.
    fn finish_workspace(&self, workspace: Workspace, succeeded: bool) {
        if self.retention.keeps(succeeded) {
            debug!(workspace = %workspace.dir().display(), "keeping workspace");
            return;
        }
        let name = workspace.name().to_string();
        if let Err(e) = workspace.remove() {
            warn!(workspace = %name, error = %e, "could not remove workspace");
        }
    }
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(EvaluationProgressEvent)>,
    stage: EvaluationStage,
    started: Instant,
    workspace: Option<String>,
    message: Option<String>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(EvaluationProgressEvent {
            stage,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
            workspace,
            message,
        });
    }
}
