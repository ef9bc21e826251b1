//! End-to-end evaluations against an in-process stand-in for XFOIL.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use af_app::boundary::default_inputs;
use af_app::*;
use af_geometry::ShapeParameters;
use af_xfoil::workspace::{GEOMETRY_FILE, INSTRUCTIONS_FILE};
use af_xfoil::{
    POLAR_HEADER_LINES, PolarTable, SolverExit, SolverInvoker, Workspace, WorkspaceManager,
    XfoilError, XfoilResult,
};

const ROWS: &str = "\
  -2.000   0.2000   0.02000   0.00500  -0.0500
   0.000   0.4000   0.02000   0.00500  -0.0500
   2.000   0.6500   0.03000   0.00500  -0.0500
";

fn polar_text() -> String {
    format!("{}{}", " header\n".repeat(POLAR_HEADER_LINES), ROWS)
}

/// Always writes the same three-row polar, after checking its inputs exist.
struct FixedPolarSolver;

impl SolverInvoker for FixedPolarSolver {
    fn run_instructions(&self, workspace: &Workspace) -> XfoilResult<SolverExit> {
        assert!(workspace.path(GEOMETRY_FILE).is_file());
        assert!(workspace.path(INSTRUCTIONS_FILE).is_file());
        fs::write(workspace.polar_path(), polar_text()).map_err(|source| {
            XfoilError::WorkspaceCreationFailed {
                path: workspace.polar_path(),
                source,
            }
        })?;
        Ok(SolverExit {
            code: Some(0),
            elapsed: Duration::from_millis(1),
        })
    }
}

/// Exits without writing anything, like XFOIL after a failed `load`.
struct SilentSolver;

impl SolverInvoker for SilentSolver {
    fn run_instructions(&self, _workspace: &Workspace) -> XfoilResult<SolverExit> {
        Ok(SolverExit {
            code: Some(0),
            elapsed: Duration::ZERO,
        })
    }
}

struct MissingSolver;

impl SolverInvoker for MissingSolver {
    fn run_instructions(&self, _workspace: &Workspace) -> XfoilResult<SolverExit> {
        Err(XfoilError::SolverLaunchFailed {
            executable: PathBuf::from("xfoil"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        })
    }
}

fn workspace_dirs(root: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .filter(|n| af_xfoil::is_workspace_name(n))
        .collect();
    names.sort();
    names
}

#[test]
fn naca_2415_matches_stub_table() {
    let tmp = tempfile::tempdir().unwrap();
    let evaluator = Evaluator::new(WorkspaceManager::new(tmp.path()), FixedPolarSolver)
        .with_retention(WorkspaceRetention::Remove);

    let evaluation = evaluator
        .evaluate(&ShapeParameters::new(2.0, 4.0, 15.0))
        .unwrap();

    let table = PolarTable::parse_str(&polar_text()).unwrap();
    let expected = table
        .rows()
        .iter()
        .map(|r| r.cl / r.cd)
        .fold(f64::MIN, f64::max);
    assert_eq!(evaluation.performance.max_efficiency, expected);
    assert_eq!(evaluation.performance.alpha_at_max_efficiency, 2.0);
    assert_eq!(evaluation.performance.len(), 3);
    assert_eq!(evaluation.contour.len(), 199);
    assert_eq!(evaluation.solver_exit_code, Some(0));
    assert!(workspace_dirs(tmp.path()).is_empty());
}

#[test]
fn invalid_parameters_fail_before_any_workspace() {
    let tmp = tempfile::tempdir().unwrap();
    let evaluator = Evaluator::new(WorkspaceManager::new(tmp.path()), FixedPolarSolver);

    let err = evaluator
        .evaluate(&ShapeParameters::new(2.0, 0.0, 15.0))
        .unwrap_err();

    assert_eq!(err.stage, EvaluationStage::GeneratingGeometry);
    assert_eq!(err.kind(), FailureKind::InvalidParameters);
    assert!(err.workspace.is_none());
    assert!(workspace_dirs(tmp.path()).is_empty());
}

#[test]
fn missing_polar_is_result_unavailable_and_workspace_kept() {
    let tmp = tempfile::tempdir().unwrap();
    let evaluator = Evaluator::new(WorkspaceManager::new(tmp.path()), SilentSolver);

    let err = evaluator
        .evaluate(&ShapeParameters::new(0.0, 0.0, 12.0))
        .unwrap_err();

    assert_eq!(err.stage, EvaluationStage::ParsingResults);
    assert_eq!(err.kind(), FailureKind::ResultUnavailable);
    let kept = err.workspace.clone().expect("workspace kept on failure");
    assert!(kept.join(GEOMETRY_FILE).is_file());
    assert_eq!(workspace_dirs(tmp.path()).len(), 1);
}

#[test]
fn remove_policy_cleans_up_failures_too() {
    let tmp = tempfile::tempdir().unwrap();
    let evaluator = Evaluator::new(WorkspaceManager::new(tmp.path()), SilentSolver)
        .with_retention(WorkspaceRetention::Remove);

    let err = evaluator
        .evaluate(&ShapeParameters::new(0.0, 0.0, 12.0))
        .unwrap_err();

    assert!(err.workspace.is_none());
    assert!(workspace_dirs(tmp.path()).is_empty());
}

#[test]
fn launch_failure_tagged_with_solver_stage() {
    let tmp = tempfile::tempdir().unwrap();
    let evaluator = Evaluator::new(WorkspaceManager::new(tmp.path()), MissingSolver);

    let err = evaluator
        .evaluate(&ShapeParameters::new(2.0, 4.0, 15.0))
        .unwrap_err();

    assert_eq!(err.stage, EvaluationStage::RunningSolver);
    assert_eq!(err.kind(), FailureKind::SolverLaunchFailed);
}

#[test]
fn missing_install_dir_is_workspace_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let evaluator = Evaluator::new(
        WorkspaceManager::new(tmp.path().join("not-installed")),
        FixedPolarSolver,
    );

    let err = evaluator
        .evaluate(&ShapeParameters::new(2.0, 4.0, 15.0))
        .unwrap_err();

    assert_eq!(err.stage, EvaluationStage::PreparingWorkspace);
    assert_eq!(err.kind(), FailureKind::WorkspaceCreationFailed);
}

#[test]
fn progress_reports_stages_in_order() {
    let tmp = tempfile::tempdir().unwrap();
    let evaluator = Evaluator::new(WorkspaceManager::new(tmp.path()), FixedPolarSolver);

    let mut stages = Vec::new();
    evaluator
        .evaluate_with_progress(
            &ShapeParameters::new(2.0, 4.0, 15.0),
            Some(&mut |event: EvaluationProgressEvent| stages.push(event.stage)),
        )
        .unwrap();

    assert_eq!(
        stages,
        vec![
            EvaluationStage::GeneratingGeometry,
            EvaluationStage::PreparingWorkspace,
            EvaluationStage::RunningSolver,
            EvaluationStage::ParsingResults,
            EvaluationStage::CleaningUp,
            EvaluationStage::Completed,
        ]
    );
}

#[test]
fn parallel_batch_uses_distinct_workspaces() {
    let tmp = tempfile::tempdir().unwrap();
    let evaluator = Evaluator::new(WorkspaceManager::new(tmp.path()), FixedPolarSolver)
        .with_retention(WorkspaceRetention::Keep);

    let mut points: Vec<ShapeParameters> = (0..16)
        .map(|i| ShapeParameters::new((i % 5) as f64, 4.0, 10.0 + i as f64))
        .collect();
    points.push(ShapeParameters::new(-1.0, 4.0, 12.0));

    let results = evaluate_batch(&evaluator, &points);
    assert_eq!(results.len(), 17);

    let names: HashSet<String> = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .map(|e| e.workspace.clone())
        .collect();
    assert_eq!(names.len(), 16);
    assert_eq!(workspace_dirs(tmp.path()).len(), 16);

    let summary = BatchSummary::from_results(&results);
    assert_eq!(summary.evaluated, 17);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.best.map(|(i, _)| i), Some(0));
}

#[test]
fn named_mapping_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let evaluator = Evaluator::new(WorkspaceManager::new(tmp.path()), FixedPolarSolver);

    let outputs = evaluate_named(&evaluator, &default_inputs()).unwrap();

    let keys: Vec<&str> = outputs.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["AirfoilX", "AirfoilY", "Alpha", "Alpha_E_max", "CD", "CL", "E", "E_max"]
    );
    assert_eq!(outputs["Alpha"].as_array(), Some(&[-2.0, 0.0, 2.0][..]));
    assert_eq!(outputs["Alpha_E_max"].as_scalar(), Some(2.0));
    assert_eq!(outputs["AirfoilX"].as_array().map(<[f64]>::len), Some(199));

    let json = serde_json::to_value(&outputs).unwrap();
    assert!(json["E_max"].is_number());
    assert!(json["E"].is_array());
}

#[test]
fn failed_named_evaluation_is_an_error_not_a_number() {
    let tmp = tempfile::tempdir().unwrap();
    let evaluator = Evaluator::new(WorkspaceManager::new(tmp.path()), SilentSolver);

    let err = evaluate_named(&evaluator, &default_inputs()).unwrap_err();
    assert!(matches!(err, AppError::Evaluation(ref e) if e.kind() == FailureKind::ResultUnavailable));
}
