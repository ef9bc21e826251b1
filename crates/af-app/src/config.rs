//! Evaluator configuration, loaded from YAML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use af_geometry::DEFAULT_STATIONS;
use af_xfoil::AnalysisSettings;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// XFOIL install directory; also the solver working directory and the
    /// parent of every runtime workspace.
    pub install_dir: PathBuf,
    pub executable: PathBuf,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_s: Option<f64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let executable = if cfg!(windows) { "xfoil.exe" } else { "xfoil" };
        Self {
            install_dir: PathBuf::from("tools/xfoil"),
            executable: PathBuf::from(executable),
            args: Vec::new(),
            timeout_s: None,
        }
    }
}

impl SolverConfig {
    pub fn timeout(&self) -> AppResult<Option<Duration>> {
        self.timeout_s
            .map(|s| {
                Duration::try_from_secs_f64(s)
                    .map_err(|e| AppError::Config(format!("invalid solver timeout {s}: {e}")))
            })
            .transpose()
    }
}

/// What happens to a workspace once its evaluation is over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkspaceRetention {
    Remove,
    Keep,
    #[default]
    KeepOnFailure,
}

impl WorkspaceRetention {
    pub fn keeps(&self, succeeded: bool) -> bool {
        match self {
            WorkspaceRetention::Remove => false,
            WorkspaceRetention::Keep => true,
            WorkspaceRetention::KeepOnFailure => !succeeded,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub retention: WorkspaceRetention,
    /// Clear leftover workspaces when the evaluator starts.
    pub purge_on_start: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            retention: WorkspaceRetention::default(),
            purge_on_start: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Chordwise stations per surface.
    pub stations: usize,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            stations: DEFAULT_STATIONS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub solver: SolverConfig,
    pub analysis: AnalysisSettings,
    pub workspace: WorkspaceConfig,
    pub geometry: GeometryConfig,
}

/// Load evaluator configuration from a YAML file.
pub fn load_config(path: &Path) -> AppResult<EvaluatorConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: EvaluatorConfig = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))?;

    validate_config(&config)?;
    Ok(config)
}

/// Save evaluator configuration to a YAML file.
pub fn save_config(path: &Path, config: &EvaluatorConfig) -> AppResult<()> {
    let content = serde_yaml::to_string(config)
        .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;

    std::fs::write(path, content).map_err(|e| AppError::ConfigFileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

pub fn validate_config(config: &EvaluatorConfig) -> AppResult<()> {
    config.analysis.validate()?;
    config.solver.timeout()?;
    if config.geometry.stations < 2 {
        return Err(AppError::Config(format!(
            "geometry.stations must be at least 2, got {}",
            config.geometry.stations
        )));
    }
    if config.solver.executable.as_os_str().is_empty() {
        return Err(AppError::Config(
            "solver.executable must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config: EvaluatorConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, EvaluatorConfig::default());
        assert_eq!(config.analysis.reynolds, 3.0e6);
        assert_eq!(config.geometry.stations, 100);
        assert!(config.workspace.purge_on_start);
    }

    #[test]
    fn partial_yaml_overrides_fields() {
        let yaml = "
solver:
  install_dir: /opt/xfoil
  timeout_s: 30
analysis:
  reynolds: 500000
  alpha:
    step: 0.5
workspace:
  retention: keep
";
        let config: EvaluatorConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.solver.install_dir, PathBuf::from("/opt/xfoil"));
        assert_eq!(
            config.solver.timeout().unwrap(),
            Some(Duration::from_secs(30))
        );
        assert_eq!(config.analysis.reynolds, 5.0e5);
        assert_eq!(config.analysis.iterations, 100);
        assert_eq!(config.analysis.alpha.start, -5.0);
        assert_eq!(config.analysis.alpha.step, 0.5);
        assert_eq!(config.workspace.retention, WorkspaceRetention::Keep);
    }

    #[test]
    fn negative_timeout_rejected() {
        let mut config = EvaluatorConfig::default();
        config.solver.timeout_s = Some(-1.0);
        assert!(matches!(validate_config(&config), Err(AppError::Config(_))));
    }

    #[test]
    fn retention_policy() {
        assert!(!WorkspaceRetention::Remove.keeps(false));
        assert!(WorkspaceRetention::Keep.keeps(true));
        assert!(WorkspaceRetention::KeepOnFailure.keeps(false));
        assert!(!WorkspaceRetention::KeepOnFailure.keeps(true));
    }

    #[test]
    fn save_and_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("evaluator.yaml");
        let mut config = EvaluatorConfig::default();
        config.solver.args = vec!["-batch".to_string()];
        config.workspace.retention = WorkspaceRetention::Remove;

        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config(Path::new("/no/such/evaluator.yaml")).unwrap_err();
        assert!(matches!(err, AppError::ConfigFileRead { .. }));
    }
}
