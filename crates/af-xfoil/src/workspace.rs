//! Per-evaluation runtime workspaces under the solver install directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use af_geometry::AirfoilContour;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::command::CommandScript;
use crate::error::{XfoilError, XfoilResult};
use crate::settings::AnalysisSettings;

pub const WORKSPACE_PREFIX: &str = "RunTime_";
pub const GEOMETRY_FILE: &str = "airfoil_input.dat";
pub const INSTRUCTIONS_FILE: &str = "instructions.txt";
pub const POLAR_FILE: &str = "polar_output.dat";
pub const LOG_FILE: &str = "solver.log";
pub const REPLAY_FILE: &str = "replay.sh";

const ID_MIN: u32 = 10_000_000;
const ID_MAX: u32 = 99_999_999;
const DEFAULT_MAX_ATTEMPTS: usize = 64;

/// Supplies candidate workspace identifiers.
pub trait IdSource: Send {
    fn next_id(&mut self) -> u32;
}

impl<F> IdSource for F
where
    F: FnMut() -> u32 + Send,
{
    fn next_id(&mut self) -> u32 {
        self()
    }
}

/// Uniform 8-digit identifiers.
pub struct RandomIds {
    rng: StdRng,
}

impl RandomIds {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl IdSource for RandomIds {
    fn next_id(&mut self) -> u32 {
        self.rng.gen_range(ID_MIN..=ID_MAX)
    }
}

/// True for directory names of the form `RunTime_<digits>`.
pub fn is_workspace_name(name: &str) -> bool {
    name.strip_prefix(WORKSPACE_PREFIX)
        .is_some_and(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
}

/// One evaluation's runtime directory.
///
/// `base_dir` is the solver's working directory; every path handed to the
/// solver is built from [`Workspace::relative`] so that it resolves there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    id: u32,
    name: String,
    base_dir: PathBuf,
    dir: PathBuf,
}

impl Workspace {
    fn new(base_dir: &Path, id: u32) -> Self {
        let name = format!("{WORKSPACE_PREFIX}{id}");
        Self {
            id,
            dir: base_dir.join(&name),
            name,
            base_dir: base_dir.to_path_buf(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// `file` as seen from the solver working directory.
    pub fn relative(&self, file: &str) -> String {
        format!("./{}/{}", self.name, file)
    }

    pub fn geometry_path(&self) -> PathBuf {
        self.path(GEOMETRY_FILE)
    }

    pub fn instructions_path(&self) -> PathBuf {
        self.path(INSTRUCTIONS_FILE)
    }

    pub fn polar_path(&self) -> PathBuf {
        self.path(POLAR_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.path(LOG_FILE)
    }

    /// Write the contour and the command script that analyses it.
    pub fn write_inputs(
        &self,
        contour: &AirfoilContour,
        settings: &AnalysisSettings,
    ) -> XfoilResult<CommandScript> {
        let script = CommandScript::viscous_polar(
            self.relative(GEOMETRY_FILE),
            self.relative(POLAR_FILE),
            settings,
        );
        self.write_file(GEOMETRY_FILE, &contour.to_dat_string())?;
        self.write_file(INSTRUCTIONS_FILE, &script.render())?;
        debug!(workspace = %self.name, points = contour.len(), "wrote solver inputs");
        Ok(script)
    }

    fn write_file(&self, file: &str, content: &str) -> XfoilResult<()> {
        let path = self.path(file);
        fs::write(&path, content)
            .map_err(|source| XfoilError::WorkspaceCreationFailed { path, source })
    }

    pub fn remove(self) -> io::Result<()> {
        fs::remove_dir_all(&self.dir)
    }
}

/// Outcome of a best-effort sweep of stale workspaces.
#[derive(Debug, Default)]
pub struct PurgeReport {
    pub removed: Vec<String>,
    pub failed: Vec<(String, io::Error)>,
}

impl PurgeReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Allocates workspaces under one solver install directory.
pub struct WorkspaceManager<I: IdSource = RandomIds> {
    base_dir: PathBuf,
    ids: Mutex<I>,
    max_attempts: usize,
}

impl WorkspaceManager<RandomIds> {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::with_id_source(base_dir, RandomIds::default())
    }
}

impl<I: IdSource> WorkspaceManager<I> {
    pub fn with_id_source(base_dir: impl Into<PathBuf>, ids: I) -> Self {
        Self {
            base_dir: base_dir.into(),
            ids: Mutex::new(ids),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn next_id(&self) -> u32 {
        let mut ids = self.ids.lock().unwrap_or_else(|e| e.into_inner());
        ids.next_id()
    }

    /// Reserve a fresh, empty workspace directory.
    ///
    /// Directory creation itself is the reservation: `create_dir` fails on an
    /// existing name, so concurrent callers never share a workspace.
    pub fn create_workspace(&self) -> XfoilResult<Workspace> {
        for attempt in 1..=self.max_attempts {
            let workspace = Workspace::new(&self.base_dir, self.next_id());
            if workspace.dir.exists() {
                debug!(workspace = %workspace.name, attempt, "workspace id collision");
                continue;
            }
            match fs::create_dir(&workspace.dir) {
                Ok(()) => {
                    debug!(workspace = %workspace.name, "created workspace");
                    return Ok(workspace);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    debug!(workspace = %workspace.name, attempt, "workspace id taken concurrently");
                }
                Err(source) => {
                    return Err(XfoilError::WorkspaceCreationFailed {
                        path: workspace.dir,
                        source,
                    });
                }
            }
        }
        Err(XfoilError::WorkspaceIdsExhausted {
            base: self.base_dir.clone(),
            attempts: self.max_attempts,
        })
    }

    /// Create a workspace and populate it with the solver inputs.
    pub fn prepare(
        &self,
        contour: &AirfoilContour,
        settings: &AnalysisSettings,
    ) -> XfoilResult<(Workspace, CommandScript)> {
        let workspace = self.create_workspace()?;
        match workspace.write_inputs(contour, settings) {
            Ok(script) => Ok((workspace, script)),
            Err(e) => {
                let name = workspace.name.clone();
                if let Err(cleanup) = workspace.remove() {
                    warn!(workspace = %name, error = %cleanup, "could not remove half-written workspace");
                }
                Err(e)
            }
        }
    }

    /// Remove every `RunTime_<digits>` directory under the base directory.
    pub fn purge_all(&self) -> PurgeReport {
        self.purge_all_with(|dir| fs::remove_dir_all(dir))
    }

    /// [`purge_all`](Self::purge_all) with a custom removal step.
    pub fn purge_all_with<F>(&self, mut remove: F) -> PurgeReport
    where
        F: FnMut(&Path) -> io::Result<()>,
    {
        let mut report = PurgeReport::default();
        let entries = match fs::read_dir(&self.base_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return report,
            Err(e) => {
                warn!(dir = %self.base_dir.display(), error = %e, "could not list workspaces");
                report
                    .failed
                    .push((self.base_dir.display().to_string(), e));
                return report;
            }
        };

        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir || !is_workspace_name(&name) {
                continue;
            }
            match remove(&entry.path()) {
                Ok(()) => report.removed.push(name),
                Err(e) => {
                    warn!(workspace = %name, error = %e, "could not clear workspace");
                    report.failed.push((name, e));
                }
            }
        }
        report.removed.sort();
        report
    }
}
