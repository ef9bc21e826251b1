//! Launching the solver against a prepared workspace.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{XfoilError, XfoilResult};
use crate::workspace::{INSTRUCTIONS_FILE, REPLAY_FILE, Workspace};

/// How a solver run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverExit {
    /// Exit code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub elapsed: Duration,
}

impl SolverExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs the command script of a workspace to completion.
///
/// Implementations report only whether the solver could be started and how
/// it exited; judging the run is left to the result parser.
pub trait SolverInvoker: Send + Sync {
    fn run_instructions(&self, workspace: &Workspace) -> XfoilResult<SolverExit>;
}

/// XFOIL as a child process: working directory is the workspace base
/// directory, standard input is the command script, console output goes to
/// the workspace log.
#[derive(Debug, Clone)]
pub struct XfoilProcess {
    executable: PathBuf,
    args: Vec<String>,
    timeout: Option<Duration>,
    poll_interval: Duration,
}

impl XfoilProcess {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
            timeout: None,
            poll_interval: Duration::from_millis(20),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Kill the solver if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// A relative executable found in `working_dir` is run from there,
    /// anything else is left to `PATH` lookup.
    fn resolve_executable(&self, working_dir: &Path) -> PathBuf {
        if self.executable.is_relative() {
            let local = working_dir.join(&self.executable);
            if local.is_file() {
                return std::path::absolute(&local).unwrap_or(local);
            }
        }
        self.executable.clone()
    }

    /// Shell line that repeats this run by hand.
    pub fn replay_command(&self, workspace: &Workspace) -> String {
        let exe = self.resolve_executable(workspace.base_dir());
        let mut line = format!(
            "cd \"{}\" && \"{}\"",
            workspace.base_dir().display(),
            exe.display()
        );
        for arg in &self.args {
            line.push_str(&format!(" \"{arg}\""));
        }
        line.push_str(&format!(" < {}", workspace.relative(INSTRUCTIONS_FILE)));
        line
    }

    fn write_replay_script(&self, workspace: &Workspace) {
        let content = format!("#!/bin/sh\n{}\n", self.replay_command(workspace));
        if let Err(e) = fs::write(workspace.path(REPLAY_FILE), content) {
            warn!(workspace = %workspace.name(), error = %e, "could not write replay script");
        }
    }

    fn wait(&self, child: &mut Child, started: Instant) -> XfoilResult<ExitStatus> {
        let launch_err = |source| XfoilError::SolverLaunchFailed {
            executable: self.executable.clone(),
            source,
        };
        let Some(limit) = self.timeout else {
            return child.wait().map_err(launch_err);
        };
        loop {
            if let Some(status) = child.try_wait().map_err(launch_err)? {
                return Ok(status);
            }
            if started.elapsed() >= limit {
                if let Err(e) = child.kill() {
                    warn!(error = %e, "failed to kill timed-out solver");
                }
                // reap to avoid leaving a zombie
                let _ = child.wait();
                return Err(XfoilError::SolverTimeout { limit });
            }
            thread::sleep(self.poll_interval);
        }
    }
}

impl SolverInvoker for XfoilProcess {
    fn run_instructions(&self, workspace: &Workspace) -> XfoilResult<SolverExit> {
        let working_dir = workspace.base_dir();
        let executable = self.resolve_executable(working_dir);
        self.write_replay_script(workspace);

        let launch_err = |source| XfoilError::SolverLaunchFailed {
            executable: executable.clone(),
            source,
        };
        let stdin = File::open(workspace.instructions_path()).map_err(launch_err)?;
        let stdout = File::create(workspace.log_path()).map_err(launch_err)?;
        let stderr = stdout.try_clone().map_err(launch_err)?;

        debug!(
            workspace = %workspace.name(),
            executable = %executable.display(),
            "launching solver"
        );
        let started = Instant::now();
        let mut child = Command::new(&executable)
            .args(&self.args)
            .current_dir(working_dir)
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .spawn()
            .map_err(launch_err)?;

        let status = self.wait(&mut child, started)?;
        let exit = SolverExit {
            code: status.code(),
            elapsed: started.elapsed(),
        };
        if !exit.success() {
            warn!(workspace = %workspace.name(), code = ?exit.code, "solver exited abnormally");
        }
        debug!(
            workspace = %workspace.name(),
            elapsed_s = exit.elapsed.as_secs_f64(),
            "solver finished"
        );
        Ok(exit)
    }
}
