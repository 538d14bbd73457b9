//! External solver execution
//!
//! A solver run is a child process rooted in a working directory the run
//! owns exclusively. [`Executor::prepare`] stages a run as a [`SolverRun`]
//! handle in `Pending`; [`SolverRun::start`] (or [`Executor::spawn`], which
//! combines the two) launches the child and moves it to `Running`, from
//! where it ends in one of {Succeeded, Failed, TimedOut, Cancelled}.
//! Waiting, cancelling and timing out all happen on the handle, so control
//! flow is visible at the call site. Runs are never retried here: a timed-out or failed
//! solver may have left half-written files behind, so the caller must
//! pick a fresh working directory before trying again.

use crate::formats::Dialect;
use crate::model::UnifiedFemModel;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use uuid::Uuid;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Name of the file solver stdout is captured to
pub const STDOUT_LOG: &str = "solver.out";
/// Name of the file solver stderr is captured to
pub const STDERR_LOG: &str = "solver.err";

/// Errors raised while running a solver
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("Could not start solver '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Solver exited with code {exit_code}: {detail}")]
    Failed { exit_code: i32, detail: String },

    #[error("Solver exceeded the time limit of {}s", .limit.as_secs_f64())]
    TimedOut { limit: Duration },

    #[error("Solver run was cancelled")]
    Cancelled,

    #[error("Solver exited cleanly but left no result artifact at {0}")]
    MissingArtifact(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Program and arguments used to invoke a solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverCommand {
    pub program: String,
    pub args: Vec<String>,
}

/// One runnable solver invocation: the command plus the artifact it is
/// expected to leave in the working directory
#[derive(Debug, Clone)]
pub struct SolverJob {
    pub command: SolverCommand,
    /// Result artifact path, relative to the working directory
    pub artifact: PathBuf,
}

impl SolverJob {
    /// Replace the command, keeping the artifact convention
    ///
    /// Used by tests to substitute a stub for the real solver, and by
    /// callers whose solver lives behind a wrapper script.
    pub fn with_command(mut self, program: impl Into<String>, args: Vec<String>) -> Self {
        self.command = SolverCommand {
            program: program.into(),
            args,
        };
        self
    }
}

/// Lifecycle of a solver run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Pending,
    Running,
    Succeeded,
    Failed,
    TimedOut,
    Cancelled,
}

/// Record of a run that reached `Succeeded`
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    /// Unique id of this run, also used in log messages
    pub run_id: Uuid,
    /// Absolute path of the result artifact
    pub artifact: PathBuf,
    /// Captured solver stdout
    pub stdout_log: PathBuf,
    /// Captured solver stderr
    pub stderr_log: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Runs solver jobs with a time limit
#[derive(Debug, Clone)]
pub struct Executor {
    timeout: Duration,
}

impl Default for Executor {
    fn default() -> Self {
        Executor::new()
    }
}

impl Executor {
    /// Executor with a one hour time limit
    pub fn new() -> Self {
        Executor {
            timeout: Duration::from_secs(3600),
        }
    }

    /// Executor with an explicit time limit
    pub fn with_timeout(timeout: Duration) -> Self {
        Executor { timeout }
    }

    /// Run a job to completion in the given working directory
    pub fn execute(
        &self,
        job: &SolverJob,
        working_dir: &Path,
    ) -> Result<ExecutionOutcome, ExecutionError> {
        self.spawn(job, working_dir)?.wait()
    }

    /// Stage a job as a run handle without launching the process
    pub fn prepare(&self, job: &SolverJob, working_dir: &Path) -> SolverRun {
        SolverRun {
            run_id: Uuid::new_v4(),
            command: job.command.clone(),
            working_dir: working_dir.to_path_buf(),
            child: None,
            state: RunState::Pending,
            deadline: Instant::now() + self.timeout,
            timeout: self.timeout,
            artifact: working_dir.join(&job.artifact),
            stdout_log: working_dir.join(STDOUT_LOG),
            stderr_log: working_dir.join(STDERR_LOG),
            started_at: Utc::now(),
        }
    }

    /// Stage a job and launch it immediately
    pub fn spawn(
        &self,
        job: &SolverJob,
        working_dir: &Path,
    ) -> Result<SolverRun, ExecutionError> {
        let mut run = self.prepare(job, working_dir);
        run.start()?;
        Ok(run)
    }
}

/// Handle of one solver run
#[derive(Debug)]
pub struct SolverRun {
    run_id: Uuid,
    command: SolverCommand,
    working_dir: PathBuf,
    child: Option<Child>,
    state: RunState,
    deadline: Instant,
    timeout: Duration,
    artifact: PathBuf,
    stdout_log: PathBuf,
    stderr_log: PathBuf,
    started_at: DateTime<Utc>,
}

impl SolverRun {
    /// Unique id of this run
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Current lifecycle state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Launch the child process, moving the run from `Pending` to
    /// `Running`; a no-op in any other state
    ///
    /// Stdout and stderr are redirected to `solver.out` and `solver.err`
    /// in the working directory, so a chatty solver can never block on a
    /// full pipe. Dropping a running handle without waiting kills the
    /// child. The timeout clock starts here.
    pub fn start(&mut self) -> Result<(), ExecutionError> {
        if self.state != RunState::Pending {
            return Ok(());
        }
        let stdout_file = File::create(&self.stdout_log)?;
        let stderr_file = File::create(&self.stderr_log)?;

        tracing::info!(
            "Run {}: starting '{} {}' in {}",
            self.run_id,
            self.command.program,
            self.command.args.join(" "),
            self.working_dir.display()
        );

        let child = Command::new(&self.command.program)
            .args(&self.command.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout_file))
            .stderr(Stdio::from(stderr_file))
            .spawn()
            .map_err(|source| ExecutionError::Spawn {
                program: self.command.program.clone(),
                source,
            })?;

        self.child = Some(child);
        self.state = RunState::Running;
        self.deadline = Instant::now() + self.timeout;
        self.started_at = Utc::now();
        Ok(())
    }

    /// Block until the process exits, the deadline passes, or waiting
    /// itself fails
    ///
    /// Starts the process first if the run is still `Pending`. A zero
    /// exit only counts as success once the expected artifact is found in
    /// the working directory; otherwise the run failed with
    /// [`ExecutionError::MissingArtifact`].
    pub fn wait(mut self) -> Result<ExecutionOutcome, ExecutionError> {
        if self.state == RunState::Pending {
            self.start()?;
        }
        let mut child = match self.child.take() {
            Some(child) => child,
            None => return Err(ExecutionError::Cancelled),
        };

        loop {
            if let Some(status) = child.try_wait()? {
                return self.finish(status.code().unwrap_or(-1), status.success());
            }
            if Instant::now() >= self.deadline {
                self.state = RunState::TimedOut;
                kill_and_reap(&mut child);
                tracing::warn!(
                    "Run {}: killed after exceeding the {}s time limit",
                    self.run_id,
                    self.timeout.as_secs_f64()
                );
                return Err(ExecutionError::TimedOut {
                    limit: self.timeout,
                });
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    /// Kill the process (if started) and mark the run cancelled
    pub fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            kill_and_reap(&mut child);
            self.state = RunState::Cancelled;
            tracing::info!("Run {}: cancelled", self.run_id);
        } else if self.state == RunState::Pending {
            self.state = RunState::Cancelled;
        }
    }

    fn finish(mut self, exit_code: i32, success: bool) -> Result<ExecutionOutcome, ExecutionError> {
        if !success {
            self.state = RunState::Failed;
            let detail = tail_of(&self.stderr_log);
            tracing::error!("Run {}: solver exited with code {}", self.run_id, exit_code);
            return Err(ExecutionError::Failed { exit_code, detail });
        }
        if !self.artifact.exists() {
            self.state = RunState::Failed;
            tracing::error!(
                "Run {}: solver exited cleanly but {} is missing",
                self.run_id,
                self.artifact.display()
            );
            return Err(ExecutionError::MissingArtifact(self.artifact.clone()));
        }
        self.state = RunState::Succeeded;
        let finished_at = Utc::now();
        tracing::info!(
            "Run {}: succeeded, artifact at {}",
            self.run_id,
            self.artifact.display()
        );
        Ok(ExecutionOutcome {
            run_id: self.run_id,
            artifact: self.artifact.clone(),
            stdout_log: self.stdout_log.clone(),
            stderr_log: self.stderr_log.clone(),
            started_at: self.started_at,
            finished_at,
        })
    }
}

impl Drop for SolverRun {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            kill_and_reap(&mut child);
            self.state = RunState::Cancelled;
        }
    }
}

/// Kill a child and reap it; errors mean the process already exited
fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Last few lines of a log file, for error messages
fn tail_of(path: &Path) -> String {
    const TAIL_BYTES: u64 = 2048;
    let text = File::open(path)
        .and_then(|mut file| {
            let len = file.metadata()?.len();
            if len > TAIL_BYTES {
                file.seek(SeekFrom::Start(len - TAIL_BYTES))?;
            }
            let mut buf = String::new();
            file.read_to_string(&mut buf)?;
            Ok(buf)
        })
        .unwrap_or_default();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        "no stderr output".to_string()
    } else {
        trimmed.to_string()
    }
}

/// An exclusively-owned working directory for one solver run
///
/// The directory and everything the solver wrote into it are removed on
/// drop. Retrying a failed run means creating a new workspace, never
/// reusing this one.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Fresh temporary working directory
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("fea-run-").tempdir()?;
        Ok(Workspace { dir })
    }

    /// Path of the working directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Keep the directory on disk instead of removing it on drop
    pub fn keep(self) -> PathBuf {
        self.dir.keep()
    }
}

/// Write a deck, run the solver and parse its results in one call
///
/// Convenience wrapper over the deck writer, [`Executor`] and result
/// reader for callers that do not need to intercept intermediate
/// artifacts. The deck and all solver output live in `working_dir`. The
/// dialect's run convention supplies the command; `solver` replaces it
/// when the solver lives behind a wrapper script or a test stub.
pub fn run_analysis(
    model: &UnifiedFemModel,
    dialect: Dialect,
    working_dir: &Path,
    timeout: Duration,
    solver: Option<SolverCommand>,
) -> anyhow::Result<crate::results::ResultsModel> {
    let deck_path = working_dir.join(dialect.deck_file_name(&model.name));
    dialect.write_deck(model, &deck_path)?;
    let mut job = dialect.solver_job(&deck_path)?;
    if let Some(command) = solver {
        job.command = command;
    }
    let outcome = Executor::with_timeout(timeout).execute(&job, working_dir)?;
    Ok(dialect.read_results(model, &outcome.artifact)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn stub_solver(dir: &Path, name: &str, script_body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", script_body)).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path.to_str().unwrap().to_string()
    }

    fn job(program: String) -> SolverJob {
        SolverJob {
            command: SolverCommand {
                program,
                args: Vec::new(),
            },
            artifact: PathBuf::from("result.dat"),
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_successful_run_locates_artifact() {
        let workspace = Workspace::new().unwrap();
        let program = stub_solver(workspace.path(), "solver.sh", "echo done > result.dat");
        let outcome = Executor::new()
            .execute(&job(program), workspace.path())
            .unwrap();
        assert!(outcome.artifact.ends_with("result.dat"));
        assert!(outcome.artifact.exists());
        assert!(outcome.finished_at >= outcome.started_at);
    }

    #[test]
    #[cfg(unix)]
    fn test_zero_exit_without_artifact_fails() {
        let workspace = Workspace::new().unwrap();
        let program = stub_solver(workspace.path(), "solver.sh", "echo done");
        let err = Executor::new()
            .execute(&job(program), workspace.path())
            .unwrap_err();
        assert!(matches!(err, ExecutionError::MissingArtifact(_)));
    }

    #[test]
    #[cfg(unix)]
    fn test_nonzero_exit_reports_stderr() {
        let workspace = Workspace::new().unwrap();
        let program = stub_solver(
            workspace.path(),
            "solver.sh",
            "echo 'singular stiffness matrix' >&2; exit 3",
        );
        let err = Executor::new()
            .execute(&job(program), workspace.path())
            .unwrap_err();
        match err {
            ExecutionError::Failed { exit_code, detail } => {
                assert_eq!(exit_code, 3);
                assert!(detail.contains("singular stiffness matrix"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_timeout_kills_child() {
        let workspace = Workspace::new().unwrap();
        let program = stub_solver(
            workspace.path(),
            "solver.sh",
            "sleep 10; echo done > result.dat",
        );
        let started = Instant::now();
        let err = Executor::with_timeout(Duration::from_secs(1))
            .execute(&job(program), workspace.path())
            .unwrap_err();
        assert!(matches!(err, ExecutionError::TimedOut { .. }));
        // The child was killed well before its 10 second sleep finished.
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!workspace.path().join("result.dat").exists());
    }

    #[test]
    #[cfg(unix)]
    fn test_prepared_run_starts_on_wait() {
        let workspace = Workspace::new().unwrap();
        let program = stub_solver(workspace.path(), "solver.sh", "echo done > result.dat");
        let run = Executor::new().prepare(&job(program), workspace.path());
        assert_eq!(run.state(), RunState::Pending);
        let outcome = run.wait().unwrap();
        assert!(outcome.artifact.exists());
    }

    #[test]
    #[cfg(unix)]
    fn test_explicit_start_transition() {
        let workspace = Workspace::new().unwrap();
        let program = stub_solver(workspace.path(), "solver.sh", "echo done > result.dat");
        let mut run = Executor::new().prepare(&job(program), workspace.path());
        assert_eq!(run.state(), RunState::Pending);
        run.start().unwrap();
        assert_eq!(run.state(), RunState::Running);
        run.wait().unwrap();
    }

    #[test]
    fn test_cancel_before_start() {
        let workspace = Workspace::new().unwrap();
        let mut run = Executor::new().prepare(
            &job("never-started".to_string()),
            workspace.path(),
        );
        run.cancel();
        assert_eq!(run.state(), RunState::Cancelled);
        assert!(matches!(run.wait(), Err(ExecutionError::Cancelled)));
    }

    #[test]
    #[cfg(unix)]
    fn test_cancel_terminates_run() {
        let workspace = Workspace::new().unwrap();
        let program = stub_solver(workspace.path(), "solver.sh", "sleep 10");
        let mut run = Executor::new().spawn(&job(program), workspace.path()).unwrap();
        assert_eq!(run.state(), RunState::Running);
        run.cancel();
        assert_eq!(run.state(), RunState::Cancelled);
        assert!(matches!(run.wait(), Err(ExecutionError::Cancelled)));
    }

    #[test]
    #[cfg(unix)]
    fn test_missing_program_is_spawn_error() {
        let workspace = Workspace::new().unwrap();
        let err = Executor::new()
            .execute(&job("no-such-solver-binary".to_string()), workspace.path())
            .unwrap_err();
        assert!(matches!(err, ExecutionError::Spawn { .. }));
    }

    #[test]
    #[cfg(unix)]
    fn test_stdout_captured_to_log() {
        let workspace = Workspace::new().unwrap();
        let program = stub_solver(
            workspace.path(),
            "solver.sh",
            "echo 'iteration 1 converged'; echo done > result.dat",
        );
        let outcome = Executor::new()
            .execute(&job(program), workspace.path())
            .unwrap();
        let log = std::fs::read_to_string(outcome.stdout_log).unwrap();
        assert!(log.contains("iteration 1 converged"));
    }
}
