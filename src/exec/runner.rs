// src/exec/runner.rs

//! Individual step process runner.
//!
//! A step runs with the process working directory temporarily switched to
//! the project root. That mutation is process-global, so the whole
//! change/run/restore sequence is a critical section: a single static lock
//! guarantees at most one step process is in flight per questgate process.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, info, warn};

use crate::engine::RuntimeEvent;
use crate::types::{StepReport, StepSpec, StepStatus};

static WORKDIR_LOCK: Mutex<()> = Mutex::const_new(());

/// Spawn the background executor loop.
///
/// The returned `mpsc::Sender<StepSpec>` is what `RealExecutorBackend` uses
/// to forward dispatched steps. Steps are executed strictly one at a time,
/// in the order they arrive; the runtime only dispatches the next step after
/// the previous one's `StepCompleted` event, so the loop never builds up a
/// backlog in practice.
pub fn spawn_executor(
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    project_root: PathBuf,
) -> mpsc::Sender<StepSpec> {
    let (tx, mut rx) = mpsc::channel::<StepSpec>(16);

    tokio::spawn(async move {
        info!("executor loop started");
        while let Some(spec) = rx.recv().await {
            let report = execute(&spec, &project_root).await;
            if runtime_tx
                .send(RuntimeEvent::StepCompleted { report })
                .await
                .is_err()
            {
                warn!("runtime event channel closed; stopping executor loop");
                break;
            }
        }
        info!("executor loop finished (channel closed)");
    });

    tx
}

/// Run a single step command and classify the outcome.
///
/// This never fails: every way the command can go wrong is folded into a
/// `Failure` report.
///
/// - exit code 0 → `Success`, stdout/stderr captured;
/// - non-zero exit → `Failure`, captured stderr is the error detail;
/// - timeout → `Failure` with a synthetic "timeout expired" detail, the
///   child is killed and not awaited further;
/// - spawn error (missing toolchain) → `Failure` with the OS error message.
pub async fn execute(spec: &StepSpec, project_root: &Path) -> StepReport {
    let _guard = WORKDIR_LOCK.lock().await;

    info!(
        step = %spec.id,
        cmd = %spec.cmd,
        timeout_secs = spec.timeout.as_secs(),
        "starting step process"
    );

    let started = Instant::now();

    // Enter the project root for the duration of the run. The previous
    // directory is restored on every exit path when `workdir` drops.
    let workdir = match WorkdirGuard::enter(project_root) {
        Ok(guard) => guard,
        Err(err) => {
            return StepReport::new(
                spec.id,
                StepStatus::Failure,
                started.elapsed().as_secs_f64(),
                String::new(),
                err.to_string(),
            );
        }
    };

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&spec.cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&spec.cmd);
        c
    };

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let report = match tokio::time::timeout(spec.timeout, cmd.output()).await {
        Ok(Ok(output)) => {
            let code = output.status.code().unwrap_or(-1);
            let status = if output.status.success() {
                StepStatus::Success
            } else {
                StepStatus::Failure
            };

            info!(
                step = %spec.id,
                exit_code = code,
                success = output.status.success(),
                "step process exited"
            );

            StepReport::new(
                spec.id,
                status,
                started.elapsed().as_secs_f64(),
                String::from_utf8_lossy(&output.stdout).into_owned(),
                String::from_utf8_lossy(&output.stderr).into_owned(),
            )
        }
        Ok(Err(err)) => {
            error!(step = %spec.id, error = %err, "failed to run step process");
            StepReport::new(
                spec.id,
                StepStatus::Failure,
                started.elapsed().as_secs_f64(),
                String::new(),
                err.to_string(),
            )
        }
        Err(_) => {
            // Dropping the output future kills the child (kill_on_drop);
            // we do not wait for it beyond this point.
            warn!(
                step = %spec.id,
                timeout_secs = spec.timeout.as_secs(),
                "step process exceeded its timeout"
            );
            StepReport::new(
                spec.id,
                StepStatus::Failure,
                started.elapsed().as_secs_f64(),
                String::new(),
                format!("timeout expired after {}s", spec.timeout.as_secs()),
            )
        }
    };

    drop(workdir);
    report
}

/// RAII guard for the process working directory.
struct WorkdirGuard {
    original: PathBuf,
}

impl WorkdirGuard {
    fn enter(root: &Path) -> std::io::Result<Self> {
        let original = env::current_dir()?;
        env::set_current_dir(root)?;
        debug!(root = %root.display(), "entered project root");
        Ok(Self { original })
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        if let Err(err) = env::set_current_dir(&self.original) {
            error!(
                original = %self.original.display(),
                error = %err,
                "failed to restore working directory"
            );
        }
    }
}
