// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod report;
pub mod score;
pub mod textfix;
pub mod types;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::engine::{CoreRuntime, RunSummary, Runtime, RuntimeEvent, RuntimeOptions};
use crate::exec::RealExecutorBackend;
use crate::report::ConsolePrinter;
use crate::score::{JsonFileStore, ScoreLedger};
use crate::types::{StepId, StepSpec};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - project-root location
/// - core / runtime / executor
/// - score ledger
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<RunSummary> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let project_root = resolve_project_root(&args, &cfg)?;
    info!(root = %project_root.display(), "project root");

    let steps = plan_steps(&args, &cfg, &project_root);

    if args.dry_run {
        print_dry_run(&cfg, &project_root, &steps);
        return Ok(RunSummary {
            reports: Vec::new(),
            success: true,
            halted: false,
        });
    }

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    // Process executor backend (real implementation in production).
    let executor = RealExecutorBackend::new(rt_tx.clone(), project_root.clone());

    // Score ledger, backed by a JSON file under the project root.
    let ledger = if args.no_score {
        None
    } else {
        let store = JsonFileStore::new(project_root.join(&cfg.config.score_file));
        Some(ScoreLedger::open(Box::new(store))?)
    };

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    // Seed the run before starting the loop.
    rt_tx.send(RuntimeEvent::StepsRequested { steps }).await?;

    let options = RuntimeOptions {
        exit_when_idle: true,
    };

    let specs: BTreeMap<StepId, StepSpec> =
        StepId::ALL.iter().map(|&id| (id, cfg.spec(id))).collect();

    // Construct the pure core runtime (single source of truth for semantics)
    // and the async IO shell around it.
    let core = CoreRuntime::new(specs, options);
    let runtime = Runtime::new(
        core,
        rt_rx,
        executor,
        ledger,
        Box::new(ConsolePrinter::new()),
    );
    let summary = runtime.run().await?;
    Ok(summary)
}

/// Resolve the project root: CLI flag, then config, then walk up from the
/// current directory looking for `package.json`, then the current directory.
fn resolve_project_root(args: &CliArgs, cfg: &ConfigFile) -> Result<PathBuf> {
    if let Some(ref root) = args.project_root {
        return Ok(PathBuf::from(root));
    }
    if let Some(ref root) = cfg.config.project_root {
        return Ok(PathBuf::from(root));
    }

    let cwd = std::env::current_dir()?;
    Ok(locate_project_root(&cwd))
}

/// Walk up from `start` looking for a directory containing `package.json`.
/// Falls back to `start` itself when no marker is found.
fn locate_project_root(start: &Path) -> PathBuf {
    let mut dir = start;
    loop {
        if dir.join("package.json").is_file() {
            return dir.to_path_buf();
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => return start.to_path_buf(),
        }
    }
}

/// Work out which steps to run, in order.
///
/// - `--step` picks an explicit subset in the given order.
/// - Otherwise the full pipeline runs, except that steps with a satisfied
///   `skip_if_present` marker (the deps pre-flight when `node_modules`
///   already exists) are left out.
fn plan_steps(args: &CliArgs, cfg: &ConfigFile, project_root: &Path) -> Vec<StepId> {
    if !args.step.is_empty() {
        return args.step.clone();
    }

    StepId::ALL
        .iter()
        .copied()
        .filter(|&id| {
            if let Some(ref marker) = cfg.step(id).skip_if_present
                && project_root.join(marker).exists()
            {
                debug!(step = %id, marker, "skip marker present; leaving step out");
                return false;
            }
            true
        })
        .collect()
}

/// Simple dry-run output: print the resolved plan.
fn print_dry_run(cfg: &ConfigFile, project_root: &Path, steps: &[StepId]) {
    println!("questgate dry-run");
    println!("  project_root = {}", project_root.display());
    println!("  score_file = {}", cfg.config.score_file);
    println!();

    println!("steps ({}):", steps.len());
    for &id in steps {
        let step = cfg.step(id);
        println!("  - {id}");
        println!("      cmd: {}", step.cmd);
        println!("      timeout: {}s", step.timeout_secs);
        if step.critical {
            println!("      critical: true");
        }
        if step.xp > 0 {
            println!("      xp: {}", step.xp);
        }
    }

    debug!("dry-run complete (no execution)");
}
