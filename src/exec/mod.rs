// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the step commands, using
//! `tokio::process::Command`, and reporting back to the orchestration
//! runtime via `RuntimeEvent`s.
//!
//! - [`backend`] provides the `ExecutorBackend` trait and a concrete
//!   `RealExecutorBackend` that the runtime uses in production, and which
//!   tests can replace with a fake implementation.
//! - [`runner`] owns the executor loop and individual step execution:
//!   working-directory scoping, timeout enforcement and outcome
//!   classification.

pub mod backend;
pub mod runner;

pub use backend::{ExecutorBackend, RealExecutorBackend};
pub use runner::spawn_executor;
