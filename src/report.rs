// src/report.rs

//! Presentation sinks.
//!
//! The runtime pushes step and ledger events into a [`ResultSink`]; sinks
//! only consume, they never feed anything back into the engine. The
//! rendering here (status lines, previews, the summary box) is cosmetic and
//! not part of the orchestration contract — automation should key off the
//! batch exit code instead.

use std::io::IsTerminal;

use crate::engine::RunSummary;
use crate::score::LedgerEvent;
use crate::textfix;
use crate::types::{StepReport, StepSpec, StepStatus};

const PREVIEW_CHARS: usize = 50;

const GREEN: &str = "\x1b[92m";
const RED: &str = "\x1b[91m";
const YELLOW: &str = "\x1b[93m";
const CYAN: &str = "\x1b[96m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Consumer of engine and ledger events. All methods default to no-ops so
/// sinks implement only what they present.
pub trait ResultSink: Send {
    fn step_started(&mut self, _spec: &StepSpec) {}
    fn step_finished(&mut self, _report: &StepReport) {}
    fn ledger_event(&mut self, _event: &LedgerEvent) {}
    fn run_finished(&mut self, _summary: &RunSummary) {}
}

/// Sink that presents nothing. Used when the caller only wants the
/// `RunSummary` (tests, embedding).
#[derive(Debug, Default)]
pub struct NullSink;

impl ResultSink for NullSink {}

/// Console printer for the batch CLI.
#[derive(Debug)]
pub struct ConsolePrinter {
    color: bool,
}

impl ConsolePrinter {
    pub fn new() -> Self {
        Self {
            color: std::io::stdout().is_terminal(),
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

impl Default for ConsolePrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultSink for ConsolePrinter {
    fn step_started(&mut self, spec: &StepSpec) {
        println!(
            "{} {} ({})",
            self.paint(CYAN, ">>"),
            spec.id.label(),
            spec.cmd
        );
    }

    fn step_finished(&mut self, report: &StepReport) {
        let (code, tag) = match report.status {
            StepStatus::Success => (GREEN, "PASS"),
            StepStatus::Failure => (RED, "FAIL"),
            StepStatus::Warning => (YELLOW, "WARN"),
        };
        println!(
            "   {} {} ({:.2}s)",
            self.paint(code, tag),
            report.id.label(),
            report.duration_secs
        );

        let detail = if report.is_success() {
            &report.stdout
        } else {
            &report.stderr
        };
        if let Some(line) = preview(detail) {
            println!("      {line}");
        }
    }

    fn ledger_event(&mut self, event: &LedgerEvent) {
        match event {
            LedgerEvent::LevelUp { level } => {
                println!("{}", self.paint(BOLD, &format!("   LEVEL UP! You are now level {level}")));
            }
            LedgerEvent::AchievementUnlocked { id, reward } => {
                println!(
                    "{}",
                    self.paint(
                        BOLD,
                        &format!("   ACHIEVEMENT UNLOCKED: {id} (+{reward} XP)")
                    )
                );
            }
        }
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        if summary.reports.is_empty() {
            return;
        }

        println!("+{}+", "-".repeat(44));
        for report in &summary.reports {
            let (code, word) = match report.status {
                StepStatus::Success => (GREEN, "passed"),
                StepStatus::Failure => (RED, "FAILED"),
                StepStatus::Warning => (YELLOW, "warning"),
            };
            println!(
                "| {:<20} {:<21} |",
                report.id.label(),
                self.paint(code, word)
            );
        }
        println!("+{}+", "-".repeat(44));

        if summary.halted {
            println!("{}", self.paint(RED, "Run halted: critical step failed."));
        }
        if summary.success {
            println!("{}", self.paint(GREEN, "All checks passed."));
        } else {
            println!("{}", self.paint(RED, "Some checks failed."));
        }
    }
}

/// First non-empty line of `text`, de-mojibaked and truncated for display.
fn preview(text: &str) -> Option<String> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    let repaired = textfix::repair(line);
    Some(truncate_chars(&repaired, PREVIEW_CHARS))
}

/// Truncate to at most `max` characters, appending "..." when cut.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{cut}...")
    }
}
