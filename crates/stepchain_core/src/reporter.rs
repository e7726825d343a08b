//! Notification sinks for step results.
//!
//! The runner calls a [`Reporter`] after every executed step, after the inner
//! call of a timed step, and when a chain is halted with a reason. Skipped
//! steps are never reported.

use console::style;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};

/// Receives pass/fail, timing and halt notifications.
///
/// Methods take `&self` so one reporter can be shared between a runner and the
/// nested runners created from its failure handlers.
pub trait Reporter: Send + Sync {
    /// A step body ran and returned `success`.
    fn step_finished(&self, name: &str, success: bool);

    /// A timed step completed after `elapsed`.
    fn step_timed(&self, name: &str, elapsed: Duration);

    /// The chain was halted with a non-empty `reason`.
    fn halted(&self, reason: &str);
}

/// Writes one line per notification.
///
/// ```text
/// OK power on
/// FAIL load program
/// load program took 1.2ms
/// HALT division by zero
/// ```
pub struct ConsoleReporter<W = io::Stdout> {
    out: Mutex<W>,
    color: bool,
    show_timings: bool,
}

impl ConsoleReporter<io::Stdout> {
    /// Creates a reporter writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl Default for ConsoleReporter<io::Stdout> {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    /// Creates a reporter writing to `out`, uncolored, with timings shown.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            color: false,
            show_timings: true,
        }
    }

    /// Enables or disables styled OK/FAIL/HALT labels.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Enables or disables timing lines.
    pub fn with_timings(mut self, show_timings: bool) -> Self {
        self.show_timings = show_timings;
        self
    }

    /// Consumes the reporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn label(&self, text: &'static str, ok: bool) -> String {
        if !self.color {
            return text.to_string();
        }
        let styled = style(text).force_styling(true).bold();
        if ok {
            styled.green().to_string()
        } else {
            styled.red().to_string()
        }
    }

    fn write_line(&self, line: &str) {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = writeln!(out, "{}", line).and_then(|()| out.flush()) {
            warn!("failed to write report line: {}", e);
        }
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn step_finished(&self, name: &str, success: bool) {
        let label = if success {
            self.label("OK", true)
        } else {
            self.label("FAIL", false)
        };
        self.write_line(&format!("{} {}", label, name));
    }

    fn step_timed(&self, name: &str, elapsed: Duration) {
        if self.show_timings {
            self.write_line(&format!("{} took {:?}", name, elapsed));
        }
    }

    fn halted(&self, reason: &str) {
        let label = self.label("HALT", false);
        self.write_line(&format!("{} {}", label, reason));
    }
}

/// Routes notifications into `tracing` events under the `stepchain` target.
#[derive(Debug, Clone, Copy)]
pub struct TracingReporter {
    show_timings: bool,
}

impl TracingReporter {
    pub fn new() -> Self {
        Self { show_timings: true }
    }

    /// Enables or disables timing events.
    pub fn with_timings(mut self, show_timings: bool) -> Self {
        self.show_timings = show_timings;
        self
    }
}

impl Default for TracingReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TracingReporter {
    fn step_finished(&self, name: &str, success: bool) {
        if success {
            info!(target: "stepchain", step = name, "step passed");
        } else {
            warn!(target: "stepchain", step = name, "step failed");
        }
    }

    fn step_timed(&self, name: &str, elapsed: Duration) {
        if self.show_timings {
            info!(
                target: "stepchain",
                step = name,
                elapsed_us = elapsed.as_micros() as u64,
                "step timed"
            );
        }
    }

    fn halted(&self, reason: &str) {
        warn!(target: "stepchain", reason, "chain halted");
    }
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuietReporter;

impl Reporter for QuietReporter {
    fn step_finished(&self, _name: &str, _success: bool) {}

    fn step_timed(&self, _name: &str, _elapsed: Duration) {}

    fn halted(&self, _reason: &str) {}
}
