//! stepchain core library
//!
//! A sequential step engine for testing one long-lived fixture across a chain
//! of dependent operations, without rebuilding the fixture between steps.
//!
//! - A **first step** re-opens the chain, runs the fixture's `cleanup` then
//!   `setup`, and runs its body.
//! - A **next step** runs its body against the fixture as earlier steps left
//!   it, or is silently skipped once the chain has been halted.
//! - **halt** cleans the fixture up immediately and turns the rest of the
//!   chain into no-ops.
//! - **otherwise** attaches a handler that runs only when a step failed.
//!
//! # Quick Start
//!
//! ```
//! use stepchain_core::{ChainRunner, ConsoleReporter, Fixture};
//!
//! #[derive(Default)]
//! struct Counter {
//!     value: u32,
//! }
//!
//! impl Fixture for Counter {
//!     fn cleanup(&mut self) {
//!         self.value = 0;
//!     }
//! }
//!
//! let mut runner = ChainRunner::new(Counter::default())
//!     .with_reporter(ConsoleReporter::new(Vec::new()));
//!
//! runner.first_step("starts at zero", |c| c.value == 0);
//! runner.next_step("increments", |c| {
//!     c.value += 1;
//!     c.value == 1
//! });
//! runner
//!     .next_step("increments again", |c| {
//!         c.value += 1;
//!         c.value == 3
//!     })
//!     .otherwise(|runner| runner.halt("counter drifted"));
//!
//! // The failure handler halted the chain, so this body never runs.
//! let outcome = runner.next_step("never runs", |_| false).into_outcome();
//! assert!(outcome.skipped && outcome.success);
//! assert_eq!(runner.stats().failed, 1);
//! ```
//!
//! # Timing
//!
//! The `timed_*` variants measure the whole step, setup included, with the
//! runner's [`Clock`] and report the duration separately:
//!
//! ```
//! use stepchain_core::{ChainRunner, QuietReporter};
//!
//! let mut runner = ChainRunner::new(()).with_reporter(QuietReporter);
//! let outcome = runner.timed_first_step("noop", |_| true).into_outcome();
//! assert!(outcome.elapsed.is_some());
//! ```

mod config;
mod error;
mod fixture;
mod reporter;
mod runner;
mod timer;

pub use config::{Config, ReportConfig, ReporterKind, CONFIG_FILE_NAME};
pub use error::{Result, StepchainError};
pub use fixture::{Fixture, Hooks};
pub use reporter::{ConsoleReporter, QuietReporter, Reporter, TracingReporter};
pub use runner::{ChainRunner, ChainState, ChainStats, StepContext, StepOutcome, StepResult};
pub use timer::{Clock, SystemClock, Timer};
