//! Sequencing of first and next steps over one long-lived fixture.
//!
//! A chain starts with [`ChainRunner::first_step`], which resets the fixture
//! and re-opens the chain, and continues with any number of
//! [`ChainRunner::next_step`] calls that observe the fixture as the previous
//! steps left it. [`ChainRunner::halt`] abandons the rest of the chain: the
//! fixture is cleaned up at once and every later next step is skipped.

use crate::config::Config;
use crate::fixture::Fixture;
use crate::reporter::{ConsoleReporter, Reporter};
use crate::timer::{Clock, Timer};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Where a runner is in its current chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainState {
    /// No first step has run yet.
    #[default]
    Fresh,
    /// A first step has run and the chain has not been halted.
    Running,
    /// The chain was halted; next steps are skipped until the next first step.
    Halted,
}

/// Step counters accumulated over the lifetime of a runner. Counters saturate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChainStats {
    /// Steps whose body returned `true`.
    pub passed: u32,
    /// Steps whose body returned `false`.
    pub failed: u32,
    /// Next steps that were not run because the chain could not continue.
    pub skipped: u32,
    /// Calls to `halt`.
    pub halts: u32,
}

impl ChainStats {
    /// Number of step bodies that actually ran.
    pub fn executed(&self) -> u32 {
        self.passed.saturating_add(self.failed)
    }

    /// True when no executed step failed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for ChainStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passed, {} failed, {} skipped, {} halted",
            self.passed, self.failed, self.skipped, self.halts
        )
    }
}

/// The record of one step invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Step name as given by the author.
    pub name: String,
    /// Body result; `true` for skipped steps.
    pub success: bool,
    /// The body was not run because the chain could not continue.
    pub skipped: bool,
    /// Time spent in a timed step, including setup and cleanup for a first step.
    pub elapsed: Option<Duration>,
}

impl StepOutcome {
    fn executed(name: &str, success: bool) -> Self {
        Self {
            name: name.to_string(),
            success,
            skipped: false,
            elapsed: None,
        }
    }

    fn skipped(name: &str) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            skipped: true,
            elapsed: None,
        }
    }
}

/// Runs chains of dependent steps against one fixture.
///
/// ```
/// use stepchain_core::{ChainRunner, Fixture, QuietReporter};
///
/// #[derive(Default)]
/// struct Lamp {
///     on: bool,
/// }
///
/// impl Fixture for Lamp {
///     fn cleanup(&mut self) {
///         self.on = false;
///     }
/// }
///
/// let mut runner = ChainRunner::new(Lamp::default()).with_reporter(QuietReporter);
///
/// runner.first_step("switch on", |lamp| {
///     lamp.on = true;
///     lamp.on
/// });
/// let outcome = runner
///     .next_step("still on", |lamp| lamp.on)
///     .otherwise(|runner| runner.halt("lamp went dark"));
///
/// assert!(outcome.success);
/// assert!(runner.fixture().on);
/// ```
pub struct ChainRunner<F> {
    fixture: F,
    state: ChainState,
    reporter: Arc<dyn Reporter>,
    timer: Timer,
    stats: ChainStats,
}

impl<F: Fixture> ChainRunner<F> {
    /// Creates a runner over `fixture` reporting to stdout and timing with the
    /// system clock. The chain starts [`Fresh`](ChainState::Fresh).
    pub fn new(fixture: F) -> Self {
        Self {
            fixture,
            state: ChainState::Fresh,
            reporter: Arc::new(ConsoleReporter::stdout()),
            timer: Timer::default(),
            stats: ChainStats::default(),
        }
    }

    /// Creates a runner whose reporter is built from `config`.
    pub fn from_config(fixture: F, config: &Config) -> Self {
        Self::new(fixture).with_shared_reporter(config.build_reporter())
    }

    /// Replaces the reporter.
    pub fn with_reporter(self, reporter: impl Reporter + 'static) -> Self {
        self.with_shared_reporter(Arc::new(reporter))
    }

    /// Replaces the reporter with one that may also be held elsewhere.
    pub fn with_shared_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Replaces the clock used by timed steps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.timer = Timer::new(Arc::new(clock));
        self
    }

    /// Starts a chain: re-opens it, cleans up, sets up, then runs `body`.
    ///
    /// The step is reported whatever the previous state was. A panic in
    /// `body` propagates to the caller without being reported.
    pub fn first_step<B>(&mut self, name: &str, body: B) -> StepResult<'_, F>
    where
        B: FnOnce(&mut StepContext<'_, F>) -> bool,
    {
        let outcome = self.run_first(name, body);
        StepResult::new(self, outcome)
    }

    /// [`first_step`](Self::first_step), also reporting how long it took.
    pub fn timed_first_step<B>(&mut self, name: &str, body: B) -> StepResult<'_, F>
    where
        B: FnOnce(&mut StepContext<'_, F>) -> bool,
    {
        let outcome = self.timed(name, |runner| runner.run_first(name, body));
        StepResult::new(self, outcome)
    }

    /// Continues the chain with `body`, unless the chain cannot continue.
    ///
    /// When the runner is fresh or halted the body is not run, nothing is
    /// reported, and the returned result is a successful, skipped one.
    pub fn next_step<B>(&mut self, name: &str, body: B) -> StepResult<'_, F>
    where
        B: FnOnce(&mut StepContext<'_, F>) -> bool,
    {
        let outcome = self.run_next(name, body);
        StepResult::new(self, outcome)
    }

    /// [`next_step`](Self::next_step), also reporting how long it took.
    ///
    /// The timing is reported even when the step is skipped.
    pub fn timed_next_step<B>(&mut self, name: &str, body: B) -> StepResult<'_, F>
    where
        B: FnOnce(&mut StepContext<'_, F>) -> bool,
    {
        let outcome = self.timed(name, |runner| runner.run_next(name, body));
        StepResult::new(self, outcome)
    }

    /// Abandons the rest of the chain.
    ///
    /// Cleans up the fixture immediately and reports `reason` unless it is
    /// empty. Safe to call repeatedly.
    pub fn halt(&mut self, reason: &str) {
        trace!("cleanup on halt");
        self.fixture.cleanup();
        if !reason.is_empty() {
            self.reporter.halted(reason);
        }
        debug!(reason, previous = ?self.state, "chain halted");
        self.stats.halts = self.stats.halts.saturating_add(1);
        self.state = ChainState::Halted;
    }

    /// [`halt`](Self::halt) without a message.
    pub fn halt_silently(&mut self) {
        self.halt("");
    }

    /// Creates a runner over the same fixture with the same reporter and
    /// clock, but its own chain state and statistics.
    ///
    /// Meant for failure handlers that want to drive a recovery chain without
    /// touching the state of the chain that failed.
    pub fn nested(&mut self) -> ChainRunner<&mut F> {
        ChainRunner {
            fixture: &mut self.fixture,
            state: ChainState::Fresh,
            reporter: Arc::clone(&self.reporter),
            timer: self.timer.clone(),
            stats: ChainStats::default(),
        }
    }

    /// True while next steps will run.
    pub fn may_continue(&self) -> bool {
        self.state == ChainState::Running
    }

    /// Current chain state.
    pub fn state(&self) -> ChainState {
        self.state
    }

    /// Counters accumulated since the runner was created.
    pub fn stats(&self) -> ChainStats {
        self.stats
    }

    /// The reporter receiving step notifications.
    pub fn reporter(&self) -> &Arc<dyn Reporter> {
        &self.reporter
    }

    pub fn fixture(&self) -> &F {
        &self.fixture
    }

    pub fn fixture_mut(&mut self) -> &mut F {
        &mut self.fixture
    }

    /// Consumes the runner and hands the fixture back without cleaning it up.
    pub fn into_fixture(self) -> F {
        self.fixture
    }

    fn run_first<B>(&mut self, name: &str, body: B) -> StepOutcome
    where
        B: FnOnce(&mut StepContext<'_, F>) -> bool,
    {
        debug!(step = name, previous = ?self.state, "starting chain");
        self.state = ChainState::Running;
        trace!("cleanup before first step");
        self.fixture.cleanup();
        trace!("setup");
        self.fixture.setup();
        self.execute(name, body)
    }

    fn run_next<B>(&mut self, name: &str, body: B) -> StepOutcome
    where
        B: FnOnce(&mut StepContext<'_, F>) -> bool,
    {
        if !self.may_continue() {
            debug!(step = name, state = ?self.state, "skipping step");
            self.stats.skipped = self.stats.skipped.saturating_add(1);
            return StepOutcome::skipped(name);
        }
        self.execute(name, body)
    }

    fn execute<B>(&mut self, name: &str, body: B) -> StepOutcome
    where
        B: FnOnce(&mut StepContext<'_, F>) -> bool,
    {
        let success = body(&mut StepContext { runner: &mut *self });
        if success {
            self.stats.passed = self.stats.passed.saturating_add(1);
        } else {
            self.stats.failed = self.stats.failed.saturating_add(1);
        }
        debug!(step = name, success, "step finished");
        self.reporter.step_finished(name, success);
        StepOutcome::executed(name, success)
    }

    fn timed<R>(&mut self, name: &str, run: R) -> StepOutcome
    where
        R: FnOnce(&mut Self) -> StepOutcome,
    {
        let timer = self.timer.clone();
        let (outcome, elapsed) = timer.measure(|| run(self));
        self.reporter.step_timed(name, elapsed);
        StepOutcome {
            elapsed: Some(elapsed),
            ..outcome
        }
    }
}

impl<F: fmt::Debug> fmt::Debug for ChainRunner<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainRunner")
            .field("fixture", &self.fixture)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// What a step body sees: the fixture, and the ability to halt the chain.
///
/// Dereferences to the fixture.
pub struct StepContext<'r, F> {
    runner: &'r mut ChainRunner<F>,
}

impl<F: Fixture> StepContext<'_, F> {
    pub fn fixture(&self) -> &F {
        &self.runner.fixture
    }

    pub fn fixture_mut(&mut self) -> &mut F {
        &mut self.runner.fixture
    }

    /// Halts the chain from inside the running step. See [`ChainRunner::halt`].
    pub fn halt(&mut self, reason: &str) {
        self.runner.halt(reason);
    }

    pub fn halt_silently(&mut self) {
        self.runner.halt_silently();
    }

    /// Whether later next steps will run.
    pub fn may_continue(&self) -> bool {
        self.runner.may_continue()
    }

    /// Unwraps `result`, or halts the chain with the error message.
    ///
    /// ```
    /// # use stepchain_core::{ChainRunner, QuietReporter};
    /// let mut runner = ChainRunner::new(()).with_reporter(QuietReporter);
    /// runner.first_step("parse", |step| {
    ///     step.halt_on_err("x".parse::<u8>()).is_some()
    /// });
    /// assert!(!runner.may_continue());
    /// ```
    pub fn halt_on_err<T, E: fmt::Display>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.halt(&e.to_string());
                None
            }
        }
    }
}

impl<F> Deref for StepContext<'_, F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.runner.fixture
    }
}

impl<F> DerefMut for StepContext<'_, F> {
    fn deref_mut(&mut self) -> &mut F {
        &mut self.runner.fixture
    }
}

/// Result handle of one step, bound to the runner that ran it.
pub struct StepResult<'r, F> {
    runner: &'r mut ChainRunner<F>,
    outcome: StepOutcome,
}

impl<'r, F: Fixture> StepResult<'r, F> {
    fn new(runner: &'r mut ChainRunner<F>, outcome: StepOutcome) -> Self {
        Self { runner, outcome }
    }

    pub fn name(&self) -> &str {
        &self.outcome.name
    }

    pub fn success(&self) -> bool {
        self.outcome.success
    }

    pub fn skipped(&self) -> bool {
        self.outcome.skipped
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.outcome.elapsed
    }

    pub fn outcome(&self) -> &StepOutcome {
        &self.outcome
    }

    pub fn into_outcome(self) -> StepOutcome {
        self.outcome
    }

    /// Runs `handler` if, and only if, this step failed.
    ///
    /// The handler gets the runner that ran the step: it may inspect the
    /// fixture, [`halt`](ChainRunner::halt) the chain, or drive a
    /// [`nested`](ChainRunner::nested) chain. The chain state is left alone
    /// otherwise.
    pub fn otherwise<H>(self, handler: H) -> StepOutcome
    where
        H: FnOnce(&mut ChainRunner<F>),
    {
        if !self.outcome.success {
            debug!(step = %self.outcome.name, "running failure handler");
            handler(self.runner);
        }
        self.outcome
    }
}

impl<F> fmt::Debug for StepResult<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepResult")
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}
