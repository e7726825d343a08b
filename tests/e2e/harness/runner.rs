use super::assertions::Assertion;
use super::clock::MockClock;
use super::probe::Probe;
use super::recorder::Recorder;
use super::steps::{FailureAction, ScenarioStep, StepAction};
use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use stepchain_core::{ChainRunner, Fixture, StepContext, StepOutcome, StepResult};

/// Executes scenarios against a real ChainRunner
pub struct ScenarioRunner {
    chain: ChainRunner<Probe>,
    recorder: Arc<Recorder>,
    clock: MockClock,
    current_step: usize,
    body_runs: usize,
    failures_handled: usize,
    outcomes: Vec<StepOutcome>,
}

impl ScenarioRunner {
    /// Create a new runner over a fresh probe
    pub fn new() -> Self {
        let recorder = Arc::new(Recorder::default());
        let clock = MockClock::new();
        let chain = ChainRunner::new(Probe::default())
            .with_shared_reporter(recorder.clone())
            .with_clock(clock.as_clock());

        Self {
            chain,
            recorder,
            clock,
            current_step: 0,
            body_runs: 0,
            failures_handled: 0,
            outcomes: Vec::new(),
        }
    }

    /// Get current step number
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Execute all steps in sequence
    pub fn execute(&mut self, steps: &[ScenarioStep]) -> Result<()> {
        for (i, step) in steps.iter().enumerate() {
            self.current_step = i;
            self.execute_step(step)
                .with_context(|| format!("Step {}: {:?}", i, step))?;
        }
        Ok(())
    }

    /// Execute a single step
    fn execute_step(&mut self, step: &ScenarioStep) -> Result<()> {
        match step {
            ScenarioStep::First {
                name,
                action,
                timed,
                on_failure,
            } => self.handle_step(true, *timed, name, action, on_failure),
            ScenarioStep::Next {
                name,
                action,
                timed,
                on_failure,
            } => self.handle_step(false, *timed, name, action, on_failure),
            ScenarioStep::Halt { reason } => {
                self.chain.halt(reason);
                Ok(())
            }
            ScenarioStep::Cleanup => {
                self.chain.fixture_mut().cleanup();
                Ok(())
            }
            ScenarioStep::AdvanceClock { duration } => {
                self.clock.advance(*duration);
                Ok(())
            }
            ScenarioStep::Assert { assertion } => self.handle_assertion(assertion),
        }
    }

    fn handle_step(
        &mut self,
        first: bool,
        timed: bool,
        name: &str,
        action: &StepAction,
        on_failure: &FailureAction,
    ) -> Result<()> {
        let clock = &self.clock;
        let body_runs = &mut self.body_runs;
        let failures_handled = &mut self.failures_handled;

        let outcome = dispatch(&mut self.chain, first, timed, name, |step| {
            *body_runs += 1;
            action.apply(step, clock)
        })
        .otherwise(|chain| {
            *failures_handled += 1;
            on_failure.apply(chain);
        });

        self.outcomes.push(outcome);
        Ok(())
    }

    // ===== Assertion handlers =====

    fn handle_assertion(&self, assertion: &Assertion) -> Result<()> {
        let probe = self.chain.fixture();
        match assertion {
            Assertion::State(expected) => expect_eq("chain state", expected, &self.chain.state()),
            Assertion::MayContinue(expected) => {
                expect_eq("may_continue", expected, &self.chain.may_continue())
            }
            Assertion::Stats(expected) => expect_eq("stats", expected, &self.chain.stats()),
            Assertion::ProbeOn(expected) => expect_eq("probe.on", expected, &probe.on),
            Assertion::Counter(expected) => expect_eq("probe.counter", expected, &probe.counter),
            Assertion::Setups(expected) => expect_eq("setup calls", expected, &probe.setups),
            Assertion::Cleanups(expected) => expect_eq("cleanup calls", expected, &probe.cleanups),
            Assertion::Lifecycle(expected) => {
                expect_eq("lifecycle calls", expected, &probe.lifecycle)
            }
            Assertion::BodyRuns(expected) => expect_eq("body runs", expected, &self.body_runs),
            Assertion::FailuresHandled(expected) => {
                expect_eq("failure handler runs", expected, &self.failures_handled)
            }
            Assertion::LastOutcome { success, skipped } => {
                let last = self.last_outcome()?;
                expect_eq("last success", success, &last.success)?;
                expect_eq("last skipped", skipped, &last.skipped)
            }
            Assertion::LastElapsed(expected) => {
                expect_eq("last elapsed", expected, &self.last_outcome()?.elapsed)
            }
            Assertion::Reported(expected) => {
                expect_eq("reported events", expected, &self.recorder.events())
            }
            Assertion::ReportCount(expected) => {
                expect_eq("report count", expected, &self.recorder.events().len())
            }
            Assertion::Custom(check) => check(&self.chain),
        }
    }

    fn last_outcome(&self) -> Result<&StepOutcome> {
        self.outcomes
            .last()
            .ok_or_else(|| anyhow!("No step has run yet"))
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Routes to the runner entry point matching `first` and `timed`
fn dispatch<'r, B>(
    chain: &'r mut ChainRunner<Probe>,
    first: bool,
    timed: bool,
    name: &str,
    body: B,
) -> StepResult<'r, Probe>
where
    B: FnOnce(&mut StepContext<'_, Probe>) -> bool,
{
    match (first, timed) {
        (true, false) => chain.first_step(name, body),
        (true, true) => chain.timed_first_step(name, body),
        (false, false) => chain.next_step(name, body),
        (false, true) => chain.timed_next_step(name, body),
    }
}

fn expect_eq<T: PartialEq + std::fmt::Debug>(what: &str, expected: &T, actual: &T) -> Result<()> {
    if expected != actual {
        return Err(anyhow!(
            "Expected {} to be {:?}, got {:?}",
            what,
            expected,
            actual
        ));
    }
    Ok(())
}
