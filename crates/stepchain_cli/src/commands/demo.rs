//! Demo chain against the toy CPU fixture.

use crate::cpu::{Cpu, Instruction};
use anyhow::{bail, Result};
use console::style;
use std::path::Path;
use std::sync::Arc;
use stepchain_core::{
    ChainRunner, ChainStats, Fixture, Reporter, ReporterKind, StepContext, StepResult,
};
use tracing::warn;

const EXPECTED: i64 = 21;

/// Run the demo chain.
pub fn run(dir: &Path, reporter: Option<ReporterKind>, fault: bool, timed: bool) -> Result<()> {
    let mut config = super::load_config(dir)?;
    if let Some(kind) = reporter {
        config.report.kind = kind;
    }

    let stats = run_chain(config.build_reporter(), fault, timed);
    println!();
    if stats.all_passed() {
        println!("{} {}", style("✓").green(), style(stats).green());
        Ok(())
    } else {
        println!("{} {}", style("×").red(), style(stats).red());
        bail!("{} step(s) failed", stats.failed)
    }
}

/// Drives the five demo steps against a fresh CPU, dividing by zero when
/// `fault` is set.
pub fn run_chain(reporter: Arc<dyn Reporter>, fault: bool, timed: bool) -> ChainStats {
    let divisor = if fault { 0 } else { 2 };
    let program = [
        Instruction::Load(5),
        Instruction::Mul(2),
        Instruction::Add(32),
        Instruction::Div(divisor),
    ];

    let mut runner = ChainRunner::new(Cpu::default()).with_shared_reporter(reporter);

    first(&mut runner, timed, "power on", |cpu| cpu.powered && cpu.acc == 0);

    next(&mut runner, timed, "load program", |cpu| {
        let loaded = cpu.load(&program);
        cpu.halt_on_err(loaded).is_some()
    });

    next(&mut runner, timed, "execute program", |cpu| match cpu.run() {
        Ok(_) => true,
        Err(fault) => {
            cpu.halt(&format!("cpu fault: {}", fault));
            false
        }
    });

    next(&mut runner, timed, "accumulator holds result", |cpu| {
        cpu.acc == EXPECTED
    })
    .otherwise(|runner| {
        let cpu = runner.fixture();
        warn!(acc = cpu.acc, pc = cpu.pc, expected = EXPECTED, "unexpected accumulator");
    });

    next(&mut runner, timed, "power off", |cpu| {
        cpu.cleanup();
        !cpu.powered
    });

    runner.fixture_mut().cleanup();
    runner.stats()
}

fn first<'r, B>(
    runner: &'r mut ChainRunner<Cpu>,
    timed: bool,
    name: &str,
    body: B,
) -> StepResult<'r, Cpu>
where
    B: FnOnce(&mut StepContext<'_, Cpu>) -> bool,
{
    if timed {
        runner.timed_first_step(name, body)
    } else {
        runner.first_step(name, body)
    }
}

fn next<'r, B>(
    runner: &'r mut ChainRunner<Cpu>,
    timed: bool,
    name: &str,
    body: B,
) -> StepResult<'r, Cpu>
where
    B: FnOnce(&mut StepContext<'_, Cpu>) -> bool,
{
    if timed {
        runner.timed_next_step(name, body)
    } else {
        runner.next_step(name, body)
    }
}
