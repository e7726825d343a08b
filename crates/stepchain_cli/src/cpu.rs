//! A toy accumulator CPU used as the demo fixture.

use std::fmt;
use stepchain_core::Fixture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Load(i64),
    Add(i64),
    Mul(i64),
    Div(i64),
}

/// Faults raised while executing a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CpuFault {
    PoweredOff,
    DivideByZero { pc: usize },
    Overflow { pc: usize },
}

impl fmt::Display for CpuFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PoweredOff => write!(f, "cpu is powered off"),
            Self::DivideByZero { pc } => write!(f, "division by zero at pc={}", pc),
            Self::Overflow { pc } => write!(f, "arithmetic overflow at pc={}", pc),
        }
    }
}

#[derive(Debug, Default)]
pub struct Cpu {
    pub powered: bool,
    pub acc: i64,
    pub pc: usize,
    pub program: Vec<Instruction>,
}

impl Cpu {
    pub fn load(&mut self, program: &[Instruction]) -> Result<(), CpuFault> {
        if !self.powered {
            return Err(CpuFault::PoweredOff);
        }
        self.program = program.to_vec();
        self.pc = 0;
        Ok(())
    }

    /// Executes the loaded program to the end and returns the accumulator.
    pub fn run(&mut self) -> Result<i64, CpuFault> {
        if !self.powered {
            return Err(CpuFault::PoweredOff);
        }
        while let Some(&instruction) = self.program.get(self.pc) {
            let pc = self.pc;
            self.acc = match instruction {
                Instruction::Load(value) => value,
                Instruction::Add(value) => self
                    .acc
                    .checked_add(value)
                    .ok_or(CpuFault::Overflow { pc })?,
                Instruction::Mul(value) => self
                    .acc
                    .checked_mul(value)
                    .ok_or(CpuFault::Overflow { pc })?,
                Instruction::Div(0) => return Err(CpuFault::DivideByZero { pc }),
                Instruction::Div(value) => self
                    .acc
                    .checked_div(value)
                    .ok_or(CpuFault::Overflow { pc })?,
            };
            self.pc += 1;
        }
        Ok(self.acc)
    }
}

impl Fixture for Cpu {
    fn setup(&mut self) {
        self.powered = true;
    }

    fn cleanup(&mut self) {
        self.powered = false;
        self.acc = 0;
        self.pc = 0;
        self.program.clear();
    }
}
