//! CPU execution engine for the LS-8.
//!
//! Implements the fetch-decode-execute cycle and all instruction behaviors.
//! Each handler advances the program counter by its own instruction width;
//! CALL and RET write the program counter directly instead.

use crate::cpu::alu::{self, AluError};
use crate::cpu::decode::{self, DecodeError, Instruction};
use crate::cpu::memory::{Addr, Memory, MemoryError};
use crate::cpu::registers::{Reg, Registers};
use crate::cpu::stack::{self, StackError};
use serde::{Serialize, Deserialize};
use std::io;
use thiserror::Error;

/// CPU execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuState {
    /// CPU is running normally.
    Running,
    /// CPU has halted (executed HLT instruction).
    Halted,
}

/// The LS-8 CPU.
///
/// A fault (bad opcode, address out of range, stack underflow, division
/// by zero) propagates out of [`step`](Cpu::step) as an error and leaves
/// the state at `Running`; only HLT moves the machine to `Halted`. A
/// faulted machine is not resumable, construct a fresh one to retry.
#[derive(Clone, Serialize, Deserialize)]
pub struct Cpu {
    /// CPU registers.
    pub regs: Registers,
    /// Main memory.
    pub mem: Memory,
    /// Program counter.
    pub pc: Addr,
    /// Current execution state.
    pub state: CpuState,
    /// Instruction count (for profiling).
    pub cycles: u64,
    /// Last executed instruction (for debugging).
    last_instr: Option<Instruction>,
}

impl Cpu {
    /// Create a new CPU with zeroed memory and boot-state registers.
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            pc: Addr::ZERO,
            state: CpuState::Running,
            cycles: 0,
            last_instr: None,
        }
    }

    /// Reset the CPU to initial state.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.mem.clear();
        self.pc = Addr::ZERO;
        self.state = CpuState::Running;
        self.cycles = 0;
        self.last_instr = None;
    }

    /// Load a program image at address 0.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), MemoryError> {
        self.mem.load_program(Addr::ZERO, program)
    }

    /// Execute a single instruction.
    ///
    /// PRN output goes to `out`. Returns the instruction that was
    /// executed, or an error.
    pub fn step(&mut self, out: &mut impl io::Write) -> Result<Instruction, CpuError> {
        if self.state != CpuState::Running {
            return Err(CpuError::NotRunning(self.state));
        }

        // Fetch and decode
        let instr = decode::decode(&self.mem, self.pc)?;

        // Execute
        self.execute(instr, out)?;

        // Update state
        self.cycles += 1;
        self.last_instr = Some(instr);

        Ok(instr)
    }

    /// Run until halt or error.
    ///
    /// Returns the number of instructions executed.
    pub fn run(&mut self, out: &mut impl io::Write) -> Result<u64, CpuError> {
        let start_cycles = self.cycles;

        while self.state == CpuState::Running {
            self.step(out)?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Run for at most `max_cycles` instructions.
    pub fn run_limited(
        &mut self,
        max_cycles: u64,
        out: &mut impl io::Write,
    ) -> Result<u64, CpuError> {
        let start_cycles = self.cycles;
        let limit = self.cycles + max_cycles;

        while self.state == CpuState::Running && self.cycles < limit {
            self.step(out)?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Execute a decoded instruction.
    fn execute(&mut self, instr: Instruction, out: &mut impl io::Write) -> Result<(), CpuError> {
        match instr {
            Instruction::Nop => {
                self.advance(1)?;
            }

            Instruction::Hlt => {
                self.state = CpuState::Halted;
                self.advance(1)?;
            }

            Instruction::Ldi { reg, value } => {
                self.regs.set(reg, value);
                self.advance(3)?;
            }

            Instruction::Prn { reg } => {
                let value = self.regs.get(reg);
                writeln!(out, "{}", value).map_err(|e| CpuError::Output(e.to_string()))?;
                self.advance(2)?;
            }

            Instruction::Add { reg_a, reg_b }
            | Instruction::Sub { reg_a, reg_b }
            | Instruction::Mul { reg_a, reg_b }
            | Instruction::Div { reg_a, reg_b } => {
                alu::apply(&mut self.regs, instr.opcode(), reg_a, reg_b)?;
                self.advance(3)?;
            }

            Instruction::Push { reg } => {
                let value = self.regs.get(reg);
                stack::push(&mut self.mem, &mut self.regs, value)?;
                self.advance(2)?;
            }

            Instruction::Pop { reg } => {
                let value = stack::pop(&self.mem, &mut self.regs)?;
                self.regs.set(reg, value);
                self.advance(2)?;
            }

            Instruction::Call { reg } => {
                // Return address is the instruction after CALL.
                let ret = self.pc.offset(2)?;
                stack::push(&mut self.mem, &mut self.regs, ret.value())?;
                self.pc = Addr::new(self.regs.get(reg));
            }

            Instruction::Ret => {
                let ret = stack::pop(&self.mem, &mut self.regs)?;
                self.pc = Addr::new(ret);
            }
        }

        Ok(())
    }

    /// Advance the program counter by `width` bytes.
    fn advance(&mut self, width: i16) -> Result<(), MemoryError> {
        self.pc = self.pc.offset(width)?;
        Ok(())
    }

    /// Get the last executed instruction.
    pub fn last_instruction(&self) -> Option<Instruction> {
        self.last_instr
    }

    /// Check if the CPU is halted.
    pub fn is_halted(&self) -> bool {
        self.state == CpuState::Halted
    }

    /// Check if the CPU is running.
    pub fn is_running(&self) -> bool {
        self.state == CpuState::Running
    }

    /// One-line machine state dump for debugging.
    ///
    /// Shows the program counter, the next three memory bytes, the
    /// mnemonic they decode to, and all eight registers, in hex:
    ///
    /// ```text
    /// TRACE: 00 | 82 00 08 | LDI  | 00 00 00 00 00 00 00 F4
    /// ```
    ///
    /// Bytes past the end of memory show as `--`, an undecodable
    /// opcode as `??`.
    pub fn trace(&self) -> String {
        use std::fmt::Write;

        let mut line = format!("TRACE: {:02X} |", self.pc.value());
        for delta in 0..3 {
            match self.pc.offset(delta) {
                Ok(addr) => {
                    let _ = write!(line, " {:02X}", self.mem.read(addr));
                }
                Err(_) => line.push_str(" --"),
            }
        }

        match decode::decode(&self.mem, self.pc) {
            Ok(instr) => {
                let _ = write!(line, " | {:<4}", instr.opcode().mnemonic());
            }
            Err(_) => line.push_str(" | ??  "),
        }

        line.push_str(" |");
        for reg in Reg::ALL {
            let _ = write!(line, " {:02X}", self.regs.get(reg));
        }
        line
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("state", &self.state)
            .field("pc", &self.pc)
            .field("cycles", &self.cycles)
            .field("regs", &self.regs)
            .finish()
    }
}

/// Errors that can occur during CPU execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("CPU not running: {0:?}")]
    NotRunning(CpuState),

    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Stack(#[from] StackError),

    #[error("ALU error: {0}")]
    Alu(#[from] AluError),

    #[error("output error: {0}")]
    Output(String),
}
