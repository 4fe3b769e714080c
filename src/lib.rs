//! # LS-8 Emulator
//!
//! An emulator of the LS-8, an 8-bit educational computer.
//!
//! The LS-8 has 256 bytes of memory, eight general-purpose registers
//! (R7 doubling as the stack pointer), and a twelve-instruction set
//! covering ALU arithmetic, register load/print, a downward-growing
//! stack, and subroutine call/return. The machine runs a fixed program
//! image until a HLT instruction, or until the first fault aborts the
//! run with a named error.

pub mod cpu;
pub mod image;

// Re-export commonly used types
pub use cpu::{Addr, Cpu, CpuError, CpuState, Instruction, Memory, Opcode, Reg, Registers};
pub use image::{load_image, parse_image, ImageError};
