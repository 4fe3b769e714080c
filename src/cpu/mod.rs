//! CPU emulation for the LS-8 computer.
//!
//! This module implements the complete LS-8 architecture:
//! - 256 bytes of memory
//! - 8 general-purpose registers, R7 doubling as the stack pointer
//! - a 12-instruction set with ALU, stack, and subroutine support

pub mod memory;
pub mod registers;
pub mod alu;
pub mod stack;
pub mod decode;
pub mod execute;

pub use memory::{Addr, Memory, MemoryError, MEMORY_SIZE};
pub use registers::{Reg, Registers, NUM_REGISTERS, STACK_ORIGIN};
pub use alu::AluError;
pub use stack::StackError;
pub use decode::{decode, encode, DecodeError, Instruction, Opcode};
pub use execute::{Cpu, CpuError, CpuState};
