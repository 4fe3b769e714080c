//! Instruction decoder for the LS-8.
//!
//! Every instruction is one opcode byte followed by zero, one, or two
//! operand bytes. The opcode byte is laid out as `AABCDDDD`:
//!
//! - `AA`   number of operand bytes that follow
//! - `B`    set when the instruction is handled by the ALU
//! - `C`    set when the instruction writes the program counter
//! - `DDDD` instruction identifier
//!
//! [`Opcode`] is the full opcode table. Matches over it are exhaustive,
//! so adding an instruction is a compile-checked change everywhere the
//! table is consumed.

use crate::cpu::memory::{Addr, Memory, MemoryError};
use crate::cpu::registers::Reg;
use serde::{Serialize, Deserialize};
use std::fmt;
use thiserror::Error;

/// LS-8 opcodes, with their encoded byte values as discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opcode {
    /// No operation.
    Nop = 0b0000_0000,
    /// Halt execution.
    Hlt = 0b0000_0001,
    /// Return from subroutine.
    Ret = 0b0001_0001,
    /// Push a register's value onto the stack.
    Push = 0b0100_0101,
    /// Pop the top of the stack into a register.
    Pop = 0b0100_0110,
    /// Print a register's value in decimal.
    Prn = 0b0100_0111,
    /// Call the subroutine whose address a register holds.
    Call = 0b0101_0000,
    /// Load an immediate value into a register.
    Ldi = 0b1000_0010,
    /// ALU add.
    Add = 0b1010_0000,
    /// ALU subtract.
    Sub = 0b1010_0001,
    /// ALU multiply.
    Mul = 0b1010_0010,
    /// ALU divide.
    Div = 0b1010_0011,
}

impl Opcode {
    /// Every opcode, in byte order.
    pub const ALL: [Opcode; 12] = [
        Opcode::Nop,
        Opcode::Hlt,
        Opcode::Ret,
        Opcode::Push,
        Opcode::Pop,
        Opcode::Prn,
        Opcode::Call,
        Opcode::Ldi,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
    ];

    /// Look up the opcode for a fetched byte.
    pub fn from_byte(byte: u8) -> Result<Opcode, DecodeError> {
        Opcode::ALL
            .iter()
            .copied()
            .find(|op| op.to_byte() == byte)
            .ok_or(DecodeError::InvalidOpcode(byte))
    }

    /// The encoded byte value.
    #[inline]
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// How many operand bytes follow the opcode.
    pub const fn operand_count(self) -> u8 {
        match self {
            Opcode::Nop | Opcode::Hlt | Opcode::Ret => 0,
            Opcode::Push | Opcode::Pop | Opcode::Prn | Opcode::Call => 1,
            Opcode::Ldi | Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => 2,
        }
    }

    /// Total instruction width in bytes, opcode included.
    #[inline]
    pub const fn width(self) -> u8 {
        1 + self.operand_count()
    }

    /// The assembly mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Nop => "NOP",
            Opcode::Hlt => "HLT",
            Opcode::Ret => "RET",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Prn => "PRN",
            Opcode::Call => "CALL",
            Opcode::Ldi => "LDI",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A decoded LS-8 instruction with its operands.
///
/// Operands are validated during decoding. Register operands arrive as
/// [`Reg`], which cannot name a register outside R0-R7, so execution
/// never re-checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Do nothing for one cycle.
    Nop,

    /// Stop the machine.
    Hlt,

    /// `reg = value`
    Ldi { reg: Reg, value: u8 },

    /// Print the value of `reg` in decimal, followed by a newline.
    Prn { reg: Reg },

    /// `reg_a = (reg_a + reg_b) mod 256`
    Add { reg_a: Reg, reg_b: Reg },

    /// `reg_a = (reg_a - reg_b) mod 256`
    Sub { reg_a: Reg, reg_b: Reg },

    /// `reg_a = (reg_a * reg_b) mod 256`
    Mul { reg_a: Reg, reg_b: Reg },

    /// `reg_a = reg_a / reg_b`, unsigned and truncating.
    Div { reg_a: Reg, reg_b: Reg },

    /// Push the value of `reg` onto the stack.
    Push { reg: Reg },

    /// Pop the top of the stack into `reg`.
    Pop { reg: Reg },

    /// Push the return address, then jump to the address held in `reg`.
    Call { reg: Reg },

    /// Pop the return address and jump back to it.
    Ret,
}

impl Instruction {
    /// The opcode this instruction encodes to.
    pub const fn opcode(&self) -> Opcode {
        match self {
            Instruction::Nop => Opcode::Nop,
            Instruction::Hlt => Opcode::Hlt,
            Instruction::Ldi { .. } => Opcode::Ldi,
            Instruction::Prn { .. } => Opcode::Prn,
            Instruction::Add { .. } => Opcode::Add,
            Instruction::Sub { .. } => Opcode::Sub,
            Instruction::Mul { .. } => Opcode::Mul,
            Instruction::Div { .. } => Opcode::Div,
            Instruction::Push { .. } => Opcode::Push,
            Instruction::Pop { .. } => Opcode::Pop,
            Instruction::Call { .. } => Opcode::Call,
            Instruction::Ret => Opcode::Ret,
        }
    }

    /// Total width in bytes, opcode included.
    #[inline]
    pub const fn width(&self) -> u8 {
        self.opcode().width()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Nop | Instruction::Hlt | Instruction::Ret => {
                f.write_str(self.opcode().mnemonic())
            }
            Instruction::Ldi { reg, value } => write!(f, "LDI {},{}", reg, value),
            Instruction::Prn { reg } => write!(f, "PRN {}", reg),
            Instruction::Push { reg } => write!(f, "PUSH {}", reg),
            Instruction::Pop { reg } => write!(f, "POP {}", reg),
            Instruction::Call { reg } => write!(f, "CALL {}", reg),
            Instruction::Add { reg_a, reg_b } => write!(f, "ADD {},{}", reg_a, reg_b),
            Instruction::Sub { reg_a, reg_b } => write!(f, "SUB {},{}", reg_a, reg_b),
            Instruction::Mul { reg_a, reg_b } => write!(f, "MUL {},{}", reg_a, reg_b),
            Instruction::Div { reg_a, reg_b } => write!(f, "DIV {},{}", reg_a, reg_b),
        }
    }
}

/// Decode the instruction whose opcode byte sits at `pc`.
///
/// Reads the opcode byte plus however many operand bytes the opcode
/// calls for. Fails when the opcode byte has no table entry, when a
/// register operand is out of range, or when an operand byte would lie
/// past the end of memory.
pub fn decode(mem: &Memory, pc: Addr) -> Result<Instruction, DecodeError> {
    let opcode = Opcode::from_byte(mem.read(pc))?;

    let operand = |index: i16| -> Result<u8, DecodeError> { Ok(mem.read(pc.offset(index)?)) };
    let register = |index: i16| -> Result<Reg, DecodeError> {
        let byte = operand(index)?;
        Reg::from_index(byte).ok_or(DecodeError::InvalidRegister(byte))
    };

    let instruction = match opcode {
        Opcode::Nop => Instruction::Nop,
        Opcode::Hlt => Instruction::Hlt,
        Opcode::Ldi => Instruction::Ldi {
            reg: register(1)?,
            value: operand(2)?,
        },
        Opcode::Prn => Instruction::Prn { reg: register(1)? },
        Opcode::Add => Instruction::Add {
            reg_a: register(1)?,
            reg_b: register(2)?,
        },
        Opcode::Sub => Instruction::Sub {
            reg_a: register(1)?,
            reg_b: register(2)?,
        },
        Opcode::Mul => Instruction::Mul {
            reg_a: register(1)?,
            reg_b: register(2)?,
        },
        Opcode::Div => Instruction::Div {
            reg_a: register(1)?,
            reg_b: register(2)?,
        },
        Opcode::Push => Instruction::Push { reg: register(1)? },
        Opcode::Pop => Instruction::Pop { reg: register(1)? },
        Opcode::Call => Instruction::Call { reg: register(1)? },
        Opcode::Ret => Instruction::Ret,
    };

    Ok(instruction)
}

/// Encode an instruction back to its byte form, the inverse of [`decode`].
pub fn encode(instr: &Instruction) -> Vec<u8> {
    let mut bytes = vec![instr.opcode().to_byte()];
    match *instr {
        Instruction::Nop | Instruction::Hlt | Instruction::Ret => {}
        Instruction::Prn { reg }
        | Instruction::Push { reg }
        | Instruction::Pop { reg }
        | Instruction::Call { reg } => {
            bytes.push(reg.index() as u8);
        }
        Instruction::Ldi { reg, value } => {
            bytes.push(reg.index() as u8);
            bytes.push(value);
        }
        Instruction::Add { reg_a, reg_b }
        | Instruction::Sub { reg_a, reg_b }
        | Instruction::Mul { reg_a, reg_b }
        | Instruction::Div { reg_a, reg_b } => {
            bytes.push(reg_a.index() as u8);
            bytes.push(reg_b.index() as u8);
        }
    }
    bytes
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The fetched byte has no entry in the opcode table.
    #[error("invalid opcode {0:#04X}")]
    InvalidOpcode(u8),

    /// A register operand names a register outside R0-R7.
    #[error("register index {0} out of range (0-7)")]
    InvalidRegister(u8),

    /// An operand byte would lie outside memory.
    #[error(transparent)]
    Memory(#[from] MemoryError),
}
