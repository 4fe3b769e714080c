//! LS-8 CPU registers.
//!
//! Eight general-purpose 8-bit registers, R0 through R7. R7 doubles as the
//! stack pointer: it boots holding `STACK_ORIGIN` (0xF4), and every stack
//! operation writes the moved pointer back into it, so the register file is
//! the stack pointer's only storage.

use crate::cpu::memory::Addr;
use serde::{Serialize, Deserialize};
use std::fmt;

/// The number of general-purpose registers.
pub const NUM_REGISTERS: usize = 8;

/// Boot value of the stack-pointer register.
///
/// The stack is empty while the pointer sits here; pushes grow it toward
/// lower addresses.
pub const STACK_ORIGIN: Addr = Addr::new(0xF4);

/// A register index, valid by construction.
///
/// Operand bytes name registers, but only the values 0-7 do so;
/// [`Reg::from_index`] rejects the rest, so a held `Reg` always indexes
/// the register file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reg(u8);

impl Reg {
    /// All registers in order, R0 through R7.
    pub const ALL: [Reg; NUM_REGISTERS] = [
        Reg(0),
        Reg(1),
        Reg(2),
        Reg(3),
        Reg(4),
        Reg(5),
        Reg(6),
        Reg(7),
    ];

    /// R7, the reserved stack-pointer register.
    pub const SP: Reg = Reg(7);

    /// Create a register index from a raw operand byte.
    ///
    /// Returns `None` for bytes outside 0-7.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Reg> {
        if index < NUM_REGISTERS as u8 {
            Some(Reg(index))
        } else {
            None
        }
    }

    /// The index into the register file.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// The LS-8 register file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Registers {
    regs: [u8; NUM_REGISTERS],
}

impl Registers {
    /// Create a register file in boot state: all zeros, R7 = 0xF4.
    pub fn new() -> Self {
        let mut regs = [0; NUM_REGISTERS];
        regs[Reg::SP.index()] = STACK_ORIGIN.value();
        Self { regs }
    }

    /// Current value of `reg`.
    #[inline]
    pub fn get(&self, reg: Reg) -> u8 {
        self.regs[reg.index()]
    }

    /// Set `reg` to `value`.
    #[inline]
    pub fn set(&mut self, reg: Reg, value: u8) {
        self.regs[reg.index()] = value;
    }

    /// The stack pointer: the value held in R7, viewed as an address.
    #[inline]
    pub fn stack_pointer(&self) -> Addr {
        Addr::new(self.get(Reg::SP))
    }

    /// Persist a moved stack pointer back into R7.
    #[inline]
    pub fn set_stack_pointer(&mut self, sp: Addr) {
        self.set(Reg::SP, sp.value());
    }

    /// Reset all registers to boot state.
    pub fn reset(&mut self) {
        self.regs = [0; NUM_REGISTERS];
        self.regs[Reg::SP.index()] = STACK_ORIGIN.value();
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
