//! LS-8 memory subsystem.
//!
//! The LS-8 keeps code, data, and the downward-growing stack in a single
//! 256-byte RAM. Program images load at address 0; the stack region starts
//! at 0xF4 and grows toward the program.

use serde::{Serialize, Deserialize};
use std::fmt;

/// The number of memory cells in the LS-8.
pub const MEMORY_SIZE: usize = 256;

/// A memory address, valid by construction.
///
/// Wraps a `u8`, so a held `Addr` always resolves within memory. Arithmetic
/// that could leave the range goes through [`Addr::offset`], which is the
/// single chokepoint where an out-of-range computation becomes a
/// [`MemoryError::AddressOutOfRange`]. Program-counter advances and
/// stack-pointer moves both come through it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Addr(u8);

impl Addr {
    /// Address zero, where program images are loaded.
    pub const ZERO: Addr = Addr(0);

    /// Create an address from a raw byte. Every byte names a valid cell.
    #[inline]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// The raw byte value of this address.
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Compute `self + delta`, failing if the result leaves memory.
    pub fn offset(self, delta: i16) -> Result<Addr, MemoryError> {
        let target = self.0 as i32 + delta as i32;
        if target < 0 || target >= MEMORY_SIZE as i32 {
            return Err(MemoryError::AddressOutOfRange(target));
        }
        Ok(Addr(target as u8))
    }
}

impl fmt::Debug for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04X}", self.0)
    }
}

/// LS-8 memory: 256 single-byte cells.
#[derive(Clone, Serialize, Deserialize)]
pub struct Memory {
    cells: Vec<u8>,
}

impl Memory {
    /// Create a new memory with all cells zeroed.
    pub fn new() -> Self {
        Self {
            cells: vec![0; MEMORY_SIZE],
        }
    }

    /// Read the cell at `addr`.
    #[inline]
    pub fn read(&self, addr: Addr) -> u8 {
        self.cells[addr.value() as usize]
    }

    /// Write `value` to the cell at `addr`.
    #[inline]
    pub fn write(&mut self, addr: Addr, value: u8) {
        self.cells[addr.value() as usize] = value;
    }

    /// Clear all memory to zeros.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = 0;
        }
    }

    /// Load a program image into memory starting at `start`.
    pub fn load_program(&mut self, start: Addr, program: &[u8]) -> Result<(), MemoryError> {
        let start = start.value() as usize;
        if start + program.len() > MEMORY_SIZE {
            return Err(MemoryError::ProgramTooLarge {
                size: program.len(),
                available: MEMORY_SIZE - start,
            });
        }
        self.cells[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only show non-zero cells
        let non_zero = self.cells.iter().filter(|cell| **cell != 0).count();

        f.debug_struct("Memory")
            .field("non_zero_cells", &non_zero)
            .field("total_cells", &MEMORY_SIZE)
            .finish()
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// A computed address is outside the valid memory range.
    AddressOutOfRange(i32),
    /// Program is too large to fit in memory.
    ProgramTooLarge { size: usize, available: usize },
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::AddressOutOfRange(addr) => {
                write!(f, "memory address {} out of range (0-255)", addr)
            }
            MemoryError::ProgramTooLarge { size, available } => {
                write!(f, "program size {} exceeds available space {}", size, available)
            }
        }
    }
}

impl std::error::Error for MemoryError {}
