//! Arithmetic logic unit.
//!
//! Pure register-to-register arithmetic: [`apply`] mutates `reg_a` in place
//! using the current value of `reg_b`, wrapping modulo 256. The ALU never
//! touches memory or the program counter; stepping past an ALU instruction
//! is the dispatcher's job.

use crate::cpu::decode::Opcode;
use crate::cpu::registers::{Reg, Registers};
use thiserror::Error;

/// Apply an ALU operation: `reg_a = reg_a op reg_b`.
///
/// Only the ALU-class opcodes (ADD, SUB, MUL, DIV) are accepted; routing
/// any other opcode here fails with `UnsupportedOperation`. On any error
/// the register file is left untouched.
pub fn apply(regs: &mut Registers, op: Opcode, reg_a: Reg, reg_b: Reg) -> Result<(), AluError> {
    let a = regs.get(reg_a);
    let b = regs.get(reg_b);

    let result = match op {
        Opcode::Add => a.wrapping_add(b),
        Opcode::Sub => a.wrapping_sub(b),
        Opcode::Mul => a.wrapping_mul(b),
        Opcode::Div => {
            if b == 0 {
                return Err(AluError::DivisionByZero);
            }
            // Unsigned truncating division.
            a / b
        }
        other => return Err(AluError::UnsupportedOperation(other)),
    };

    regs.set(reg_a, result);
    Ok(())
}

/// Errors that can occur during ALU operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AluError {
    /// The opcode is not an ALU operation.
    #[error("unsupported ALU operation: {0}")]
    UnsupportedOperation(Opcode),

    /// DIV with a zero divisor register.
    #[error("division by zero")]
    DivisionByZero,
}
