//! Stack discipline over memory and the stack-pointer register.
//!
//! The stack lives in main memory: it starts empty with the pointer at
//! `STACK_ORIGIN` (0xF4) and grows toward address 0. [`push`] decrements
//! the pointer and writes; [`pop`] reads and increments. Both read the
//! pointer from R7 and persist the moved pointer back into it, so the
//! register-visible stack pointer and the addresses actually used cannot
//! diverge.
//!
//! Nothing stops a deep stack from growing down into the program; the
//! LS-8 leaves that to the programmer.

use crate::cpu::memory::{Memory, MemoryError};
use crate::cpu::registers::{Registers, STACK_ORIGIN};
use thiserror::Error;

/// Push `value` onto the stack.
///
/// Fails when the pointer would move below address 0.
pub fn push(mem: &mut Memory, regs: &mut Registers, value: u8) -> Result<(), StackError> {
    let sp = regs.stack_pointer().offset(-1)?;
    mem.write(sp, value);
    regs.set_stack_pointer(sp);
    Ok(())
}

/// Pop the top value off the stack.
///
/// Fails with `Underflow` when the pointer sits at or beyond
/// `STACK_ORIGIN` before the read, i.e. when the stack is empty.
pub fn pop(mem: &Memory, regs: &mut Registers) -> Result<u8, StackError> {
    let sp = regs.stack_pointer();
    if sp.value() >= STACK_ORIGIN.value() {
        return Err(StackError::Underflow(sp.value()));
    }
    let value = mem.read(sp);
    regs.set_stack_pointer(sp.offset(1)?);
    Ok(value)
}

/// Errors that can occur during stack operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackError {
    /// The moved pointer left the address space (push below address 0).
    #[error(transparent)]
    Memory(#[from] MemoryError),

    /// Pop attempted with the stack empty.
    #[error("stack underflow: pop with SP at {0:#04X}")]
    Underflow(u8),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::memory::Addr;
    use crate::cpu::registers::Reg;
    use proptest::prelude::*;

    #[test]
    fn test_push_writes_below_origin() {
        let mut mem = Memory::new();
        let mut regs = Registers::new();

        push(&mut mem, &mut regs, 42).unwrap();

        assert_eq!(mem.read(Addr::new(0xF3)), 42);
        assert_eq!(regs.stack_pointer(), Addr::new(0xF3));
        // The moved pointer is visible through R7.
        assert_eq!(regs.get(Reg::SP), 0xF3);
    }

    #[test]
    fn test_push_pop_roundtrip() {
        let mut mem = Memory::new();
        let mut regs = Registers::new();

        push(&mut mem, &mut regs, 99).unwrap();
        let value = pop(&mem, &mut regs).unwrap();

        assert_eq!(value, 99);
        assert_eq!(regs.stack_pointer(), STACK_ORIGIN);
    }

    #[test]
    fn test_pop_empty_underflows() {
        let mem = Memory::new();
        let mut regs = Registers::new();

        let err = pop(&mem, &mut regs).unwrap_err();

        assert_eq!(err, StackError::Underflow(0xF4));
        assert_eq!(regs.stack_pointer(), STACK_ORIGIN);
    }

    #[test]
    fn test_pop_beyond_origin_underflows() {
        // A program can point SP anywhere by writing R7; popping from
        // above the stack region is still underflow.
        let mem = Memory::new();
        let mut regs = Registers::new();
        regs.set_stack_pointer(Addr::new(0xFF));

        let err = pop(&mem, &mut regs).unwrap_err();

        assert_eq!(err, StackError::Underflow(0xFF));
    }

    #[test]
    fn test_push_below_zero_faults() {
        let mut mem = Memory::new();
        let mut regs = Registers::new();
        regs.set_stack_pointer(Addr::new(0));

        let err = push(&mut mem, &mut regs, 1).unwrap_err();

        assert_eq!(err, StackError::Memory(MemoryError::AddressOutOfRange(-1)));
        assert_eq!(regs.stack_pointer(), Addr::new(0));
    }

    #[test]
    fn test_stack_fills_down_to_zero() {
        let mut mem = Memory::new();
        let mut regs = Registers::new();

        // 244 pushes take the pointer from 0xF4 all the way to 0x00.
        for i in 0..244u16 {
            push(&mut mem, &mut regs, i as u8).unwrap();
        }
        assert_eq!(regs.stack_pointer(), Addr::new(0));

        // The 245th push has nowhere to go.
        assert!(push(&mut mem, &mut regs, 0).is_err());
    }

    proptest! {
        #[test]
        fn push_pop_returns_pushed_value(value in any::<u8>()) {
            let mut mem = Memory::new();
            let mut regs = Registers::new();

            push(&mut mem, &mut regs, value).unwrap();
            let popped = pop(&mem, &mut regs).unwrap();

            prop_assert_eq!(popped, value);
            prop_assert_eq!(regs.stack_pointer(), STACK_ORIGIN);
        }

        #[test]
        fn balanced_pushes_and_pops_restore_sp(
            values in proptest::collection::vec(any::<u8>(), 1..=244)
        ) {
            let mut mem = Memory::new();
            let mut regs = Registers::new();

            for &value in &values {
                push(&mut mem, &mut regs, value).unwrap();
            }
            // Values come back in reverse order of pushing.
            for &value in values.iter().rev() {
                prop_assert_eq!(pop(&mem, &mut regs).unwrap(), value);
            }

            prop_assert_eq!(regs.stack_pointer(), STACK_ORIGIN);
        }
    }
}
