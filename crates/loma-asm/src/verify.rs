//! Instruction verification
//!
//! Structural checks that hold regardless of build profile. The
//! constructors in [`crate::instr`] assert the same rules in debug
//! builds only; a driver that assembles instructions from input it does
//! not control runs this pass before handing the program to the backend.

use crate::instr::{Instruction, Operation};
use crate::operand::{Addressing, DataType, Operand};

/// Instruction verification errors
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// Destination is not a register or memory location
    #[error("{operation} destination must be a register or memory location, got {found}")]
    BadDestination {
        /// Operation whose destination is malformed
        operation: Operation,
        /// Addressing mode actually found
        found: Addressing,
    },

    /// Operation requires a destination operand
    #[error("{0} requires a destination operand")]
    MissingDestination(Operation),

    /// Operation requires a source operand
    #[error("{0} requires a source operand")]
    MissingSource(Operation),

    /// Operation takes no source operand
    #[error("{0} takes no source operand")]
    UnexpectedSource(Operation),

    /// Operation takes no destination operand
    #[error("{0} takes no destination operand")]
    UnexpectedDestination(Operation),

    /// Shift amount is not an immediate
    #[error("shr amount must be an immediate, got {0}")]
    ShiftAmountNotImmediate(Addressing),

    /// Data instruction without an operand type
    #[error("{0} operands must carry a data type")]
    UntypedOperands(Operation),

    /// Jump carrying an operand type
    #[error("jmp carries no operand type")]
    TypedJump,

    /// Jump whose destination is not a label
    #[error("jmp destination must be a label")]
    BadJumpTarget,
}

/// Verify one instruction
pub fn verify(instr: &Instruction) -> Result<(), VerifyError> {
    let op = instr.operation();
    match op {
        Operation::Mov | Operation::Mul | Operation::Add | Operation::Sub => {
            require_typed(instr)?;
            require_source(instr)?;
            let destination = require_destination(instr)?;
            require_location(op, destination)
        }
        Operation::Div => {
            require_typed(instr)?;
            require_source(instr)?;
            if instr.destination().is_some() {
                return Err(VerifyError::UnexpectedDestination(op));
            }
            Ok(())
        }
        Operation::Shr => {
            require_typed(instr)?;
            let amount = require_source(instr)?;
            if !matches!(amount, Operand::Immediate(_)) {
                return Err(VerifyError::ShiftAmountNotImmediate(amount.addressing()));
            }
            let destination = require_destination(instr)?;
            require_location(op, destination)
        }
        Operation::Neg => {
            require_typed(instr)?;
            if instr.source().is_some() {
                return Err(VerifyError::UnexpectedSource(op));
            }
            let destination = require_destination(instr)?;
            require_location(op, destination)
        }
        Operation::Jmp => {
            if instr.operand_type() != DataType::None {
                return Err(VerifyError::TypedJump);
            }
            if instr.source().is_some() {
                return Err(VerifyError::UnexpectedSource(op));
            }
            match instr.destination() {
                Some(Operand::Label(_)) => Ok(()),
                Some(_) => Err(VerifyError::BadJumpTarget),
                None => Err(VerifyError::MissingDestination(op)),
            }
        }
    }
}

/// Verify every instruction of a program, failing on the first violation
pub fn verify_program(program: &[Instruction]) -> Result<(), VerifyError> {
    for instr in program {
        verify(instr)?;
    }
    Ok(())
}

fn require_typed(instr: &Instruction) -> Result<(), VerifyError> {
    if instr.operand_type() == DataType::None {
        return Err(VerifyError::UntypedOperands(instr.operation()));
    }
    Ok(())
}

fn require_source(instr: &Instruction) -> Result<&Operand, VerifyError> {
    instr
        .source()
        .ok_or(VerifyError::MissingSource(instr.operation()))
}

fn require_destination(instr: &Instruction) -> Result<&Operand, VerifyError> {
    instr
        .destination()
        .ok_or(VerifyError::MissingDestination(instr.operation()))
}

fn require_location(operation: Operation, operand: &Operand) -> Result<(), VerifyError> {
    if !operand.is_location() {
        return Err(VerifyError::BadDestination {
            operation,
            found: operand.addressing(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::RegisterId;

    fn reg(id: u32) -> Operand {
        Operand::Register(RegisterId::new(id))
    }

    #[test]
    fn test_checked_constructors_verify_clean() {
        let program = vec![
            Instruction::mov(Operand::Immediate(1), reg(0), DataType::Int),
            Instruction::add(reg(0), reg(1), DataType::Int),
            Instruction::div(reg(1), DataType::Int),
            Instruction::shr(Operand::Immediate(2), reg(0), DataType::Int),
            Instruction::neg(reg(0), DataType::Int),
            Instruction::jmp("exit.1"),
        ];
        assert!(verify_program(&program).is_ok());
    }

    #[test]
    fn test_immediate_destination_rejected() {
        for op in [
            Operation::Mov,
            Operation::Mul,
            Operation::Add,
            Operation::Sub,
        ] {
            let instr = Instruction::unchecked(
                op,
                DataType::Int,
                Some(reg(0)),
                Some(Operand::Immediate(1)),
            );
            assert!(matches!(
                verify(&instr),
                Err(VerifyError::BadDestination {
                    found: Addressing::Immediate,
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_label_destination_rejected() {
        let instr = Instruction::unchecked(
            Operation::Neg,
            DataType::Int,
            None,
            Some(Operand::Label("x.1".to_string())),
        );
        assert!(matches!(
            verify(&instr),
            Err(VerifyError::BadDestination {
                operation: Operation::Neg,
                found: Addressing::None,
            })
        ));
    }

    #[test]
    fn test_shr_amount_must_be_immediate() {
        let instr =
            Instruction::unchecked(Operation::Shr, DataType::Int, Some(reg(2)), Some(reg(1)));
        assert!(matches!(
            verify(&instr),
            Err(VerifyError::ShiftAmountNotImmediate(Addressing::Register))
        ));
    }

    #[test]
    fn test_div_takes_no_destination() {
        let instr =
            Instruction::unchecked(Operation::Div, DataType::Int, Some(reg(0)), Some(reg(1)));
        assert!(matches!(
            verify(&instr),
            Err(VerifyError::UnexpectedDestination(Operation::Div))
        ));
    }

    #[test]
    fn test_missing_operands_rejected() {
        let no_source = Instruction::unchecked(Operation::Mov, DataType::Int, None, Some(reg(0)));
        assert!(matches!(
            verify(&no_source),
            Err(VerifyError::MissingSource(Operation::Mov))
        ));

        let no_destination =
            Instruction::unchecked(Operation::Add, DataType::Int, Some(reg(0)), None);
        assert!(matches!(
            verify(&no_destination),
            Err(VerifyError::MissingDestination(Operation::Add))
        ));
    }

    #[test]
    fn test_untyped_arithmetic_rejected() {
        let instr =
            Instruction::unchecked(Operation::Add, DataType::None, Some(reg(0)), Some(reg(1)));
        assert!(matches!(
            verify(&instr),
            Err(VerifyError::UntypedOperands(Operation::Add))
        ));
    }

    #[test]
    fn test_typed_jump_rejected() {
        let instr = Instruction::unchecked(
            Operation::Jmp,
            DataType::Int,
            None,
            Some(Operand::Label("L1".to_string())),
        );
        assert!(matches!(verify(&instr), Err(VerifyError::TypedJump)));
    }

    #[test]
    fn test_jump_to_non_label_rejected() {
        let instr = Instruction::unchecked(Operation::Jmp, DataType::None, None, Some(reg(0)));
        assert!(matches!(verify(&instr), Err(VerifyError::BadJumpTarget)));
    }

    #[test]
    fn test_program_fails_on_first_violation() {
        let program = vec![
            Instruction::jmp("L1"),
            Instruction::unchecked(Operation::Neg, DataType::Int, Some(reg(0)), Some(reg(1))),
        ];
        assert!(matches!(
            verify_program(&program),
            Err(VerifyError::UnexpectedSource(Operation::Neg))
        ));
    }
}
