//! Pretty-printing for instruction sequences
//!
//! Human-readable output for debugging emitted programs. The rendering is
//! `mnemonic[.type] source, destination` with unused slots omitted.

use crate::instr::Instruction;
use crate::operand::DataType;
use std::fmt;
use std::fmt::Write;

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operation())?;
        if self.operand_type() != DataType::None {
            write!(f, ".{}", self.operand_type())?;
        }
        match (self.source(), self.destination()) {
            (Some(source), Some(destination)) => write!(f, " {}, {}", source, destination),
            (Some(source), None) => write!(f, " {}", source),
            (None, Some(destination)) => write!(f, " {}", destination),
            (None, None) => Ok(()),
        }
    }
}

/// Render a program one instruction per line
pub fn dump(program: &[Instruction]) -> String {
    let mut output = String::new();
    for instr in program {
        writeln!(output, "{}", instr).unwrap();
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::{Operand, RegisterId};

    #[test]
    fn test_instruction_display() {
        let mov = Instruction::mov(
            Operand::Immediate(4),
            Operand::Register(RegisterId::new(1)),
            DataType::Int,
        );
        assert_eq!(format!("{}", mov), "mov.int $4, r1");

        let neg = Instruction::neg(Operand::Register(RegisterId::new(0)), DataType::Float);
        assert_eq!(format!("{}", neg), "neg.float r0");

        let jmp = Instruction::jmp("loop.2");
        assert_eq!(format!("{}", jmp), "jmp loop.2");
    }

    #[test]
    fn test_dump_one_line_per_instruction() {
        let program = vec![
            Instruction::div(Operand::Register(RegisterId::new(2)), DataType::Int),
            Instruction::jmp("exit.1"),
        ];
        assert_eq!(dump(&program), "div.int r2\njmp exit.1\n");
    }
}
