//! Abstract instructions
//!
//! An instruction pairs an operation with a typed operand payload. The
//! associated constructors are the only checked way to build one: each
//! asserts its operation's structural preconditions in debug builds.
//! Instructions are immutable once built; there is no mutation API.
//!
//! The constructors do not check that source and destination denote
//! values of the same type. That obligation belongs to the component
//! driving construction; [`crate::verify`] is the validation pass it can
//! run regardless of build profile.

use crate::operand::{DataType, Operand};

/// Operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Copy source into destination
    Mov,
    /// Multiply destination by source
    Mul,
    /// Add source to destination
    Add,
    /// Subtract source from destination
    Sub,
    /// Divide by source; the result location is a caller convention
    Div,
    /// Shift destination right by an immediate amount
    Shr,
    /// Negate destination in place
    Neg,
    /// Unconditional jump to a label
    Jmp,
}

impl Operation {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Operation::Mov => "mov",
            Operation::Mul => "mul",
            Operation::Add => "add",
            Operation::Sub => "sub",
            Operation::Div => "div",
            Operation::Shr => "shr",
            Operation::Neg => "neg",
            Operation::Jmp => "jmp",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// One abstract instruction
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    operation: Operation,
    operand_type: DataType,
    source: Option<Operand>,
    destination: Option<Operand>,
}

impl Instruction {
    /// Build an instruction without checking any precondition.
    ///
    /// For drivers that assemble instructions from input they do not
    /// control; such instructions must go through [`crate::verify`]
    /// before use.
    pub fn unchecked(
        operation: Operation,
        operand_type: DataType,
        source: Option<Operand>,
        destination: Option<Operand>,
    ) -> Self {
        Self {
            operation,
            operand_type,
            source,
            destination,
        }
    }

    /// Copy `source` into `destination`.
    ///
    /// Precondition: `destination` is a register or memory location.
    pub fn mov(source: Operand, destination: Operand, ty: DataType) -> Self {
        debug_assert!(
            destination.is_location(),
            "mov destination must be a register or memory location"
        );
        Self::unchecked(Operation::Mov, ty, Some(source), Some(destination))
    }

    /// Multiply `destination` by `source`.
    ///
    /// Precondition: `destination` is a register or memory location.
    pub fn mul(source: Operand, destination: Operand, ty: DataType) -> Self {
        debug_assert!(
            destination.is_location(),
            "mul destination must be a register or memory location"
        );
        Self::unchecked(Operation::Mul, ty, Some(source), Some(destination))
    }

    /// Add `source` to `destination`.
    ///
    /// Precondition: `destination` is a register or memory location.
    pub fn add(source: Operand, destination: Operand, ty: DataType) -> Self {
        debug_assert!(
            destination.is_location(),
            "add destination must be a register or memory location"
        );
        Self::unchecked(Operation::Add, ty, Some(source), Some(destination))
    }

    /// Subtract `source` from `destination`.
    ///
    /// Precondition: `destination` is a register or memory location.
    pub fn sub(source: Operand, destination: Operand, ty: DataType) -> Self {
        debug_assert!(
            destination.is_location(),
            "sub destination must be a register or memory location"
        );
        Self::unchecked(Operation::Sub, ty, Some(source), Some(destination))
    }

    /// Divide by `dividend`.
    ///
    /// There is no destination slot: where the quotient lands is a
    /// convention owned by the caller (a fixed register on most targets).
    pub fn div(dividend: Operand, ty: DataType) -> Self {
        Self::unchecked(Operation::Div, ty, Some(dividend), None)
    }

    /// Shift `destination` right by `amount` bits.
    ///
    /// Precondition: `amount` is an immediate and `destination` is a
    /// register or memory location.
    pub fn shr(amount: Operand, destination: Operand, ty: DataType) -> Self {
        debug_assert!(
            matches!(amount, Operand::Immediate(_)),
            "shr amount must be an immediate"
        );
        debug_assert!(
            destination.is_location(),
            "shr destination must be a register or memory location"
        );
        Self::unchecked(Operation::Shr, ty, Some(amount), Some(destination))
    }

    /// Negate `destination` in place.
    ///
    /// Precondition: `destination` is a register or memory location.
    pub fn neg(destination: Operand, ty: DataType) -> Self {
        debug_assert!(
            destination.is_location(),
            "neg destination must be a register or memory location"
        );
        Self::unchecked(Operation::Neg, ty, None, Some(destination))
    }

    /// Jump unconditionally to `label`.
    pub fn jmp(label: impl Into<String>) -> Self {
        Self::unchecked(
            Operation::Jmp,
            DataType::None,
            None,
            Some(Operand::Label(label.into())),
        )
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn operand_type(&self) -> DataType {
        self.operand_type
    }

    pub fn source(&self) -> Option<&Operand> {
        self.source.as_ref()
    }

    pub fn destination(&self) -> Option<&Operand> {
        self.destination.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::RegisterId;

    fn reg(id: u32) -> Operand {
        Operand::Register(RegisterId::new(id))
    }

    fn mem(offset: u32) -> Operand {
        Operand::Memory {
            offset,
            base: RegisterId::new(6),
            index: RegisterId::new(0),
            scale: 0,
        }
    }

    #[test]
    fn test_mov_to_register_and_memory() {
        let to_reg = Instruction::mov(Operand::Immediate(4), reg(1), DataType::Int);
        assert_eq!(to_reg.operation(), Operation::Mov);
        assert_eq!(to_reg.operand_type(), DataType::Int);
        assert_eq!(to_reg.source(), Some(&Operand::Immediate(4)));
        assert_eq!(to_reg.destination(), Some(&reg(1)));

        let to_mem = Instruction::mov(reg(1), mem(8), DataType::Int);
        assert_eq!(to_mem.destination(), Some(&mem(8)));
    }

    #[test]
    fn test_div_has_no_destination() {
        let div = Instruction::div(reg(2), DataType::Int);
        assert_eq!(div.source(), Some(&reg(2)));
        assert_eq!(div.destination(), None);
    }

    #[test]
    fn test_shr_keeps_the_given_immediate() {
        let shr = Instruction::shr(Operand::Immediate(3), reg(1), DataType::Int);
        assert_eq!(shr.source(), Some(&Operand::Immediate(3)));
        assert_eq!(shr.destination(), Some(&reg(1)));
    }

    #[test]
    fn test_neg_has_no_source() {
        let neg = Instruction::neg(mem(16), DataType::Float);
        assert_eq!(neg.source(), None);
        assert_eq!(neg.destination(), Some(&mem(16)));
    }

    #[test]
    fn test_jmp_builds_a_label_destination() {
        let jmp = Instruction::jmp("L1");
        assert_eq!(jmp.operation(), Operation::Jmp);
        assert_eq!(jmp.operand_type(), DataType::None);
        assert_eq!(jmp.source(), None);
        assert_eq!(jmp.destination(), Some(&Operand::Label("L1".to_string())));
    }

    #[cfg(debug_assertions)]
    mod rejected {
        use super::*;

        #[test]
        #[should_panic(expected = "mov destination")]
        fn test_mov_to_immediate() {
            Instruction::mov(reg(0), Operand::Immediate(1), DataType::Int);
        }

        #[test]
        #[should_panic(expected = "mul destination")]
        fn test_mul_to_label() {
            Instruction::mul(reg(0), Operand::Label("x.1".to_string()), DataType::Int);
        }

        #[test]
        #[should_panic(expected = "add destination")]
        fn test_add_to_immediate() {
            Instruction::add(reg(0), Operand::Immediate(2), DataType::Int);
        }

        #[test]
        #[should_panic(expected = "sub destination")]
        fn test_sub_to_label() {
            Instruction::sub(reg(0), Operand::Label("y.1".to_string()), DataType::Int);
        }

        #[test]
        #[should_panic(expected = "neg destination")]
        fn test_neg_of_immediate() {
            Instruction::neg(Operand::Immediate(5), DataType::Int);
        }

        #[test]
        #[should_panic(expected = "shr amount")]
        fn test_shr_by_register() {
            Instruction::shr(reg(2), reg(1), DataType::Int);
        }

        #[test]
        #[should_panic(expected = "shr destination")]
        fn test_shr_of_immediate() {
            Instruction::shr(Operand::Immediate(1), Operand::Immediate(8), DataType::Int);
        }
    }
}
