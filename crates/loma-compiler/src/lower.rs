//! Resolved-symbol to operand lowering
//!
//! Code generation addresses a resolved identifier either as a memory
//! location inside its method's activation frame or as a symbolic label.
//! This module maps registry metadata onto the matching [`loma_asm`]
//! operand, so the minted unique names are the only identifier text that
//! reaches the instruction stream.

use crate::symbols::element::ValueType;
use crate::symbols::registry::{SymbolKind, SymbolRegistry};
use loma_asm::{DataType, Operand, RegisterId};

/// Maps registered identifiers to instruction operands
#[derive(Debug)]
pub struct Lowering<'a> {
    registry: &'a SymbolRegistry,
    /// Register holding the activation frame base
    frame_base: RegisterId,
}

impl<'a> Lowering<'a> {
    pub fn new(registry: &'a SymbolRegistry, frame_base: RegisterId) -> Self {
        Self {
            registry,
            frame_base,
        }
    }

    /// Memory operand addressing a variable or object inside its
    /// method's activation frame.
    ///
    /// Precondition: `id` is registered as a variable or object.
    pub fn location(&self, id: &str) -> Operand {
        match self.registry.kind(id) {
            SymbolKind::Variable | SymbolKind::Object => Operand::Memory {
                offset: self.registry.offset(id),
                base: self.frame_base,
                index: RegisterId::new(0),
                scale: 0,
            },
            kind => panic!("`{}` is a {:?}, not an addressable location", id, kind),
        }
    }

    /// Label operand naming a method's entry point.
    ///
    /// Precondition: `id` is registered as a method.
    pub fn jump_target(&self, id: &str) -> Operand {
        match self.registry.kind(id) {
            SymbolKind::Method => Operand::Label(self.registry.unique_name(id).to_string()),
            kind => panic!("`{}` is a {:?}, not a jump target", id, kind),
        }
    }
}

/// Operand type tag for a declared value type
pub fn operand_type(ty: ValueType) -> DataType {
    match ty {
        ValueType::Integer => DataType::Int,
        ValueType::Float => DataType::Float,
        ValueType::Boolean => DataType::Bool,
        ValueType::Void => DataType::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> SymbolRegistry {
        let mut registry = SymbolRegistry::new();
        registry.register_var("x", 8);
        registry.register_method("draw", 2, "Shape");
        registry.register_class("Shape", vec!["x".to_string()]);
        registry
    }

    #[test]
    fn test_variable_lowers_to_frame_memory() {
        let registry = populated();
        let lowering = Lowering::new(&registry, RegisterId::new(6));
        assert_eq!(
            lowering.location("x"),
            Operand::Memory {
                offset: 8,
                base: RegisterId::new(6),
                index: RegisterId::new(0),
                scale: 0,
            }
        );
    }

    #[test]
    fn test_method_lowers_to_its_unique_label() {
        let registry = populated();
        let lowering = Lowering::new(&registry, RegisterId::new(6));
        let target = lowering.jump_target("draw");
        assert_eq!(target, Operand::Label(registry.unique_name("draw").to_string()));
    }

    #[test]
    #[should_panic(expected = "not a jump target")]
    fn test_jump_to_a_variable_is_fatal() {
        let registry = populated();
        let lowering = Lowering::new(&registry, RegisterId::new(6));
        lowering.jump_target("x");
    }

    #[test]
    #[should_panic(expected = "not an addressable location")]
    fn test_class_has_no_location() {
        let registry = populated();
        let lowering = Lowering::new(&registry, RegisterId::new(6));
        lowering.location("Shape");
    }

    #[test]
    fn test_value_type_mapping() {
        assert_eq!(operand_type(ValueType::Integer), DataType::Int);
        assert_eq!(operand_type(ValueType::Float), DataType::Float);
        assert_eq!(operand_type(ValueType::Boolean), DataType::Bool);
        assert_eq!(operand_type(ValueType::Void), DataType::None);
    }
}
