//! Declaration descriptors
//!
//! The AST is owned by the semantic walker; the scope stack only reads
//! declaration metadata from the element passed with each declaration.
//! One variant per declaration kind, so the active payload is determined
//! by the type, not by a tag convention.

/// Primitive value type attached to a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    Float,
    Boolean,
    Void,
}

/// Type of a formal parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// Primitive value
    Value(ValueType),
    /// Object of the named class
    Object(String),
}

/// A formal parameter recorded on a function element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
}

/// One declaration as seen by the scope stack
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Scalar variable of a primitive type
    Variable { ty: ValueType },

    /// Instance of a user-defined class
    Object { class_name: String },

    /// Method. `params` starts empty and grows as the binder sees
    /// parameter declarations.
    Function {
        return_ty: ValueType,
        params: Vec<Param>,
    },

    /// Class. `members` starts empty and grows as the binder sees field
    /// and method declarations.
    Class { members: Vec<String> },
}

/// Declaration kind of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Variable,
    Object,
    Function,
    Class,
}

impl Element {
    /// Variable element of the given type
    pub fn variable(ty: ValueType) -> Self {
        Element::Variable { ty }
    }

    /// Object element of the named class
    pub fn object(class_name: impl Into<String>) -> Self {
        Element::Object {
            class_name: class_name.into(),
        }
    }

    /// Function element with an empty parameter list
    pub fn function(return_ty: ValueType) -> Self {
        Element::Function {
            return_ty,
            params: Vec::new(),
        }
    }

    /// Class element with an empty member list
    pub fn class() -> Self {
        Element::Class {
            members: Vec::new(),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Variable { .. } => ElementKind::Variable,
            Element::Object { .. } => ElementKind::Object,
            Element::Function { .. } => ElementKind::Function,
            Element::Class { .. } => ElementKind::Class,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_kinds() {
        assert_eq!(
            Element::variable(ValueType::Integer).kind(),
            ElementKind::Variable
        );
        assert_eq!(Element::object("Point").kind(), ElementKind::Object);
        assert_eq!(
            Element::function(ValueType::Void).kind(),
            ElementKind::Function
        );
        assert_eq!(Element::class().kind(), ElementKind::Class);
    }

    #[test]
    fn test_function_starts_with_no_params() {
        match Element::function(ValueType::Integer) {
            Element::Function { params, return_ty } => {
                assert!(params.is_empty());
                assert_eq!(return_ty, ValueType::Integer);
            }
            _ => unreachable!(),
        }
    }
}
