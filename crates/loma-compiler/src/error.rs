//! Declaration statuses
//!
//! Policy violations are recoverable: every declaration operation returns
//! one of these statuses in its `Err` arm and leaves the scope frames and
//! the registry exactly as they were before the call. The semantic walker
//! attaches source locations and turns them into diagnostics; this crate
//! supplies only the status.

use thiserror::Error;

/// Rejected variable or object declaration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclareError {
    /// The declaration would recursively use the definition it appears in
    #[error("`{0}` recursively references the definition under analysis")]
    Recursive(String),

    /// The identifier already occupies the current scope
    #[error("`{0}` is already declared in this scope")]
    Exists(String),
}

/// Rejected method declaration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionError {
    /// The element bound to the key is not a function
    #[error("`{0}` is not a function")]
    NotAFunction(String),

    /// The name already occupies the current scope
    #[error("function `{0}` is already declared in this scope")]
    Exists(String),
}

/// Rejected class declaration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassError {
    /// The element bound to the key is not a class
    #[error("`{0}` is not a class")]
    NotAClass(String),

    /// The name already occupies the current scope
    #[error("class `{0}` is already declared in this scope")]
    Exists(String),
}

/// Rejected parameter declaration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// No function is under analysis
    #[error("no function is under analysis")]
    NoActiveFunction,

    /// The element kind does not fit this parameter entry point
    #[error("parameter `{0}` does not match the declared signature")]
    KindMismatch(String),

    /// The name already occupies the function frame
    #[error("parameter `{0}` is already declared")]
    Exists(String),
}

/// Rejected field declaration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// No class is under analysis
    #[error("no class is under analysis")]
    NoActiveClass,

    /// Classes cannot be fields of another class
    #[error("class `{0}` cannot be declared as a field")]
    ClassAsField(String),

    /// A field cannot embed the class under analysis by value
    #[error("field `{0}` recursively embeds the class under analysis")]
    Recursive(String),

    /// The name already occupies the class frame
    #[error("field `{0}` is already declared")]
    Exists(String),
}
