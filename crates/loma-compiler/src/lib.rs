//! Loma compiler middle end
//!
//! Resolves identifiers through nested lexical scopes into a flat,
//! uniquely-named symbol space and maps resolved symbols onto operands of
//! the abstract instruction set in [`loma_asm`].
//!
//! The semantic walker owns the AST and drives this crate in traversal
//! order: declarations and scope boundaries go through the [`Binder`],
//! which validates them against the current frame and forwards accepted
//! declarations to the [`SymbolRegistry`]; expression lowering then
//! resolves identifiers back through the same stack and uses the minted
//! unique names as instruction operands.
//!
//! # Structure
//!
//! - [`symbols`] - scope frames, declaration binder, identifier registry
//! - [`lower`] - resolved-symbol to operand mapping
//! - [`error`] - in-band declaration statuses

pub mod error;
pub mod lower;
pub mod symbols;

pub use error::{ClassError, DeclareError, FieldError, FunctionError, ParamError};
pub use lower::Lowering;
pub use symbols::binder::Binder;
pub use symbols::element::{Element, ElementKind, Param, ParamKind, ValueType};
pub use symbols::registry::{SymbolInfo, SymbolKind, SymbolRegistry};
pub use symbols::table::{Scope, ScopeKind, ScopeStack};
