//! Abstract assembly representation for the Loma compiler
//!
//! The middle end lowers resolved programs into a target-independent
//! instruction sequence. Operands carry an explicit addressing mode and
//! instructions enforce their structural preconditions at construction
//! time, so a well-typed instruction value is well-formed by the time the
//! backend sees it.
//!
//! # Structure
//!
//! - [`Operand`] - one operand: register, immediate, memory reference, or label
//! - [`Instruction`] - one operation with its typed operand payload
//! - [`verify`] - structural validation independent of debug assertions
//! - [`pretty`] - human-readable instruction dumps

pub mod instr;
pub mod operand;
pub mod pretty;
pub mod verify;

pub use instr::{Instruction, Operation};
pub use operand::{Addressing, DataType, Operand, RegisterId};
pub use pretty::dump;
pub use verify::{verify, verify_program, VerifyError};
