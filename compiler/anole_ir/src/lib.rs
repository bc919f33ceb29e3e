//! Anole IR - the bytecode contract between compiler and runtime.
//!
//! The compiler front end (lexer, parser, lowering) lives outside this
//! workspace. What it hands to the runtime is a [`Code`]: an ordered,
//! indexable sequence of [`Instruction`]s plus a starting offset. This crate
//! holds that contract and nothing else, so both sides can depend on it
//! without depending on each other.
//!
//! # Design Philosophy
//!
//! - **Append, then freeze**: `CodeBuilder` is the only mutable form; a
//!   finished `Code` is immutable and cheap to share via `SharedCode`.
//! - **Typed operands**: every instruction carries its operand in the enum
//!   variant (name, offset, count, or literal) instead of an untyped slot.
//! - **Serializable on demand**: the `serde` feature derives `Serialize` and
//!   `Deserialize` for every type so a driver can load pre-compiled images.

mod code;
mod instruction;
mod operators;

pub use code::{Code, CodeBuilder, CodeError, SharedCode};
pub use instruction::{Instruction, Literal};
pub use operators::{BinaryOp, UnaryOp};
