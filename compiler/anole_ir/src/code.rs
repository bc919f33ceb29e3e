//! Instruction sequences.
//!
//! `CodeBuilder` is append-only apart from jump back-patching; `finish()`
//! produces an immutable `Code`. Functions and frames share one `Code`
//! through `SharedCode`, so a recursive function body is never copied.

#![allow(
    clippy::disallowed_types,
    reason = "Arc is the implementation of SharedCode"
)]

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::Instruction;

/// An immutable, ordered instruction sequence.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Code {
    instructions: Vec<Instruction>,
}

impl Code {
    /// Wrap an already-complete instruction list.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Code { instructions }
    }

    /// Instruction at `pc`, or `None` past the end.
    #[inline]
    pub fn get(&self, pc: usize) -> Option<&Instruction> {
        self.instructions.get(pc)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Check that every jump and lambda end lands inside `0..=len`.
    ///
    /// Landing exactly on `len` is allowed and ends the frame.
    pub fn validate(&self) -> Result<(), CodeError> {
        for (at, instruction) in self.instructions.iter().enumerate() {
            if let Some(target) = instruction.target() {
                if target > self.instructions.len() {
                    return Err(CodeError::TargetOutOfRange { at, target });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Code {
    /// One instruction per line, prefixed by its offset.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.instructions.len().max(1).to_string().len();
        for (pc, instruction) in self.instructions.iter().enumerate() {
            writeln!(f, "{pc:>width$}  {instruction}")?;
        }
        Ok(())
    }
}

impl From<Vec<Instruction>> for Code {
    fn from(instructions: Vec<Instruction>) -> Self {
        Code::new(instructions)
    }
}

/// Shared, read-only handle to a `Code`.
///
/// Cloning is O(1); every function object created from the same sequence
/// points at the same allocation.
#[derive(Clone, Debug)]
pub struct SharedCode(Arc<Code>);

impl SharedCode {
    pub fn new(code: Code) -> Self {
        SharedCode(Arc::new(code))
    }

    /// Whether two handles refer to the same sequence.
    pub fn ptr_eq(&self, other: &SharedCode) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for SharedCode {
    type Target = Code;

    fn deref(&self) -> &Code {
        &self.0
    }
}

impl From<Code> for SharedCode {
    fn from(code: Code) -> Self {
        SharedCode::new(code)
    }
}

/// Error raised while building or validating a `Code`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeError {
    /// `patch` addressed an offset that was never emitted.
    NoSuchInstruction { at: usize },
    /// `patch` addressed an instruction without a target operand.
    NotPatchable { at: usize },
    /// A jump or lambda end points past the end of the sequence.
    TargetOutOfRange { at: usize, target: usize },
}

impl fmt::Display for CodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeError::NoSuchInstruction { at } => write!(f, "no instruction at offset {at}"),
            CodeError::NotPatchable { at } => {
                write!(f, "instruction at offset {at} has no jump target")
            }
            CodeError::TargetOutOfRange { at, target } => {
                write!(f, "instruction at offset {at} jumps to {target}, past the end")
            }
        }
    }
}

impl std::error::Error for CodeError {}

/// Append-only builder used by the lowering pass.
#[derive(Debug, Default)]
pub struct CodeBuilder {
    instructions: Vec<Instruction>,
}

impl CodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction and return its offset.
    pub fn emit(&mut self, instruction: Instruction) -> usize {
        self.instructions.push(instruction);
        self.instructions.len() - 1
    }

    /// Offset the next emitted instruction will get.
    #[inline]
    pub fn here(&self) -> usize {
        self.instructions.len()
    }

    /// Back-patch the target of the jump or lambda declaration at `at`.
    pub fn patch(&mut self, at: usize, target: usize) -> Result<(), CodeError> {
        let instruction = self
            .instructions
            .get_mut(at)
            .ok_or(CodeError::NoSuchInstruction { at })?;
        if instruction.set_target(target) {
            Ok(())
        } else {
            Err(CodeError::NotPatchable { at })
        }
    }

    /// Patch the instruction at `at` to jump to the current end.
    pub fn patch_here(&mut self, at: usize) -> Result<(), CodeError> {
        let here = self.here();
        self.patch(at, here)
    }

    /// Freeze the sequence.
    pub fn finish(self) -> Code {
        Code::new(self.instructions)
    }
}

#[cfg(test)]
mod tests;
