//! Runtime error types.
//!
//! Every fault the runtime can raise is an `EvalError` built by one of the
//! `#[cold]` factory functions below. Faults are never recovered inside the
//! core: they travel back through every frame with `?`, each frame appending
//! a backtrace entry on the way, until the driver reports them.
//!
//! # Structured Error Categories
//!
//! `EvalErrorKind` carries the structured data; `ErrorCategory` groups kinds
//! into the user-facing error names (`TypeError`, `IndexError`, ...).

use std::fmt;

use anole_ir::{BinaryOp, UnaryOp};

use crate::value::Object;

/// Result of evaluation.
pub type EvalResult = Result<Object, EvalError>;

/// User-facing error name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Capability unsupported by the receiver, or operand type mismatch.
    TypeError,
    /// Out-of-range container access.
    IndexError,
    /// Missing dictionary key under the strict key policy.
    KeyError,
    /// Unresolved member name.
    AttributeError,
    /// Wrong argument count for a function or constructor.
    ArgumentError,
    /// Division by zero or integer overflow.
    ArithmeticError,
    /// Call depth exceeded or malformed code.
    RuntimeError,
}

impl ErrorCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TypeError => "TypeError",
            Self::IndexError => "IndexError",
            Self::KeyError => "KeyError",
            Self::AttributeError => "AttributeError",
            Self::ArgumentError => "ArgumentError",
            Self::ArithmeticError => "ArithmeticError",
            Self::RuntimeError => "RuntimeError",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed error kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // TypeError
    Unsupported {
        capability: &'static str,
        type_name: String,
    },
    BinaryTypeMismatch {
        op: BinaryOp,
        left: String,
        right: String,
    },
    InvalidUnaryOp {
        op: UnaryOp,
        type_name: String,
    },
    NotCallable {
        type_name: String,
    },
    InvalidIndex {
        receiver: String,
        index: String,
    },
    WrongArgType {
        function: String,
        expected: &'static str,
        got: String,
    },

    // IndexError
    IndexOutOfBounds {
        index: i64,
        len: usize,
    },

    // KeyError
    KeyNotFound {
        key: String,
    },

    // AttributeError
    UndefinedMember {
        member: String,
        type_name: String,
    },

    // ArgumentError
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    DefaultConstructorOnly {
        class: String,
        got: usize,
    },

    // ArithmeticError
    DivisionByZero,
    ModuloByZero,
    IntegerOverflow {
        operation: &'static str,
    },

    // RuntimeError
    StackOverflow {
        depth: usize,
    },
    StackUnderflow {
        instruction: &'static str,
    },
    ScopeUnderflow,

    /// Catch-all for faults raised by built-ins with a free-form message.
    Custom {
        message: String,
    },
}

impl EvalErrorKind {
    /// The user-facing error name for this kind.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unsupported { .. }
            | Self::BinaryTypeMismatch { .. }
            | Self::InvalidUnaryOp { .. }
            | Self::NotCallable { .. }
            | Self::InvalidIndex { .. }
            | Self::WrongArgType { .. } => ErrorCategory::TypeError,
            Self::IndexOutOfBounds { .. } => ErrorCategory::IndexError,
            Self::KeyNotFound { .. } => ErrorCategory::KeyError,
            Self::UndefinedMember { .. } => ErrorCategory::AttributeError,
            Self::ArityMismatch { .. } | Self::DefaultConstructorOnly { .. } => {
                ErrorCategory::ArgumentError
            }
            Self::DivisionByZero | Self::ModuloByZero | Self::IntegerOverflow { .. } => {
                ErrorCategory::ArithmeticError
            }
            Self::StackOverflow { .. }
            | Self::StackUnderflow { .. }
            | Self::ScopeUnderflow
            | Self::Custom { .. } => ErrorCategory::RuntimeError,
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported {
                capability,
                type_name,
            } => write!(f, "{type_name} does not support {capability}"),
            Self::BinaryTypeMismatch { op, left, right } => {
                write!(f, "operator `{op}` cannot be applied to {left} and {right}")
            }
            Self::InvalidUnaryOp { op, type_name } => {
                write!(f, "operator `{op}` cannot be applied to {type_name}")
            }
            Self::NotCallable { type_name } => write!(f, "{type_name} object is not callable"),
            Self::InvalidIndex { receiver, index } => {
                write!(f, "cannot index {receiver} with {index}")
            }
            Self::WrongArgType {
                function,
                expected,
                got,
            } => write!(f, "{function} expects {expected}, got {got}"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::KeyNotFound { key } => write!(f, "key not found: {key}"),
            Self::UndefinedMember { member, type_name } => {
                write!(f, "{type_name} has no member '{member}'")
            }
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => {
                let arg_word = if *expected == 1 {
                    "argument"
                } else {
                    "arguments"
                };
                write!(f, "{name} expects {expected} {arg_word}, got {got}")
            }
            Self::DefaultConstructorOnly { class, got } => write!(
                f,
                "class {class} has only a default constructor but {got} arguments were given"
            ),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::ModuloByZero => write!(f, "modulo by zero"),
            Self::IntegerOverflow { operation } => write!(f, "integer overflow in {operation}"),
            Self::StackOverflow { depth } => {
                write!(f, "maximum call depth exceeded (limit: {depth})")
            }
            Self::StackUnderflow { instruction } => {
                write!(f, "operand stack underflow in `{instruction}`")
            }
            Self::ScopeUnderflow => write!(f, "scope end without matching scope begin"),
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// A single frame in an evaluation backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    /// Label of the function (or `<main>`) executing in that frame.
    pub name: String,
    /// Program counter of the faulting instruction in that frame.
    pub pc: usize,
}

/// Frames a fault unwound through, innermost first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "stack backtrace:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            writeln!(f, "  {i}: {} at pc {}", frame.name, frame.pc)?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    /// Structured error kind.
    pub kind: EvalErrorKind,
    /// Human-readable message; equals `kind.to_string()`.
    pub message: String,
    /// Frames the error unwound through.
    pub backtrace: EvalBacktrace,
}

impl EvalError {
    /// Create a free-form error (`RuntimeError` category).
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_kind(EvalErrorKind::Custom {
            message: message.into(),
        })
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            backtrace: EvalBacktrace::default(),
        }
    }

    #[inline]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Record that the error unwound through a frame.
    #[must_use]
    pub fn with_frame(mut self, name: impl Into<String>, pc: usize) -> Self {
        self.backtrace.frames.push(BacktraceFrame {
            name: name.into(),
            pc,
        });
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category(), self.message)
    }
}

impl std::error::Error for EvalError {}

impl PartialEq for EvalError {
    /// Errors compare by kind; the backtrace is diagnostic only.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

// Capability Errors

/// The receiver's variant does not implement a capability.
#[cold]
pub fn unsupported(capability: &'static str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Unsupported {
        capability,
        type_name: type_name.to_string(),
    })
}

/// Value is not callable.
#[cold]
pub fn not_callable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        type_name: type_name.to_string(),
    })
}

/// Container cannot be indexed with this operand type.
#[cold]
pub fn cannot_index(receiver: &str, index: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidIndex {
        receiver: receiver.to_string(),
        index: index.to_string(),
    })
}

/// A built-in got an argument of the wrong type.
#[cold]
pub fn wrong_arg_type(function: &str, expected: &'static str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::WrongArgType {
        function: function.to_string(),
        expected,
        got: got.to_string(),
    })
}

// Operator Errors

/// Operand types do not fit a binary operator.
#[cold]
pub fn binary_type_mismatch(op: BinaryOp, left: &str, right: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BinaryTypeMismatch {
        op,
        left: left.to_string(),
        right: right.to_string(),
    })
}

/// Operand type does not fit a unary operator.
#[cold]
pub fn invalid_unary_op(op: UnaryOp, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidUnaryOp {
        op,
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ModuloByZero)
}

#[cold]
pub fn integer_overflow(operation: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow { operation })
}

// Access Errors

/// Index out of range.
#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, len })
}

/// Missing dictionary key.
#[cold]
pub fn key_not_found(key: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::KeyNotFound {
        key: key.to_string(),
    })
}

/// Unresolved member name.
#[cold]
pub fn undefined_member(member: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedMember {
        member: member.to_string(),
        type_name: type_name.to_string(),
    })
}

// Call Errors

/// Wrong number of arguments.
#[cold]
pub fn wrong_arg_count(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    })
}

/// Arguments given to a class without `__init__`.
#[cold]
pub fn default_constructor_only(class: &str, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DefaultConstructorOnly {
        class: class.to_string(),
        got,
    })
}

/// Configured call depth exceeded.
#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth })
}

// Malformed Code

#[cold]
pub fn stack_underflow(instruction: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackUnderflow { instruction })
}

#[cold]
pub fn scope_underflow() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ScopeUnderflow)
}

#[cfg(test)]
mod tests;
