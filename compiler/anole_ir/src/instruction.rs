//! Instruction records.
//!
//! Each instruction is an operation tag with at most one typed operand. Jump
//! targets and lambda end offsets are absolute indices into the same `Code`.

use std::fmt;

use crate::{BinaryOp, UnaryOp};

/// A literal operand for `Push`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    None,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::None => f.write_str("none"),
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Float(x) => write!(f, "{x:?}"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// A single bytecode instruction.
///
/// Stack effects are written `before -- after`, top of stack rightmost.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Instruction {
    /// `-- value`: push a fresh cell holding the literal.
    Push(Literal),
    /// `value --`
    Pop,
    /// `a -- a a`: push the same cell again.
    Dup,
    /// Declare `name` in the current scope (idempotent).
    Create(String),
    /// `-- cell`: resolve `name` and push its cell (aliased, not copied).
    Load(String),
    /// `target value -- target`: rebind `target` to `value`'s object.
    Store,
    /// `value --`: bind `name` in the current scope to a fresh cell holding
    /// `value`'s object.
    Bind(String),
    /// `cell --`: bind `name` in the current scope to `cell` itself.
    BindRef(String),
    /// `operand -- result`
    Unary(UnaryOp),
    /// `lhs rhs -- result`
    Binary(BinaryOp),
    /// Enter a nested block scope.
    ScopeBegin,
    /// Leave the innermost block scope.
    ScopeEnd,
    /// Unconditional jump.
    Jump(usize),
    /// `cond --`: jump when `cond` is truthy.
    JumpIf(usize),
    /// `cond --`: jump when `cond` is falsy.
    JumpIfNot(usize),
    /// `arg1 .. argN callee -- result`
    Call(usize),
    /// `value --`: hand `value` to the caller and end the frame.
    Return,
    /// `-- function`: capture the current scope; the body starts at the next
    /// instruction and execution resumes at `end`.
    LambdaDecl { arity: usize, end: usize },
    /// `v1 .. vN -- list`
    BuildList(usize),
    /// `k1 v1 .. kN vN -- dict`
    BuildDict(usize),
    /// `container index -- cell`
    Index,
    /// `object -- cell`
    LoadMember(String),
    /// `base1 .. baseN -- class`: the current scope becomes the class body.
    BuildClass { name: String, bases: usize },
    /// `-- enum`: the current scope becomes the enum body.
    BuildEnum,
}

impl Instruction {
    /// The absolute offset this instruction may transfer control to.
    pub fn target(&self) -> Option<usize> {
        match self {
            Instruction::Jump(t) | Instruction::JumpIf(t) | Instruction::JumpIfNot(t) => Some(*t),
            Instruction::LambdaDecl { end, .. } => Some(*end),
            _ => None,
        }
    }

    /// Retarget a jump or lambda declaration. Returns `false` for any other
    /// instruction.
    pub fn set_target(&mut self, target: usize) -> bool {
        match self {
            Instruction::Jump(t) | Instruction::JumpIf(t) | Instruction::JumpIfNot(t) => {
                *t = target;
                true
            }
            Instruction::LambdaDecl { end, .. } => {
                *end = target;
                true
            }
            _ => false,
        }
    }

    /// Short mnemonic used by the disassembler and in backtraces.
    pub const fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Push(_) => "push",
            Instruction::Pop => "pop",
            Instruction::Dup => "dup",
            Instruction::Create(_) => "create",
            Instruction::Load(_) => "load",
            Instruction::Store => "store",
            Instruction::Bind(_) => "bind",
            Instruction::BindRef(_) => "bindref",
            Instruction::Unary(_) => "unary",
            Instruction::Binary(_) => "binary",
            Instruction::ScopeBegin => "scopebegin",
            Instruction::ScopeEnd => "scopeend",
            Instruction::Jump(_) => "jump",
            Instruction::JumpIf(_) => "jumpif",
            Instruction::JumpIfNot(_) => "jumpifnot",
            Instruction::Call(_) => "call",
            Instruction::Return => "return",
            Instruction::LambdaDecl { .. } => "lambdadecl",
            Instruction::BuildList(_) => "buildlist",
            Instruction::BuildDict(_) => "builddict",
            Instruction::Index => "index",
            Instruction::LoadMember(_) => "loadmember",
            Instruction::BuildClass { .. } => "buildclass",
            Instruction::BuildEnum => "buildenum",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.mnemonic();
        match self {
            Instruction::Push(lit) => write!(f, "{op} {lit}"),
            Instruction::Create(name)
            | Instruction::Load(name)
            | Instruction::Bind(name)
            | Instruction::BindRef(name)
            | Instruction::LoadMember(name) => write!(f, "{op} {name}"),
            Instruction::Unary(un) => write!(f, "{op} {un}"),
            Instruction::Binary(bin) => write!(f, "{op} {bin}"),
            Instruction::Jump(t) | Instruction::JumpIf(t) | Instruction::JumpIfNot(t) => {
                write!(f, "{op} @{t}")
            }
            Instruction::Call(n) | Instruction::BuildList(n) | Instruction::BuildDict(n) => {
                write!(f, "{op} {n}")
            }
            Instruction::LambdaDecl { arity, end } => write!(f, "{op} {arity} @{end}"),
            Instruction::BuildClass { name, bases } => write!(f, "{op} {name} {bases}"),
            Instruction::Pop
            | Instruction::Dup
            | Instruction::Store
            | Instruction::ScopeBegin
            | Instruction::ScopeEnd
            | Instruction::Return
            | Instruction::Index
            | Instruction::BuildEnum => f.write_str(op),
        }
    }
}
