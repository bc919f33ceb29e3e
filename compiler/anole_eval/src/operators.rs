//! Binary operator implementations for the interpreter.
//!
//! Direct enum-based dispatch: the operand type set is closed, so pattern
//! matching is preferred over trait objects for exhaustiveness checking.
//!
//! `==`, `!=` and `is` are total: they accept any pair of operands. Every
//! other operator fails with a `TypeError` on operand types it does not
//! define. Integer arithmetic is checked and never wraps.

use std::cmp::Ordering;

use anole_ir::BinaryOp;

use crate::errors::{
    binary_type_mismatch, division_by_zero, integer_overflow, modulo_by_zero, EvalResult,
};
use crate::value::{Address, Heap, ListObject, Object};

// Helper functions for repetitive checked arithmetic patterns

/// Checked arithmetic operation with overflow handling.
#[inline]
fn checked_arith(result: Option<i64>, op_name: &'static str) -> EvalResult {
    result.map(Object::Int).ok_or_else(|| integer_overflow(op_name))
}

/// Checked division or remainder with zero guard.
#[inline]
fn checked_div(
    divisor: i64,
    op: impl FnOnce() -> Option<i64>,
    zero: fn() -> crate::errors::EvalError,
    op_name: &'static str,
) -> EvalResult {
    if divisor == 0 {
        Err(zero())
    } else {
        op().map(Object::Int).ok_or_else(|| integer_overflow(op_name))
    }
}

#[inline]
fn comparison(ordering: Option<Ordering>, op: BinaryOp) -> Object {
    let result = match op {
        BinaryOp::Lt => ordering == Some(Ordering::Less),
        BinaryOp::LtEq => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        BinaryOp::Gt => ordering == Some(Ordering::Greater),
        BinaryOp::GtEq => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        _ => false,
    };
    Object::Bool(result)
}

#[inline]
fn is_ordering(op: BinaryOp) -> bool {
    matches!(
        op,
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq
    )
}

#[allow(clippy::cast_precision_loss, reason = "int to float promotion")]
#[inline]
fn promote(n: i64) -> f64 {
    n as f64
}

// Direct Dispatch Function

/// Evaluate `left op right`.
pub fn evaluate_binary(left: &Object, right: &Object, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Eq => return Ok(Object::Bool(left == right)),
        BinaryOp::NotEq => return Ok(Object::Bool(left != right)),
        BinaryOp::Is => return Ok(Object::Bool(left.is_same(right))),
        _ => {}
    }
    match (left, right) {
        (Object::Int(a), Object::Int(b)) => eval_int_binary(*a, *b, op),
        (Object::Float(a), Object::Float(b)) => eval_float_binary(*a, *b, op),
        (Object::Int(a), Object::Float(b)) => eval_float_binary(promote(*a), *b, op),
        (Object::Float(a), Object::Int(b)) => eval_float_binary(*a, promote(*b), op),
        (Object::Str(a), Object::Str(b)) => eval_string_binary(a, b, op),
        (Object::Str(s), Object::Int(n)) | (Object::Int(n), Object::Str(s))
            if op == BinaryOp::Mul =>
        {
            repeat(s, *n)
        }
        (Object::List(a), Object::List(b)) if op == BinaryOp::Add => Ok(concat(a, b)),
        _ => Err(binary_type_mismatch(op, left.type_name(), right.type_name())),
    }
}

// Type-Specific Evaluation Functions

fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => checked_arith(a.checked_add(b), "addition"),
        BinaryOp::Sub => checked_arith(a.checked_sub(b), "subtraction"),
        BinaryOp::Mul => checked_arith(a.checked_mul(b), "multiplication"),
        BinaryOp::Div => checked_div(b, || a.checked_div(b), division_by_zero, "division"),
        BinaryOp::Mod => checked_div(b, || a.checked_rem(b), modulo_by_zero, "remainder"),
        BinaryOp::BitAnd => Ok(Object::Int(a & b)),
        BinaryOp::BitOr => Ok(Object::Int(a | b)),
        BinaryOp::BitXor => Ok(Object::Int(a ^ b)),
        BinaryOp::Shl => shift_amount(b)
            .and_then(|s| a.checked_shl(s))
            .map(Object::Int)
            .ok_or_else(|| integer_overflow("left shift")),
        BinaryOp::Shr => shift_amount(b)
            .and_then(|s| a.checked_shr(s))
            .map(Object::Int)
            .ok_or_else(|| integer_overflow("right shift")),
        op if is_ordering(op) => Ok(comparison(Some(a.cmp(&b)), op)),
        _ => Err(binary_type_mismatch(op, "int", "int")),
    }
}

fn shift_amount(b: i64) -> Option<u32> {
    u32::try_from(b).ok().filter(|s| *s < 64)
}

/// IEEE 754 semantics: division by zero yields an infinity or NaN.
fn eval_float_binary(a: f64, b: f64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Object::Float(a + b)),
        BinaryOp::Sub => Ok(Object::Float(a - b)),
        BinaryOp::Mul => Ok(Object::Float(a * b)),
        BinaryOp::Div => Ok(Object::Float(a / b)),
        BinaryOp::Mod => Ok(Object::Float(a % b)),
        op if is_ordering(op) => Ok(comparison(a.partial_cmp(&b), op)),
        _ => Err(binary_type_mismatch(op, "float", "float")),
    }
}

fn eval_string_binary(a: &str, b: &str, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Object::string(format!("{a}{b}"))),
        // Lexicographic comparison
        op if is_ordering(op) => Ok(comparison(Some(a.cmp(b)), op)),
        _ => Err(binary_type_mismatch(op, "str", "str")),
    }
}

/// Longest string (in bytes) a repetition may produce.
const MAX_REPEAT_LEN: usize = 1 << 30;

fn repeat(s: &str, n: i64) -> EvalResult {
    let count = usize::try_from(n.max(0)).map_err(|_| integer_overflow("repetition"))?;
    match s.len().checked_mul(count) {
        Some(len) if len <= MAX_REPEAT_LEN => Ok(Object::string(s.repeat(count))),
        _ => Err(integer_overflow("repetition")),
    }
}

/// A new list with fresh cells over the elements of both operands.
fn concat(a: &Heap<ListObject>, b: &Heap<ListObject>) -> Object {
    let items: Vec<Address> = a
        .snapshot()
        .iter()
        .chain(b.snapshot().iter())
        .map(|item| Address::new(item.get()))
        .collect();
    Object::list(items)
}
