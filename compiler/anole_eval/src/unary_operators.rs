//! Unary operator implementations for the interpreter.

use anole_ir::UnaryOp;

use crate::errors::{integer_overflow, invalid_unary_op, EvalResult};
use crate::value::Object;

/// Evaluate `op value`.
///
/// `not` accepts any operand and negates its truthiness.
pub fn evaluate_unary(value: &Object, op: UnaryOp) -> EvalResult {
    match (value, op) {
        // Numeric negation
        (Object::Int(n), UnaryOp::Neg) => n
            .checked_neg()
            .map(Object::Int)
            .ok_or_else(|| integer_overflow("negation")),
        (Object::Float(x), UnaryOp::Neg) => Ok(Object::Float(-x)),

        // Logical not
        (_, UnaryOp::Not) => Ok(Object::Bool(!value.to_bool())),

        // Bitwise not
        (Object::Int(n), UnaryOp::BitNot) => Ok(Object::Int(!*n)),

        // Invalid combinations
        _ => Err(invalid_unary_op(op, value.type_name())),
    }
}
