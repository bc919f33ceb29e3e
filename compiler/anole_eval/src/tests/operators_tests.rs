//! Tests for binary operator implementations.
//!
//! Relocated from `operators.rs` per coding guidelines (>200 lines).

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use crate::errors::{ErrorCategory, EvalErrorKind};
use crate::operators::evaluate_binary;
use crate::value::Object;
use anole_ir::BinaryOp;

fn int(n: i64) -> Object {
    Object::Int(n)
}

fn ints(values: &[i64]) -> Object {
    Object::list_of(values.iter().copied().map(Object::Int))
}

#[test]
fn test_int_operations() {
    assert_eq!(
        evaluate_binary(&int(2), &int(3), BinaryOp::Add).unwrap(),
        int(5)
    );
    assert_eq!(
        evaluate_binary(&int(5), &int(3), BinaryOp::Sub).unwrap(),
        int(2)
    );
    assert_eq!(
        evaluate_binary(&int(2), &int(3), BinaryOp::Mul).unwrap(),
        int(6)
    );
    assert_eq!(
        evaluate_binary(&int(7), &int(2), BinaryOp::Div).unwrap(),
        int(3)
    );
    assert_eq!(
        evaluate_binary(&int(7), &int(2), BinaryOp::Mod).unwrap(),
        int(1)
    );
}

#[test]
fn test_int_division_truncates_toward_zero() {
    assert_eq!(
        evaluate_binary(&int(-7), &int(2), BinaryOp::Div).unwrap(),
        int(-3)
    );
    assert_eq!(
        evaluate_binary(&int(-7), &int(2), BinaryOp::Mod).unwrap(),
        int(-1)
    );
    assert_eq!(
        evaluate_binary(&int(7), &int(-2), BinaryOp::Mod).unwrap(),
        int(1)
    );
}

#[test]
fn test_division_by_zero() {
    let err = evaluate_binary(&int(1), &int(0), BinaryOp::Div).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    let err = evaluate_binary(&int(1), &int(0), BinaryOp::Mod).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::ModuloByZero);
    assert_eq!(err.category(), ErrorCategory::ArithmeticError);
}

#[test]
fn test_overflow_is_an_error() {
    for (a, b, op) in [
        (i64::MAX, 1, BinaryOp::Add),
        (i64::MIN, 1, BinaryOp::Sub),
        (i64::MAX, 2, BinaryOp::Mul),
        (i64::MIN, -1, BinaryOp::Div),
        (i64::MIN, -1, BinaryOp::Mod),
    ] {
        let err = evaluate_binary(&int(a), &int(b), op).unwrap_err();
        assert!(
            matches!(err.kind, EvalErrorKind::IntegerOverflow { .. }),
            "{a} {op} {b}: {err}"
        );
    }
}

#[test]
fn test_bitwise_and_shifts() {
    assert_eq!(
        evaluate_binary(&int(0b1100), &int(0b1010), BinaryOp::BitAnd).unwrap(),
        int(0b1000)
    );
    assert_eq!(
        evaluate_binary(&int(0b1100), &int(0b1010), BinaryOp::BitOr).unwrap(),
        int(0b1110)
    );
    assert_eq!(
        evaluate_binary(&int(0b1100), &int(0b1010), BinaryOp::BitXor).unwrap(),
        int(0b0110)
    );
    assert_eq!(
        evaluate_binary(&int(1), &int(4), BinaryOp::Shl).unwrap(),
        int(16)
    );
    assert_eq!(
        evaluate_binary(&int(-16), &int(2), BinaryOp::Shr).unwrap(),
        int(-4)
    );
    assert!(evaluate_binary(&int(1), &int(64), BinaryOp::Shl).is_err());
    assert!(evaluate_binary(&int(1), &int(-1), BinaryOp::Shr).is_err());
}

#[test]
fn test_comparisons() {
    assert_eq!(
        evaluate_binary(&int(2), &int(3), BinaryOp::Lt).unwrap(),
        Object::Bool(true)
    );
    assert_eq!(
        evaluate_binary(&int(3), &int(2), BinaryOp::Gt).unwrap(),
        Object::Bool(true)
    );
    assert_eq!(
        evaluate_binary(&int(2), &int(2), BinaryOp::LtEq).unwrap(),
        Object::Bool(true)
    );
    assert_eq!(
        evaluate_binary(&int(2), &int(2), BinaryOp::Eq).unwrap(),
        Object::Bool(true)
    );
    assert_eq!(
        evaluate_binary(&int(2), &Object::Float(2.5), BinaryOp::Lt).unwrap(),
        Object::Bool(true)
    );
}

#[test]
fn test_nan_compares_false() {
    let nan = Object::Float(f64::NAN);
    for op in [BinaryOp::Lt, BinaryOp::LtEq, BinaryOp::Gt, BinaryOp::GtEq] {
        assert_eq!(
            evaluate_binary(&nan, &Object::Float(1.0), op).unwrap(),
            Object::Bool(false)
        );
    }
}

#[test]
fn test_mixed_numeric_promotes_to_float() {
    assert_eq!(
        evaluate_binary(&int(1), &Object::Float(0.5), BinaryOp::Add).unwrap(),
        Object::Float(1.5)
    );
    assert_eq!(
        evaluate_binary(&Object::Float(3.0), &int(2), BinaryOp::Div).unwrap(),
        Object::Float(1.5)
    );
}

#[test]
fn test_float_division_by_zero_is_infinite() {
    let result = evaluate_binary(&Object::Float(1.0), &Object::Float(0.0), BinaryOp::Div).unwrap();
    assert!(matches!(result, Object::Float(x) if x.is_infinite()));
}

#[test]
fn test_string_concatenation() {
    let result = evaluate_binary(
        &Object::string("hello"),
        &Object::string(" world"),
        BinaryOp::Add,
    )
    .unwrap();
    assert_eq!(result, Object::string("hello world"));
}

#[test]
fn test_string_ordering_and_repetition() {
    assert_eq!(
        evaluate_binary(&Object::string("abc"), &Object::string("abd"), BinaryOp::Lt).unwrap(),
        Object::Bool(true)
    );
    assert_eq!(
        evaluate_binary(&Object::string("ab"), &int(3), BinaryOp::Mul).unwrap(),
        Object::string("ababab")
    );
    assert_eq!(
        evaluate_binary(&int(-1), &Object::string("ab"), BinaryOp::Mul).unwrap(),
        Object::string("")
    );
}

#[test]
fn test_oversized_repetition_is_an_error() {
    for count in [i64::MAX, 1 << 30] {
        let err = evaluate_binary(&Object::string("ab"), &int(count), BinaryOp::Mul).unwrap_err();
        assert!(
            matches!(err.kind, EvalErrorKind::IntegerOverflow { .. }),
            "{count}: {err:?}"
        );
    }
    // Empty strings never grow.
    assert_eq!(
        evaluate_binary(&Object::string(""), &int(i64::MAX), BinaryOp::Mul).unwrap(),
        Object::string("")
    );
}

#[test]
fn test_list_concatenation_copies_cells() {
    let a = ints(&[1, 2]);
    let b = ints(&[3]);
    let joined = evaluate_binary(&a, &b, BinaryOp::Add).unwrap();
    assert_eq!(joined.to_string(), "[1, 2, 3]");

    let Object::List(items) = &joined else {
        panic!("expected a list, got {joined:?}")
    };
    items.get(0).unwrap().bind(int(9));
    assert_eq!(a.to_string(), "[1, 2]");
}

#[test]
fn test_equality_is_total() {
    let pairs = [
        (int(1), Object::string("1")),
        (Object::None, Object::Bool(false)),
        (ints(&[1]), Object::dict()),
        (Object::Bool(true), int(1)),
    ];
    for (a, b) in &pairs {
        assert_eq!(
            evaluate_binary(a, b, BinaryOp::Eq).unwrap(),
            Object::Bool(false)
        );
        assert_eq!(
            evaluate_binary(a, b, BinaryOp::NotEq).unwrap(),
            Object::Bool(true)
        );
    }
}

#[test]
fn test_structural_equality_vs_identity() {
    let a = ints(&[1, 2]);
    let b = ints(&[1, 2]);
    assert_eq!(
        evaluate_binary(&a, &b, BinaryOp::Eq).unwrap(),
        Object::Bool(true)
    );
    assert_eq!(
        evaluate_binary(&a, &b, BinaryOp::Is).unwrap(),
        Object::Bool(false)
    );
    assert_eq!(
        evaluate_binary(&a, &a.clone(), BinaryOp::Is).unwrap(),
        Object::Bool(true)
    );
    assert_eq!(
        evaluate_binary(&Object::None, &Object::None, BinaryOp::Is).unwrap(),
        Object::Bool(true)
    );
}

#[test]
fn test_type_mismatch() {
    let err = evaluate_binary(&int(1), &Object::string("a"), BinaryOp::Add).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::TypeError);
    assert!(matches!(
        err.kind,
        EvalErrorKind::BinaryTypeMismatch {
            op: BinaryOp::Add,
            ..
        }
    ));
    assert!(evaluate_binary(&Object::Float(1.0), &Object::Float(1.0), BinaryOp::BitAnd).is_err());
    assert!(evaluate_binary(&Object::None, &Object::None, BinaryOp::Lt).is_err());
}
