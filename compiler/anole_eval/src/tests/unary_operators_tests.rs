//! Tests for unary operator implementations.
//!
//! Relocated from `unary_operators.rs` per coding guidelines (>200 lines).

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use crate::errors::{ErrorCategory, EvalErrorKind};
use crate::unary_operators::evaluate_unary;
use crate::value::Object;
use anole_ir::UnaryOp;

mod negation {
    use super::*;

    #[test]
    fn int_positive() {
        assert_eq!(
            evaluate_unary(&Object::Int(5), UnaryOp::Neg).unwrap(),
            Object::Int(-5)
        );
    }

    #[test]
    fn int_negative() {
        assert_eq!(
            evaluate_unary(&Object::Int(-5), UnaryOp::Neg).unwrap(),
            Object::Int(5)
        );
    }

    #[test]
    fn int_min_overflows() {
        let err = evaluate_unary(&Object::Int(i64::MIN), UnaryOp::Neg).unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::IntegerOverflow { .. }));
    }

    #[test]
    fn float() {
        assert_eq!(
            evaluate_unary(&Object::Float(1.5), UnaryOp::Neg).unwrap(),
            Object::Float(-1.5)
        );
    }

    #[test]
    fn string_is_type_error() {
        let err = evaluate_unary(&Object::string("x"), UnaryOp::Neg).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::TypeError);
    }
}

mod logical_not {
    use super::*;

    #[test]
    fn follows_truthiness() {
        for (value, expected) in [
            (Object::Bool(true), false),
            (Object::Bool(false), true),
            (Object::Int(0), true),
            (Object::string("x"), false),
            (Object::None, true),
            (Object::list(Vec::new()), true),
        ] {
            assert_eq!(
                evaluate_unary(&value, UnaryOp::Not).unwrap(),
                Object::Bool(expected),
                "not {value}"
            );
        }
    }
}

mod bitwise_not {
    use super::*;

    #[test]
    fn int() {
        assert_eq!(
            evaluate_unary(&Object::Int(0), UnaryOp::BitNot).unwrap(),
            Object::Int(-1)
        );
        assert_eq!(
            evaluate_unary(&Object::Int(5), UnaryOp::BitNot).unwrap(),
            Object::Int(-6)
        );
    }

    #[test]
    fn non_int_is_type_error() {
        for value in [Object::Float(1.0), Object::Bool(true)] {
            let err = evaluate_unary(&value, UnaryOp::BitNot).unwrap_err();
            assert!(matches!(err.kind, EvalErrorKind::InvalidUnaryOp { .. }));
        }
    }
}
