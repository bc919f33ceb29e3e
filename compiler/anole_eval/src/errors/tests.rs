use super::*;
use pretty_assertions::assert_eq;

// Kind → message round-trip

#[test]
fn division_by_zero_has_correct_kind() {
    let err = division_by_zero();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    assert_eq!(err.message, "division by zero");
    assert_eq!(err.category(), ErrorCategory::ArithmeticError);
}

#[test]
fn integer_overflow_has_correct_kind() {
    let err = integer_overflow("addition");
    assert_eq!(
        err.kind,
        EvalErrorKind::IntegerOverflow {
            operation: "addition"
        }
    );
    assert_eq!(err.message, "integer overflow in addition");
}

#[test]
fn not_callable_is_type_error() {
    let err = not_callable("int");
    assert_eq!(err.category(), ErrorCategory::TypeError);
    assert_eq!(err.to_string(), "TypeError: int object is not callable");
}

#[test]
fn arity_mismatch_singular_and_plural() {
    let one = wrong_arg_count("f", 1, 2);
    assert_eq!(one.message, "f expects 1 argument, got 2");
    let many = wrong_arg_count("g", 3, 4);
    assert_eq!(many.message, "g expects 3 arguments, got 4");
    assert_eq!(many.category(), ErrorCategory::ArgumentError);
}

#[test]
fn default_constructor_only_is_argument_error() {
    let err = default_constructor_only("Point", 1);
    assert_eq!(err.category(), ErrorCategory::ArgumentError);
    assert!(err.message.contains("Point"));
}

#[test]
fn access_errors_have_their_own_categories() {
    assert_eq!(index_out_of_bounds(3, 3).category(), ErrorCategory::IndexError);
    assert_eq!(key_not_found("\"a\"").category(), ErrorCategory::KeyError);
    assert_eq!(
        undefined_member("x", "instance").category(),
        ErrorCategory::AttributeError
    );
    assert_eq!(
        index_out_of_bounds(-4, 3).message,
        "index -4 out of range for length 3"
    );
}

#[test]
fn malformed_code_is_runtime_error() {
    assert_eq!(
        stack_underflow("store").category(),
        ErrorCategory::RuntimeError
    );
    assert_eq!(scope_underflow().category(), ErrorCategory::RuntimeError);
    assert_eq!(
        recursion_limit_exceeded(64).message,
        "maximum call depth exceeded (limit: 64)"
    );
}

#[test]
fn binary_mismatch_names_operator() {
    let err = binary_type_mismatch(BinaryOp::Add, "int", "str");
    assert_eq!(
        err.message,
        "operator `+` cannot be applied to int and str"
    );
}

// Backtrace

#[test]
fn frames_accumulate_innermost_first() {
    let err = not_callable("int")
        .with_frame("<function@4>", 7)
        .with_frame("<main>", 12);
    let frames = err.backtrace.frames();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].name, "<function@4>");
    assert_eq!(frames[1].pc, 12);
    assert_eq!(
        err.backtrace.to_string(),
        "stack backtrace:\n  0: <function@4> at pc 7\n  1: <main> at pc 12\n"
    );
}

#[test]
fn equality_ignores_backtrace() {
    let bare = division_by_zero();
    let traced = division_by_zero().with_frame("<main>", 0);
    assert_eq!(bare, traced);
}

#[test]
fn custom_message_is_runtime_error() {
    let err = EvalError::new("boom");
    assert_eq!(err.to_string(), "RuntimeError: boom");
}
