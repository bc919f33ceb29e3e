//! End-to-end tests for loading and running code images.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::path::PathBuf;

use anole_eval::{buffer_handler, silent_handler, EvalErrorKind, Object};
use anole_ir::{BinaryOp, Code, CodeBuilder, Instruction, Literal};
use anolec::{
    decode_code, disasm_file, encode_code, load_code, run_code, run_file, DriverError,
    RunOptions,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write_image(dir: &TempDir, name: &str, code: &Code) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, encode_code(code).unwrap()).unwrap();
    path
}

/// `fact = lambda(n): n <= 1 ? 1 : n * fact(n - 1); println(fact(10)); fact(5)`
fn factorial_program() -> Code {
    let mut b = CodeBuilder::new();
    let decl = b.emit(Instruction::LambdaDecl { arity: 1, end: 0 });
    b.emit(Instruction::Bind("n".to_string()));
    b.emit(Instruction::Load("n".to_string()));
    b.emit(Instruction::Push(Literal::Int(1)));
    b.emit(Instruction::Binary(BinaryOp::LtEq));
    let recurse = b.emit(Instruction::JumpIfNot(0));
    b.emit(Instruction::Push(Literal::Int(1)));
    b.emit(Instruction::Return);
    b.patch_here(recurse).unwrap();
    for instruction in [
        Instruction::Load("n".to_string()),
        Instruction::Load("n".to_string()),
        Instruction::Push(Literal::Int(1)),
        Instruction::Binary(BinaryOp::Sub),
        Instruction::Load("fact".to_string()),
        Instruction::Call(1),
        Instruction::Binary(BinaryOp::Mul),
        Instruction::Return,
    ] {
        b.emit(instruction);
    }
    b.patch_here(decl).unwrap();
    for instruction in [
        Instruction::Bind("fact".to_string()),
        Instruction::Push(Literal::Int(10)),
        Instruction::Load("fact".to_string()),
        Instruction::Call(1),
        Instruction::Load("println".to_string()),
        Instruction::Call(1),
        Instruction::Pop,
        Instruction::Push(Literal::Int(5)),
        Instruction::Load("fact".to_string()),
        Instruction::Call(1),
        Instruction::Return,
    ] {
        b.emit(instruction);
    }
    b.finish()
}

#[test]
fn image_round_trip_preserves_code() {
    let code = factorial_program();
    let decoded = decode_code(&encode_code(&code).unwrap()).unwrap();
    assert_eq!(*decoded, code);
}

#[test]
fn runs_an_image_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, "fact.anolec", &factorial_program());

    let code = load_code(&path).unwrap();
    let handler = buffer_handler();
    let result = run_code(&code, &RunOptions::default(), handler.clone()).unwrap();
    assert_eq!(result, Object::Int(120));
    assert_eq!(handler.get_output(), "3628800\n");
}

#[test]
fn depth_limit_from_options() {
    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, "fact.anolec", &factorial_program());
    let mut options = RunOptions::default();
    options.config = options.config.max_call_depth(3);

    let code = load_code(&path).unwrap();
    let err = run_code(&code, &options, silent_handler()).unwrap_err();
    let DriverError::Eval(eval) = &err else {
        panic!("expected a runtime error, got {err:?}")
    };
    assert_eq!(eval.kind, EvalErrorKind::StackOverflow { depth: 3 });
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn disassembles_an_image() {
    let dir = TempDir::new().unwrap();
    let code = Code::new(vec![
        Instruction::Push(Literal::Int(1)),
        Instruction::Push(Literal::Str("two".to_string())),
        Instruction::BuildList(2),
        Instruction::Return,
    ]);
    let path = write_image(&dir, "list.anolec", &code);

    let listing = disasm_file(&path).unwrap();
    assert_eq!(
        listing,
        "0  push 1\n1  push \"two\"\n2  buildlist 2\n3  return\n"
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = run_file(&dir.path().join("absent.anolec"), &RunOptions::default()).unwrap_err();
    assert!(matches!(err, DriverError::Io { .. }));
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("absent.anolec"));
}

#[test]
fn garbage_bytes_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("junk.anolec");
    std::fs::write(&path, [0xff; 7]).unwrap();
    let err = load_code(&path).unwrap_err();
    assert!(matches!(err, DriverError::Decode(_)));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn out_of_range_jumps_are_rejected_before_running() {
    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, "bad.anolec", &Code::new(vec![Instruction::Jump(9)]));
    let err = load_code(&path).unwrap_err();
    assert!(matches!(err, DriverError::InvalidCode(_)));
}
