#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::{BinaryOp, Literal};
use pretty_assertions::assert_eq;

#[test]
fn test_builder_offsets() {
    let mut builder = CodeBuilder::new();
    assert_eq!(builder.emit(Instruction::Push(Literal::Int(1))), 0);
    assert_eq!(builder.emit(Instruction::Pop), 1);
    assert_eq!(builder.here(), 2);
    assert_eq!(builder.finish().len(), 2);
}

#[test]
fn test_patch_forward_jump() {
    let mut builder = CodeBuilder::new();
    builder.emit(Instruction::Push(Literal::Bool(false)));
    let jump = builder.emit(Instruction::JumpIfNot(0));
    builder.emit(Instruction::Push(Literal::Int(1)));
    builder.patch_here(jump).unwrap();
    let code = builder.finish();
    assert_eq!(code.get(jump), Some(&Instruction::JumpIfNot(3)));
    assert!(code.validate().is_ok());
}

#[test]
fn test_patch_lambda_end() {
    let mut builder = CodeBuilder::new();
    let decl = builder.emit(Instruction::LambdaDecl { arity: 1, end: 0 });
    builder.emit(Instruction::Bind("n".into()));
    builder.emit(Instruction::Return);
    builder.patch_here(decl).unwrap();
    assert_eq!(
        builder.finish().get(decl),
        Some(&Instruction::LambdaDecl { arity: 1, end: 3 })
    );
}

#[test]
fn test_patch_rejects_non_jumps() {
    let mut builder = CodeBuilder::new();
    let pop = builder.emit(Instruction::Pop);
    assert_eq!(builder.patch(pop, 0), Err(CodeError::NotPatchable { at: 0 }));
    assert_eq!(
        builder.patch(7, 0),
        Err(CodeError::NoSuchInstruction { at: 7 })
    );
}

#[test]
fn test_validate_out_of_range() {
    let code = Code::new(vec![Instruction::Jump(5), Instruction::Pop]);
    assert_eq!(
        code.validate(),
        Err(CodeError::TargetOutOfRange { at: 0, target: 5 })
    );
}

#[test]
fn test_shared_code_is_one_allocation() {
    let shared = SharedCode::new(Code::new(vec![Instruction::Return]));
    let other = shared.clone();
    assert!(shared.ptr_eq(&other));
    assert_eq!(other.len(), 1);
}

#[test]
fn test_disassembly() {
    let code = Code::new(vec![
        Instruction::Load("x".into()),
        Instruction::Push(Literal::Int(1)),
        Instruction::Binary(BinaryOp::Add),
        Instruction::JumpIfNot(0),
        Instruction::LambdaDecl { arity: 2, end: 9 },
    ]);
    assert_eq!(
        code.to_string(),
        "0  load x\n1  push 1\n2  binary +\n3  jumpifnot @0\n4  lambdadecl 2 @9\n"
    );
}

#[cfg(feature = "serde")]
#[test]
fn test_bincode_image() {
    let code = Code::new(vec![
        Instruction::Push(Literal::Str("hi".into())),
        Instruction::Push(Literal::Float(2.5)),
        Instruction::BuildClass {
            name: "Point".into(),
            bases: 0,
        },
    ]);
    let bytes = bincode::serialize(&code).unwrap();
    let decoded: Code = bincode::deserialize(&bytes).unwrap();
    assert_eq!(decoded, code);
}
