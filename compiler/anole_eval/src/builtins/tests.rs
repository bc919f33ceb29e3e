#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::errors::ErrorCategory;
use crate::print_handler::BufferPrintHandler;
use pretty_assertions::assert_eq;

fn call(name: &str, args: &[Object]) -> EvalResult {
    let print = PrintHandlerImpl::Silent;
    let ctx = BuiltinContext { print: &print };
    let registry = BuiltinRegistry::with_defaults();
    registry.lookup(name).unwrap().invoke(&ctx, args)
}

#[test]
fn default_registry_contents() {
    let registry = BuiltinRegistry::with_defaults();
    for name in [
        "print",
        "println",
        "len",
        "str",
        "int",
        "float",
        "type",
        "append",
        "path",
        "current_path",
    ] {
        assert!(registry.lookup(name).is_some(), "missing {name}");
    }
    assert_eq!(registry.len(), 10);
    assert!(registry.lookup("size").is_none());
}

#[test]
fn register_replaces_existing() {
    fn always_seven(_: &BuiltinContext<'_>, _: &[Object]) -> EvalResult {
        Ok(Object::Int(7))
    }
    let mut registry = BuiltinRegistry::with_defaults();
    registry.register(BuiltinFunction::new("len", Arity::Exact(1), always_seven));
    let print = PrintHandlerImpl::Silent;
    let ctx = BuiltinContext { print: &print };
    let len = registry.lookup("len").unwrap();
    assert_eq!(
        len.invoke(&ctx, &[Object::None]).unwrap(),
        Object::Int(7)
    );
}

#[test]
fn print_and_println_join_with_spaces() {
    let print = PrintHandlerImpl::Buffer(BufferPrintHandler::new());
    let ctx = BuiltinContext { print: &print };
    let registry = BuiltinRegistry::with_defaults();
    registry
        .lookup("print")
        .unwrap()
        .invoke(&ctx, &[Object::string("a"), Object::Int(1)])
        .unwrap();
    registry
        .lookup("println")
        .unwrap()
        .invoke(&ctx, &[Object::list_of([Object::string("b")])])
        .unwrap();
    assert_eq!(print.get_output(), "a 1[\"b\"]\n");
}

#[test]
fn exact_arity_is_checked() {
    let err = call("len", &[]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ArgumentError);
    assert_eq!(err.message, "len expects 1 argument, got 0");
}

#[test]
fn len_of_containers_and_strings() {
    assert_eq!(call("len", &[Object::string("héllo")]).unwrap(), Object::Int(5));
    assert_eq!(
        call("len", &[Object::list_of([Object::Int(1), Object::Int(2)])]).unwrap(),
        Object::Int(2)
    );
    let err = call("len", &[Object::Int(3)]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::TypeError);
}

#[test]
fn conversions() {
    assert_eq!(call("int", &[Object::Float(3.9)]).unwrap(), Object::Int(3));
    assert_eq!(call("int", &[Object::string(" 42 ")]).unwrap(), Object::Int(42));
    assert_eq!(call("int", &[Object::Bool(true)]).unwrap(), Object::Int(1));
    assert!(call("int", &[Object::Float(f64::NAN)]).is_err());
    assert!(call("int", &[Object::Float(1e300)]).is_err());
    assert_eq!(call("float", &[Object::Int(2)]).unwrap(), Object::Float(2.0));
    assert_eq!(
        call("str", &[Object::Float(1.5)]).unwrap(),
        Object::string("1.5")
    );
    assert_eq!(call("str", &[Object::string("x")]).unwrap(), Object::string("x"));
    assert_eq!(
        call("type", &[Object::dict()]).unwrap(),
        Object::string("dict")
    );
}

#[test]
fn append_mutates_the_list_in_place() {
    let list = Object::list_of([Object::Int(1)]);
    let returned = call("append", &[list.clone(), Object::Int(2)]).unwrap();
    assert!(returned.is_same(&list));
    assert_eq!(list.to_string(), "[1, 2]");
    let err = call("append", &[Object::Int(1), Object::Int(2)]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::TypeError);
}

#[test]
fn dict_methods() {
    let print = PrintHandlerImpl::Silent;
    let ctx = BuiltinContext { print: &print };
    let dict = Object::dict();
    let Object::Dict(body) = &dict else {
        unreachable!()
    };
    body.insert(Object::string("b"), Address::new(Object::Int(2)));
    body.insert(Object::string("a"), Address::new(Object::Int(1)));

    let size = dict_method("size").unwrap();
    assert_eq!(size.invoke(&ctx, &[dict.clone()]).unwrap(), Object::Int(2));

    let contains = dict_method("contains").unwrap();
    assert_eq!(
        contains
            .invoke(&ctx, &[dict.clone(), Object::string("a")])
            .unwrap(),
        Object::Bool(true)
    );

    let keys = dict_method("keys").unwrap();
    assert_eq!(
        keys.invoke(&ctx, &[dict.clone()]).unwrap().to_string(),
        "[\"a\", \"b\"]"
    );

    let remove = dict_method("remove").unwrap();
    assert_eq!(
        remove
            .invoke(&ctx, &[dict.clone(), Object::string("a")])
            .unwrap(),
        Object::Int(1)
    );
    assert_eq!(
        remove
            .invoke(&ctx, &[dict.clone(), Object::string("zz")])
            .unwrap(),
        Object::None
    );
    assert_eq!(body.len(), 1);
    assert!(dict_method("push").is_none());
}
