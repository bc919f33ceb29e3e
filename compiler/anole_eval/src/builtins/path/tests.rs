#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::print_handler::PrintHandlerImpl;
use pretty_assertions::assert_eq;

fn ctx() -> PrintHandlerImpl {
    PrintHandlerImpl::Silent
}

#[test]
fn filename_and_parent_members() {
    let path = Object::native(PathObject::new("/tmp/anole/main.an"));
    assert_eq!(
        path.load_member("filename").unwrap().get(),
        Object::string("main.an")
    );
    let parent = path.load_member("parent").unwrap().get();
    assert_eq!(parent.type_name(), "path");
    assert_eq!(parent.to_string(), "/tmp/anole");
}

#[test]
fn root_has_no_parent_or_filename() {
    let root = PathObject::new("/");
    assert_eq!(root.load_member("parent").unwrap().get(), Object::None);
    assert_eq!(root.load_member("filename").unwrap().get(), Object::None);
}

#[test]
fn exists_reflects_filesystem() {
    let here = PathObject::new(".");
    assert_eq!(here.load_member("exists").unwrap().get(), Object::Bool(true));
    let missing = PathObject::new("/definitely/not/a/real/anole/path");
    assert_eq!(
        missing.load_member("exists").unwrap().get(),
        Object::Bool(false)
    );
}

#[test]
fn unknown_member_is_attribute_error() {
    let err = PathObject::new("a").load_member("size").unwrap_err();
    assert_eq!(err.category(), crate::errors::ErrorCategory::AttributeError);
}

#[test]
fn path_builtin_requires_string() {
    let print = ctx();
    let context = BuiltinContext { print: &print };
    let made = builtin_path(&context, &[Object::string("x/y")]).unwrap();
    assert_eq!(made.display_value(), "x/y");
    let err = builtin_path(&context, &[Object::Int(1)]).unwrap_err();
    assert_eq!(err.category(), crate::errors::ErrorCategory::TypeError);
}

#[test]
fn current_path_exists() {
    let print = ctx();
    let context = BuiltinContext { print: &print };
    let cwd = builtin_current_path(&context, &[]).unwrap();
    assert_eq!(cwd.load_member("exists").unwrap().get(), Object::Bool(true));
}
