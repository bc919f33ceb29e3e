//! Filesystem path objects.

use std::path::PathBuf;

use super::BuiltinContext;
use crate::errors::{undefined_member, wrong_arg_type, EvalError, EvalResult};
use crate::value::{Address, NativeObject, Object};

/// A filesystem path.
///
/// Members are read-only properties: `filename` (string or `none`),
/// `parent` (path or `none`) and `exists` (bool).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathObject {
    path: PathBuf,
}

impl PathObject {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PathObject { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl NativeObject for PathObject {
    fn type_name(&self) -> &'static str {
        "path"
    }

    fn to_str(&self) -> String {
        self.path.display().to_string()
    }

    fn to_bool(&self) -> bool {
        !self.path.as_os_str().is_empty()
    }

    fn load_member(&self, name: &str) -> Result<Address, EvalError> {
        let member = match name {
            "filename" => self
                .path
                .file_name()
                .map_or(Object::None, |f| Object::string(f.to_string_lossy())),
            "parent" => self
                .path
                .parent()
                .map_or(Object::None, |p| Object::native(PathObject::new(p))),
            "exists" => Object::Bool(self.path.exists()),
            _ => return Err(undefined_member(name, self.type_name())),
        };
        Ok(Address::new(member))
    }
}

pub(super) fn builtin_path(_: &BuiltinContext<'_>, args: &[Object]) -> EvalResult {
    match &args[0] {
        Object::Str(s) => Ok(Object::native(PathObject::new(s.as_str()))),
        other => Err(wrong_arg_type("path", "a string", other.type_name())),
    }
}

pub(super) fn builtin_current_path(_: &BuiltinContext<'_>, _: &[Object]) -> EvalResult {
    std::env::current_dir()
        .map(|dir| Object::native(PathObject::new(dir)))
        .map_err(|err| EvalError::new(format!("cannot read current directory: {err}")))
}

#[cfg(test)]
mod tests;
