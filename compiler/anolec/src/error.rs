//! Driver errors.

use std::fmt;
use std::io;
use std::path::PathBuf;

use anole_eval::EvalError;
use anole_ir::CodeError;

/// Anything that can stop the driver.
#[derive(Debug)]
pub enum DriverError {
    /// The image file could not be read.
    Io { path: PathBuf, source: io::Error },
    /// The bytes are not a serialized `Code`.
    Decode(bincode::Error),
    /// The image decoded but is malformed.
    InvalidCode(CodeError),
    /// The program raised a runtime error.
    Eval(EvalError),
}

impl DriverError {
    /// Process exit status for this error: 1 for program faults, 2 for
    /// problems loading the image.
    pub fn exit_code(&self) -> i32 {
        match self {
            DriverError::Eval(_) => 1,
            DriverError::Io { .. } | DriverError::Decode(_) | DriverError::InvalidCode(_) => 2,
        }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Io { path, source } => {
                write!(f, "cannot read '{}': {source}", path.display())
            }
            DriverError::Decode(err) => write!(f, "not a valid code image: {err}"),
            DriverError::InvalidCode(err) => write!(f, "malformed code image: {err}"),
            DriverError::Eval(err) => {
                write!(f, "{err}")?;
                if !err.backtrace.is_empty() {
                    write!(f, "\n{}", err.backtrace)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriverError::Io { source, .. } => Some(source),
            DriverError::Decode(err) => Some(err),
            DriverError::InvalidCode(err) => Some(err),
            DriverError::Eval(err) => Some(err),
        }
    }
}

impl From<EvalError> for DriverError {
    fn from(err: EvalError) -> Self {
        DriverError::Eval(err)
    }
}

impl From<CodeError> for DriverError {
    fn from(err: CodeError) -> Self {
        DriverError::InvalidCode(err)
    }
}

impl From<bincode::Error> for DriverError {
    fn from(err: bincode::Error) -> Self {
        DriverError::Decode(err)
    }
}
