//! Code images: a `Code` serialized with bincode.

use std::path::Path;

use anole_ir::{Code, SharedCode};

use crate::DriverError;

/// Serialize `code` into an image.
pub fn encode_code(code: &Code) -> Result<Vec<u8>, DriverError> {
    Ok(bincode::serialize(code)?)
}

/// Decode and validate an image.
pub fn decode_code(bytes: &[u8]) -> Result<SharedCode, DriverError> {
    let code: Code = bincode::deserialize(bytes)?;
    code.validate()?;
    tracing::debug!(instructions = code.len(), "decoded code image");
    Ok(SharedCode::new(code))
}

/// Read, decode and validate the image at `path`.
pub fn load_code(path: &Path) -> Result<SharedCode, DriverError> {
    let bytes = std::fs::read(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_code(&bytes)
}
