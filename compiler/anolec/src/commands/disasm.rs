//! The `disasm` command: print a code image one instruction per line.

use std::path::Path;

use crate::{load_code, DriverError};

/// Load the image at `path` and render its listing.
pub fn disasm_file(path: &Path) -> Result<String, DriverError> {
    let code = load_code(path)?;
    Ok(code.to_string())
}
