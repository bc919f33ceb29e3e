//! Command handlers for the `anole` CLI.

mod disasm;
mod run;

pub use disasm::disasm_file;
pub use run::{parse_run_options, run_code, run_file, RunOptions};
