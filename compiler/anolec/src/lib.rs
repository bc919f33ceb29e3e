//! Anole runtime driver.
//!
//! Loads a compiled `Code` image from disk and either runs it on an
//! `anole_eval::Interpreter` or prints its disassembly.
//!
//! # Pipeline
//!
//! ```text
//! file bytes ──► decode_code() ──► Code::validate() ──► Interpreter::execute()
//! ```

pub mod commands;
mod error;
mod image;

pub use commands::{disasm_file, parse_run_options, run_code, run_file, RunOptions};
pub use error::DriverError;
pub use image::{decode_code, encode_code, load_code};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber for debug output.
///
/// Nothing is installed unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=anole_eval=trace anole run prog.anolec`. With `ANOLE_LOG_TREE`
/// set as well, spans are rendered as an indented call tree instead of flat
/// lines, which is easier to follow for nested calls.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        if std::env::var_os("ANOLE_LOG_TREE").is_some() {
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
    });
}
