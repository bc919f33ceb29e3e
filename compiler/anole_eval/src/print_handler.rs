//! Output sink for the `print` and `println` built-ins.
//!
//! Output can be directed to different destinations:
//! - stdout (default, used by the driver)
//! - a buffer, for tests and embedders that inspect program output
//! - nowhere, for benchmarks and collector stress runs
//!
//! Enum dispatch keeps the hot path free of vtable calls.

use parking_lot::Mutex;

/// Print handler that captures output to a buffer.
#[derive(Default)]
pub struct BufferPrintHandler {
    buffer: Mutex<String>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn println(&self, msg: &str) {
        let mut buf = self.buffer.lock();
        buf.push_str(msg);
        buf.push('\n');
    }

    pub fn print(&self, msg: &str) {
        self.buffer.lock().push_str(msg);
    }

    /// Get all captured output.
    pub fn get_output(&self) -> String {
        self.buffer.lock().clone()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

/// Print handler implementation using enum dispatch.
pub enum PrintHandlerImpl {
    /// Writes to stdout (default).
    Stdout,
    /// Captures to a buffer.
    Buffer(BufferPrintHandler),
    /// Discards all output.
    Silent,
}

impl PrintHandlerImpl {
    /// Print a line (with newline).
    pub fn println(&self, msg: &str) {
        match self {
            Self::Stdout => println!("{msg}"),
            Self::Buffer(h) => h.println(msg),
            Self::Silent => {}
        }
    }

    /// Print without newline.
    pub fn print(&self, msg: &str) {
        match self {
            Self::Stdout => print!("{msg}"),
            Self::Buffer(h) => h.print(msg),
            Self::Silent => {}
        }
    }

    /// Captured output; empty for handlers that don't capture.
    pub fn get_output(&self) -> String {
        match self {
            Self::Buffer(h) => h.get_output(),
            Self::Stdout | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.clear();
        }
    }
}

/// Shared print handler that can be passed around.
#[allow(
    clippy::disallowed_types,
    reason = "Arc lets an embedder keep a handle to the buffer it installed"
)]
pub type SharedPrintHandler = std::sync::Arc<PrintHandlerImpl>;

/// Create a default stdout print handler.
#[allow(clippy::disallowed_types, reason = "Arc required for SharedPrintHandler")]
pub fn stdout_handler() -> SharedPrintHandler {
    std::sync::Arc::new(PrintHandlerImpl::Stdout)
}

/// Create a buffer print handler for capturing output.
#[allow(clippy::disallowed_types, reason = "Arc required for SharedPrintHandler")]
pub fn buffer_handler() -> SharedPrintHandler {
    std::sync::Arc::new(PrintHandlerImpl::Buffer(BufferPrintHandler::new()))
}

/// Create a print handler that discards all output.
#[allow(clippy::disallowed_types, reason = "Arc required for SharedPrintHandler")]
pub fn silent_handler() -> SharedPrintHandler {
    std::sync::Arc::new(PrintHandlerImpl::Silent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_handler_println_captures_with_newline() {
        let handler = BufferPrintHandler::new();
        handler.println("hello");
        assert_eq!(handler.get_output(), "hello\n");
    }

    #[test]
    fn buffer_handler_print_captures_without_newline() {
        let handler = BufferPrintHandler::new();
        handler.print("hello");
        handler.print(" world");
        assert_eq!(handler.get_output(), "hello world");
    }

    #[test]
    fn buffer_handler_clear() {
        let handler = buffer_handler();
        handler.println("x");
        handler.clear();
        assert_eq!(handler.get_output(), "");
    }

    #[test]
    fn silent_handler_discards() {
        let handler = silent_handler();
        handler.println("dropped");
        assert_eq!(handler.get_output(), "");
    }
}
