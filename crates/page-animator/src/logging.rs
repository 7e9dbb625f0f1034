//! Tracing subscriber setup.
//!
//! Natively events go to stderr. In the browser they are written to the
//! developer console, one `console.log` per event, without timestamps
//! (the console adds its own).

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when none is given and `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "page_animator=info";

/// Install the global subscriber.
///
/// `filter` uses `EnvFilter` syntax; `None` falls back to `RUST_LOG` and
/// then to [`DEFAULT_FILTER`]. Returns `false` when a subscriber was
/// already installed.
pub fn init(filter: Option<&str>) -> bool {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    #[cfg(all(target_arch = "wasm32", feature = "wasm"))]
    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_writer(console::ConsoleWriter::default);

    #[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_ok()
}

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod console {
    use std::io;

    /// Buffers one formatted event and logs it when dropped
    #[derive(Debug, Default)]
    pub(super) struct ConsoleWriter {
        buffer: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            if self.buffer.is_empty() {
                return Ok(());
            }
            let line = String::from_utf8_lossy(&self.buffer);
            web_sys::console::log_1(&line.trim_end().into());
            self.buffer.clear();
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            let _ = io::Write::flush(self);
        }
    }
}
