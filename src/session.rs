//! Tracks metadata for a conversion session.

use once_cell::sync::Lazy;

fn log_requested() -> bool {
    static ENABLED: Lazy<bool> = Lazy::new(|| std::env::var_os("SVG2PPTX_LOG").is_some());

    *ENABLED
}

/// Metadata for a single document conversion.
///
/// The crate keeps no global mutable state.  Anything that must outlive a
/// single attribute parse (currently just the logging flag, driven by the
/// `SVG2PPTX_LOG` environment variable) is carried in a `Session` and
/// threaded explicitly through the conversion context.
#[derive(Clone)]
pub struct Session {
    log_enabled: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            log_enabled: log_requested(),
        }
    }

    pub fn log_enabled(&self) -> bool {
        self.log_enabled
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
