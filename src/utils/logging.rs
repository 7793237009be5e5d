//! Module-gated logging macros.
//!
//! Each module that logs through these macros declares its own switch:
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_debug, log_info, log_warn};
//!
//! log_info!("session started with {} frames", total);
//! ```
//! Flipping the switch to `false` silences that module without touching
//! the global `RUST_LOG` filter.

/// Info-level log, skipped when the calling module's `ENABLE_LOGS` is false.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Warn-level log, skipped when the calling module's `ENABLE_LOGS` is false.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Error-level log, skipped when the calling module's `ENABLE_LOGS` is false.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}

/// Debug-level log for per-frame chatter.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}
