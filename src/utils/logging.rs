//! Session-tagged logging macros gated by a module-level `ENABLE_LOGS` flag.
//!
//! Every line carries the acquisition session id so one trial's lifecycle
//! (armed, opened, classified, finalized or failed) can be followed in the
//! log even when trials are started in quick succession.
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//! use crate::{session_info, session_warn, session_error};
//!
//! session_info!(session_id, "gate opened after {} ms", window_ms);
//! ```

/// Info line prefixed with `[session <id>]`.
#[macro_export]
macro_rules! session_info {
    ($session:expr, $($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!("[session {}] {}", $session, format_args!($($arg)*));
        }
    };
}

/// Warn line prefixed with `[session <id>]`.
#[macro_export]
macro_rules! session_warn {
    ($session:expr, $($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!("[session {}] {}", $session, format_args!($($arg)*));
        }
    };
}

/// Error line prefixed with `[session <id>]`.
#[macro_export]
macro_rules! session_error {
    ($session:expr, $($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!("[session {}] {}", $session, format_args!($($arg)*));
        }
    };
}
