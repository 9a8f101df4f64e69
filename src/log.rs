//! Console logging.
//!
//! Messages go to the browser console on wasm32. Host builds (unit tests)
//! discard them so no JS import is ever called outside a browser.

#[doc(hidden)]
pub fn write(level: Level, message: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        let value = wasm_bindgen::JsValue::from_str(message);
        match level {
            Level::Info => web_sys::console::log_1(&value),
            Level::Warn => web_sys::console::warn_1(&value),
            Level::Error => web_sys::console::error_1(&value),
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (level, message);
    }
}

#[doc(hidden)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// Log an informational message, prefixed with the crate tag.
#[macro_export]
macro_rules! console_log {
    ($($arg:tt)*) => {
        $crate::log::write(
            $crate::log::Level::Info,
            &format!("[ambient-field] {}", format_args!($($arg)*)),
        )
    };
}

/// Log a warning.
#[macro_export]
macro_rules! console_warn {
    ($($arg:tt)*) => {
        $crate::log::write(
            $crate::log::Level::Warn,
            &format!("[ambient-field] {}", format_args!($($arg)*)),
        )
    };
}

/// Log an error.
#[macro_export]
macro_rules! console_error {
    ($($arg:tt)*) => {
        $crate::log::write(
            $crate::log::Level::Error,
            &format!("[ambient-field] {}", format_args!($($arg)*)),
        )
    };
}
