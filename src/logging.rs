//! Logging facade.
//!
//! The router never talks to `log` or `tracing` directly. Every module goes
//! through the macros below, which expand to whichever backend is enabled:
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! Enable at most one of the two. With neither enabled the macros expand to
//! nothing and the arguments are not evaluated.
//!
//! Levels used by the router:
//!
//! - `trace_log!`: per-route scanning, event filtering, cache hits.
//! - `debug_log!`: dispatch cycles and address writes.
//! - `info_log!`: route registration, listener attach/detach, reset.
//! - `warn_log!`: inert rules, reverted navigations, the default 404 handler.
//! - `error_log!`: handler failures surfaced to the caller.
//!
//! ```ignore
//! use spa_navigator::{debug_log, warn_log};
//!
//! debug_log!("Dispatching fragment '{}'", fragment);
//! warn_log!("Rule '{}' never matches", rule);
//! ```

/// Emit a **trace**-level log message through the enabled backend.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!($($arg)*);
    };
}

/// Emit a **debug**-level log message through the enabled backend.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!($($arg)*);
    };
}

/// Emit an **info**-level log message through the enabled backend.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!($($arg)*);
        #[cfg(feature = "log")]
        ::log::info!($($arg)*);
    };
}

/// Emit a **warn**-level log message through the enabled backend.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!($($arg)*);
    };
}

/// Emit an **error**-level log message through the enabled backend.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::error!($($arg)*);
        #[cfg(feature = "log")]
        ::log::error!($($arg)*);
    };
}
