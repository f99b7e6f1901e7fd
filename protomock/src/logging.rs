// vim: tw=80
//! Diagnostic events.  Compiled out entirely without the "tracing" feature.
//!
//! The macros are textually scoped; this module must be declared first.

cfg_if::cfg_if! {
    if #[cfg(feature = "tracing")] {
        macro_rules! debug {
            ($($arg:tt)*) => { ::tracing::debug!($($arg)*) }
        }

        macro_rules! trace {
            ($($arg:tt)*) => { ::tracing::trace!($($arg)*) }
        }

        macro_rules! trace_enabled {
            () => { ::tracing::enabled!(::tracing::Level::TRACE) }
        }
    } else {
        macro_rules! debug {
            ($($arg:tt)*) => {}
        }

        macro_rules! trace {
            ($($arg:tt)*) => {}
        }

        macro_rules! trace_enabled {
            () => { false }
        }
    }
}
