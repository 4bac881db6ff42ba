//! Verbosity-gated logging to stderr.
//!
//! Nothing is formatted unless the caller's verbosity reaches the macro's
//! level, so logging is free at verbosity 0.
//! - 0: SILENT
//! - 1: CHANGES (resolved tasks, analysis failures)
//! - 2: CHECKS (validation decisions)
//! - 3: DEBUG (ready-queue traffic)

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

#[doc(hidden)]
#[macro_export]
macro_rules! log_at {
    ($level:expr, $verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $level {
            eprintln!("[critpath] {}", format_args!($($arg)*));
        }
    };
}

/// Log at CHANGES level (verbosity >= 1).
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_CHANGES, $verbosity, $($arg)*)
    };
}

/// Log at CHECKS level (verbosity >= 2).
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_CHECKS, $verbosity, $($arg)*)
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_DEBUG, $verbosity, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(VERBOSITY_SILENT < VERBOSITY_CHANGES);
        assert!(VERBOSITY_CHANGES < VERBOSITY_CHECKS);
        assert!(VERBOSITY_CHECKS < VERBOSITY_DEBUG);
    }

    #[test]
    fn test_silent_macros_skip_formatting() {
        fn never_called() -> u32 {
            panic!("argument evaluated while silent")
        }
        let verbosity = VERBOSITY_SILENT;
        log_changes!(verbosity, "value {}", never_called());
        log_checks!(verbosity, "value {}", never_called());
        log_debug!(verbosity, "value {}", never_called());
    }
}
