//! Call-site macros: `log!`, `log_if!`, `check!` and the level shorthands.
//!
//! Every logging macro checks the runtime level gate before formatting.
//! `check!` evaluates its condition exactly once and only formats its message
//! when the condition is false.
//!
//! # Feature Flags
//! The shorthands are controlled by cargo features:
//! `log-trace`, `log-debug`, `log-info`, `log-warn`, `log-error`.
//!
//! If a feature is disabled, the corresponding shorthand expands to `()`,
//! removing all formatting and allocation overhead at compile time.
//! `log!` with an explicit level is never compiled out.

// ============================================================================
// 1. GENERIC MACROS
// ============================================================================

/// Path of the enclosing function, e.g. `my_crate::net::connect`.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __here() {}
        let name = ::std::any::type_name_of_val(&__here);
        match name.strip_suffix("::__here") {
            Some(stripped) => stripped,
            None => name,
        }
    }};
}

#[macro_export]
macro_rules! log {
    ($lvl:expr, $($arg:tt)+) => {{
        let __lvl: $crate::log::log_level::LogLevel = $lvl;
        if $crate::log::level_gate::enabled(__lvl) {
            $crate::log::capture::capture(
                __lvl,
                file!(),
                line!(),
                $crate::function_name!(),
                format_args!($($arg)+),
            );
        }
    }};
}

#[macro_export]
macro_rules! log_if {
    ($lvl:expr, $cond:expr, $($arg:tt)+) => {{
        if $cond {
            $crate::log!($lvl, $($arg)+);
        }
    }};
}

/// Contract check. On failure the process goes through the fatal path.
#[macro_export]
macro_rules! check {
    ($cond:expr $(,)?) => {{
        if !($cond) {
            $crate::log::capture::capture_contract(
                file!(),
                line!(),
                $crate::function_name!(),
                stringify!($cond),
                None,
            );
        }
    }};
    ($cond:expr, $($arg:tt)+) => {{
        if !($cond) {
            $crate::log::capture::capture_contract(
                file!(),
                line!(),
                $crate::function_name!(),
                stringify!($cond),
                Some(format_args!($($arg)+)),
            );
        }
    }};
}

// ============================================================================
// 2. LEVEL-SPECIFIC MACROS (Feature Gated)
// ============================================================================

// ---------------------- TRACE ----------------------
#[cfg(feature = "log-trace")]
#[macro_export]
macro_rules! log_trace { ($($arg:tt)+) => { $crate::log!($crate::log::log_level::LogLevel::TRACE, $($arg)+) } }

#[cfg(not(feature = "log-trace"))]
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- DEBUG ----------------------
#[cfg(feature = "log-debug")]
#[macro_export]
macro_rules! log_debug { ($($arg:tt)+) => { $crate::log!($crate::log::log_level::LogLevel::DEBUG, $($arg)+) } }

#[cfg(not(feature = "log-debug"))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- INFO ----------------------
#[cfg(feature = "log-info")]
#[macro_export]
macro_rules! log_info { ($($arg:tt)+) => { $crate::log!($crate::log::log_level::LogLevel::INFO, $($arg)+) } }

#[cfg(not(feature = "log-info"))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- WARN ----------------------
#[cfg(feature = "log-warn")]
#[macro_export]
macro_rules! log_warn { ($($arg:tt)+) => { $crate::log!($crate::log::log_level::LogLevel::WARN, $($arg)+) } }

#[cfg(not(feature = "log-warn"))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- ERROR ----------------------
// Generally always enabled, but consistent structure allows user to disable if really needed.
#[cfg(feature = "log-error")]
#[macro_export]
macro_rules! log_error { ($($arg:tt)+) => { $crate::log!($crate::log::log_level::LogLevel::ERROR, $($arg)+) } }

#[cfg(not(feature = "log-error"))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- FATAL ----------------------
// Never compiled out: a fatal call must always terminate.
#[macro_export]
macro_rules! log_fatal { ($($arg:tt)+) => { $crate::log!($crate::log::log_level::LogLevel::FATAL, $($arg)+) } }
