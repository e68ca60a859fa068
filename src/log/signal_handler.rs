//! Interception of OS fatal signals.
//!
//! The handler runs in signal context, where allocation and locking are not
//! async-signal-safe. Building the record and capturing the stack trace
//! allocate anyway; this is best effort. A missing trace is acceptable, so the
//! capture is skipped when it panics.

/// Signals intercepted while logging is initialized.
#[cfg(unix)]
pub const FATAL_SIGNALS: [libc::c_int; 6] = [
    libc::SIGSEGV,
    libc::SIGILL,
    libc::SIGFPE,
    libc::SIGABRT,
    libc::SIGBUS,
    libc::SIGTERM,
];

#[must_use]
pub fn signal_name(signal: i32) -> &'static str {
    match signal {
        libc::SIGSEGV => "SIGSEGV",
        libc::SIGILL => "SIGILL",
        libc::SIGFPE => "SIGFPE",
        libc::SIGABRT => "SIGABRT",
        #[cfg(unix)]
        libc::SIGBUS => "SIGBUS",
        libc::SIGTERM => "SIGTERM",
        libc::SIGINT => "SIGINT",
        _ => "UNKNOWN SIGNAL",
    }
}

#[cfg(unix)]
mod imp {
    use std::{mem, panic, ptr};

    use libc::{c_int, c_void, siginfo_t};

    use super::FATAL_SIGNALS;
    use crate::log::{
        fatal, fatal_record::FatalRecord, log_level::LogLevel, log_record::LogRecord,
        message_handle::FatalMessagePtr,
    };

    pub fn install_signal_handlers() {
        let handler: extern "C" fn(c_int, *mut siginfo_t, *mut c_void) = on_fatal_signal;
        for signal in FATAL_SIGNALS {
            // SAFETY: `action` is fully initialized before use and the handler
            // has the SA_SIGINFO signature.
            unsafe {
                let mut action: libc::sigaction = mem::zeroed();
                action.sa_sigaction = handler as libc::sighandler_t;
                action.sa_flags = libc::SA_SIGINFO | libc::SA_ONSTACK;
                libc::sigemptyset(&mut action.sa_mask);
                libc::sigaction(signal, &action, ptr::null_mut());
            }
        }
    }

    pub fn restore_signal_handlers() {
        for signal in FATAL_SIGNALS {
            set_default(signal);
        }
    }

    pub fn restore_default_and_unblock(signal: c_int) {
        set_default(signal);
        // SAFETY: the set is initialized by sigemptyset before use.
        unsafe {
            let mut set: libc::sigset_t = mem::zeroed();
            libc::sigemptyset(&mut set);
            libc::sigaddset(&mut set, signal);
            libc::pthread_sigmask(libc::SIG_UNBLOCK, &set, ptr::null_mut());
        }
    }

    fn set_default(signal: c_int) {
        // SAFETY: SIG_DFL is always a valid disposition.
        unsafe {
            let mut action: libc::sigaction = mem::zeroed();
            action.sa_sigaction = libc::SIG_DFL;
            libc::sigemptyset(&mut action.sa_mask);
            libc::sigaction(signal, &action, ptr::null_mut());
        }
    }

    extern "C" fn on_fatal_signal(signal: c_int, _info: *mut siginfo_t, _ctx: *mut c_void) {
        // A fault while the fatal sequence runs must not recurse into it.
        if fatal::fatal_in_progress() {
            fatal::exit_with_signal(signal);
        }

        let trace = capture_stack_trace();
        let record = LogRecord::new(
            LogLevel::FATAL,
            file!(),
            line!(),
            "on_fatal_signal",
            String::new(),
        );
        fatal::fatal_call(FatalMessagePtr::new(FatalRecord::signal(
            record, signal, trace,
        )));
    }

    fn capture_stack_trace() -> Option<String> {
        panic::catch_unwind(|| std::backtrace::Backtrace::force_capture().to_string()).ok()
    }
}

#[cfg(not(unix))]
mod imp {
    pub fn install_signal_handlers() {}

    pub fn restore_signal_handlers() {}

    pub fn restore_default_and_unblock(_signal: i32) {}
}

/// Installs the fatal handler for every signal in the fatal set.
pub fn install_signal_handlers() {
    imp::install_signal_handlers();
}

/// Puts every signal in the fatal set back to its default disposition.
pub fn restore_signal_handlers() {
    imp::restore_signal_handlers();
}

pub(crate) fn restore_default_and_unblock(signal: i32) {
    imp::restore_default_and_unblock(signal);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn names_cover_the_fatal_set() {
        #[cfg(unix)]
        for signal in FATAL_SIGNALS {
            assert_ne!(signal_name(signal), "UNKNOWN SIGNAL");
        }
        assert_eq!(signal_name(libc::SIGSEGV), "SIGSEGV");
        assert_eq!(signal_name(-1), "UNKNOWN SIGNAL");
    }
}
