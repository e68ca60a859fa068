//! The guarded fatal sequence shared by broken contracts, fatal-level log
//! calls and intercepted OS signals.
//!
//! [`fatal_call`] runs at most once per [`initialize_logging`] window. The
//! default exit handler pushes the record, flushes the active worker (bounded
//! by the fatal flush timeout) and terminates with the record's signal.
//!
//! [`initialize_logging`]: crate::log::registry::initialize_logging

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};

use arc_swap::ArcSwapOption;

use crate::log::{
    log_error::FatalError, message_handle::FatalMessagePtr, registry, signal_handler,
};

pub type PreFatalHook = Box<dyn Fn() + Send + Sync>;
pub type FatalExitHandler = Box<dyn Fn(FatalMessagePtr) + Send + Sync>;

pub const DEFAULT_FATAL_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

static FATAL_IN_PROGRESS: AtomicBool = AtomicBool::new(false);
static PRE_FATAL_HOOK: ArcSwapOption<PreFatalHook> = ArcSwapOption::const_empty();
static EXIT_HANDLER: ArcSwapOption<FatalExitHandler> = ArcSwapOption::const_empty();
static FLUSH_TIMEOUT_MS: AtomicU64 =
    AtomicU64::new(DEFAULT_FATAL_FLUSH_TIMEOUT.as_millis() as u64);

/// Installs a hook that runs right before the exit handler, e.g. to break
/// into a debugger. Reset by every `initialize_logging`.
pub fn set_fatal_pre_logging_hook<F>(hook: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let hook: PreFatalHook = Box::new(hook);
    PRE_FATAL_HOOK.store(Some(Arc::new(hook)));
}

/// Replaces the default terminate-after-flush behavior. Reset by every
/// `initialize_logging`.
///
/// A replacement that still wants the record logged and the process ended
/// can finish with [`push_fatal_message_to_logger`].
pub fn set_fatal_exit_handler<F>(handler: F)
where
    F: Fn(FatalMessagePtr) + Send + Sync + 'static,
{
    let handler: FatalExitHandler = Box::new(handler);
    EXIT_HANDLER.store(Some(Arc::new(handler)));
}

/// Exit handler that panics with a [`FatalError`] payload instead of ending
/// the process. Meant for test binaries: the panic unwinds back to the
/// `check!`/`log_fatal!` call site where `catch_unwind` can inspect it.
///
/// Do not use it when a fatal signal may arrive: a panic cannot unwind out
/// of a signal handler and aborts instead.
pub fn panic_on_fatal() {
    set_fatal_exit_handler(|message| {
        std::panic::panic_any(FatalError::from(&*message));
    });
}

/// Upper bound on how long the default exit handler waits for the flush.
pub fn set_fatal_flush_timeout(timeout: Duration) {
    let ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    FLUSH_TIMEOUT_MS.store(ms, Ordering::Relaxed);
}

#[must_use]
pub fn fatal_flush_timeout() -> Duration {
    Duration::from_millis(FLUSH_TIMEOUT_MS.load(Ordering::Relaxed))
}

#[must_use]
pub fn fatal_in_progress() -> bool {
    FATAL_IN_PROGRESS.load(Ordering::SeqCst)
}

pub(crate) fn reset_fatal_hooks() {
    PRE_FATAL_HOOK.store(None);
    EXIT_HANDLER.store(None);
    FATAL_IN_PROGRESS.store(false, Ordering::SeqCst);
}

/// Entry point of the fatal path.
///
/// The first caller wins; any later call while a fatal sequence is in
/// progress returns immediately without touching the pipeline.
pub fn fatal_call(message: FatalMessagePtr) {
    if FATAL_IN_PROGRESS.swap(true, Ordering::SeqCst) {
        return;
    }

    if let Some(hook) = PRE_FATAL_HOOK.load_full() {
        hook();
    }

    match EXIT_HANDLER.load_full() {
        Some(handler) => handler(message),
        None => push_fatal_message_to_logger(message),
    }
}

/// Default exit handler: deliver the fatal record, flush, then terminate
/// with the record's signal.
pub fn push_fatal_message_to_logger(message: FatalMessagePtr) -> ! {
    let signal = message.signal_id();

    match registry::active_logger() {
        Some(logger) => {
            logger.push_fatal(message);
            if let Err(e) = logger.flush_timeout(fatal_flush_timeout()) {
                eprintln!("[Fatal] flush before exit failed: {e}");
            }
        }
        None => {
            eprintln!("[Fatal] no active logger");
            eprintln!("{}", message.into_inner().into_log_record());
        }
    }

    exit_with_signal(signal)
}

/// Terminates the process with `signal` and its default disposition, so the
/// exit status and core-dump behavior match an uninstrumented crash.
pub fn exit_with_signal(signal: i32) -> ! {
    signal_handler::restore_default_and_unblock(signal);
    // SAFETY: raise has no memory-safety preconditions.
    unsafe {
        libc::raise(signal);
    }
    std::process::abort()
}
