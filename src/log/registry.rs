//! Process-wide slot for the active worker.
//!
//! At most one worker is active at a time. The slot holds a
//! [`LoggerHandle`] (not the worker itself); the caller keeps ownership of
//! the [`LogWorker`]. Teardown by a specific worker compares identity, so a
//! stale worker cannot tear down the one that replaced it.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::log::{
    fatal,
    log_error::LogWorkerError,
    log_worker::LogWorker,
    logger_handle::LoggerHandle,
    message_handle::LogMessagePtr,
    signal_handler,
};

static ACTIVE: ArcSwapOption<LoggerHandle> = ArcSwapOption::const_empty();

/// Makes `worker` the sole active logger, resets the fatal hooks to their
/// defaults and installs the fatal signal handlers.
///
/// A previously active worker is replaced, not shut down.
pub fn initialize_logging(worker: &LogWorker) {
    ACTIVE.store(Some(Arc::new(worker.handle())));
    fatal::reset_fatal_hooks();
    signal_handler::install_signal_handlers();
}

#[must_use]
pub fn is_logging_initialized() -> bool {
    ACTIVE.load().is_some()
}

/// Clears the active logger unconditionally. Later log calls are no-ops.
pub fn shut_down_logging() {
    if ACTIVE.swap(None).is_some() {
        signal_handler::restore_signal_handlers();
    }
}

/// Clears the active logger only if it is `candidate`. Returns whether it did.
pub fn shut_down_logging_for_active_only(candidate: &LogWorker) -> bool {
    let current = ACTIVE.load_full();
    let Some(active) = &current else {
        return false;
    };
    if active.id() != candidate.id() {
        return false;
    }

    let previous = ACTIVE.compare_and_swap(&current, None::<Arc<LoggerHandle>>);
    let swapped = matches!(&*previous, Some(p) if Arc::ptr_eq(p, active));
    if swapped {
        signal_handler::restore_signal_handlers();
    }
    swapped
}

/// Handle to the active worker, if any.
#[must_use]
pub fn active_logger() -> Option<Arc<LoggerHandle>> {
    ACTIVE.load_full()
}

/// Moves a record into the active worker's queue, or drops it when logging
/// is not initialized.
#[inline]
pub fn push_message_to_logger(message: LogMessagePtr) {
    if let Some(logger) = &*ACTIVE.load() {
        logger.push(message);
    }
}

/// Flushes the active worker.
///
/// # Errors
///
/// Returns [`LogWorkerError::Disconnected`] when no logger is active or it
/// already shut down.
pub fn flush_logging() -> Result<(), LogWorkerError> {
    match active_logger() {
        Some(logger) => logger.flush(),
        None => Err(LogWorkerError::Disconnected),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn stale_worker_cannot_tear_down_newer_one() {
        let old = LogWorker::new().unwrap();
        initialize_logging(&old);
        let new = LogWorker::new().unwrap();
        initialize_logging(&new);

        assert!(!shut_down_logging_for_active_only(&old));
        assert!(is_logging_initialized());
        assert_eq!(active_logger().unwrap().id(), new.id());

        assert!(shut_down_logging_for_active_only(&new));
        assert!(!is_logging_initialized());
    }

    #[test]
    #[serial]
    fn shut_down_is_idempotent() {
        let worker = LogWorker::new().unwrap();
        initialize_logging(&worker);
        shut_down_logging();
        shut_down_logging();
        assert!(!is_logging_initialized());
        assert_eq!(flush_logging(), Err(LogWorkerError::Disconnected));
    }

    #[test]
    #[serial]
    fn dropping_active_worker_clears_slot() {
        let worker = LogWorker::new().unwrap();
        initialize_logging(&worker);
        drop(worker);
        assert!(!is_logging_initialized());
    }
}
