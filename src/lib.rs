//! RustyLog is an asynchronous, crash-safe logging core.
//!
//! Application threads emit records and contract checks; a background worker
//! fans them out to pluggable sinks, each on its own thread. A broken
//! contract, a fatal-level record or an intercepted fatal signal flushes
//! everything already queued before the process terminates.
//!
//! ```no_run
//! use rustylog::{LogWorker, check, initialize_logging, log_info};
//!
//! let (worker, path) = LogWorker::with_file_sink("logs", "demo").expect("log worker");
//! initialize_logging(&worker);
//! log_info!("writing to {}", path.display());
//! check!(path.exists(), "log file vanished");
//! ```

/// INI-style configuration and the `[Logging]` settings.
pub mod config;
/// Records, the worker pipeline, the fatal path and the call-site macros.
pub mod log;
/// Concrete sink implementations.
pub mod sinks;
/// Small helpers shared across modules.
pub mod util;

pub use log::{
    fatal::{
        exit_with_signal, fatal_call, panic_on_fatal, push_fatal_message_to_logger,
        set_fatal_exit_handler, set_fatal_flush_timeout, set_fatal_pre_logging_hook,
    },
    fatal_record::{FatalOrigin, FatalRecord},
    log_error::{FatalError, LogWorkerError, SinkError},
    log_level::LogLevel,
    log_record::LogRecord,
    log_sink::LogSink,
    log_worker::LogWorker,
    logger_handle::{LoggerHandle, WorkerId},
    message_handle::{FatalMessagePtr, LogMessagePtr, MessageHandle},
    registry::{
        flush_logging, initialize_logging, is_logging_initialized, shut_down_logging,
        shut_down_logging_for_active_only,
    },
    sink_handle::SinkId,
};
