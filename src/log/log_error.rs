use std::fmt;

use crate::log::{
    fatal_record::{FatalOrigin, FatalRecord},
    log_level::LogLevel,
};

/// Failure reported by a sink. The sink wrapper drops it; it never reaches
/// the worker or other sinks.
#[derive(Debug)]
pub enum SinkError {
    Io(String),
    Rejected(String),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SinkError::*;
        match self {
            Io(e) => write!(f, "Sink io error: {e}"),
            Rejected(e) => write!(f, "Sink rejected record: {e}"),
        }
    }
}

impl std::error::Error for SinkError {}

impl From<std::io::Error> for SinkError {
    fn from(e: std::io::Error) -> Self {
        SinkError::Io(e.to_string())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum LogWorkerError {
    /// A background thread could not be spawned.
    Spawn(String),
    /// The worker thread is gone.
    Disconnected,
    /// A bounded flush did not complete in time.
    Timeout,
}

impl fmt::Display for LogWorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use LogWorkerError::*;
        match self {
            Spawn(e) => write!(f, "LogWorker spawn error: {e}"),
            Disconnected => write!(f, "LogWorker is shut down"),
            Timeout => write!(f, "LogWorker flush timed out"),
        }
    }
}

impl std::error::Error for LogWorkerError {}

/// Recoverable stand-in for process termination, raised as a panic payload
/// by [`panic_on_fatal`](crate::log::fatal::panic_on_fatal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalError {
    pub level: LogLevel,
    pub text: String,
    pub expression: Option<&'static str>,
    pub signal: i32,
    pub origin: FatalOrigin,
}

impl From<&FatalRecord> for FatalError {
    fn from(fatal: &FatalRecord) -> Self {
        Self {
            level: fatal.level(),
            text: fatal.rendered_text(),
            expression: fatal.record().expression(),
            signal: fatal.signal_id(),
            origin: fatal.origin(),
        }
    }
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fatal {} ({:?}): {}", self.level, self.origin, self.text)
    }
}

impl std::error::Error for FatalError {}
