use std::{
    sync::mpsc::{self, RecvTimeoutError, Sender},
    time::Duration,
};

use crate::log::{
    log_error::LogWorkerError,
    message_handle::{FatalMessagePtr, LogMessagePtr},
    sink_handle::{SinkHandle, SinkId},
};

/// Identity of one [`LogWorker`](crate::log::log_worker::LogWorker). Never reused
/// within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorkerId(pub(crate) u64);

/// Work item travelling through a worker's queue. Control items share the
/// queue with records so they are ordered relative to them.
pub(crate) enum WorkerCommand {
    Log(LogMessagePtr),
    Fatal(FatalMessagePtr),
    AddSink(SinkHandle),
    RemoveSink(SinkId, Sender<bool>),
    Flush(Sender<()>),
    Shutdown,
}

/// Lightweight, cloneable producer side of a worker's queue.
///
/// Every method only enqueues (or enqueues and waits for an acknowledgement),
/// so any thread may hold a clone. Once the worker is gone, pushes are
/// silently dropped.
#[derive(Clone)]
pub struct LoggerHandle {
    pub(super) id: WorkerId,
    pub(super) tx: Sender<WorkerCommand>,
}

impl LoggerHandle {
    #[must_use]
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Moves one record into the queue. Never blocks.
    #[inline]
    pub fn push(&self, message: LogMessagePtr) {
        let _ = self.tx.send(WorkerCommand::Log(message));
    }

    /// Moves a fatal record into the queue. Sinks receive it as a regular
    /// record with the crash context rendered into its text.
    pub fn push_fatal(&self, message: FatalMessagePtr) {
        let _ = self.tx.send(WorkerCommand::Fatal(message));
    }

    /// Blocks until every item queued before this call has reached every sink.
    ///
    /// # Errors
    ///
    /// Returns [`LogWorkerError::Disconnected`] if the worker already shut down.
    pub fn flush(&self) -> Result<(), LogWorkerError> {
        let (ack_tx, ack_rx) = mpsc::channel();
        self.tx
            .send(WorkerCommand::Flush(ack_tx))
            .map_err(|_| LogWorkerError::Disconnected)?;
        ack_rx.recv().map_err(|_| LogWorkerError::Disconnected)
    }

    /// Like [`flush`](Self::flush) but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// [`LogWorkerError::Timeout`] when the worker did not acknowledge in time,
    /// [`LogWorkerError::Disconnected`] when it is gone.
    pub fn flush_timeout(&self, timeout: Duration) -> Result<(), LogWorkerError> {
        let (ack_tx, ack_rx) = mpsc::channel();
        self.tx
            .send(WorkerCommand::Flush(ack_tx))
            .map_err(|_| LogWorkerError::Disconnected)?;
        ack_rx.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => LogWorkerError::Timeout,
            RecvTimeoutError::Disconnected => LogWorkerError::Disconnected,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::log::{log_level::LogLevel, log_record::LogRecord};

    fn handle() -> (LoggerHandle, mpsc::Receiver<WorkerCommand>) {
        let (tx, rx) = mpsc::channel();
        (
            LoggerHandle {
                id: WorkerId(42),
                tx,
            },
            rx,
        )
    }

    #[test]
    fn push_enqueues_in_order() {
        let (h, rx) = handle();
        for t in ["first", "second"] {
            h.push(LogMessagePtr::new(LogRecord::new(
                LogLevel::INFO,
                "t.rs",
                1,
                "t",
                t.into(),
            )));
        }
        let texts: Vec<String> = rx
            .try_iter()
            .filter_map(|cmd| match cmd {
                WorkerCommand::Log(m) => Some(m.text().to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn push_after_receiver_closed_is_silent() {
        let (h, rx) = handle();
        drop(rx);
        h.push(LogMessagePtr::new(LogRecord::new(
            LogLevel::ERROR,
            "t.rs",
            1,
            "t",
            "won't send".into(),
        )));
        assert_eq!(h.flush(), Err(LogWorkerError::Disconnected));
    }

    #[test]
    fn flush_timeout_reports_timeout_when_nobody_answers() {
        let (h, _rx) = handle();
        assert_eq!(
            h.flush_timeout(Duration::from_millis(20)),
            Err(LogWorkerError::Timeout)
        );
    }
}
