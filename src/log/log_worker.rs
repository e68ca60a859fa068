use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        mpsc::{self, Receiver},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use crate::{
    config::LoggingConfig,
    log::{
        log_error::LogWorkerError,
        log_sink::LogSink,
        logger_handle::{LoggerHandle, WorkerCommand, WorkerId},
        message_handle::{FatalMessagePtr, LogMessagePtr},
        registry,
        sink_handle::{SinkHandle, SinkId},
    },
    sinks::file_sink::FileSink,
};

static NEXT_WORKER_ID: AtomicU64 = AtomicU64::new(1);

/// Background dispatcher between producer threads and sinks.
///
/// # Architecture
///
/// 1. **Producers**: any thread pushes through a [`LoggerHandle`].
/// 2. **Queue**: an unbounded `mpsc` channel; push never blocks.
/// 3. **Consumer**: one `log-worker` thread pops in arrival order and hands
///    each record to every sink, in registration order.
/// 4. **Sinks**: each behind its own [`SinkHandle`] thread, so the hand-off is
///    an enqueue, not a call into sink code.
///
/// Dropping the worker tears it out of the registry (if it is the active
/// one), then drains the queue and every sink before joining.
pub struct LogWorker {
    handle: LoggerHandle,
    next_sink: AtomicU64,
    thread: Option<JoinHandle<()>>,
}

impl LogWorker {
    /// Starts a worker with no sinks.
    ///
    /// # Errors
    ///
    /// Returns [`LogWorkerError::Spawn`] if the worker thread cannot start.
    pub fn new() -> Result<Self, LogWorkerError> {
        let id = WorkerId(NEXT_WORKER_ID.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel::<WorkerCommand>();

        let thread = thread::Builder::new()
            .name("log-worker".into())
            .spawn(move || run_worker(rx))
            .map_err(|e| LogWorkerError::Spawn(e.to_string()))?;

        Ok(Self {
            handle: LoggerHandle { id, tx },
            next_sink: AtomicU64::new(1),
            thread: Some(thread),
        })
    }

    /// Starts a worker with a [`FileSink`] in `dir` and returns the log file path.
    ///
    /// # Errors
    ///
    /// Returns [`LogWorkerError::Spawn`] if a thread cannot start.
    pub fn with_file_sink<D: AsRef<Path>>(
        dir: D,
        prefix: &str,
    ) -> Result<(Self, PathBuf), LogWorkerError> {
        let worker = Self::new()?;
        let sink = FileSink::create(dir, prefix);
        let path = sink.file_path().to_path_buf();
        worker.add_sink(sink)?;
        Ok((worker, path))
    }

    /// Starts a worker with a file sink placed according to `config`.
    ///
    /// # Errors
    ///
    /// Returns [`LogWorkerError::Spawn`] if a thread cannot start.
    pub fn from_config(config: &LoggingConfig) -> Result<(Self, PathBuf), LogWorkerError> {
        Self::with_file_sink(&config.log_dir, &config.prefix)
    }

    #[must_use]
    pub fn id(&self) -> WorkerId {
        self.handle.id
    }

    /// Returns a cloneable handle to this worker's queue.
    #[must_use]
    pub fn handle(&self) -> LoggerHandle {
        self.handle.clone()
    }

    /// Registers a sink on its own thread. Records pushed after this call
    /// returns are delivered to it.
    ///
    /// # Errors
    ///
    /// [`LogWorkerError::Spawn`] if the sink thread cannot start,
    /// [`LogWorkerError::Disconnected`] if the worker is gone.
    pub fn add_sink<S: LogSink>(&self, sink: S) -> Result<SinkId, LogWorkerError> {
        let id = SinkId(self.next_sink.fetch_add(1, Ordering::Relaxed));
        let handle = SinkHandle::spawn(id, Box::new(sink))?;
        self.handle
            .tx
            .send(WorkerCommand::AddSink(handle))
            .map_err(|_| LogWorkerError::Disconnected)?;
        Ok(id)
    }

    /// Unregisters a sink after it has received everything queued before this
    /// call. Returns `false` if no such sink is registered.
    pub fn remove_sink(&self, id: SinkId) -> bool {
        let (ack_tx, ack_rx) = mpsc::channel();
        if self
            .handle
            .tx
            .send(WorkerCommand::RemoveSink(id, ack_tx))
            .is_err()
        {
            return false;
        }
        ack_rx.recv().unwrap_or(false)
    }

    pub fn push(&self, message: LogMessagePtr) {
        self.handle.push(message);
    }

    pub fn push_fatal(&self, message: FatalMessagePtr) {
        self.handle.push_fatal(message);
    }

    /// Blocks until every record pushed before this call reached every sink.
    ///
    /// # Errors
    ///
    /// Returns [`LogWorkerError::Disconnected`] if the worker is gone.
    pub fn flush(&self) -> Result<(), LogWorkerError> {
        self.handle.flush()
    }

    /// # Errors
    ///
    /// See [`LoggerHandle::flush_timeout`].
    pub fn flush_timeout(&self, timeout: Duration) -> Result<(), LogWorkerError> {
        self.handle.flush_timeout(timeout)
    }
}

impl Drop for LogWorker {
    fn drop(&mut self) {
        registry::shut_down_logging_for_active_only(self);
        let _ = self.handle.tx.send(WorkerCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn run_worker(rx: Receiver<WorkerCommand>) {
    let mut sinks: Vec<SinkHandle> = Vec::new();

    while let Ok(cmd) = rx.recv() {
        match cmd {
            WorkerCommand::Log(message) => fan_out(&sinks, message),
            WorkerCommand::Fatal(fatal) => {
                let record = fatal.into_inner().into_log_record();
                fan_out(&sinks, LogMessagePtr::new(record));
            }
            WorkerCommand::AddSink(sink) => sinks.push(sink),
            WorkerCommand::RemoveSink(id, ack) => {
                let removed = sinks
                    .iter()
                    .position(|s| s.id() == id)
                    .map(|i| sinks.remove(i));
                let found = removed.is_some();
                // Dropping the handle drains and joins the sink thread.
                drop(removed);
                let _ = ack.send(found);
            }
            WorkerCommand::Flush(ack) => {
                flush_all(&sinks);
                let _ = ack.send(());
            }
            WorkerCommand::Shutdown => break,
        }
    }

    flush_all(&sinks);
}

/// Every sink gets its own copy; the last one takes the original.
fn fan_out(sinks: &[SinkHandle], message: LogMessagePtr) {
    let Some((last, rest)) = sinks.split_last() else {
        return;
    };
    for sink in rest {
        sink.send(LogMessagePtr::new(message.duplicate()));
    }
    last.send(message);
}

/// Sinks flush in parallel; returns once all of them acknowledged.
fn flush_all(sinks: &[SinkHandle]) {
    let acks: Vec<_> = sinks.iter().filter_map(SinkHandle::request_flush).collect();
    for ack in acks {
        let _ = ack.recv();
    }
}
