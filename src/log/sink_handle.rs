use std::{
    panic::{self, AssertUnwindSafe},
    sync::mpsc::{self, Receiver, Sender},
    thread::{self, JoinHandle},
};

use crate::log::{
    log_error::{LogWorkerError, SinkError},
    log_sink::LogSink,
    message_handle::LogMessagePtr,
};

/// Identifies one registered sink within its worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SinkId(pub(crate) u64);

pub(crate) enum SinkCommand {
    Deliver(LogMessagePtr),
    Flush(Sender<()>),
}

/// Active object around one sink: a private queue drained by a dedicated
/// thread.
///
/// [`send`](Self::send) only enqueues, so a sink stuck in I/O grows its own
/// queue and nothing else. Dropping the handle closes the queue, lets the
/// thread drain what is already queued, and joins it.
pub struct SinkHandle {
    id: SinkId,
    tx: Option<Sender<SinkCommand>>,
    thread: Option<JoinHandle<()>>,
}

impl SinkHandle {
    /// Spawns the sink thread.
    ///
    /// # Errors
    ///
    /// Returns [`LogWorkerError::Spawn`] if the OS refuses the thread.
    pub fn spawn(id: SinkId, sink: Box<dyn LogSink>) -> Result<Self, LogWorkerError> {
        let (tx, rx) = mpsc::channel::<SinkCommand>();
        let thread = thread::Builder::new()
            .name(format!("log-sink-{}", id.0))
            .spawn(move || run_sink(sink, rx))
            .map_err(|e| LogWorkerError::Spawn(e.to_string()))?;

        Ok(Self {
            id,
            tx: Some(tx),
            thread: Some(thread),
        })
    }

    #[must_use]
    pub fn id(&self) -> SinkId {
        self.id
    }

    /// Hands one record to the sink thread without waiting for it.
    pub fn send(&self, message: LogMessagePtr) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(SinkCommand::Deliver(message));
        }
    }

    /// Queues a flush marker and returns the channel that fires once the
    /// sink has processed everything before it.
    pub(crate) fn request_flush(&self) -> Option<Receiver<()>> {
        let tx = self.tx.as_ref()?;
        let (ack_tx, ack_rx) = mpsc::channel();
        tx.send(SinkCommand::Flush(ack_tx)).ok()?;
        Some(ack_rx)
    }

    /// Blocks until every record sent before this call has reached the sink.
    #[cfg(test)]
    fn flush(&self) {
        if let Some(ack) = self.request_flush() {
            let _ = ack.recv();
        }
    }
}

impl Drop for SinkHandle {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn run_sink(mut sink: Box<dyn LogSink>, rx: Receiver<SinkCommand>) {
    while let Ok(cmd) = rx.recv() {
        match cmd {
            SinkCommand::Deliver(message) => {
                let _ = contain(|| sink.receive(message));
            }
            SinkCommand::Flush(ack) => {
                let _ = contain(|| sink.flush());
                let _ = ack.send(());
            }
        }
    }
    let _ = contain(|| sink.flush());
}

/// Runs one sink call, turning a panic into an error so the loop survives.
fn contain<F>(f: F) -> Result<(), SinkError>
where
    F: FnOnce() -> Result<(), SinkError>,
{
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|_| Err(SinkError::Rejected("sink panicked".into())))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::log::{log_level::LogLevel, log_record::LogRecord};
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    struct Collect(Arc<Mutex<Vec<String>>>);

    impl LogSink for Collect {
        fn receive(&mut self, message: LogMessagePtr) -> Result<(), SinkError> {
            self.0.lock().unwrap().push(message.text().to_string());
            Ok(())
        }
    }

    struct Flaky {
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl LogSink for Flaky {
        fn receive(&mut self, message: LogMessagePtr) -> Result<(), SinkError> {
            match message.text() {
                "panic" => panic!("sink blew up"),
                "error" => Err(SinkError::Rejected("no".into())),
                text => {
                    self.seen.lock().unwrap().push(text.to_string());
                    Ok(())
                }
            }
        }
    }

    fn msg(text: &str) -> LogMessagePtr {
        LogMessagePtr::new(LogRecord::new(LogLevel::INFO, "t.rs", 1, "t", text.into()))
    }

    #[test]
    fn flush_waits_for_queued_records() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let handle = SinkHandle::spawn(SinkId(1), Box::new(Collect(seen.clone()))).unwrap();
        for t in ["a", "b", "c"] {
            handle.send(msg(t));
        }
        handle.flush();
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn sink_errors_and_panics_do_not_stop_the_thread() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let handle =
            SinkHandle::spawn(SinkId(2), Box::new(Flaky { seen: seen.clone() })).unwrap();
        for t in ["one", "panic", "two", "error", "three"] {
            handle.send(msg(t));
        }
        handle.flush();
        assert_eq!(*seen.lock().unwrap(), vec!["one", "two", "three"]);
    }

    #[test]
    fn drop_drains_before_joining() {
        struct Slow(Arc<Mutex<Vec<String>>>);
        impl LogSink for Slow {
            fn receive(&mut self, message: LogMessagePtr) -> Result<(), SinkError> {
                std::thread::sleep(Duration::from_millis(5));
                self.0.lock().unwrap().push(message.text().to_string());
                Ok(())
            }
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let handle = SinkHandle::spawn(SinkId(3), Box::new(Slow(seen.clone()))).unwrap();
        for i in 0..10 {
            handle.send(msg(&i.to_string()));
        }
        drop(handle);
        assert_eq!(seen.lock().unwrap().len(), 10);
    }
}
