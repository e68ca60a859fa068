#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use rustylog::{LogLevel, LogMessagePtr, LogSink, SinkError};

#[derive(Debug, Clone)]
pub struct Seen {
    pub level: LogLevel,
    pub text: String,
    pub thread: String,
    pub at: Instant,
}

/// Sink that appends every record to a shared in-memory sequence.
#[derive(Clone, Default)]
pub struct MemorySink {
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl MemorySink {
    pub fn records(&self) -> Vec<Seen> {
        self.seen.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn texts(&self) -> Vec<String> {
        self.records().into_iter().map(|s| s.text).collect()
    }
}

impl LogSink for MemorySink {
    fn receive(&mut self, message: LogMessagePtr) -> Result<(), SinkError> {
        let seen = Seen {
            level: message.level(),
            text: message.text().to_string(),
            thread: message.thread().to_string(),
            at: Instant::now(),
        };
        self.seen
            .lock()
            .map_err(|_| SinkError::Rejected("poisoned".into()))?
            .push(seen);
        Ok(())
    }
}
