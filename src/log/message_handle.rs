use std::{fmt, ops::Deref};

use crate::log::{fatal_record::FatalRecord, log_record::LogRecord};

/// Single-owner box around one record on its way from a call site to a sink.
///
/// The handle is deliberately not `Clone`: a record moves from the caller's
/// frame into a queue slot, then into the worker, then into a sink, and at
/// every step exactly one owner holds it. Reading through `Deref` is allowed;
/// mutation is not exposed.
pub struct MessageHandle<T> {
    inner: Box<T>,
}

/// Handle for a regular record.
pub type LogMessagePtr = MessageHandle<LogRecord>;
/// Handle for a fatal record.
pub type FatalMessagePtr = MessageHandle<FatalRecord>;

impl<T> MessageHandle<T> {
    #[must_use]
    pub fn new(record: T) -> Self {
        Self {
            inner: Box::new(record),
        }
    }

    /// Gives up the handle and returns the record it owned.
    #[must_use]
    pub fn into_inner(self) -> T {
        *self.inner
    }
}

impl<T> Deref for MessageHandle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: fmt::Debug> fmt::Debug for MessageHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MessageHandle").field(&self.inner).finish()
    }
}

impl<T> From<T> for MessageHandle<T> {
    fn from(record: T) -> Self {
        Self::new(record)
    }
}
