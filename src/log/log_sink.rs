use crate::log::{log_error::SinkError, message_handle::LogMessagePtr};

/// A pluggable consumer of log records.
///
/// Each registered sink runs on its own thread behind a
/// [`SinkHandle`](crate::log::sink_handle::SinkHandle), so `receive` may block
/// on I/O without holding up the worker or sibling sinks. Errors and panics
/// are contained by the wrapper.
pub trait LogSink: Send + 'static {
    /// Takes ownership of one record.
    fn receive(&mut self, message: LogMessagePtr) -> Result<(), SinkError>;

    /// Pushes buffered output to its destination. Called when the pipeline
    /// is flushed.
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}
