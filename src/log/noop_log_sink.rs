use crate::log::{log_error::SinkError, log_sink::LogSink, message_handle::LogMessagePtr};

/// Sink that discards everything it receives.
#[derive(Debug, Clone, Default)]
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    #[inline]
    fn receive(&mut self, _message: LogMessagePtr) -> Result<(), SinkError> {
        Ok(())
    }
}
