use std::{fmt, thread};

use crate::{log::log_level::LogLevel, util::time};

/// One formatted log event, immutable once built.
///
/// A record is created on the caller's thread, then moved behind a
/// [`MessageHandle`](crate::log::message_handle::MessageHandle) and never
/// shared. There is intentionally no `Clone`; the worker makes one explicit
/// per-sink copy when it fans a record out.
#[derive(Debug)]
pub struct LogRecord {
    level: LogLevel,
    file: &'static str,
    line: u32,
    function: &'static str,
    thread: String,
    ts_ms: u128,
    text: String,
    expression: Option<&'static str>,
}

impl LogRecord {
    /// Creates a record stamped with the current thread and wall-clock time.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rustylog::log::{log_level::LogLevel, log_record::LogRecord};
    ///
    /// let rec = LogRecord::new(LogLevel::INFO, file!(), line!(), "main", "Connection established".into());
    /// assert_eq!(rec.text(), "Connection established");
    /// ```
    #[must_use]
    pub fn new(
        level: LogLevel,
        file: &'static str,
        line: u32,
        function: &'static str,
        text: String,
    ) -> Self {
        Self {
            level,
            file,
            line,
            function,
            thread: current_thread_identity(),
            ts_ms: time::now_millis(),
            text,
            expression: None,
        }
    }

    /// Attaches the source text of the boolean expression of a contract check.
    #[must_use]
    pub fn with_expression(mut self, expression: &'static str) -> Self {
        self.expression = Some(expression);
        self
    }

    #[must_use]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    #[must_use]
    pub fn file(&self) -> &'static str {
        self.file
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[must_use]
    pub fn function(&self) -> &'static str {
        self.function
    }

    /// Name of the producing thread, or its id when it is unnamed.
    #[must_use]
    pub fn thread(&self) -> &str {
        &self.thread
    }

    /// Milliseconds since the UNIX epoch at construction.
    #[must_use]
    pub fn ts_ms(&self) -> u128 {
        self.ts_ms
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn expression(&self) -> Option<&'static str> {
        self.expression
    }

    /// Same record with its text replaced. Used when a fatal record is
    /// rendered for sinks.
    pub(crate) fn with_text(mut self, text: String) -> Self {
        self.text = text;
        self
    }

    /// Independent copy for fan-out to one more sink.
    pub(crate) fn duplicate(&self) -> Self {
        Self {
            level: self.level,
            file: self.file,
            line: self.line,
            function: self.function,
            thread: self.thread.clone(),
            ts_ms: self.ts_ms,
            text: self.text.clone(),
            expression: self.expression,
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:<8} [{}] {}:{} ({}) {}",
            time::format_log_timestamp(self.ts_ms),
            self.level.name(),
            self.thread,
            self.file,
            self.line,
            self.function,
            self.text
        )
    }
}

fn current_thread_identity() -> String {
    let current = thread::current();
    match current.name() {
        Some(name) => name.to_string(),
        None => format!("{:?}", current.id()),
    }
}
