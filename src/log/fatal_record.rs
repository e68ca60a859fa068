use crate::log::{log_level::LogLevel, log_record::LogRecord, signal_handler};

/// Where a fatal record came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FatalOrigin {
    /// An intercepted OS fatal signal.
    Signal,
    /// A failed `check!`.
    Contract,
    /// A record logged at a fatal level (`log_fatal!`).
    FatalLevel,
}

/// A [`LogRecord`] plus the crash metadata the fatal path needs.
#[derive(Debug)]
pub struct FatalRecord {
    record: LogRecord,
    signal: i32,
    stack_trace: Option<String>,
    origin: FatalOrigin,
}

impl FatalRecord {
    /// Fatal record for a broken contract. The signal slot is the abort signal.
    #[must_use]
    pub fn contract(record: LogRecord) -> Self {
        Self {
            record,
            signal: libc::SIGABRT,
            stack_trace: None,
            origin: FatalOrigin::Contract,
        }
    }

    /// Fatal record for a `FATAL`-level log call.
    #[must_use]
    pub fn fatal_level(record: LogRecord) -> Self {
        Self {
            record,
            signal: libc::SIGABRT,
            stack_trace: None,
            origin: FatalOrigin::FatalLevel,
        }
    }

    /// Fatal record for an intercepted OS signal.
    #[must_use]
    pub fn signal(record: LogRecord, signal: i32, stack_trace: Option<String>) -> Self {
        Self {
            record,
            signal,
            stack_trace,
            origin: FatalOrigin::Signal,
        }
    }

    #[must_use]
    pub fn record(&self) -> &LogRecord {
        &self.record
    }

    #[must_use]
    pub fn level(&self) -> LogLevel {
        self.record.level()
    }

    /// Signal the process terminates with on the default fatal path.
    #[must_use]
    pub fn signal_id(&self) -> i32 {
        self.signal
    }

    #[must_use]
    pub fn stack_trace(&self) -> Option<&str> {
        self.stack_trace.as_deref()
    }

    #[must_use]
    pub fn origin(&self) -> FatalOrigin {
        self.origin
    }

    /// Text as sinks see it, with the crash context folded in.
    #[must_use]
    pub fn rendered_text(&self) -> String {
        let text = self.record.text();
        match self.origin {
            FatalOrigin::Contract => {
                let expression = self.record.expression().unwrap_or("");
                if text.is_empty() {
                    format!("CONTRACT: ({expression})")
                } else {
                    format!("CONTRACT: ({expression}) {text}")
                }
            }
            FatalOrigin::Signal => {
                let mut out = format!(
                    "***** FATAL SIGNAL RECEIVED ***** {}",
                    signal_handler::signal_name(self.signal)
                );
                if !text.is_empty() {
                    out.push('\n');
                    out.push_str(text);
                }
                if let Some(trace) = &self.stack_trace {
                    out.push_str("\n***** STACK TRACE *****\n");
                    out.push_str(trace);
                }
                out
            }
            FatalOrigin::FatalLevel => text.to_string(),
        }
    }

    /// Converts into the regular record delivered to sinks.
    #[must_use]
    pub fn into_log_record(self) -> LogRecord {
        let text = self.rendered_text();
        self.record.with_text(text)
    }
}
