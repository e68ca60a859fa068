//! Turns a call site into a record and routes it: regular levels go to the
//! active worker's queue, fatal levels and broken contracts to the fatal path.
//!
//! These functions are what the macros expand to; calling them directly is
//! fine but skips the level gate.

use std::fmt;

use crate::log::{
    fatal, fatal_record::FatalRecord, log_level::LogLevel, log_record::LogRecord,
    message_handle::{FatalMessagePtr, LogMessagePtr},
    registry,
};

pub fn capture(
    level: LogLevel,
    file: &'static str,
    line: u32,
    function: &'static str,
    args: fmt::Arguments<'_>,
) {
    if level.is_fatal() {
        let record = LogRecord::new(level, file, line, function, fmt::format(args));
        fatal::fatal_call(FatalMessagePtr::new(FatalRecord::fatal_level(record)));
        return;
    }

    if !registry::is_logging_initialized() {
        return;
    }
    let record = LogRecord::new(level, file, line, function, fmt::format(args));
    registry::push_message_to_logger(LogMessagePtr::new(record));
}

/// Broken contract. Suppressed while another fatal sequence is in progress.
#[cold]
pub fn capture_contract(
    file: &'static str,
    line: u32,
    function: &'static str,
    expression: &'static str,
    args: Option<fmt::Arguments<'_>>,
) {
    if fatal::fatal_in_progress() {
        return;
    }
    let text = args.map(fmt::format).unwrap_or_default();
    let record =
        LogRecord::new(LogLevel::CONTRACT, file, line, function, text).with_expression(expression);
    fatal::fatal_call(FatalMessagePtr::new(FatalRecord::contract(record)));
}
