pub mod capture;
pub mod fatal;
pub mod fatal_record;
pub mod level_gate;
pub mod log_error;
pub mod log_level;
pub mod log_macros;
pub mod log_record;
pub mod log_sink;
pub mod log_worker;
pub mod logger_handle;
pub mod message_handle;
pub mod noop_log_sink;
pub mod registry;
pub mod signal_handler;
pub mod sink_handle;
pub use noop_log_sink::NoopLogSink;
