use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

/// Defines the severity level of a log record.
///
/// Levels form an ordered, open set: the built-in severities are associated
/// constants, and applications may mint their own with [`LogLevel::new`]
/// without touching the existing ones. Ordering follows `value`.
///
/// Any level whose value is at or above [`LogLevel::FATAL`] is fatal and is
/// routed through the fatal path instead of the regular queue.
///
/// Identity is the value alone: the name is a label for output, so two
/// levels with the same value compare equal and share one gate slot.
#[derive(Clone, Copy, Debug)]
pub struct LogLevel {
    value: u8,
    name: &'static str,
}

impl LogLevel {
    /// Designates very fine-grained informational events.
    pub const TRACE: LogLevel = LogLevel::new(0, "TRACE");
    /// Designates fine-grained informational events that are most useful to debug an application.
    pub const DEBUG: LogLevel = LogLevel::new(40, "DEBUG");
    /// Designates informational messages that highlight the progress of the application at coarse-grained level.
    pub const INFO: LogLevel = LogLevel::new(80, "INFO");
    /// Designates potentially harmful situations.
    pub const WARN: LogLevel = LogLevel::new(120, "WARNING");
    /// Designates error events that might still allow the application to continue running.
    pub const ERROR: LogLevel = LogLevel::new(160, "ERROR");
    /// Designates events after which the process terminates.
    pub const FATAL: LogLevel = LogLevel::new(200, "FATAL");
    /// Pseudo-level used for broken contracts (`check!`).
    pub const CONTRACT: LogLevel = LogLevel::new(240, "CONTRACT");

    /// Built-in levels in ascending order.
    pub const BUILTIN: [LogLevel; 7] = [
        Self::TRACE,
        Self::DEBUG,
        Self::INFO,
        Self::WARN,
        Self::ERROR,
        Self::FATAL,
        Self::CONTRACT,
    ];

    /// Creates a custom level. Two levels with the same `value` share one
    /// slot in the level gate.
    #[must_use]
    pub const fn new(value: u8, name: &'static str) -> Self {
        Self { value, name }
    }

    #[must_use]
    pub const fn value(&self) -> u8 {
        self.value
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        self.value >= Self::FATAL.value
    }

    /// Looks up a built-in level by name, case-insensitively.
    /// `WARN` and `WARNING` both resolve to [`LogLevel::WARN`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("WARN") {
            return Some(Self::WARN);
        }
        Self::BUILTIN
            .into_iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
    }
}

impl PartialEq for LogLevel {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for LogLevel {}

impl Hash for LogLevel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn builtin_levels_are_ordered() {
        for pair in LogLevel::BUILTIN.windows(2) {
            assert!(pair[0] < pair[1], "{} should sort before {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn custom_level_slots_between_builtins() {
        let notice = LogLevel::new(100, "NOTICE");
        assert!(notice > LogLevel::INFO);
        assert!(notice < LogLevel::WARN);
        assert!(!notice.is_fatal());
    }

    #[test]
    fn fatal_and_contract_are_fatal() {
        assert!(LogLevel::FATAL.is_fatal());
        assert!(LogLevel::CONTRACT.is_fatal());
        assert!(LogLevel::new(250, "PANIC").is_fatal());
        assert!(!LogLevel::ERROR.is_fatal());
    }

    #[test]
    fn identity_is_the_value() {
        let alias = LogLevel::new(120, "WARN");
        assert_eq!(alias, LogLevel::WARN);
        assert_eq!(alias.cmp(&LogLevel::WARN), std::cmp::Ordering::Equal);
        assert_eq!(alias.name(), "WARN");
        assert_ne!(LogLevel::new(121, "WARNING"), LogLevel::WARN);

        let mut seen = std::collections::HashSet::new();
        seen.insert(LogLevel::WARN);
        assert!(seen.contains(&alias));
    }

    #[test]
    fn from_name_accepts_aliases() {
        assert_eq!(LogLevel::from_name("warn"), Some(LogLevel::WARN));
        assert_eq!(LogLevel::from_name(" WARNING "), Some(LogLevel::WARN));
        assert_eq!(LogLevel::from_name("debug"), Some(LogLevel::DEBUG));
        assert_eq!(LogLevel::from_name("verbose"), None);
    }
}
