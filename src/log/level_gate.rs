//! Process-wide runtime switch deciding whether a call site should build a
//! record at all.
//!
//! One atomic flag per level value. Readers never lock; a concurrent writer
//! may be observed before or after its store but never torn.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::log::log_level::LogLevel;

static GATE: [AtomicBool; 256] = [const { AtomicBool::new(true) }; 256];

/// Returns `true` if records at `level` should be constructed.
#[inline]
#[must_use]
pub fn enabled(level: LogLevel) -> bool {
    level.is_fatal() || GATE[usize::from(level.value())].load(Ordering::Relaxed)
}

/// Enables or disables `level`. Fatal levels cannot be disabled; the call is
/// ignored for them.
pub fn set_enabled(level: LogLevel, on: bool) {
    if level.is_fatal() {
        return;
    }
    GATE[usize::from(level.value())].store(on, Ordering::Relaxed);
}

/// Disables every level value below `min`, custom levels included, and
/// enables the rest. Fatal slots are left untouched.
pub fn set_min_level(min: LogLevel) {
    let floor = usize::from(min.value());
    let fatal = usize::from(LogLevel::FATAL.value());
    for (value, slot) in GATE.iter().enumerate().take(fatal) {
        slot.store(value >= floor, Ordering::Relaxed);
    }
}

/// Re-enables every level.
pub fn reset() {
    for slot in &GATE {
        slot.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn disabling_one_level_leaves_others_alone() {
        reset();
        set_enabled(LogLevel::DEBUG, false);
        assert!(!enabled(LogLevel::DEBUG));
        assert!(enabled(LogLevel::INFO));
        assert!(enabled(LogLevel::TRACE));
        reset();
        assert!(enabled(LogLevel::DEBUG));
    }

    #[test]
    #[serial]
    fn fatal_levels_stay_enabled() {
        reset();
        set_enabled(LogLevel::FATAL, false);
        set_enabled(LogLevel::CONTRACT, false);
        assert!(enabled(LogLevel::FATAL));
        assert!(enabled(LogLevel::CONTRACT));
    }

    #[test]
    #[serial]
    fn min_level_cuts_below() {
        reset();
        set_min_level(LogLevel::WARN);
        assert!(!enabled(LogLevel::INFO));
        assert!(!enabled(LogLevel::DEBUG));
        assert!(enabled(LogLevel::WARN));
        assert!(enabled(LogLevel::ERROR));
        reset();
    }

    #[test]
    #[serial]
    fn min_level_also_cuts_custom_levels() {
        reset();
        let notice = LogLevel::new(100, "NOTICE");
        let alert = LogLevel::new(170, "ALERT");
        set_min_level(LogLevel::WARN);
        assert!(!enabled(notice));
        assert!(!enabled(LogLevel::new(1, "FINE")));
        assert!(enabled(alert));
        assert!(enabled(LogLevel::CONTRACT));

        set_min_level(LogLevel::TRACE);
        assert!(enabled(notice));
        reset();
    }

    #[test]
    #[serial]
    fn custom_level_has_its_own_slot() {
        reset();
        let notice = LogLevel::new(100, "NOTICE");
        set_enabled(notice, false);
        assert!(!enabled(notice));
        assert!(enabled(LogLevel::INFO));
        reset();
    }
}
