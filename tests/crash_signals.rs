#![cfg(unix)]

mod common;

use std::{
    fs,
    os::unix::process::ExitStatusExt,
    path::Path,
    process::Command,
    sync::{Arc, Mutex},
};

use common::MemorySink;
use rustylog::{
    FatalOrigin, LogWorker, check, initialize_logging, is_logging_initialized, log_info,
    set_fatal_exit_handler, shut_down_logging,
};
use serial_test::serial;

const CHILD_DIR_ENV: &str = "RUSTYLOG_CRASH_CHILD_DIR";

#[derive(Debug, Clone)]
struct Caught {
    signal: i32,
    origin: FatalOrigin,
    text: String,
}

#[test]
#[serial]
fn intercepted_signal_reaches_exit_handler() {
    let worker = LogWorker::new().unwrap();
    worker.add_sink(MemorySink::default()).unwrap();
    initialize_logging(&worker);

    let caught = Arc::new(Mutex::new(None));
    let c = caught.clone();
    set_fatal_exit_handler(move |m| {
        if let Ok(mut slot) = c.lock() {
            *slot = Some(Caught {
                signal: m.signal_id(),
                origin: m.origin(),
                text: m.rendered_text(),
            });
        }
    });

    // SAFETY: our handler is installed and the exit handler returns.
    unsafe {
        libc::raise(libc::SIGTERM);
    }

    let caught = caught.lock().unwrap().clone().expect("handler should have run");
    assert_eq!(caught.signal, libc::SIGTERM);
    assert_eq!(caught.origin, FatalOrigin::Signal);
    assert!(caught.text.starts_with("***** FATAL SIGNAL RECEIVED ***** SIGTERM"));

    shut_down_logging();
    assert!(!is_logging_initialized());
}

/// Re-runs the named test in a child process with the crash directory set.
fn run_child(test_name: &str, dir: &Path) -> std::process::Output {
    Command::new(std::env::current_exe().unwrap())
        .args(["--exact", test_name, "--test-threads=1", "--nocapture"])
        .env(CHILD_DIR_ENV, dir)
        .output()
        .unwrap()
}

fn read_single_log(dir: &Path) -> String {
    let mut logs: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "log"))
        .collect();
    assert_eq!(logs.len(), 1, "expected one log file in {}", dir.display());
    fs::read_to_string(logs.remove(0)).unwrap()
}

#[test]
fn broken_contract_flushes_then_aborts() {
    if let Ok(dir) = std::env::var(CHILD_DIR_ENV) {
        let (worker, _path) = LogWorker::with_file_sink(dir, "child").unwrap();
        initialize_logging(&worker);
        log_info!("queued before crash");
        check!(1 == 2, "expected failure");
        std::process::exit(3);
    }

    let tmp = tempfile::tempdir().unwrap();
    let out = run_child("broken_contract_flushes_then_aborts", tmp.path());
    assert_eq!(out.status.signal(), Some(libc::SIGABRT), "{out:?}");

    let content = read_single_log(tmp.path());
    let queued = content.find("queued before crash").expect("queued record missing");
    let fatal = content
        .find("CONTRACT: (1 == 2) expected failure")
        .expect("contract record missing");
    assert!(queued < fatal);
}

#[test]
fn fatal_signal_flushes_then_reraises() {
    if let Ok(dir) = std::env::var(CHILD_DIR_ENV) {
        let (worker, _path) = LogWorker::with_file_sink(dir, "child").unwrap();
        initialize_logging(&worker);
        log_info!("last words");
        // SAFETY: raising a signal has no memory-safety preconditions.
        unsafe {
            libc::raise(libc::SIGSEGV);
        }
        std::process::exit(3);
    }

    let tmp = tempfile::tempdir().unwrap();
    let out = run_child("fatal_signal_flushes_then_reraises", tmp.path());
    assert_eq!(out.status.signal(), Some(libc::SIGSEGV), "{out:?}");

    let content = read_single_log(tmp.path());
    assert!(content.contains("last words"));
    assert!(content.contains("***** FATAL SIGNAL RECEIVED ***** SIGSEGV"));
}
