//! Tests for tracing initialization.

use std::sync::Mutex;

use depscan_core::tracing::init_tracing;

static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_init_tracing_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
    init_tracing();
}

#[test]
fn test_invalid_filter_falls_back() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("DEPSCAN_LOG", "not a [valid filter");
    init_tracing();
    std::env::remove_var("DEPSCAN_LOG");
}

#[test]
fn test_per_subsystem_filter_accepted() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("DEPSCAN_LOG", "depscan_analysis::dispatcher=debug,depscan_core=warn");
    init_tracing();
    std::env::remove_var("DEPSCAN_LOG");
}
