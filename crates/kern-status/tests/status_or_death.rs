//! Process-terminating paths of `StatusOr`.
//!
//! Each test re-executes this test binary filtered to itself with
//! `KERN_DEATH_CHILD` set; the child runs the fatal call and the parent
//! inspects the exit code and stderr.

use std::process::{Command, Output};

use kern_status::StatusOr;

const CHILD_ENV: &str = "KERN_DEATH_CHILD";

fn in_child() -> bool {
    std::env::var_os(CHILD_ENV).is_some()
}

fn run_child(test_name: &str) -> Output {
    Command::new(std::env::current_exe().expect("test binary path"))
        .args(["--exact", test_name, "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, "1")
        .output()
        .expect("spawn child")
}

#[test]
fn from_value_type_mismatch_exits_1() {
    if in_child() {
        let _ = StatusOr::<i32>::from_value(Some("not a number"));
        unreachable!("from_value returned on mismatch");
    }
    let out = run_child("from_value_type_mismatch_exits_1");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Expected value of type i32, got &str"), "stderr: {stderr}");
    assert!(stderr.contains("status_or_death.rs:"), "stderr: {stderr}");
}

#[test]
fn from_any_type_mismatch_exits_1() {
    if in_child() {
        let _ = StatusOr::<String>::from_any(Some(Box::new(1.5f64)));
        unreachable!("from_any returned on mismatch");
    }
    let out = run_child("from_any_type_mismatch_exits_1");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Expected value of type alloc::string::String"), "stderr: {stderr}");
}

#[test]
fn matching_value_does_not_exit() {
    let s = StatusOr::<i32>::from_value(Some(5i32));
    assert!(s.ok());
    assert_eq!(s.val(), Some(&5));
}
