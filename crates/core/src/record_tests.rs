// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn pending() -> JobRecord {
    JobRecord::new(
        JobId::from_string("job-test"),
        JobKind::PortScan,
        OwnerId::from("alice"),
        json!({"target": "example.com"}),
        1_000,
    )
}

#[test]
fn new_record_is_pending_with_payload() {
    let record = pending();
    assert_eq!(record.state(), JobState::Pending);
    assert_eq!(record.payload(), Some(&json!({"target": "example.com"})));
    assert_eq!(record.created_at_ms(), 1_000);
    assert!(record.started_at_ms().is_none());
    assert!(record.completed_at_ms().is_none());
    assert!(record.result().is_none());
    assert!(record.error().is_none());
}

#[test]
fn start_moves_payload_out() {
    let mut record = pending();
    let payload = record.start(1_500).unwrap();
    assert_eq!(payload, json!({"target": "example.com"}));
    assert_eq!(record.state(), JobState::Running);
    assert_eq!(record.started_at_ms(), Some(1_500));
    assert!(record.payload().is_none());
}

#[test]
fn complete_sets_result_only() {
    let mut record = pending();
    record.start(1_500).unwrap();
    record.complete(json!("ok"), 2_000).unwrap();
    assert_eq!(record.state(), JobState::Completed);
    assert_eq!(record.completed_at_ms(), Some(2_000));
    assert_eq!(record.result(), Some(&json!("ok")));
    assert!(record.error().is_none());
}

#[test]
fn fail_sets_error_only() {
    let mut record = pending();
    record.start(1_500).unwrap();
    record.fail(JobError::timed_out(Duration::from_secs(2)), 3_500).unwrap();
    assert_eq!(record.state(), JobState::Failed);
    assert_eq!(record.error(), Some(&JobError::TimedOut { after_ms: 2_000 }));
    assert!(record.result().is_none());
}

#[test]
fn pending_cannot_skip_to_terminal() {
    let mut record = pending();
    let err = record.complete(json!(1), 2_000).unwrap_err();
    assert_eq!(err.from, JobState::Pending);
    assert_eq!(err.to, JobState::Completed);
    assert!(record.fail(JobError::execution_failed("x"), 2_000).is_err());
    assert_eq!(record.state(), JobState::Pending);
}

#[test]
fn start_is_only_allowed_once() {
    let mut record = pending();
    record.start(1_500).unwrap();
    assert!(record.start(1_600).is_err());
    assert_eq!(record.started_at_ms(), Some(1_500));
}

#[test]
fn terminal_records_are_immutable() {
    let mut record = pending();
    record.start(1_500).unwrap();
    record.complete(json!("first"), 2_000).unwrap();

    assert!(record.complete(json!("second"), 3_000).is_err());
    assert!(record.fail(JobError::execution_failed("late"), 3_000).is_err());
    assert!(record.start(3_000).is_err());

    assert_eq!(record.state(), JobState::Completed);
    assert_eq!(record.result(), Some(&json!("first")));
    assert_eq!(record.completed_at_ms(), Some(2_000));
    assert!(record.error().is_none());
}

#[test]
fn failed_record_keeps_first_error() {
    let mut record = pending();
    record.start(1_500).unwrap();
    record.fail(JobError::timed_out(Duration::from_millis(100)), 1_600).unwrap();
    assert!(record.complete(json!("late result"), 1_700).is_err());
    assert!(record.error().unwrap().is_timeout());
    assert!(record.result().is_none());
}

#[test]
fn transition_error_message() {
    let mut record = pending();
    let err = record.complete(json!(null), 1).unwrap_err();
    assert_eq!(err.to_string(), "job job-test: cannot move from pending to completed");
}

#[yare::parameterized(
    pending   = { JobState::Pending,   false },
    running   = { JobState::Running,   false },
    completed = { JobState::Completed, true },
    failed    = { JobState::Failed,    true },
)]
fn terminal_states(state: JobState, terminal: bool) {
    assert_eq!(state.is_terminal(), terminal);
}

#[test]
fn job_error_serializes_with_kind_tag() {
    let timeout = serde_json::to_value(JobError::timed_out(Duration::from_millis(250))).unwrap();
    assert_eq!(timeout, json!({"kind": "timed_out", "after_ms": 250}));

    let failed = serde_json::to_value(JobError::execution_failed("nmap exited 1")).unwrap();
    assert_eq!(failed, json!({"kind": "execution_failed", "message": "nmap exited 1"}));
}

#[test]
fn job_error_display() {
    assert_eq!(JobError::timed_out(Duration::from_secs(1)).to_string(), "timed out after 1000ms");
    assert_eq!(JobError::execution_failed("boom").to_string(), "boom");
}

#[test]
fn age_saturates() {
    let record = pending();
    assert_eq!(record.age_ms(4_000), 3_000);
    assert_eq!(record.age_ms(10), 0);
}

#[test]
fn outcome_fields_follow_terminal_state() {
    let mut done = pending();
    done.start(2_000).unwrap();
    assert!(done.result().is_none() && done.error().is_none());
    done.complete(json!({"open": [22]}), 3_000).unwrap();
    assert_eq!(done.result(), Some(&json!({"open": [22]})));
    assert!(done.error().is_none());

    let mut failed = pending();
    failed.start(2_000).unwrap();
    failed.fail(JobError::timed_out(Duration::from_secs(1)), 3_000).unwrap();
    assert!(failed.result().is_none());
    assert!(failed.error().is_some_and(JobError::is_timeout));
}
