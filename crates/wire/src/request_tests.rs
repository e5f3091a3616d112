// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn submit_payload_defaults_to_null() {
    let json = r#"{"type":"Submit","owner":"alice","kind":"port_scan"}"#;
    let decoded: Request = serde_json::from_str(json).expect("deserialize failed");
    assert_eq!(
        decoded,
        Request::Submit { owner: "alice".into(), kind: JobKind::PortScan, payload: Value::Null }
    );
}

#[test]
fn list_filters_are_optional() {
    let decoded: Request = serde_json::from_str(r#"{"type":"List"}"#).unwrap();
    assert_eq!(decoded, Request::List { state: None, kind: None });

    let encoded = serde_json::to_value(Request::List { state: Some(JobState::Running), kind: None })
        .unwrap();
    assert_eq!(encoded, json!({"type": "List", "state": "running"}));
}

#[test]
fn unknown_kind_is_rejected() {
    let json = r#"{"type":"Submit","owner":"alice","kind":"ddos","payload":{}}"#;
    assert!(serde_json::from_str::<Request>(json).is_err());
}

#[yare::parameterized(
    ping     = { r#"{"type":"Ping"}"#, Request::Ping },
    stats    = { r#"{"type":"Stats"}"#, Request::Stats },
    shutdown = { r#"{"type":"Shutdown"}"#, Request::Shutdown },
    status   = { r#"{"type":"Status","id":"job-abc"}"#, Request::Status { id: "job-abc".into() } },
    hello    = { r#"{"type":"Hello","version":"0.1.0"}"#, Request::Hello { version: "0.1.0".into() } },
    by_kind  = {
        r#"{"type":"List","kind":"tech_fingerprint"}"#,
        Request::List { state: None, kind: Some(JobKind::TechFingerprint) }
    },
)]
fn decodes_from_client_json(json: &str, expected: Request) {
    let decoded: Request = serde_json::from_str(json).unwrap();
    assert_eq!(decoded, expected);
}
