// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use tempfile::tempdir;

const SAMPLE: &str = r#"
[policies.port_scan]
max_concurrent = 4
timeout_ms = 600000

[policies.search_dork]
min_interval_ms = 5000

[executors.port_scan]
program = "nmap"
args = ["-Pn", "${target}"]

[executors.tech_fingerprint]
program = "whatweb"
args = ["${url}"]
env = { LANG = "C" }
"#;

#[test]
fn missing_file_is_empty_config() {
    let dir = tempdir().unwrap();
    let config = ConfigFile::load(&dir.path().join("nope.toml")).unwrap();
    assert_eq!(config, ConfigFile::default());
    assert_eq!(config.policies().unwrap(), PolicyTable::defaults());
    assert!(config.executors().unwrap().kinds().is_empty());
}

#[test]
fn sample_file_loads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tollgate.toml");
    std::fs::write(&path, SAMPLE).unwrap();

    let config = ConfigFile::load(&path).unwrap();
    let policies = config.policies().unwrap();
    let port = policies.get(JobKind::PortScan);
    assert_eq!(port.max_concurrent, 4);
    assert_eq!(port.timeout, Duration::from_secs(600));
    assert_eq!(port.min_interval, JobKind::PortScan.default_policy().min_interval);
    assert_eq!(policies.get(JobKind::SearchDork).min_interval, Duration::from_secs(5));

    let executors = config.executors().unwrap();
    assert_eq!(executors.kinds(), vec![JobKind::PortScan, JobKind::TechFingerprint]);
    assert_eq!(config.executors["tech_fingerprint"].env["LANG"], "C");
}

#[test]
fn syntax_error_names_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tollgate.toml");
    std::fs::write(&path, "[policies.port_scan\n").unwrap();

    let err = ConfigFile::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(ref p, _) if *p == path), "{err:?}");
}

#[test]
fn unknown_top_level_key_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tollgate.toml");
    std::fs::write(&path, "[scheduler]\nthreads = 4\n").unwrap();
    assert!(matches!(ConfigFile::load(&path), Err(ConfigError::Parse(..))));
}

#[yare::parameterized(
    zero_concurrency = { "[policies.port_scan]\nmax_concurrent = 0\n" },
    zero_timeout     = { "[policies.port_scan]\ntimeout_ms = 0\n" },
    unknown_kind     = { "[policies.ddos]\nmax_concurrent = 1\n" },
)]
fn invalid_policies_are_rejected(toml_text: &str) {
    let config: ConfigFile = toml::from_str(toml_text).unwrap();
    assert!(matches!(config.policies(), Err(ConfigError::Policy(_))));
}

#[test]
fn executor_for_unknown_kind_is_rejected() {
    let config: ConfigFile = toml::from_str("[executors.ddos]\nprogram = \"hping3\"\n").unwrap();
    let err = config.executors().unwrap_err();
    assert!(matches!(err, ConfigError::UnknownKind(_)), "{err:?}");
}

#[test]
fn executor_needs_a_program() {
    let config: ConfigFile = toml::from_str("[executors.port_scan]\nprogram = \" \"\n").unwrap();
    assert!(matches!(config.executors(), Err(ConfigError::EmptyProgram(JobKind::PortScan))));
}
