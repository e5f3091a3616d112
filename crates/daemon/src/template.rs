// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `${field}` substitution from a job payload into command arguments

use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Regex pattern for ${field_name}
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("constant regex pattern is valid")
});

/// Top-level scalar fields of a payload, rendered as strings.
///
/// Nulls, arrays and nested objects are skipped. A non-object payload
/// yields no variables.
pub fn payload_vars(payload: &Value) -> HashMap<String, String> {
    let Some(fields) = payload.as_object() else {
        return HashMap::new();
    };
    fields
        .iter()
        .filter_map(|(name, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((name.clone(), rendered))
        })
        .collect()
}

/// Interpolate `${name}` placeholders with values from the vars map.
///
/// Unknown placeholders are left as-is. Values are substituted verbatim:
/// each argument goes to the program directly, never through a shell.
pub fn interpolate(template: &str, vars: &HashMap<String, String>) -> String {
    VAR_PATTERN
        .replace_all(template, |caps: &regex::Captures| match vars.get(&caps[1]) {
            Some(val) => val.clone(),
            None => caps[0].to_string(),
        })
        .to_string()
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
