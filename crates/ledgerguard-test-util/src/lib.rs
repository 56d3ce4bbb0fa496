//! Shared test utilities for the ledgerguard workspace.
//!
//! Golden-file tests in more than one crate compare reports whose ids, timestamps, and
//! durations change on every run; this crate holds the one normalization they share.

use serde_json::Value;

const TIMESTAMP_KEYS: [&str; 2] = ["started_at", "finished_at"];

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// 1. **Root-only**: `tool.version` becomes `"__VERSION__"` only when the root object is a
///    report envelope (`schema`, `tool`, `result`).
/// 2. **Recursive**: timestamps become `"__TIMESTAMP__"`, `duration_ms` becomes `0`, and
///    `execution_id` becomes `"__EXECUTION_ID__"` at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope =
            obj.contains_key("schema") && obj.contains_key("tool") && obj.contains_key("result");
        if is_envelope
            && let Some(tool) = obj.get_mut("tool")
            && let Some(tool_obj) = tool.as_object_mut()
            && tool_obj.contains_key("version")
        {
            tool_obj.insert(
                "version".to_string(),
                Value::String("__VERSION__".to_string()),
            );
        }
    }
    normalize_recursive(&mut value);
    value
}

fn normalize_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in TIMESTAMP_KEYS {
                if map.contains_key(key) {
                    map.insert(key.to_string(), Value::String("__TIMESTAMP__".to_string()));
                }
            }
            if map.contains_key("duration_ms") {
                map.insert("duration_ms".to_string(), Value::Number(0.into()));
            }
            if map.contains_key("execution_id") {
                map.insert(
                    "execution_id".to_string(),
                    Value::String("__EXECUTION_ID__".to_string()),
                );
            }
            for val in map.values_mut() {
                normalize_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_recursive(val);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_envelope_and_nested_run_fields() {
        let input = json!({
            "schema": "ledgerguard.execution.v1",
            "tool": { "name": "ledgerguard", "version": "0.1.0" },
            "result": {
                "execution_id": "5f0c6c1e-7b1a-4b53-9d6e-2f1d2f2c9a10",
                "started_at": "2025-01-01T00:00:00Z",
                "finished_at": "2025-01-01T00:00:01Z",
                "duration_ms": 1042,
                "phases": [
                    { "phase": "INTAKE", "started_at": "2025-01-01T00:00:00Z", "duration_ms": 7 }
                ]
            }
        });

        let result = normalize_nondeterministic(input);

        assert_eq!(result["tool"]["version"], "__VERSION__");
        assert_eq!(result["tool"]["name"], "ledgerguard");
        assert_eq!(result["result"]["execution_id"], "__EXECUTION_ID__");
        assert_eq!(result["result"]["finished_at"], "__TIMESTAMP__");
        assert_eq!(result["result"]["duration_ms"], 0);
        assert_eq!(result["result"]["phases"][0]["started_at"], "__TIMESTAMP__");
        assert_eq!(result["result"]["phases"][0]["duration_ms"], 0);
        assert_eq!(result["result"]["phases"][0]["phase"], "INTAKE");
    }

    #[test]
    fn non_envelope_tool_version_is_untouched() {
        let input = json!({
            "tool": { "name": "exporter", "version": "9.9.9" },
            "ledger": []
        });
        let result = normalize_nondeterministic(input);
        assert_eq!(result["tool"]["version"], "9.9.9");
    }
}
