pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `result` object of a computation envelope, or the value itself.
pub(crate) fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// Scalar fields of `map` with nested objects joined by dots
/// (`charges.total_charges`). Arrays of records are left out; see
/// [`record_lists`].
pub(crate) fn flatten(map: &Map<String, Value>) -> Vec<(String, String)> {
    let mut out = Vec::new();
    flatten_into("", map, &mut out);
    out
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, out: &mut Vec<(String, String)>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => flatten_into(&name, inner, out),
            Value::Array(items) if is_record_list(items) => {}
            other => out.push((name, format_scalar(other))),
        }
    }
}

/// Arrays of objects directly under `map` (projection days, invoices, quotes).
pub(crate) fn record_lists(map: &Map<String, Value>) -> Vec<(&str, &[Value])> {
    map.iter()
        .filter_map(|(key, val)| match val {
            Value::Array(items) if is_record_list(items) => Some((key.as_str(), items.as_slice())),
            _ => None,
        })
        .collect()
}

fn is_record_list(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(Value::is_object)
}

pub(crate) fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(format_scalar).collect::<Vec<_>>().join("; "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_and_skips_records() {
        let value = json!({
            "payment_type": "Tardío",
            "charges": { "total_charges": "714.70" },
            "warnings": ["a", "b"],
            "projection": [{ "day": 1 }, { "day": 2 }]
        });
        let flat = flatten(value.as_object().unwrap());
        assert!(flat.contains(&("charges.total_charges".to_string(), "714.70".to_string())));
        assert!(flat.contains(&("warnings".to_string(), "a; b".to_string())));
        assert!(flat.iter().all(|(k, _)| k != "projection"));

        let lists = record_lists(value.as_object().unwrap());
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].0, "projection");
        assert_eq!(lists[0].1.len(), 2);
    }

    #[test]
    fn test_result_of_envelope() {
        let value = json!({ "result": { "x": 1 }, "methodology": "m" });
        assert_eq!(result_of(&value), &json!({ "x": 1 }));
        assert_eq!(result_of(&json!(3)), &json!(3));
    }
}
