pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Row-shaped part of a result: its `lines` array when present.
pub fn result_rows(value: &Value) -> Option<&Vec<Value>> {
    value
        .get("result")
        .unwrap_or(value)
        .get("lines")
        .and_then(Value::as_array)
}

/// Scalar fields of a result as `(field, value)` pairs. Nested objects such
/// as a rescale `summary` or the `retained`/`disposed` assets of a split
/// contribute their own scalars under a dotted key; arrays are left to
/// [`result_rows`].
pub fn scalar_fields(result: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = result else {
        return Vec::new();
    };
    let mut fields = Vec::new();
    for (key, val) in map {
        match val {
            Value::Array(_) => {}
            Value::Object(inner) => {
                for (inner_key, inner_val) in inner {
                    if !inner_val.is_array() && !inner_val.is_object() {
                        fields.push((format!("{key}.{inner_key}"), plain(inner_val)));
                    }
                }
            }
            _ => fields.push((key.clone(), plain(val))),
        }
    }
    fields
}

/// Render a scalar JSON value as plain text.
pub fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_fields_flatten_nested_outputs() {
        let split = json!({
            "retained": { "reference": "FA-1", "gross_value": "7500.00", "fiscal": { "lines": [] } },
            "disposed": { "reference": "FA-2", "gross_value": "2500.00" },
        });
        let fields = scalar_fields(&split);
        assert!(fields.contains(&("retained.gross_value".into(), "7500.00".into())));
        assert!(fields.contains(&("disposed.reference".into(), "FA-2".into())));
        assert!(fields.iter().all(|(k, _)| !k.contains("fiscal")));
    }

    #[test]
    fn test_scalar_fields_keep_top_level_scalars() {
        let rescale = json!({
            "asset": { "reference": "FA-1" },
            "summary": { "rescaled_lines": 7, "skipped_realized_lines": 1 },
            "note": "ok",
        });
        let fields = scalar_fields(&rescale);
        assert!(fields.contains(&("summary.rescaled_lines".into(), "7".into())));
        assert!(fields.contains(&("note".into(), "ok".into())));
    }

    #[test]
    fn test_result_rows_reads_lines() {
        let value = json!({ "result": { "lines": [{ "depreciation": "1000.00" }] } });
        assert_eq!(result_rows(&value).map(Vec::len), Some(1));
    }
}
