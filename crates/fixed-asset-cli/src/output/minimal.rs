use serde_json::Value;

use super::plain;

/// Print just the key answer: the final accounting value of each schedule,
/// the distributed total, or the first result field.
pub fn print_minimal(value: &Value) {
    let result = value.get("result").unwrap_or(value);

    if let Some(Value::Array(summaries)) = result.get("summaries") {
        for summary in summaries {
            println!(
                "{}: {} lines, {} depreciated",
                plain(&summary["kind"]),
                plain(&summary["line_count"]),
                plain(&summary["total_depreciation"]),
            );
        }
        return;
    }

    let priority_keys = [
        "summary",
        "total_distributed",
        "fiscal_prorata_temporis",
        "economic_prorata_temporis",
    ];
    if let Value::Object(map) = result {
        for key in priority_keys {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}: {}", key, plain(val));
                return;
            }
        }
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, plain(val));
            return;
        }
    }

    println!("{}", plain(result));
}
