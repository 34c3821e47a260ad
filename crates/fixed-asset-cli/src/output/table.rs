use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{plain, result_rows, scalar_fields};

/// Format output as tables: scalar result fields first, then one row per
/// line, then warnings and methodology.
pub fn print_table(value: &Value) {
    let result = value.get("result").unwrap_or(value);

    if let Value::Object(map) = result {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in scalar_fields(result) {
            builder.push_record([key, val]);
        }
        println!("{}", Table::from(builder));

        if let Some(Value::Array(summaries)) = map.get("summaries") {
            println!();
            print_rows(summaries);
        }
    } else {
        println!("{}", plain(result));
    }

    if let Some(rows) = result_rows(value) {
        println!();
        print_rows(rows);
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("(no lines)");
        return;
    };
    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(plain).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }
    }
    println!("{}", Table::from(builder));
}
