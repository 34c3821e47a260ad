use serde_json::Value;
use std::io;

use super::{plain, result_rows, scalar_fields};

/// Write output as CSV to stdout: one row per schedule or analytic line when
/// the result has them, otherwise `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value.get("result").unwrap_or(value);
    if let Some(rows) = result_rows(value) {
        write_rows(&mut wtr, rows);
    } else if result.is_object() {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in scalar_fields(result) {
            let _ = wtr.write_record([key, val]);
        }
    } else {
        let _ = wtr.write_record([&plain(value)]);
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(plain).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&record);
        }
    }
}
