use serde_json::{Map, Value};
use std::io;

/// Write output as CSV to stdout.
///
/// A result holding schedules is written as one installment table with a
/// leading `schedule` column; any other object as `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let body = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            if has_object_arrays(body) {
                write_tagged_arrays(&mut wtr, body);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                write_fields(&mut wtr, "", body);
            }
        }
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn has_object_arrays(map: &Map<String, Value>) -> bool {
    map.values().any(|v| match v {
        Value::Array(arr) => arr.iter().any(Value::is_object),
        _ => false,
    })
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, prefix: &str, map: &Map<String, Value>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match val {
            Value::Object(inner) => write_fields(wtr, &name, inner),
            _ => {
                let _ = wtr.write_record([name.as_str(), &format_csv_value(val)]);
            }
        }
    }
}

/// All array-of-object fields as one table, tagged by field name. Headers
/// come from the first row found.
fn write_tagged_arrays<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) {
    let rows: Vec<(&str, &Map<String, Value>)> = map
        .iter()
        .filter_map(|(key, val)| match val {
            Value::Array(arr) => Some((key.as_str(), arr)),
            _ => None,
        })
        .flat_map(|(key, arr)| {
            arr.iter()
                .filter_map(move |item| item.as_object().map(|obj| (key, obj)))
        })
        .collect();

    let Some((_, first)) = rows.first() else {
        return;
    };
    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();

    let mut header_row = vec!["schedule"];
    header_row.extend(headers.iter().copied());
    let _ = wtr.write_record(&header_row);

    for (key, obj) in &rows {
        let mut row = vec![key.to_string()];
        row.extend(
            headers
                .iter()
                .map(|h| obj.get(*h).map(format_csv_value).unwrap_or_default()),
        );
        let _ = wtr.write_record(&row);
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
