use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Looks for well-known fields in order of priority, in the result object
/// and then its `summary`, falling back to the first field.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "total_dividend_amount",
        "progress_percent",
        "maturity_date",
        "amount",
    ];

    let scopes = [Some(result_obj), result_obj.get("summary")];
    for scope in scopes.into_iter().flatten() {
        if let Value::Object(map) = scope {
            for key in &priority_keys {
                if let Some(val) = map.get(*key) {
                    if !val.is_null() {
                        return format_minimal(val);
                    }
                }
            }
        }
    }

    // Schedules and calendars: one line per entry
    if let Value::Array(arr) = result_obj {
        return arr
            .iter()
            .map(|item| match (item.get("date"), item.get("amount")) {
                (Some(date), Some(amount)) => {
                    format!("{} {}", format_minimal(date), format_minimal(amount))
                }
                _ => format_minimal(item),
            })
            .collect::<Vec<_>>()
            .join("\n");
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    format_minimal(result_obj)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
