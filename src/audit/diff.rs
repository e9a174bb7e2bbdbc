//! Change summaries for audit entries

use serde_json::Value;

/// Fields that change on every write and carry no information for a reader
const IGNORED_FIELDS: &[&str] = &["updated_at"];

/// Summarize which top-level fields changed between two serialized rows,
/// e.g. `amount: 5000 -> 7500, notes: (added) -> "lunch"`.
///
/// Returns `None` when nothing of interest changed.
pub fn summarize_changes(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(old), Value::Object(new)) = (before, after) else {
        return (before != after).then(|| format!("{} -> {}", render(before), render(after)));
    };

    let mut changes = Vec::new();

    for (key, old_val) in old {
        if IGNORED_FIELDS.contains(&key.as_str()) {
            continue;
        }
        match new.get(key) {
            Some(new_val) if new_val != old_val => {
                changes.push(format!("{}: {} -> {}", key, render(old_val), render(new_val)))
            }
            Some(_) => {}
            None => changes.push(format!("{}: {} -> (removed)", key, render(old_val))),
        }
    }

    for (key, new_val) in new {
        if !old.contains_key(key) && !IGNORED_FIELDS.contains(&key.as_str()) {
            changes.push(format!("{}: (added) -> {}", key, render(new_val)));
        }
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > 40 => {
            let head: String = s.chars().take(37).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
        other => other.to_string(),
    }
}
