//! Field-level diffs for audit entries

use serde_json::Value;

const MAX_STRING: usize = 40;

/// Describe what changed between two serialized entities
///
/// Nested objects are walked with dotted paths (`color`, `splits`, ...).
/// Arrays are summarized by length unless only their contents changed.
/// Returns `None` when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let mut changes = Vec::new();
    collect_changes(before, after, "", &mut changes);

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn collect_changes(before: &Value, after: &Value, path: &str, changes: &mut Vec<String>) {
    if before == after {
        return;
    }

    match (before, after) {
        (Value::Object(old), Value::Object(new)) => {
            for (key, old_value) in old {
                let field = join_path(path, key);
                match new.get(key) {
                    Some(new_value) => collect_changes(old_value, new_value, &field, changes),
                    None => changes.push(format!("{}: {} -> (removed)", field, summarize(old_value))),
                }
            }
            for (key, new_value) in new {
                if !old.contains_key(key) {
                    changes.push(format!(
                        "{}: (added) -> {}",
                        join_path(path, key),
                        summarize(new_value)
                    ));
                }
            }
        }
        (Value::Array(old), Value::Array(new)) if old.len() != new.len() => {
            changes.push(format!(
                "{}: [{} items] -> [{} items]",
                path,
                old.len(),
                new.len()
            ));
        }
        (Value::Array(_), Value::Array(_)) => {
            changes.push(format!("{}: (contents changed)", path));
        }
        _ => {
            let label = if path.is_empty() { "value" } else { path };
            changes.push(format!("{}: {} -> {}", label, summarize(before), summarize(after)));
        }
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn summarize(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > MAX_STRING => {
            let head: String = s.chars().take(MAX_STRING - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
        other => other.to_string(),
    }
}
