// velox-core/src/traverse.rs

use std::collections::HashSet;

use crate::observer::Value;

/// Read every observed container reachable from `value` so the running effect
/// depends on all of them, not only on the top-level read.
///
/// Observed graphs can be cyclic; each container is visited at most once.
pub fn traverse(value: &Value) {
    let mut seen = HashSet::new();
    walk(value, &mut seen);
    log::trace!("traverse visited {} observed value(s)", seen.len());
}

fn walk(value: &Value, seen: &mut HashSet<usize>) {
    match value {
        Value::Array(items) => {
            for item in items {
                walk(item, seen);
            }
        }
        Value::Object(map) => {
            for item in map.values() {
                walk(item, seen);
            }
        }
        Value::Observed(observed) => {
            if !seen.insert(observed.id()) {
                return;
            }
            observed.with(|inner| walk(inner, seen));
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}
