//! Read, write, and delete values inside a transaction document.
//!
//! The document is a `serde_json::Value` owned by the caller. `set` and
//! `remove` never touch their input; they return a deep copy with the change
//! applied. None of the three operations can fail:
//!
//! - `get` returns `None` as soon as a segment does not resolve.
//! - `set` creates missing containers and replaces wrongly-shaped ones. A path
//!   whose index reaches `MAX_INDEX` leaves the copy unchanged.
//! - `remove` on a path that does not resolve returns an unmodified copy.

use serde_json::{Map, Value};
use tracing::debug;

use crate::path::{FieldPath, Segment};

/// Largest sequence index `set` will pad up to, exclusive.
pub const MAX_INDEX: usize = 1 << 20;

/// Resolve `path` against `record`.
///
/// A present JSON `null` is returned as `Some(Value::Null)`; only a missing
/// key, an out-of-range index, or a shape mismatch yields `None`.
pub fn get<'v>(record: &'v Value, path: &str) -> Option<&'v Value> {
    let path = FieldPath::parse(path);
    let mut current = record;
    for segment in path.segments() {
        current = match segment {
            Segment::Key(key) => current.as_object()?.get(key)?,
            Segment::Index { key, index } => {
                current.as_object()?.get(key)?.as_array()?.get(*index)?
            }
        };
    }
    Some(current)
}

/// Return a copy of `record` with `value` installed at `path`.
///
/// Missing intermediate mappings are created empty. Sequences are padded up
/// to the requested index: with empty mappings when the path continues below
/// the indexed element, with `null` when the index is the final segment.
/// An existing value of the wrong shape is replaced by a fresh container.
///
/// Any index at or above `MAX_INDEX` makes the whole write a no-op.
pub fn set(record: &Value, path: &str, value: Value) -> Value {
    let parsed = FieldPath::parse(path);
    let oversized = parsed.segments().iter().find_map(|segment| match segment {
        Segment::Index { index, .. } if *index >= MAX_INDEX => Some(*index),
        _ => None,
    });
    if let Some(index) = oversized {
        debug!(path = %path, index, max = MAX_INDEX, "index too large, write skipped");
        return record.clone();
    }
    let path = parsed;
    let mut out = record.clone();
    set_in(&mut out, path.segments(), value);
    out
}

/// Return a copy of `record` with the field at `path` deleted.
///
/// An indexed final segment removes that element, shifting later elements
/// down. If any segment fails to resolve the copy is returned unchanged.
pub fn remove(record: &Value, path: &str) -> Value {
    let path = FieldPath::parse(path);
    let mut out = record.clone();
    remove_in(&mut out, path.segments());
    out
}

fn set_in(target: &mut Value, segments: &[Segment], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *target = value;
        return;
    };

    let map = ensure_object(target);
    match first {
        Segment::Key(key) => {
            if rest.is_empty() {
                map.insert(key.clone(), value);
            } else {
                let child = map
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                set_in(child, rest, value);
            }
        }
        Segment::Index { key, index } => {
            let slot = map.entry(key.clone()).or_insert_with(|| Value::Array(Vec::new()));
            let items = ensure_array(slot);
            let filler = if rest.is_empty() {
                Value::Null
            } else {
                Value::Object(Map::new())
            };
            if items.len() <= *index {
                items.resize(*index + 1, filler);
            }
            if rest.is_empty() {
                items[*index] = value;
            } else {
                set_in(&mut items[*index], rest, value);
            }
        }
    }
}

fn remove_in(target: &mut Value, segments: &[Segment]) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };
    let Some(map) = target.as_object_mut() else {
        return;
    };

    match first {
        Segment::Key(key) => {
            if rest.is_empty() {
                map.remove(key);
            } else if let Some(child) = map.get_mut(key) {
                remove_in(child, rest);
            }
        }
        Segment::Index { key, index } => {
            let Some(items) = map.get_mut(key).and_then(Value::as_array_mut) else {
                return;
            };
            if *index >= items.len() {
                return;
            }
            if rest.is_empty() {
                items.remove(*index);
            } else {
                remove_in(&mut items[*index], rest);
            }
        }
    }
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        if !value.is_null() {
            debug!(found = %kind(value), "replacing non-mapping value on write path");
        }
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        // Assigned above.
        _ => unreachable!(),
    }
}

fn ensure_array(value: &mut Value) -> &mut Vec<Value> {
    if !value.is_array() {
        debug!(found = %kind(value), "replacing non-sequence value on indexed write path");
        *value = Value::Array(Vec::new());
    }
    match value {
        Value::Array(items) => items,
        _ => unreachable!(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
