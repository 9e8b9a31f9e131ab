//! Passage metadata codec
//!
//! The last segment of a title line is a JSON object carrying editor
//! placement (`position` and `size`, both `"x,y"` strings) plus any
//! extension keys other tools may have written. Extension keys round-trip
//! untouched and in their original order.

use serde_json::Value;

use crate::story::types::{MetaMap, Position, Size};

/// Decode the raw meta segment of a title line.
///
/// An empty segment and JSON `null` decode to an empty mapping. Anything
/// that is not a JSON object is malformed: a warning is logged and the
/// mapping comes back empty, but the passage itself still parses.
pub fn decode_meta(raw: &str) -> MetaMap {
    if raw.is_empty() {
        return MetaMap::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(Value::Null) => MetaMap::new(),
        Ok(_) | Err(_) => {
            log::warn!("Invalid passage metadata: {}", raw);
            MetaMap::new()
        }
    }
}

/// Editor position from `meta.position`, `{0,0}` when unset
pub fn meta_position(meta: &MetaMap) -> Position {
    let (x, y) = float_pair(meta.get("position"), (0.0, 0.0));
    Position { x, y }
}

/// Editor footprint from `meta.size`, `{100,100}` when unset
pub fn meta_size(meta: &MetaMap) -> Size {
    let (width, height) = float_pair(meta.get("size"), (100.0, 100.0));
    Size { width, height }
}

/// Stamp the current position and size into the mapping and serialize the
/// whole blob to compact JSON, extension keys included, in preserved key
/// order. Existing `position`/`size` keys are updated in place.
pub fn encode_meta(
    meta: &mut MetaMap,
    position: Position,
    size: Size,
) -> Result<String, serde_json::Error> {
    let position = format!("{},{}", round_half_up(position.x), round_half_up(position.y));
    let size = format!("{},{}", size.width, size.height);
    meta.insert("position".to_string(), Value::String(position));
    meta.insert("size".to_string(), Value::String(size));
    serde_json::to_string(meta)
}

// Halves round toward positive infinity, the convention the persisted
// format uses for positions (-2.5 becomes -2).
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

// Two comma-separated floats out of a string-valued key. Each component
// falls back to its default on its own; a non-string value means the
// whole pair is the default.
fn float_pair(value: Option<&Value>, default: (f64, f64)) -> (f64, f64) {
    let Some(raw) = value.and_then(Value::as_str) else {
        return default;
    };
    let mut parts = raw.split(',');
    let x = parts
        .next()
        .and_then(|part| part.trim().parse().ok())
        .unwrap_or(default.0);
    let y = parts
        .next()
        .and_then(|part| part.trim().parse().ok())
        .unwrap_or(default.1);
    (x, y)
}
