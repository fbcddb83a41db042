//! Decoding of `application/x-www-form-urlencoded` data into a structured map.
//!
//! Keys follow the bracket convention used by web forms:
//!
//! - `a=1&b=2` gives `{"a": "1", "b": "2"}`;
//! - a repeated plain key keeps its last value: `a=1&a=2` gives `{"a": "2"}`;
//! - `a[]=1&a[]=2` builds a sequence: `{"a": ["1", "2"]}`;
//! - `a[x]=1&a[y][z]=2` builds nested maps: `{"a": {"x": "1", "y": {"z": "2"}}}`.
//!
//! Values are always strings; a key without `=` gets an empty string.
use serde_json::{Map, Value};

/// A map of decoded parameters, in the order they were first seen.
pub type ParamMap = Map<String, Value>;

/// Decode url-encoded `input` into a [`ParamMap`].
///
/// Keys nested more deeply than `max_depth` brackets are kept verbatim.
/// Decoding never fails: invalid percent-encoded sequences are kept as they are and
/// invalid UTF-8 is replaced with `U+FFFD`.
pub fn decode(input: &[u8], max_depth: usize) -> ParamMap {
    let mut params = ParamMap::new();
    for (key, value) in form_urlencoded::parse(input) {
        insert(&mut params, &key, value.into_owned(), max_depth);
    }
    params
}

/// Insert `value` under `key`, expanding its brackets into nested containers.
pub(crate) fn insert(params: &mut ParamMap, key: &str, value: String, max_depth: usize) {
    match split_key(key).filter(|(_, segments)| segments.len() <= max_depth) {
        Some((base, segments)) => {
            let slot = params.entry(base).or_insert(Value::Null);
            assign(slot, &segments, value);
        }
        None => {
            params.insert(key.to_owned(), Value::String(value));
        }
    }
}

/// Split `base[a][b][]` into `("base", ["a", "b", ""])`.
///
/// Returns `None` if the key has no base name or if its brackets are unbalanced:
/// such keys are not nested.
fn split_key(key: &str) -> Option<(&str, Vec<&str>)> {
    let open = key.find('[')?;
    let base = &key[..open];
    if base.is_empty() {
        return None;
    }
    let mut segments = Vec::new();
    let mut rest = &key[open..];
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        segments.push(&inner[..close]);
        rest = &inner[close + 1..];
    }
    Some((base, segments))
}

fn assign(slot: &mut Value, path: &[&str], value: String) {
    let Some((segment, rest)) = path.split_first() else {
        *slot = Value::String(value);
        return;
    };

    if segment.is_empty() {
        let mut child = Value::Null;
        assign(&mut child, rest, value);
        match slot {
            Value::Array(items) => items.push(child),
            Value::Object(map) => {
                map.insert(next_index(map).to_string(), child);
            }
            scalar => *scalar = Value::Array(vec![child]),
        }
        return;
    }

    if let Value::Array(items) = slot {
        // A named key on a sequence turns it into a map indexed by position.
        let map = std::mem::take(items)
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect();
        *slot = Value::Object(map);
    } else if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(map) = slot {
        let child = map.entry(*segment).or_insert(Value::Null);
        assign(child, rest, value);
    }
}

/// One past the largest integer key, or `0` if there is none.
fn next_index(map: &Map<String, Value>) -> u64 {
    map.keys()
        .filter_map(|key| key.parse::<u64>().ok().filter(|index| index.to_string() == *key))
        .max()
        .map_or(0, |index| index.saturating_add(1))
}
