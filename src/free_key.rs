use crate::record::LogRecord;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Anything that can answer "is this field name taken?".
pub trait KeySet {
    fn contains_key(&self, key: &str) -> bool;
}

impl<V> KeySet for BTreeMap<String, V> {
    fn contains_key(&self, key: &str) -> bool {
        BTreeMap::contains_key(self, key)
    }
}

impl<V, S: BuildHasher> KeySet for HashMap<String, V, S> {
    fn contains_key(&self, key: &str) -> bool {
        HashMap::contains_key(self, key)
    }
}

impl KeySet for serde_json::Map<String, serde_json::Value> {
    fn contains_key(&self, key: &str) -> bool {
        serde_json::Map::contains_key(self, key)
    }
}

impl KeySet for LogRecord {
    fn contains_key(&self, key: &str) -> bool {
        LogRecord::contains_key(self, key)
    }
}

/// Return `key` if it is unused in `map`, otherwise the first of `key0`,
/// `key1`, ... that is.
///
/// ```
/// use std::collections::BTreeMap;
/// use env_log_layer::free_key::free_key;
///
/// let mut map = BTreeMap::new();
/// assert_eq!(free_key(&map, "foo"), "foo");
/// map.insert("foo".to_string(), 1);
/// assert_eq!(free_key(&map, "foo"), "foo0");
/// map.insert("foo0".to_string(), 2);
/// assert_eq!(free_key(&map, "foo"), "foo1");
/// ```
///
/// The scan always starts at suffix `0`: with only `foo` and `foo5` taken
/// the result is `foo0`, not `foo6`.
pub fn free_key<'k, M: KeySet + ?Sized>(map: &M, key: &'k str) -> Cow<'k, str> {
    if !map.contains_key(key) {
        return Cow::Borrowed(key);
    }
    let mut idx: u64 = 0;
    loop {
        let candidate = format!("{key}{idx}");
        if !map.contains_key(&candidate) {
            return Cow::Owned(candidate);
        }
        idx += 1;
    }
}
