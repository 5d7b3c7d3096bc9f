//! Insertion-ordered associative container.
//!
//! Every mapping node in the value tree is one of these. Iteration yields
//! authoring order, re-assigning an existing key keeps its position, and
//! deletion compacts the order without disturbing the survivors.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{is_comment_key, Value};

/// An ordered mapping from string keys to [`Value`] nodes.
///
/// Backed by an [`IndexMap`]: keyed access is O(1) amortized, iteration is
/// O(n) in insertion order, and `delete` compacts the order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedMap {
    entries: IndexMap<String, Value>,
}

impl OrderedMap {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mapping from `(key, value)` pairs, in order.
    pub fn from_entries<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::new();
        for (key, value) in entries {
            map.set(key, value);
        }
        map
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Look up a value by key, mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Insert or replace `key`. Replacing keeps the key's position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Insert `key` only if absent; returns whether it was inserted.
    ///
    /// This is the left-biased merge used when folding an assignment list:
    /// a later duplicate never clobbers an earlier entry.
    pub fn set_if_absent(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, value.into());
        true
    }

    /// Whether `key` is present.
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove `key`, compacting the iteration order.
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Number of entries.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate entries in insertion order with mutable values.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Value)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries that are not `_comment` companions.
    pub fn non_comment_entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.iter().filter(|(k, _)| !is_comment_key(k))
    }

    /// The `_comment` companion entries.
    pub fn comment_entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.iter().filter(|(k, _)| is_comment_key(k))
    }

    /// Positional access, for debugging.
    pub fn get_at(&self, index: usize) -> Option<(&str, &Value)> {
        self.entries
            .get_index(index)
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Positional removal, for debugging. Compacts the order.
    pub fn delete_at(&mut self, index: usize) -> Option<(String, Value)> {
        self.entries.shift_remove_index(index)
    }

    /// The string at `key`, or `""` when absent or not a string.
    pub fn string(&self, key: &str) -> &str {
        match self.get(key) {
            Some(Value::String(s)) => s,
            _ => "",
        }
    }

    /// The integer at `key`, or `0` when absent or not an integer.
    pub fn integer(&self, key: &str) -> i64 {
        match self.get(key) {
            Some(Value::Integer(n)) => *n,
            _ => 0,
        }
    }

    /// The nested mapping at `key`, if present.
    pub fn mapping(&self, key: &str) -> Option<&OrderedMap> {
        self.get(key).and_then(Value::as_mapping)
    }

    /// The nested mapping at `key`, mutably.
    pub fn mapping_mut(&mut self, key: &str) -> Option<&mut OrderedMap> {
        self.get_mut(key).and_then(Value::as_mapping_mut)
    }

    /// The sequence at `key`, if present.
    pub fn sequence(&self, key: &str) -> Option<&[Value]> {
        self.get(key).and_then(Value::as_sequence).map(|v| v.as_slice())
    }

    /// The sequence at `key`, mutably.
    pub fn sequence_mut(&mut self, key: &str) -> Option<&mut Vec<Value>> {
        self.get_mut(key).and_then(Value::as_sequence_mut)
    }

    /// The mapping at `key`, creating (or replacing a mistyped value with)
    /// an empty one. Replacement keeps the key's position.
    pub fn ensure_mapping(&mut self, key: &str) -> &mut OrderedMap {
        if !matches!(self.entries.get(key), Some(Value::Mapping(_))) {
            self.set(key, Value::Mapping(OrderedMap::new()));
        }
        match self.entries.get_mut(key) {
            Some(Value::Mapping(map)) => map,
            _ => unreachable!("just inserted a mapping"),
        }
    }

    /// The sequence at `key`, creating (or replacing a mistyped value with)
    /// an empty one. Replacement keeps the key's position.
    pub fn ensure_sequence(&mut self, key: &str) -> &mut Vec<Value> {
        if !matches!(self.entries.get(key), Some(Value::Sequence(_))) {
            self.set(key, Value::Sequence(Vec::new()));
        }
        match self.entries.get_mut(key) {
            Some(Value::Sequence(seq)) => seq,
            _ => unreachable!("just inserted a sequence"),
        }
    }

    /// The inline-comment label paired with `key`, if any.
    pub fn comment_for(&self, key: &str) -> Option<&str> {
        match self.get(&super::comment_key(key)) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl FromIterator<(String, Value)> for OrderedMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl Serialize for OrderedMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.size()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_order_is_insertion_order() {
        let mut map = OrderedMap::new();
        map.set("c", "1");
        map.set("a", "2");
        map.set("b", "3");
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, ["c", "a", "b"]);
    }

    #[test]
    fn test_reassign_keeps_position() {
        let mut map = OrderedMap::new();
        map.set("a", "1");
        map.set("b", "2");
        map.set("a", "changed");
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(map.string("a"), "changed");
    }

    #[test]
    fn test_delete_compacts_order() {
        let mut map = OrderedMap::new();
        map.set("a", "1");
        map.set("b", "2");
        map.set("c", "3");
        map.delete("b");
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, ["a", "c"]);
        assert_eq!(map.size(), 2);
        assert_eq!(map.get_at(1).map(|(k, _)| k), Some("c"));
    }

    #[test]
    fn test_set_if_absent_is_left_biased() {
        let mut map = OrderedMap::new();
        assert!(map.set_if_absent("a", "first"));
        assert!(!map.set_if_absent("a", "second"));
        assert_eq!(map.string("a"), "first");
    }

    #[test]
    fn test_empty_vs_empty_value() {
        let mut map = OrderedMap::new();
        assert!(map.is_empty());
        map.set("a", "");
        assert!(!map.is_empty());
        assert!(map.has("a"));
        assert_eq!(map.string("a"), "");
    }

    #[test]
    fn test_filtered_iteration() {
        let mut map = OrderedMap::new();
        map.set("AAA", "x");
        map.set("AAA_comment", "label");
        map.set("BBB", "y");
        let plain: Vec<_> = map.non_comment_entries().map(|(k, _)| k).collect();
        let comments: Vec<_> = map.comment_entries().map(|(k, _)| k).collect();
        assert_eq!(plain, ["AAA", "BBB"]);
        assert_eq!(comments, ["AAA_comment"]);
    }

    #[test]
    fn test_positional_access() {
        let mut map = OrderedMap::new();
        map.set("a", "1");
        map.set("b", "2");
        assert_eq!(map.get_at(0).map(|(k, _)| k), Some("a"));
        let removed = map.delete_at(0);
        assert_eq!(removed.map(|(k, _)| k), Some("a".to_string()));
        assert_eq!(map.get_at(0).map(|(k, _)| k), Some("b"));
        assert!(map.get_at(5).is_none());
    }

    #[test]
    fn test_ensure_helpers() {
        let mut map = OrderedMap::new();
        map.ensure_sequence("children").push(Value::from("x"));
        assert_eq!(map.sequence("children").map(|seq| seq.len()), Some(1));
        map.ensure_mapping("settings").set("k", "v");
        assert_eq!(map.mapping("settings").map(|m| m.string("k")), Some("v"));
    }
}
