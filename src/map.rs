//! Ordered map type for object values.
//!
//! [`ValueMap`] wraps [`IndexMap`] so object members keep the order in
//! which they were declared or parsed. Records follow their schema's field
//! order, and that order must survive a parse/serialize round trip.
//!
//! ## Examples
//!
//! ```rust
//! use internet_object::{ValueMap, Value};
//!
//! let mut map = ValueMap::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use indexmap::IndexMap;

/// An insertion-ordered map of string keys to values.
///
/// # Examples
///
/// ```rust
/// use internet_object::{ValueMap, Value};
///
/// let mut map = ValueMap::new();
/// map.insert("first".to_string(), Value::from(1));
/// map.insert("second".to_string(), Value::from(2));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValueMap(IndexMap<String, crate::Value>);

impl ValueMap {
    #[must_use]
    pub fn new() -> Self {
        ValueMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ValueMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// An existing key keeps its position; the old value is returned.
    pub fn insert(&mut self, key: String, value: crate::Value) -> Option<crate::Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&crate::Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, crate::Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, crate::Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, crate::Value> {
        self.0.iter()
    }
}

impl Default for ValueMap {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoIterator for ValueMap {
    type Item = (String, crate::Value);
    type IntoIter = indexmap::map::IntoIter<String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, crate::Value)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (String, crate::Value)>>(iter: T) -> Self {
        ValueMap(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_collect_keeps_order() {
        let map: ValueMap = ["zeta", "alpha", "mid"]
            .iter()
            .enumerate()
            .map(|(i, key)| (key.to_string(), Value::from(i as i64)))
            .collect();

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);

        let mut map = map;
        assert_eq!(map.insert("zeta".to_string(), Value::Null), Some(Value::from(0)));
        assert_eq!(map.keys().next().map(String::as_str), Some("zeta"));
    }
}
