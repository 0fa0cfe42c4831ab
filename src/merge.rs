//! Partial-update merge: overwrite keys that already exist, never insert new ones

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Minimal view of a key-value document needed by [apply_where_present]
pub trait KeyValueMap<V> {
    fn contains(&self, key: &str) -> bool;
    fn replace(&mut self, key: &str, value: V);
}

impl KeyValueMap<Value> for Map<String, Value> {
    fn contains(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn replace(&mut self, key: &str, value: Value) {
        if let Some(slot) = self.get_mut(key) {
            *slot = value;
        }
    }
}

impl<K, V> KeyValueMap<V> for BTreeMap<K, V>
where
    K: Ord + std::borrow::Borrow<str>,
{
    fn contains(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn replace(&mut self, key: &str, value: V) {
        if let Some(slot) = self.get_mut(key) {
            *slot = value;
        }
    }
}

impl<K, V> KeyValueMap<V> for HashMap<K, V>
where
    K: Eq + Hash + std::borrow::Borrow<str>,
{
    fn contains(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn replace(&mut self, key: &str, value: V) {
        if let Some(slot) = self.get_mut(key) {
            *slot = value;
        }
    }
}

/// Applies each `(key, value)` of the patch to the document when the key is already present.
/// Returns the keys that were overwritten, in patch order.
pub fn apply_where_present<M, V, I, K>(document: &mut M, patch: I) -> Vec<String>
where
    M: KeyValueMap<V> + ?Sized,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
{
    let mut updated = vec![];
    for (key, value) in patch {
        let key = key.as_ref();
        if document.contains(key) {
            document.replace(key, value);
            updated.push(key.to_owned());
        }
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_existing_keys_are_replaced() {
        let mut doc = json!({"a": 1, "b": "x", "c": null});
        let map = doc.as_object_mut().unwrap();
        let updated = apply_where_present(
            map,
            vec![("a", json!(2)), ("d", json!(4)), ("c", json!("set"))],
        );
        assert_eq!(updated, vec!["a", "c"]);
        assert_eq!(doc, json!({"a": 2, "b": "x", "c": "set"}));
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut map: BTreeMap<String, i32> = BTreeMap::new();
        map.insert("k".into(), 1);
        let updated = apply_where_present(&mut map, Vec::<(&str, i32)>::new());
        assert!(updated.is_empty());
        assert_eq!(map.get("k"), Some(&1));
    }

    #[test]
    fn never_inserts() {
        let mut map: HashMap<String, &str> = HashMap::new();
        let updated = apply_where_present(&mut map, [("missing", "value")]);
        assert!(updated.is_empty());
        assert!(map.is_empty());
    }

    #[test]
    fn preserves_document_order() {
        let mut map: Map<String, Value> =
            serde_json::from_str(r#"{"z": 0, "m": 0, "a": 0}"#).unwrap();
        apply_where_present(&mut map, [("m", json!(1))]);
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "m", "a"]);
    }
}
