//! Wire encoding for list fields.
//!
//! The distribution-management API never sends a bare array: every list is
//! wrapped in an object carrying its element count, e.g.
//! `{"Quantity": 2, "Items": ["GET", "HEAD"]}`. [`QuantityList`] keeps the
//! elements only and derives `Quantity` when serializing, so the count can
//! never drift from the items in memory.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

/// A list that travels as a `Quantity`/`Items` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuantityList<T> {
    items: Vec<T>,
}

impl<T> QuantityList<T> {
    /// Wrap the given items
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// A list with no items (`{"Quantity": 0, "Items": []}` on the wire)
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// Number of items, i.e. the wire `Quantity`
    pub fn quantity(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for QuantityList<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Vec<T>> for QuantityList<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T> FromIterator<T> for QuantityList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a QuantityList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Serialize> Serialize for QuantityList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("QuantityList", 2)?;
        state.serialize_field("Quantity", &self.items.len())?;
        state.serialize_field("Items", &self.items)?;
        state.end()
    }
}

/// Shape of the list as received, before the count is checked
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawQuantityList<T> {
    quantity: usize,
    // Empty lists are allowed to omit `Items` entirely.
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for QuantityList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawQuantityList::<T>::deserialize(deserializer)?;

        if raw.quantity != raw.items.len() {
            return Err(de::Error::custom(format!(
                "Quantity {} does not match the {} item(s) present",
                raw.quantity,
                raw.items.len()
            )));
        }

        Ok(Self { items: raw.items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_quantity_envelope() {
        let list = QuantityList::new(vec!["a", "b"]);
        let value = serde_json::to_value(&list).unwrap();

        assert_eq!(value, json!({"Quantity": 2, "Items": ["a", "b"]}));
    }

    #[test]
    fn test_empty_list_may_omit_items() {
        let list: QuantityList<String> = serde_json::from_value(json!({"Quantity": 0})).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_quantity_mismatch_rejected() {
        let result: Result<QuantityList<u16>, _> =
            serde_json::from_value(json!({"Quantity": 3, "Items": [400, 404]}));

        let err = result.unwrap_err().to_string();
        assert!(err.contains("Quantity 3"));
    }
}
