//! The property store backing reflected attributes.

use std::collections::BTreeMap;

use crate::error::UnknownProperty;
use crate::value::PropValue;

/// Current typed values, by property name.
///
/// Owned by a single component instance. Writes from the setter path go
/// through [`PropertyStore::replace_if_changed`]; the attribute-changed path
/// writes unconditionally with [`PropertyStore::write`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyStore {
    values: BTreeMap<String, PropValue>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Unconditional write. Returns the previous value, if any.
    pub fn write(&mut self, name: &str, value: PropValue) -> Option<PropValue> {
        self.values.insert(name.to_string(), value)
    }

    /// Writes `value` only when it is not identical to the stored value.
    ///
    /// Returns `Some(old)` for a dirty write and `None` when nothing changed.
    ///
    /// # Errors
    ///
    /// Fails when `name` has no stored value yet.
    pub fn replace_if_changed(
        &mut self,
        name: &str,
        value: PropValue,
    ) -> Result<Option<PropValue>, UnknownProperty> {
        let slot = self
            .values
            .get_mut(name)
            .ok_or_else(|| UnknownProperty(name.to_string()))?;
        if slot.is_identical(&value) {
            return Ok(None);
        }
        Ok(Some(std::mem::replace(slot, value)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, PropValue)> for PropertyStore {
    fn from_iter<I: IntoIterator<Item = (K, PropValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_write_is_not_dirty() {
        let mut store = PropertyStore::new();
        store.write("n", PropValue::from(1));
        assert_eq!(store.replace_if_changed("n", PropValue::from(1)), Ok(None));
        assert_eq!(
            store.replace_if_changed("n", PropValue::from(2)),
            Ok(Some(PropValue::from(1)))
        );
        assert_eq!(store.get("n"), Some(&PropValue::from(2)));
    }

    #[test]
    fn equal_but_distinct_lists_are_dirty() {
        let mut store = PropertyStore::new();
        store.write("l", PropValue::empty_list());
        let dirty = store.replace_if_changed("l", PropValue::empty_list()).unwrap();
        assert!(dirty.is_some());
    }

    #[test]
    fn missing_property_is_rejected() {
        let mut store = PropertyStore::new();
        assert!(store.replace_if_changed("x", PropValue::Null).is_err());
    }
}
