//! Per-property change subscriptions.
//!
//! Handlers run synchronously, in subscription order, after the store holds
//! the new value. Nothing is deduplicated: subscribing the same handler twice
//! makes it run twice until it is unsubscribed once.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::UnknownProperty;
use crate::value::PropValue;

/// Signature of a change handler: `(new, old, property name)`.
pub type ObserverFn = dyn Fn(&PropValue, &PropValue, &str);

/// A change handler. Two handlers are equal when they share the same
/// allocation, so keep a clone around to unsubscribe later.
#[derive(Clone)]
pub struct Observer(Rc<ObserverFn>);

impl Observer {
    pub fn new<F: Fn(&PropValue, &PropValue, &str) + 'static>(f: F) -> Self {
        Self(Rc::new(f))
    }

    pub fn notify(&self, new: &PropValue, old: &PropValue, name: &str) {
        (self.0)(new, old, name)
    }
}

impl PartialEq for Observer {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Observer(...)")
    }
}

/// Observer lists keyed by property name.
#[derive(Debug, Default)]
pub struct ObserverRegistry {
    lists: HashMap<String, Vec<Observer>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an (empty) observer list for a property.
    pub fn declare(&mut self, name: &str) {
        self.lists.entry(name.to_string()).or_default();
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.lists.contains_key(name)
    }

    /// Appends `observer` to `name`'s list.
    ///
    /// # Errors
    ///
    /// Fails when the property was never declared.
    pub fn observe(&mut self, name: &str, observer: Observer) -> Result<(), UnknownProperty> {
        let list = self
            .lists
            .get_mut(name)
            .ok_or_else(|| UnknownProperty(name.to_string()))?;
        list.push(observer);
        Ok(())
    }

    /// Removes the first occurrence of `observer`. Returns whether one was
    /// removed; a missing observer or property is not an error.
    pub fn unobserve(&mut self, name: &str, observer: &Observer) -> bool {
        let Some(list) = self.lists.get_mut(name) else {
            return false;
        };
        match list.iter().position(|o| o == observer) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        }
    }

    /// A snapshot of the observers of `name`, so handlers can subscribe or
    /// unsubscribe while being notified.
    pub fn observers(&self, name: &str) -> Vec<Observer> {
        self.lists.get(name).cloned().unwrap_or_default()
    }

    pub fn count(&self, name: &str) -> usize {
        self.lists.get(name).map_or(0, Vec::len)
    }
}
