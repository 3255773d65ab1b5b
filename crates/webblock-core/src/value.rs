//! Typed property values.
//!
//! Every declared attribute is reflected as a [`PropValue`]. Primitive
//! variants compare by value; the shared variants (`Structured`, `List`,
//! `Opaque`) are reference types and compare by identity when deciding
//! whether a property write is dirty.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// A typed value held in a component's property store.
#[derive(Clone, Default)]
pub enum PropValue {
    /// No value. Absent attributes coerce to this for most rule kinds.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A floating-point number; may be NaN for malformed numeric text.
    Number(f64),
    /// A string.
    Text(String),
    /// A parsed structured literal (object or array).
    Structured(Rc<serde_json::Value>),
    /// An ordered list of values, typically produced by a converter.
    List(Rc<Vec<PropValue>>),
    /// Any other value, e.g. a reference to another element.
    Opaque(Rc<dyn Any>),
}

impl PropValue {
    /// Builds a list value.
    pub fn list(items: impl IntoIterator<Item = PropValue>) -> Self {
        PropValue::List(Rc::new(items.into_iter().collect()))
    }

    /// An empty list.
    pub fn empty_list() -> Self {
        PropValue::List(Rc::new(Vec::new()))
    }

    /// Wraps an arbitrary value.
    pub fn opaque<T: Any>(value: T) -> Self {
        PropValue::Opaque(Rc::new(value))
    }

    /// Strict identity, as used by the dirty check on property writes.
    ///
    /// Primitives compare by value (`NaN` is never identical to itself),
    /// reference variants compare by pointer.
    pub fn is_identical(&self, other: &PropValue) -> bool {
        match (self, other) {
            (PropValue::Null, PropValue::Null) => true,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Number(a), PropValue::Number(b)) => a == b,
            (PropValue::Text(a), PropValue::Text(b)) => a == b,
            (PropValue::Structured(a), PropValue::Structured(b)) => Rc::ptr_eq(a, b),
            (PropValue::List(a), PropValue::List(b)) => Rc::ptr_eq(a, b),
            (PropValue::Opaque(a), PropValue::Opaque(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[PropValue]> {
        match self {
            PropValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_structured(&self) -> Option<&serde_json::Value> {
        match self {
            PropValue::Structured(v) => Some(v),
            _ => None,
        }
    }

    /// Downcasts an opaque value.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            PropValue::Opaque(v) => v.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Renders the value as attribute-style text. `Null` has no text form.
    pub fn to_text(&self) -> Option<String> {
        match self {
            PropValue::Null => None,
            PropValue::Bool(b) => Some(b.to_string()),
            PropValue::Number(n) => Some(n.to_string()),
            PropValue::Text(s) => Some(s.clone()),
            PropValue::Structured(v) => Some(v.to_string()),
            PropValue::List(items) => Some(
                items
                    .iter()
                    .map(|item| item.to_text().unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            PropValue::Opaque(_) => Some(String::from("[opaque]")),
        }
    }
}

/// Structural equality, for inspecting values. Property writes use
/// [`PropValue::is_identical`] instead.
impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Structured(a), PropValue::Structured(b)) => a == b,
            (PropValue::List(a), PropValue::List(b)) => a == b,
            _ => self.is_identical(other),
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Null => f.write_str("Null"),
            PropValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            PropValue::Number(n) => f.debug_tuple("Number").field(n).finish(),
            PropValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            PropValue::Structured(v) => f.debug_tuple("Structured").field(v).finish(),
            PropValue::List(items) => f.debug_list().entries(items.iter()).finish(),
            PropValue::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(f64::from(value))
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Text(value)
    }
}

impl From<Option<String>> for PropValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(PropValue::Null, PropValue::Text)
    }
}

impl From<Vec<PropValue>> for PropValue {
    fn from(value: Vec<PropValue>) -> Self {
        PropValue::List(Rc::new(value))
    }
}

impl From<serde_json::Value> for PropValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => PropValue::Null,
            serde_json::Value::Bool(b) => PropValue::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(PropValue::Null, PropValue::Number),
            serde_json::Value::String(s) => PropValue::Text(s),
            structured => PropValue::Structured(Rc::new(structured)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_are_identical_by_value() {
        assert!(PropValue::from(0).is_identical(&PropValue::Number(0.0)));
        assert!(PropValue::from("a").is_identical(&PropValue::from("a")));
        assert!(!PropValue::from(true).is_identical(&PropValue::from("true")));
        assert!(PropValue::Null.is_identical(&PropValue::Null));
    }

    #[test]
    fn nan_is_never_identical() {
        let nan = PropValue::Number(f64::NAN);
        assert!(!nan.is_identical(&nan.clone()));
    }

    #[test]
    fn lists_compare_by_reference() {
        let a = PropValue::list([PropValue::from("1")]);
        let b = PropValue::list([PropValue::from("1")]);
        assert!(a.is_identical(&a.clone()));
        assert!(!a.is_identical(&b));
        // Structural equality still holds.
        assert_eq!(a, b);
    }

    #[test]
    fn json_scalars_become_primitives() {
        assert_eq!(PropValue::from(serde_json::json!(3)), PropValue::Number(3.0));
        assert_eq!(PropValue::from(serde_json::json!(null)), PropValue::Null);
        assert!(PropValue::from(serde_json::json!({"a": 1})).as_structured().is_some());
    }

    #[test]
    fn opaque_downcast() {
        let v = PropValue::opaque(7_u8);
        assert_eq!(v.downcast_ref::<u8>(), Some(&7));
        assert!(v.downcast_ref::<u16>().is_none());
    }
}
