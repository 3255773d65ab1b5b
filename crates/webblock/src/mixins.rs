//! Ready-made mixins and element-reference helpers.

use webblock_core::{HostEvent, Observer, PropValue};

use crate::description::Mixin;
use crate::element::{Element, WeakElement};
use crate::error::ComponentError;

/// Detail of the event fired by the [`action`] mixin.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDetail {
    pub action_type: PropValue,
    pub data: PropValue,
}

/// Adds an `action(type, data)` method that dispatches a bubbling,
/// cancelable `action` event whose detail is an [`ActionDetail`].
pub fn action() -> Mixin {
    Mixin::new().method("action", |element, args| {
        let detail = ActionDetail {
            action_type: args.first().cloned().unwrap_or_default(),
            data: args.get(1).cloned().unwrap_or_default(),
        };
        element.dispatch_event(
            HostEvent::new("action", PropValue::opaque(detail))
                .bubbling()
                .cancelable(),
        );
        Ok(PropValue::Null)
    })
}

/// A ref callback that writes `value` to property `name` of the referenced
/// element.
pub fn set_property_on_ref(
    name: impl Into<String>,
    value: impl Into<PropValue>,
) -> impl Fn(&Element) -> Result<bool, ComponentError> {
    let name = name.into();
    let value = value.into();
    move |target| target.set(&name, value.clone())
}

/// A ref callback that registers `observer` for property `name` of the
/// referenced element.
pub fn observe_property_on_ref(
    name: impl Into<String>,
    observer: Observer,
) -> impl Fn(&Element) -> Result<(), ComponentError> {
    let name = name.into();
    move |target| target.observe(&name, observer.clone())
}

/// A ref callback that stores the referenced element in property `name` of
/// `owner`. The stored value is a [`WeakElement`].
pub fn set_property_to_ref(
    owner: &Element,
    name: impl Into<String>,
) -> impl Fn(&Element) -> Result<bool, ComponentError> {
    let owner = owner.downgrade();
    let name = name.into();
    move |target| match owner.upgrade() {
        Some(owner) => owner.set(&name, PropValue::opaque(target.downgrade())),
        None => Ok(false),
    }
}

/// Reads an element reference stored by [`set_property_to_ref`].
pub fn element_ref(value: &PropValue) -> Option<Element> {
    value.downcast_ref::<WeakElement>().and_then(WeakElement::upgrade)
}
