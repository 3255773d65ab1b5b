//! The host platform's side of an element.
//!
//! The host owns registration, tree insertion and attribute storage; a
//! component instance only talks to it through [`HostElement`].

use crate::node::Node;
use crate::value::PropValue;

/// An event dispatched from a component to its host.
#[derive(Debug, Clone, PartialEq)]
pub struct HostEvent {
    pub name: String,
    pub bubbles: bool,
    pub cancelable: bool,
    pub detail: PropValue,
}

impl HostEvent {
    /// A non-bubbling, non-cancelable event.
    pub fn new(name: impl Into<String>, detail: PropValue) -> Self {
        Self {
            name: name.into(),
            bubbles: false,
            cancelable: false,
            detail,
        }
    }

    #[must_use]
    pub fn bubbling(mut self) -> Self {
        self.bubbles = true;
        self
    }

    #[must_use]
    pub fn cancelable(mut self) -> Self {
        self.cancelable = true;
        self
    }
}

/// The host element backing one component instance.
pub trait HostElement {
    /// The registered tag name.
    fn tag_name(&self) -> &str;

    /// Current textual value of an attribute.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Stores (or, with `None`, removes) an attribute's text and returns the
    /// previous text. Delivering the change notification is the caller's job.
    fn set_attribute(&mut self, name: &str, value: Option<&str>) -> Option<String>;

    /// Removes and returns the light content present before construction.
    fn take_children(&mut self) -> Vec<Node>;

    /// Removes and returns a property value assigned to the element before
    /// its definition was applied.
    fn take_property(&mut self, name: &str) -> Option<PropValue>;

    fn dispatch_event(&mut self, event: HostEvent);
}
