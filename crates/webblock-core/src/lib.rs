//! Core types for webblock.
//!
//! Attribute schemas and their coercion into typed [`PropValue`]s, the
//! per-instance property store and observer registry, the retained node
//! tree components render into, and the host element interface.

pub mod coerce;
pub mod error;
pub mod host;
pub mod node;
pub mod observer;
pub mod props;
pub mod schema;
pub mod value;

pub use coerce::{coerce, parse_float};
pub use error::{CoercionError, UnknownProperty};
pub use host::{HostElement, HostEvent};
pub use node::{html_escape_string, ElementNode, Node, Rendered, ShadowRoot, SlotId, Style};
pub use observer::{Observer, ObserverRegistry};
pub use props::PropertyStore;
pub use schema::{
    normalize, AttributeRule, AttributeSchema, Converter, Descriptor, RuleKind, RuleSet,
    SchemaEntry, TypeTag,
};
pub use value::PropValue;
