//! Webblock - declarative custom elements.
//!
//! Describe an element kind once: its typed attributes, a render function,
//! optional style, lifecycle hooks and public members. Webblock turns the
//! description into a definition whose instances keep attributes and
//! properties in sync, notify observers and re-render through a pluggable
//! strategy.
//!
//! # Quick Start
//!
//! ```ignore
//! use webblock::prelude::*;
//!
//! let mut document = Document::new();
//! document.define(
//!     ComponentDescription::new("hello-card")
//!         .attributes(attributes! {
//!             name: { type: String, default: "world" },
//!         })
//!         .render(|_el, props| {
//!             let name = props.get("name").and_then(PropValue::as_text).unwrap_or_default();
//!             format!("<p>Hello, {name}!</p>").into()
//!         })
//!         .style("p { color: teal }"),
//! )?;
//!
//! let card = document.create_element("hello-card")?;
//! document.append(&card)?;
//! assert_eq!(card.inner_html(), "<p>Hello, world!</p><style>p { color: teal }</style>");
//!
//! card.set("name", "webblock")?;
//! ```
//!
//! # Renderers
//!
//! | Kind | Behavior |
//! |------|----------|
//! | [`RendererKind::Immediate`] | Clears the shadow root and inserts a fresh render each time |
//! | [`RendererKind::DiffPatch`] | Keeps the last tree and patches it in place |
//! | [`RendererKind::WrappedComponent`] | Hands the render function to a component library |
//!
//! Pick one per description with [`ComponentDescription::renderer`], or for
//! a whole document with [`Factory::default_renderer`].

// Lets `attributes!` expand to `::webblock::...` paths inside this crate.
extern crate self as webblock;

pub mod description;
pub mod document;
pub mod element;
pub mod error;
pub mod factory;
pub mod mixins;

pub use webblock_core as core;
pub use webblock_renderer as renderer;

pub use description::{ComponentDescription, Hooks, Member, Mixin, RendererChoice, RESERVED_NAMES};
pub use document::{init_tracing, DispatchedEvent, Document, ElementBuilder};
pub use element::{Element, WeakElement};
pub use error::{ComponentError, DefinitionError};
pub use factory::{define, Definition, Factory, HostRegistry};
pub use webblock_renderer::{Renderer, RendererKind};

#[cfg(feature = "macros")]
pub use webblock_macros::attributes;

/// Attribute schema for webblock elements.
pub type Schema = webblock_core::AttributeSchema<Element>;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::description::{ComponentDescription, Member, Mixin};
    pub use crate::document::{Document, ElementBuilder};
    pub use crate::element::{Element, WeakElement};
    pub use crate::error::{ComponentError, DefinitionError};
    pub use crate::factory::{define, Factory, HostRegistry};
    pub use crate::mixins;
    pub use crate::Schema;

    pub use webblock_core::{
        Descriptor, HostEvent, Node, Observer, PropValue, PropertyStore, Rendered, SchemaEntry,
        Style, TypeTag,
    };
    pub use webblock_renderer::{ComponentLibrary, Renderer, RendererKind, VirtualDom};

    #[cfg(feature = "macros")]
    pub use webblock_macros::attributes;
}
