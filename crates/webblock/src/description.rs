//! The description object an author hands to the factory.
//!
//! Reserved slots (hooks, style, render function, attribute schema, mixins,
//! renderer choice) are struct fields; every other member goes into an open
//! map and is copied through to instances as public behavior.

use std::fmt;
use std::rc::Rc;

use webblock_core::{PropValue, PropertyStore, Rendered, SchemaEntry, Style};
use webblock_renderer::{Renderer, RendererKind};

use crate::element::Element;
use crate::error::ComponentError;
use crate::Schema;

/// Names that address reserved slots and can never be members.
pub const RESERVED_NAMES: [&str; 8] = [
    "created",
    "attribute_changed",
    "attached",
    "detached",
    "style",
    "render",
    "attributes",
    "mixins",
];

/// Builds the rendered output from the instance and its current properties.
pub type RenderFn = Rc<dyn Fn(&Element, &PropertyStore) -> Rendered>;

/// `created(element, constructor arguments)`
pub type CreatedHook = Rc<dyn Fn(&Element, &[PropValue]) -> Result<(), ComponentError>>;

/// `attribute_changed(element, name, old text, new text)`
pub type AttributeChangedHook =
    Rc<dyn Fn(&Element, &str, Option<&str>, Option<&str>) -> Result<(), ComponentError>>;

/// `attached(element)` / `detached(element)`
pub type LifecycleHook = Rc<dyn Fn(&Element) -> Result<(), ComponentError>>;

/// A pass-through method: `(element, arguments) -> result`.
pub type MethodFn = dyn Fn(&Element, &[PropValue]) -> Result<PropValue, ComponentError>;

/// The user's lifecycle hooks.
#[derive(Clone, Default)]
pub struct Hooks {
    pub created: Option<CreatedHook>,
    pub attribute_changed: Option<AttributeChangedHook>,
    pub attached: Option<LifecycleHook>,
    pub detached: Option<LifecycleHook>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("created", &self.created.is_some())
            .field("attribute_changed", &self.attribute_changed.is_some())
            .field("attached", &self.attached.is_some())
            .field("detached", &self.detached.is_some())
            .finish()
    }
}

/// Public behavior copied onto every instance.
#[derive(Clone)]
pub enum Member {
    Method(Rc<MethodFn>),
    Value(PropValue),
}

impl Member {
    pub fn method<F>(f: F) -> Self
    where
        F: Fn(&Element, &[PropValue]) -> Result<PropValue, ComponentError> + 'static,
    {
        Member::Method(Rc::new(f))
    }

    pub fn is_method(&self) -> bool {
        matches!(self, Member::Method(_))
    }

    pub fn as_value(&self) -> Option<&PropValue> {
        match self {
            Member::Value(value) => Some(value),
            Member::Method(_) => None,
        }
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Method(_) => f.write_str("Method(...)"),
            Member::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

/// A named bundle of members, copied after the main description.
#[derive(Debug, Clone, Default)]
pub struct Mixin {
    pub(crate) members: Vec<(String, Member)>,
}

impl Mixin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member(mut self, name: impl Into<String>, member: Member) -> Self {
        self.members.push((name.into(), member));
        self
    }

    pub fn method<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Element, &[PropValue]) -> Result<PropValue, ComponentError> + 'static,
    {
        self.member(name, Member::method(f))
    }

    pub fn value(self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.member(name, Member::Value(value.into()))
    }
}

/// How instances of a definition get their renderer.
#[derive(Clone)]
pub enum RendererChoice {
    Kind(RendererKind),
    /// Builds a strategy per instance, e.g. around a third-party library.
    Custom(Rc<dyn Fn() -> Renderer>),
}

impl RendererChoice {
    pub fn instantiate(&self) -> Renderer {
        match self {
            RendererChoice::Kind(kind) => kind.instantiate(),
            RendererChoice::Custom(make) => make(),
        }
    }
}

impl fmt::Debug for RendererChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RendererChoice::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            RendererChoice::Custom(_) => f.write_str("Custom(...)"),
        }
    }
}

/// The description of a new element kind.
///
/// # Example
///
/// ```ignore
/// let description = ComponentDescription::new("hello-card")
///     .attribute("name", TypeTag::String)
///     .render(|_el, props| {
///         let name = props.get("name").and_then(PropValue::as_text).unwrap_or("world");
///         format!("<p>Hello, {name}!</p>").into()
///     })
///     .style("p { margin: 0 }");
/// ```
pub struct ComponentDescription {
    pub(crate) tag: String,
    pub(crate) attributes: Schema,
    pub(crate) render: Option<RenderFn>,
    pub(crate) style: Option<Style>,
    pub(crate) hooks: Hooks,
    pub(crate) members: Vec<(String, Member)>,
    pub(crate) mixins: Vec<Mixin>,
    pub(crate) renderer: Option<RendererChoice>,
}

impl ComponentDescription {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Schema::new(),
            render: None,
            style: None,
            hooks: Hooks::default(),
            members: Vec::new(),
            mixins: Vec::new(),
            renderer: None,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Replaces the whole attribute schema.
    pub fn attributes(mut self, schema: Schema) -> Self {
        self.attributes = schema;
        self
    }

    /// Declares one attribute.
    pub fn attribute(
        mut self,
        name: impl Into<String>,
        entry: impl Into<SchemaEntry<Element>>,
    ) -> Self {
        self.attributes.insert(name, entry);
        self
    }

    pub fn render<F>(mut self, f: F) -> Self
    where
        F: Fn(&Element, &PropertyStore) -> Rendered + 'static,
    {
        self.render = Some(Rc::new(f));
        self
    }

    pub fn style(mut self, style: impl Into<Style>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn on_created<F>(mut self, f: F) -> Self
    where
        F: Fn(&Element, &[PropValue]) -> Result<(), ComponentError> + 'static,
    {
        self.hooks.created = Some(Rc::new(f));
        self
    }

    pub fn on_attribute_changed<F>(mut self, f: F) -> Self
    where
        F: Fn(&Element, &str, Option<&str>, Option<&str>) -> Result<(), ComponentError> + 'static,
    {
        self.hooks.attribute_changed = Some(Rc::new(f));
        self
    }

    pub fn on_attached<F>(mut self, f: F) -> Self
    where
        F: Fn(&Element) -> Result<(), ComponentError> + 'static,
    {
        self.hooks.attached = Some(Rc::new(f));
        self
    }

    pub fn on_detached<F>(mut self, f: F) -> Self
    where
        F: Fn(&Element) -> Result<(), ComponentError> + 'static,
    {
        self.hooks.detached = Some(Rc::new(f));
        self
    }

    pub fn member(mut self, name: impl Into<String>, member: Member) -> Self {
        self.members.push((name.into(), member));
        self
    }

    pub fn method<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Element, &[PropValue]) -> Result<PropValue, ComponentError> + 'static,
    {
        self.member(name, Member::method(f))
    }

    pub fn value(self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.member(name, Member::Value(value.into()))
    }

    pub fn mixin(mut self, mixin: Mixin) -> Self {
        self.mixins.push(mixin);
        self
    }

    pub fn renderer(mut self, kind: RendererKind) -> Self {
        self.renderer = Some(RendererChoice::Kind(kind));
        self
    }

    pub fn renderer_with<F>(mut self, make: F) -> Self
    where
        F: Fn() -> Renderer + 'static,
    {
        self.renderer = Some(RendererChoice::Custom(Rc::new(make)));
        self
    }
}

impl fmt::Debug for ComponentDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescription")
            .field("tag", &self.tag)
            .field("attributes", &self.attributes.len())
            .field("style", &self.style)
            .field("hooks", &self.hooks)
            .field("members", &self.members)
            .field("mixins", &self.mixins.len())
            .field("renderer", &self.renderer)
            .finish()
    }
}
