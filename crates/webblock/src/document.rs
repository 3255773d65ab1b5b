//! Headless document - an in-memory host for defining, creating, attaching
//! and detaching elements without a browser.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use tracing::{debug, info, warn};
use webblock_core::{HostElement, HostEvent, Node, PropValue};

use crate::description::ComponentDescription;
use crate::element::Element;
use crate::error::{ComponentError, DefinitionError};
use crate::factory::{Definition, Factory, HostRegistry};

/// Installs a `fmt` tracing subscriber. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

/// An event as the document saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchedEvent {
    pub target: String,
    pub event: HostEvent,
}

type EventLog = Rc<RefCell<Vec<DispatchedEvent>>>;

/// Host-side state of one element.
struct HeadlessElement {
    tag: String,
    attributes: BTreeMap<String, String>,
    children: Vec<Node>,
    properties: HashMap<String, PropValue>,
    events: EventLog,
}

impl HostElement for HeadlessElement {
    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, name: &str, value: Option<&str>) -> Option<String> {
        match value {
            Some(value) => self.attributes.insert(name.to_string(), value.to_string()),
            None => self.attributes.remove(name),
        }
    }

    fn take_children(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.children)
    }

    fn take_property(&mut self, name: &str) -> Option<PropValue> {
        self.properties.remove(name)
    }

    fn dispatch_event(&mut self, event: HostEvent) {
        debug!(target_tag = %self.tag, event = %event.name, "event dispatched");
        self.events.borrow_mut().push(DispatchedEvent {
            target: self.tag.clone(),
            event,
        });
    }
}

/// An in-memory document.
#[derive(Default)]
pub struct Document {
    factory: Factory,
    definitions: HashMap<String, Rc<Definition>>,
    body: RefCell<Vec<Element>>,
    events: EventLog,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// A document whose definitions are built by `factory`.
    pub fn with_factory(factory: Factory) -> Self {
        Self {
            factory,
            ..Self::default()
        }
    }

    /// Defines a new element kind in this document.
    ///
    /// # Errors
    ///
    /// See [`Factory::define`].
    pub fn define(
        &mut self,
        description: ComponentDescription,
    ) -> Result<Rc<Definition>, DefinitionError> {
        let factory = self.factory;
        factory.define(description, self)
    }

    pub fn definition(&self, tag: &str) -> Option<&Rc<Definition>> {
        self.definitions.get(tag)
    }

    pub fn is_defined(&self, tag: &str) -> bool {
        self.definitions.contains_key(tag)
    }

    /// Creates a detached element with no attributes or children.
    ///
    /// # Errors
    ///
    /// See [`ElementBuilder::create`].
    pub fn create_element(&self, tag: &str) -> Result<Element, ComponentError> {
        self.build_element(tag).create()
    }

    /// Starts building an element with markup-style initial state.
    pub fn build_element(&self, tag: &str) -> ElementBuilder<'_> {
        ElementBuilder {
            document: self,
            tag: tag.to_string(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            properties: HashMap::new(),
            args: Vec::new(),
        }
    }

    /// Inserts `element` into the body and delivers the attach notification.
    ///
    /// # Errors
    ///
    /// See [`Element::attached_callback`].
    pub fn append(&self, element: &Element) -> Result<(), ComponentError> {
        {
            let mut body = self.body.borrow_mut();
            if !body.iter().any(|e| e.ptr_eq(element)) {
                body.push(element.clone());
            }
        }
        element.attached_callback()
    }

    /// Removes `element` from the body and delivers the detach notification.
    /// Returns `false` when it wasn't in the body.
    ///
    /// # Errors
    ///
    /// See [`Element::detached_callback`].
    pub fn remove(&self, element: &Element) -> Result<bool, ComponentError> {
        let removed = {
            let mut body = self.body.borrow_mut();
            match body.iter().position(|e| e.ptr_eq(element)) {
                Some(index) => {
                    body.remove(index);
                    true
                }
                None => false,
            }
        };
        if !removed {
            warn!(tag = %element.tag_name(), "remove of element not in document");
            return Ok(false);
        }
        element.detached_callback()?;
        Ok(true)
    }

    pub fn body(&self) -> Vec<Element> {
        self.body.borrow().clone()
    }

    /// Events dispatched by any element created here, oldest first.
    pub fn events(&self) -> Vec<DispatchedEvent> {
        self.events.borrow().clone()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }
}

impl HostRegistry for Document {
    fn register(&mut self, tag: &str, definition: Rc<Definition>) -> Result<(), DefinitionError> {
        if self.definitions.contains_key(tag) {
            return Err(DefinitionError::AlreadyDefined(tag.to_string()));
        }
        info!(tag, "registered element");
        self.definitions.insert(tag.to_string(), definition);
        Ok(())
    }
}

/// Initial host state for an element, as if parsed from markup.
pub struct ElementBuilder<'a> {
    document: &'a Document,
    tag: String,
    attributes: BTreeMap<String, String>,
    children: Vec<Node>,
    properties: HashMap<String, PropValue>,
    args: Vec<PropValue>,
}

impl ElementBuilder<'_> {
    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Light content.
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// A property assigned before the definition is applied.
    pub fn property(mut self, name: &str, value: impl Into<PropValue>) -> Self {
        self.properties.insert(name.to_string(), value.into());
        self
    }

    /// Arguments for the `created` hook.
    pub fn args(mut self, args: impl IntoIterator<Item = PropValue>) -> Self {
        self.args.extend(args);
        self
    }

    /// Upgrades the element.
    ///
    /// # Errors
    ///
    /// [`ComponentError::UndefinedTag`], or a failure from
    /// [`Element::construct`].
    pub fn create(self) -> Result<Element, ComponentError> {
        let definition = self
            .document
            .definition(&self.tag)
            .cloned()
            .ok_or_else(|| ComponentError::UndefinedTag(self.tag.clone()))?;
        let host = HeadlessElement {
            tag: self.tag,
            attributes: self.attributes,
            children: self.children,
            properties: self.properties,
            events: Rc::clone(&self.document.events),
        };
        Element::construct(definition, Box::new(host), &self.args)
    }
}
