//! Component instances and their lifecycle.
//!
//! An [`Element`] owns its property store, observer registry, shadow root and
//! renderer. The host drives it through the `*_callback` methods; authors
//! use [`Element::get`], [`Element::set`] and the observer API.
//!
//! Renders happen only while attached. Each successful property write
//! triggers exactly one render request, after that property's observers
//! have run.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};
use webblock_core::{
    coerce, HostElement, HostEvent, Node, Observer, ObserverRegistry, PropValue, PropertyStore,
    Rendered, ShadowRoot, Style, UnknownProperty,
};
use webblock_renderer::{RenderSource, Renderer};

use crate::description::Member;
use crate::error::ComponentError;
use crate::factory::Definition;

/// Attachment state plus the renderer, which is taken out while rendering.
struct Lifecycle {
    attached: bool,
    renderer: Option<Renderer>,
    detach_pending: bool,
}

struct Inner {
    definition: Rc<Definition>,
    host: RefCell<Box<dyn HostElement>>,
    light_content: Vec<Node>,
    shadow: RefCell<ShadowRoot>,
    store: RefCell<PropertyStore>,
    observers: RefCell<ObserverRegistry>,
    lifecycle: RefCell<Lifecycle>,
}

/// A component instance. Cloning yields another handle to the same instance.
#[derive(Clone)]
pub struct Element {
    inner: Rc<Inner>,
}

/// A non-owning handle, for closures the element itself holds.
#[derive(Clone)]
pub struct WeakElement(Weak<Inner>);

impl WeakElement {
    pub fn upgrade(&self) -> Option<Element> {
        self.0.upgrade().map(|inner| Element { inner })
    }
}

impl fmt::Debug for WeakElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakElement")
    }
}

impl Element {
    /// Upgrades `host` into an instance of `definition`.
    ///
    /// Light content is captured first. Then every declared property gets
    /// its initial value: a non-null value assigned before the upgrade wins,
    /// then the declared default when the attribute is absent, then the
    /// coerced attribute text. Finally the `created` hook runs with `args`.
    ///
    /// # Errors
    ///
    /// Fails when an attribute cannot be coerced or the hook fails.
    pub fn construct(
        definition: Rc<Definition>,
        mut host: Box<dyn HostElement>,
        args: &[PropValue],
    ) -> Result<Element, ComponentError> {
        let light_content = host.take_children();
        let element = Element {
            inner: Rc::new(Inner {
                host: RefCell::new(host),
                light_content,
                shadow: RefCell::new(ShadowRoot::new()),
                store: RefCell::new(PropertyStore::new()),
                observers: RefCell::new(ObserverRegistry::new()),
                lifecycle: RefCell::new(Lifecycle {
                    attached: false,
                    renderer: Some(definition.renderer().instantiate()),
                    detach_pending: false,
                }),
                definition: Rc::clone(&definition),
            }),
        };

        for (name, rule) in definition.rules().iter() {
            let preassigned = element
                .inner
                .host
                .borrow_mut()
                .take_property(name)
                .filter(|value| !value.is_null());
            let value = match preassigned {
                Some(value) => value,
                None => {
                    let raw = element.inner.host.borrow().attribute(name);
                    match (raw, rule.default_value()) {
                        (None, Some(default)) => default.clone(),
                        (raw, _) => coerce(rule, &element, name, raw.as_deref())?,
                    }
                }
            };
            trace!(tag = %definition.tag(), property = name, value = ?value, "hydrated");
            element.inner.store.borrow_mut().write(name, value);
            element.inner.observers.borrow_mut().declare(name);
        }

        debug!(tag = %definition.tag(), "element created");
        if let Some(hook) = &definition.hooks().created {
            hook(&element, args)?;
        }
        Ok(element)
    }

    pub fn tag_name(&self) -> &str {
        self.inner.definition.tag()
    }

    pub fn definition(&self) -> &Rc<Definition> {
        &self.inner.definition
    }

    pub fn downgrade(&self) -> WeakElement {
        WeakElement(Rc::downgrade(&self.inner))
    }

    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // ---- properties --------------------------------------------------------

    pub fn get(&self, name: &str) -> Option<PropValue> {
        self.inner.store.borrow().get(name).cloned()
    }

    /// Snapshot of every declared property.
    pub fn props(&self) -> PropertyStore {
        self.inner.store.borrow().clone()
    }

    /// Writes a declared property. Returns `false` when `value` is identical
    /// to the current one, in which case nothing else happens.
    ///
    /// Otherwise the store is updated, observers registered for `name` are
    /// notified in registration order with `(new, old, name)`, and one render
    /// is requested.
    ///
    /// # Errors
    ///
    /// [`ComponentError::UnknownProperty`] for an undeclared name, or a
    /// render failure.
    pub fn set(&self, name: &str, value: impl Into<PropValue>) -> Result<bool, ComponentError> {
        let value = value.into();
        if !self.inner.observers.borrow().is_declared(name) {
            return Err(UnknownProperty(name.to_string()).into());
        }
        let replaced = self
            .inner
            .store
            .borrow_mut()
            .replace_if_changed(name, value.clone())?;
        let Some(old) = replaced else {
            trace!(property = name, "unchanged");
            return Ok(false);
        };

        let observers = self.inner.observers.borrow().observers(name);
        trace!(property = name, observers = observers.len(), "property changed");
        for observer in &observers {
            observer.notify(&value, &old, name);
        }
        self.request_render()?;
        Ok(true)
    }

    /// # Errors
    ///
    /// [`ComponentError::UnknownProperty`] for an undeclared name.
    pub fn observe(&self, name: &str, observer: Observer) -> Result<(), ComponentError> {
        self.inner.observers.borrow_mut().observe(name, observer)?;
        Ok(())
    }

    /// Removes the first registration of `observer`. Unknown names and
    /// handlers are ignored.
    pub fn unobserve(&self, name: &str, observer: &Observer) -> bool {
        self.inner.observers.borrow_mut().unobserve(name, observer)
    }

    // ---- attributes --------------------------------------------------------

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner.host.borrow().attribute(name)
    }

    /// Sets an attribute on the host and delivers the change notification.
    ///
    /// # Errors
    ///
    /// See [`Element::attribute_changed_callback`].
    pub fn set_attribute(&self, name: &str, value: &str) -> Result<(), ComponentError> {
        let old = self.inner.host.borrow_mut().set_attribute(name, Some(value));
        self.attribute_changed_callback(name, old.as_deref(), Some(value))
    }

    /// # Errors
    ///
    /// See [`Element::attribute_changed_callback`].
    pub fn remove_attribute(&self, name: &str) -> Result<(), ComponentError> {
        let old = self.inner.host.borrow_mut().set_attribute(name, None);
        self.attribute_changed_callback(name, old.as_deref(), None)
    }

    // ---- host callbacks ----------------------------------------------------

    /// Host notification that an attribute changed.
    ///
    /// For a declared attribute the new text is coerced and written straight
    /// into the store, bypassing the identity check and observers, and a
    /// render is requested. The `attribute_changed` hook then runs. Changes
    /// to undeclared attributes are ignored.
    ///
    /// # Errors
    ///
    /// Coercion, render and hook failures.
    pub fn attribute_changed_callback(
        &self,
        name: &str,
        old: Option<&str>,
        new: Option<&str>,
    ) -> Result<(), ComponentError> {
        let definition = Rc::clone(&self.inner.definition);
        let Some(rule) = definition.rules().get(name) else {
            trace!(attribute = name, "undeclared attribute ignored");
            return Ok(());
        };

        let value = coerce(rule, self, name, new)?;
        self.inner.store.borrow_mut().write(name, value);
        self.request_render()?;

        if let Some(hook) = &definition.hooks().attribute_changed {
            hook(self, name, old, new)?;
        }
        Ok(())
    }

    /// Host notification that the element entered a document. The first
    /// attach since the last detach renders.
    ///
    /// # Errors
    ///
    /// Render and hook failures.
    pub fn attached_callback(&self) -> Result<(), ComponentError> {
        let newly_attached = {
            let mut lifecycle = self.inner.lifecycle.borrow_mut();
            !std::mem::replace(&mut lifecycle.attached, true)
        };
        if newly_attached {
            debug!(tag = %self.tag_name(), "attached");
            self.request_render()?;
        }
        if let Some(hook) = &self.inner.definition.hooks().attached {
            hook(self)?;
        }
        Ok(())
    }

    /// Host notification that the element left its document. The renderer
    /// releases its state only if the element was attached; a detach that
    /// arrives mid-render is applied once the render finishes.
    ///
    /// # Errors
    ///
    /// Hook failures.
    pub fn detached_callback(&self) -> Result<(), ComponentError> {
        {
            let mut guard = self.inner.lifecycle.borrow_mut();
            let lifecycle = &mut *guard;
            if std::mem::replace(&mut lifecycle.attached, false) {
                debug!(tag = %self.tag_name(), "detached");
                match lifecycle.renderer.as_mut() {
                    Some(renderer) => renderer.detach(&mut self.inner.shadow.borrow_mut()),
                    None => lifecycle.detach_pending = true,
                }
            }
        }
        if let Some(hook) = &self.inner.definition.hooks().detached {
            hook(self)?;
        }
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.inner.lifecycle.borrow().attached
    }

    // ---- rendering ---------------------------------------------------------

    /// Renders now if attached. A request made while a render is already
    /// running is skipped. A detach delivered mid-render is applied once the
    /// render returns, followed by a fresh render if the element was attached
    /// again in the meantime.
    ///
    /// # Errors
    ///
    /// Propagates renderer failures.
    pub fn request_render(&self) -> Result<(), ComponentError> {
        let mut renderer = {
            let mut lifecycle = self.inner.lifecycle.borrow_mut();
            if !lifecycle.attached {
                trace!(tag = %self.tag_name(), "render deferred until attached");
                return Ok(());
            }
            match lifecycle.renderer.take() {
                Some(renderer) => renderer,
                None => {
                    debug!(tag = %self.tag_name(), "render already in progress, skipped");
                    return Ok(());
                }
            }
        };

        let result = renderer.render(self, &self.inner.shadow);

        let rerender = {
            let mut lifecycle = self.inner.lifecycle.borrow_mut();
            let rerender = std::mem::take(&mut lifecycle.detach_pending) && {
                renderer.detach(&mut self.inner.shadow.borrow_mut());
                lifecycle.attached
            };
            lifecycle.renderer = Some(renderer);
            rerender
        };
        result?;
        if rerender {
            debug!(tag = %self.tag_name(), "re-attached during render, rendering again");
            self.request_render()?;
        }
        Ok(())
    }

    /// The element's private render target. Inside the render function this
    /// is still the previous output.
    ///
    /// Holding the guard across a render makes that render fail with
    /// [`RenderError::AttachPointBusy`](webblock_renderer::RenderError::AttachPointBusy).
    pub fn shadow_root(&self) -> Ref<'_, ShadowRoot> {
        self.inner.shadow.borrow()
    }

    /// Serialized shadow root content.
    pub fn inner_html(&self) -> String {
        self.inner.shadow.borrow().to_html()
    }

    /// Children the element had before it was upgraded.
    pub fn light_content(&self) -> &[Node] {
        &self.inner.light_content
    }

    // ---- members -----------------------------------------------------------

    pub fn member(&self, name: &str) -> Option<Member> {
        self.inner.definition.member(name).cloned()
    }

    /// Invokes a method member with this element as receiver.
    ///
    /// # Errors
    ///
    /// [`ComponentError::UnknownMember`], [`ComponentError::NotCallable`]
    /// for a value member, or whatever the method returns.
    pub fn call(&self, name: &str, args: &[PropValue]) -> Result<PropValue, ComponentError> {
        match self.member(name) {
            Some(Member::Method(method)) => method(self, args),
            Some(Member::Value(_)) => Err(ComponentError::NotCallable(name.to_string())),
            None => Err(ComponentError::UnknownMember(name.to_string())),
        }
    }

    pub fn dispatch_event(&self, event: HostEvent) {
        trace!(tag = %self.tag_name(), event = %event.name, "dispatch");
        self.inner.host.borrow_mut().dispatch_event(event);
    }
}

impl RenderSource for Element {
    fn snapshot(&self) -> PropertyStore {
        self.props()
    }

    fn build(&self, props: &PropertyStore) -> Rendered {
        let render = Rc::clone(self.inner.definition.render_fn());
        render(self, props)
    }

    fn style(&self) -> Option<&Style> {
        self.inner.definition.style()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag_name())
            .field("attached", &self.is_attached())
            .field("props", &*self.inner.store.borrow())
            .finish()
    }
}
