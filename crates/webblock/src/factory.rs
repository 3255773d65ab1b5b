//! Turns a [`ComponentDescription`] into a registered element kind.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, info};
use webblock_core::{RuleSet, Style};
use webblock_renderer::RendererKind;

use crate::description::{
    ComponentDescription, Hooks, Member, RenderFn, RendererChoice, RESERVED_NAMES,
};
use crate::element::Element;
use crate::error::DefinitionError;

/// Where definitions get registered under their tag.
pub trait HostRegistry {
    /// # Errors
    ///
    /// [`DefinitionError::AlreadyDefined`] when the tag is taken.
    fn register(&mut self, tag: &str, definition: Rc<Definition>) -> Result<(), DefinitionError>;
}

/// A validated element kind, shared by all of its instances.
pub struct Definition {
    tag: String,
    rules: RuleSet<Element>,
    render: RenderFn,
    style: Option<Style>,
    hooks: Hooks,
    members: HashMap<String, Member>,
    renderer: RendererChoice,
}

impl Definition {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn rules(&self) -> &RuleSet<Element> {
        &self.rules
    }

    pub fn render_fn(&self) -> &RenderFn {
        &self.render
    }

    pub fn style(&self) -> Option<&Style> {
        self.style.as_ref()
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn renderer(&self) -> &RendererChoice {
        &self.renderer
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("tag", &self.tag)
            .field("rules", &self.rules)
            .field("style", &self.style)
            .field("hooks", &self.hooks)
            .field("members", &self.members)
            .field("renderer", &self.renderer)
            .finish()
    }
}

/// Builds definitions. Holds the defaults applied to every description.
#[derive(Debug, Clone, Copy, Default)]
pub struct Factory {
    default_renderer: RendererKind,
}

impl Factory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer used by descriptions that don't pick one.
    pub fn default_renderer(mut self, kind: RendererKind) -> Self {
        self.default_renderer = kind;
        self
    }

    /// Validates `description`, builds its definition and registers it.
    ///
    /// Members from the description are copied first, then each mixin in
    /// order; a later entry replaces an earlier one of the same name.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] for an invalid tag, a reserved member
    /// name, a missing render function, or a tag the registry already holds.
    pub fn define(
        &self,
        description: ComponentDescription,
        registry: &mut dyn HostRegistry,
    ) -> Result<Rc<Definition>, DefinitionError> {
        let definition = Rc::new(self.build(description)?);
        registry.register(&definition.tag, Rc::clone(&definition))?;
        info!(
            tag = %definition.tag,
            attributes = definition.rules.len(),
            renderer = ?definition.renderer,
            "defined element"
        );
        Ok(definition)
    }

    fn build(&self, description: ComponentDescription) -> Result<Definition, DefinitionError> {
        let ComponentDescription {
            tag,
            attributes,
            render,
            style,
            hooks,
            members,
            mixins,
            renderer,
        } = description;

        validate_tag(&tag)?;
        let render = render.ok_or_else(|| DefinitionError::MissingRender(tag.clone()))?;

        let mut merged = HashMap::new();
        let sources = members
            .into_iter()
            .chain(mixins.into_iter().flat_map(|mixin| mixin.members));
        for (name, member) in sources {
            if RESERVED_NAMES.contains(&name.as_str()) {
                return Err(DefinitionError::ReservedMember(name));
            }
            if merged.insert(name.clone(), member).is_some() {
                debug!(tag = %tag, member = %name, "member overridden");
            }
        }

        Ok(Definition {
            rules: attributes.normalize(),
            render,
            style,
            hooks,
            members: merged,
            renderer: renderer.unwrap_or(RendererChoice::Kind(self.default_renderer)),
            tag,
        })
    }
}

/// Defines `description` with the default [`Factory`].
///
/// # Errors
///
/// See [`Factory::define`].
pub fn define(
    description: ComponentDescription,
    registry: &mut dyn HostRegistry,
) -> Result<Rc<Definition>, DefinitionError> {
    Factory::default().define(description, registry)
}

/// Custom element names start with a lowercase letter, contain a hyphen and
/// use no uppercase letters or whitespace.
fn validate_tag(tag: &str) -> Result<(), DefinitionError> {
    let starts_lower = tag.chars().next().is_some_and(|c| c.is_ascii_lowercase());
    let valid_chars = tag
        .chars()
        .all(|c| !c.is_ascii_uppercase() && !c.is_whitespace() && c != '/' && c != '>');
    if starts_lower && valid_chars && tag.contains('-') {
        Ok(())
    } else {
        Err(DefinitionError::InvalidTag(tag.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::Mixin;
    use webblock_core::{PropValue, TypeTag};

    #[derive(Default)]
    struct Registry(HashMap<String, Rc<Definition>>);

    impl HostRegistry for Registry {
        fn register(&mut self, tag: &str, definition: Rc<Definition>) -> Result<(), DefinitionError> {
            if self.0.contains_key(tag) {
                return Err(DefinitionError::AlreadyDefined(tag.to_string()));
            }
            self.0.insert(tag.to_string(), definition);
            Ok(())
        }
    }

    fn description(tag: &str) -> ComponentDescription {
        ComponentDescription::new(tag).render(|_, _| "".into())
    }

    #[test]
    fn tag_validation() {
        assert!(validate_tag("my-card").is_ok());
        assert!(validate_tag("x-1").is_ok());
        for bad in ["card", "My-card", "-card", "1-card", "my card-x", ""] {
            assert_eq!(
                validate_tag(bad),
                Err(DefinitionError::InvalidTag(bad.to_string())),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn define_registers_the_tag() {
        let mut registry = Registry::default();
        let definition = define(description("my-card"), &mut registry).unwrap();
        assert_eq!(definition.tag(), "my-card");
        assert!(registry.0.contains_key("my-card"));
    }

    #[test]
    fn defining_twice_fails() {
        let mut registry = Registry::default();
        define(description("my-card"), &mut registry).unwrap();
        let err = define(description("my-card"), &mut registry).unwrap_err();
        assert_eq!(err, DefinitionError::AlreadyDefined(String::from("my-card")));
    }

    #[test]
    fn render_is_required() {
        let mut registry = Registry::default();
        let err = define(ComponentDescription::new("my-card"), &mut registry).unwrap_err();
        assert_eq!(err, DefinitionError::MissingRender(String::from("my-card")));
    }

    #[test]
    fn reserved_names_are_rejected() {
        let mut registry = Registry::default();
        let err = define(description("my-card").value("render", 1), &mut registry).unwrap_err();
        assert_eq!(err, DefinitionError::ReservedMember(String::from("render")));

        let mixin = Mixin::new().value("attached", true);
        let err = define(description("my-other").mixin(mixin), &mut registry).unwrap_err();
        assert_eq!(err, DefinitionError::ReservedMember(String::from("attached")));
    }

    #[test]
    fn later_mixins_override_earlier_members() {
        let mut registry = Registry::default();
        let definition = define(
            description("my-card")
                .value("greeting", "body")
                .value("kept", 1)
                .mixin(Mixin::new().value("greeting", "first"))
                .mixin(Mixin::new().value("greeting", "second")),
            &mut registry,
        )
        .unwrap();

        let greeting = definition.member("greeting").and_then(Member::as_value);
        assert_eq!(greeting, Some(&PropValue::from("second")));
        assert!(definition.member("kept").is_some());
        assert_eq!(definition.member_names().count(), 2);
    }

    #[test]
    fn default_renderer_comes_from_the_factory() {
        let mut registry = Registry::default();
        let factory = Factory::new().default_renderer(RendererKind::DiffPatch);

        let implicit = factory.define(description("a-b"), &mut registry).unwrap();
        assert_eq!(implicit.renderer().instantiate().kind(), RendererKind::DiffPatch);

        let explicit = factory
            .define(
                description("c-d").renderer(RendererKind::Immediate),
                &mut registry,
            )
            .unwrap();
        assert_eq!(explicit.renderer().instantiate().kind(), RendererKind::Immediate);
    }

    #[test]
    fn schema_is_normalized() {
        let mut registry = Registry::default();
        let definition = define(
            description("my-card")
                .attribute("count", TypeTag::Number)
                .attribute("label", TypeTag::String),
            &mut registry,
        )
        .unwrap();
        let names: Vec<_> = definition.rules().names().collect();
        assert_eq!(names, ["count", "label"]);
    }
}
