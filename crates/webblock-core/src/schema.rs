//! Attribute schemas and their normalization into coercion rules.
//!
//! An author declares each attribute in one of three shapes:
//!
//! - a bare type tag: `count: Number`
//! - a descriptor: `{ type: String, default: "foo" }` or `{ converter, default }`
//! - a bare converter function (shorthand for `{ converter }` with no default)
//!
//! [`AttributeSchema::normalize`] turns every entry into exactly one
//! [`AttributeRule`], once, when the component is defined.
//!
//! The schema is generic over `C`, the component instance type that
//! converters receive as their receiver.

use std::fmt;
use std::rc::Rc;

use crate::value::PropValue;

/// A user-supplied attribute converter.
///
/// Receives the owning instance and the raw attribute text (which may be
/// absent) and is fully responsible for null handling and default shaping.
pub type ConverterFn<C> = dyn Fn(&C, Option<&str>) -> PropValue;

/// Shared handle to a converter.
pub struct Converter<C>(Rc<ConverterFn<C>>);

impl<C> Converter<C> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&C, Option<&str>) -> PropValue + 'static,
    {
        Self(Rc::new(f))
    }

    /// Invokes the converter bound to `this`.
    pub fn call(&self, this: &C, raw: Option<&str>) -> PropValue {
        (self.0)(this, raw)
    }
}

impl<C> Clone for Converter<C> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<C> fmt::Debug for Converter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Converter(...)")
    }
}

/// A primitive or structured type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    String,
    Number,
    Boolean,
    Object,
    Array,
    /// A tag this crate does not know. Accepted; values pass through as text.
    Other(String),
}

impl TypeTag {
    /// Resolves a tag by its declared name (`"String"`, `"Number"`, ...).
    pub fn from_name(name: &str) -> Self {
        match name {
            "String" => TypeTag::String,
            "Number" => TypeTag::Number,
            "Boolean" => TypeTag::Boolean,
            "Object" => TypeTag::Object,
            "Array" => TypeTag::Array,
            other => TypeTag::Other(other.to_string()),
        }
    }
}

/// The descriptor form of a schema entry.
pub struct Descriptor<C> {
    pub ty: Option<TypeTag>,
    pub converter: Option<Converter<C>>,
    pub default: Option<PropValue>,
}

impl<C> Default for Descriptor<C> {
    fn default() -> Self {
        Self {
            ty: None,
            converter: None,
            default: None,
        }
    }
}

impl<C> Descriptor<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ty(mut self, ty: TypeTag) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn converter<F>(mut self, f: F) -> Self
    where
        F: Fn(&C, Option<&str>) -> PropValue + 'static,
    {
        self.converter = Some(Converter::new(f));
        self
    }

    pub fn default_value(mut self, value: impl Into<PropValue>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// One raw attribute declaration, as written by the author.
pub enum SchemaEntry<C> {
    Type(TypeTag),
    Descriptor(Descriptor<C>),
    Converter(Converter<C>),
}

impl<C> SchemaEntry<C> {
    /// Shorthand for a bare converter entry.
    pub fn converter<F>(f: F) -> Self
    where
        F: Fn(&C, Option<&str>) -> PropValue + 'static,
    {
        SchemaEntry::Converter(Converter::new(f))
    }
}

impl<C> From<TypeTag> for SchemaEntry<C> {
    fn from(tag: TypeTag) -> Self {
        SchemaEntry::Type(tag)
    }
}

impl<C> From<Descriptor<C>> for SchemaEntry<C> {
    fn from(descriptor: Descriptor<C>) -> Self {
        SchemaEntry::Descriptor(descriptor)
    }
}

/// How an attribute's text becomes a typed value.
pub enum RuleKind<C> {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Converter(Converter<C>),
    /// Unrecognized tag (or a descriptor with neither type nor converter);
    /// coerced as raw text with a warning.
    Unknown(String),
}

impl<C> Clone for RuleKind<C> {
    fn clone(&self) -> Self {
        match self {
            RuleKind::String => RuleKind::String,
            RuleKind::Number => RuleKind::Number,
            RuleKind::Boolean => RuleKind::Boolean,
            RuleKind::Object => RuleKind::Object,
            RuleKind::Array => RuleKind::Array,
            RuleKind::Converter(c) => RuleKind::Converter(c.clone()),
            RuleKind::Unknown(name) => RuleKind::Unknown(name.clone()),
        }
    }
}

impl<C> fmt::Debug for RuleKind<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::String => f.write_str("String"),
            RuleKind::Number => f.write_str("Number"),
            RuleKind::Boolean => f.write_str("Boolean"),
            RuleKind::Object => f.write_str("Object"),
            RuleKind::Array => f.write_str("Array"),
            RuleKind::Converter(c) => fmt::Debug::fmt(c, f),
            RuleKind::Unknown(name) => f.debug_tuple("Unknown").field(name).finish(),
        }
    }
}

impl<C> From<TypeTag> for RuleKind<C> {
    fn from(tag: TypeTag) -> Self {
        match tag {
            TypeTag::String => RuleKind::String,
            TypeTag::Number => RuleKind::Number,
            TypeTag::Boolean => RuleKind::Boolean,
            TypeTag::Object => RuleKind::Object,
            TypeTag::Array => RuleKind::Array,
            TypeTag::Other(name) => RuleKind::Unknown(name),
        }
    }
}

/// A canonical coercion rule. Immutable once normalized.
pub struct AttributeRule<C> {
    kind: RuleKind<C>,
    default: Option<PropValue>,
}

impl<C> AttributeRule<C> {
    pub fn new(kind: RuleKind<C>, default: Option<PropValue>) -> Self {
        Self { kind, default }
    }

    pub fn kind(&self) -> &RuleKind<C> {
        &self.kind
    }

    pub fn default_value(&self) -> Option<&PropValue> {
        self.default.as_ref()
    }
}

impl<C> fmt::Debug for AttributeRule<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeRule")
            .field("kind", &self.kind)
            .field("default", &self.default)
            .finish()
    }
}

/// Normalizes one schema entry. A converter always wins over a type tag.
pub fn normalize<C>(entry: SchemaEntry<C>) -> AttributeRule<C> {
    match entry {
        SchemaEntry::Type(tag) => AttributeRule::new(tag.into(), None),
        SchemaEntry::Converter(converter) => {
            AttributeRule::new(RuleKind::Converter(converter), None)
        }
        SchemaEntry::Descriptor(Descriptor {
            ty,
            converter,
            default,
        }) => {
            let kind = match (converter, ty) {
                (Some(converter), _) => RuleKind::Converter(converter),
                (None, Some(tag)) => tag.into(),
                (None, None) => RuleKind::Unknown(String::from("descriptor")),
            };
            AttributeRule::new(kind, default)
        }
    }
}

/// The raw, ordered attribute declarations of a component.
pub struct AttributeSchema<C> {
    entries: Vec<(String, SchemaEntry<C>)>,
}

impl<C> Default for AttributeSchema<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<C> AttributeSchema<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an attribute. Re-declaring a name replaces its entry but
    /// keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, entry: impl Into<SchemaEntry<C>>) {
        let name = name.into();
        let entry = entry.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = entry,
            None => self.entries.push((name, entry)),
        }
    }

    /// Builder form of [`AttributeSchema::insert`].
    pub fn with(mut self, name: impl Into<String>, entry: impl Into<SchemaEntry<C>>) -> Self {
        self.insert(name, entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn normalize(self) -> RuleSet<C> {
        RuleSet {
            rules: self
                .entries
                .into_iter()
                .map(|(name, entry)| (name, normalize(entry)))
                .collect(),
        }
    }
}

/// Normalized rules, in declaration order.
pub struct RuleSet<C> {
    rules: Vec<(String, AttributeRule<C>)>,
}

impl<C> Default for RuleSet<C> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<C> RuleSet<C> {
    pub fn get(&self, name: &str) -> Option<&AttributeRule<C>> {
        self.rules
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, rule)| rule)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeRule<C>)> {
        self.rules.iter().map(|(n, rule)| (n.as_str(), rule))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<C> fmt::Debug for RuleSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.rules.iter().map(|(n, r)| (n, r)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Host;

    #[test]
    fn bare_tag_has_no_default() {
        let rule = normalize::<Host>(SchemaEntry::Type(TypeTag::Number));
        assert!(matches!(rule.kind(), RuleKind::Number));
        assert!(rule.default_value().is_none());
    }

    #[test]
    fn converter_wins_over_type() {
        let descriptor = Descriptor::<Host>::new()
            .ty(TypeTag::Number)
            .converter(|_, _| PropValue::from("converted"))
            .default_value(1);
        let rule = normalize(SchemaEntry::Descriptor(descriptor));
        match rule.kind() {
            RuleKind::Converter(c) => assert_eq!(c.call(&Host, None), PropValue::from("converted")),
            other => panic!("expected converter, got {other:?}"),
        }
        assert_eq!(rule.default_value(), Some(&PropValue::Number(1.0)));
    }

    #[test]
    fn bare_function_is_converter_without_default() {
        let rule = normalize(SchemaEntry::<Host>::converter(|_, raw| raw.map(str::to_string).into()));
        assert!(matches!(rule.kind(), RuleKind::Converter(_)));
        assert!(rule.default_value().is_none());
    }

    #[test]
    fn unknown_tag_is_accepted() {
        let rule = normalize::<Host>(SchemaEntry::Type(TypeTag::from_name("Date")));
        assert!(matches!(rule.kind(), RuleKind::Unknown(name) if name == "Date"));
    }

    #[test]
    fn redeclaring_keeps_one_rule_per_name() {
        let rules = AttributeSchema::<Host>::new()
            .with("a", TypeTag::String)
            .with("b", TypeTag::Number)
            .with("a", TypeTag::Boolean)
            .normalize();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.names().collect::<Vec<_>>(), ["a", "b"]);
        assert!(matches!(rules.get("a").map(AttributeRule::kind), Some(RuleKind::Boolean)));
    }
}
