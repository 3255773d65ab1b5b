//! The keys a descriptor entry may carry.
//!
//! Used to reject misspelled keys at compile time instead of silently
//! ignoring them.

/// A recognized descriptor key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKey {
    Type,
    Converter,
    Default,
}

static DESCRIPTOR_KEYS: &[(&str, DescriptorKey)] = &[
    ("type", DescriptorKey::Type),
    ("converter", DescriptorKey::Converter),
    ("default", DescriptorKey::Default),
];

impl DescriptorKey {
    pub fn from_name(name: &str) -> Option<Self> {
        DESCRIPTOR_KEYS
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, key)| *key)
    }
}

/// All valid descriptor key names, in documentation order.
pub fn key_names() -> Vec<&'static str> {
    DESCRIPTOR_KEYS.iter().map(|(name, _)| *name).collect()
}

/// Whether a bare identifier reads as a type tag rather than a converter
/// function: type tags are capitalized (`String`, `Number`, `Date`).
pub fn is_type_tag_ident(ident: &str) -> bool {
    ident.chars().next().is_some_and(char::is_uppercase)
}
