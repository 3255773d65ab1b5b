//! Error types for component definition and instances.

use thiserror::Error;
use webblock_core::{CoercionError, UnknownProperty};
use webblock_renderer::RenderError;

/// Errors raised while running a component instance.
#[derive(Debug, Error)]
pub enum ComponentError {
    #[error(transparent)]
    Coercion(#[from] CoercionError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    UnknownProperty(#[from] UnknownProperty),
    #[error("no member `{0}`")]
    UnknownMember(String),
    #[error("member `{0}` is a value, not a method")]
    NotCallable(String),
    #[error("`{0}` is not a defined element")]
    UndefinedTag(String),
}

/// Errors raised while defining an element kind.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("`{0}` is not a valid custom element name")]
    InvalidTag(String),
    #[error("`{0}` is reserved and cannot be declared as a member")]
    ReservedMember(String),
    #[error("`{0}` is already defined")]
    AlreadyDefined(String),
    #[error("`{0}` has no render function")]
    MissingRender(String),
}
