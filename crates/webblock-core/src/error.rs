//! Error types for the core crate.

use thiserror::Error;

/// Failure to coerce attribute text into a typed value.
#[derive(Debug, Error)]
pub enum CoercionError {
    /// A structured (`Object`/`Array`) attribute carried text that is not a
    /// valid literal.
    #[error("attribute `{attribute}` is not a valid structured literal: {source}")]
    MalformedStructured {
        attribute: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Access to a property that was never declared (or not yet installed).
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown property `{0}`")]
pub struct UnknownProperty(pub String);
