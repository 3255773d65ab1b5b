//! What a renderer draws from.

use webblock_core::{PropertyStore, Rendered, Style};

/// A component instance, seen from a renderer.
pub trait RenderSource {
    /// A copy of the current property values.
    fn snapshot(&self) -> PropertyStore;

    /// Runs the user render function against `props`.
    fn build(&self, props: &PropertyStore) -> Rendered;

    /// The stylesheet injected alongside rendered output.
    fn style(&self) -> Option<&Style>;
}
