//! Renderer strategies for webblock.
//!
//! Three interchangeable strategies share one `render()` / `detach()`
//! contract and are driven by the component lifecycle:
//!
//! - [`RendererKind::Immediate`]: full replace on every render
//! - [`RendererKind::DiffPatch`]: retained tree, diffed and patched through a
//!   [`VirtualDom`] library
//! - [`RendererKind::WrappedComponent`]: delegates to a [`ComponentLibrary`]

pub mod component;
pub mod diff;
pub mod error;
pub mod source;
pub mod strategy;

pub use component::{ComponentLibrary, Reconciler, WrappedComponent};
pub use diff::{Patch, TreeDiff, VirtualDom};
pub use error::RenderError;
pub use source::RenderSource;
pub use strategy::{DiffPatch, Immediate, Renderer, RendererKind, Wrapped};
