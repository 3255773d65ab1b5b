//! Component-library integration.
//!
//! The wrapped-component strategy hands the render output to a
//! [`ComponentLibrary`] as a [`WrappedComponent`], together with the
//! property values it was rendered from as the component's input. Mounting,
//! reconciliation and unmounting are the library's business.

use tracing::debug;
use webblock_core::{Node, PropertyStore, ShadowRoot, SlotId, Style};

use crate::diff::{TreeDiff, VirtualDom};
use crate::error::RenderError;

/// The user render function's output, wrapped as a library component.
pub struct WrappedComponent<'a> {
    tree: Node,
    style: Option<&'a Style>,
}

impl<'a> WrappedComponent<'a> {
    pub fn new(tree: Node, style: Option<&'a Style>) -> Self {
        Self { tree, style }
    }

    /// The tree rendered for the current input.
    pub fn tree(&self) -> &Node {
        &self.tree
    }

    /// Called by the library once the component is first mounted.
    pub fn did_mount(&self, root: &mut ShadowRoot) {
        root.inject_style(self.style);
    }
}

/// A component rendering library.
pub trait ComponentLibrary {
    /// Renders `component` into `root` with `props` as its input, mounting it
    /// on first use and updating it afterwards.
    ///
    /// # Errors
    ///
    /// Library-specific failures while mounting or updating.
    fn render(
        &mut self,
        component: &WrappedComponent<'_>,
        props: PropertyStore,
        root: &mut ShadowRoot,
    ) -> Result<(), RenderError>;

    /// Unmounts the component from `root`. Returns whether one was mounted.
    fn unmount(&mut self, root: &mut ShadowRoot) -> bool;
}

struct Mounted {
    slot: SlotId,
    tree: Node,
    props: PropertyStore,
}

/// Built-in library: mounts once, then reconciles with [`TreeDiff`].
#[derive(Default)]
pub struct Reconciler {
    differ: TreeDiff,
    mounted: Option<Mounted>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// The input the mounted component last rendered with.
    pub fn props(&self) -> Option<&PropertyStore> {
        self.mounted.as_ref().map(|m| &m.props)
    }
}

impl ComponentLibrary for Reconciler {
    fn render(
        &mut self,
        component: &WrappedComponent<'_>,
        props: PropertyStore,
        root: &mut ShadowRoot,
    ) -> Result<(), RenderError> {
        let tree = component.tree().clone();
        match &mut self.mounted {
            Some(mounted) => {
                let patches = self.differ.diff(&mounted.tree, &tree);
                let target = root
                    .get_mut(mounted.slot)
                    .ok_or(RenderError::LostRetainedNode)?;
                self.differ.patch(target, &patches)?;
                mounted.tree = tree;
                mounted.props = props;
            }
            None => {
                let slot = root.append(self.differ.create(&tree));
                self.mounted = Some(Mounted { slot, tree, props });
                debug!("component mounted");
                component.did_mount(root);
            }
        }
        Ok(())
    }

    fn unmount(&mut self, root: &mut ShadowRoot) -> bool {
        match self.mounted.take() {
            Some(mounted) => {
                root.remove(mounted.slot);
                debug!("component unmounted");
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("mounted", &self.is_mounted())
            .finish()
    }
}
