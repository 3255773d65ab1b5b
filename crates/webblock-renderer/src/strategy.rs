//! The renderer strategies driven by the component lifecycle.
//!
//! Every strategy builds its output before touching the attach point, so the
//! render function may read the previous output while it runs.

use std::cell::RefCell;
use std::fmt;

use tracing::debug;
use webblock_core::{Node, Rendered, ShadowRoot, SlotId, Style};

use crate::component::{ComponentLibrary, Reconciler, WrappedComponent};
use crate::diff::{TreeDiff, VirtualDom};
use crate::error::RenderError;
use crate::source::RenderSource;

/// Which strategy a component renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RendererKind {
    /// Full replace on every render.
    #[default]
    Immediate,
    /// Retained tree, diffed and patched in place.
    DiffPatch,
    /// Delegates to a component library.
    WrappedComponent,
}

impl RendererKind {
    /// A fresh strategy of this kind, backed by the built-in libraries.
    pub fn instantiate(self) -> Renderer {
        match self {
            RendererKind::Immediate => Renderer::Immediate(Immediate),
            RendererKind::DiffPatch => Renderer::diff_patch_with(Box::new(TreeDiff)),
            RendererKind::WrappedComponent => Renderer::wrapped_with(Box::new(Reconciler::new())),
        }
    }
}

/// A renderer strategy instance. Owned by exactly one component instance.
pub enum Renderer {
    Immediate(Immediate),
    DiffPatch(DiffPatch),
    WrappedComponent(Wrapped),
}

impl Renderer {
    pub fn diff_patch_with(dom: Box<dyn VirtualDom>) -> Self {
        Renderer::DiffPatch(DiffPatch {
            dom,
            retained: None,
        })
    }

    pub fn wrapped_with(library: Box<dyn ComponentLibrary>) -> Self {
        Renderer::WrappedComponent(Wrapped { library })
    }

    pub fn kind(&self) -> RendererKind {
        match self {
            Renderer::Immediate(_) => RendererKind::Immediate,
            Renderer::DiffPatch(_) => RendererKind::DiffPatch,
            Renderer::WrappedComponent(_) => RendererKind::WrappedComponent,
        }
    }

    /// Draws the current state of `source` into `root`.
    ///
    /// The render function runs first; `root` is borrowed mutably only to
    /// apply its output.
    ///
    /// # Errors
    ///
    /// [`RenderError::AttachPointBusy`] when `root` is still borrowed once
    /// the output is built, plus patch and component-library failures.
    pub fn render(
        &mut self,
        source: &dyn RenderSource,
        root: &RefCell<ShadowRoot>,
    ) -> Result<(), RenderError> {
        debug!(kind = ?self.kind(), "render");
        let props = source.snapshot();
        let output = source.build(&props);
        let mut root = root
            .try_borrow_mut()
            .map_err(|_| RenderError::AttachPointBusy)?;
        match self {
            Renderer::Immediate(r) => {
                r.render(output, source.style(), &mut root);
                Ok(())
            }
            Renderer::DiffPatch(r) => r.render(output.into_node(), source.style(), &mut root),
            Renderer::WrappedComponent(r) => {
                let component = WrappedComponent::new(output.into_node(), source.style());
                r.library.render(&component, props, &mut root)
            }
        }
    }

    /// Releases retained tree state.
    pub fn detach(&mut self, root: &mut ShadowRoot) {
        debug!(kind = ?self.kind(), "detach");
        match self {
            Renderer::Immediate(_) => {}
            Renderer::DiffPatch(r) => r.detach(root),
            Renderer::WrappedComponent(r) => {
                r.library.unmount(root);
            }
        }
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Renderer").field(&self.kind()).finish()
    }
}

/// Discards prior output and inserts a fresh render every time.
#[derive(Debug, Default)]
pub struct Immediate;

impl Immediate {
    fn render(&mut self, output: Rendered, style: Option<&Style>, root: &mut ShadowRoot) {
        root.clear();
        match output {
            Rendered::Markup(markup) => root.set_inner_markup(&markup),
            Rendered::Node(node) => {
                root.append(node);
            }
        }
        root.inject_style(style);
    }
}

struct Retained {
    tree: Node,
    slot: SlotId,
}

/// Keeps the last tree and patches the materialized copy in place.
pub struct DiffPatch {
    dom: Box<dyn VirtualDom>,
    retained: Option<Retained>,
}

impl DiffPatch {
    pub fn has_retained_tree(&self) -> bool {
        self.retained.is_some()
    }

    fn render(
        &mut self,
        tree: Node,
        style: Option<&Style>,
        root: &mut ShadowRoot,
    ) -> Result<(), RenderError> {
        match &mut self.retained {
            None => {
                let slot = root.append(self.dom.create(&tree));
                root.inject_style(style);
                self.retained = Some(Retained { tree, slot });
            }
            Some(retained) => {
                let patches = self.dom.diff(&retained.tree, &tree);
                let target = root
                    .get_mut(retained.slot)
                    .ok_or(RenderError::LostRetainedNode)?;
                self.dom.patch(target, &patches)?;
                retained.tree = tree;
            }
        }
        Ok(())
    }

    fn detach(&mut self, root: &mut ShadowRoot) {
        if let Some(retained) = self.retained.take() {
            root.remove(retained.slot);
        }
    }
}

impl fmt::Debug for DiffPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffPatch")
            .field("retained", &self.has_retained_tree())
            .finish()
    }
}

/// Wraps the render output in a library-managed component.
pub struct Wrapped {
    library: Box<dyn ComponentLibrary>,
}

impl fmt::Debug for Wrapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Wrapped(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use webblock_core::{Node, PropValue, PropertyStore, Style};

    /// Renders `<p>{label}</p>` and counts builds.
    struct Source {
        props: RefCell<PropertyStore>,
        style: Option<Style>,
        builds: Cell<usize>,
        markup: bool,
    }

    impl Source {
        fn new(label: &str) -> Self {
            Self {
                props: RefCell::new([("label", PropValue::from(label))].into_iter().collect()),
                style: Some(Style::from("p{}")),
                builds: Cell::new(0),
                markup: false,
            }
        }

        fn set_label(&self, label: &str) {
            self.props.borrow_mut().write("label", PropValue::from(label));
        }
    }

    impl RenderSource for Source {
        fn snapshot(&self) -> PropertyStore {
            self.props.borrow().clone()
        }

        fn build(&self, props: &PropertyStore) -> Rendered {
            self.builds.set(self.builds.get() + 1);
            let label = props
                .get("label")
                .and_then(PropValue::as_text)
                .unwrap_or_default()
                .to_string();
            if self.markup {
                Rendered::from(format!("<p>{label}</p>"))
            } else {
                Rendered::from(Node::element("p").child(Node::text(label)))
            }
        }

        fn style(&self) -> Option<&Style> {
            self.style.as_ref()
        }
    }

    #[test]
    fn immediate_replaces_output_each_time() {
        let source = Source::new("a");
        let root = RefCell::new(ShadowRoot::new());
        let mut renderer = RendererKind::Immediate.instantiate();

        renderer.render(&source, &root).unwrap();
        source.set_label("b");
        renderer.render(&source, &root).unwrap();

        assert_eq!(root.borrow().to_html(), "<p>b</p><style>p{}</style>");
        assert_eq!(source.builds.get(), 2);
    }

    #[test]
    fn immediate_accepts_markup() {
        let mut source = Source::new("x");
        source.markup = true;
        source.style = None;
        let root = RefCell::new(ShadowRoot::new());
        RendererKind::Immediate
            .instantiate()
            .render(&source, &root)
            .unwrap();
        assert_eq!(root.borrow().to_html(), "<p>x</p>");
    }

    #[test]
    fn diff_patch_updates_in_place() {
        let source = Source::new("a");
        let root = RefCell::new(ShadowRoot::new());
        let mut renderer = RendererKind::DiffPatch.instantiate();

        renderer.render(&source, &root).unwrap();
        assert_eq!(root.borrow().to_html(), "<p>a</p><style>p{}</style>");

        source.set_label("b");
        renderer.render(&source, &root).unwrap();
        assert_eq!(root.borrow().to_html(), "<p>b</p><style>p{}</style>");
        assert_eq!(root.borrow().len(), 2);
    }

    #[test]
    fn diff_patch_detach_releases_tree() {
        let source = Source::new("a");
        let root = RefCell::new(ShadowRoot::new());
        let mut renderer = RendererKind::DiffPatch.instantiate();
        renderer.render(&source, &root).unwrap();

        renderer.detach(&mut root.borrow_mut());
        let Renderer::DiffPatch(inner) = &renderer else {
            panic!("expected diff/patch renderer");
        };
        assert!(!inner.has_retained_tree());
        assert_eq!(root.borrow().to_html(), "<style>p{}</style>");

        // Re-attaching materializes a fresh tree.
        renderer.render(&source, &root).unwrap();
        assert_eq!(root.borrow().to_html(), "<p>a</p><style>p{}</style>");
    }

    #[test]
    fn diff_patch_uses_supplied_library() {
        struct Counting(Rc<Cell<usize>>);
        impl VirtualDom for Counting {
            fn create(&self, tree: &Node) -> Node {
                tree.clone()
            }
            fn diff(&self, old: &Node, new: &Node) -> Vec<crate::diff::Patch> {
                self.0.set(self.0.get() + 1);
                TreeDiff.diff(old, new)
            }
            fn patch(&self, root: &mut Node, patches: &[crate::diff::Patch]) -> Result<(), RenderError> {
                TreeDiff.patch(root, patches)
            }
        }

        let diffs = Rc::new(Cell::new(0));
        let mut renderer = Renderer::diff_patch_with(Box::new(Counting(Rc::clone(&diffs))));
        let source = Source::new("a");
        let root = RefCell::new(ShadowRoot::new());
        renderer.render(&source, &root).unwrap();
        assert_eq!(diffs.get(), 0);
        renderer.render(&source, &root).unwrap();
        assert_eq!(diffs.get(), 1);
    }

    #[test]
    fn wrapped_component_mounts_once_and_unmounts() {
        let source = Source::new("a");
        let root = RefCell::new(ShadowRoot::new());
        let mut renderer = RendererKind::WrappedComponent.instantiate();

        renderer.render(&source, &root).unwrap();
        source.set_label("b");
        renderer.render(&source, &root).unwrap();
        assert_eq!(root.borrow().to_html(), "<p>b</p><style>p{}</style>");

        renderer.detach(&mut root.borrow_mut());
        assert_eq!(root.borrow().to_html(), "<style>p{}</style>");
    }

    #[test]
    fn wrapped_component_receives_props_as_input() {
        struct Recording(Rc<RefCell<Vec<PropertyStore>>>);
        impl ComponentLibrary for Recording {
            fn render(
                &mut self,
                component: &WrappedComponent<'_>,
                props: PropertyStore,
                root: &mut ShadowRoot,
            ) -> Result<(), RenderError> {
                root.clear();
                root.append(component.tree().clone());
                self.0.borrow_mut().push(props);
                Ok(())
            }
            fn unmount(&mut self, root: &mut ShadowRoot) -> bool {
                root.clear();
                true
            }
        }

        let inputs = Rc::new(RefCell::new(Vec::new()));
        let mut renderer = Renderer::wrapped_with(Box::new(Recording(Rc::clone(&inputs))));
        let source = Source::new("hello");
        let root = RefCell::new(ShadowRoot::new());
        renderer.render(&source, &root).unwrap();

        assert_eq!(renderer.kind(), RendererKind::WrappedComponent);
        assert_eq!(inputs.borrow().len(), 1);
        assert_eq!(
            inputs.borrow()[0].get("label"),
            Some(&PropValue::from("hello"))
        );
        assert_eq!(root.borrow().to_html(), "<p>hello</p>");
    }

    #[test]
    fn busy_attach_point_is_an_error() {
        let source = Source::new("a");
        let root = RefCell::new(ShadowRoot::new());
        let held = root.borrow();
        let err = RendererKind::Immediate
            .instantiate()
            .render(&source, &root)
            .unwrap_err();
        assert_eq!(err, RenderError::AttachPointBusy);
        assert_eq!(source.builds.get(), 1);
        assert!(held.is_empty());
    }
}
