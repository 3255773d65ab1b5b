//! Tree diffing and patching.
//!
//! [`VirtualDom`] is the seam to a diff/patch library. [`TreeDiff`] is the
//! built-in implementation: it walks both trees in parallel, matching
//! children by position.

use tracing::trace;
use webblock_core::Node;

use crate::error::RenderError;

/// A single in-place edit. `path` lists child indices from the patched root;
/// an empty path addresses the root itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    Replace { path: Vec<usize>, node: Node },
    SetText { path: Vec<usize>, text: String },
    SetAttribute { path: Vec<usize>, name: String, value: String },
    RemoveAttribute { path: Vec<usize>, name: String },
    Append { path: Vec<usize>, node: Node },
    Truncate { path: Vec<usize>, len: usize },
}

impl Patch {
    pub fn path(&self) -> &[usize] {
        match self {
            Patch::Replace { path, .. }
            | Patch::SetText { path, .. }
            | Patch::SetAttribute { path, .. }
            | Patch::RemoveAttribute { path, .. }
            | Patch::Append { path, .. }
            | Patch::Truncate { path, .. } => path,
        }
    }
}

/// A diff/patch library.
pub trait VirtualDom {
    /// Materializes an abstract tree into a node for the attach point.
    fn create(&self, tree: &Node) -> Node;

    /// Computes the edits turning `old` into `new`.
    fn diff(&self, old: &Node, new: &Node) -> Vec<Patch>;

    /// Applies `patches` to a materialized node in place.
    ///
    /// # Errors
    ///
    /// Fails when a patch addresses a node that does not exist.
    fn patch(&self, root: &mut Node, patches: &[Patch]) -> Result<(), RenderError>;
}

/// Positional tree differ.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeDiff;

impl TreeDiff {
    fn diff_node(old: &Node, new: &Node, path: &mut Vec<usize>, out: &mut Vec<Patch>) {
        match (old, new) {
            (Node::Element(a), Node::Element(b)) if a.tag == b.tag => {
                for (name, value) in &b.attributes {
                    if a.attribute(name) != Some(value.as_str()) {
                        out.push(Patch::SetAttribute {
                            path: path.clone(),
                            name: name.clone(),
                            value: value.clone(),
                        });
                    }
                }
                for (name, _) in &a.attributes {
                    if b.attribute(name).is_none() {
                        out.push(Patch::RemoveAttribute {
                            path: path.clone(),
                            name: name.clone(),
                        });
                    }
                }

                let common = a.children.len().min(b.children.len());
                for (index, (old_child, new_child)) in
                    a.children.iter().zip(&b.children).enumerate()
                {
                    path.push(index);
                    Self::diff_node(old_child, new_child, path, out);
                    path.pop();
                }
                for extra in &b.children[common..] {
                    out.push(Patch::Append {
                        path: path.clone(),
                        node: extra.clone(),
                    });
                }
                if a.children.len() > common {
                    out.push(Patch::Truncate {
                        path: path.clone(),
                        len: common,
                    });
                }
            }
            (Node::Text(a), Node::Text(b)) => {
                if a != b {
                    out.push(Patch::SetText {
                        path: path.clone(),
                        text: b.clone(),
                    });
                }
            }
            _ => {
                if old != new {
                    out.push(Patch::Replace {
                        path: path.clone(),
                        node: new.clone(),
                    });
                }
            }
        }
    }
}

fn node_at<'a>(root: &'a mut Node, path: &[usize]) -> Option<&'a mut Node> {
    path.iter().try_fold(root, |node, &index| {
        node.as_element_mut()
            .and_then(|el| el.children.get_mut(index))
    })
}

impl VirtualDom for TreeDiff {
    fn create(&self, tree: &Node) -> Node {
        tree.clone()
    }

    fn diff(&self, old: &Node, new: &Node) -> Vec<Patch> {
        let mut out = Vec::new();
        Self::diff_node(old, new, &mut Vec::new(), &mut out);
        trace!(patches = out.len(), "diffed trees");
        out
    }

    fn patch(&self, root: &mut Node, patches: &[Patch]) -> Result<(), RenderError> {
        for patch in patches {
            let missing = || RenderError::MissingPatchTarget {
                path: patch.path().to_vec(),
            };
            let target = node_at(root, patch.path()).ok_or_else(missing)?;
            match patch {
                Patch::Replace { node, .. } => *target = node.clone(),
                Patch::SetText { text, .. } => *target = Node::Text(text.clone()),
                Patch::SetAttribute { name, value, .. } => target
                    .as_element_mut()
                    .ok_or_else(missing)?
                    .set_attribute(name, value),
                Patch::RemoveAttribute { name, .. } => {
                    target.as_element_mut().ok_or_else(missing)?.remove_attribute(name);
                }
                Patch::Append { node, .. } => target
                    .as_element_mut()
                    .ok_or_else(missing)?
                    .children
                    .push(node.clone()),
                Patch::Truncate { len, .. } => target
                    .as_element_mut()
                    .ok_or_else(missing)?
                    .children
                    .truncate(*len),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Node {
        Node::element("ul").children(
            items
                .iter()
                .map(|item| Node::element("li").child(Node::text(*item))),
        )
    }

    fn round_trip(old: &Node, new: &Node) -> Vec<Patch> {
        let dom = TreeDiff;
        let patches = dom.diff(old, new);
        let mut target = dom.create(old);
        dom.patch(&mut target, &patches).unwrap();
        assert_eq!(&target, new);
        patches
    }

    #[test]
    fn identical_trees_produce_no_patches() {
        assert!(TreeDiff.diff(&list(&["a"]), &list(&["a"])).is_empty());
    }

    #[test]
    fn text_change_is_a_single_set_text() {
        let patches = round_trip(&list(&["a", "b"]), &list(&["a", "c"]));
        assert_eq!(
            patches,
            [Patch::SetText {
                path: vec![1, 0],
                text: String::from("c"),
            }]
        );
    }

    #[test]
    fn children_grow_and_shrink() {
        round_trip(&list(&["a"]), &list(&["a", "b", "c"]));
        let patches = round_trip(&list(&["a", "b", "c"]), &list(&["a"]));
        assert_eq!(patches, [Patch::Truncate { path: vec![], len: 1 }]);
    }

    #[test]
    fn attributes_are_set_and_removed() {
        let old = Node::element("div").attr("class", "a").attr("id", "x");
        let new = Node::element("div").attr("class", "b");
        let patches = round_trip(&old, &new);
        assert_eq!(patches.len(), 2);
    }

    #[test]
    fn tag_change_replaces_subtree() {
        let patches = round_trip(&Node::element("div"), &Node::element("span"));
        assert!(matches!(patches.as_slice(), [Patch::Replace { path, .. }] if path.is_empty()));
    }

    #[test]
    fn patching_a_missing_path_fails() {
        let mut root = Node::element("div");
        let err = TreeDiff
            .patch(
                &mut root,
                &[Patch::SetText {
                    path: vec![3],
                    text: String::new(),
                }],
            )
            .unwrap_err();
        assert_eq!(err, RenderError::MissingPatchTarget { path: vec![3] });
    }
}
