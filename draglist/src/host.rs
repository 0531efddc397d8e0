use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::{EventKind, Rect, StyleProperty};

/// The document a list lives in.
///
/// This is the only seam between the engine and a real UI tree. Implementations hand out
/// non-owning node handles: the document controls element lifetimes, so a handle may refer to a
/// node that has since been detached, and implementations should answer queries on such nodes
/// gracefully (no parent, no children, a zero rect).
///
/// All methods are called from the host's single event-loop thread.
pub trait Host {
    type Node: Clone + PartialEq + fmt::Debug;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Element children in document order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);
    fn remove_attribute(&mut self, node: &Self::Node, name: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&mut self, node: &Self::Node, class: &str);
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// Viewport-relative bounding box (`getBoundingClientRect`).
    fn bounding_rect(&self, node: &Self::Node) -> Rect;

    /// Writes an inline style override. An empty `value` removes the override.
    fn set_style(&mut self, node: &Self::Node, property: StyleProperty, value: &str);

    /// Moves `node` under `parent`, before `reference` (or to the end when `reference` is `None`).
    fn insert_before(
        &mut self,
        parent: &Self::Node,
        node: &Self::Node,
        reference: Option<&Self::Node>,
    );

    /// Drops any active text selection.
    fn clear_selection(&mut self);

    /// Installs (or removes) the window-level listeners that cancel the default handling of
    /// `dragenter`, `dragover` and `dragend`.
    fn set_window_drag_suppression(&mut self, enabled: bool);

    /// Wires container-level listeners; the host must forward matching events to the owner.
    fn listen(&mut self, container: &Self::Node, kinds: &[EventKind]);
    fn unlisten(&mut self, container: &Self::Node, kinds: &[EventKind]);

    /// Adds a document-wide stylesheet unless one with the same `id` already exists.
    ///
    /// Returns `true` if the stylesheet was inserted.
    fn inject_stylesheet(&mut self, id: &str, css: &str) -> bool;

    /// Returns the nearest ancestor-or-self of `node` satisfying `pred`.
    fn closest(
        &self,
        node: &Self::Node,
        mut pred: impl FnMut(&Self, &Self::Node) -> bool,
    ) -> Option<Self::Node>
    where
        Self: Sized,
    {
        let mut cur = Some(node.clone());
        while let Some(n) = cur {
            if pred(self, &n) {
                return Some(n);
            }
            cur = self.parent(&n);
        }
        None
    }

    fn index_in_parent(&self, node: &Self::Node) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(&parent).iter().position(|c| c == node)
    }

    fn next_element_sibling(&self, node: &Self::Node) -> Option<Self::Node> {
        let parent = self.parent(node)?;
        let children = self.children(&parent);
        let i = children.iter().position(|c| c == node)?;
        children.get(i + 1).cloned()
    }
}
