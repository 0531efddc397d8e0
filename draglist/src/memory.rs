//! An in-memory document implementing [`Host`].
//!
//! Layout is a deterministic vertical stack: an element's rect starts at its parent's origin,
//! offset downwards by the heights of the siblings before it. That is enough for reorders to move
//! elements, which is all the FLIP animator observes.
//!
//! Every inline style write is recorded in [`MemoryDom::style_log`] for inspection. Long-lived
//! headless hosts should turn that off with [`MemoryDom::set_style_logging`].

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::{EventKind, Host, Rect, StyleProperty};

const DEFAULT_HEIGHT: f32 = 20.0;
const DEFAULT_WIDTH: f32 = 200.0;

/// Handle to a [`MemoryDom`] node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// One recorded [`Host::set_style`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleWrite {
    pub node: NodeId,
    pub property: StyleProperty,
    pub value: String,
}

#[derive(Clone, Debug)]
struct Element {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<StyleProperty, String>,
    height: f32,
}

#[derive(Clone, Debug)]
pub struct MemoryDom {
    nodes: Vec<Element>,
    root: NodeId,
    style_log: Vec<StyleWrite>,
    log_styles: bool,
    listeners: BTreeMap<NodeId, Vec<EventKind>>,
    stylesheets: BTreeMap<String, String>,
    window_suppression: bool,
    suppression_toggles: usize,
    selection_clears: usize,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Creates a document with an empty `body` root at the viewport origin.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            style_log: Vec::new(),
            log_styles: true,
            listeners: BTreeMap::new(),
            stylesheets: BTreeMap::new(),
            window_suppression: false,
            suppression_toggles: 0,
            selection_clears: 0,
        };
        dom.root = dom.create_element("body");
        dom
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Element {
            tag: tag.to_string(),
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            styles: BTreeMap::new(),
            height: DEFAULT_HEIGHT,
        });
        id
    }

    /// Appends `child` to `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(&parent, &child, None);
    }

    /// Creates an element under `parent` with the given class list (space separated).
    pub fn element(&mut self, parent: NodeId, tag: &str, class: &str) -> NodeId {
        let id = self.create_element(tag);
        for c in class.split_whitespace() {
            self.add_class(&id, c);
        }
        self.append_child(parent, id);
        id
    }

    /// Creates a list item: an element with `class` and a `data-id`.
    pub fn item(&mut self, parent: NodeId, class: &str, id: &str) -> NodeId {
        let node = self.element(parent, "div", class);
        self.set_attribute(&node, crate::ITEM_ID_ATTR, id);
        node
    }

    /// Detaches `node` from its parent. The handle stays valid.
    pub fn remove(&mut self, node: NodeId) {
        self.detach(node);
    }

    pub fn set_height(&mut self, node: NodeId, height: f32) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.height = height;
        }
    }

    pub fn tag(&self, node: NodeId) -> &str {
        self.nodes.get(node.0).map_or("", |n| n.tag.as_str())
    }

    pub fn style(&self, node: NodeId, property: StyleProperty) -> Option<&str> {
        self.nodes
            .get(node.0)
            .and_then(|n| n.styles.get(&property))
            .map(String::as_str)
    }

    pub fn style_log(&self) -> &[StyleWrite] {
        &self.style_log
    }

    /// Enables or disables recording into [`MemoryDom::style_log`]. Disabling also drops what was
    /// recorded so far.
    pub fn set_style_logging(&mut self, enabled: bool) {
        self.log_styles = enabled;
        if !enabled {
            self.style_log.clear();
        }
    }

    pub fn clear_style_log(&mut self) {
        self.style_log.clear();
    }

    pub fn listeners(&self, node: NodeId) -> &[EventKind] {
        self.listeners.get(&node).map_or(&[], Vec::as_slice)
    }

    pub fn stylesheet(&self, id: &str) -> Option<&str> {
        self.stylesheets.get(id).map(String::as_str)
    }

    pub fn stylesheet_count(&self) -> usize {
        self.stylesheets.len()
    }

    pub fn window_suppression(&self) -> bool {
        self.window_suppression
    }

    /// How many times window suppression has been switched on or off.
    pub fn suppression_toggles(&self) -> usize {
        self.suppression_toggles
    }

    pub fn selection_clears(&self) -> usize {
        self.selection_clears
    }

    /// Ids of `parent`'s children in document order (children without `data-id` are skipped).
    pub fn child_ids(&self, parent: NodeId) -> Vec<String> {
        self.children(&parent)
            .iter()
            .filter_map(|c| self.attribute(c, crate::ITEM_ID_ATTR))
            .collect()
    }

    /// Every node carrying `class`, in creation order.
    pub fn with_class(&self, class: &str) -> Vec<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|n| self.has_class(n, class))
            .collect()
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(node.0).and_then(|n| n.parent) else {
            return;
        };
        self.nodes[parent.0].children.retain(|c| *c != node);
        self.nodes[node.0].parent = None;
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.nodes.get(n.0).and_then(|n| n.parent);
        }
        false
    }
}

impl Host for MemoryDom {
    type Node = NodeId;

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes
            .get(node.0)
            .and_then(|n| n.attributes.get(name))
            .cloned()
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.attributes.remove(name);
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.nodes
            .get(node.0)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            if !n.classes.iter().any(|c| c == class) {
                n.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.classes.retain(|c| c != class);
        }
    }

    fn bounding_rect(&self, node: &NodeId) -> Rect {
        let Some(n) = self.nodes.get(node.0) else {
            return Rect::default();
        };
        let height = n.height;
        let Some(parent) = n.parent else {
            // Detached nodes (other than the root) have no box.
            if *node == self.root {
                return Rect {
                    x: 0.0,
                    y: 0.0,
                    width: DEFAULT_WIDTH,
                    height,
                };
            }
            return Rect::default();
        };
        let origin = self.bounding_rect(&parent);
        let offset: f32 = self.nodes[parent.0]
            .children
            .iter()
            .take_while(|c| **c != *node)
            .map(|c| self.nodes[c.0].height)
            .sum();
        Rect {
            x: origin.x,
            y: origin.y + offset,
            width: origin.width,
            height,
        }
    }

    fn set_style(&mut self, node: &NodeId, property: StyleProperty, value: &str) {
        let Some(n) = self.nodes.get_mut(node.0) else {
            return;
        };
        if value.is_empty() {
            n.styles.remove(&property);
        } else {
            n.styles.insert(property, value.to_string());
        }
        if self.log_styles {
            self.style_log.push(StyleWrite {
                node: *node,
                property,
                value: value.to_string(),
            });
        }
    }

    fn insert_before(&mut self, parent: &NodeId, node: &NodeId, reference: Option<&NodeId>) {
        if self.nodes.get(parent.0).is_none() || self.nodes.get(node.0).is_none() {
            return;
        }
        debug_assert!(
            !self.is_ancestor_or_self(*node, *parent),
            "MemoryDom: cannot insert a node into its own subtree"
        );
        if self.is_ancestor_or_self(*node, *parent) {
            return;
        }
        self.detach(*node);
        let siblings = &mut self.nodes[parent.0].children;
        let at = reference
            .and_then(|r| siblings.iter().position(|c| c == r))
            .unwrap_or(siblings.len());
        siblings.insert(at, *node);
        self.nodes[node.0].parent = Some(*parent);
    }

    fn clear_selection(&mut self) {
        self.selection_clears += 1;
    }

    fn set_window_drag_suppression(&mut self, enabled: bool) {
        if self.window_suppression != enabled {
            self.suppression_toggles += 1;
        }
        self.window_suppression = enabled;
    }

    fn listen(&mut self, container: &NodeId, kinds: &[EventKind]) {
        let wired = self.listeners.entry(*container).or_default();
        for kind in kinds {
            if !wired.contains(kind) {
                wired.push(*kind);
            }
        }
    }

    fn unlisten(&mut self, container: &NodeId, kinds: &[EventKind]) {
        if let Some(wired) = self.listeners.get_mut(container) {
            wired.retain(|k| !kinds.contains(k));
            if wired.is_empty() {
                self.listeners.remove(container);
            }
        }
    }

    fn inject_stylesheet(&mut self, id: &str, css: &str) -> bool {
        if self.stylesheets.contains_key(id) {
            return false;
        }
        self.stylesheets.insert(id.to_string(), css.to_string());
        true
    }
}
