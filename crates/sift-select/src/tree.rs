//! The read-only tree capability the engine runs against.
//!
//! The engine never owns or mutates a tree. Hosts implement [`TreeHandle`]
//! for their own node storage and pass it to [`select`](crate::select);
//! [`DomTree`] from `sift-dom` implements it out of the box.

use std::fmt::Debug;
use std::hash::Hash;

use sift_dom::{DomTree, NodeId, NodeType};

/// The kind of a tree node, as far as selector matching cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The root of a document. Never matched by a selector.
    Document,
    /// An element: has a tag name and attributes.
    Element,
    /// Character data.
    Text,
    /// A comment.
    Comment,
}

/// The type part of a simple selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagConstraint {
    /// No tag name (or `*`) was given.
    #[default]
    Any,
    /// A tag name, compared ASCII case-insensitively.
    Named(String),
}

impl TagConstraint {
    /// Whether an element with tag `tag_name` satisfies this constraint.
    #[must_use]
    pub fn matches(&self, tag_name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Named(name) => name.eq_ignore_ascii_case(tag_name),
        }
    }
}

/// The `(tag-or-any, id, classes)` triple that the tree search primitives
/// filter on.
///
/// A node passes when it is an element, its tag satisfies `tag`, its `id`
/// attribute equals `id` (if given), and every name in `classes` appears
/// among its class attribute values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeFilter {
    /// Tag constraint.
    pub tag: TagConstraint,
    /// Required id, if any.
    pub id: Option<String>,
    /// Required class names, in selector order, without duplicates.
    pub classes: Vec<String>,
}

impl NodeFilter {
    /// Check `node` against the filter.
    pub fn matches<T: TreeHandle + ?Sized>(&self, tree: &T, node: T::NodeRef) -> bool {
        if tree.kind(node) != NodeKind::Element {
            return false;
        }
        if !tree.tag_name(node).is_some_and(|tag| self.tag.matches(tag)) {
            return false;
        }
        if self
            .id
            .as_deref()
            .is_some_and(|id| tree.attribute(node, "id") != Some(id))
        {
            return false;
        }
        if self.classes.is_empty() {
            return true;
        }
        let values = tree.attribute_values(node, "class");
        self.classes
            .iter()
            .all(|class| values.contains(&class.as_str()))
    }
}

/// Read-only access to a tree of element-like nodes.
///
/// Node references are cheap copyable handles into the implementor's storage.
/// Sibling and parent links are lookups only; nothing here transfers
/// ownership.
///
/// The search methods have default implementations in terms of the
/// structural accessors. Implementors with an index may override them, but
/// must keep document order and the "only elements match" rule.
pub trait TreeHandle {
    /// A reference to one node of the tree.
    type NodeRef: Copy + Eq + Hash + Debug;

    /// The node whose subtree `select` searches.
    fn root(&self) -> Self::NodeRef;

    /// What kind of node this is.
    fn kind(&self, node: Self::NodeRef) -> NodeKind;

    /// Tag name of an element, `None` for every other kind.
    fn tag_name(&self, node: Self::NodeRef) -> Option<&str>;

    /// Raw value of an attribute of an element.
    fn attribute(&self, node: Self::NodeRef, name: &str) -> Option<&str>;

    /// Character data of a text or comment node.
    fn text(&self, node: Self::NodeRef) -> Option<&str>;

    /// The parent of a node.
    fn parent(&self, node: Self::NodeRef) -> Option<Self::NodeRef>;

    /// The sibling immediately before a node, of any kind.
    fn prev_sibling(&self, node: Self::NodeRef) -> Option<Self::NodeRef>;

    /// The sibling immediately after a node, of any kind.
    fn next_sibling(&self, node: Self::NodeRef) -> Option<Self::NodeRef>;

    /// Children of a node in document order.
    fn children(&self, node: Self::NodeRef) -> impl Iterator<Item = Self::NodeRef> + '_;

    /// Values of a multi-valued attribute such as `class`, split on ASCII
    /// whitespace. Empty when the attribute is absent.
    fn attribute_values(&self, node: Self::NodeRef, name: &str) -> Vec<&str> {
        self.attribute(node, name)
            .map(|value| value.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    /// All strict descendants of `scope` passing `filter`, in document order.
    fn find_all(&self, scope: Self::NodeRef, filter: &NodeFilter) -> Vec<Self::NodeRef> {
        let mut found = Vec::new();
        let mut stack: Vec<Self::NodeRef> = self.children(scope).collect();
        stack.reverse();
        while let Some(node) = stack.pop() {
            if filter.matches(self, node) {
                found.push(node);
            }
            let first = stack.len();
            stack.extend(self.children(node));
            stack[first..].reverse();
        }
        found
    }

    /// The nearest strict ancestor of `node` passing `filter`.
    fn find_parent(&self, node: Self::NodeRef, filter: &NodeFilter) -> Option<Self::NodeRef> {
        let mut current = self.parent(node);
        while let Some(ancestor) = current {
            if filter.matches(self, ancestor) {
                return Some(ancestor);
            }
            current = self.parent(ancestor);
        }
        None
    }

    /// The nearest previous sibling of `node` passing `filter`.
    fn find_previous_sibling(
        &self,
        node: Self::NodeRef,
        filter: &NodeFilter,
    ) -> Option<Self::NodeRef> {
        let mut current = self.prev_sibling(node);
        while let Some(sibling) = current {
            if filter.matches(self, sibling) {
                return Some(sibling);
            }
            current = self.prev_sibling(sibling);
        }
        None
    }
}

impl TreeHandle for DomTree {
    type NodeRef = NodeId;

    fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        match self.get(node).map(|n| &n.node_type) {
            Some(NodeType::Element(_)) => NodeKind::Element,
            Some(NodeType::Text(_)) => NodeKind::Text,
            Some(NodeType::Comment(_)) => NodeKind::Comment,
            Some(NodeType::Document) | None => NodeKind::Document,
        }
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.as_element(node).map(|e| e.tag_name.as_str())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.as_element(node)
            .and_then(|e| e.attrs.get(name))
            .map(String::as_str)
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.as_text(node).or_else(|| self.as_comment(node))
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        Self::parent(self, node)
    }

    fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        Self::prev_sibling(self, node)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        Self::next_sibling(self, node)
    }

    fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        Self::children(self, node).iter().copied()
    }

    fn find_all(&self, scope: NodeId, filter: &NodeFilter) -> Vec<NodeId> {
        self.descendants(scope)
            .filter(|&id| filter.matches(self, id))
            .collect()
    }
}
