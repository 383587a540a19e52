//! Structural position of a node among its siblings.
//!
//! Whitespace-only text and comments are not content: they are skipped when
//! deciding whether a node is first or last, and never counted by
//! [`structural_index`].

use crate::tree::{NodeKind, TreeHandle};

/// Whether a node is whitespace-only text or a comment.
pub fn is_insignificant<T: TreeHandle + ?Sized>(tree: &T, node: T::NodeRef) -> bool {
    match tree.kind(node) {
        NodeKind::Comment => true,
        NodeKind::Text => tree.text(node).is_none_or(|text| text.trim().is_empty()),
        NodeKind::Document | NodeKind::Element => false,
    }
}

/// True iff every sibling before `node` is insignificant.
pub fn is_first_content_node<T: TreeHandle + ?Sized>(tree: &T, node: T::NodeRef) -> bool {
    let mut current = tree.prev_sibling(node);
    while let Some(sibling) = current {
        if !is_insignificant(tree, sibling) {
            return false;
        }
        current = tree.prev_sibling(sibling);
    }
    true
}

/// True iff every sibling after `node` is insignificant.
pub fn is_last_content_node<T: TreeHandle + ?Sized>(tree: &T, node: T::NodeRef) -> bool {
    let mut current = tree.next_sibling(node);
    while let Some(sibling) = current {
        if !is_insignificant(tree, sibling) {
            return false;
        }
        current = tree.next_sibling(sibling);
    }
    true
}

/// The 1-based position of `node` among its content siblings.
///
/// Counts `node` itself plus every significant previous sibling. Non-blank
/// text counts as content, so `<p>x<b/></p>` puts `b` at index 2.
pub fn structural_index<T: TreeHandle + ?Sized>(tree: &T, node: T::NodeRef) -> usize {
    let mut index = usize::from(!is_insignificant(tree, node));
    let mut current = tree.prev_sibling(node);
    while let Some(sibling) = current {
        if !is_insignificant(tree, sibling) {
            index += 1;
        }
        current = tree.prev_sibling(sibling);
    }
    index
}
