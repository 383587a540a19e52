//! Loading trees from the JSON document format.
//!
//! Every node is a JSON object tagged by `"type"`:
//!
//! ```text
//! {"type": "document", "children": [
//!   {"type": "element", "tagName": "p", "attributes": {"class": "x"},
//!    "children": [{"type": "text", "content": "hello"}]},
//!   {"type": "comment", "content": "note"}
//! ]}
//! ```
//!
//! A bare element (or text/comment) at the top level is attached directly
//! under a fresh Document node.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

/// Errors raised while loading a document.
#[derive(Debug, Error)]
pub enum DomError {
    /// The input was not valid JSON, or did not have the document shape.
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A `document` node appeared somewhere other than the top level.
    #[error("nested document node at depth {depth}")]
    NestedDocument {
        /// Depth (0 = top level) at which the node was found.
        depth: usize,
    },
}

/// One node of the serialized document format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DocumentNode {
    /// The document root.
    Document {
        /// Top-level nodes.
        #[serde(default)]
        children: Vec<DocumentNode>,
    },
    /// An element.
    Element {
        /// Local name, e.g. `div`.
        #[serde(rename = "tagName")]
        tag_name: String,
        /// Attribute name/value pairs.
        #[serde(default)]
        attributes: AttributesMap,
        /// Child nodes in document order.
        #[serde(default)]
        children: Vec<DocumentNode>,
    },
    /// Character data.
    Text {
        /// The text itself, whitespace preserved.
        content: String,
    },
    /// A comment.
    Comment {
        /// Comment body.
        content: String,
    },
}

impl DomTree {
    /// Parse a JSON document into a new tree.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Json`] if the input is not a valid document and
    /// [`DomError::NestedDocument`] if a `document` node is nested.
    pub fn from_json(json: &str) -> Result<Self, DomError> {
        let node: DocumentNode = serde_json::from_str(json)?;
        Self::from_document(&node)
    }

    /// Build a tree from an already deserialized document.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NestedDocument`] if a `document` node is nested.
    pub fn from_document(node: &DocumentNode) -> Result<Self, DomError> {
        let mut tree = Self::new();
        match node {
            DocumentNode::Document { children } => {
                for child in children {
                    tree.attach(NodeId::ROOT, child, 1)?;
                }
            }
            other => tree.attach(NodeId::ROOT, other, 0)?,
        }
        Ok(tree)
    }

    fn attach(&mut self, parent: NodeId, node: &DocumentNode, depth: usize) -> Result<(), DomError> {
        let node_type = match node {
            DocumentNode::Document { .. } => return Err(DomError::NestedDocument { depth }),
            DocumentNode::Element {
                tag_name,
                attributes,
                ..
            } => NodeType::Element(ElementData {
                tag_name: tag_name.clone(),
                attrs: attributes.clone(),
            }),
            DocumentNode::Text { content } => NodeType::Text(content.clone()),
            DocumentNode::Comment { content } => NodeType::Comment(content.clone()),
        };
        let id = self.alloc(node_type);
        self.append_child(parent, id);

        if let DocumentNode::Element { children, .. } = node {
            for child in children {
                self.attach(id, child, depth + 1)?;
            }
        }
        Ok(())
    }
}
