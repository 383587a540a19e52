//! Human-readable rendering of tree nodes.

use crate::{DomTree, NodeId, NodeType};

/// Render a single node as a one-line summary.
///
/// Elements render as an opening tag with attributes sorted by name, text as
/// a quoted string with visible whitespace, comments as `<!-- ... -->`.
#[must_use]
pub fn format_node(tree: &DomTree, id: NodeId) -> String {
    let Some(node) = tree.get(id) else {
        return String::new();
    };
    match &node.node_type {
        NodeType::Document => "Document".to_string(),
        NodeType::Element(data) => {
            if data.attrs.is_empty() {
                return format!("<{}>", data.tag_name);
            }
            let mut attrs: Vec<(&String, &String)> = data.attrs.iter().collect();
            attrs.sort();
            let attrs: Vec<String> = attrs
                .into_iter()
                .map(|(k, v)| {
                    if v.is_empty() {
                        k.clone()
                    } else {
                        format!("{k}=\"{v}\"")
                    }
                })
                .collect();
            format!("<{} {}>", data.tag_name, attrs.join(" "))
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            format!("\"{display}\"")
        }
        NodeType::Comment(data) => format!("<!-- {data} -->"),
    }
}

/// Print the subtree rooted at `id` to stdout, one node per line.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    println!("{}{}", "  ".repeat(indent), format_node(tree, id));
    for &child_id in tree.children(id) {
        print_tree(tree, child_id, indent + 1);
    }
}
