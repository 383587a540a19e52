//! Right-to-left CSS selector compiler and matcher.
//!
//! Given a selector string and any tree implementing [`TreeHandle`],
//! [`select`] returns the nodes the selector designates, without a browser
//! or a cascade engine.
//!
//! # Scope
//!
//! - **Scanner** - consumes the selector from the right, alternating
//!   simple-selector tokens and combinators
//! - **Compiler** - turns one token (`div.foo#bar[x=y]:first-child`) into a
//!   tag/id/class filter plus attribute and pseudo-class predicates
//! - **Predicates** - `[attr]`, `=`, `~=`, `^=`, `$=`, `*=`, `|=`,
//!   `:first-child`, `:last-child`, `:nth-child(odd|even|An+B)`
//! - **Engine** - descendant (` `), child (`>`) and adjacent sibling (`+`)
//!   combinators
//!
//! # Not Supported
//!
//! - The general sibling combinator (`~`) is recognised and rejected with
//!   [`SelectError::UnsupportedCombinator`]
//! - Specificity, pseudo-elements, namespaces
//! - Unknown pseudo-classes compile but never match
//!
//! # Example
//!
//! ```
//! use sift_dom::{DomTree, NodeId};
//! use sift_select::select;
//!
//! let mut tree = DomTree::new();
//! let main = tree.append_element(NodeId::ROOT, "div", &[("id", "main")]);
//! let x = tree.append_element(main, "p", &[("class", "x")]);
//! let y = tree.append_element(main, "p", &[("class", "y")]);
//!
//! assert_eq!(select(&tree, "div#main p.y").unwrap(), vec![y]);
//! assert_eq!(select(&tree, "div > p:nth-child(1)").unwrap(), vec![x]);
//! ```

/// Compiling a single simple-selector token.
pub mod compiler;
/// The combinator matching engine and the `select` entry points.
pub mod engine;
/// Error type.
pub mod error;
/// Attribute and pseudo-class predicates.
pub mod predicate;
/// Right-to-left scanning of selector strings.
pub mod scanner;
/// Structural index evaluation for `nth-child` and friends.
pub mod structural;
/// The read-only tree capability and its `DomTree` implementation.
pub mod tree;

pub use compiler::{CompiledSimpleSelector, compile_simple_selector};
pub use engine::{MatchContext, matches, select, select_first, select_from};
pub use error::SelectError;
pub use predicate::{AttributeOperator, AttributePredicate, NthExpr, Predicate, PseudoClass};
pub use scanner::{Combinator, ScanState, Scanner, Segment};
pub use structural::{is_first_content_node, is_insignificant, is_last_content_node, structural_index};
pub use tree::{NodeFilter, NodeKind, TagConstraint, TreeHandle};
