//! Integration tests for selector matching against `DomTree`.

use sift_dom::{DomTree, NodeId};
use sift_select::{SelectError, matches, select, select_first, select_from};

/// `<div id="main"><p class="x">1</p><p class="y">2</p></div>`
fn main_fixture() -> (DomTree, NodeId, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let main = tree.append_element(NodeId::ROOT, "div", &[("id", "main")]);
    let x = tree.append_element(main, "p", &[("class", "x")]);
    let _ = tree.append_text(x, "1");
    let y = tree.append_element(main, "p", &[("class", "y")]);
    let _ = tree.append_text(y, "2");
    (tree, main, x, y)
}

/// A `<ul>` with five `<li>` separated by whitespace and one comment.
fn list_fixture() -> (DomTree, Vec<NodeId>) {
    let mut tree = DomTree::new();
    let ul = tree.append_element(NodeId::ROOT, "ul", &[]);
    let mut items = Vec::new();
    for i in 0..5 {
        let _ = tree.append_text(ul, "\n  ");
        if i == 2 {
            let _ = tree.append_comment(ul, "middle");
        }
        items.push(tree.append_element(ul, "li", &[]));
    }
    let _ = tree.append_text(ul, "\n");
    (tree, items)
}

#[test]
fn test_descendant_with_id_and_class() {
    let (tree, _, _, y) = main_fixture();
    assert_eq!(select(&tree, "div#main p.y"), Ok(vec![y]));
}

#[test]
fn test_child_with_nth_child() {
    let (tree, _, x, _) = main_fixture();
    assert_eq!(select(&tree, "div > p:nth-child(1)"), Ok(vec![x]));
}

#[test]
fn test_type_selector_in_document_order() {
    let mut tree = DomTree::new();
    let outer = tree.append_element(NodeId::ROOT, "div", &[]);
    let inner = tree.append_element(outer, "div", &[]);
    let _ = tree.append_element(inner, "span", &[]);
    let last = tree.append_element(NodeId::ROOT, "div", &[]);

    assert_eq!(select(&tree, "div"), Ok(vec![outer, inner, last]));
    assert_eq!(select(&tree, "DIV"), Ok(vec![outer, inner, last]));
}

#[test]
fn test_universal_selector_matches_only_elements() {
    let (tree, main, x, y) = main_fixture();
    assert_eq!(select(&tree, "*"), Ok(vec![main, x, y]));
}

#[test]
fn test_id_selector() {
    let (tree, main, _, _) = main_fixture();
    assert_eq!(select(&tree, "#main"), Ok(vec![main]));
    assert_eq!(select(&tree, "#missing"), Ok(vec![]));
    assert_eq!(select(&tree, "p#main"), Ok(vec![]));
}

#[test]
fn test_multiple_classes_require_all() {
    let mut tree = DomTree::new();
    let both = tree.append_element(NodeId::ROOT, "span", &[("class", "a b")]);
    let _only_a = tree.append_element(NodeId::ROOT, "span", &[("class", "a")]);
    let _only_b = tree.append_element(NodeId::ROOT, "span", &[("class", "b")]);
    let superset = tree.append_element(NodeId::ROOT, "em", &[("class", "c  b\ta")]);

    assert_eq!(select(&tree, ".a.b"), Ok(vec![both, superset]));
    assert_eq!(select(&tree, "span.b.a"), Ok(vec![both]));
}

#[test]
fn test_child_result_is_subset_of_descendant_result() {
    let mut tree = DomTree::new();
    let div = tree.append_element(NodeId::ROOT, "div", &[]);
    let direct = tree.append_element(div, "p", &[]);
    let section = tree.append_element(div, "section", &[]);
    let nested = tree.append_element(section, "p", &[]);
    let _orphan = tree.append_element(NodeId::ROOT, "p", &[]);

    assert_eq!(select(&tree, "div > p"), Ok(vec![direct]));
    assert_eq!(select(&tree, "div p"), Ok(vec![direct, nested]));
    assert_eq!(select(&tree, "div>p"), Ok(vec![direct]));
}

#[test]
fn test_child_chain_relocates_to_parent() {
    let mut tree = DomTree::new();
    let div = tree.append_element(NodeId::ROOT, "div", &[]);
    let section = tree.append_element(div, "section", &[]);
    let p = tree.append_element(section, "p", &[]);
    let stray = tree.append_element(NodeId::ROOT, "section", &[]);
    let _ = tree.append_element(stray, "p", &[]);

    assert_eq!(select(&tree, "div > section > p"), Ok(vec![p]));
}

#[test]
fn test_child_requires_nearest_filter_match_to_be_parent() {
    let mut tree = DomTree::new();
    let nav = tree.append_element(NodeId::ROOT, "ul", &[("class", "nav")]);
    let plain = tree.append_element(nav, "ul", &[]);
    let _deep = tree.append_element(plain, "li", &[]);
    let shallow = tree.append_element(nav, "li", &[]);

    assert_eq!(select(&tree, "ul.nav > li"), Ok(vec![shallow]));
}

#[test]
fn test_first_child_skips_whitespace_and_comments() {
    let (tree, items) = list_fixture();
    assert_eq!(select(&tree, "li:first-child"), Ok(vec![items[0]]));
    assert_eq!(select(&tree, "li:last-child"), Ok(vec![items[4]]));
}

#[test]
fn test_first_child_rejects_non_blank_text_before() {
    let mut tree = DomTree::new();
    let p = tree.append_element(NodeId::ROOT, "p", &[]);
    let _ = tree.append_text(p, "Hello ");
    let _b = tree.append_element(p, "b", &[]);

    assert_eq!(select(&tree, "b:first-child"), Ok(vec![]));
}

#[test]
fn test_nth_child_forms() {
    let (tree, items) = list_fixture();
    let odd = vec![items[0], items[2], items[4]];
    let even = vec![items[1], items[3]];

    assert_eq!(select(&tree, "li:nth-child(odd)"), Ok(odd.clone()));
    assert_eq!(select(&tree, "li:nth-child(2n+1)"), Ok(odd));
    assert_eq!(select(&tree, "li:nth-child(even)"), Ok(even.clone()));
    assert_eq!(select(&tree, "li:nth-child(2n)"), Ok(even));
    assert_eq!(select(&tree, "li:nth-child(3)"), Ok(vec![items[2]]));
    assert_eq!(select(&tree, "li:nth-child(n)"), Ok(items.clone()));
    assert_eq!(
        select(&tree, "li:nth-child(3n + 2)"),
        Ok(vec![items[1], items[4]])
    );
}

#[test]
fn test_nth_child_negative_offset_keeps_sign() {
    let (tree, items) = list_fixture();

    // `3n-1` is `3n+2`: indices 2 and 5, not 1 and 4.
    assert_eq!(
        select(&tree, "li:nth-child(3n-1)"),
        Ok(vec![items[1], items[4]])
    );
    assert_eq!(select(&tree, "li:nth-child(-2)"), Ok(vec![]));
}

#[test]
fn test_nth_child_extreme_offset() {
    let (tree, items) = list_fixture();

    assert_eq!(
        select(&tree, "li:nth-child(2n-9223372036854775807)"),
        Ok(vec![items[0], items[2], items[4]])
    );
    assert_eq!(
        select(&tree, "li:nth-child(2n+9223372036854775807)"),
        Ok(vec![items[0], items[2], items[4]])
    );
    assert!(matches!(
        select(&tree, "li:nth-child(2n-9223372036854775809)"),
        Err(SelectError::InvalidNthExpression { .. })
    ));
}

#[test]
fn test_adjacent_sibling() {
    let mut tree = DomTree::new();
    let body = tree.append_element(NodeId::ROOT, "body", &[]);
    let _h1 = tree.append_element(body, "h1", &[]);
    let follows = tree.append_element(body, "p", &[]);
    let second = tree.append_element(body, "p", &[]);

    assert_eq!(select(&tree, "h1 + p"), Ok(vec![follows]));
    assert_eq!(select(&tree, "h1+p"), Ok(vec![follows]));
    assert_eq!(select(&tree, "p + p"), Ok(vec![second]));
}

#[test]
fn test_adjacent_sibling_does_not_skip_whitespace_text() {
    // The immediate previous sibling must be the match itself; a
    // whitespace text node in between breaks adjacency.
    let mut tree = DomTree::new();
    let body = tree.append_element(NodeId::ROOT, "body", &[]);
    let _h1 = tree.append_element(body, "h1", &[]);
    let _ = tree.append_text(body, "\n");
    let _p = tree.append_element(body, "p", &[]);

    assert_eq!(select(&tree, "h1 + p"), Ok(vec![]));
}

#[test]
fn test_adjacent_then_child_relocates_to_sibling() {
    let mut tree = DomTree::new();
    let article = tree.append_element(NodeId::ROOT, "article", &[]);
    let _h2 = tree.append_element(article, "h2", &[]);
    let p = tree.append_element(article, "p", &[]);
    let aside = tree.append_element(NodeId::ROOT, "aside", &[]);
    let _ = tree.append_element(aside, "h2", &[]);
    let _ = tree.append_element(aside, "p", &[]);

    assert_eq!(select(&tree, "article > h2 + p"), Ok(vec![p]));
}

#[test]
fn test_descendant_checks_only_nearest_matching_ancestor() {
    // <div/> <div#outer><span/><div#inner><p/></div></div>
    // CSS would match `p` through #outer; only #inner is examined here.
    let mut tree = DomTree::new();
    let body = tree.append_element(NodeId::ROOT, "body", &[]);
    let outer = tree.append_element(body, "div", &[("id", "outer")]);
    let _ = tree.append_element(outer, "span", &[]);
    let inner = tree.append_element(outer, "div", &[("id", "inner")]);
    let _p = tree.append_element(inner, "p", &[]);

    assert_eq!(select(&tree, "div:first-child p"), Ok(vec![]));
}

#[test]
fn test_descendant_does_not_relocate_context() {
    // <div><section><p/></section></div>
    // Each descendant step is checked from `p`, so the order of the
    // leftward tokens among p's ancestors is not enforced.
    let mut tree = DomTree::new();
    let div = tree.append_element(NodeId::ROOT, "div", &[]);
    let section = tree.append_element(div, "section", &[]);
    let p = tree.append_element(section, "p", &[]);

    assert_eq!(select(&tree, "div section p"), Ok(vec![p]));
    assert_eq!(select(&tree, "section div p"), Ok(vec![p]));
}

#[test]
fn test_attribute_selectors() {
    let mut tree = DomTree::new();
    let secure = tree.append_element(
        NodeId::ROOT,
        "a",
        &[("href", "https://example.com/logo.png"), ("lang", "en-US")],
    );
    let plain = tree.append_element(
        NodeId::ROOT,
        "a",
        &[("href", "http://example.com"), ("lang", "en"), ("rel", "nofollow external")],
    );
    let bare = tree.append_element(NodeId::ROOT, "a", &[]);

    assert_eq!(select(&tree, "a[href]"), Ok(vec![secure, plain]));
    assert_eq!(select(&tree, "[href^=https]"), Ok(vec![secure]));
    assert_eq!(select(&tree, r#"a[href$=".png"]"#), Ok(vec![secure]));
    assert_eq!(select(&tree, "a[href*=example]"), Ok(vec![secure, plain]));
    assert_eq!(select(&tree, "a[lang|=en]"), Ok(vec![secure, plain]));
    assert_eq!(select(&tree, "a[lang='en']"), Ok(vec![plain]));
    assert_eq!(select(&tree, "a[rel~=external]"), Ok(vec![plain]));
    assert_eq!(select(&tree, "a[rel~=ext]"), Ok(vec![]));
    assert_eq!(select(&tree, "a:not-a-pseudo"), Ok(vec![]));
    assert_eq!(select(&tree, "a"), Ok(vec![secure, plain, bare]));
}

#[test]
fn test_unknown_attribute_operator_checks_existence() {
    let mut tree = DomTree::new();
    let form = tree.append_element(NodeId::ROOT, "form", &[]);
    let text = tree.append_element(form, "input", &[("type", "text")]);
    let check = tree.append_element(form, "input", &[("type", "checkbox")]);
    let _bare = tree.append_element(form, "input", &[]);

    assert_eq!(select(&tree, "input[type!=text]"), Ok(vec![text, check]));
}

#[test]
fn test_attribute_value_with_spaces() {
    let mut tree = DomTree::new();
    let div = tree.append_element(NodeId::ROOT, "div", &[]);
    let img = tree.append_element(div, "img", &[("alt", "two words")]);

    assert_eq!(select(&tree, r#"div img[alt="two words"]"#), Ok(vec![img]));
}

#[test]
fn test_general_sibling_is_unsupported() {
    let (tree, _, _, _) = main_fixture();
    let expected = Err(SelectError::UnsupportedCombinator {
        combinator: "~".to_string(),
    });
    assert_eq!(select(&tree, "a ~ b"), expected);
    assert_eq!(select(&DomTree::new(), "p.x ~ p.y"), expected);
}

#[test]
fn test_malformed_selectors() {
    let (tree, _, _, _) = main_fixture();
    for selector in ["", "   ", "div >", "> p", "p!", "div >> p", "a[]"] {
        assert!(
            matches!(
                select(&tree, selector),
                Err(SelectError::MalformedSelector { .. })
            ),
            "{selector:?} should be malformed"
        );
    }
}

#[test]
fn test_compile_errors_do_not_depend_on_tree() {
    let empty = DomTree::new();
    assert_eq!(
        select(&empty, "a#x#y p"),
        Err(SelectError::MultipleIdsInToken {
            token: "a#x#y".to_string()
        })
    );
    assert_eq!(
        select(&empty, "li:nth-child(first)"),
        Err(SelectError::InvalidNthExpression {
            expression: "first".to_string()
        })
    );
}

#[test]
fn test_select_is_idempotent() {
    let (tree, items) = list_fixture();
    let first = select(&tree, "ul li:nth-child(odd)");
    let second = select(&tree, "ul li:nth-child(odd)");
    assert_eq!(first, second);
    assert_eq!(first, Ok(vec![items[0], items[2], items[4]]));
}

#[test]
fn test_select_from_limits_results_to_scope() {
    let mut tree = DomTree::new();
    let left = tree.append_element(NodeId::ROOT, "div", &[("class", "left")]);
    let inside = tree.append_element(left, "p", &[]);
    let right = tree.append_element(NodeId::ROOT, "div", &[("class", "right")]);
    let _outside = tree.append_element(right, "p", &[]);

    assert_eq!(select_from(&tree, left, "p"), Ok(vec![inside]));
    assert_eq!(select_from(&tree, left, "div.left p"), Ok(vec![inside]));
    assert_eq!(select_from(&tree, left, "div"), Ok(vec![]));
}

#[test]
fn test_select_first_and_matches() {
    let (tree, main, x, y) = main_fixture();
    assert_eq!(select_first(&tree, "p"), Ok(Some(x)));
    assert_eq!(select_first(&tree, "table"), Ok(None));
    assert_eq!(matches(&tree, y, "#main > .y"), Ok(true));
    assert_eq!(matches(&tree, main, "p"), Ok(false));
}
