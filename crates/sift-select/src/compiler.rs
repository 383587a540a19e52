//! Compiling one simple-selector token.
//!
//! A token such as `div.foo#bar[x=y]:first-child` is taken apart in a fixed
//! order: attribute clauses first (and cut out of the token, so that `.`,
//! `#` or `:` inside a quoted value cannot leak into other constraints),
//! then pseudo-classes (also cut out), then the leading tag name, the id and
//! the classes from what is left.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::SelectError;
use crate::predicate::{AttributeOperator, AttributePredicate, Predicate, PseudoClass};
use crate::tree::{NodeFilter, TagConstraint, TreeHandle};

/// `[name]`, `[name OP= value]` with the value bare, single- or double-quoted.
/// Any run of punctuation before `=` is captured as the operator, so that
/// unknown operators such as `!=` reach [`AttributeOperator::from_symbol`].
static ATTRIBUTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\[\s*(?P<name>[\w:.-]+)\s*(?:(?P<operator>[^\w\s\]"'=:.-]*=)\s*(?:"(?P<double>[^"]*)"|'(?P<single>[^']*)'|(?P<bare>[^\]\s"']*))\s*)?\]"#,
    )
    .unwrap_or_else(|_| unreachable!())
});

/// `:name` or `:name(argument)`.
static PSEUDO_CLASS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":(?P<clause>(?:[^:.#(*\[]|\([^)]*\))+)").unwrap_or_else(|_| unreachable!())
});

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*").unwrap_or_else(|_| unreachable!()));

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([A-Za-z0-9_-]+)").unwrap_or_else(|_| unreachable!()));

static CLASS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.([A-Za-z0-9_-]+)").unwrap_or_else(|_| unreachable!()));

/// A simple selector ready for matching.
///
/// The tag/id/class triple is kept as a [`NodeFilter`] so it can be handed
/// straight to the tree search primitives; attribute and pseudo-class
/// clauses are checked afterwards on whatever node the search returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSimpleSelector {
    filter: NodeFilter,
    predicates: Vec<Predicate>,
}

impl CompiledSimpleSelector {
    /// Compile one token.
    ///
    /// # Errors
    ///
    /// - [`SelectError::MultipleIdsInToken`] for more than one `#id`
    /// - [`SelectError::InvalidNthExpression`] for a bad `nth-child` argument
    /// - [`SelectError::MalformedSelector`] for a bracket clause that is not
    ///   a valid attribute selector
    pub fn compile(token: &str) -> Result<Self, SelectError> {
        let mut predicates = Vec::new();

        for caps in ATTRIBUTE_PATTERN.captures_iter(token) {
            let operator = caps
                .name("operator")
                .map_or(AttributeOperator::Exists, |m| {
                    AttributeOperator::from_symbol(m.as_str())
                });
            let value = ["double", "single", "bare"]
                .iter()
                .find_map(|group| caps.name(group))
                .map(|m| m.as_str());
            predicates.push(Predicate::Attribute(AttributePredicate::new(
                operator,
                &caps["name"],
                value,
            )));
        }
        let rest = ATTRIBUTE_PATTERN.replace_all(token, "");
        if rest.contains(['[', ']']) {
            return Err(SelectError::malformed(token));
        }

        for caps in PSEUDO_CLASS_PATTERN.captures_iter(&rest) {
            predicates.push(Predicate::PseudoClass(PseudoClass::parse(&caps["clause"])?));
        }
        let rest = PSEUDO_CLASS_PATTERN.replace_all(&rest, "");

        let tag = TAG_PATTERN
            .find(&rest)
            .map_or(TagConstraint::Any, |m| TagConstraint::Named(m.as_str().to_string()));

        let mut ids = ID_PATTERN.captures_iter(&rest).map(|caps| caps[1].to_string());
        let id = ids.next();
        if ids.next().is_some() {
            return Err(SelectError::MultipleIdsInToken {
                token: token.to_string(),
            });
        }

        let mut classes: Vec<String> = Vec::new();
        for caps in CLASS_PATTERN.captures_iter(&rest) {
            if !classes.iter().any(|c| c == &caps[1]) {
                classes.push(caps[1].to_string());
            }
        }

        Ok(Self {
            filter: NodeFilter { tag, id, classes },
            predicates,
        })
    }

    /// The tag/id/class triple.
    #[must_use]
    pub const fn filter(&self) -> &NodeFilter {
        &self.filter
    }

    /// Tag constraint of the token.
    #[must_use]
    pub const fn tag(&self) -> &TagConstraint {
        &self.filter.tag
    }

    /// The `#id` of the token, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.filter.id.as_deref()
    }

    /// Class names, in the order first written.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.filter.classes
    }

    /// Attribute and pseudo-class predicates, in the order written.
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Whether every attribute and pseudo-class predicate holds for `node`.
    pub fn matches_predicates<T: TreeHandle + ?Sized>(&self, tree: &T, node: T::NodeRef) -> bool {
        self.predicates.iter().all(|p| p.matches(tree, node))
    }

    /// Whether `node` satisfies the whole token.
    pub fn matches<T: TreeHandle + ?Sized>(&self, tree: &T, node: T::NodeRef) -> bool {
        self.filter.matches(tree, node) && self.matches_predicates(tree, node)
    }
}

impl FromStr for CompiledSimpleSelector {
    type Err = SelectError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::compile(token)
    }
}

/// Compile one simple-selector token. See [`CompiledSimpleSelector::compile`].
///
/// # Errors
///
/// Same as [`CompiledSimpleSelector::compile`].
pub fn compile_simple_selector(token: &str) -> Result<CompiledSimpleSelector, SelectError> {
    CompiledSimpleSelector::compile(token)
}
