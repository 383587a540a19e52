//! The combinator matching engine.
//!
//! Matching runs right to left. The rightmost token seeds one
//! [`MatchContext`] per matching node in the searched subtree; every further
//! token/combinator pair then narrows those contexts by walking parent and
//! sibling links from each context's current candidates. Only the nearest
//! ancestor or sibling passing the tag/id/class filter is examined at each
//! step; there is no backtracking.

use std::collections::HashSet;

use crate::compiler::CompiledSimpleSelector;
use crate::error::SelectError;
use crate::scanner::{Combinator, Scanner};
use crate::tree::TreeHandle;

/// One potential result while leftward constraints are verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchContext<N> {
    anchor: N,
    candidates: Vec<N>,
}

impl<N: Copy + Eq> MatchContext<N> {
    /// Seed a context from a node matching the rightmost token.
    #[must_use]
    pub fn new(anchor: N) -> Self {
        Self {
            anchor,
            candidates: vec![anchor],
        }
    }

    /// The node returned if this context survives.
    #[must_use]
    pub const fn anchor(&self) -> N {
        self.anchor
    }

    /// The nodes the next leftward constraint is checked from.
    #[must_use]
    pub fn candidates(&self) -> &[N] {
        &self.candidates
    }

    /// Map every candidate through `relate`, keeping the survivors.
    /// Returns `None` when nothing survives.
    fn narrow(mut self, mut relate: impl FnMut(N) -> Option<N>) -> Option<Self> {
        let mut survivors: Vec<N> = Vec::with_capacity(self.candidates.len());
        for candidate in self.candidates {
            if let Some(next) = relate(candidate) {
                if !survivors.contains(&next) {
                    survivors.push(next);
                }
            }
        }
        if survivors.is_empty() {
            return None;
        }
        self.candidates = survivors;
        Some(self)
    }
}

/// Find every node in the tree designated by `selector`.
///
/// The whole tree below [`TreeHandle::root`] is searched. Results are in
/// document order of the rightmost token's matches, without duplicates.
///
/// # Errors
///
/// Any [`SelectError`]; errors depend only on the selector, never on the tree.
pub fn select<T: TreeHandle + ?Sized>(
    tree: &T,
    selector: &str,
) -> Result<Vec<T::NodeRef>, SelectError> {
    select_from(tree, tree.root(), selector)
}

/// Like [`select`], but only nodes strictly below `scope` can be results.
///
/// Leftward constraints may still be satisfied by nodes outside `scope`.
///
/// # Errors
///
/// Any [`SelectError`].
pub fn select_from<T: TreeHandle + ?Sized>(
    tree: &T,
    scope: T::NodeRef,
    selector: &str,
) -> Result<Vec<T::NodeRef>, SelectError> {
    let mut scanner = Scanner::new(selector);

    let subject = CompiledSimpleSelector::compile(scanner.next_token()?)?;
    let mut contexts: Vec<MatchContext<T::NodeRef>> = tree
        .find_all(scope, subject.filter())
        .into_iter()
        .filter(|&node| subject.matches_predicates(tree, node))
        .map(MatchContext::new)
        .collect();

    while !scanner.is_exhausted() {
        let combinator = scanner.next_combinator()?;
        if combinator == Combinator::GeneralSibling {
            return Err(SelectError::UnsupportedCombinator {
                combinator: combinator.to_string(),
            });
        }
        let compiled = CompiledSimpleSelector::compile(scanner.next_token()?)?;
        contexts = contexts
            .into_iter()
            .filter_map(|context| {
                context.narrow(|candidate| relate(tree, candidate, combinator, &compiled))
            })
            .collect();
    }

    let mut seen = HashSet::new();
    Ok(contexts
        .into_iter()
        .map(|context| context.anchor)
        .filter(|anchor| seen.insert(*anchor))
        .collect())
}

/// The first result of [`select`], if any.
///
/// # Errors
///
/// Any [`SelectError`].
pub fn select_first<T: TreeHandle + ?Sized>(
    tree: &T,
    selector: &str,
) -> Result<Option<T::NodeRef>, SelectError> {
    Ok(select(tree, selector)?.into_iter().next())
}

/// Whether `node` is among the results of [`select`].
///
/// # Errors
///
/// Any [`SelectError`].
pub fn matches<T: TreeHandle + ?Sized>(
    tree: &T,
    node: T::NodeRef,
    selector: &str,
) -> Result<bool, SelectError> {
    Ok(select(tree, selector)?.contains(&node))
}

/// Check one candidate against the token to its left.
///
/// Returns the node the following constraint should be checked from:
/// the candidate itself for a descendant step, the parent for a child step
/// and the previous sibling for an adjacent-sibling step.
fn relate<T: TreeHandle + ?Sized>(
    tree: &T,
    candidate: T::NodeRef,
    combinator: Combinator,
    compiled: &CompiledSimpleSelector,
) -> Option<T::NodeRef> {
    match combinator {
        Combinator::Descendant => tree
            .find_parent(candidate, compiled.filter())
            .filter(|&ancestor| compiled.matches_predicates(tree, ancestor))
            .map(|_| candidate),
        Combinator::Child => {
            let parent = tree.parent(candidate)?;
            tree.find_parent(candidate, compiled.filter())
                .filter(|&ancestor| ancestor == parent)
                .filter(|&ancestor| compiled.matches_predicates(tree, ancestor))
        }
        Combinator::AdjacentSibling => {
            let previous = tree.prev_sibling(candidate)?;
            tree.find_previous_sibling(candidate, compiled.filter())
                .filter(|&sibling| sibling == previous)
                .filter(|&sibling| compiled.matches_predicates(tree, sibling))
        }
        // Rejected before any narrowing takes place.
        Combinator::GeneralSibling => None,
    }
}
