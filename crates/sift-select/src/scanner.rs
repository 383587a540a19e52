//! Right-to-left scanning of a selector string.
//!
//! The scanner alternates between two states. In `ExpectToken` it cuts the
//! rightmost simple-selector token off the remaining string; in
//! `ExpectCombinator` it cuts the trailing combinator symbol, or reports an
//! implicit descendant combinator when the remainder ends in a token.

use std::sync::LazyLock;

use regex::Regex;
use strum_macros::{Display, EnumString};

use crate::error::SelectError;

/// A maximal trailing run of token characters, parenthesised groups and
/// bracketed attribute clauses. `+` is only a token character inside
/// parentheses, e.g. `nth-child(2n+1)`.
static SELECTOR_TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[A-Za-z0-9_\-#.:*]|\([^()]*\)|\[[^\]]*\])+$").unwrap_or_else(|_| unreachable!())
});

static COMBINATOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[>+~]+$").unwrap_or_else(|_| unreachable!()));

/// Relationship between two adjacent simple selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Combinator {
    /// Whitespace: `A B`.
    #[strum(serialize = " ")]
    Descendant,
    /// `A > B`.
    #[strum(serialize = ">")]
    Child,
    /// `A + B`.
    #[strum(serialize = "+")]
    AdjacentSibling,
    /// `A ~ B`. Recognised, never matched.
    #[strum(serialize = "~")]
    GeneralSibling,
}

/// Which kind of piece the scanner hands out next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ScanState {
    /// The next piece is a simple-selector token.
    ExpectToken,
    /// The next piece is a combinator.
    ExpectCombinator,
}

/// One piece of a selector, in right-to-left order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A simple-selector token such as `li.item:first-child`.
    Token(&'a str),
    /// A combinator between two tokens.
    Combinator(Combinator),
}

/// Consumes a selector from the right.
///
/// ```
/// use sift_select::{Combinator, Scanner, Segment};
///
/// let pieces: Vec<Segment<'_>> = Scanner::new("div#main > p.y")
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(
///     pieces,
///     vec![
///         Segment::Token("p.y"),
///         Segment::Combinator(Combinator::Child),
///         Segment::Token("div#main"),
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    remaining: &'a str,
    state: ScanState,
    failed: bool,
}

impl<'a> Scanner<'a> {
    /// Start scanning `selector`. Surrounding whitespace is ignored.
    #[must_use]
    pub fn new(selector: &'a str) -> Self {
        Self {
            remaining: selector.trim(),
            state: ScanState::ExpectToken,
            failed: false,
        }
    }

    /// The part of the selector not yet consumed.
    #[must_use]
    pub const fn remaining(&self) -> &'a str {
        self.remaining
    }

    /// What the scanner expects to hand out next.
    #[must_use]
    pub const fn state(&self) -> ScanState {
        self.state
    }

    /// Whether the whole selector has been consumed.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Remove and return the rightmost simple-selector token.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::MalformedSelector`] when the remainder is
    /// empty or does not end in a valid token.
    pub fn next_token(&mut self) -> Result<&'a str, SelectError> {
        let found = SELECTOR_TOKEN_PATTERN
            .find(self.remaining)
            .ok_or_else(|| SelectError::malformed(self.remaining))?;
        let token = found.as_str();
        self.remaining = self.remaining[..found.start()].trim_end();
        self.state = ScanState::ExpectCombinator;
        Ok(token)
    }

    /// Remove and return the trailing combinator.
    ///
    /// Without an explicit `>`, `+` or `~`, the remainder ends in a token and
    /// the combinator is the implicit [`Combinator::Descendant`].
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::MalformedSelector`] for a run of several
    /// combinator symbols such as `>>` or `>+`, and for a combinator with
    /// no token to its left, as in `> p`.
    pub fn next_combinator(&mut self) -> Result<Combinator, SelectError> {
        self.state = ScanState::ExpectToken;
        let Some(found) = COMBINATOR_PATTERN.find(self.remaining) else {
            return Ok(Combinator::Descendant);
        };
        let combinator = found
            .as_str()
            .parse::<Combinator>()
            .map_err(|_| SelectError::malformed(self.remaining))?;
        let rest = self.remaining[..found.start()].trim_end();
        if rest.is_empty() {
            return Err(SelectError::malformed(self.remaining));
        }
        self.remaining = rest;
        Ok(combinator)
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Segment<'a>, SelectError>;

    /// Alternate tokens and combinators until the selector is consumed.
    /// Yields one error and then stops; an empty selector is an error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || (self.state == ScanState::ExpectCombinator && self.is_exhausted()) {
            return None;
        }
        let segment = match self.state {
            ScanState::ExpectToken => self.next_token().map(Segment::Token),
            ScanState::ExpectCombinator => self.next_combinator().map(Segment::Combinator),
        };
        self.failed = segment.is_err();
        Some(segment)
    }
}
