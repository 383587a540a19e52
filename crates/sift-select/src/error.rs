//! Errors reported by selector compilation and matching.

use thiserror::Error;

/// Every way a `select` call can fail.
///
/// All errors are raised synchronously while the selector is being consumed;
/// nothing is retried or recovered internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// No simple-selector token could be taken off the end of the selector.
    #[error("malformed selector: cannot extract a token from {remaining:?}")]
    MalformedSelector {
        /// The unconsumed part of the selector at the point of failure.
        remaining: String,
    },

    /// A single simple-selector token carried more than one `#id`.
    #[error("only one #id is allowed per simple selector, found several in {token:?}")]
    MultipleIdsInToken {
        /// The offending token.
        token: String,
    },

    /// An `nth-child(...)` argument is neither `odd`, `even` nor `An+B`.
    #[error("invalid nth-child expression: nth-child({expression})")]
    InvalidNthExpression {
        /// The argument as written.
        expression: String,
    },

    /// The combinator is recognised but not implemented.
    #[error("the '{combinator}' combinator is not supported")]
    UnsupportedCombinator {
        /// The combinator symbol.
        combinator: String,
    },
}

impl SelectError {
    pub(crate) fn malformed(remaining: &str) -> Self {
        Self::MalformedSelector {
            remaining: remaining.to_string(),
        }
    }
}
