//! Attribute and pseudo-class predicates.
//!
//! Every predicate is a pure function of a node and the tree it lives in.
//! Operators and pseudo-class names are closed enums; anything the parser
//! does not recognise lands in an explicit fallback variant.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use sift_common::warning::warn_once;

use crate::error::SelectError;
use crate::structural::{is_first_content_node, is_last_content_node, structural_index};
use crate::tree::TreeHandle;

/// `An+B` with `A` unsigned and required to be followed by `n`, and `B`
/// signed. A sign is mandatory between `n` and `B`.
static NTH_EXPR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<coefficient>\d*)n(?P<offset>[+-]\d+)?|(?P<constant>[+-]?\d+))$")
        .unwrap_or_else(|_| unreachable!())
});

/// How an attribute clause compares the attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// `[name]`: present with any value.
    Exists,
    /// `[name=value]`: exact match.
    Equals,
    /// `[name~=value]`: one of the whitespace-separated words.
    IncludesToken,
    /// `[name^=value]`: prefix.
    StartsWith,
    /// `[name$=value]`: suffix.
    EndsWith,
    /// `[name*=value]`: substring.
    Contains,
    /// `[name|=value]`: exactly `value` or starting with `value-`.
    DashMatch,
}

impl AttributeOperator {
    /// Map the operator as written (`""`, `"="`, `"~="`, ...) to a variant.
    ///
    /// Unrecognised operators degrade to [`AttributeOperator::Exists`].
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "=" => Self::Equals,
            "~=" => Self::IncludesToken,
            "^=" => Self::StartsWith,
            "$=" => Self::EndsWith,
            "*=" => Self::Contains,
            "|=" => Self::DashMatch,
            _ => Self::Exists,
        }
    }
}

/// A compiled `[name OP value]` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePredicate {
    /// Comparison to apply.
    pub operator: AttributeOperator,
    /// Attribute name, compared exactly.
    pub name: String,
    /// Value to compare against; ignored by `Exists`.
    pub value: Option<String>,
}

impl AttributePredicate {
    /// Build a predicate. An operator other than `Exists` without a value
    /// compares against the empty string.
    #[must_use]
    pub fn new(operator: AttributeOperator, name: &str, value: Option<&str>) -> Self {
        Self {
            operator,
            name: name.to_string(),
            value: value.map(str::to_string),
        }
    }

    /// Evaluate against `node`. An absent attribute never matches.
    pub fn matches<T: TreeHandle + ?Sized>(&self, tree: &T, node: T::NodeRef) -> bool {
        let Some(actual) = tree.attribute(node, &self.name) else {
            return false;
        };
        let expected = self.value.as_deref().unwrap_or("");
        match self.operator {
            AttributeOperator::Exists => true,
            AttributeOperator::Equals => actual == expected,
            AttributeOperator::IncludesToken => {
                actual.split_ascii_whitespace().any(|word| word == expected)
            }
            AttributeOperator::StartsWith => actual.starts_with(expected),
            AttributeOperator::EndsWith => actual.ends_with(expected),
            AttributeOperator::Contains => actual.contains(expected),
            AttributeOperator::DashMatch => {
                actual == expected
                    || actual
                        .strip_prefix(expected)
                        .is_some_and(|rest| rest.starts_with('-'))
            }
        }
    }
}

/// Argument of `nth-child(...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NthExpr {
    /// `odd`: indices 1, 3, 5, ...
    Odd,
    /// `even`: indices 2, 4, 6, ...
    Even,
    /// `An+B`, either part optional. A zero coefficient is stored as `None`.
    Formula {
        /// `A`, the step.
        coefficient: Option<u32>,
        /// `B`, the offset.
        constant: Option<i64>,
    },
}

impl NthExpr {
    /// Whether the 1-based structural `index` is selected.
    #[must_use]
    pub fn matches_index(&self, index: usize) -> bool {
        // Wide enough for any `i64` offset subtracted from any index.
        let index = i128::try_from(index).unwrap_or(i128::MAX);
        match *self {
            Self::Odd => index % 2 == 1,
            Self::Even => index % 2 == 0,
            Self::Formula {
                coefficient: Some(a),
                constant: Some(b),
            } => (index - i128::from(b)).rem_euclid(i128::from(a)) == 0,
            Self::Formula {
                coefficient: None,
                constant: Some(b),
            } => index == i128::from(b),
            Self::Formula {
                coefficient: Some(a),
                constant: None,
            } => index % i128::from(a) == 0,
            Self::Formula {
                coefficient: None,
                constant: None,
            } => true,
        }
    }
}

impl FromStr for NthExpr {
    type Err = SelectError;

    /// Parse `odd`, `even` or `An+B`. Case and inner whitespace are ignored.
    fn from_str(expression: &str) -> Result<Self, Self::Err> {
        let invalid = || SelectError::InvalidNthExpression {
            expression: expression.to_string(),
        };
        let compact: String = expression
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        match compact.as_str() {
            "odd" => return Ok(Self::Odd),
            "even" => return Ok(Self::Even),
            _ => {}
        }

        let caps = NTH_EXPR.captures(&compact).ok_or_else(invalid)?;
        let parse_signed = |digits: &str| digits.parse::<i64>().map_err(|_| invalid());

        if let Some(constant) = caps.name("constant") {
            return Ok(Self::Formula {
                coefficient: None,
                constant: Some(parse_signed(constant.as_str())?),
            });
        }

        let coefficient = match caps.name("coefficient").map(|m| m.as_str()) {
            None | Some("") => None,
            Some(digits) => Some(digits.parse::<u32>().map_err(|_| invalid())?),
        }
        .filter(|&a| a != 0);
        let constant = caps
            .name("offset")
            .map(|m| parse_signed(m.as_str()))
            .transpose()?;

        Ok(Self::Formula {
            coefficient,
            constant,
        })
    }
}

/// A compiled `:name` or `:name(arg)` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:nth-child(...)`
    NthChild(NthExpr),
    /// Any other pseudo-class. Never matches.
    Unknown(String),
}

impl PseudoClass {
    /// Compile a clause without its leading colon, e.g. `nth-child(2n+1)`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::InvalidNthExpression`] when an `nth-child`
    /// argument does not parse. Unknown names are not errors.
    pub fn parse(clause: &str) -> Result<Self, SelectError> {
        let (name, argument) = match clause.split_once('(') {
            Some((name, rest)) => (name, Some(rest.strip_suffix(')').unwrap_or(rest))),
            None => (clause, None),
        };

        match (name.to_ascii_lowercase().as_str(), argument) {
            ("first-child", None) => Ok(Self::FirstChild),
            ("last-child", None) => Ok(Self::LastChild),
            ("nth-child", Some(argument)) => Ok(Self::NthChild(argument.parse()?)),
            _ => {
                warn_once(
                    "Selector",
                    &format!("unsupported pseudo-class ':{clause}' never matches"),
                );
                Ok(Self::Unknown(clause.to_string()))
            }
        }
    }

    /// Evaluate against `node`.
    pub fn matches<T: TreeHandle + ?Sized>(&self, tree: &T, node: T::NodeRef) -> bool {
        match self {
            Self::FirstChild => is_first_content_node(tree, node),
            Self::LastChild => is_last_content_node(tree, node),
            Self::NthChild(nth) => nth.matches_index(structural_index(tree, node)),
            Self::Unknown(_) => false,
        }
    }
}

/// One non-structural condition of a simple selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// An attribute clause.
    Attribute(AttributePredicate),
    /// A pseudo-class clause.
    PseudoClass(PseudoClass),
}

impl Predicate {
    /// Evaluate against `node`.
    pub fn matches<T: TreeHandle + ?Sized>(&self, tree: &T, node: T::NodeRef) -> bool {
        match self {
            Self::Attribute(attribute) => attribute.matches(tree, node),
            Self::PseudoClass(pseudo) => pseudo.matches(tree, node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formula(coefficient: Option<u32>, constant: Option<i64>) -> NthExpr {
        NthExpr::Formula {
            coefficient,
            constant,
        }
    }

    #[test]
    fn test_parse_nth_keywords() {
        assert_eq!("odd".parse::<NthExpr>(), Ok(NthExpr::Odd));
        assert_eq!(" EVEN ".parse::<NthExpr>(), Ok(NthExpr::Even));
    }

    #[test]
    fn test_parse_nth_formulas() {
        assert_eq!("2n+1".parse::<NthExpr>(), Ok(formula(Some(2), Some(1))));
        assert_eq!("3n - 1".parse::<NthExpr>(), Ok(formula(Some(3), Some(-1))));
        assert_eq!("4n".parse::<NthExpr>(), Ok(formula(Some(4), None)));
        assert_eq!("n".parse::<NthExpr>(), Ok(formula(None, None)));
        assert_eq!("n+2".parse::<NthExpr>(), Ok(formula(None, Some(2))));
        assert_eq!("3".parse::<NthExpr>(), Ok(formula(None, Some(3))));
        assert_eq!("0n+5".parse::<NthExpr>(), Ok(formula(None, Some(5))));
    }

    #[test]
    fn test_parse_nth_rejects_garbage() {
        for bad in ["", "first", "2n1", "-n+3", "2x+1", "n+", "odd1"] {
            assert_eq!(
                bad.parse::<NthExpr>(),
                Err(SelectError::InvalidNthExpression {
                    expression: bad.to_string()
                }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_nth_index_semantics() {
        let odd: Vec<usize> = (1..=6).filter(|&i| NthExpr::Odd.matches_index(i)).collect();
        assert_eq!(odd, vec![1, 3, 5]);

        let even: Vec<usize> = (1..=6).filter(|&i| NthExpr::Even.matches_index(i)).collect();
        assert_eq!(even, vec![2, 4, 6]);

        let three_n_plus_two: Vec<usize> = (1..=9)
            .filter(|&i| formula(Some(3), Some(2)).matches_index(i))
            .collect();
        assert_eq!(three_n_plus_two, vec![2, 5, 8]);

        let three_n_minus_one: Vec<usize> = (1..=9)
            .filter(|&i| formula(Some(3), Some(-1)).matches_index(i))
            .collect();
        assert_eq!(three_n_minus_one, vec![2, 5, 8]);

        assert!(formula(None, Some(4)).matches_index(4));
        assert!(!formula(None, Some(4)).matches_index(5));
        assert!(formula(Some(3), None).matches_index(6));
        assert!(!formula(Some(3), None).matches_index(7));
        assert!((1..10).all(|i| formula(None, None).matches_index(i)));
    }

    #[test]
    fn test_nth_extreme_offsets_do_not_overflow() {
        let most_negative = "2n-9223372036854775807".parse::<NthExpr>().unwrap();
        assert_eq!(most_negative, formula(Some(2), Some(-i64::MAX)));
        assert!(most_negative.matches_index(1));
        assert!(!most_negative.matches_index(2));
        assert!(most_negative.matches_index(usize::MAX));

        let minimum = formula(Some(3), Some(i64::MIN));
        let picked: Vec<usize> = (1..=6).filter(|&i| minimum.matches_index(i)).collect();
        assert_eq!(picked, vec![1, 4]);

        let largest = "2n+9223372036854775807".parse::<NthExpr>().unwrap();
        assert!(largest.matches_index(1));
        assert!(!largest.matches_index(2));
        assert!(!formula(None, Some(i64::MIN)).matches_index(1));
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!(AttributeOperator::from_symbol(""), AttributeOperator::Exists);
        assert_eq!(AttributeOperator::from_symbol("="), AttributeOperator::Equals);
        assert_eq!(
            AttributeOperator::from_symbol("~="),
            AttributeOperator::IncludesToken
        );
        assert_eq!(AttributeOperator::from_symbol("|="), AttributeOperator::DashMatch);
        assert_eq!(AttributeOperator::from_symbol("!="), AttributeOperator::Exists);
    }

    #[test]
    fn test_pseudo_class_names() {
        assert_eq!(PseudoClass::parse("first-child"), Ok(PseudoClass::FirstChild));
        assert_eq!(PseudoClass::parse("Last-Child"), Ok(PseudoClass::LastChild));
        assert_eq!(
            PseudoClass::parse("nth-child(odd)"),
            Ok(PseudoClass::NthChild(NthExpr::Odd))
        );
        sift_common::warning::set_quiet(true);
        assert_eq!(
            PseudoClass::parse("hover"),
            Ok(PseudoClass::Unknown("hover".to_string()))
        );
        assert!(sift_common::warning::has_warned(
            "Selector",
            "unsupported pseudo-class ':hover' never matches"
        ));
        assert!(matches!(
            PseudoClass::parse("nth-child(bogus)"),
            Err(SelectError::InvalidNthExpression { .. })
        ));
    }
}
