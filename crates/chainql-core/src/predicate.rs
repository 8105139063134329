//! Predicate library
//!
//! Comparison, membership, range and pattern predicates over a single field
//! value. The query binder builds these from WHERE conditions; chain callers
//! can use them directly through [`Predicate::for_field`].

use crate::error::{Error, Result};
use crate::value::Value;
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::fmt;

const MAX_LIKE_REGEX_SIZE: usize = 1024 * 1024;

/// Relational operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq, // =
    Ne, // !=
    Lt, // <
    Le, // <=
    Gt, // >
    Ge, // >=
}

impl BinaryOperator {
    /// Applies the operator. `=`/`!=` use loose equality, the rest use
    /// ordered comparison (false when the operands are unordered).
    pub fn apply(&self, left: &Value, right: &Value) -> bool {
        match self {
            BinaryOperator::Eq => left.loose_eq(right),
            BinaryOperator::Ne => !left.loose_eq(right),
            BinaryOperator::Lt => left.loose_cmp(right) == Some(Ordering::Less),
            BinaryOperator::Le => matches!(
                left.loose_cmp(right),
                Some(Ordering::Less | Ordering::Equal)
            ),
            BinaryOperator::Gt => left.loose_cmp(right) == Some(Ordering::Greater),
            BinaryOperator::Ge => matches!(
                left.loose_cmp(right),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::Eq => write!(f, "="),
            BinaryOperator::Ne => write!(f, "!="),
            BinaryOperator::Lt => write!(f, "<"),
            BinaryOperator::Le => write!(f, "<="),
            BinaryOperator::Gt => write!(f, ">"),
            BinaryOperator::Ge => write!(f, ">="),
        }
    }
}

/// A compiled SQL LIKE pattern.
///
/// `%` matches any run of characters, `_` exactly one; every other character
/// is literal. Matching is anchored at both ends and case-insensitive.
#[derive(Debug, Clone)]
pub struct LikePattern {
    source: String,
    regex: Regex,
}

impl LikePattern {
    /// Compiles a LIKE pattern.
    pub fn new(pattern: &str) -> Result<Self> {
        let mut translated = String::with_capacity(pattern.len() + 2);
        translated.push('^');
        for ch in pattern.chars() {
            match ch {
                '%' => translated.push_str(".*"),
                '_' => translated.push('.'),
                other => translated.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
            }
        }
        translated.push('$');

        let regex = RegexBuilder::new(&translated)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .size_limit(MAX_LIKE_REGEX_SIZE)
            .build()
            .map_err(|e| Error::InvalidInput(format!("invalid LIKE pattern '{}': {}", pattern, e)))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Tests a value. Numbers and booleans match through their string form;
    /// undefined and null never match.
    pub fn matches(&self, value: &Value) -> bool {
        match value {
            Value::Undefined | Value::Null => false,
            Value::String(s) => self.regex.is_match(s),
            other => self.regex.is_match(&other.to_string_form()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// A predicate over one field value.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// `field OP value`
    Compare { op: BinaryOperator, value: Value },
    /// `field IN (list)`; false for every value when `list` is not an array
    In(Value),
    /// `field NOT IN (list)`; false for every value when `list` is not an array
    NotIn(Value),
    /// `field BETWEEN min AND max`, inclusive
    Between { min: Value, max: Value },
    /// `field LIKE pattern`
    Like(LikePattern),
    /// Always false (unrecognized condition, unusable LIKE pattern)
    Never,
}

impl Predicate {
    pub fn compare(op: BinaryOperator, value: impl Into<Value>) -> Self {
        Predicate::Compare {
            op,
            value: value.into(),
        }
    }

    pub fn in_list(list: impl Into<Value>) -> Self {
        Predicate::In(list.into())
    }

    pub fn not_in_list(list: impl Into<Value>) -> Self {
        Predicate::NotIn(list.into())
    }

    pub fn between(min: impl Into<Value>, max: impl Into<Value>) -> Self {
        Predicate::Between {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Builds a LIKE predicate from a bound parameter. A non-string
    /// parameter or an uncompilable pattern yields [`Predicate::Never`].
    pub fn like(pattern: &Value) -> Self {
        match pattern {
            Value::String(s) => LikePattern::new(s).map_or(Predicate::Never, Predicate::Like),
            _ => Predicate::Never,
        }
    }

    /// Evaluates the predicate against a field value.
    pub fn test(&self, value: &Value) -> bool {
        match self {
            Predicate::Compare { op, value: operand } => op.apply(value, operand),
            Predicate::In(list) => list
                .as_array()
                .is_some_and(|items| items.iter().any(|item| item.same_value_zero(value))),
            Predicate::NotIn(list) => list
                .as_array()
                .is_some_and(|items| !items.iter().any(|item| item.same_value_zero(value))),
            Predicate::Between { min, max } => {
                BinaryOperator::Ge.apply(value, min) && BinaryOperator::Le.apply(value, max)
            }
            Predicate::Like(pattern) => pattern.matches(value),
            Predicate::Never => false,
        }
    }

    /// Lifts the predicate to a record filter on `field`.
    pub fn for_field(self, field: impl Into<String>) -> impl Fn(&Value) -> bool {
        let field = field.into();
        move |record: &Value| self.test(record.get(&field))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { op, value } => write!(f, "{} {}", op, value),
            Predicate::In(list) => write!(f, "IN ({})", list),
            Predicate::NotIn(list) => write!(f, "NOT IN ({})", list),
            Predicate::Between { min, max } => write!(f, "BETWEEN {} AND {}", min, max),
            Predicate::Like(pattern) => write!(f, "LIKE '{}'", pattern.as_str()),
            Predicate::Never => write!(f, "<never>"),
        }
    }
}
