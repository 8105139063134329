/// Boolean composition of WHERE conditions
///
/// Conditions are combined strictly left to right with no operator
/// precedence: `a OR b AND c` means `(a OR b) AND c`.
use crate::predicate::Predicate;
use crate::value::Value;
use std::fmt;

/// Logical connective between two conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connective::And => write!(f, "AND"),
            Connective::Or => write!(f, "OR"),
        }
    }
}

/// A predicate bound to a field
#[derive(Debug, Clone)]
pub struct Condition {
    pub field: String,
    pub predicate: Predicate,
}

impl Condition {
    pub fn new(field: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            field: field.into(),
            predicate,
        }
    }

    /// A condition that rejects every record.
    pub fn never(text: impl Into<String>) -> Self {
        Self::new(text, Predicate::Never)
    }

    pub fn matches(&self, record: &Value) -> bool {
        self.predicate.test(record.get(&self.field))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.predicate {
            Predicate::Never => write!(f, "FALSE /* {} */", self.field),
            _ => write!(f, "{} {}", self.field, self.predicate),
        }
    }
}

/// An ordered list of conditions joined by connectives
#[derive(Debug, Clone)]
pub struct ConditionChain {
    first: Condition,
    rest: Vec<(Connective, Condition)>,
}

impl ConditionChain {
    pub fn new(first: Condition) -> Self {
        Self {
            first,
            rest: Vec::new(),
        }
    }

    pub fn push(&mut self, connective: Connective, condition: Condition) {
        self.rest.push((connective, condition));
    }

    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        std::iter::once(&self.first).chain(self.rest.iter().map(|(_, c)| c))
    }

    /// Evaluates the chain as a left fold. A term is only evaluated when
    /// it can still change the result.
    pub fn evaluate(&self, record: &Value) -> bool {
        self.rest
            .iter()
            .fold(self.first.matches(record), |acc, (connective, condition)| {
                match connective {
                    Connective::And => acc && condition.matches(record),
                    Connective::Or => acc || condition.matches(record),
                }
            })
    }
}

impl fmt::Display for ConditionChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first)?;
        for (connective, condition) in &self.rest {
            write!(f, " {} {}", connective, condition)?;
        }
        Ok(())
    }
}
