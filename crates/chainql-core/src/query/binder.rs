/// Condition binder
///
/// Classifies each WHERE condition into one of the supported forms and binds
/// its placeholders to positional parameters in encounter order.
use super::clause::{RawCondition, WhereClause};
use super::composer::{Condition, ConditionChain};
use super::lexer::Token;
use crate::error::{Error, Result};
use crate::predicate::{BinaryOperator, Predicate};
use crate::value::Value;

/// How the binder treats caller mistakes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindMode {
    /// Unknown conditions never match; missing parameters bind as undefined
    #[default]
    Permissive,
    /// Unknown conditions and parameter count mismatches are errors
    Strict,
}

/// Positional parameter cursor
pub struct Binder<'a> {
    params: &'a [Value],
    consumed: usize,
    mode: BindMode,
}

impl<'a> Binder<'a> {
    pub fn new(params: &'a [Value], mode: BindMode) -> Self {
        Self {
            params,
            consumed: 0,
            mode,
        }
    }

    /// Number of placeholders bound so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Bind every condition of a WHERE clause, left to right.
    pub fn bind_where(&mut self, clause: &WhereClause) -> Result<ConditionChain> {
        let mut chain = ConditionChain::new(self.bind_condition(&clause.first)?);
        for (connective, raw) in &clause.rest {
            chain.push(*connective, self.bind_condition(raw)?);
        }
        Ok(chain)
    }

    /// Check that every supplied parameter was bound (strict mode only).
    pub fn finish(self) -> Result<()> {
        if self.mode == BindMode::Strict && self.consumed != self.params.len() {
            return Err(Error::ParameterCount {
                expected: self.consumed,
                supplied: self.params.len(),
            });
        }
        Ok(())
    }

    pub fn bind_condition(&mut self, raw: &RawCondition) -> Result<Condition> {
        let Some(field) = raw.field.as_deref() else {
            return self.unrecognized(raw);
        };

        let predicate = match raw.tokens.as_slice() {
            [Token::Not, Token::In, Token::LeftParen, Token::Placeholder, Token::RightParen] => {
                Predicate::NotIn(self.next_param())
            }
            [Token::In, Token::LeftParen, Token::Placeholder, Token::RightParen] => {
                Predicate::In(self.next_param())
            }
            [Token::Between, Token::Placeholder, Token::And, Token::Placeholder] => {
                let min = self.next_param();
                let max = self.next_param();
                Predicate::Between { min, max }
            }
            [Token::Like, Token::Placeholder] => Predicate::like(&self.next_param()),
            [op, Token::Placeholder] => match operator(op) {
                Some(op) => Predicate::Compare {
                    op,
                    value: self.next_param(),
                },
                None => return self.unrecognized(raw),
            },
            _ => return self.unrecognized(raw),
        };

        Ok(Condition::new(field, predicate))
    }

    fn next_param(&mut self) -> Value {
        let value = self.params.get(self.consumed).cloned().unwrap_or_default();
        self.consumed += 1;
        value
    }

    /// An unrecognized condition still uses up its placeholders, so the
    /// conditions after it bind the parameters meant for them.
    fn unrecognized(&mut self, raw: &RawCondition) -> Result<Condition> {
        self.consumed += raw.placeholders;
        match self.mode {
            BindMode::Strict => Err(Error::UnrecognizedCondition(raw.text.clone())),
            BindMode::Permissive => Ok(Condition::never(raw.text.clone())),
        }
    }
}

fn operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::Eq => Some(BinaryOperator::Eq),
        Token::Ne => Some(BinaryOperator::Ne),
        Token::Lt => Some(BinaryOperator::Lt),
        Token::Le => Some(BinaryOperator::Le),
        Token::Gt => Some(BinaryOperator::Gt),
        Token::Ge => Some(BinaryOperator::Ge),
        _ => None,
    }
}
