/// Clause parser
///
/// Splits query text into its SELECT, WHERE, ORDER BY and LIMIT segments.
/// Each clause starts at the first occurrence of its keyword and runs to the
/// next clause keyword or the end of the text. A clause that is missing or
/// cannot be understood comes back as `None`; parsing never fails.
use super::composer::Connective;
use super::lexer::{Lexeme, Lexer, Token};
use std::fmt;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "ASC"),
            OrderDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// ORDER BY clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: OrderDirection,
}

/// One WHERE condition before binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCondition {
    /// Source text, used in diagnostics
    pub text: String,
    /// Source text before the first operator or condition keyword, when it
    /// is a single whitespace-free run
    pub field: Option<String>,
    /// Tokens from the first operator or condition keyword on
    pub tokens: Vec<Token>,
    /// Placeholders anywhere in the condition
    pub placeholders: usize,
}

/// WHERE clause split into conditions and connectives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereClause {
    pub first: RawCondition,
    pub rest: Vec<(Connective, RawCondition)>,
}

impl WhereClause {
    pub fn conditions(&self) -> impl Iterator<Item = &RawCondition> {
        std::iter::once(&self.first).chain(self.rest.iter().map(|(_, c)| c))
    }
}

/// The four optional clauses of a query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clauses {
    pub select: Option<Vec<String>>,
    pub where_clause: Option<WhereClause>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Clauses {
    /// Parse query text into clauses
    pub fn parse(query: &str) -> Self {
        let mut lexer = Lexer::new(query);
        let lexemes = lexer.tokenize();
        let parser = ClauseParser { lexer, lexemes };

        Clauses {
            select: parser.parse_select(),
            where_clause: parser.parse_where(),
            order_by: parser.parse_order_by(),
            limit: parser.parse_limit(),
        }
    }
}

struct ClauseParser {
    lexer: Lexer,
    lexemes: Vec<Lexeme>,
}

impl ClauseParser {
    /// Lexemes following the first `keyword`, up to the next clause keyword
    fn segment(&self, keyword: &Token) -> Option<&[Lexeme]> {
        let start = self.lexemes.iter().position(|l| &l.token == keyword)? + 1;
        let end = self.lexemes[start..]
            .iter()
            .position(|l| l.token.is_clause_keyword() || l.token == Token::Eof)
            .map_or(self.lexemes.len(), |offset| start + offset);
        Some(&self.lexemes[start..end])
    }

    fn text_of(&self, lexemes: &[Lexeme]) -> String {
        match (lexemes.first(), lexemes.last()) {
            (Some(first), Some(last)) => self.lexer.slice(first.start, last.end),
            _ => String::new(),
        }
    }

    fn parse_select(&self) -> Option<Vec<String>> {
        let segment = self.segment(&Token::Select)?;
        if matches!(segment, [only] if only.token == Token::Asterisk) {
            return None;
        }

        let fields: Vec<String> = self
            .text_of(segment)
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(str::to_string)
            .collect();

        if fields.is_empty() {
            None
        } else {
            Some(fields)
        }
    }

    fn parse_where(&self) -> Option<WhereClause> {
        let segment = self.segment(&Token::Where)?;
        if segment.is_empty() {
            return None;
        }

        let mut first: Vec<&Lexeme> = Vec::new();
        let mut rest: Vec<(Connective, Vec<&Lexeme>)> = Vec::new();
        for (index, lexeme) in segment.iter().enumerate() {
            let interior = index > 0 && index + 1 < segment.len();
            let connective = match lexeme.token {
                Token::And if interior && self.is_spaced(lexeme) => Some(Connective::And),
                Token::Or if interior && self.is_spaced(lexeme) => Some(Connective::Or),
                _ => None,
            };

            // the AND of `BETWEEN ? AND ?` is not a connective
            let current = rest.last().map_or(&first, |(_, lexemes)| lexemes);
            let absorbed = connective == Some(Connective::And) && ends_with_between(current);

            match connective {
                Some(connective) if !absorbed => rest.push((connective, Vec::new())),
                _ => match rest.last_mut() {
                    Some((_, lexemes)) => lexemes.push(lexeme),
                    None => first.push(lexeme),
                },
            }
        }

        Some(WhereClause {
            first: self.raw_condition(&first),
            rest: rest
                .iter()
                .map(|(connective, lexemes)| (*connective, self.raw_condition(lexemes)))
                .collect(),
        })
    }

    /// Connectives are recognised only with a literal space on each side.
    fn is_spaced(&self, lexeme: &Lexeme) -> bool {
        let before = lexeme
            .start
            .checked_sub(1)
            .and_then(|p| self.lexer.char_at(p));
        before == Some(' ') && self.lexer.char_at(lexeme.end) == Some(' ')
    }

    fn raw_condition(&self, lexemes: &[&Lexeme]) -> RawCondition {
        let text = match (lexemes.first(), lexemes.last()) {
            (Some(first), Some(last)) => self.lexer.slice(first.start, last.end),
            _ => String::new(),
        };

        let split = lexemes
            .iter()
            .position(|l| l.token.is_condition_operator())
            .unwrap_or(lexemes.len());
        let (head, tail) = lexemes.split_at(split);

        RawCondition {
            text,
            field: self.field_text(head),
            tokens: tail.iter().map(|l| l.token.clone()).collect(),
            placeholders: lexemes
                .iter()
                .filter(|l| l.token == Token::Placeholder)
                .count(),
        }
    }

    /// `first-name` lexes as several tokens but names one field, as long as
    /// nothing separates them.
    fn field_text(&self, head: &[&Lexeme]) -> Option<String> {
        let (first, last) = (head.first()?, head.last()?);
        if head.iter().any(|l| l.token == Token::Placeholder) {
            return None;
        }
        let adjacent = head.windows(2).all(|pair| pair[0].end == pair[1].start);
        adjacent.then(|| self.lexer.slice(first.start, last.end))
    }

    fn parse_order_by(&self) -> Option<OrderBy> {
        let segment = self.segment(&Token::OrderBy)?;
        let field = segment.first()?.token.as_field()?.to_string();
        let direction = match segment.get(1).map(|l| &l.token) {
            Some(Token::Desc) => OrderDirection::Desc,
            _ => OrderDirection::Asc,
        };
        Some(OrderBy { field, direction })
    }

    fn parse_limit(&self) -> Option<usize> {
        match &self.segment(&Token::Limit)?.first()?.token {
            Token::Digits(digits) => digits.parse().ok(),
            _ => None,
        }
    }
}

fn ends_with_between(lexemes: &[&Lexeme]) -> bool {
    matches!(
        lexemes,
        [.., between, placeholder]
            if between.token == Token::Between && placeholder.token == Token::Placeholder
    )
}
