/// Lexer for tokenizing query text
///
/// Converts raw query text into a stream of positioned tokens. The lexer is
/// permissive: any character it does not understand becomes a [`Token::Other`]
/// and lexing never fails.
use std::fmt;

/// Token types produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    // Clause keywords
    Select,
    Where,
    OrderBy,
    Limit,

    // Direction keywords
    Asc,
    Desc,

    // Condition keywords
    And,
    Or,
    Not,
    In,
    Between,
    Like,

    // Operators
    Eq, // =
    Ne, // !=
    Lt, // <
    Le, // <=
    Gt, // >
    Ge, // >=

    // Punctuation
    Placeholder, // ?
    Asterisk,    // *
    Comma,       // ,
    LeftParen,   // (
    RightParen,  // )

    // Words
    Digits(String),
    Identifier(String),
    Other(String),

    // End of input
    Eof,
}

impl Token {
    /// Whether this token starts a top-level clause.
    pub fn is_clause_keyword(&self) -> bool {
        matches!(
            self,
            Token::Select | Token::Where | Token::OrderBy | Token::Limit
        )
    }

    /// Whether this token ends the field name of a WHERE condition.
    pub fn is_condition_operator(&self) -> bool {
        matches!(
            self,
            Token::Eq
                | Token::Ne
                | Token::Lt
                | Token::Le
                | Token::Gt
                | Token::Ge
                | Token::Not
                | Token::In
                | Token::Between
                | Token::Like
        )
    }

    /// The field name this token denotes, if it can name one.
    pub fn as_field(&self) -> Option<&str> {
        match self {
            Token::Identifier(name) | Token::Digits(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Select => write!(f, "SELECT"),
            Token::Where => write!(f, "WHERE"),
            Token::OrderBy => write!(f, "ORDER BY"),
            Token::Limit => write!(f, "LIMIT"),
            Token::Asc => write!(f, "ASC"),
            Token::Desc => write!(f, "DESC"),
            Token::And => write!(f, "AND"),
            Token::Or => write!(f, "OR"),
            Token::Not => write!(f, "NOT"),
            Token::In => write!(f, "IN"),
            Token::Between => write!(f, "BETWEEN"),
            Token::Like => write!(f, "LIKE"),
            Token::Eq => write!(f, "="),
            Token::Ne => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Le => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::Ge => write!(f, ">="),
            Token::Placeholder => write!(f, "?"),
            Token::Asterisk => write!(f, "*"),
            Token::Comma => write!(f, ","),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Digits(d) => write!(f, "{}", d),
            Token::Identifier(id) => write!(f, "{}", id),
            Token::Other(s) => write!(f, "{}", s),
            Token::Eof => write!(f, "EOF"),
        }
    }
}

/// A token with its character span in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub token: Token,
    pub start: usize,
    pub end: usize,
}

/// Lexer state
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    /// Create a new lexer from input string
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Get the next token
    pub fn next_lexeme(&mut self) -> Lexeme {
        self.skip_whitespace();

        let start = self.position;
        let token = self.read_token();
        Lexeme {
            token,
            start,
            end: self.position,
        }
    }

    /// Tokenize entire input into vector of lexemes, ending with [`Token::Eof`]
    pub fn tokenize(&mut self) -> Vec<Lexeme> {
        let mut lexemes = Vec::new();
        loop {
            let lexeme = self.next_lexeme();
            let done = lexeme.token == Token::Eof;
            lexemes.push(lexeme);
            if done {
                break;
            }
        }
        lexemes
    }

    /// Source text between two character positions
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.input.len());
        let start = start.min(end);
        self.input[start..end].iter().collect()
    }

    /// Character at a position, if any
    pub fn char_at(&self, position: usize) -> Option<char> {
        self.input.get(position).copied()
    }

    fn read_token(&mut self) -> Token {
        if self.position >= self.input.len() {
            return Token::Eof;
        }

        let ch = self.current_char();

        // Single-character tokens
        match ch {
            '?' => {
                self.advance();
                return Token::Placeholder;
            }
            '*' => {
                self.advance();
                return Token::Asterisk;
            }
            ',' => {
                self.advance();
                return Token::Comma;
            }
            '(' => {
                self.advance();
                return Token::LeftParen;
            }
            ')' => {
                self.advance();
                return Token::RightParen;
            }
            '=' => {
                self.advance();
                return Token::Eq;
            }
            '<' => {
                self.advance();
                if self.peek_is('=') {
                    self.advance();
                    return Token::Le;
                }
                return Token::Lt;
            }
            '>' => {
                self.advance();
                if self.peek_is('=') {
                    self.advance();
                    return Token::Ge;
                }
                return Token::Gt;
            }
            '!' => {
                self.advance();
                if self.peek_is('=') {
                    self.advance();
                    return Token::Ne;
                }
                return Token::Other("!".to_string());
            }
            _ => {}
        }

        if is_word_char(ch) {
            return self.read_word();
        }

        self.advance();
        Token::Other(ch.to_string())
    }

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn peek_is(&self, expected: char) -> bool {
        self.char_at(self.position) == Some(expected)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.position < self.input.len() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    fn read_word_text(&mut self) -> String {
        let start = self.position;
        while self.position < self.input.len() && is_word_char(self.current_char()) {
            self.advance();
        }
        self.input[start..self.position].iter().collect()
    }

    fn read_word(&mut self) -> Token {
        let text = self.read_word_text();
        let uppercase = text.to_ascii_uppercase();

        // ORDER BY is a single token
        if uppercase == "ORDER" {
            let after_order = self.position;
            self.skip_whitespace();
            if self.position > after_order && self.position < self.input.len() {
                let next = self.read_word_text();
                if next.eq_ignore_ascii_case("BY") {
                    return Token::OrderBy;
                }
            }
            // Rollback if not followed by BY
            self.position = after_order;
        }

        match uppercase.as_str() {
            "SELECT" => Token::Select,
            "WHERE" => Token::Where,
            "LIMIT" => Token::Limit,
            "ASC" => Token::Asc,
            "DESC" => Token::Desc,
            "AND" => Token::And,
            "OR" => Token::Or,
            "NOT" => Token::Not,
            "IN" => Token::In,
            "BETWEEN" => Token::Between,
            "LIKE" => Token::Like,
            _ if text.chars().all(|c| c.is_ascii_digit()) => Token::Digits(text),
            _ => Token::Identifier(text),
        }
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '.' || ch == '$'
}
