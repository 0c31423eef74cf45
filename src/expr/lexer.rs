//! Tokenizer for guard text.

use super::error::{CompileError, SyntaxError};
use super::path::PathScope;
use rust_decimal::Decimal;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    Path(PathScope, Vec<String>),
    Number(Decimal),
    Str(String),
    Null,
    True,
    False,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Bang,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Semicolon,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(scope, segments) => {
                f.write_str(&super::path::render(*scope, segments))
            }
            Self::Number(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Null => f.write_str("null"),
            Self::True => f.write_str("true"),
            Self::False => f.write_str("false"),
            Self::EqEq => f.write_str("'=='"),
            Self::NotEq => f.write_str("'<>'"),
            Self::Lt => f.write_str("'<'"),
            Self::Le => f.write_str("'<='"),
            Self::Gt => f.write_str("'>'"),
            Self::Ge => f.write_str("'>='"),
            Self::AndAnd => f.write_str("'&&'"),
            Self::OrOr => f.write_str("'||'"),
            Self::Bang => f.write_str("'!'"),
            Self::Plus => f.write_str("'+'"),
            Self::Minus => f.write_str("'-'"),
            Self::Star => f.write_str("'*'"),
            Self::Slash => f.write_str("'/'"),
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
            Self::Semicolon => f.write_str("';'"),
        }
    }
}

/// A token and the byte offset it starts at.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub offset: usize,
}

pub(crate) fn tokenize(text: &str) -> Result<Vec<Spanned>, CompileError> {
    Lexer {
        text,
        chars: text.char_indices().peekable(),
    }
    .run()
}

struct Lexer<'a> {
    text: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn run(mut self) -> Result<Vec<Spanned>, CompileError> {
        let mut tokens = Vec::new();
        while let Some(&(offset, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
                continue;
            }
            let token = self.token(offset, c)?;
            tokens.push(Spanned { token, offset });
        }
        Ok(tokens)
    }

    fn error(&self, offset: usize, kind: SyntaxError) -> CompileError {
        CompileError::new(self.text, offset, kind)
    }

    fn token(&mut self, offset: usize, c: char) -> Result<Token, CompileError> {
        match c {
            '#' | '$' => self.path(offset, c),
            '"' => self.string(offset),
            '0'..='9' => self.number(offset),
            c if c.is_ascii_alphabetic() || c == '_' => self.keyword(offset),
            _ => {
                self.chars.next();
                self.operator(offset, c)
            }
        }
    }

    fn operator(&mut self, offset: usize, c: char) -> Result<Token, CompileError> {
        let token = match c {
            '=' if self.eat('=') => Token::EqEq,
            '<' if self.eat('>') => Token::NotEq,
            '<' if self.eat('=') => Token::Le,
            '<' => Token::Lt,
            '>' if self.eat('=') => Token::Ge,
            '>' => Token::Gt,
            '&' if self.eat('&') => Token::AndAnd,
            '|' if self.eat('|') => Token::OrOr,
            '!' => Token::Bang,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ';' => Token::Semicolon,
            _ => return Err(self.error(offset, SyntaxError::UnexpectedChar(c))),
        };
        Ok(token)
    }

    fn eat(&mut self, expected: char) -> bool {
        self.chars.next_if(|&(_, c)| c == expected).is_some()
    }

    fn path(&mut self, offset: usize, sigil: char) -> Result<Token, CompileError> {
        self.chars.next();
        let scope = if sigil == '#' {
            PathScope::Subject
        } else {
            PathScope::Context
        };

        let mut segments = Vec::new();
        while self.eat('.') {
            let segment = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
            if segment.is_empty() {
                return Err(self.error(offset, SyntaxError::MalformedPath("empty segment")));
            }
            segments.push(segment.to_string());
        }

        if segments.is_empty() {
            return Err(self.error(
                offset,
                SyntaxError::MalformedPath("expected '.' after path root"),
            ));
        }
        Ok(Token::Path(scope, segments))
    }

    fn string(&mut self, offset: usize) -> Result<Token, CompileError> {
        self.chars.next();
        let mut value = String::new();
        loop {
            match self.chars.next() {
                Some((_, '"')) => return Ok(Token::Str(value)),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, c @ ('"' | '\\'))) => value.push(c),
                    Some((at, c)) => return Err(self.error(at, SyntaxError::UnexpectedChar(c))),
                    None => return Err(self.error(offset, SyntaxError::UnterminatedString)),
                },
                Some((_, c)) => value.push(c),
                None => return Err(self.error(offset, SyntaxError::UnterminatedString)),
            }
        }
    }

    fn number(&mut self, offset: usize) -> Result<Token, CompileError> {
        let mut end = self.take_while(|c| c.is_ascii_digit()).len() + offset;
        if self.eat('.') {
            let fraction = self.take_while(|c| c.is_ascii_digit());
            if fraction.is_empty() {
                let literal = &self.text[offset..=end];
                return Err(self.error(offset, SyntaxError::InvalidNumber(literal.to_string())));
            }
            end += 1 + fraction.len();
        }

        // Literals with more digits than a Decimal holds are rejected, not rounded.
        let literal = &self.text[offset..end];
        Decimal::from_str_exact(literal)
            .map(Token::Number)
            .map_err(|_| self.error(offset, SyntaxError::InvalidNumber(literal.to_string())))
    }

    fn keyword(&mut self, offset: usize) -> Result<Token, CompileError> {
        let word = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
        match word {
            "null" => Ok(Token::Null),
            "true" => Ok(Token::True),
            "false" => Ok(Token::False),
            other => Err(self.error(offset, SyntaxError::UnknownIdentifier(other.to_string()))),
        }
    }

    /// Consume characters while `pred` holds and return them as a slice.
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = match self.chars.peek() {
            Some(&(i, _)) => i,
            None => return "",
        };
        let mut end = start;
        while let Some((i, c)) = self.chars.next_if(|&(_, c)| pred(c)) {
            end = i + c.len_utf8();
        }
        &self.text[start..end]
    }
}
