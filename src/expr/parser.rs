//! Recursive-descent parser for guard statements.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! statement      := or ';'
//! or             := and ( '||' and )*
//! and            := not ( '&&' not )*
//! not            := '!' not | comparison
//! comparison     := additive ( ( '==' | '<>' | '<' | '<=' | '>' | '>=' ) additive )*
//! additive       := multiplicative ( ( '+' | '-' ) multiplicative )*
//! multiplicative := negation ( ( '*' | '/' ) negation )*
//! negation       := '-' negation | primary
//! primary        := 'null' | 'true' | 'false' | number | string | path | '(' or ')'
//! ```
//!
//! Both the nesting of `(`, `!` and `-` and the height of the resulting tree
//! are capped at [`MAX_DEPTH`], so evaluating or dropping a compiled
//! expression never recurses further than that.

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::error::{CompileError, SyntaxError};
use super::lexer::{tokenize, Spanned, Token};
use super::value::Value;

/// Deepest expression tree, or parser nesting, a guard may have.
pub const MAX_DEPTH: usize = 128;

/// Parse one `;`-terminated statement.
pub fn parse(text: &str) -> Result<Expr, CompileError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        text,
        tokens,
        pos: 0,
        nesting: 0,
    };
    let (expr, _) = parser.or()?;

    match parser.next() {
        Some(Spanned {
            token: Token::Semicolon,
            ..
        }) => {}
        Some(other) => {
            return Err(parser.unexpected(other, "';' or an operator"));
        }
        None => return Err(parser.error_at_end(SyntaxError::MissingTerminator)),
    }

    if let Some(extra) = parser.next() {
        return Err(CompileError::new(text, extra.offset, SyntaxError::TrailingInput));
    }
    Ok(expr)
}

/// A parsed subtree and its height.
type Node = (Expr, usize);

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Spanned>,
    pos: usize,
    nesting: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn next(&mut self) -> Option<Spanned> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Offset of the most recently consumed token.
    fn consumed_offset(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(0, |s| s.offset)
    }

    fn error_at_end(&self, kind: SyntaxError) -> CompileError {
        CompileError::new(self.text, self.text.len(), kind)
    }

    fn unexpected(&self, found: Spanned, expected: &'static str) -> CompileError {
        CompileError::new(
            self.text,
            found.offset,
            SyntaxError::UnexpectedToken {
                expected,
                found: found.token.to_string(),
            },
        )
    }

    fn too_deep(&self, offset: usize) -> CompileError {
        CompileError::new(self.text, offset, SyntaxError::TooDeep(MAX_DEPTH))
    }

    /// Consume the next token if `select` maps it to an operator.
    fn operator<T>(&mut self, select: impl Fn(&Token) -> Option<T>) -> Option<T> {
        let op = self.peek().and_then(select)?;
        self.pos += 1;
        Some(op)
    }

    /// Run `parse` one nesting level deeper, for `(`, `!` and unary `-`.
    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<Node, CompileError>,
    ) -> Result<Node, CompileError> {
        if self.nesting >= MAX_DEPTH {
            return Err(self.too_deep(self.consumed_offset()));
        }
        self.nesting += 1;
        let node = parse(self);
        self.nesting -= 1;
        node
    }

    fn binary(
        &self,
        op: BinaryOp,
        lhs: Node,
        rhs: Node,
        offset: usize,
    ) -> Result<Node, CompileError> {
        let height = lhs.1.max(rhs.1) + 1;
        if height > MAX_DEPTH {
            return Err(self.too_deep(offset));
        }
        let expr = Expr::Binary {
            op,
            lhs: Box::new(lhs.0),
            rhs: Box::new(rhs.0),
        };
        Ok((expr, height))
    }

    fn unary(&self, op: UnaryOp, operand: Node, offset: usize) -> Result<Node, CompileError> {
        let height = operand.1 + 1;
        if height > MAX_DEPTH {
            return Err(self.too_deep(offset));
        }
        let expr = Expr::Unary {
            op,
            operand: Box::new(operand.0),
        };
        Ok((expr, height))
    }

    fn or(&mut self) -> Result<Node, CompileError> {
        let mut lhs = self.and()?;
        while self.operator(|t| (*t == Token::OrOr).then_some(BinaryOp::Or)).is_some() {
            let offset = self.consumed_offset();
            let rhs = self.and()?;
            lhs = self.binary(BinaryOp::Or, lhs, rhs, offset)?;
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Node, CompileError> {
        let mut lhs = self.not()?;
        while self.operator(|t| (*t == Token::AndAnd).then_some(BinaryOp::And)).is_some() {
            let offset = self.consumed_offset();
            let rhs = self.not()?;
            lhs = self.binary(BinaryOp::And, lhs, rhs, offset)?;
        }
        Ok(lhs)
    }

    fn not(&mut self) -> Result<Node, CompileError> {
        if self.operator(|t| (*t == Token::Bang).then_some(())).is_some() {
            let offset = self.consumed_offset();
            let operand = self.nested(Self::not)?;
            return self.unary(UnaryOp::Not, operand, offset);
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Node, CompileError> {
        let mut lhs = self.additive()?;
        while let Some(op) = self.operator(|t| match t {
            Token::EqEq => Some(BinaryOp::Eq),
            Token::NotEq => Some(BinaryOp::Ne),
            Token::Lt => Some(BinaryOp::Lt),
            Token::Le => Some(BinaryOp::Le),
            Token::Gt => Some(BinaryOp::Gt),
            Token::Ge => Some(BinaryOp::Ge),
            _ => None,
        }) {
            let offset = self.consumed_offset();
            let rhs = self.additive()?;
            lhs = self.binary(op, lhs, rhs, offset)?;
        }
        Ok(lhs)
    }

    fn additive(&mut self) -> Result<Node, CompileError> {
        let mut lhs = self.multiplicative()?;
        while let Some(op) = self.operator(|t| match t {
            Token::Plus => Some(BinaryOp::Add),
            Token::Minus => Some(BinaryOp::Sub),
            _ => None,
        }) {
            let offset = self.consumed_offset();
            let rhs = self.multiplicative()?;
            lhs = self.binary(op, lhs, rhs, offset)?;
        }
        Ok(lhs)
    }

    fn multiplicative(&mut self) -> Result<Node, CompileError> {
        let mut lhs = self.negation()?;
        while let Some(op) = self.operator(|t| match t {
            Token::Star => Some(BinaryOp::Mul),
            Token::Slash => Some(BinaryOp::Div),
            _ => None,
        }) {
            let offset = self.consumed_offset();
            let rhs = self.negation()?;
            lhs = self.binary(op, lhs, rhs, offset)?;
        }
        Ok(lhs)
    }

    fn negation(&mut self) -> Result<Node, CompileError> {
        if self.operator(|t| (*t == Token::Minus).then_some(())).is_some() {
            let offset = self.consumed_offset();
            let operand = self.nested(Self::negation)?;
            return self.unary(UnaryOp::Neg, operand, offset);
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Node, CompileError> {
        let Some(spanned) = self.next() else {
            return Err(self.error_at_end(SyntaxError::UnexpectedEnd("an operand")));
        };

        let expr = match spanned.token {
            Token::Null => Expr::Literal(Value::Null),
            Token::True => Expr::Literal(Value::Bool(true)),
            Token::False => Expr::Literal(Value::Bool(false)),
            Token::Number(n) => Expr::Literal(Value::Decimal(n)),
            Token::Str(s) => Expr::Literal(Value::String(s)),
            Token::Path(scope, segments) => Expr::Path { scope, segments },
            Token::LParen => {
                let inner = self.nested(Self::or)?;
                return match self.next() {
                    Some(Spanned {
                        token: Token::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(self.unexpected(other, "')'")),
                    None => Err(self.error_at_end(SyntaxError::UnexpectedEnd("')'"))),
                };
            }
            _ => return Err(self.unexpected(spanned, "an operand")),
        };
        Ok((expr, 1))
    }
}
