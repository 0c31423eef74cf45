//! Errors raised while compiling or evaluating guard expressions.

use thiserror::Error;

/// What went wrong while tokenizing or parsing guard text.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SyntaxError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    #[error("malformed path: {0}")]
    MalformedPath(&'static str),

    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },

    #[error("unexpected end of input, expected {0}")]
    UnexpectedEnd(&'static str),

    #[error("statement must be terminated by ';'")]
    MissingTerminator,

    #[error("unexpected input after ';'")]
    TrailingInput,

    #[error("expression nests deeper than {0} levels")]
    TooDeep(usize),
}

/// Guard text that failed to compile.
///
/// Carries the full source text so the offending registration can be
/// identified from the error alone.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("invalid guard expression {text:?} at offset {offset}: {kind}")]
pub struct CompileError {
    pub text: String,
    pub offset: usize,
    pub kind: SyntaxError,
}

impl CompileError {
    pub(crate) fn new(text: &str, offset: usize, kind: SyntaxError) -> Self {
        Self {
            text: text.to_string(),
            offset,
            kind,
        }
    }
}

/// Errors raised while evaluating a compiled expression.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvalError {
    #[error("operator '{operator}' expects {expected} operands, found {found}")]
    TypeMismatch {
        operator: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("arithmetic overflow in '{operator}'")]
    Overflow { operator: &'static str },

    #[error("result of '{operator}' cannot be represented without rounding")]
    Inexact { operator: &'static str },

    #[error("division by zero")]
    DivisionByZero,

    #[error("cannot read '{segment}' of scalar value in path '{path}'")]
    ScalarTraversal { path: String, segment: String },

    #[error("path '{path}' resolves to an object, not a value")]
    ObjectValue { path: String },

    #[error("guard must evaluate to a boolean, found {found}")]
    NotBoolean { found: &'static str },
}

/// Either failure of a one-shot compile-and-evaluate call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GuardError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
