//! Expression tree and its evaluation semantics.

use super::error::EvalError;
use super::path::{self, Bindings, PathScope};
use super::value::Value;
use rust_decimal::Decimal;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Eq => "==",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

/// A parsed guard expression. Immutable once built; holds no reference to
/// any subject or context.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal(Value),
    Path {
        scope: PathScope,
        segments: Vec<String>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn evaluate(&self, bindings: &Bindings<'_>) -> Result<Value, EvalError> {
        match self {
            Self::Literal(value) => Ok(value.clone()),
            Self::Path { scope, segments } => {
                path::resolve(bindings.root(*scope), *scope, segments)
            }
            Self::Unary { op, operand } => {
                let value = operand.evaluate(bindings)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!expect_bool("!", &value)?)),
                    UnaryOp::Neg => Ok(Value::Decimal(-expect_decimal("-", &value)?)),
                }
            }
            Self::Binary { op, lhs, rhs } => match op {
                BinaryOp::And | BinaryOp::Or => logical(*op, lhs, rhs, bindings),
                BinaryOp::Eq | BinaryOp::Ne => {
                    let equal = lhs.evaluate(bindings)? == rhs.evaluate(bindings)?;
                    Ok(Value::Bool(equal == (*op == BinaryOp::Eq)))
                }
                BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                    let (a, b) = decimal_operands(*op, lhs, rhs, bindings)?;
                    let result = match op {
                        BinaryOp::Lt => a < b,
                        BinaryOp::Le => a <= b,
                        BinaryOp::Gt => a > b,
                        _ => a >= b,
                    };
                    Ok(Value::Bool(result))
                }
                BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                    let (a, b) = decimal_operands(*op, lhs, rhs, bindings)?;
                    arithmetic(*op, a, b).map(Value::Decimal)
                }
            },
        }
    }
}

/// `&&` and `||` evaluate the right operand only when it can change the result.
fn logical(
    op: BinaryOp,
    lhs: &Expr,
    rhs: &Expr,
    bindings: &Bindings<'_>,
) -> Result<Value, EvalError> {
    let left = expect_bool(op.symbol(), &lhs.evaluate(bindings)?)?;
    let decided = match op {
        BinaryOp::And => !left,
        _ => left,
    };
    if decided {
        return Ok(Value::Bool(left));
    }
    let right = expect_bool(op.symbol(), &rhs.evaluate(bindings)?)?;
    Ok(Value::Bool(right))
}

fn decimal_operands(
    op: BinaryOp,
    lhs: &Expr,
    rhs: &Expr,
    bindings: &Bindings<'_>,
) -> Result<(Decimal, Decimal), EvalError> {
    let symbol = op.symbol();
    let a = expect_decimal(symbol, &lhs.evaluate(bindings)?)?;
    let b = expect_decimal(symbol, &rhs.evaluate(bindings)?)?;
    Ok((a, b))
}

/// Decimal arithmetic that never rounds. A result that needs more digits
/// than a `Decimal` holds fails with `Overflow` or `Inexact` instead.
fn arithmetic(op: BinaryOp, a: Decimal, b: Decimal) -> Result<Decimal, EvalError> {
    let operator = op.symbol();
    match op {
        BinaryOp::Add => exact_sum(operator, a, b),
        BinaryOp::Sub => exact_sum(operator, a, -b),
        BinaryOp::Mul => exact_product(operator, a, b),
        _ => {
            if b.is_zero() {
                return Err(EvalError::DivisionByZero);
            }
            let quotient = a.checked_div(b).ok_or(EvalError::Overflow { operator })?;
            // A rounded quotient no longer multiplies back to the dividend.
            match exact_product(operator, quotient, b) {
                Ok(back) if back == a => Ok(quotient),
                _ => Err(EvalError::Inexact { operator }),
            }
        }
    }
}

fn exact_sum(operator: &'static str, a: Decimal, b: Decimal) -> Result<Decimal, EvalError> {
    let (a, b) = (a.normalize(), b.normalize());
    let mut scale = a.scale().max(b.scale());
    let aligned = |d: Decimal| {
        10i128
            .checked_pow(scale - d.scale())
            .and_then(|factor| d.mantissa().checked_mul(factor))
    };
    // Aligned mantissas beyond i128 already exceed the 96 bits a Decimal holds.
    let mut mantissa = aligned(a)
        .zip(aligned(b))
        .and_then(|(x, y)| x.checked_add(y))
        .ok_or_else(|| unrepresentable(operator, scale))?;
    while scale > 0 && mantissa % 10 == 0 {
        mantissa /= 10;
        scale -= 1;
    }
    Decimal::try_from_i128_with_scale(mantissa, scale)
        .map_err(|_| unrepresentable(operator, scale))
}

fn exact_product(operator: &'static str, a: Decimal, b: Decimal) -> Result<Decimal, EvalError> {
    let (a, b) = (a.normalize(), b.normalize());
    let product = a.checked_mul(b).ok_or(EvalError::Overflow { operator })?;
    if a.is_zero() || b.is_zero() {
        return Ok(product);
    }

    // The exact product has `a.scale() + b.scale()` fraction digits, less
    // the trailing zeros its mantissa picks up from paired 2s and 5s.
    let (ma, mb) = (a.mantissa().unsigned_abs(), b.mantissa().unsigned_abs());
    let zeros = (factors(ma, 2) + factors(mb, 2)).min(factors(ma, 5) + factors(mb, 5));
    let required = i64::from(a.scale() + b.scale()) - i64::from(zeros);
    if i64::from(product.normalize().scale()) < required {
        return Err(EvalError::Inexact { operator });
    }
    Ok(product)
}

/// How many times `p` divides `n`.
fn factors(mut n: u128, p: u128) -> u32 {
    let mut count = 0;
    while n != 0 && n % p == 0 {
        n /= p;
        count += 1;
    }
    count
}

fn unrepresentable(operator: &'static str, scale: u32) -> EvalError {
    if scale == 0 {
        EvalError::Overflow { operator }
    } else {
        EvalError::Inexact { operator }
    }
}

fn expect_bool(operator: &'static str, value: &Value) -> Result<bool, EvalError> {
    value.as_bool().ok_or(EvalError::TypeMismatch {
        operator,
        expected: "boolean",
        found: value.kind(),
    })
}

fn expect_decimal(operator: &'static str, value: &Value) -> Result<Decimal, EvalError> {
    value.as_decimal().ok_or(EvalError::TypeMismatch {
        operator,
        expected: "decimal",
        found: value.kind(),
    })
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Path { scope, segments } => f.write_str(&path::render(*scope, segments)),
            Self::Unary { op: UnaryOp::Not, operand } => write!(f, "!{operand}"),
            Self::Unary { op: UnaryOp::Neg, operand } => write!(f, "-{operand}"),
            Self::Binary { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.symbol()),
        }
    }
}
