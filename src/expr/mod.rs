//! The guard expression language.
//!
//! Guard text is a single expression terminated by `;`. Paths starting with
//! `#.` read the subject, paths starting with `$.` read the dispatch context:
//!
//! ```text
//! #.inner.data == 1;
//! $.status == "PASS" || $.status == "Other";
//! !(#.locked && #.archived);
//! #.total * 2 >= 100.00;
//! ```
//!
//! Text is compiled once into an [`Expr`] and evaluated many times against
//! live objects exposed through [`FieldAccess`].
//!
//! # Example
//!
//! ```rust
//! use stateflow::expr::{TextGuard, Value};
//! use serde_json::json;
//!
//! let guard = TextGuard::compile("#.inner.data == 1;").unwrap();
//! let subject = json!({ "inner": { "data": 1.0 } });
//! assert_eq!(guard.evaluate(&subject, None), Ok(true));
//!
//! let value = stateflow::expr::evaluate("null == null;", None, None).unwrap();
//! assert_eq!(value, Value::Bool(true));
//! ```

mod ast;
mod error;
mod json;
mod lexer;
mod parser;
mod path;
mod value;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use error::{CompileError, EvalError, GuardError, SyntaxError};
pub use parser::{parse, MAX_DEPTH};
pub use path::{resolve, Bindings, FieldAccess, FieldValue, PathScope};
pub use value::Value;

use std::fmt;

/// A compiled guard: the source text and its parsed expression.
#[derive(Clone, Debug, PartialEq)]
pub struct TextGuard {
    text: String,
    expr: Expr,
}

impl TextGuard {
    /// Parse `text`, failing with the offending text on any syntax error.
    pub fn compile(text: &str) -> Result<Self, CompileError> {
        let expr = parse(text)?;
        Ok(Self {
            text: text.to_string(),
            expr,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Evaluate against a subject and optional context. The expression must
    /// reduce to a boolean.
    pub fn evaluate(
        &self,
        subject: &dyn FieldAccess,
        context: Option<&dyn FieldAccess>,
    ) -> Result<bool, EvalError> {
        let bindings = Bindings::new(Some(subject), context);
        let value = self.expr.evaluate(&bindings)?;
        value
            .as_bool()
            .ok_or(EvalError::NotBoolean { found: value.kind() })
    }
}

impl fmt::Display for TextGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Compile and evaluate `text` in one call, returning the raw value.
pub fn evaluate(
    text: &str,
    subject: Option<&dyn FieldAccess>,
    context: Option<&dyn FieldAccess>,
) -> Result<Value, GuardError> {
    let expr = parse(text)?;
    Ok(expr.evaluate(&Bindings::new(subject, context))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn null_comparisons() {
        assert_eq!(evaluate("null;", None, None), Ok(Value::Null));
        assert_eq!(evaluate("null == null;", None, None), Ok(Value::Bool(true)));
        assert_eq!(evaluate("null <> null;", None, None), Ok(Value::Bool(false)));
    }

    #[test]
    fn empty_string_is_not_null() {
        assert_eq!(evaluate("\"\" <> null;", None, None), Ok(Value::Bool(true)));
        assert_eq!(evaluate("\"\" == null;", None, None), Ok(Value::Bool(false)));
    }

    #[test]
    fn subject_and_context_paths() {
        let data = json!({ "inner": { "data": 1 } });

        assert_eq!(evaluate("#.inner.data;", Some(&data), None), Ok(Value::from(1)));
        assert_eq!(
            evaluate("#.inner.data + #.inner.data;", Some(&data), None),
            Ok(Value::from(2))
        );
        assert_eq!(
            evaluate("#.inner.data * #.inner.data;", Some(&data), None),
            Ok(Value::from(1))
        );
        assert_eq!(evaluate("$.inner.data;", None, Some(&data)), Ok(Value::from(1)));
    }

    #[test]
    fn scale_independent_equality() {
        let data = json!({ "zero": 0, "inner": { "data": "ignored" } });
        assert_eq!(evaluate("#.zero == 0.0;", Some(&data), None), Ok(Value::Bool(true)));
        assert_eq!(evaluate("#.zero <> 1.0;", Some(&data), None), Ok(Value::Bool(true)));
        assert_eq!(evaluate("1.50 * 2 == 3;", None, None), Ok(Value::Bool(true)));
        assert_eq!(evaluate("1.50 * 2;", None, None), Ok(Value::from(dec("3.00"))));
    }

    #[test]
    fn null_propagates_through_missing_objects() {
        let data = json!({});
        assert_eq!(
            evaluate("#.inner.data <> 1;", Some(&data), None),
            Ok(Value::Bool(true))
        );
        assert_eq!(evaluate("$.status == null;", Some(&data), None), Ok(Value::Bool(true)));
    }

    #[test]
    fn compile_errors_surface_through_evaluate() {
        let err = evaluate("#.a ==", None, None).unwrap_err();
        assert!(matches!(err, GuardError::Compile(_)));
    }

    #[test]
    fn text_guard_requires_boolean_result() {
        let guard = TextGuard::compile("#.amount + 1;").unwrap();
        let subject = json!({ "amount": 2 });
        assert_eq!(
            guard.evaluate(&subject, None),
            Err(EvalError::NotBoolean { found: "decimal" })
        );
    }

    #[test]
    fn text_guard_reads_booleans_directly() {
        let subject = json!({ "uBoolean": true, "lBoolean": false });
        let bare = TextGuard::compile("#.uBoolean;").unwrap();
        let negated = TextGuard::compile("!#.lBoolean ;").unwrap();
        let grouped = TextGuard::compile("!(#.lBoolean && #.lBoolean);").unwrap();

        assert_eq!(bare.evaluate(&subject, None), Ok(true));
        assert_eq!(negated.evaluate(&subject, None), Ok(true));
        assert_eq!(grouped.evaluate(&subject, None), Ok(true));
    }

    #[test]
    fn text_guard_keeps_source() {
        let guard = TextGuard::compile("1==1;").unwrap();
        assert_eq!(guard.text(), "1==1;");
        assert_eq!(guard.to_string(), "1==1;");
    }

    #[test]
    fn tiny_products_do_not_round_to_zero() {
        assert_eq!(
            evaluate("0.0000000000000001 * 0.0000000000000001 == 0;", None, None),
            Err(GuardError::Eval(EvalError::Inexact { operator: "*" }))
        );
        assert_eq!(
            evaluate("0.00000000000001 * 0.00000000000001 == 0;", None, None),
            Ok(Value::Bool(false))
        );
    }

    #[test]
    fn overlong_literals_fail_to_compile() {
        let err = TextGuard::compile(
            "0.12345678901234567890123456789012 == 0.1234567890123456789012345679;",
        )
        .unwrap_err();
        assert!(matches!(err.kind, SyntaxError::InvalidNumber(_)));
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn long_chains_are_rejected_at_compile_time() {
        let chain = format!("{} == 2000;", vec!["1"; 2000].join(" + "));
        let err = TextGuard::compile(&chain).unwrap_err();
        assert_eq!(err.kind, SyntaxError::TooDeep(MAX_DEPTH));

        let nested = format!("{}1{} == 1;", "(".repeat(500), ")".repeat(500));
        let err = TextGuard::compile(&nested).unwrap_err();
        assert_eq!(err.kind, SyntaxError::TooDeep(MAX_DEPTH));
    }

    #[test]
    fn guards_at_the_depth_limit_evaluate() {
        let terms = MAX_DEPTH - 1;
        let chain = format!("{} == {terms};", vec!["1"; terms].join(" + "));
        let guard = TextGuard::compile(&chain).unwrap();
        assert_eq!(guard.evaluate(&(), None), Ok(true));
    }
}
