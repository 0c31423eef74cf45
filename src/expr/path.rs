//! Attribute lookup and dotted-path resolution.
//!
//! Subjects and contexts expose their attributes through [`FieldAccess`].
//! A path such as `#.inner.data` is resolved one segment at a time; an
//! absent root or an absent/null hop resolves to [`Value::Null`] instead of
//! failing, so guards over optional data stay safe.

use super::error::EvalError;
use super::value::Value;

/// One attribute read off an object: a scalar value or a nested object.
pub enum FieldValue<'a> {
    Scalar(Value),
    Object(&'a dyn FieldAccess),
}

impl<'a> FieldValue<'a> {
    pub fn scalar(value: impl Into<Value>) -> Self {
        Self::Scalar(value.into())
    }

    pub fn object<F: FieldAccess>(object: &'a F) -> Self {
        Self::Object(object)
    }
}

impl From<Value> for FieldValue<'_> {
    fn from(value: Value) -> Self {
        Self::Scalar(value)
    }
}

/// Attribute lookup capability used by path expressions.
///
/// Implement this for any subject or context type that guards need to read.
/// Returning `None` means the attribute is absent, which paths treat as null.
///
/// # Example
///
/// ```rust
/// use stateflow::expr::{FieldAccess, FieldValue};
///
/// struct Review {
///     status: String,
/// }
///
/// impl FieldAccess for Review {
///     fn get_field(&self, name: &str) -> Option<FieldValue<'_>> {
///         match name {
///             "status" => Some(FieldValue::scalar(self.status.as_str())),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait FieldAccess {
    fn get_field(&self, name: &str) -> Option<FieldValue<'_>> {
        let _ = name;
        None
    }
}

impl FieldAccess for () {}

/// Which root object a path is read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathScope {
    /// `#.` paths, read off the subject.
    Subject,
    /// `$.` paths, read off the dispatch context.
    Context,
}

impl PathScope {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Subject => "#",
            Self::Context => "$",
        }
    }
}

/// The roots available to an expression during one evaluation.
#[derive(Clone, Copy, Default)]
pub struct Bindings<'a> {
    pub subject: Option<&'a dyn FieldAccess>,
    pub context: Option<&'a dyn FieldAccess>,
}

impl<'a> Bindings<'a> {
    pub fn new(
        subject: Option<&'a dyn FieldAccess>,
        context: Option<&'a dyn FieldAccess>,
    ) -> Self {
        Self { subject, context }
    }

    pub fn root(&self, scope: PathScope) -> Option<&'a dyn FieldAccess> {
        match scope {
            PathScope::Subject => self.subject,
            PathScope::Context => self.context,
        }
    }
}

/// Resolve `segments` against `root`.
///
/// Yields `Null` as soon as the root or any hop is absent or null. Reading a
/// segment off a non-null scalar, or ending on an object, is an error.
pub fn resolve(
    root: Option<&dyn FieldAccess>,
    scope: PathScope,
    segments: &[String],
) -> Result<Value, EvalError> {
    let Some(mut current) = root.map(FieldValue::Object) else {
        return Ok(Value::Null);
    };

    for segment in segments {
        current = match current {
            FieldValue::Object(object) => match object.get_field(segment) {
                Some(next) => next,
                None => return Ok(Value::Null),
            },
            FieldValue::Scalar(Value::Null) => return Ok(Value::Null),
            FieldValue::Scalar(_) => {
                return Err(EvalError::ScalarTraversal {
                    path: render(scope, segments),
                    segment: segment.clone(),
                })
            }
        };
    }

    match current {
        FieldValue::Scalar(value) => Ok(value),
        FieldValue::Object(_) => Err(EvalError::ObjectValue {
            path: render(scope, segments),
        }),
    }
}

pub(crate) fn render(scope: PathScope, segments: &[String]) -> String {
    let mut path = scope.prefix().to_string();
    for segment in segments {
        path.push('.');
        path.push_str(segment);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    struct Inner {
        data: Option<Decimal>,
    }

    impl FieldAccess for Inner {
        fn get_field(&self, name: &str) -> Option<FieldValue<'_>> {
            match name {
                "data" => Some(FieldValue::scalar(self.data)),
                _ => None,
            }
        }
    }

    struct Outer {
        inner: Option<Inner>,
        label: String,
    }

    impl FieldAccess for Outer {
        fn get_field(&self, name: &str) -> Option<FieldValue<'_>> {
            match name {
                "inner" => self.inner.as_ref().map(FieldValue::object),
                "label" => Some(FieldValue::scalar(self.label.as_str())),
                _ => None,
            }
        }
    }

    fn segments(path: &str) -> Vec<String> {
        path.split('.').map(str::to_string).collect()
    }

    fn outer(data: Option<Decimal>) -> Outer {
        Outer {
            inner: Some(Inner { data }),
            label: "ready".to_string(),
        }
    }

    #[test]
    fn resolves_nested_scalar() {
        let subject = outer(Some(Decimal::ONE));
        let value = resolve(Some(&subject), PathScope::Subject, &segments("inner.data"));
        assert_eq!(value, Ok(Value::from(1)));
    }

    #[test]
    fn absent_root_is_null() {
        let value = resolve(None, PathScope::Context, &segments("status"));
        assert_eq!(value, Ok(Value::Null));
    }

    #[test]
    fn absent_intermediate_hop_is_null() {
        let subject = Outer {
            inner: None,
            label: String::new(),
        };
        let value = resolve(Some(&subject), PathScope::Subject, &segments("inner.data"));
        assert_eq!(value, Ok(Value::Null));
    }

    #[test]
    fn unknown_field_is_null() {
        let subject = outer(None);
        let value = resolve(Some(&subject), PathScope::Subject, &segments("missing.deeper"));
        assert_eq!(value, Ok(Value::Null));
    }

    #[test]
    fn null_scalar_hop_is_null() {
        let subject = outer(None);
        let value = resolve(Some(&subject), PathScope::Subject, &segments("inner.data.scale"));
        assert_eq!(value, Ok(Value::Null));
    }

    #[test]
    fn traversing_a_scalar_fails() {
        let subject = outer(None);
        let value = resolve(Some(&subject), PathScope::Subject, &segments("label.length"));
        assert_eq!(
            value,
            Err(EvalError::ScalarTraversal {
                path: "#.label.length".to_string(),
                segment: "length".to_string(),
            })
        );
    }

    #[test]
    fn ending_on_an_object_fails() {
        let subject = outer(None);
        let value = resolve(Some(&subject), PathScope::Subject, &segments("inner"));
        assert!(matches!(value, Err(EvalError::ObjectValue { .. })));
    }

    #[test]
    fn unit_exposes_no_fields() {
        let value = resolve(Some(&()), PathScope::Context, &segments("anything"));
        assert_eq!(value, Ok(Value::Null));
    }
}
