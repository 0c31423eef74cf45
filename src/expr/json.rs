//! `FieldAccess` for dynamic data: JSON documents and value maps.

use super::path::{FieldAccess, FieldValue};
use super::value::Value;
use rust_decimal::Decimal;
use std::collections::HashMap;

impl FieldAccess for serde_json::Value {
    /// Objects are read by key and arrays by numeric index. Numbers that do
    /// not fit a `Decimal` are reported as absent.
    fn get_field(&self, name: &str) -> Option<FieldValue<'_>> {
        let child = match self {
            serde_json::Value::Object(map) => map.get(name)?,
            serde_json::Value::Array(items) => items.get(name.parse::<usize>().ok()?)?,
            _ => return None,
        };
        json_field(child)
    }
}

fn json_field(value: &serde_json::Value) -> Option<FieldValue<'_>> {
    let field = match value {
        serde_json::Value::Null => FieldValue::Scalar(Value::Null),
        serde_json::Value::Bool(b) => FieldValue::scalar(*b),
        serde_json::Value::String(s) => FieldValue::scalar(s.as_str()),
        serde_json::Value::Number(n) => FieldValue::scalar(json_number(n)?),
        serde_json::Value::Object(_) | serde_json::Value::Array(_) => FieldValue::object(value),
    };
    Some(field)
}

fn json_number(n: &serde_json::Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Decimal::from(u));
    }
    n.as_f64().and_then(|f| Decimal::try_from(f).ok())
}

impl FieldAccess for HashMap<String, Value> {
    fn get_field(&self, name: &str) -> Option<FieldValue<'_>> {
        self.get(name).cloned().map(FieldValue::Scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::path::{resolve, PathScope};
    use serde_json::json;

    fn path(p: &str) -> Vec<String> {
        p.split('.').map(str::to_string).collect()
    }

    #[test]
    fn reads_nested_json_objects() {
        let doc = json!({ "inner": { "data": 1.5, "flag": true, "name": "x" } });

        let data = resolve(Some(&doc), PathScope::Subject, &path("inner.data"));
        assert_eq!(data, Ok(Value::from("1.5".parse::<Decimal>().unwrap())));

        let flag = resolve(Some(&doc), PathScope::Subject, &path("inner.flag"));
        assert_eq!(flag, Ok(Value::from(true)));

        let name = resolve(Some(&doc), PathScope::Subject, &path("inner.name"));
        assert_eq!(name, Ok(Value::from("x")));
    }

    #[test]
    fn indexes_json_arrays() {
        let doc = json!({ "items": [{ "qty": 3 }, { "qty": 4 }] });
        let qty = resolve(Some(&doc), PathScope::Subject, &path("items.1.qty"));
        assert_eq!(qty, Ok(Value::from(4)));

        let missing = resolve(Some(&doc), PathScope::Subject, &path("items.9.qty"));
        assert_eq!(missing, Ok(Value::Null));
    }

    #[test]
    fn json_null_is_null() {
        let doc = json!({ "inner": null });
        let value = resolve(Some(&doc), PathScope::Subject, &path("inner.data"));
        assert_eq!(value, Ok(Value::Null));
    }

    #[test]
    fn value_map_lookup() {
        let mut map = HashMap::new();
        map.insert("status".to_string(), Value::from("PASS"));

        let status = resolve(Some(&map), PathScope::Context, &path("status"));
        assert_eq!(status, Ok(Value::from("PASS")));

        let other = resolve(Some(&map), PathScope::Context, &path("other"));
        assert_eq!(other, Ok(Value::Null));
    }
}
