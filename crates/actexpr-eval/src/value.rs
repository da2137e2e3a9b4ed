//! Runtime values and their classification into type tags.
//!
//! Arrays and objects are reference-counted handles. Cloning a [`Value`]
//! shares the handle, which is what expression-level equality compares: two
//! arrays are equal only if they are the same allocation. The derived
//! [`PartialEq`] is structural and exists for Rust callers; expression `==`
//! goes through [`crate::coerce::equals`].

use actexpr_types::ExprType;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Largest integer an f64 holds exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A runtime value: context contents, literals and function results.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Arc<Vec<Value>>),
    Object(Arc<BTreeMap<String, Value>>),
}

impl Value {
    /// A fresh array with its own identity.
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Arc::new(items))
    }

    /// A fresh object with its own identity.
    pub fn object(fields: BTreeMap<String, Value>) -> Self {
        Value::Object(Arc::new(fields))
    }

    /// Assign the type tag for this value. Total and side-effect-free.
    pub fn classify(&self) -> ExprType {
        match self {
            Value::Null => ExprType::Null,
            Value::Bool(_) => ExprType::Bool,
            Value::Number(_) => ExprType::Number,
            Value::String(_) => ExprType::String,
            Value::Array(_) => ExprType::array(ExprType::Any),
            Value::Object(_) => ExprType::any_object(),
        }
    }

    /// Short type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// Whether both values are the same array or object allocation.
    /// Always false for primitives.
    pub fn same_identity(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(fields) => Some(&**fields),
            _ => None,
        }
    }
}

/// Free-function form of [`Value::classify`].
pub fn classify(value: &Value) -> ExprType {
    value.classify()
}

// ── Conversions ──────────────────────────────────────────────────────────────

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Value::object(fields)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => match integral(*n) {
                Some(i) => serde_json::Value::from(i),
                None => serde_json::Number::from_f64(*n)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null),
            },
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// `Some(i)` if `n` is an integer that an f64 represents exactly.
fn integral(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Some(n as i64)
    } else {
        None
    }
}

// ── Serde ────────────────────────────────────────────────────────────────────

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None if n.is_finite() => serializer.serialize_f64(*n),
                // NaN and the infinities have no JSON spelling.
                None => serializer.serialize_unit(),
            },
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => serializer.collect_seq(items.iter()),
            Value::Object(fields) => serializer.collect_map(fields.iter()),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actexpr_types::TypeTag;
    use serde_json::json;

    #[test]
    fn test_classify_is_total() {
        assert_eq!(Value::Null.classify(), ExprType::Null);
        assert_eq!(Value::Bool(true).classify(), ExprType::Bool);
        assert_eq!(Value::Number(1.5).classify(), ExprType::Number);
        assert_eq!(Value::from("x").classify(), ExprType::String);
        assert_eq!(
            Value::array(vec![Value::Number(1.0)]).classify(),
            ExprType::array(ExprType::Any)
        );
        assert_eq!(
            classify(&Value::object(BTreeMap::new())).tag(),
            TypeTag::Object
        );
    }

    #[test]
    fn test_identity_survives_clone() {
        let a = Value::array(vec![Value::Number(1.0), Value::Number(2.0)]);
        let b = a.clone();
        let c = Value::array(vec![Value::Number(1.0), Value::Number(2.0)]);
        assert!(a.same_identity(&b));
        assert!(!a.same_identity(&c));
        // structural equality still holds for Rust callers
        assert_eq!(a, c);
    }

    #[test]
    fn test_primitives_have_no_identity() {
        assert!(!Value::Null.same_identity(&Value::Null));
        assert!(!Value::from("a").same_identity(&Value::from("a")));
    }

    #[test]
    fn test_from_json() {
        let v = Value::from(json!({"a": [1, "two", null], "b": {"c": true}}));
        let a = v.as_object().and_then(|o| o.get("a")).and_then(Value::as_array);
        assert_eq!(
            a,
            Some(&[Value::Number(1.0), Value::from("two"), Value::Null][..])
        );
    }

    #[test]
    fn test_to_json_integers_stay_integers() {
        let v = Value::array(vec![
            Value::Number(42.0),
            Value::Number(-0.0),
            Value::Number(1.5),
            Value::Number(f64::NAN),
        ]);
        assert_eq!(serde_json::Value::from(&v), json!([42, 0, 1.5, null]));
        assert_eq!(serde_json::to_string(&v).unwrap(), "[42,0,1.5,null]");
    }

    #[test]
    fn test_deserialize_context_shape() {
        let v: Value = serde_json::from_str(r#"{"inputs":{"n":3}}"#).unwrap();
        let n = v
            .as_object()
            .and_then(|o| o.get("inputs"))
            .and_then(Value::as_object)
            .and_then(|o| o.get("n"))
            .and_then(Value::as_f64);
        assert_eq!(n, Some(3.0));
    }
}
