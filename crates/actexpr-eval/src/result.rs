//! The value + type pair produced by every evaluation step.

use crate::error::{EvalError, EvalResult};
use crate::number::format_number;
use crate::value::Value;
use actexpr_types::{ExprType, TypeTag};

/// Result of evaluating any sub-expression.
///
/// The type tag is always consistent with the value's shape, with `Any`
/// accepted for every shape. Results are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    value: Value,
    ty: ExprType,
}

impl EvaluationResult {
    /// Wrap a value, inferring its type by classification.
    pub fn new(value: Value) -> Self {
        let ty = value.classify();
        Self { value, ty }
    }

    /// Wrap a value with an explicit, more precise type (e.g. `array<number>`).
    ///
    /// Fails with [`EvalError::Internal`] if the tag does not describe the
    /// value's shape.
    pub fn typed(value: Value, ty: ExprType) -> EvalResult<Self> {
        let actual = value.classify().tag();
        if ty.tag() != TypeTag::Any && ty.tag() != actual {
            return Err(EvalError::Internal(format!(
                "type tag {ty} does not describe a {actual} value"
            )));
        }
        Ok(Self { value, ty })
    }

    /// Null with an unknown type, for lookups that found nothing usable.
    pub fn unknown() -> Self {
        Self {
            value: Value::Null,
            ty: ExprType::Any,
        }
    }

    pub fn null() -> Self {
        Self::new(Value::Null)
    }

    pub fn bool(b: bool) -> Self {
        Self::new(Value::Bool(b))
    }

    pub fn number(n: f64) -> Self {
        Self::new(Value::Number(n))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::new(Value::String(s.into()))
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn ty(&self) -> &ExprType {
        &self.ty
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Null, Bool, Number and String are primitive.
    pub fn is_primitive(&self) -> bool {
        self.value.is_primitive()
    }

    // ── Truthiness ───────────────────────────────────────────────────────

    /// Null, `false`, `0`, NaN and `""` are falsy. Arrays and objects never are.
    pub fn falsy(&self) -> bool {
        match &self.value {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => *n == 0.0 || n.is_nan(),
            Value::String(s) => s.is_empty(),
            Value::Array(_) | Value::Object(_) => false,
        }
    }

    pub fn truthy(&self) -> bool {
        !self.falsy()
    }

    // ── String coercion ──────────────────────────────────────────────────

    /// String form used by interpolation and string functions.
    ///
    /// Arrays and objects are not stringified structurally; they yield the
    /// display form of their type (`array<number>`, `object`).
    pub fn coerce_string(&self) -> String {
        match &self.value {
            Value::Null => String::new(),
            Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Array(_) | Value::Object(_) => {
                if self.ty == ExprType::Any {
                    self.value.classify().to_string()
                } else {
                    self.ty.to_string()
                }
            }
        }
    }
}

impl From<Value> for EvaluationResult {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}
