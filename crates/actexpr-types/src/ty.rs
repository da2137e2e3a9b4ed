//! Descriptive type tags for evaluated expression values.
//!
//! [`ExprType`] describes a value's shape, including the element type of an
//! array and the property types of an object where they are known.
//! [`TypeTag`] is the bare discriminant used when comparing shapes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// ExprType
// ══════════════════════════════════════════════════════════════════════════════

/// The type of an evaluated expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExprType {
    /// Shape is unknown.
    Any,
    Null,
    Bool,
    Number,
    String,
    /// `array<T>`
    Array { elem: Box<ExprType> },
    /// An object with known properties and a type for any other key.
    Object {
        props: BTreeMap<std::string::String, ExprType>,
        mapped: Box<ExprType>,
    },
}

impl ExprType {
    /// `array<elem>`
    pub fn array(elem: ExprType) -> Self {
        ExprType::Array {
            elem: Box::new(elem),
        }
    }

    /// An object whose properties are all unknown.
    pub fn any_object() -> Self {
        ExprType::Object {
            props: BTreeMap::new(),
            mapped: Box::new(ExprType::Any),
        }
    }

    /// `{string => mapped}`
    pub fn map_of(mapped: ExprType) -> Self {
        ExprType::Object {
            props: BTreeMap::new(),
            mapped: Box::new(mapped),
        }
    }

    /// The discriminant of this type.
    pub fn tag(&self) -> TypeTag {
        match self {
            ExprType::Any => TypeTag::Any,
            ExprType::Null => TypeTag::Null,
            ExprType::Bool => TypeTag::Bool,
            ExprType::Number => TypeTag::Number,
            ExprType::String => TypeTag::String,
            ExprType::Array { .. } => TypeTag::Array,
            ExprType::Object { .. } => TypeTag::Object,
        }
    }

    /// Null, Bool, Number and String are primitive.
    pub fn is_primitive(&self) -> bool {
        self.tag().is_primitive()
    }
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprType::Any => write!(f, "any"),
            ExprType::Null => write!(f, "null"),
            ExprType::Bool => write!(f, "bool"),
            ExprType::Number => write!(f, "number"),
            ExprType::String => write!(f, "string"),
            ExprType::Array { elem } => write!(f, "array<{elem}>"),
            ExprType::Object { props, mapped } => {
                if props.is_empty() {
                    if **mapped == ExprType::Any {
                        write!(f, "object")
                    } else {
                        write!(f, "{{string => {mapped}}}")
                    }
                } else {
                    let parts: Vec<std::string::String> =
                        props.iter().map(|(k, t)| format!("{k}: {t}")).collect();
                    write!(f, "{{{}}}", parts.join(", "))
                }
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// TypeTag
// ══════════════════════════════════════════════════════════════════════════════

/// Discriminant of [`ExprType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Any,
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl TypeTag {
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            TypeTag::Null | TypeTag::Bool | TypeTag::Number | TypeTag::String
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Any => "any",
            TypeTag::Null => "null",
            TypeTag::Bool => "bool",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Array => "array",
            TypeTag::Object => "object",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
