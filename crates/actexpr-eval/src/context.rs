//! Read-only evaluation context.

use crate::value::Value;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Top-level names visible to an expression (`github`, `inputs`, `env`, ...).
///
/// The evaluator only ever reads from a context. Nested values are shared
/// handles, so looking a name up twice yields the same array/object identity.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Context {
    bindings: BTreeMap<String, Value>,
}

impl Context {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Context::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Bind a top-level name, replacing any previous binding.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.bindings.insert(name.into(), value.into());
    }

    /// Look up a top-level name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Build a context from a JSON object. Any other JSON shape yields `None`.
    pub fn from_json(json: serde_json::Value) -> Option<Self> {
        match Value::from(json) {
            Value::Object(fields) => Some(Self {
                bindings: (*fields).clone(),
            }),
            _ => None,
        }
    }
}

impl From<BTreeMap<String, Value>> for Context {
    fn from(bindings: BTreeMap<String, Value>) -> Self {
        Self { bindings }
    }
}

impl FromIterator<(String, Value)> for Context {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_and_get() {
        let mut ctx = Context::new();
        ctx.insert("input", 42);
        assert_eq!(ctx.get("input"), Some(&Value::Number(42.0)));
        assert_eq!(ctx.get("missing"), None);
    }

    #[test]
    fn test_builder_replaces() {
        let ctx = Context::new().with("a", "x").with("a", "y");
        assert_eq!(ctx.get("a"), Some(&Value::from("y")));
        assert_eq!(ctx.names().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_from_json_object() {
        let ctx = Context::from_json(json!({"github": {"ref": "refs/heads/main"}, "n": 1}))
            .unwrap();
        assert!(ctx.contains("github"));
        assert_eq!(ctx.get("n"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert_eq!(Context::from_json(json!([1, 2])), None);
        assert_eq!(Context::from_json(json!("x")), None);
    }

    #[test]
    fn test_deserialize_transparent() {
        let ctx: Context = serde_json::from_str(r#"{"env": {"CI": "true"}}"#).unwrap();
        let ci = ctx
            .get("env")
            .and_then(Value::as_object)
            .and_then(|o| o.get("CI"))
            .and_then(Value::as_str);
        assert_eq!(ci, Some("true"));
    }

    #[test]
    fn test_repeated_lookup_shares_identity() {
        let ctx = Context::new().with("list", vec![Value::Number(1.0)]);
        let a = ctx.get("list").cloned().unwrap();
        let b = ctx.get("list").cloned().unwrap();
        assert!(a.same_identity(&b));
    }
}
