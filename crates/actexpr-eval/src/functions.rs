//! Built-in function registry.
//!
//! Function names are case-insensitive: `startsWith`, `STARTSWITH` and
//! `startswith` are the same function. Each entry declares an [`Arity`] that
//! is checked before the implementation runs, so implementations can rely on
//! their required arguments being present.

use crate::coerce::equals;
use crate::error::{EvalError, EvalResult};
use crate::result::EvaluationResult;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

// ══════════════════════════════════════════════════════════════════════════════
// Definitions
// ══════════════════════════════════════════════════════════════════════════════

/// Argument count contract of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments.
    Exactly(usize),
    /// This many or more.
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "{n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Implementation of a function over already-evaluated arguments.
pub type NativeFn =
    Arc<dyn Fn(&[EvaluationResult]) -> EvalResult<EvaluationResult> + Send + Sync>;

/// A callable registered under a name.
#[derive(Clone)]
pub struct FunctionDef {
    pub name: String,
    pub arity: Arity,
    pub call: NativeFn,
}

impl FunctionDef {
    pub fn new(
        name: impl Into<String>,
        arity: Arity,
        call: impl Fn(&[EvaluationResult]) -> EvalResult<EvaluationResult> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            call: Arc::new(call),
        }
    }
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Registry
// ══════════════════════════════════════════════════════════════════════════════

static BUILTINS: LazyLock<FunctionRegistry> = LazyLock::new(|| {
    let mut reg = FunctionRegistry::new();
    reg.register_builtins();
    reg
});

/// Table of callable functions keyed by lower-cased name.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDef>,
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared built-in table. Built on first use, read-only afterwards.
    pub fn builtins() -> &'static FunctionRegistry {
        &BUILTINS
    }

    /// An owned copy of the built-ins, for callers that add their own functions.
    pub fn with_builtins() -> Self {
        BUILTINS.clone()
    }

    /// Add or replace a function.
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.to_lowercase(), def);
    }

    /// Look up a function, ignoring case.
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Resolve `name`, check the argument count and invoke it.
    pub fn call(&self, name: &str, args: &[EvaluationResult]) -> EvalResult<EvaluationResult> {
        let def = self
            .get(name)
            .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;

        if !def.arity.accepts(args.len()) {
            return Err(EvalError::ArityMismatch {
                function: name.to_string(),
                expected: def.arity,
                got: args.len(),
            });
        }

        tracing::debug!(function = %def.name, args = args.len(), "calling function");
        (def.call)(args)
    }

    fn register_builtins(&mut self) {
        self.register(FunctionDef::new("startsWith", Arity::Exactly(2), starts_with));
        self.register(FunctionDef::new("endsWith", Arity::Exactly(2), ends_with));
        self.register(FunctionDef::new("contains", Arity::Exactly(2), contains));
        self.register(FunctionDef::new("join", Arity::AtLeast(1), join));
        self.register(FunctionDef::new("format", Arity::AtLeast(1), format));
        self.register(FunctionDef::new("toJSON", Arity::Exactly(1), to_json));
        self.register(FunctionDef::new("fromJSON", Arity::Exactly(1), from_json));
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Built-ins
// ══════════════════════════════════════════════════════════════════════════════

fn arg<'a>(
    args: &'a [EvaluationResult],
    index: usize,
    function: &str,
) -> EvalResult<&'a EvaluationResult> {
    args.get(index).ok_or_else(|| {
        EvalError::Internal(format!("{function}: missing argument {index} after arity check"))
    })
}

fn invalid(function: &str, message: impl Into<String>) -> EvalError {
    EvalError::InvalidArgument {
        function: function.to_string(),
        message: message.into(),
    }
}

/// `startsWith(searchString, searchValue)`
fn starts_with(args: &[EvaluationResult]) -> EvalResult<EvaluationResult> {
    let haystack = arg(args, 0, "startsWith")?.coerce_string().to_lowercase();
    let needle = arg(args, 1, "startsWith")?.coerce_string().to_lowercase();
    Ok(EvaluationResult::bool(haystack.starts_with(&needle)))
}

/// `endsWith(searchString, searchValue)`
fn ends_with(args: &[EvaluationResult]) -> EvalResult<EvaluationResult> {
    let haystack = arg(args, 0, "endsWith")?.coerce_string().to_lowercase();
    let needle = arg(args, 1, "endsWith")?.coerce_string().to_lowercase();
    Ok(EvaluationResult::bool(haystack.ends_with(&needle)))
}

/// `contains(search, item)`: element membership for arrays, substring otherwise.
fn contains(args: &[EvaluationResult]) -> EvalResult<EvaluationResult> {
    let search = arg(args, 0, "contains")?;
    let item = arg(args, 1, "contains")?;

    let found = match search.value() {
        Value::Array(items) => items
            .iter()
            .any(|v| equals(&EvaluationResult::new(v.clone()), item)),
        _ => search
            .coerce_string()
            .to_lowercase()
            .contains(&item.coerce_string().to_lowercase()),
    };
    Ok(EvaluationResult::bool(found))
}

/// `join(array, separator = ",")`. A primitive first argument is returned as is.
fn join(args: &[EvaluationResult]) -> EvalResult<EvaluationResult> {
    let first = arg(args, 0, "join")?;
    match first.value() {
        Value::Array(items) => {
            let separator = match args.get(1) {
                Some(sep) => sep.coerce_string(),
                None => ",".to_string(),
            };
            let parts: Vec<String> = items
                .iter()
                .map(|v| EvaluationResult::new(v.clone()).coerce_string())
                .collect();
            Ok(EvaluationResult::string(parts.join(&separator)))
        }
        Value::Object(_) => Ok(EvaluationResult::string("")),
        _ => Ok(first.clone()),
    }
}

/// `format('{0} and {1}', a, b)`. `{{` and `}}` are literal braces.
fn format(args: &[EvaluationResult]) -> EvalResult<EvaluationResult> {
    let template = arg(args, 0, "format")?.coerce_string();
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(d) if d.is_ascii_digit() => digits.push(d),
                        _ => {
                            return Err(invalid(
                                "format",
                                format!("malformed placeholder in '{template}'"),
                            ))
                        }
                    }
                }
                let index: usize = digits.parse().map_err(|_| {
                    invalid("format", format!("malformed placeholder in '{template}'"))
                })?;
                let value = index
                    .checked_add(1)
                    .and_then(|i| args.get(i))
                    .ok_or_else(|| {
                        invalid(
                            "format",
                            format!("placeholder {{{index}}} has no argument"),
                        )
                    })?;
                out.push_str(&value.coerce_string());
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => {
                return Err(invalid(
                    "format",
                    format!("unbalanced '}}' in '{template}'"),
                ))
            }
            c => out.push(c),
        }
    }
    Ok(EvaluationResult::string(out))
}

/// `toJSON(value)`: pretty-printed with two-space indentation.
fn to_json(args: &[EvaluationResult]) -> EvalResult<EvaluationResult> {
    let value = arg(args, 0, "toJSON")?.value();
    serde_json::to_string_pretty(value)
        .map(EvaluationResult::string)
        .map_err(|e| invalid("toJSON", e.to_string()))
}

/// `fromJSON(text)`
fn from_json(args: &[EvaluationResult]) -> EvalResult<EvaluationResult> {
    let text = arg(args, 0, "fromJSON")?.coerce_string();
    serde_json::from_str::<Value>(&text)
        .map(EvaluationResult::new)
        .map_err(|e| invalid("fromJSON", e.to_string()))
}
