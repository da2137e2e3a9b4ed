//! actexpr tree-walking evaluator.
//!
//! Evaluates GitHub Actions expressions from an already-parsed AST against a
//! read-only [`Context`], reproducing the JavaScript-style coercion rules of
//! the Actions runtime: loose `==`, case-insensitive strings, `Number()`
//! string parsing and truthy/falsy.
//!
//! ```
//! use actexpr_eval::{evaluate, Context, Value};
//! use actexpr_types::ast::{CompareOp, Expr};
//!
//! let ctx = Context::new().with("inputs", Value::from(serde_json::json!({"count": "2"})));
//! let expr = Expr::compare(Expr::deref(Expr::var("inputs"), "count"), CompareOp::Eq, Expr::int(2));
//! assert_eq!(evaluate(&expr, &ctx).unwrap().value(), &Value::Bool(true));
//! ```

pub mod coerce;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod number;
pub mod result;
pub mod value;

pub use context::Context;
pub use error::{EvalError, EvalResult};
pub use evaluator::{evaluate, Evaluator};
pub use functions::{Arity, FunctionDef, FunctionRegistry};
pub use number::{format_number, parse_number};
pub use result::EvaluationResult;
pub use value::{classify, Value};
