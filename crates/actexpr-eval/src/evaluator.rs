//! Tree-walking expression evaluator.

use crate::coerce::{equals, greater_or_equal, greater_than, less_or_equal, less_than};
use crate::context::Context;
use crate::error::{EvalError, EvalResult};
use crate::functions::FunctionRegistry;
use crate::number::to_number;
use crate::result::EvaluationResult;
use crate::value::Value;
use actexpr_types::ast::*;

/// Evaluate `expr` against `ctx` with the built-in functions.
pub fn evaluate(expr: &Expr, ctx: &Context) -> EvalResult<EvaluationResult> {
    Evaluator::new().evaluate(expr, ctx)
}

/// Walks AST nodes and produces [`EvaluationResult`]s.
///
/// Holds no per-evaluation state: one evaluator can serve any number of
/// evaluations, from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'f> {
    functions: &'f FunctionRegistry,
}

impl Evaluator<'static> {
    /// An evaluator dispatching to the built-in functions.
    pub fn new() -> Self {
        Self {
            functions: FunctionRegistry::builtins(),
        }
    }
}

impl Default for Evaluator<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'f> Evaluator<'f> {
    /// An evaluator dispatching to a caller-provided registry.
    pub fn with_functions(functions: &'f FunctionRegistry) -> Self {
        Self { functions }
    }

    /// The registry calls are dispatched to.
    pub fn functions(&self) -> &'f FunctionRegistry {
        self.functions
    }

    /// Evaluate an expression tree.
    #[tracing::instrument(level = "trace", skip_all, fields(at = %expr.span))]
    pub fn evaluate(&self, expr: &Expr, ctx: &Context) -> EvalResult<EvaluationResult> {
        self.eval_expr(expr, ctx)
    }

    fn eval_expr(&self, expr: &Expr, ctx: &Context) -> EvalResult<EvaluationResult> {
        match &expr.kind {
            ExprKind::NullLit => Ok(EvaluationResult::null()),
            ExprKind::BoolLit(b) => Ok(EvaluationResult::bool(*b)),
            ExprKind::IntLit(i) => Ok(EvaluationResult::number(*i as f64)),
            ExprKind::FloatLit(f) => Ok(EvaluationResult::number(*f)),
            ExprKind::StringLit(s) => Ok(EvaluationResult::string(s.as_str())),

            ExprKind::Variable(name) => self.eval_variable(name, ctx),
            ExprKind::ObjectDeref { receiver, property } => {
                self.eval_object_deref(receiver, &property.name, ctx)
            }
            ExprKind::IndexAccess { operand, index } => self.eval_index_access(operand, index, ctx),

            ExprKind::Not(operand) => {
                let val = self.eval_expr(operand, ctx)?;
                Ok(EvaluationResult::bool(val.falsy()))
            }
            ExprKind::Compare { left, op, right } => self.eval_compare(left, *op, right, ctx),
            ExprKind::Logical { left, op, right } => self.eval_logical(left, *op, right, ctx),

            ExprKind::FuncCall { callee, args } => self.eval_call(&callee.name, args, ctx),
        }
    }

    // ── Context access ───────────────────────────────────────────────────

    fn eval_variable(&self, name: &str, ctx: &Context) -> EvalResult<EvaluationResult> {
        ctx.get(name)
            .cloned()
            .map(EvaluationResult::new)
            .ok_or_else(|| EvalError::UnknownVariable(name.to_string()))
    }

    fn eval_object_deref(
        &self,
        receiver: &Expr,
        property: &str,
        ctx: &Context,
    ) -> EvalResult<EvaluationResult> {
        let obj = self.eval_expr(receiver, ctx)?;
        match obj.value() {
            Value::Object(fields) => fields
                .get(property)
                .cloned()
                .map(EvaluationResult::new)
                .ok_or_else(|| EvalError::UnknownProperty(property.to_string())),
            other => Err(EvalError::TypeMismatch(format!(
                "cannot access property '{property}' on {}",
                other.type_name()
            ))),
        }
    }

    fn eval_index_access(
        &self,
        operand: &Expr,
        index: &Expr,
        ctx: &Context,
    ) -> EvalResult<EvaluationResult> {
        let array = self.eval_expr(operand, ctx)?;
        let Value::Array(items) = array.value() else {
            return Err(EvalError::TypeMismatch(format!(
                "index access is not supported on {}",
                array.value().type_name()
            )));
        };

        let idx = self.eval_expr(index, ctx)?;
        let n = to_number(idx.value());
        if n.is_nan() {
            tracing::trace!(index = ?idx.value(), "non-numeric index yields null");
            return Ok(EvaluationResult::unknown());
        }

        let out_of_range = EvalError::IndexOutOfRange {
            index: n,
            len: items.len(),
        };
        if n < 0.0 || n.is_infinite() {
            return Err(out_of_range);
        }
        // n is finite and non-negative here; `as` saturates on huge values
        let i = n.floor() as usize;
        items
            .get(i)
            .cloned()
            .map(EvaluationResult::new)
            .ok_or(out_of_range)
    }

    // ── Operators ────────────────────────────────────────────────────────

    fn eval_compare(
        &self,
        left: &Expr,
        op: CompareOp,
        right: &Expr,
        ctx: &Context,
    ) -> EvalResult<EvaluationResult> {
        let lv = self.eval_expr(left, ctx)?;
        let rv = self.eval_expr(right, ctx)?;

        let result = match op {
            CompareOp::Eq => equals(&lv, &rv),
            CompareOp::NotEq => !equals(&lv, &rv),
            CompareOp::Greater => greater_than(&lv, &rv),
            CompareOp::GreaterEq => greater_or_equal(&lv, &rv),
            CompareOp::Less => less_than(&lv, &rv),
            CompareOp::LessEq => less_or_equal(&lv, &rv),
        };
        Ok(EvaluationResult::bool(result))
    }

    fn eval_logical(
        &self,
        left: &Expr,
        op: LogicalOp,
        right: &Expr,
        ctx: &Context,
    ) -> EvalResult<EvaluationResult> {
        let lv = self.eval_expr(left, ctx)?;
        match op {
            LogicalOp::Or if lv.truthy() => {
                tracing::trace!("'||' short-circuits on truthy left operand");
                return Ok(EvaluationResult::bool(true));
            }
            LogicalOp::And if lv.falsy() => {
                tracing::trace!("'&&' short-circuits on falsy left operand");
                return Ok(EvaluationResult::bool(false));
            }
            _ => {}
        }
        let rv = self.eval_expr(right, ctx)?;
        Ok(EvaluationResult::bool(rv.truthy()))
    }

    // ── Calls ────────────────────────────────────────────────────────────

    fn eval_call(&self, name: &str, args: &[Expr], ctx: &Context) -> EvalResult<EvaluationResult> {
        let arg_vals = args
            .iter()
            .map(|arg| self.eval_expr(arg, ctx))
            .collect::<EvalResult<Vec<_>>>()?;
        self.functions.call(name, &arg_vals)
    }
}
