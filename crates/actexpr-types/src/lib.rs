//! Shared types for actexpr.
//!
//! This crate defines the expression AST, source spans and the descriptive
//! type tags attached to evaluated values. It is produced by the lexer/parser
//! side and consumed by the evaluator.

mod span;
mod ty;
pub mod ast;

pub use span::Span;
pub use ty::{ExprType, TypeTag};
