//! Type checking and partial evaluation of quill nodes.
//!
//! The two passes share one [`Env`] and call into each other: [`Tyck`] reduces
//! callees and field owners with [`Eval`], and evaluation reports unresolvable
//! names with the same diagnostics the checker uses.

#![allow(clippy::style)]
#![allow(clippy::useless_format)]

/// Scoped bindings, the call stack and the definition store.
pub mod env;
pub use env::*;
/// Faults and diagnostics.
pub mod err;
pub use err::*;
/// Type compatibility.
pub mod compat;
pub use compat::compatible;
/// The type checker.
pub mod tyck;
pub use tyck::{Tyck, tyck_seq, type_expr};
/// The partial evaluator.
pub mod eval;
pub use eval::{Eval, eval_seq, seq_value};

pub(crate) use quill_syntax::*;
pub(crate) use quill_utils::span::{Sp, Span};
