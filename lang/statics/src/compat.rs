//! Type compatibility.

use crate::*;

/// Whether a value of type `found` may stand where `expected` is required.
///
/// A self-type on either side always matches. `Any` accepts everything and
/// `Function` accepts any function type. Two function types match when their
/// return types do; argument types are not compared. Everything else is
/// compared by type identity.
pub fn compatible(expected: &Expr, found: &Expr) -> bool {
    match (expected, found) {
        | (Expr::SelfTy(_), _) | (_, Expr::SelfTy(_)) => true,
        | (Expr::Builtin(Builtin::Any), _) => true,
        | (Expr::Builtin(Builtin::Function), Expr::FnTy(_)) => true,
        | (Expr::FnTy(expected), Expr::FnTy(found)) => {
            compatible(&expected.ret.inner, &found.ret.inner)
        }
        | _ => match (expected.type_id(), found.type_id()) {
            | (Some(expected), Some(found)) => expected == found,
            | _ => false,
        },
    }
}
