//! The built-in type registry.

use crate::*;
use quill_utils::span::Span;

impl Builtin {
    pub const ALL: [Builtin; 7] = [
        Builtin::Bool,
        Builtin::Number,
        Builtin::String,
        Builtin::List,
        Builtin::Type,
        Builtin::Function,
        Builtin::Any,
    ];
    pub fn name(&self) -> &'static str {
        match self {
            | Builtin::Bool => "Bool",
            | Builtin::Number => "Number",
            | Builtin::String => "String",
            | Builtin::List => "List",
            | Builtin::Type => "Type",
            | Builtin::Function => "Function",
            | Builtin::Any => "Any",
        }
    }
    pub fn from_name(name: &str) -> Option<Builtin> {
        Builtin::ALL.into_iter().find(|b| b.name() == name)
    }
    /// The type node of this built-in, located at the built-in origin.
    pub fn node(self) -> RcExpr {
        Span::dummy().make_rc(Expr::Builtin(self))
    }
}

impl Literal {
    pub fn builtin(&self) -> Builtin {
        match self {
            | Literal::Bool(_) => Builtin::Bool,
            | Literal::Number(_) => Builtin::Number,
            | Literal::String(_) => Builtin::String,
        }
    }
}

impl Expr {
    pub fn is_builtin(&self, builtin: Builtin) -> bool {
        matches!(self, Expr::Builtin(b) if *b == builtin)
    }
}
