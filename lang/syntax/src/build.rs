//! Node construction for hosts without a parser.
//!
//! Each node gets its own synthetic span drawn from the builder's counter, so
//! that distinct nodes are told apart in diagnostics and function types.

use crate::*;
use quill_utils::{fresh::Fresh, span::Span};

#[derive(Debug, Default)]
pub struct Builder {
    fresh: Fresh,
}

impl Builder {
    pub fn new() -> Self {
        Builder { fresh: Fresh::new() }
    }
    pub fn span(&mut self) -> Span {
        let n = self.fresh.alloc() + 1;
        Span::new(n, n + 1)
    }
    pub fn located(&mut self, span: Span, expr: impl Into<Expr>) -> RcExpr {
        span.make_rc(expr.into())
    }
    pub fn make(&mut self, expr: impl Into<Expr>) -> RcExpr {
        let span = self.span();
        self.located(span, expr)
    }
    pub fn type_id(&mut self, prefix: &str) -> TypeId {
        TypeId(self.fresh.name(prefix))
    }

    /* -------------------------------- Literals -------------------------------- */

    pub fn num(&mut self, n: f64) -> RcExpr {
        self.make(Literal::Number(n))
    }
    pub fn bool(&mut self, b: bool) -> RcExpr {
        self.make(Literal::Bool(b))
    }
    pub fn string(&mut self, s: &str) -> RcExpr {
        self.make(Literal::String(s.to_owned()))
    }
    pub fn list(&mut self, items: Seq) -> RcExpr {
        self.make(List(items))
    }

    /* ---------------------------------- Types --------------------------------- */

    pub fn builtin(&mut self, builtin: Builtin) -> RcExpr {
        self.make(builtin)
    }
    pub fn field(&mut self, name: &str, ty: RcExpr) -> RcExpr {
        self.make(Field { name: VarName::from(name), ty })
    }
    pub fn record(&mut self, fields: Vec<(&str, RcExpr)>) -> RcExpr {
        self.record_with(fields, None)
    }
    pub fn ranged_record(&mut self, fields: Vec<(&str, RcExpr)>, lo: f64, hi: f64) -> RcExpr {
        self.record_with(fields, Some(Range { lo, hi }))
    }
    fn record_with(&mut self, fields: Vec<(&str, RcExpr)>, range: Option<Range>) -> RcExpr {
        let fields = fields
            .into_iter()
            .map(|(name, ty)| self.span().make(Field { name: VarName::from(name), ty }))
            .collect();
        let id = self.type_id("struct");
        self.make(Record { id, fields, range })
    }
    pub fn enum_(&mut self, members: &[&str]) -> RcExpr {
        let members = members.iter().map(VarName::from).collect();
        let id = self.type_id("enum");
        self.make(Enum { id, members })
    }
    pub fn fn_ty(&mut self, arg: RcExpr, ret: RcExpr) -> RcExpr {
        let id = self.type_id("fn");
        self.make(FnTy { id, arg, ret })
    }
    pub fn self_ty(&mut self, ty: RcExpr) -> RcExpr {
        self.make(SelfTy(ty))
    }

    /* ---------------------------------- Binds --------------------------------- */

    pub fn ident(&mut self, name: &str) -> RcExpr {
        self.make(VarName::from(name))
    }
    pub fn arg(&mut self, name: &str, ty: RcExpr) -> RcExpr {
        self.make(Arg { name: VarName::from(name), ty })
    }
    pub fn alias(&mut self, name: &str, value: RcExpr) -> RcExpr {
        let target = self.ident(name);
        self.make(Alias::new(target, value, false))
    }
    /// A binding that is substituted even outside resolve mode.
    pub fn unalias(&mut self, name: &str, value: RcExpr) -> RcExpr {
        let target = self.ident(name);
        self.make(Alias::new(target, value, true))
    }
    pub fn alias_to(&mut self, target: RcExpr, value: RcExpr) -> RcExpr {
        self.make(Alias::new(target, value, false))
    }

    /* ------------------------------- Expressions ------------------------------ */

    pub fn func(&mut self, name: &str, ty: RcExpr, body: Seq) -> RcExpr {
        let arg = self.span().make(Arg { name: VarName::from(name), ty });
        self.make(Func { arg, body })
    }
    pub fn call(&mut self, callee: RcExpr, arg: RcExpr) -> RcExpr {
        self.make(Call { callee, arg })
    }
    pub fn binop(&mut self, op: BinOpKind, lhs: RcExpr, rhs: RcExpr) -> RcExpr {
        self.make(BinOp { op, lhs, rhs })
    }
    pub fn dot(&mut self, lhs: RcExpr, field: &str) -> RcExpr {
        let rhs = self.ident(field);
        self.binop(BinOpKind::Dot, lhs, rhs)
    }
    pub fn if_(&mut self, cond: RcExpr, then_br: Seq, else_br: Seq) -> RcExpr {
        self.make(If { cond, then_br, else_br })
    }
    pub fn block(&mut self, items: Seq) -> RcExpr {
        self.make(Block(items))
    }
    pub fn instance(&mut self, template: RcExpr, body: Seq) -> RcExpr {
        self.make(Instance { template, body })
    }
    pub fn match_(&mut self, scrut: RcExpr, cases: Vec<(RcExpr, Seq)>) -> RcExpr {
        let cases = cases
            .into_iter()
            .map(|(pattern, body)| self.span().make(MatchCase { pattern, body }))
            .collect();
        self.make(Match { scrut, cases })
    }
    pub fn while_(&mut self, cond: RcExpr, body: Seq) -> RcExpr {
        self.make(While { cond, body })
    }
    pub fn unknowable(&mut self) -> RcExpr {
        self.make(Unknowable)
    }
}
