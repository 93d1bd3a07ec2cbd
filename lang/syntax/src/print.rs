//! Source-like rendering of nodes.

use crate::*;
use pretty::RcDoc;

/// Wide enough that no group ever breaks.
const UGLY_WIDTH: usize = 1 << 20;

macro_rules! impl_ugly_by_pretty {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'a> Ugly<'a, Formatter> for $ty {
                fn ugly(&self, f: &'a Formatter) -> String {
                    self.pretty(f).pretty(UGLY_WIDTH).to_string()
                }
            }
        )*
    };
}

impl_ugly_by_pretty!(Expr, Sp<Expr>, Literal, Sp<Arg>, Sp<Field>, Sp<MatchCase>);

/* --------------------------------- Helpers -------------------------------- */

/// `{ a; b }` or `{ x: T, .. }` depending on the separator.
fn braced<'a>(items: Vec<RcDoc<'a>>, sep: &'static str, f: &'a Formatter) -> RcDoc<'a> {
    if items.is_empty() {
        return RcDoc::text("{}");
    }
    RcDoc::concat([
        RcDoc::text("{"),
        RcDoc::concat([
            RcDoc::line(),
            RcDoc::intersperse(items, RcDoc::text(sep).append(RcDoc::line())),
        ])
        .nest(f.indent),
        RcDoc::line(),
        RcDoc::text("}"),
    ])
    .group()
}

fn seq<'a>(body: &Seq, f: &'a Formatter) -> RcDoc<'a> {
    braced(body.iter().map(|item| item.pretty(f)).collect(), ";", f)
}

/// A single-element body prints bare.
fn body<'a>(body: &Seq, f: &'a Formatter) -> RcDoc<'a> {
    match body.as_slice() {
        | [single] => single.pretty(f),
        | _ => seq(body, f),
    }
}

fn parens<'a>(doc: RcDoc<'a>) -> RcDoc<'a> {
    RcDoc::concat([RcDoc::text("("), doc, RcDoc::text(")")])
}

/// Nodes that can stand as an operand, callee or template without parentheses.
fn is_atomic(expr: &Expr) -> bool {
    match expr {
        | Expr::Lit(_)
        | Expr::List(_)
        | Expr::Record(_)
        | Expr::Enum(_)
        | Expr::SelfTy(_)
        | Expr::Builtin(_)
        | Expr::Ident(_)
        | Expr::Call(_)
        | Expr::Block(_)
        | Expr::Instance(_)
        | Expr::Unknowable(_) => true,
        | Expr::BinOp(BinOp { op, .. }) => *op == BinOpKind::Dot,
        | Expr::FnTy(_)
        | Expr::Arg(_)
        | Expr::Alias(_)
        | Expr::Func(_)
        | Expr::Field(_)
        | Expr::Match(_)
        | Expr::While(_)
        | Expr::If(_) => false,
    }
}

fn atom<'a>(expr: &RcExpr, f: &'a Formatter) -> RcDoc<'a> {
    if is_atomic(&expr.inner) { expr.pretty(f) } else { parens(expr.pretty(f)) }
}

fn operand<'a>(expr: &RcExpr, min: u8, f: &'a Formatter) -> RcDoc<'a> {
    match &expr.inner {
        | Expr::BinOp(BinOp { op, .. }) if op.precedence() < min => parens(expr.pretty(f)),
        | Expr::BinOp(_) => expr.pretty(f),
        | _ => atom(expr, f),
    }
}

impl BinOpKind {
    pub fn precedence(&self) -> u8 {
        match self {
            | BinOpKind::Eq | BinOpKind::Ne => 1,
            | BinOpKind::Lt | BinOpKind::Le | BinOpKind::Gt | BinOpKind::Ge => 2,
            | BinOpKind::Add | BinOpKind::Sub => 3,
            | BinOpKind::Mul | BinOpKind::Div | BinOpKind::Rem => 4,
            | BinOpKind::Dot => 5,
        }
    }
    pub fn symbol(&self) -> &'static str {
        match self {
            | BinOpKind::Add => "+",
            | BinOpKind::Sub => "-",
            | BinOpKind::Mul => "*",
            | BinOpKind::Div => "/",
            | BinOpKind::Rem => "%",
            | BinOpKind::Eq => "==",
            | BinOpKind::Ne => "!=",
            | BinOpKind::Lt => "<",
            | BinOpKind::Le => "<=",
            | BinOpKind::Gt => ">",
            | BinOpKind::Ge => ">=",
            | BinOpKind::Dot => ".",
        }
    }
}

/* --------------------------------- Pretty --------------------------------- */

impl<'a> Pretty<'a, Formatter> for Literal {
    fn pretty(&self, _f: &'a Formatter) -> RcDoc<'a> {
        match self {
            | Literal::Bool(b) => RcDoc::text(format!("{}", b)),
            | Literal::Number(n) => RcDoc::text(format!("{}", n)),
            | Literal::String(s) => RcDoc::text(format!("{:?}", s)),
        }
    }
}

impl<'a> Pretty<'a, Formatter> for Sp<Arg> {
    fn pretty(&self, f: &'a Formatter) -> RcDoc<'a> {
        let Arg { name, ty } = &self.inner;
        RcDoc::concat([RcDoc::text(name.plain().to_owned()), parens(ty.pretty(f))])
    }
}

impl<'a> Pretty<'a, Formatter> for Sp<Field> {
    fn pretty(&self, f: &'a Formatter) -> RcDoc<'a> {
        self.inner.pretty(f)
    }
}

impl<'a> Pretty<'a, Formatter> for Field {
    fn pretty(&self, f: &'a Formatter) -> RcDoc<'a> {
        let Field { name, ty } = self;
        RcDoc::concat([RcDoc::text(name.plain().to_owned()), RcDoc::text(": "), ty.pretty(f)])
    }
}

impl<'a> Pretty<'a, Formatter> for Sp<MatchCase> {
    fn pretty(&self, f: &'a Formatter) -> RcDoc<'a> {
        let MatchCase { pattern, body: case } = &self.inner;
        RcDoc::concat([pattern.pretty(f), RcDoc::text(" => "), body(case, f)])
    }
}

impl<'a> Pretty<'a, Formatter> for Sp<Expr> {
    fn pretty(&self, f: &'a Formatter) -> RcDoc<'a> {
        self.inner.pretty(f)
    }
}

impl<'a> Pretty<'a, Formatter> for Expr {
    fn pretty(&self, f: &'a Formatter) -> RcDoc<'a> {
        match self {
            | Expr::Lit(lit) => lit.pretty(f),
            | Expr::List(List(items)) => RcDoc::concat([
                RcDoc::text("["),
                RcDoc::intersperse(
                    items.iter().map(|item| item.pretty(f)),
                    RcDoc::text(",").append(RcDoc::line()),
                )
                .nest(f.indent),
                RcDoc::text("]"),
            ])
            .group(),
            | Expr::Record(Record { id: _, fields, range }) => {
                let head = match range {
                    | Some(Range { lo, hi }) => format!("struct[{}..{}]", lo, hi),
                    | None => format!("struct"),
                };
                RcDoc::concat([
                    RcDoc::text(head),
                    RcDoc::space(),
                    braced(fields.iter().map(|field| field.pretty(f)).collect(), ",", f),
                ])
            }
            | Expr::Enum(Enum { id: _, members }) => RcDoc::concat([
                RcDoc::text("enum"),
                RcDoc::space(),
                braced(
                    members.iter().map(|m| RcDoc::text(m.plain().to_owned())).collect(),
                    ",",
                    f,
                ),
            ]),
            | Expr::FnTy(FnTy { id: _, arg, ret }) => {
                let arg = match &arg.inner {
                    | Expr::FnTy(_) => parens(arg.pretty(f)),
                    | _ => atom(arg, f),
                };
                RcDoc::concat([arg, RcDoc::text(" -> "), ret.pretty(f)])
            }
            | Expr::SelfTy(SelfTy(ty)) => {
                RcDoc::concat([RcDoc::text("self"), parens(ty.pretty(f))])
            }
            | Expr::Builtin(b) => RcDoc::text(b.name()),
            | Expr::Arg(Arg { name, ty }) => {
                RcDoc::concat([RcDoc::text(name.plain().to_owned()), parens(ty.pretty(f))])
            }
            | Expr::Alias(Alias { target, value, .. }) => {
                RcDoc::concat([target.pretty(f), RcDoc::text(" = "), value.pretty(f)])
            }
            | Expr::Ident(name) => RcDoc::text(name.plain().to_owned()),
            | Expr::Func(Func { arg, body: fbody }) => RcDoc::concat([
                RcDoc::text("@"),
                arg.pretty(f),
                RcDoc::space(),
                body(fbody, f),
            ]),
            | Expr::Call(Call { callee, arg }) => {
                RcDoc::concat([atom(callee, f), parens(arg.pretty(f))])
            }
            | Expr::BinOp(BinOp { op: BinOpKind::Dot, lhs, rhs }) => RcDoc::concat([
                operand(lhs, BinOpKind::Dot.precedence(), f),
                RcDoc::text("."),
                atom(rhs, f),
            ]),
            | Expr::BinOp(BinOp { op, lhs, rhs }) => RcDoc::concat([
                operand(lhs, op.precedence(), f),
                RcDoc::text(format!(" {} ", op.symbol())),
                operand(rhs, op.precedence() + 1, f),
            ]),
            | Expr::Field(field) => field.pretty(f),
            | Expr::Match(Match { scrut, cases }) => RcDoc::concat([
                RcDoc::text("match "),
                scrut.pretty(f),
                RcDoc::space(),
                braced(cases.iter().map(|case| case.pretty(f)).collect(), ",", f),
            ]),
            | Expr::While(While { cond, body }) => RcDoc::concat([
                RcDoc::text("while "),
                cond.pretty(f),
                RcDoc::space(),
                seq(body, f),
            ]),
            | Expr::If(If { cond, then_br, else_br }) => RcDoc::concat([
                RcDoc::text("if "),
                cond.pretty(f),
                RcDoc::text(" then"),
                RcDoc::concat([RcDoc::line(), body(then_br, f)]).nest(f.indent),
                RcDoc::line(),
                RcDoc::text("else"),
                RcDoc::concat([RcDoc::line(), body(else_br, f)]).nest(f.indent),
            ])
            .group(),
            | Expr::Block(Block(items)) => seq(items, f),
            | Expr::Instance(Instance { template, body }) => RcDoc::concat([
                atom(template, f),
                RcDoc::space(),
                braced(body.iter().map(|item| item.pretty(f)).collect(), ",", f),
            ]),
            | Expr::Unknowable(Unknowable) => RcDoc::text("?"),
        }
    }
}
