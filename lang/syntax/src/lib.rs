//! The expression node model of quill.
//!
//! Every node is an [`Expr`] behind an [`RcExpr`]: a shared, located, persistent
//! value. Evaluation never edits a node in place; it builds new ones, except for
//! the once-settable `def` link of an [`Alias`].

pub mod fmt;
pub use fmt::*;
pub mod print;

pub mod builtin;
pub mod build;
pub use build::Builder;

mod impls;

use derive_more::From;
use quill_utils::span::Sp;
use std::{cell::OnceCell, rc::Rc};

pub type RcExpr = Rc<Sp<Expr>>;
/// An ordered body; its value is the value of the last element.
pub type Seq = Vec<RcExpr>;

/* --------------------------------- Binder --------------------------------- */

#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VarName(pub String);

/// Identity of a structural type, compared by name only.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TypeId(pub String);

/// Handle of a definition in the top-level store.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct DefId(pub usize);

/* -------------------------------- Literals -------------------------------- */

#[derive(From, Clone, Debug, PartialEq)]
pub enum Literal {
    Bool(bool),
    Number(f64),
    String(String),
}

/// `[a, b, c]`
#[derive(Clone, Debug, PartialEq)]
pub struct List(pub Seq);

/* ---------------------------------- Types --------------------------------- */

/// Inclusive numeric refinement of a record type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub lo: f64,
    pub hi: f64,
}

/// `x: T`, both as a standalone declaration and as a record member.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: VarName,
    pub ty: RcExpr,
}

/// `struct[lo..hi] { x: T, .. }`
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub id: TypeId,
    pub fields: Vec<Sp<Field>>,
    pub range: Option<Range>,
}

/// `enum { A, B }`
#[derive(Clone, Debug, PartialEq)]
pub struct Enum {
    pub id: TypeId,
    pub members: Vec<VarName>,
}

/// `A -> B`
#[derive(Clone, Debug, PartialEq)]
pub struct FnTy {
    pub id: TypeId,
    pub arg: RcExpr,
    pub ret: RcExpr,
}

/// `self(T)`: some value already known to have exactly type `T`.
#[derive(Clone, Debug, PartialEq)]
pub struct SelfTy(pub RcExpr);

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Builtin {
    Bool,
    Number,
    String,
    List,
    Type,
    Function,
    Any,
}

/* ---------------------------------- Binds --------------------------------- */

/// `x(T)`, the parameter of a function.
#[derive(Clone, Debug, PartialEq)]
pub struct Arg {
    pub name: VarName,
    pub ty: RcExpr,
}

/// `x = v`
#[derive(Clone, Debug, PartialEq)]
pub struct Alias {
    pub target: RcExpr,
    pub value: RcExpr,
    /// whether uses of the bound name are substituted outside resolve mode
    pub unalias: bool,
    /// link to the persisted top-level definition, set at most once
    pub def: OnceCell<DefId>,
}

/* ------------------------------- Expressions ------------------------------ */

/// `@x(T) body`
#[derive(Clone, Debug, PartialEq)]
pub struct Func {
    pub arg: Sp<Arg>,
    pub body: Seq,
}

/// `f(a)`
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub callee: RcExpr,
    pub arg: RcExpr,
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// field access; the right operand is the field name as an identifier
    Dot,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BinOp {
    pub op: BinOpKind,
    pub lhs: RcExpr,
    pub rhs: RcExpr,
}

/// `p => body`; the pattern `_` matches anything.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchCase {
    pub pattern: RcExpr,
    pub body: Seq,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Match {
    pub scrut: RcExpr,
    pub cases: Vec<Sp<MatchCase>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct While {
    pub cond: RcExpr,
    pub body: Seq,
}

#[derive(Clone, Debug, PartialEq)]
pub struct If {
    pub cond: RcExpr,
    pub then_br: Seq,
    pub else_br: Seq,
}

/// `{ a; b }`
#[derive(Clone, Debug, PartialEq)]
pub struct Block(pub Seq);

/// `T { x = 1 }`, a constructed value of a record or enum type.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub template: RcExpr,
    pub body: Seq,
}

/// A value whose content is not known during partial evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct Unknowable;

/* ---------------------------------- Expr ---------------------------------- */

#[derive(From, Clone, Debug, PartialEq)]
pub enum Expr {
    Lit(Literal),
    List(List),
    Record(Record),
    Enum(Enum),
    FnTy(FnTy),
    SelfTy(SelfTy),
    Builtin(Builtin),
    Arg(Arg),
    Alias(Alias),
    Ident(VarName),
    Func(Func),
    Call(Call),
    BinOp(BinOp),
    Field(Field),
    Match(Match),
    While(While),
    If(If),
    Block(Block),
    Instance(Instance),
    Unknowable(Unknowable),
}
