use crate::*;
use std::{cell::OnceCell, fmt};

macro_rules! impl_name {
    ($name:ident) => {
        impl $name {
            pub fn plain(&self) -> &str {
                let $name(name) = self;
                name
            }
        }
        impl<T: AsRef<str>> From<T> for $name {
            fn from(name: T) -> Self {
                $name(name.as_ref().to_string())
            }
        }
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.plain())
            }
        }
    };
}

impl_name!(VarName);
impl_name!(TypeId);

impl VarName {
    pub fn is_wildcard(&self) -> bool {
        self.0 == "_"
    }
}

impl Expr {
    pub fn as_ident(&self) -> Option<&VarName> {
        match self {
            | Expr::Ident(name) => Some(name),
            | _ => None,
        }
    }
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            | Expr::Lit(Literal::Bool(b)) => Some(*b),
            | _ => None,
        }
    }
    pub fn as_number(&self) -> Option<f64> {
        match self {
            | Expr::Lit(Literal::Number(n)) => Some(*n),
            | _ => None,
        }
    }
    /// The pattern `_`.
    pub fn is_wildcard(&self) -> bool {
        self.as_ident().is_some_and(VarName::is_wildcard)
    }
    pub fn is_literal(&self) -> bool {
        matches!(self, Expr::Lit(_))
    }
    /// Type nodes, including the self-type placeholder.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Expr::Builtin(_) | Expr::Record(_) | Expr::Enum(_) | Expr::FnTy(_) | Expr::SelfTy(_)
        )
    }
    /// Fully known values: nothing left in them depends on an unresolved name.
    pub fn is_static(&self) -> bool {
        match self {
            | Expr::Lit(_)
            | Expr::Builtin(_)
            | Expr::Record(_)
            | Expr::Enum(_)
            | Expr::FnTy(_)
            | Expr::Func(_) => true,
            | Expr::List(List(items)) => items.iter().all(|item| item.inner.is_static()),
            | Expr::Instance(Instance { template, body }) => {
                template.inner.is_type()
                    && body.iter().all(|item| match &item.inner {
                        | Expr::Alias(alias) => alias.value.inner.is_static(),
                        | Expr::Ident(_) => true,
                        | _ => false,
                    })
            }
            | _ => false,
        }
    }
    /// The identity used by type compatibility.
    pub fn type_id(&self) -> Option<TypeId> {
        match self {
            | Expr::Builtin(b) => Some(TypeId::from(b.name())),
            | Expr::Record(Record { id, .. })
            | Expr::Enum(Enum { id, .. })
            | Expr::FnTy(FnTy { id, .. }) => Some(id.clone()),
            | Expr::SelfTy(SelfTy(ty)) => ty.inner.type_id(),
            | _ => None,
        }
    }
}

impl BinOpKind {
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinOpKind::Add | BinOpKind::Sub | BinOpKind::Mul | BinOpKind::Div | BinOpKind::Rem
        )
    }
    /// Folds two known operands; field access never folds.
    pub fn fold(&self, a: f64, b: f64) -> Option<Literal> {
        let lit = match self {
            | BinOpKind::Add => Literal::Number(a + b),
            | BinOpKind::Sub => Literal::Number(a - b),
            | BinOpKind::Mul => Literal::Number(a * b),
            | BinOpKind::Div => Literal::Number(a / b),
            | BinOpKind::Rem => Literal::Number(a % b),
            | BinOpKind::Eq => Literal::Bool(a == b),
            | BinOpKind::Ne => Literal::Bool(a != b),
            | BinOpKind::Lt => Literal::Bool(a < b),
            | BinOpKind::Le => Literal::Bool(a <= b),
            | BinOpKind::Gt => Literal::Bool(a > b),
            | BinOpKind::Ge => Literal::Bool(a >= b),
            | BinOpKind::Dot => return None,
        };
        Some(lit)
    }
}

impl Alias {
    pub fn new(target: RcExpr, value: RcExpr, unalias: bool) -> Self {
        Alias { target, value, unalias, def: OnceCell::new() }
    }
    /// The bound name, when the target is a plain identifier.
    pub fn name(&self) -> Option<&VarName> {
        self.target.inner.as_ident()
    }
    /// A copy carrying a new value; the definition link is kept.
    pub fn with_value(&self, value: RcExpr) -> Self {
        Alias { value, ..self.clone() }
    }
}

impl Instance {
    /// The value bound to `name` in the instance body.
    pub fn field(&self, name: &VarName) -> Option<&RcExpr> {
        self.body.iter().find_map(|item| match &item.inner {
            | Expr::Alias(alias) if alias.name() == Some(name) => Some(&alias.value),
            | _ => None,
        })
    }
}

impl Record {
    pub fn field(&self, name: &VarName) -> Option<&Sp<Field>> {
        self.fields.iter().find(|field| &field.inner.name == name)
    }
}

impl Enum {
    pub fn has_member(&self, name: &VarName) -> bool {
        self.members.contains(name)
    }
}
