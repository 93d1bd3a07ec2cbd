//! The type checker.
//!
//! Checking may evaluate: a callee is reduced to a concrete function before its
//! argument is checked, and the result of a call is typed after the call has
//! been evaluated.

use crate::*;

pub trait Tyck {
    /// The type of `self`, or why it has none.
    fn tyck(&self, env: &mut Env) -> Result<RcExpr>;
}

impl Tyck for RcExpr {
    fn tyck(&self, env: &mut Env) -> Result<RcExpr> {
        grow(|| tyck_expr(env, self))
    }
}

fn tyck_expr(env: &mut Env, expr: &RcExpr) -> Result<RcExpr> {
    env.trace("tyck", expr);
    let ty = match &expr.inner {
        | Expr::Lit(lit) => Ok(lit.builtin().node()),
        | Expr::List(List(items)) => tyck_list(env, items),
        | Expr::Record(Record { fields, .. }) => {
            for field in fields.iter() {
                match type_expr(env, &field.inner.ty) {
                    // a field referring back to the record being checked
                    | Err(Fault::Void) => {}
                    | res => {
                        res?;
                    }
                }
            }
            Ok(Builtin::Type.node())
        }
        | Expr::FnTy(FnTy { arg, ret, .. }) => {
            type_expr(env, arg)?;
            type_expr(env, ret)?;
            Ok(Builtin::Type.node())
        }
        | Expr::Enum(_) | Expr::Builtin(_) => Ok(Builtin::Type.node()),
        | Expr::SelfTy(SelfTy(ty)) => Ok(ty.clone()),
        | Expr::Arg(Arg { ty, .. }) | Expr::Field(Field { ty, .. }) => type_expr(env, ty),
        | Expr::Alias(alias) => tyck_alias(env, expr, alias),
        | Expr::Ident(name) => tyck_ident(env, expr, name),
        | Expr::Func(func) => tyck_func(env, expr, func),
        | Expr::Call(call) => tyck_call(env, expr, call),
        | Expr::BinOp(binop) => tyck_binop(env, expr, binop),
        | Expr::Match(m) => tyck_match(env, expr, m),
        | Expr::While(While { cond, body }) => {
            expect_bool(env, cond)?;
            tyck_seq(env, body, &expr.info)
        }
        | Expr::If(branch) => tyck_if(env, expr, branch),
        | Expr::Block(Block(items)) => tyck_seq(env, items, &expr.info),
        | Expr::Instance(inst) => tyck_instance(env, expr, inst),
        | Expr::Unknowable(_) => Ok(Builtin::Any.node()),
    }?;
    env.trace("type", &ty);
    Ok(ty)
}

/* -------------------------------- Sequences ------------------------------- */

/// The type of the last element. Each binding is visible to the elements after
/// it as a value of the binding's type.
pub fn tyck_seq(env: &mut Env, items: &[RcExpr], site: &Span) -> Result<RcExpr> {
    let Some((last, init)) = items.split_last() else {
        return env.err(TyckError::EmptySequence { site: site.clone() });
    };
    env.guarded(|env| {
        for item in init {
            tyck_item(env, item)?;
        }
        tyck_item(env, last)
    })
}

fn tyck_item(env: &mut Env, item: &RcExpr) -> Result<RcExpr> {
    let ty = item.tyck(env)?;
    if let Expr::Alias(alias) = &item.inner {
        if let Some(name) = alias.name() {
            let placeholder = item.info.make_rc(Expr::SelfTy(SelfTy(ty.clone())));
            env.push(Binding::new(name.clone(), placeholder, false));
        }
    }
    Ok(ty)
}

/* ---------------------------------- Types --------------------------------- */

/// A type expression, reduced to the type it denotes.
pub fn type_expr(env: &mut Env, ty: &RcExpr) -> Result<RcExpr> {
    ty.tyck(env)?;
    let value = env.with_resolve(true, |env| ty.eval(env))?;
    if value.inner.is_type() {
        Ok(value)
    } else {
        env.err(TyckError::NotAType { found: env.show(&value), site: ty.info.clone() })
    }
}

/// Like [`type_expr`], but anything that is not a type declares `Any`.
fn declared_type(env: &mut Env, ty: &RcExpr) -> Result<RcExpr> {
    ty.tyck(env)?;
    let value = env.with_resolve(true, |env| ty.eval(env))?;
    if value.inner.is_type() { Ok(value) } else { Ok(Builtin::Any.node()) }
}

pub fn fn_id(span: &Span) -> TypeId {
    TypeId(format!("fn@{}", span))
}

fn expect(env: &Env, expected: &RcExpr, found: &RcExpr, site: &Span) -> Result<()> {
    if compatible(&expected.inner, &found.inner) {
        Ok(())
    } else {
        env.err(TyckError::TypeMismatch {
            expected: env.show(expected),
            found: env.show(found),
            site: site.clone(),
        })
    }
}

fn expect_bool(env: &mut Env, cond: &RcExpr) -> Result<()> {
    let ty = cond.tyck(env)?;
    if compatible(&Expr::Builtin(Builtin::Bool), &ty.inner) {
        Ok(())
    } else {
        env.err(TyckError::ConditionNotBool { found: env.show(&ty), site: cond.info.clone() })
    }
}

fn tyck_list(env: &mut Env, items: &[RcExpr]) -> Result<RcExpr> {
    let mut first: Option<RcExpr> = None;
    for item in items {
        let ty = item.tyck(env)?;
        match &first {
            | None => first = Some(ty),
            | Some(expected) => expect(env, expected, &ty, &item.info)?,
        }
    }
    Ok(Builtin::List.node())
}

/* ---------------------------------- Binds --------------------------------- */

fn tyck_alias(env: &mut Env, expr: &RcExpr, alias: &Alias) -> Result<RcExpr> {
    let Some(name) = alias.name() else {
        return env.err(TyckError::InvalidBindingTarget {
            target: env.show(&alias.target),
            site: alias.target.info.clone(),
        });
    };
    if let Some(found) = env.lookup(name) {
        let own = matches!(
            (found.origin, alias.def.get()),
            (Origin::Defined(def), Some(own)) if def == *own
        );
        if !own {
            return env.err(TyckError::AlreadyDefined {
                name: name.to_string(),
                site: expr.info.clone(),
                prev: found.value.info.clone(),
            });
        }
    }
    alias.value.tyck(env)
}

fn tyck_ident(env: &mut Env, expr: &RcExpr, name: &VarName) -> Result<RcExpr> {
    let Some(found) = env.lookup(name) else {
        return env
            .err(TyckError::AliasNotFound { name: name.to_string(), site: expr.info.clone() });
    };
    let value = found.value;
    env.with_locals_cleared(|env| match (&value.inner, found.origin) {
        | (Expr::Func(_), _) | (_, Origin::Local) | (_, Origin::Builtin) => value.tyck(env),
        | (_, Origin::Defined(_)) => {
            // a definition that mentions itself outside of a function
            if env.is_on_stack(&value) {
                log::debug!("[void] {} refers to itself", name);
                return Err(Fault::Void);
            }
            env.with_call(value.clone(), |env| value.tyck(env))
        }
    })
}

/* ------------------------------- Functions -------------------------------- */

fn tyck_func(env: &mut Env, expr: &RcExpr, func: &Func) -> Result<RcExpr> {
    if env.is_on_stack(expr) {
        log::debug!("[void] {} is being checked", env.show(expr));
        return Err(Fault::Void);
    }
    let Sp { inner: Arg { name, ty }, info } = &func.arg;
    let arg_ty = declared_type(env, ty)?;
    let placeholder = info.make_rc(Expr::SelfTy(SelfTy(arg_ty.clone())));
    let ret = env.with_call(expr.clone(), |env| {
        env.with_binding(Binding::new(name.clone(), placeholder, false), |env| {
            env.with_resolve(false, |env| tyck_seq(env, &func.body, &expr.info))
        })
    })?;
    Ok(expr.info.make_rc(Expr::FnTy(FnTy { id: fn_id(&expr.info), arg: arg_ty, ret })))
}

fn tyck_call(env: &mut Env, expr: &RcExpr, call: &Call) -> Result<RcExpr> {
    let callee_ty = call.callee.tyck(env)?;
    let declared = match &callee_ty.inner {
        | Expr::FnTy(fn_ty) => Some(fn_ty),
        | Expr::Builtin(Builtin::Function | Builtin::Any) => None,
        | _ => {
            return env.err(TyckError::NotCallable {
                ty: env.show(&callee_ty),
                site: expr.info.clone(),
            });
        }
    };
    let arg_ty = call.arg.tyck(env)?;
    let callee = env.with_resolve(true, |env| call.callee.eval(env))?;
    let Expr::Func(func) = &callee.inner else {
        // the callee is not known yet; trust its declared signature
        return match declared {
            | Some(fn_ty) => {
                check_arg(env, expr, call, &fn_ty.arg, &arg_ty, &call.callee.info)?;
                Ok(fn_ty.ret.clone())
            }
            | None => Ok(Builtin::Any.node()),
        };
    };
    let Some(fn_ty) = declared else {
        panic!("function `{}` has non-function type `{}`", env.show(&callee), env.show(&callee_ty))
    };
    check_arg(env, expr, call, &fn_ty.arg, &arg_ty, &callee.info)?;

    // type what the call reduces to, with the parameter standing for its type
    let result = env.with_resolve(true, |env| expr.eval(env))?;
    let placeholder = func.arg.info.make_rc(Expr::SelfTy(SelfTy(fn_ty.arg.clone())));
    let param = func.arg.inner.name.clone();
    env.with_call(callee.clone(), |env| {
        env.with_binding(Binding::new(param, placeholder, true), |env| result.tyck(env))
    })
}

fn check_arg(
    env: &Env, expr: &RcExpr, call: &Call, expected: &RcExpr, found: &RcExpr, def: &Span,
) -> Result<()> {
    if compatible(&expected.inner, &found.inner) {
        return Ok(());
    }
    env.err(TyckError::ArgumentMismatch {
        expected: env.show(expected),
        found: env.show(found),
        call: expr.info.clone(),
        arg: call.arg.info.clone(),
        def: def.clone(),
    })
}

/* -------------------------------- Operators ------------------------------- */

fn tyck_binop(env: &mut Env, expr: &RcExpr, binop: &BinOp) -> Result<RcExpr> {
    let BinOp { op, lhs, rhs } = binop;
    if *op == BinOpKind::Dot {
        return tyck_dot(env, expr, lhs, rhs);
    }
    for operand in [lhs, rhs] {
        let ty = operand.tyck(env)?;
        if !compatible(&Expr::Builtin(Builtin::Number), &ty.inner) {
            return env.err(TyckError::OperandNotNumber {
                op: op.symbol().to_owned(),
                found: env.show(&ty),
                operand: operand.info.clone(),
            });
        }
    }
    if op.is_arithmetic() { Ok(Builtin::Number.node()) } else { Ok(Builtin::Bool.node()) }
}

fn no_such_field<T>(env: &Env, expr: &RcExpr, field: &RcExpr, ty: &RcExpr) -> Result<T> {
    env.err(TyckError::NoSuchField {
        field: env.show(field),
        ty: env.show(ty),
        site: expr.info.clone(),
    })
}

fn tyck_dot(env: &mut Env, expr: &RcExpr, lhs: &RcExpr, rhs: &RcExpr) -> Result<RcExpr> {
    let Some(field) = rhs.inner.as_ident() else {
        return no_such_field(env, expr, rhs, lhs);
    };
    let value = lhs.eval(env)?;
    if let Expr::Instance(inst) = &value.inner {
        return match inst.field(field) {
            | Some(value) => value.tyck(env),
            | None => no_such_field(env, expr, rhs, &inst.template),
        };
    }
    // not constructed yet; fall back to the declared record type
    let lhs_ty = lhs.tyck(env)?;
    match &lhs_ty.inner {
        | Expr::Record(rec) => match rec.field(field) {
            | Some(decl) => type_expr(env, &decl.inner.ty),
            | None => no_such_field(env, expr, rhs, &lhs_ty),
        },
        | _ => no_such_field(env, expr, rhs, &lhs_ty),
    }
}

/* --------------------------------- Control -------------------------------- */

/// Combines branch types. A branch that is void defers to the others.
fn join(env: &Env, site: &RcExpr, arms: Vec<(Result<RcExpr>, Span)>) -> Result<RcExpr> {
    let mut known: Vec<(RcExpr, Span)> = Vec::new();
    for (res, span) in arms {
        match res {
            | Ok(ty) => known.push((ty, span)),
            | Err(Fault::Void) => {}
            | Err(err) => return Err(err),
        }
    }
    let Some((first, first_site)) = known.first() else {
        return env.err(TyckError::CannotInfer { site: site.info.clone() });
    };
    for (ty, span) in known.iter().skip(1) {
        if !compatible(&first.inner, &ty.inner) {
            return env.err(TyckError::BranchMismatch {
                lhs: env.show(first),
                rhs: env.show(ty),
                lhs_site: first_site.clone(),
                rhs_site: span.clone(),
            });
        }
    }
    Ok(first.clone())
}

fn seq_site(items: &[RcExpr], fallback: &Span) -> Span {
    items.last().map(|item| item.info.clone()).unwrap_or_else(|| fallback.clone())
}

fn tyck_if(env: &mut Env, expr: &RcExpr, branch: &If) -> Result<RcExpr> {
    let If { cond, then_br, else_br } = branch;
    expect_bool(env, cond)?;
    let then_ty = tyck_seq(env, then_br, &expr.info);
    let else_ty = tyck_seq(env, else_br, &expr.info);
    join(
        env,
        expr,
        vec![(then_ty, seq_site(then_br, &expr.info)), (else_ty, seq_site(else_br, &expr.info))],
    )
}

fn tyck_match(env: &mut Env, expr: &RcExpr, m: &Match) -> Result<RcExpr> {
    let scrut_ty = m.scrut.tyck(env)?;
    let mut arms = Vec::new();
    for case in m.cases.iter() {
        let MatchCase { pattern, body } = &case.inner;
        if !pattern.inner.is_wildcard() {
            let pattern_ty = pattern.tyck(env)?;
            expect(env, &scrut_ty, &pattern_ty, &pattern.info)?;
        }
        arms.push((tyck_seq(env, body, &case.info), seq_site(body, &case.info)));
    }
    join(env, expr, arms)
}

/* -------------------------------- Instances ------------------------------- */

fn tyck_instance(env: &mut Env, expr: &RcExpr, inst: &Instance) -> Result<RcExpr> {
    let template = type_expr(env, &inst.template)?;
    match &template.inner {
        | Expr::Record(rec) => {
            for item in inst.body.iter() {
                let Expr::Alias(alias) = &item.inner else {
                    return env.err(TyckError::InvalidBindingTarget {
                        target: env.show(item),
                        site: item.info.clone(),
                    });
                };
                let Some(name) = alias.name() else {
                    return env.err(TyckError::InvalidBindingTarget {
                        target: env.show(&alias.target),
                        site: alias.target.info.clone(),
                    });
                };
                let Some(field) = rec.field(name) else {
                    return env.err(TyckError::NoSuchField {
                        field: name.to_string(),
                        ty: env.show(&template),
                        site: item.info.clone(),
                    });
                };
                let expected = type_expr(env, &field.inner.ty)?;
                let found = alias.value.tyck(env)?;
                expect(env, &expected, &found, &alias.value.info)?;
                if let Some(Range { lo, hi }) = rec.range {
                    let value = env.with_resolve(true, |env| alias.value.eval(env))?;
                    if let Some(n) = value.inner.as_number() {
                        if n < lo || n > hi {
                            return env.err(TyckError::OutOfRange {
                                value: n,
                                lo,
                                hi,
                                site: alias.value.info.clone(),
                            });
                        }
                    }
                }
            }
            for field in rec.fields.iter() {
                if inst.field(&field.inner.name).is_none() {
                    return env.err(TyckError::MissingField {
                        field: field.inner.name.to_string(),
                        ty: env.show(&template),
                        site: expr.info.clone(),
                    });
                }
            }
            Ok(template)
        }
        | Expr::Enum(en) => match inst.body.as_slice() {
            | [member] => match member.inner.as_ident() {
                | Some(name) if en.has_member(name) => Ok(template),
                | _ => env.err(TyckError::NotAMember {
                    name: env.show(member),
                    ty: env.show(&template),
                    site: member.info.clone(),
                }),
            },
            | _ => env.err(TyckError::NotInstantiable {
                ty: env.show(&template),
                site: expr.info.clone(),
            }),
        },
        | _ => env.err(TyckError::NotInstantiable {
            ty: env.show(&template),
            site: inst.template.info.clone(),
        }),
    }
}
