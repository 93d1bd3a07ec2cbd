//! The partial evaluator.
//!
//! Evaluation reduces a node as far as the environment allows and otherwise
//! returns a residual node of the same shape over evaluated pieces.

use crate::*;

pub trait Eval {
    fn eval(&self, env: &mut Env) -> Result<RcExpr>;
}

impl Eval for RcExpr {
    fn eval(&self, env: &mut Env) -> Result<RcExpr> {
        grow(|| eval_expr(env, self))
    }
}

fn eval_expr(env: &mut Env, expr: &RcExpr) -> Result<RcExpr> {
    env.trace(if env.resolve { "eval" } else { "eval~" }, expr);
    let span = &expr.info;
    match &expr.inner {
        | Expr::Lit(_) | Expr::Builtin(_) | Expr::Enum(_) | Expr::Unknowable(_) => {
            Ok(expr.clone())
        }
        | Expr::List(List(items)) => {
            let items = items.iter().map(|item| item.eval(env)).collect::<Result<Seq>>()?;
            Ok(span.make_rc(Expr::List(List(items))))
        }
        | Expr::Record(Record { id, fields, range }) => {
            let mut evaluated = Vec::with_capacity(fields.len());
            for field in fields.iter() {
                let Field { name, ty } = &field.inner;
                let ty = eval_type(env, ty)?;
                evaluated.push(field.info.make(Field { name: name.clone(), ty }));
            }
            let record = Record { id: id.clone(), fields: evaluated, range: *range };
            Ok(span.make_rc(Expr::Record(record)))
        }
        | Expr::FnTy(FnTy { id, arg, ret }) => {
            let arg = eval_type(env, arg)?;
            let ret = eval_type(env, ret)?;
            Ok(span.make_rc(Expr::FnTy(FnTy { id: id.clone(), arg, ret })))
        }
        | Expr::SelfTy(SelfTy(ty)) => {
            let ty = eval_type(env, ty)?;
            Ok(span.make_rc(Expr::SelfTy(SelfTy(ty))))
        }
        | Expr::Arg(Arg { name, ty }) => {
            let ty = eval_type(env, ty)?;
            Ok(span.make_rc(Expr::Arg(Arg { name: name.clone(), ty })))
        }
        | Expr::Field(Field { name, ty }) => {
            let ty = eval_type(env, ty)?;
            Ok(span.make_rc(Expr::Field(Field { name: name.clone(), ty })))
        }
        | Expr::Alias(alias) => {
            let value = alias.value.eval(env)?;
            Ok(span.make_rc(Expr::Alias(alias.with_value(value))))
        }
        | Expr::Ident(name) => eval_ident(env, expr, name),
        | Expr::Func(func) => eval_func(env, expr, func),
        | Expr::Call(call) => eval_call(env, expr, call),
        | Expr::BinOp(binop) => eval_binop(env, expr, binop),
        | Expr::Match(m) => eval_match(env, expr, m),
        | Expr::While(While { cond, body }) => {
            // without mutation a loop is never unrolled
            let cond = cond.eval(env)?;
            let body = eval_seq(env, body)?;
            Ok(span.make_rc(Expr::While(While { cond, body })))
        }
        | Expr::If(branch) => eval_if(env, expr, branch),
        | Expr::Block(Block(items)) => {
            let items = eval_seq(env, items)?;
            seq_value(env, items, span)
        }
        | Expr::Instance(Instance { template, body }) => {
            let template = eval_type(env, template)?;
            let mut evaluated = Vec::with_capacity(body.len());
            for item in body.iter() {
                match &item.inner {
                    // enum members name themselves
                    | Expr::Ident(_) => evaluated.push(item.clone()),
                    | _ => evaluated.push(item.eval(env)?),
                }
            }
            Ok(span.make_rc(Expr::Instance(Instance { template, body: evaluated })))
        }
    }
}

/* -------------------------------- Sequences ------------------------------- */

/// Evaluates in order; each binding is visible to the elements after it.
pub fn eval_seq(env: &mut Env, items: &[RcExpr]) -> Result<Seq> {
    env.guarded(|env| {
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let value = item.eval(env)?;
            out.push(bind_local(env, value));
        }
        Ok(out)
    })
}

/// Binds an evaluated sequence alias for the elements after it. A name already
/// in scope is bound under a fresh one, and the residual alias carries it.
fn bind_local(env: &mut Env, item: RcExpr) -> RcExpr {
    let Expr::Alias(alias) = &item.inner else { return item.clone() };
    let Some(name) = alias.name() else { return item.clone() };
    let unalias = alias.unalias || env.unalias;
    let fresh = env.hygienic(name);
    env.push(Binding::new(name.clone(), alias.value.clone(), unalias).renamed(fresh.clone()));
    match fresh {
        | Some(fresh) => {
            log::debug!("[rename] {} to {}", name, fresh);
            let target = alias.target.info.make_rc(Expr::Ident(fresh));
            item.info.make_rc(Expr::Alias(Alias { target, ..alias.clone() }))
        }
        | None => item.clone(),
    }
}

/// The value of an evaluated sequence. Outside resolve mode a sequence with
/// bindings stays a block so the bound names survive.
pub fn seq_value(env: &Env, items: Seq, site: &Span) -> Result<RcExpr> {
    let has_bindings = items.iter().any(|item| matches!(item.inner, Expr::Alias(_)));
    if env.resolve || !has_bindings {
        match items.last() {
            | Some(last) => Ok(last.clone()),
            | None => env.err(TyckError::EmptySequence { site: site.clone() }),
        }
    } else {
        Ok(site.make_rc(Expr::Block(Block(items))))
    }
}

/// Types are always reduced to what they denote.
fn eval_type(env: &mut Env, ty: &RcExpr) -> Result<RcExpr> {
    env.with_resolve(true, |env| ty.eval(env))
}

/* ---------------------------------- Binds --------------------------------- */

fn eval_ident(env: &mut Env, expr: &RcExpr, name: &VarName) -> Result<RcExpr> {
    let Some(found) = env.lookup(name) else {
        return env
            .err(TyckError::AliasNotFound { name: name.to_string(), site: expr.info.clone() });
    };
    // a placeholder only tells the type of the value
    let placeholder = matches!(found.value.inner, Expr::SelfTy(_) | Expr::Unknowable(_));
    if !placeholder && (env.resolve || found.unalias) {
        return Ok(found.value);
    }
    match found.rename {
        | Some(rename) => Ok(expr.info.make_rc(Expr::Ident(rename))),
        | None => Ok(expr.clone()),
    }
}

/* ------------------------------- Functions -------------------------------- */

fn eval_func(env: &mut Env, expr: &RcExpr, func: &Func) -> Result<RcExpr> {
    let Sp { inner: Arg { name, ty }, info } = &func.arg;
    let arg_ty = eval_type(env, ty)?;
    let placeholder = if arg_ty.inner.is_type() {
        info.make_rc(Expr::SelfTy(SelfTy(arg_ty.clone())))
    } else {
        info.make_rc(Expr::Unknowable(Unknowable))
    };
    let fresh = env.hygienic(name);
    let binding = Binding::new(name.clone(), placeholder, false).renamed(fresh.clone());
    let body = env.with_call(expr.clone(), |env| {
        env.with_binding(binding, |env| eval_seq(env, &func.body))
    })?;
    let arg = info.make(Arg { name: fresh.unwrap_or_else(|| name.clone()), ty: arg_ty });
    Ok(expr.info.make_rc(Expr::Func(Func { arg, body })))
}

fn eval_call(env: &mut Env, expr: &RcExpr, call: &Call) -> Result<RcExpr> {
    let callee = eval_type(env, &call.callee)?;
    let arg = call.arg.eval(env)?;
    if let Expr::Func(func) = &callee.inner {
        // a recursive call only unfolds on a fully known argument
        let unfold = !env.is_on_stack(&callee) || (env.resolve && arg.inner.is_static());
        if unfold {
            log::debug!("[inline] {}", env.show(expr));
            let param = func.arg.inner.name.clone();
            let value = env.with_call(callee.clone(), |env| {
                env.with_unalias(true, |env| {
                    env.with_binding(Binding::new(param, arg.clone(), true), |env| {
                        let items = eval_seq(env, &func.body)?;
                        seq_value(env, items, &expr.info)
                    })
                })
            })?;
            if env.resolve {
                return Ok(value);
            }
        }
    }
    let callee = match &call.callee.inner {
        // outside resolve mode a named callee keeps its name
        | Expr::Ident(name) if !env.resolve => eval_ident(env, &call.callee, name)?,
        | _ => residual_callee(env, &call.callee, callee),
    };
    Ok(expr.info.make_rc(Expr::Call(Call { callee, arg })))
}

/// A top-level function keeps its name in a residual call.
fn residual_callee(env: &Env, callee: &RcExpr, evaluated: RcExpr) -> RcExpr {
    if let (Expr::Ident(name), Expr::Func(_)) = (&callee.inner, &evaluated.inner) {
        if matches!(
            env.lookup(name),
            Some(Resolved { origin: Origin::Defined(_) | Origin::Builtin, .. })
        ) {
            return callee.clone();
        }
    }
    evaluated
}

/* -------------------------------- Operators ------------------------------- */

fn eval_binop(env: &mut Env, expr: &RcExpr, binop: &BinOp) -> Result<RcExpr> {
    let BinOp { op, lhs, rhs } = binop;
    let lhs = lhs.eval(env)?;
    if *op == BinOpKind::Dot {
        if let (Expr::Instance(inst), Some(field)) = (&lhs.inner, rhs.inner.as_ident()) {
            return match inst.field(field) {
                | Some(value) => Ok(value.clone()),
                | None => env.err(TyckError::NoSuchField {
                    field: field.to_string(),
                    ty: env.show(&inst.template),
                    site: expr.info.clone(),
                }),
            };
        }
        let rhs = rhs.clone();
        return Ok(expr.info.make_rc(Expr::BinOp(BinOp { op: *op, lhs, rhs })));
    }
    let rhs = rhs.eval(env)?;
    if let (Some(a), Some(b)) = (lhs.inner.as_number(), rhs.inner.as_number()) {
        if let Some(lit) = op.fold(a, b) {
            return Ok(expr.info.make_rc(Expr::Lit(lit)));
        }
    }
    Ok(expr.info.make_rc(Expr::BinOp(BinOp { op: *op, lhs, rhs })))
}

/* --------------------------------- Control -------------------------------- */

fn eval_if(env: &mut Env, expr: &RcExpr, branch: &If) -> Result<RcExpr> {
    let If { cond, then_br, else_br } = branch;
    let cond = cond.eval(env)?;
    match cond.inner.as_bool() {
        | Some(taken) => {
            let items = eval_seq(env, if taken { then_br } else { else_br })?;
            seq_value(env, items, &expr.info)
        }
        | None => {
            let then_br = eval_seq(env, then_br)?;
            let else_br = eval_seq(env, else_br)?;
            Ok(expr.info.make_rc(Expr::If(If { cond, then_br, else_br })))
        }
    }
}

fn eval_match(env: &mut Env, expr: &RcExpr, m: &Match) -> Result<RcExpr> {
    let scrut = m.scrut.eval(env)?;
    if scrut.inner.is_static() {
        for case in m.cases.iter() {
            let MatchCase { pattern, body } = &case.inner;
            let hit = pattern.inner.is_wildcard() || pattern.eval(env)?.inner == scrut.inner;
            if hit {
                let items = eval_seq(env, body)?;
                return seq_value(env, items, &case.info);
            }
        }
        return env
            .err(TyckError::NoMatchingCase { scrut: env.show(&scrut), site: expr.info.clone() });
    }
    let mut cases = Vec::with_capacity(m.cases.len());
    for case in m.cases.iter() {
        let MatchCase { pattern, body } = &case.inner;
        let pattern =
            if pattern.inner.is_wildcard() { pattern.clone() } else { pattern.eval(env)? };
        let body = eval_seq(env, body)?;
        cases.push(case.info.make(MatchCase { pattern, body }));
    }
    Ok(expr.info.make_rc(Expr::Match(Match { scrut, cases })))
}
