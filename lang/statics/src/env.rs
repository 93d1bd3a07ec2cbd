//! The binding environment shared by the checker and the evaluator.

use crate::*;
use indexmap::IndexMap;
use quill_utils::fresh::Fresh;
use std::rc::Rc;

/* -------------------------------- Bindings -------------------------------- */

#[derive(Clone, Debug)]
pub struct Binding {
    pub name: VarName,
    pub value: RcExpr,
    /// substituted even when not resolving
    pub unalias: bool,
    /// the binder's name in residual nodes, when it had to be renamed
    pub rename: Option<VarName>,
}

impl Binding {
    pub fn new(name: VarName, value: RcExpr, unalias: bool) -> Self {
        Binding { name, value, unalias, rename: None }
    }
    pub fn renamed(self, rename: Option<VarName>) -> Self {
        Binding { rename, ..self }
    }
}

/// Where a name was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    Local,
    Defined(DefId),
    Builtin,
}

#[derive(Clone, Debug)]
pub struct Resolved {
    pub value: RcExpr,
    pub unalias: bool,
    pub rename: Option<VarName>,
    pub origin: Origin,
}

/* ---------------------------------- Store --------------------------------- */

/// Read access to the persisted top-level definitions.
#[auto_impl::auto_impl(&, &mut, Box, Rc)]
pub trait DefStore {
    fn lookup(&self, name: &VarName) -> Option<(DefId, RcExpr)>;
}

/// Registration of top-level definitions, once per name.
#[auto_impl::auto_impl(&mut, Box)]
pub trait DefStoreMut: DefStore {
    fn register(&mut self, name: VarName, value: RcExpr) -> DefId;
    fn replace(&mut self, def: DefId, value: RcExpr);
}

/// In-memory store keeping definitions in registration order.
#[derive(Clone, Debug, Default)]
pub struct Defs {
    defs: IndexMap<VarName, RcExpr>,
}

impl Defs {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn contains(&self, name: &VarName) -> bool {
        self.defs.contains_key(name)
    }
    pub fn len(&self) -> usize {
        self.defs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
    pub fn get(&self, def: DefId) -> Option<(&VarName, &RcExpr)> {
        self.defs.get_index(def.0)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&VarName, &RcExpr)> {
        self.defs.iter()
    }
}

impl DefStore for Defs {
    fn lookup(&self, name: &VarName) -> Option<(DefId, RcExpr)> {
        self.defs.get_full(name).map(|(idx, _, value)| (DefId(idx), value.clone()))
    }
}

impl DefStoreMut for Defs {
    fn register(&mut self, name: VarName, value: RcExpr) -> DefId {
        let (idx, _) = self.defs.insert_full(name, value);
        DefId(idx)
    }
    fn replace(&mut self, def: DefId, value: RcExpr) {
        if let Some((_, slot)) = self.defs.get_index_mut(def.0) {
            *slot = value;
        }
    }
}

/* ----------------------------------- Env ---------------------------------- */

/// Scoped bindings, the call stack and the evaluation mode of one pass.
pub struct Env<'s> {
    bindings: Vec<Binding>,
    calls: im::Vector<RcExpr>,
    /// fully reduce values where possible
    pub resolve: bool,
    /// mark bindings produced while evaluating an applied body as substitutable
    pub unalias: bool,
    pub fmt: Formatter,
    store: &'s dyn DefStore,
}

impl<'s> Env<'s> {
    pub fn new(store: &'s dyn DefStore) -> Self {
        Env {
            bindings: Vec::new(),
            calls: im::Vector::new(),
            resolve: true,
            unalias: false,
            fmt: Formatter::new(),
            store,
        }
    }

    pub fn push(&mut self, binding: Binding) {
        log::debug!("[bind] {} = {}", binding.name, binding.value.ugly(&self.fmt));
        self.bindings.push(binding);
    }
    pub fn pop(&mut self) -> Option<Binding> {
        self.bindings.pop()
    }
    pub fn locals(&self) -> &[Binding] {
        &self.bindings
    }
    pub fn show(&self, item: &RcExpr) -> String {
        item.ugly(&self.fmt)
    }
    pub fn trace(&self, msg: impl std::fmt::Display, item: &RcExpr) {
        log::trace!("[{}] {}", msg, self.show(item));
    }
    /// Raises a diagnostic.
    pub fn err<T>(&self, error: TyckError) -> Result<T> {
        log::debug!("[error] {}", error);
        Err(error.into())
    }

    /// Innermost local first, then the store, then the built-ins.
    pub fn lookup(&self, name: &VarName) -> Option<Resolved> {
        if let Some(binding) = self.bindings.iter().rev().find(|b| &b.name == name) {
            return Some(Resolved {
                value: binding.value.clone(),
                unalias: binding.unalias,
                rename: binding.rename.clone(),
                origin: Origin::Local,
            });
        }
        if let Some((def, value)) = self.store.lookup(name) {
            let origin = Origin::Defined(def);
            return Some(Resolved { value, unalias: false, rename: None, origin });
        }
        let builtin = Builtin::from_name(name.plain())?;
        let origin = Origin::Builtin;
        Some(Resolved { value: builtin.node(), unalias: false, rename: None, origin })
    }
    /// A fresh name for a binder whose name is already in scope, so that no
    /// residual use of the outer name is captured by it.
    pub fn hygienic(&self, name: &VarName) -> Option<VarName> {
        let taken = |name: &VarName| {
            self.lookup(name).is_some_and(|found| found.origin != Origin::Builtin)
        };
        if !taken(name) {
            return None;
        }
        Fresh::new().map(|k| VarName(format!("{}#{}", name, k))).find(|fresh| !taken(fresh))
    }

    pub fn enter_call(&mut self, func: RcExpr) {
        self.calls.push_back(func);
    }
    pub fn exit_call(&mut self) -> Option<RcExpr> {
        self.calls.pop_back()
    }
    /// Membership by node identity.
    pub fn is_on_stack(&self, func: &RcExpr) -> bool {
        self.calls.iter().any(|f| Rc::ptr_eq(f, func))
    }
    pub fn depth(&self) -> usize {
        self.calls.len()
    }
}

/* --------------------------------- Guards --------------------------------- */

impl<'s> Env<'s> {
    /// Runs `with` and restores the local scope and the call stack afterwards.
    pub fn guarded<R>(&mut self, with: impl FnOnce(&mut Self) -> R) -> R {
        let len = self.bindings.len();
        let calls = self.calls.clone();
        let res = with(self);
        self.bindings.truncate(len);
        self.calls = calls;
        res
    }
    pub fn with_binding<R>(&mut self, binding: Binding, with: impl FnOnce(&mut Self) -> R) -> R {
        self.guarded(|env| {
            env.push(binding);
            with(env)
        })
    }
    pub fn with_call<R>(&mut self, func: RcExpr, with: impl FnOnce(&mut Self) -> R) -> R {
        self.guarded(|env| {
            env.enter_call(func);
            with(env)
        })
    }
    pub fn with_resolve<R>(&mut self, resolve: bool, with: impl FnOnce(&mut Self) -> R) -> R {
        let old = std::mem::replace(&mut self.resolve, resolve);
        let res = with(self);
        self.resolve = old;
        res
    }
    pub fn with_unalias<R>(&mut self, unalias: bool, with: impl FnOnce(&mut Self) -> R) -> R {
        let old = std::mem::replace(&mut self.unalias, unalias);
        let res = with(self);
        self.unalias = old;
        res
    }
    /// Only top-level and built-in definitions are visible inside `with`.
    pub fn with_locals_cleared<R>(&mut self, with: impl FnOnce(&mut Self) -> R) -> R {
        let locals = std::mem::take(&mut self.bindings);
        let res = with(self);
        self.bindings = locals;
        res
    }
}

/* ---------------------------------- Stack --------------------------------- */

const RED_ZONE: usize = 128 * 1024;
const STACK_SEGMENT: usize = 2 * 1024 * 1024;

/// Runs `with` on a stack that grows on demand, so nesting is bounded only by
/// the program being checked.
pub fn grow<R>(with: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, with)
}
