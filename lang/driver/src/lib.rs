//! Compilation units of the quill language.
//!
//! A [`Unit`] feeds top-level nodes to the checker and the evaluator in source
//! order, persisting top-level definitions as it goes.

pub mod conf;
pub mod err;

pub use conf::Conf;
pub use err::*;

#[cfg(test)]
mod tests;

use quill_statics::{Defs, DefStoreMut, Env, Eval, Fault, Tyck};
use quill_syntax::{Builder, Builtin, DefId, Expr, Formatter, RcExpr, Ugly};
use sculptor::ProjectInfo;

/// Installs the `RUST_LOG` driven logger; repeated calls are harmless.
pub fn init_logger() {
    let _ = env_logger::builder().format_timestamp(None).try_init();
}

/// A processed top-level node.
#[derive(Clone, Debug)]
pub struct Outcome {
    pub node: RcExpr,
    pub ty: RcExpr,
    pub value: RcExpr,
}

pub struct Unit {
    /// configuration
    pub conf: Conf,
    /// the persisted top-level definitions
    pub defs: Defs,
    /// node construction for hosts without a parser
    pub builder: Builder,
    /// every node processed so far, in order
    pub outcomes: Vec<Outcome>,
}

impl Default for Unit {
    fn default() -> Self {
        Self::new()
    }
}

impl Unit {
    pub fn new() -> Self {
        Self::with_conf(Conf::default())
    }
    pub fn with_conf(conf: Conf) -> Self {
        Unit { conf, defs: Defs::new(), builder: Builder::new(), outcomes: Vec::new() }
    }
    /// Reads `quill.toml` from the configuration directory.
    pub fn load() -> Self {
        let path = Conf::config_dir().join("quill.toml");
        let conf = Conf::open(path.clone()).unwrap_or_else(|err| {
            log::warn!("Using default configuration; suppose to find one at `{}`.", path.display());
            log::debug!("[conf] {}", err);
            Conf::default()
        });
        Self::with_conf(conf)
    }

    pub fn build(&mut self, with: impl FnOnce(&mut Builder) -> RcExpr) -> RcExpr {
        with(&mut self.builder)
    }
    pub fn formatter(&self) -> Formatter {
        Formatter::with_layout(self.conf.indent, self.conf.width)
    }
    /// Renders a node with the configured layout.
    pub fn print(&self, node: &RcExpr) -> String {
        self.formatter().render(node)
    }
    /// The persisted value of a top-level name.
    pub fn lookup(&self, name: &str) -> Option<RcExpr> {
        self.defs.iter().find(|(n, _)| n.plain() == name).map(|(_, value)| value.clone())
    }

    fn env(&self) -> Env<'_> {
        let mut env = Env::new(&self.defs);
        env.fmt = self.formatter();
        env
    }
}

impl Unit {
    /// Checks and evaluates one top-level node; the first fault aborts.
    pub fn add(&mut self, node: RcExpr) -> Result<Outcome> {
        let def = self.link(&node);
        let ty = {
            let mut env = self.env();
            node.tyck(&mut env)
        }
        .map_err(|fault| self.fault(&node, fault))?;
        let value = {
            let mut env = self.env();
            env.resolve = self.conf.resolve;
            node.eval(&mut env)
        }
        .map_err(|fault| self.fault(&node, fault))?;
        if let (Some(def), Expr::Alias(alias), Expr::Alias(source)) =
            (def, &value.inner, &node.inner)
        {
            // function literals keep their identity for recursion detection
            let literal = matches!(source.value.inner, Expr::Func(_));
            if alias.value.inner.is_static() && !literal {
                log::debug!("[persist] {}", value.ugly(&Formatter::new()));
                self.defs.replace(def, alias.value.clone());
            }
        }
        log::info!("[unit] {} : {}", self.print(&node), self.print(&ty));
        let outcome = Outcome { node, ty, value };
        self.outcomes.push(outcome.clone());
        Ok(outcome)
    }
    /// Adds every node in order.
    pub fn run(&mut self, nodes: impl IntoIterator<Item = RcExpr>) -> Result<()> {
        for node in nodes {
            self.add(node)?;
        }
        Ok(())
    }

    /// Registers a top-level alias and links the node to its definition. A
    /// name that is taken stays unregistered and is reported by the checker.
    fn link(&mut self, node: &RcExpr) -> Option<DefId> {
        let Expr::Alias(alias) = &node.inner else { return None };
        let name = alias.name()?;
        if self.defs.contains(name) || Builtin::from_name(name.plain()).is_some() {
            return None;
        }
        let def = self.defs.register(name.clone(), alias.value.clone());
        if alias.def.set(def).is_err() {
            log::warn!("`{}` was already linked", name);
        }
        log::debug!("[define] {} as #{}", name, def.0);
        alias.def.get().copied()
    }

    fn fault(&self, node: &RcExpr, fault: Fault) -> UnitError {
        match fault {
            | Fault::Void => UnitError::Uninferable(node.ugly(&Formatter::new())),
            | Fault::Error(Some(err)) => UnitError::Compile(*err),
            | Fault::Error(None) => UnitError::Aborted,
        }
    }
}
