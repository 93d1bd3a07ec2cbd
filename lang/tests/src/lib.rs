pub mod utils {
    use quill_driver::{Unit, init_logger};
    use quill_statics::{Defs, Env, Eval, Result, Tyck};
    use quill_syntax::{BinOpKind, Builder, Formatter, RcExpr, Ugly};

    pub fn show(node: &RcExpr) -> String {
        node.ugly(&Formatter::new())
    }

    pub fn tyck(defs: &Defs, node: &RcExpr) -> Result<RcExpr> {
        init_logger();
        node.tyck(&mut Env::new(defs))
    }

    pub fn eval(defs: &Defs, node: &RcExpr, resolve: bool) -> Result<RcExpr> {
        init_logger();
        let mut env = Env::new(defs);
        env.resolve = resolve;
        node.eval(&mut env)
    }

    /// Runs the nodes through a fresh unit and prints every value.
    pub fn wrapper_run(nodes: impl FnOnce(&mut Builder) -> Vec<RcExpr>) -> Vec<String> {
        init_logger();
        let mut unit = Unit::new();
        let nodes = nodes(&mut unit.builder);
        match unit.run(nodes) {
            | Ok(()) => unit.outcomes.iter().map(|outcome| unit.print(&outcome.value)).collect(),
            | Err(err) => {
                eprintln!("{}", err.render(false));
                panic!("Error running program");
            }
        }
    }

    /// `@x(Number) x + 1`
    pub fn succ(b: &mut Builder) -> RcExpr {
        let num = b.ident("Number");
        let x = b.ident("x");
        let one = b.num(1.0);
        let add = b.binop(BinOpKind::Add, x, one);
        b.func("x", num, vec![add])
    }

    /// `name = @n(Number) if n < 1 then 1 else n * name(n - 1)`
    pub fn fact(b: &mut Builder, name: &str) -> RcExpr {
        let num = b.ident("Number");
        let (n0, n1, n2) = (b.ident("n"), b.ident("n"), b.ident("n"));
        let (one0, one1, one2) = (b.num(1.0), b.num(1.0), b.num(1.0));
        let cond = b.binop(BinOpKind::Lt, n0, one0);
        let pred = b.binop(BinOpKind::Sub, n2, one2);
        let callee = b.ident(name);
        let rec = b.call(callee, pred);
        let mul = b.binop(BinOpKind::Mul, n1, rec);
        let body = b.if_(cond, vec![one1], vec![mul]);
        let func = b.func("n", num, vec![body]);
        b.alias(name, func)
    }
}

/// Checks the one-line rendering of a built node.
#[macro_export]
macro_rules! golden {
    ($name:ident, |$b:ident| $build:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let mut $b = ::quill_syntax::Builder::new();
            let node = $build;
            ::pretty_assertions::assert_eq!(::quill_tests::utils::show(&node), $expected);
        }
    };
}

/// Runs a program through a compilation unit and checks every printed value.
#[macro_export]
macro_rules! program {
    ($name:ident, |$b:ident| $build:expr, [$($expected:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            let values = ::quill_tests::utils::wrapper_run(|$b| $build);
            let expected: Vec<String> = vec![$($expected.to_owned()),*];
            ::pretty_assertions::assert_eq!(values, expected);
        }
    };
}
