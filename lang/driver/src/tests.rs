use crate::*;
use pretty_assertions::assert_eq;
use quill_syntax::{BinOpKind, Builder, RcExpr};

fn unit_with(conf: Conf) -> Unit {
    init_logger();
    Unit::with_conf(conf)
}

/// `name = @n(Number) if n < 1 then 1 else n * name(n - 1)`
fn fact(b: &mut Builder, name: &str) -> RcExpr {
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

#[test]
fn conf_defaults() {
    let conf = Conf::default();
    assert!(conf.resolve);
    assert_eq!((conf.width, conf.indent), (80, 2));
}

#[test]
fn conf_from_partial_toml() {
    let conf = Conf::from_toml_str("resolve = false\nwidth = 40\n").unwrap();
    assert_eq!(conf, Conf { resolve: false, width: 40, ..Conf::default() });
    assert!(matches!(Conf::from_toml_str("resolve = 3"), Err(UnitError::Conf(_))));
}

#[test]
fn conf_from_file() {
    let dir = std::env::temp_dir().join(format!("quill-conf-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("quill.toml");
    std::fs::write(&path, "indent = 4\n").unwrap();
    let conf = Conf::open(&path).unwrap();
    assert_eq!(conf, Conf { indent: 4, ..Conf::default() });
    let Err(UnitError::IoError(err)) = Conf::open(dir.join("missing.toml")) else {
        panic!("opened a missing file")
    };
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn definitions_persist_in_order() {
    let mut unit = unit_with(Conf::default());
    let x = unit.build(|b| {
        let (two, three) = (b.num(2.0), b.num(3.0));
        let add = b.binop(BinOpKind::Add, two, three);
        b.alias("x", add)
    });
    let y = unit.build(|b| {
        let (x, two) = (b.ident("x"), b.num(2.0));
        let mul = b.binop(BinOpKind::Mul, x, two);
        b.alias("y", mul)
    });
    unit.run([x, y]).unwrap();
    assert_eq!(unit.print(&unit.lookup("x").unwrap()), "5");
    assert_eq!(unit.print(&unit.lookup("y").unwrap()), "10");
    let types: Vec<_> = unit.outcomes.iter().map(|o| unit.print(&o.ty)).collect();
    assert_eq!(types, vec!["Number", "Number"]);
    assert_eq!(unit.print(&unit.outcomes[1].value), "y = 10");
}

#[test]
fn recursive_definition() {
    let mut unit = unit_with(Conf::default());
    let def = unit.build(|b| fact(b, "fact"));
    let outcome = unit.add(def).unwrap();
    assert_eq!(unit.print(&outcome.ty), "Number -> Number");
    assert_eq!(
        unit.print(&outcome.value),
        "fact = @n(Number) if n < 1 then 1 else n * fact(n - 1)"
    );
    let call = unit.build(|b| {
        let (callee, five) = (b.ident("fact"), b.num(5.0));
        b.call(callee, five)
    });
    let outcome = unit.add(call).unwrap();
    assert_eq!(unit.print(&outcome.value), "120");
    assert_eq!(unit.print(&outcome.ty), "Number");
    // functions are not replaced by their evaluated copies
    assert!(matches!(unit.lookup("fact").unwrap().inner, Expr::Func(_)));
}

#[test]
fn deep_recursion_with_default_conf() {
    let mut unit = unit_with(Conf::default());
    let def = unit.build(|b| fact(b, "fact"));
    let call = unit.build(|b| {
        let (callee, n) = (b.ident("fact"), b.num(150.0));
        b.call(callee, n)
    });
    unit.run([def, call]).unwrap();
    let expected = (1..=150).fold(1.0, |acc: f64, k| k as f64 * acc);
    let value = &unit.outcomes[1].value;
    assert_eq!(value.inner.as_number(), Some(expected));
}

#[test]
fn redefinition_aborts() {
    let mut unit = unit_with(Conf::default());
    let first = unit.build(|b| {
        let one = b.num(1.0);
        b.alias("x", one)
    });
    let second = unit.build(|b| {
        let two = b.num(2.0);
        b.alias("x", two)
    });
    let span = second.info.clone();
    let err = unit.run([first, second]).unwrap_err();
    let UnitError::Compile(err) = err else { panic!("unexpected {}", err) };
    assert_eq!(err.message(), "`x` is already defined");
    assert_eq!(err.indicators()[0].span, span);
    assert_eq!(unit.outcomes.len(), 1);
}

#[test]
fn self_reference_is_uninferable() {
    let mut unit = unit_with(Conf::default());
    let a = unit.build(|b| {
        let (a, one) = (b.ident("a"), b.num(1.0));
        let add = b.binop(BinOpKind::Add, a, one);
        b.alias("a", add)
    });
    let err = unit.add(a).unwrap_err();
    assert!(matches!(err, UnitError::Uninferable(_)));
    assert_eq!(err.render(false), "error: cannot infer the type of `a = a + 1`");
}

#[test]
fn symbolic_mode_keeps_names() {
    let program = |unit: &mut Unit| {
        let x = unit.build(|b| {
            let five = b.num(5.0);
            b.alias("x", five)
        });
        let f = unit.build(|b| {
            let (num, n, x) = (b.ident("Number"), b.ident("n"), b.ident("x"));
            let add = b.binop(BinOpKind::Add, n, x);
            let func = b.func("n", num, vec![add]);
            b.alias("f", func)
        });
        unit.run([x, f]).unwrap();
        unit.print(&unit.outcomes[1].value)
    };
    let mut symbolic = unit_with(Conf { resolve: false, ..Conf::default() });
    assert_eq!(program(&mut symbolic), "f = @n(Number) n + x");
    let mut resolved = unit_with(Conf::default());
    assert_eq!(program(&mut resolved), "f = @n(Number) n + 5");
}

#[test]
fn printing_follows_layout() {
    let mut unit = unit_with(Conf { width: 10, indent: 4, ..Conf::default() });
    let block = unit.build(|b| {
        let one = b.num(1.0);
        let bind = b.alias("alpha", one);
        let alpha = b.ident("alpha");
        b.block(vec![bind, alpha])
    });
    assert_eq!(unit.print(&block), "{\n    alpha = 1;\n    alpha\n}");
}
