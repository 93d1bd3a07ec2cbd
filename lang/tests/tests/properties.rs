use pretty_assertions::assert_eq;
use quill_statics::{Defs, DefStoreMut, Fault, compatible};
use quill_syntax::{BinOpKind, Builder, Expr, VarName};
use quill_tests::{program, utils::*};

#[test]
fn literal_folding() {
    let defs = Defs::new();
    let mut b = Builder::new();
    let (two, three) = (b.num(2.0), b.num(3.0));
    let add = b.binop(BinOpKind::Add, two, three);
    assert_eq!(show(&eval(&defs, &add, true).unwrap()), "5");

    // `@x(Number) x + (2 + 3)` keeps `x` but folds the literals
    let (num, x, two, three) = (b.ident("Number"), b.ident("x"), b.num(2.0), b.num(3.0));
    let inner = b.binop(BinOpKind::Add, two, three);
    let outer = b.binop(BinOpKind::Add, x, inner);
    let f = b.func("x", num, vec![outer]);
    assert_eq!(show(&eval(&defs, &f, false).unwrap()), "@x(Number) x + 5");
}

#[test]
fn scoped_application() {
    let defs = Defs::new();
    let mut b = Builder::new();
    let f = succ(&mut b);
    let four = b.num(4.0);
    let call = b.call(f, four);
    assert_eq!(show(&eval(&defs, &call, true).unwrap()), "5");
}

#[test]
fn residual_preservation() {
    let defs = Defs::new();
    let mut b = Builder::new();
    let f = succ(&mut b);
    let value = eval(&defs, &f, true).unwrap();
    let Expr::Func(func) = &value.inner else { panic!("not a function") };
    let Expr::BinOp(binop) = &func.body[0].inner else { panic!("folded body") };
    assert_eq!(binop.op, BinOpKind::Add);
    assert_eq!(binop.lhs.inner.as_ident(), Some(&VarName::from("x")));
    assert_eq!(show(&binop.rhs), "1");
}

#[test]
fn redefinition_rejection() {
    let mut defs = Defs::new();
    let mut b = Builder::new();
    let one = b.num(1.0);
    defs.register(VarName::from("x"), one);
    let two = b.num(2.0);
    let alias = b.alias("x", two);
    let Err(Fault::Error(Some(err))) = tyck(&defs, &alias) else { panic!("accepted") };
    assert_eq!(err.message(), "`x` is already defined");
    assert_eq!(err.indicators()[0].span, alias.info);
}

#[test]
fn unknown_identifier_rejection() {
    let defs = Defs::new();
    let mut b = Builder::new();
    let nope = b.ident("nope");
    let Err(Fault::Error(Some(err))) = tyck(&defs, &nope) else { panic!("accepted") };
    let expected =
        format!("error: alias `nope` does not exist\n  --> {}: not found in any scope", nope.info);
    assert_eq!(err.to_string(), expected);
}

#[test]
fn recursive_type_check_termination() {
    let mut defs = Defs::new();
    let mut b = Builder::new();
    let def = fact(&mut b, "fact");
    let Expr::Alias(alias) = &def.inner else { unreachable!() };
    defs.register(VarName::from("fact"), alias.value.clone());
    let ty = tyck(&defs, &alias.value).unwrap();
    assert_eq!(show(&ty), "Number -> Number");
}

#[test]
fn if_short_circuit() {
    let defs = Defs::new();
    let mut b = Builder::new();
    // the else branch would report an unknown identifier
    let (t, one, nope) = (b.bool(true), b.num(1.0), b.ident("nope"));
    let (two, three) = (b.num(2.0), b.num(3.0));
    let cond = b.if_(t, vec![two, three, one], vec![nope]);
    assert_eq!(show(&eval(&defs, &cond, true).unwrap()), "1");
}

#[test]
fn type_preservation() {
    let mut defs = Defs::new();
    let mut b = Builder::new();
    let def = fact(&mut b, "fact");
    let Expr::Alias(alias) = &def.inner else { unreachable!() };
    defs.register(VarName::from("fact"), alias.value.clone());
    let mut nodes = vec![alias.value.clone(), succ(&mut b)];
    let (callee, three) = (b.ident("fact"), b.num(3.0));
    nodes.push(b.call(callee, three));
    let (f, four) = (succ(&mut b), b.num(4.0));
    nodes.push(b.call(f, four));
    let (num, y, callee) = (b.ident("Number"), b.ident("y"), b.ident("fact"));
    let call = b.call(callee, y);
    nodes.push(b.func("y", num, vec![call]));
    for node in nodes {
        for resolve in [true, false] {
            let before = tyck(&defs, &node).unwrap();
            let value = eval(&defs, &node, resolve).unwrap();
            let after = tyck(&defs, &value).unwrap();
            assert!(compatible(&before.inner, &after.inner), "{} changed type", show(&node));
        }
    }
}

#[test]
fn partial_evaluation_preserves_meaning() {
    let mut defs = Defs::new();
    let mut b = Builder::new();
    // `k = @x(Number) @y(Number) x`
    let (n0, n1, x) = (b.ident("Number"), b.ident("Number"), b.ident("x"));
    let inner = b.func("y", n1, vec![x]);
    let k = b.func("x", n0, vec![inner]);
    defs.register(VarName::from("k"), k);
    // `g = @y(Number) k(y)`, applied before and after evaluation
    let (num, callee, y) = (b.ident("Number"), b.ident("k"), b.ident("y"));
    let call = b.call(callee, y);
    let g = b.func("y", num, vec![call]);
    let evaluated = eval(&defs, &g, true).unwrap();
    for (lhs, rhs) in [(1.0, 2.0), (7.0, -3.0)] {
        let applied: Vec<_> = [g.clone(), evaluated.clone()]
            .into_iter()
            .map(|f| {
                let (lhs, rhs) = (b.num(lhs), b.num(rhs));
                let partial = b.call(f, lhs);
                let full = b.call(partial, rhs);
                show(&eval(&defs, &full, true).unwrap())
            })
            .collect();
        assert_eq!(applied, vec![show(&b.num(lhs)), show(&b.num(lhs))]);
    }
}

program!(
    shadowed_parameter,
    |b| {
        let (n0, n1, x) = (b.ident("Number"), b.ident("Number"), b.ident("x"));
        let inner = b.func("y", n1, vec![x]);
        let outer = b.func("x", n0, vec![inner]);
        let k = b.alias("k", outer);
        let (num, callee, y) = (b.ident("Number"), b.ident("k"), b.ident("y"));
        let call = b.call(callee, y);
        let g = b.func("y", num, vec![call]);
        let (one, two) = (b.num(1.0), b.num(2.0));
        let partial = b.call(g, one);
        let full = b.call(partial, two);
        vec![k, full]
    },
    ["k = @x(Number) @y(Number) x", "1"]
);

program!(
    caller_names_overlap_callee_locals,
    |b| {
        let (num, x, zero) = (b.ident("Number"), b.ident("x"), b.num(0.0));
        let cond = b.binop(BinOpKind::Gt, x, zero);
        let (one, y, two) = (b.num(1.0), b.ident("y"), b.num(2.0));
        let bind = b.alias("y", one);
        let branch = b.if_(cond, vec![bind, y], vec![two]);
        let func = b.func("x", num, vec![branch]);
        let f = b.alias("f", func);
        let (num, callee, y) = (b.ident("Number"), b.ident("f"), b.ident("y"));
        let call = b.call(callee, y);
        let func = b.func("y", num, vec![call]);
        let g = b.alias("g", func);
        let (callee, three) = (b.ident("g"), b.num(3.0));
        let call = b.call(callee, three);
        vec![f, g, call]
    },
    [
        "f = @x(Number) if x > 0 then { y = 1; 1 } else 2",
        "g = @y(Number) if y > 0 then { y#0 = 1; 1 } else 2",
        "1"
    ]
);

program!(
    sequence_of_definitions,
    |b| {
        let fact = fact(b, "fact");
        let (callee, five) = (b.ident("fact"), b.num(5.0));
        let call = b.call(callee, five);
        let value = b.alias("x", call);
        let (x, one) = (b.ident("x"), b.num(1.0));
        let next = b.binop(BinOpKind::Add, x, one);
        vec![fact, value, next]
    },
    ["fact = @n(Number) if n < 1 then 1 else n * fact(n - 1)", "x = 120", "121"]
);

program!(
    curried_definitions,
    |b| {
        let (n0, n1, a, bb) = (b.ident("Number"), b.ident("Number"), b.ident("a"), b.ident("b"));
        let add = b.binop(BinOpKind::Add, a, bb);
        let inner = b.func("b", n1, vec![add]);
        let outer = b.func("a", n0, vec![inner]);
        let def = b.alias("add", outer);
        let (callee, one) = (b.ident("add"), b.num(1.0));
        let partial = b.call(callee, one);
        let inc = b.alias("inc", partial);
        let (callee, two) = (b.ident("inc"), b.num(2.0));
        let call = b.call(callee, two);
        vec![def, inc, call]
    },
    ["add = @a(Number) @b(Number) a + b", "inc = @b(Number) 1 + b", "3"]
);
