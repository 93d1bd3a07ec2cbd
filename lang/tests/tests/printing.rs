use quill_syntax::{BinOpKind, Builtin};
use quill_tests::golden;

golden!(number, |b| b.num(2.5), "2.5");
golden!(string, |b| b.string("s"), "\"s\"");
golden!(list, |b| {
    let (x, y) = (b.ident("a"), b.unknowable());
    b.list(vec![x, y])
}, "[a, ?]");
golden!(record, |b| {
    let (x, y) = (b.builtin(Builtin::Number), b.builtin(Builtin::Number));
    b.record(vec![("x", x), ("y", y)])
}, "struct { x: Number, y: Number }");
golden!(ranged_record, |b| b.ranged_record(vec![], 0.0, 10.0), "struct[0..10] {}");
golden!(enumeration, |b| b.enum_(&["Red", "Green"]), "enum { Red, Green }");
golden!(function_type, |b| {
    let (n, t, n2) = (b.ident("Number"), b.ident("Bool"), b.ident("Number"));
    let inner = b.fn_ty(n, t);
    b.fn_ty(inner, n2)
}, "(Number -> Bool) -> Number");
golden!(self_type, |b| {
    let n = b.ident("Number");
    b.self_ty(n)
}, "self(Number)");
golden!(declarations, |b| {
    let (n, t) = (b.ident("Number"), b.ident("Bool"));
    let (arg, field) = (b.arg("x", n), b.field("y", t));
    b.block(vec![arg, field])
}, "{ x(Number); y: Bool }");
golden!(function, |b| {
    let (n, x, one) = (b.ident("Number"), b.ident("x"), b.num(1.0));
    let bind = b.alias("y", one);
    let f = b.func("x", n, vec![bind, x]);
    let arg = b.num(3.0);
    b.call(f, arg)
}, "(@x(Number) { y = 1; x })(3)");
golden!(precedence, |b| {
    let (one, two, three) = (b.num(1.0), b.num(2.0), b.num(3.0));
    let add = b.binop(BinOpKind::Add, one, two);
    let mul = b.binop(BinOpKind::Mul, add, three);
    let (p, four) = (b.ident("p"), b.num(4.0));
    let dot = b.dot(p, "x");
    let eq = b.binop(BinOpKind::Eq, dot, four);
    b.list(vec![mul, eq])
}, "[(1 + 2) * 3, p.x == 4]");
golden!(control, |b| {
    let (c, one, two) = (b.ident("c"), b.num(1.0), b.num(2.0));
    let branch = b.if_(c, vec![one], vec![two]);
    let (d, three) = (b.ident("d"), b.num(3.0));
    let w = b.while_(d, vec![three]);
    b.block(vec![branch, w])
}, "{ if c then 1 else 2; while d { 3 } }");
golden!(matching, |b| {
    let (s, zero, wild, one, two) =
        (b.ident("s"), b.num(0.0), b.ident("_"), b.num(1.0), b.num(2.0));
    b.match_(s, vec![(zero, vec![one]), (wild, vec![two])])
}, "match s { 0 => 1, _ => 2 }");
golden!(instance, |b| {
    let (p, one, two) = (b.ident("Point"), b.num(1.0), b.num(2.5));
    let (x, y) = (b.alias("x", one), b.alias("y", two));
    b.instance(p, vec![x, y])
}, "Point { x = 1, y = 2.5 }");
