use super::*;
use crate::errors::EvalErrorKind;
use crate::print_handler::buffer_handler;
use crate::script::Script;
use lox_ir::{AstBuilder, BinaryOp, ExprId, StmtId, UnaryOp};
use lox_resolve::resolve_program;
use pretty_assertions::assert_eq;

/// Interpreter wired to a capture buffer.
struct Harness {
    interpreter: Interpreter,
    output: SharedPrintHandler,
}

impl Harness {
    fn new() -> Self {
        Self::with(|builder| builder)
    }

    fn with(configure: impl FnOnce(InterpreterBuilder) -> InterpreterBuilder) -> Self {
        let output = buffer_handler();
        let builder =
            InterpreterBuilder::new(SharedInterner::default()).print_handler(output.clone());
        Harness {
            interpreter: configure(builder).build(),
            output,
        }
    }

    /// Build, resolve and run one program.
    fn run(&mut self, build: impl FnOnce(&AstBuilder<'_>) -> Vec<StmtId>) -> Result<(), EvalError> {
        let interner = self.interpreter.interner().clone();
        let b = AstBuilder::new(&interner);
        let stmts = build(&b);
        let program = b.finish(stmts);
        let resolution = resolve_program(&program, &interner)
            .unwrap_or_else(|errors| panic!("unexpected static errors: {errors:?}"));
        let script = SharedScript::new(Script::new(program, resolution));
        self.interpreter.interpret(&script)
    }

    fn output(&self) -> String {
        self.output.take_output()
    }
}

type BuildFn = Box<dyn Fn(&AstBuilder<'_>) -> Vec<StmtId>>;

fn program(build: impl Fn(&AstBuilder<'_>) -> Vec<StmtId> + 'static) -> BuildFn {
    Box::new(build)
}

fn add(b: &AstBuilder<'_>, left: ExprId, right: ExprId) -> ExprId {
    b.binary(left, BinaryOp::Add, right)
}

#[test]
fn prints_arithmetic_and_concatenation() {
    let mut h = Harness::new();
    h.run(|b| {
        vec![
            b.print(add(b, b.number(1.0), b.number(2.0))),
            b.print(add(b, b.string("n="), b.number(2.5))),
            b.print(b.unary(UnaryOp::Neg, b.number(4.0))),
            b.print(b.unary(UnaryOp::Not, b.nil())),
        ]
    })
    .unwrap();
    assert_eq!(h.output(), "3\nn=2.5\n-4\ntrue\n");
}

#[test]
fn independent_counters() {
    let mut h = Harness::new();
    h.run(|b| {
        let counter = b.function(
            "makeCounter",
            &[],
            [
                b.var_decl("i", Some(b.number(0.0))),
                b.function(
                    "count",
                    &[],
                    [
                        b.expr_stmt(b.assign("i", add(b, b.var("i"), b.number(1.0)))),
                        b.return_(Some(b.var("i"))),
                    ],
                ),
                b.return_(Some(b.var("count"))),
            ],
        );
        vec![
            counter,
            b.var_decl("a", Some(b.call(b.var("makeCounter"), []))),
            b.var_decl("b", Some(b.call(b.var("makeCounter"), []))),
            b.print(b.call(b.var("a"), [])),
            b.print(b.call(b.var("a"), [])),
            b.print(b.call(b.var("b"), [])),
        ]
    })
    .unwrap();
    assert_eq!(h.output(), "1\n2\n1\n");
}

#[test]
fn block_shadowing_leaves_outer_binding() {
    let mut h = Harness::new();
    h.run(|b| {
        vec![
            b.var_decl("a", Some(b.string("outer"))),
            b.block([
                b.var_decl("a", Some(b.string("inner"))),
                b.print(b.var("a")),
            ]),
            b.print(b.var("a")),
        ]
    })
    .unwrap();
    assert_eq!(h.output(), "inner\nouter\n");
}

#[test]
fn closure_sees_declaration_scope_not_later_shadow() {
    let mut h = Harness::new();
    h.run(|b| {
        vec![
            b.var_decl("a", Some(b.string("global"))),
            b.block([
                b.function("show", &[], [b.print(b.var("a"))]),
                b.expr_stmt(b.call(b.var("show"), [])),
                b.var_decl("a", Some(b.string("block"))),
                b.expr_stmt(b.call(b.var("show"), [])),
            ]),
        ]
    })
    .unwrap();
    assert_eq!(h.output(), "global\nglobal\n");
}

#[test]
fn continue_runs_increment_once() {
    // for (var i = 0; i < 5; i = i + 1) { if (i == 2) continue; print i; }
    let mut h = Harness::new();
    h.run(|b| {
        let body = b.block([
            b.if_(
                b.binary(b.var("i"), BinaryOp::Eq, b.number(2.0)),
                b.continue_(),
                None,
            ),
            b.print(b.var("i")),
        ]);
        vec![b.for_loop(
            Some(b.var_decl("i", Some(b.number(0.0)))),
            Some(b.binary(b.var("i"), BinaryOp::Lt, b.number(5.0))),
            Some(b.assign("i", add(b, b.var("i"), b.number(1.0)))),
            body,
        )]
    })
    .unwrap();
    assert_eq!(h.output(), "0\n1\n3\n4\n");
}

#[test]
fn break_exits_innermost_loop_only() {
    let mut h = Harness::new();
    h.run(|b| {
        let inner = b.for_loop(
            Some(b.var_decl("j", Some(b.number(0.0)))),
            None,
            Some(b.assign("j", add(b, b.var("j"), b.number(1.0)))),
            b.block([
                b.if_(
                    b.binary(b.var("j"), BinaryOp::Eq, b.number(2.0)),
                    b.break_(),
                    None,
                ),
                b.print(add(b, add(b, b.var("i"), b.string(":")), b.var("j"))),
            ]),
        );
        vec![b.for_loop(
            Some(b.var_decl("i", Some(b.number(0.0)))),
            Some(b.binary(b.var("i"), BinaryOp::Lt, b.number(2.0))),
            Some(b.assign("i", add(b, b.var("i"), b.number(1.0)))),
            inner,
        )]
    })
    .unwrap();
    assert_eq!(h.output(), "0:0\n0:1\n1:0\n1:1\n");
}

#[test]
fn return_unwinds_loops() {
    let mut h = Harness::new();
    h.run(|b| {
        vec![
            b.function(
                "first",
                &[],
                [b.while_(b.bool(true), b.return_(Some(b.string("out"))))],
            ),
            b.print(b.call(b.var("first"), [])),
        ]
    })
    .unwrap();
    assert_eq!(h.output(), "out\n");
}

#[test]
fn logical_operators_yield_deciding_operand() {
    let mut h = Harness::new();
    h.run(|b| {
        vec![
            b.print(b.or(b.nil(), b.string("x"))),
            b.print(b.and(b.number(0.0), b.call(b.var("undefined"), []))),
            b.print(b.ternary(b.number(0.0), b.string("yes"), b.string("no"))),
        ]
    })
    .unwrap();
    assert_eq!(h.output(), "x\n0\nno\n");
}

#[test]
fn negative_zero_and_nan_behave_as_boxed_doubles() {
    let mut h = Harness::new();
    h.run(|b| {
        let overflow = || b.binary(b.number(1e308), BinaryOp::Mul, b.number(10.0));
        let neg_zero = || b.unary(UnaryOp::Neg, b.number(0.0));
        vec![
            b.var_decl("n", Some(b.binary(overflow(), BinaryOp::Sub, overflow()))),
            b.print(b.binary(b.var("n"), BinaryOp::Eq, b.var("n"))),
            b.print(b.ternary(neg_zero(), b.string("truthy"), b.string("falsy"))),
            b.print(b.binary(b.number(0.0), BinaryOp::Eq, neg_zero())),
        ]
    })
    .unwrap();
    assert_eq!(h.output(), "true\ntruthy\nfalse\n");
}

#[test]
fn classes_fields_and_methods() {
    let mut h = Harness::new();
    h.run(|b| {
        let init = b.method(
            "init",
            &["x"],
            [b.expr_stmt(b.set(b.this(), "x", b.var("x")))],
        );
        let get_x = b.method("getX", &[], [b.return_(Some(b.get(b.this(), "x")))]);
        vec![
            b.class("Point", None, [init, get_x]),
            b.var_decl("p", Some(b.call(b.var("Point"), [b.number(3.0)]))),
            b.print(b.call(b.get(b.var("p"), "getX"), [])),
            b.print(b.var("p")),
            b.print(b.var("Point")),
            b.expr_stmt(b.set(b.var("p"), "x", b.number(9.0))),
            b.print(b.get(b.var("p"), "x")),
        ]
    })
    .unwrap();
    assert_eq!(h.output(), "3\nPoint instance\nPoint\n9\n");
}

#[test]
fn bound_method_remembers_instance() {
    let mut h = Harness::new();
    h.run(|b| {
        let name = b.method("name", &[], [b.return_(Some(b.get(b.this(), "tag")))]);
        vec![
            b.class("Tagged", None, [name]),
            b.var_decl("t", Some(b.call(b.var("Tagged"), []))),
            b.expr_stmt(b.set(b.var("t"), "tag", b.string("first"))),
            b.var_decl("m", Some(b.get(b.var("t"), "name"))),
            b.print(b.call(b.var("m"), [])),
        ]
    })
    .unwrap();
    assert_eq!(h.output(), "first\n");
}

#[test]
fn super_resolves_from_defining_class() {
    // C inherits B's speak; super inside it must reach A, not B again.
    let mut h = Harness::new();
    h.run(|b| {
        let a_speak = b.method("speak", &[], [b.return_(Some(b.string("A")))]);
        let b_speak = b.method(
            "speak",
            &[],
            [b.return_(Some(add(
                b,
                b.string("B+"),
                b.call(b.super_("speak"), []),
            )))],
        );
        vec![
            b.class("A", None, [a_speak]),
            b.class("B", Some("A"), [b_speak]),
            b.class("C", Some("B"), []),
            b.print(b.call(b.get(b.call(b.var("C"), []), "speak"), [])),
        ]
    })
    .unwrap();
    assert_eq!(h.output(), "B+A\n");
}

#[test]
fn inherited_initializer_binds_subclass_instance() {
    let mut h = Harness::new();
    h.run(|b| {
        let init = b.method(
            "init",
            &["v"],
            [b.expr_stmt(b.set(b.this(), "v", b.var("v")))],
        );
        vec![
            b.class("Base", None, [init]),
            b.class("Derived", Some("Base"), []),
            b.var_decl("d", Some(b.call(b.var("Derived"), [b.number(7.0)]))),
            b.print(b.var("d")),
            b.print(b.get(b.var("d"), "v")),
        ]
    })
    .unwrap();
    assert_eq!(h.output(), "Derived instance\n7\n");
}

#[test]
fn initializer_always_yields_this() {
    let mut h = Harness::new();
    h.run(|b| {
        let init = b.method("init", &[], [b.return_(None)]);
        vec![
            b.class("K", None, [init]),
            b.var_decl("k", Some(b.call(b.var("K"), []))),
            b.print(b.call(b.get(b.var("k"), "init"), [])),
        ]
    })
    .unwrap();
    assert_eq!(h.output(), "K instance\n");
}

#[test]
fn callables_stringify() {
    let mut h = Harness::new();
    h.run(|b| {
        vec![
            b.function("foo", &[], []),
            b.print(b.var("foo")),
            b.print(b.var("clock")),
            b.print(b.call(b.var("foo"), [])),
        ]
    })
    .unwrap();
    assert_eq!(h.output(), "<fn foo>\n<native fn>\nnil\n");
}

#[test]
fn arity_is_checked_before_body() {
    let mut h = Harness::new();
    let err = h
        .run(|b| {
            vec![
                b.function("pair", &["a", "b"], [b.print(b.string("ran"))]),
                b.at_line(4)
                    .expr_stmt(b.call(b.var("pair"), [b.number(1.0)])),
            ]
        })
        .unwrap_err();
    assert_eq!(err.message, "Expected 2 arguments but got 1.");
    assert_eq!(err.line(), Some(4));
    assert_eq!(h.output(), "");
}

#[test]
fn class_without_init_takes_no_arguments() {
    let mut h = Harness::new();
    let err = h
        .run(|b| {
            vec![
                b.class("Empty", None, []),
                b.expr_stmt(b.call(b.var("Empty"), [b.nil()])),
            ]
        })
        .unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::ArityMismatch { expected: 0, got: 1 });
}

#[test]
fn runtime_errors_name_their_cause() {
    let cases: Vec<(BuildFn, &str)> = vec![
        (
            program(|b| vec![b.expr_stmt(b.call(b.string("f"), []))]),
            "Can only call functions and classes.",
        ),
        (
            program(|b| vec![b.print(b.var("missing"))]),
            "Undefined variable 'missing'.",
        ),
        (
            program(|b| vec![b.expr_stmt(b.assign("missing", b.nil()))]),
            "Undefined variable 'missing'.",
        ),
        (
            program(|b| vec![b.var_decl("u", None), b.print(b.var("u"))]),
            "Uninitialized variable 'u'.",
        ),
        (
            program(|b| vec![b.print(b.get(b.number(1.0), "x"))]),
            "Only instances have properties.",
        ),
        (
            program(|b| vec![b.expr_stmt(b.set(b.number(1.0), "x", b.nil()))]),
            "Only instances have fields.",
        ),
        (
            program(|b| {
                vec![
                    b.class("C", None, []),
                    b.print(b.get(b.call(b.var("C"), []), "nope")),
                ]
            }),
            "Undefined property 'nope'.",
        ),
        (
            program(|b| {
                vec![
                    b.var_decl("NotClass", Some(b.number(1.0))),
                    b.class("Sub", Some("NotClass"), []),
                ]
            }),
            "Superclass must be a class.",
        ),
        (
            program(|b| vec![b.print(b.binary(b.number(1.0), BinaryOp::Mod, b.number(0.0)))]),
            "Attempt to divide by 0.",
        ),
    ];

    for (build, expected) in cases {
        let mut h = Harness::new();
        let err = h.run(|b| build(b)).unwrap_err();
        assert_eq!(err.message, expected);
        assert!(err.token.is_some(), "no position for {expected:?}");
    }
}

#[test]
fn local_uninitialized_read_is_an_error_until_assigned() {
    let mut h = Harness::new();
    h.run(|b| {
        vec![b.block([
            b.var_decl("x", None),
            b.expr_stmt(b.assign("x", b.number(2.0))),
            b.print(b.var("x")),
        ])]
    })
    .unwrap();
    assert_eq!(h.output(), "2\n");
}

#[test]
fn error_aborts_rest_but_state_persists() {
    let mut h = Harness::new();
    let err = h
        .run(|b| {
            vec![
                b.var_decl("kept", Some(b.number(1.0))),
                b.at_line(2).print(b.binary(
                    b.number(1.0),
                    BinaryOp::Sub,
                    b.string("x"),
                )),
                b.var_decl("skipped", Some(b.number(2.0))),
            ]
        })
        .unwrap_err();
    assert_eq!(err.message, "Operands must be numbers.");
    assert_eq!(err.line(), Some(2));
    assert_eq!(h.interpreter.global("kept"), Some(Value::Number(1.0)));
    assert_eq!(h.interpreter.global("skipped"), None);
    assert_eq!(h.interpreter.env().depth(), 1);

    h.run(|b| vec![b.print(b.var("kept"))]).unwrap();
    assert_eq!(h.output(), "1\n");
}

#[test]
fn functions_outlive_their_script() {
    let mut h = Harness::new();
    h.run(|b| {
        vec![b.function(
            "twice",
            &["n"],
            [b.return_(Some(b.binary(b.var("n"), BinaryOp::Mul, b.number(2.0))))],
        )]
    })
    .unwrap();
    h.run(|b| vec![b.print(b.call(b.var("twice"), [b.number(21.0)]))])
        .unwrap();
    assert_eq!(h.output(), "42\n");
}

#[test]
fn interactive_mode_echoes_top_level_expressions() {
    let mut h = Harness::with(|builder| builder.mode(EvalMode::Interactive));
    h.run(|b| {
        vec![
            b.expr_stmt(add(b, b.number(1.0), b.number(2.0))),
            b.var_decl("x", Some(b.number(5.0))),
            b.block([b.expr_stmt(b.var("x"))]),
            b.expr_stmt(b.assign("x", b.number(6.0))),
        ]
    })
    .unwrap();
    assert_eq!(h.output(), "3\n6\n");
}

#[test]
fn batch_mode_does_not_echo() {
    let mut h = Harness::new();
    h.run(|b| vec![b.expr_stmt(b.number(1.0))]).unwrap();
    assert_eq!(h.output(), "");
}

#[test]
fn call_depth_limit_is_a_runtime_error() {
    let mut h = Harness::with(|builder| builder.max_call_depth(Some(50)));
    let err = h
        .run(|b| {
            vec![
                b.function("f", &[], [b.expr_stmt(b.call(b.var("f"), []))]),
                b.expr_stmt(b.call(b.var("f"), [])),
            ]
        })
        .unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::StackOverflow { depth: 50 });
    assert_eq!(
        err.message,
        "Stack overflow: maximum call depth 50 exceeded."
    );
    assert_eq!(h.interpreter.call_depth(), 0);
    assert_eq!(h.interpreter.env().depth(), 1);

    // Still usable
    h.run(|b| vec![b.print(b.string("ok"))]).unwrap();
    assert_eq!(h.output(), "ok\n");
}

#[test]
fn deep_recursion_within_limit() {
    // fun count(n) { if (n == 0) return 0; return count(n - 1) + 1; }
    let mut h = Harness::new();
    h.run(|b| {
        let recurse = add(
            b,
            b.call(
                b.var("count"),
                [b.binary(b.var("n"), BinaryOp::Sub, b.number(1.0))],
            ),
            b.number(1.0),
        );
        vec![
            b.function(
                "count",
                &["n"],
                [
                    b.if_(
                        b.binary(b.var("n"), BinaryOp::Eq, b.number(0.0)),
                        b.return_(Some(b.number(0.0))),
                        None,
                    ),
                    b.return_(Some(recurse)),
                ],
            ),
            b.print(b.call(b.var("count"), [b.number(2000.0)])),
        ]
    })
    .unwrap();
    assert_eq!(h.output(), "2000\n");
}

#[test]
fn initializer_without_this_reports_call_site() {
    let mut h = Harness::new();
    let interner = h.interpreter.interner().clone();
    let b = AstBuilder::new(&interner);
    let init = b.method("init", &[], []);
    let paren = b.at_line(7).token(lox_ir::TokenKind::RightParen, ")");
    let script = SharedScript::new(Script::new(b.finish([]), lox_ir::Resolution::new()));

    // An initializer that was never bound to an instance
    let unbound = crate::function::UserFunction::new(
        interner.intern("init"),
        "init",
        init,
        script,
        crate::environment::LocalScope::new(crate::environment::Scope::new()),
        true,
    );
    let err = h.interpreter.call_function(&unbound, &[], paren).unwrap_err();
    assert!(err.is_internal());
    assert_eq!(err.token.map(|t| t.line), Some(7));
    assert_eq!(h.interpreter.call_depth(), 0);
}
