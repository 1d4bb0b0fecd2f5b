//! End-to-end tests: build a program, resolve and run it through a session.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use lox_eval::{buffer_handler, SharedPrintHandler, Value};
use lox_ir::{AstBuilder, BinaryOp, Program, SharedInterner, StmtId};
use loxc::{
    init_tracing, CollectingReporter, Phase, RunError, RunOutcome, Session, SessionConfig,
};
use pretty_assertions::assert_eq;

struct Fixture {
    session: Session,
    output: SharedPrintHandler,
    reporter: CollectingReporter,
}

impl Fixture {
    fn new(config: SessionConfig) -> Self {
        init_tracing();
        let output = buffer_handler();
        let session = Session::with_config(
            SharedInterner::default(),
            config.with_print_handler(output.clone()),
        );
        Fixture {
            session,
            output,
            reporter: CollectingReporter::new(),
        }
    }

    fn batch() -> Self {
        Self::new(SessionConfig::default())
    }

    fn program(&self, build: impl FnOnce(&AstBuilder<'_>) -> Vec<StmtId>) -> Program {
        let b = AstBuilder::new(self.session.interner());
        let stmts = build(&b);
        b.finish(stmts)
    }

    fn run(&mut self, build: impl FnOnce(&AstBuilder<'_>) -> Vec<StmtId>) -> RunOutcome {
        let program = self.program(build);
        self.session.resolve_and_run(program, &mut self.reporter)
    }

    fn output(&self) -> String {
        self.output.take_output()
    }
}

#[test]
fn completed_run_prints_and_reports_nothing() {
    let mut f = Fixture::batch();
    let outcome = f.run(|b| {
        vec![
            b.var_decl("greeting", Some(b.string("hi"))),
            b.print(b.binary(b.var("greeting"), BinaryOp::Add, b.string(" there"))),
        ]
    });
    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(f.output(), "hi there\n");
    assert!(f.reporter.is_empty());
}

#[test]
fn static_errors_abort_before_anything_runs() {
    let mut f = Fixture::batch();
    let outcome = f.run(|b| {
        vec![
            b.print(b.string("never")),
            b.at_line(2).block([b.var_decl("a", Some(b.var("a")))]),
            b.at_line(3).return_(None),
        ]
    });
    assert_eq!(outcome, RunOutcome::ResolveFailed);
    assert_eq!(outcome.exit_code(), 65);
    assert_eq!(f.output(), "");

    let reported = &f.reporter.reported;
    assert_eq!(reported.len(), 2);
    assert_eq!(reported[0].phase, Phase::Resolve);
    assert_eq!(reported[0].line(), Some(2));
    assert_eq!(reported[0].lexeme.as_deref(), Some("a"));
    assert_eq!(
        reported[0].message,
        "Can't read local variable in its own initializer."
    );
    assert_eq!(reported[1].line(), Some(3));
    assert_eq!(reported[1].lexeme.as_deref(), Some("return"));
    assert_eq!(reported[1].message, "Can't return from top-level code.");
}

#[test]
fn runtime_error_is_reported_and_session_stays_usable() {
    let mut f = Fixture::batch();
    let outcome = f.run(|b| {
        vec![
            b.var_decl("count", Some(b.number(1.0))),
            b.print(b.var("count")),
            b.at_line(3).print(b.unary(lox_ir::UnaryOp::Neg, b.string("x"))),
            b.print(b.string("skipped")),
        ]
    });
    assert_eq!(outcome, RunOutcome::RuntimeFailed);
    assert_eq!(outcome.exit_code(), 70);
    assert_eq!(f.output(), "1\n");
    assert_eq!(f.reporter.messages(), vec!["Operand must be a number."]);
    assert_eq!(f.reporter.reported[0].phase, Phase::Runtime);
    assert_eq!(f.reporter.reported[0].line(), Some(3));

    f.reporter.clear();
    let outcome = f.run(|b| {
        vec![b.print(b.binary(b.var("count"), BinaryOp::Add, b.number(1.0)))]
    });
    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(f.output(), "2\n");
}

#[test]
fn interactive_session_echoes_bare_expressions() {
    let mut f = Fixture::new(SessionConfig::interactive());
    f.run(|b| vec![b.var_decl("x", Some(b.number(4.0)))]);
    f.run(|b| vec![b.expr_stmt(b.binary(b.var("x"), BinaryOp::Mul, b.number(2.5)))]);
    f.run(|b| vec![b.expr_stmt(b.string("text"))]);
    assert_eq!(f.output(), "10\ntext\n");
}

#[test]
fn declarations_persist_across_inputs() {
    let mut f = Fixture::new(SessionConfig::interactive());
    f.run(|b| {
        let speak = b.method("speak", &[], [b.return_(Some(b.string("woof")))]);
        vec![b.class("Dog", None, [speak])]
    });
    f.run(|b| vec![b.var_decl("d", Some(b.call(b.var("Dog"), [])))]);
    f.run(|b| vec![b.expr_stmt(b.call(b.get(b.var("d"), "speak"), []))]);
    assert_eq!(f.output(), "woof\n");
    assert!(matches!(
        f.session.interpreter().global("d"),
        Some(Value::Instance(_))
    ));
}

#[test]
fn uninitialized_variable_is_a_runtime_error() {
    let mut f = Fixture::batch();
    let outcome = f.run(|b| vec![b.var_decl("a", None), b.print(b.var("a"))]);
    assert_eq!(outcome, RunOutcome::RuntimeFailed);
    assert_eq!(f.reporter.messages(), vec!["Uninitialized variable 'a'."]);
}

#[test]
fn configured_call_depth_limits_recursion() {
    let mut f = Fixture::new(SessionConfig::default().with_max_call_depth(Some(16)));
    let outcome = f.run(|b| {
        vec![
            b.function("down", &[], [b.return_(Some(b.call(b.var("down"), [])))]),
            b.at_line(2).expr_stmt(b.call(b.var("down"), [])),
        ]
    });
    assert_eq!(outcome, RunOutcome::RuntimeFailed);
    assert_eq!(
        f.reporter.messages(),
        vec!["Stack overflow: maximum call depth 16 exceeded."]
    );
}

#[test]
fn run_returns_typed_errors() {
    let mut f = Fixture::batch();
    let program = f.program(|b| vec![b.break_()]);
    match f.session.run(program) {
        Err(RunError::Resolve(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].to_string(), "Can't use 'break' outside of a loop.");
        }
        other => panic!("expected a static error, got {other:?}"),
    }

    let program = f.program(|b| vec![b.print(b.call(b.nil(), []))]);
    let err = f.session.run(program).unwrap_err();
    assert_eq!(err.to_string(), "Can only call functions and classes.");
}

#[test]
fn clock_is_available() {
    let mut f = Fixture::batch();
    let outcome = f.run(|b| {
        vec![b.print(b.binary(
            b.call(b.var("clock"), []),
            BinaryOp::Gt,
            b.number(0.0),
        ))]
    });
    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(f.output(), "true\n");
}
