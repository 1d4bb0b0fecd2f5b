//! Statement execution.

use lox_ir::{ExprId, ExprKind, FunctionId, FunctionRange, StmtId, StmtKind, StmtRange, Token};
use lox_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;

use super::Interpreter;
use crate::control::{Completion, ExecResult};
use crate::errors::{superclass_must_be_class, EvalError};
use crate::function::{Class, UserFunction};
use crate::script::SharedScript;
use crate::value::{Heap, Value};

impl Interpreter {
    /// Execute one statement.
    pub(crate) fn execute(&mut self, script: &SharedScript, id: StmtId) -> ExecResult {
        ensure_sufficient_stack(|| self.execute_inner(script, id))
    }

    fn execute_inner(&mut self, script: &SharedScript, id: StmtId) -> ExecResult {
        match script.program.arena.stmt(id).kind {
            StmtKind::Expression(expr) => {
                self.evaluate(script, expr)?;
                Ok(Completion::Normal)
            }
            StmtKind::Print(expr) => {
                let value = self.evaluate(script, expr)?;
                self.print_handler.println(&value.to_string());
                Ok(Completion::Normal)
            }
            StmtKind::Var { name, initializer } => {
                match initializer {
                    Some(init) => {
                        let value = self.evaluate(script, init)?;
                        self.env.define(name.lexeme, value);
                    }
                    None => self.env.declare(name.lexeme),
                }
                Ok(Completion::Normal)
            }
            StmtKind::Block(stmts) => {
                let mut scoped = self.scoped();
                scoped.execute_stmts(script, stmts)
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(script, condition)?.is_truthy() {
                    self.execute(script, then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(script, else_branch)
                } else {
                    Ok(Completion::Normal)
                }
            }
            StmtKind::While {
                condition,
                body,
                increment,
            } => self.execute_while(script, condition, body, increment),
            StmtKind::Break(_) => Ok(Completion::Break),
            StmtKind::Continue(_) => Ok(Completion::Continue),
            StmtKind::Function(decl) => {
                let function = self.declare_function(script, decl, false);
                let name = function.name();
                self.env.define(name, Value::Function(Heap::new(function)));
                Ok(Completion::Normal)
            }
            StmtKind::Class {
                name,
                superclass,
                methods,
            } => {
                self.execute_class(script, name, superclass, methods)?;
                Ok(Completion::Normal)
            }
            StmtKind::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(script, expr)?,
                    None => Value::Nil,
                };
                Ok(Completion::Return(value))
            }
        }
    }

    /// Execute a statement list in the current scope.
    ///
    /// Stops at the first statement that does not complete normally.
    pub(crate) fn execute_stmts(&mut self, script: &SharedScript, stmts: StmtRange) -> ExecResult {
        for &stmt in script.program.arena.stmt_list(stmts) {
            let completion = self.execute(script, stmt)?;
            if !completion.is_normal() {
                return Ok(completion);
            }
        }
        Ok(Completion::Normal)
    }

    /// The increment runs after every iteration that completes normally or
    /// through `continue`, before the condition is checked again.
    fn execute_while(
        &mut self,
        script: &SharedScript,
        condition: ExprId,
        body: StmtId,
        increment: Option<ExprId>,
    ) -> ExecResult {
        while self.evaluate(script, condition)?.is_truthy() {
            match self.execute(script, body)? {
                Completion::Normal | Completion::Continue => {}
                Completion::Break => break,
                ret @ Completion::Return(_) => return Ok(ret),
            }
            if let Some(increment) = increment {
                self.evaluate(script, increment)?;
            }
        }
        Ok(Completion::Normal)
    }

    /// A function value closing over the current scope.
    fn declare_function(
        &self,
        script: &SharedScript,
        decl: FunctionId,
        is_initializer: bool,
    ) -> UserFunction {
        let name = script.program.arena.function(decl).name.lexeme;
        UserFunction::new(
            name,
            self.interner.lookup(name),
            decl,
            script.clone(),
            self.env.current(),
            is_initializer,
        )
    }

    /// The class name is bound before the superclass is evaluated and the
    /// methods are built, and only initialized once the class exists.
    fn execute_class(
        &mut self,
        script: &SharedScript,
        name: Token,
        superclass: Option<ExprId>,
        methods: FunctionRange,
    ) -> Result<(), EvalError> {
        self.env.declare(name.lexeme);

        let superclass = match superclass {
            Some(expr) => match self.evaluate(script, expr)? {
                Value::Class(class) => Some(class),
                _ => {
                    let token = match script.program.arena.expr(expr).kind {
                        ExprKind::Variable(token) => token,
                        _ => name,
                    };
                    return Err(superclass_must_be_class().with_token(token));
                }
            },
            None => None,
        };

        let arena = &script.program.arena;
        let mut table = FxHashMap::default();
        for &method in arena.function_list(methods) {
            let method_name = arena.function(method).name.lexeme;
            let is_init = method_name == self.names.init;
            let function = self.declare_function(script, method, is_init);
            table.insert(method_name, Heap::new(function));
        }

        let class = Class::new(
            name.lexeme,
            self.interner.lookup(name.lexeme),
            superclass,
            table,
        );
        self.env.define(name.lexeme, Value::Class(Heap::new(class)));
        Ok(())
    }
}
