//! Function call evaluation methods for the Interpreter.

use lox_ir::Token;

use super::Interpreter;
use crate::control::{Completion, ExecResult};
use crate::diagnostics::CallFrame;
use crate::errors::{arity_mismatch, internal_error, not_callable, EvalError, EvalResult};
use crate::function::{Class, Instance, UserFunction};
use crate::value::{Heap, Value};

impl Interpreter {
    /// Call any callable value. Arity is checked before anything runs.
    pub(crate) fn call_value(&mut self, callee: Value, args: &[Value], paren: Token) -> EvalResult {
        match callee {
            Value::Function(function) => {
                check_arity(function.arity(), args.len(), paren)?;
                self.call_function(&function, args, paren)
            }
            Value::Native(native) => {
                check_arity(native.arity, args.len(), paren)?;
                native.call(args).map_err(|e| e.with_token_if_absent(paren))
            }
            Value::Class(class) => {
                check_arity(class.arity(self.names.init), args.len(), paren)?;
                self.instantiate(&class, args, paren)
            }
            _ => Err(not_callable().with_token(paren)),
        }
    }

    /// Run a user function body in a fresh scope chained to its closure.
    ///
    /// Initializers always yield `this`, whatever the body returned.
    #[tracing::instrument(level = "debug", skip_all, fields(function = function.display_name()))]
    pub(crate) fn call_function(
        &mut self,
        function: &UserFunction,
        args: &[Value],
        paren: Token,
    ) -> EvalResult {
        self.call_stack
            .push(CallFrame {
                name: function.name(),
                line: paren.line,
            })
            .map_err(|e| e.with_token(paren))?;
        let result = self.run_body(function, args);
        self.call_stack.pop();

        let completion = result?;
        if function.is_initializer() {
            return function
                .closure()
                .borrow()
                .get_own(self.names.this)
                .ok_or_else(|| {
                    internal_error("initializer called without 'this'").with_token(paren)
                });
        }
        match completion {
            Completion::Return(value) => Ok(value),
            Completion::Normal => Ok(Value::Nil),
            escaped @ (Completion::Break | Completion::Continue) => {
                tracing::error!(completion = ?escaped, "loop signal escaped a function body");
                Err(internal_error(format!("{escaped:?} escaped a function body")))
            }
        }
    }

    /// Parameters and body-level declarations share one scope.
    fn run_body(&mut self, function: &UserFunction, args: &[Value]) -> ExecResult {
        let script = function.script().clone();
        let decl = script.program.arena.function(function.decl());
        let mut scoped = self.scoped_in(function.closure().clone());
        for (param, arg) in decl.params.iter().zip(args) {
            scoped.env.define(param.lexeme, arg.clone());
        }
        scoped.execute_stmts(&script, decl.body)
    }

    /// Create an instance and run `init` (own or inherited) bound to it.
    fn instantiate(&mut self, class: &Heap<Class>, args: &[Value], paren: Token) -> EvalResult {
        let instance = Value::Instance(Heap::new(Instance::new(class.clone())));
        if let Some((init, owner)) = class.find_method(self.names.init) {
            let bound = self.bind_method(init, owner, instance.clone());
            self.call_function(&bound, args, paren)?;
        }
        Ok(instance)
    }
}

fn check_arity(expected: usize, got: usize, paren: Token) -> Result<(), EvalError> {
    if expected == got {
        Ok(())
    } else {
        Err(arity_mismatch(expected, got).with_token(paren))
    }
}
