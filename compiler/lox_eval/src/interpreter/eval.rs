//! Expression evaluation.

use lox_ir::{ExprId, ExprKind, Literal, LogicalOp, Token};
use lox_stack::ensure_sufficient_stack;
use smallvec::SmallVec;

use super::Interpreter;
use crate::environment::LookupError;
use crate::errors::{
    internal_error, only_instances_have_fields, only_instances_have_properties,
    undefined_property, undefined_variable, uninitialized_variable, EvalError, EvalResult,
};
use crate::function::{Class, Instance, UserFunction};
use crate::operators::evaluate_binary;
use crate::script::SharedScript;
use crate::unary_operators::evaluate_unary;
use crate::value::{Heap, Value};

/// Most calls pass only a handful of arguments.
type ArgVec = SmallVec<[Value; 8]>;

impl Interpreter {
    /// Evaluate one expression.
    pub(crate) fn evaluate(&mut self, script: &SharedScript, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| self.evaluate_inner(script, id))
    }

    fn evaluate_inner(&mut self, script: &SharedScript, id: ExprId) -> EvalResult {
        match script.program.arena.expr(id).kind {
            ExprKind::Literal(literal) => Ok(self.eval_literal(literal)),
            ExprKind::Grouping(inner) => self.evaluate(script, inner),
            ExprKind::Unary {
                op,
                operator,
                operand,
            } => {
                let value = self.evaluate(script, operand)?;
                evaluate_unary(value, op).map_err(|e| e.with_token_if_absent(operator))
            }
            ExprKind::Binary {
                op,
                operator,
                left,
                right,
            } => {
                let left = self.evaluate(script, left)?;
                let right = self.evaluate(script, right)?;
                evaluate_binary(left, right, op).map_err(|e| e.with_token_if_absent(operator))
            }
            ExprKind::Logical { op, left, right } => {
                let left = self.evaluate(script, left)?;
                let decided = match op {
                    LogicalOp::Or => left.is_truthy(),
                    LogicalOp::And => !left.is_truthy(),
                };
                if decided {
                    Ok(left)
                } else {
                    self.evaluate(script, right)
                }
            }
            ExprKind::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                if self.evaluate(script, condition)?.is_truthy() {
                    self.evaluate(script, then_expr)
                } else {
                    self.evaluate(script, else_expr)
                }
            }
            ExprKind::Variable(name) | ExprKind::This(name) => {
                self.lookup_variable(script, id, name)
            }
            ExprKind::Assign { name, value } => {
                let value = self.evaluate(script, value)?;
                let distance = script.resolution.depth(id);
                let assigned = match distance {
                    Some(distance) => self.env.assign_at(distance, name.lexeme, value.clone()),
                    None => self.env.assign_global(name.lexeme, value.clone()),
                };
                assigned.map_err(|e| self.binding_error(e, name, distance))?;
                Ok(value)
            }
            ExprKind::Call {
                callee,
                paren,
                args,
            } => {
                let callee = self.evaluate(script, callee)?;
                let arg_ids = script.program.arena.expr_list(args);
                let mut values = ArgVec::with_capacity(arg_ids.len());
                for &arg in arg_ids {
                    values.push(self.evaluate(script, arg)?);
                }
                self.call_value(callee, &values, paren)
            }
            ExprKind::Get { object, name } => match self.evaluate(script, object)? {
                Value::Instance(instance) => self.get_property(&instance, name),
                _ => Err(only_instances_have_properties().with_token(name)),
            },
            ExprKind::Set {
                object,
                name,
                value,
            } => {
                let Value::Instance(instance) = self.evaluate(script, object)? else {
                    return Err(only_instances_have_fields().with_token(name));
                };
                let value = self.evaluate(script, value)?;
                instance.set_field(name.lexeme, value.clone());
                Ok(value)
            }
            ExprKind::Super { keyword, method } => self.eval_super(script, id, keyword, method),
        }
    }

    fn eval_literal(&self, literal: Literal) -> Value {
        match literal {
            Literal::Nil => Value::Nil,
            Literal::Bool(b) => Value::Bool(b),
            Literal::Number(n) => Value::Number(n),
            Literal::Str(text) => Value::string(self.interner.lookup(text)),
        }
    }

    /// Read a variable (or `this`) at its resolved distance, or as a global.
    fn lookup_variable(&self, script: &SharedScript, id: ExprId, name: Token) -> EvalResult {
        let distance = script.resolution.depth(id);
        let found = match distance {
            Some(distance) => self.env.lookup_at(distance, name.lexeme),
            None => self.env.lookup_global(name.lexeme),
        };
        found.map_err(|e| self.binding_error(e, name, distance))
    }

    /// Translate a failed lookup or assignment into a runtime error.
    ///
    /// A resolved reference that misses its binding means the resolver and
    /// the evaluator disagree about scopes, which user code cannot cause.
    fn binding_error(&self, err: LookupError, name: Token, distance: Option<usize>) -> EvalError {
        let text = self.interner.lookup(name.lexeme);
        let error = match (err, distance) {
            (LookupError::Uninitialized, _) => uninitialized_variable(text),
            (LookupError::Undefined, None) => undefined_variable(text),
            (err, Some(distance)) => {
                tracing::error!(
                    name = text,
                    distance,
                    ?err,
                    "resolved binding missing at runtime"
                );
                internal_error(format!(
                    "'{text}' not bound {distance} scope(s) out ({err:?})"
                ))
            }
            (LookupError::MissingScope, None) => {
                internal_error(format!("global scope missing while reading '{text}'"))
            }
        };
        error.with_token(name)
    }

    /// Own field first, then a method along the class chain, bound to the
    /// instance.
    fn get_property(&self, instance: &Heap<Instance>, name: Token) -> EvalResult {
        if let Some(value) = instance.field(name.lexeme) {
            return Ok(value);
        }
        match instance.class().find_method(name.lexeme) {
            Some((method, owner)) => {
                let this = Value::Instance(instance.clone());
                Ok(Value::Function(Heap::new(self.bind_method(method, owner, this))))
            }
            None => Err(undefined_property(self.interner.lookup(name.lexeme)).with_token(name)),
        }
    }

    /// `super.method`: look up from the superclass of the class that defined
    /// the running method, bound to the current `this`.
    fn eval_super(
        &self,
        script: &SharedScript,
        id: ExprId,
        keyword: Token,
        method: Token,
    ) -> EvalResult {
        let Some(distance) = script.resolution.depth(id) else {
            return Err(internal_error("'super' was not resolved").with_token(keyword));
        };
        // `this` and `super` share the method's binding scope
        let superclass = self
            .env
            .lookup_at(distance, self.names.super_)
            .map_err(|e| self.binding_error(e, keyword, Some(distance)))?;
        let this = self
            .env
            .lookup_at(distance, self.names.this)
            .map_err(|e| self.binding_error(e, keyword, Some(distance)))?;
        let Value::Class(superclass) = superclass else {
            return Err(internal_error("'super' is not bound to a class").with_token(keyword));
        };
        match superclass.find_method(method.lexeme) {
            Some((found, owner)) => Ok(Value::Function(Heap::new(
                self.bind_method(found, owner, this),
            ))),
            None => {
                Err(undefined_property(self.interner.lookup(method.lexeme)).with_token(method))
            }
        }
    }

    /// Bind `this` (and `super`, when the defining class has a superclass)
    /// for a method found on `owner`.
    pub(crate) fn bind_method(
        &self,
        method: &UserFunction,
        owner: &Class,
        this: Value,
    ) -> UserFunction {
        let super_ = owner
            .superclass()
            .map(|superclass| (self.names.super_, Value::Class(superclass.clone())));
        method.bind((self.names.this, this), super_)
    }
}
