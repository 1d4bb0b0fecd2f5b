//! Binary operator implementations for the evaluator.
//!
//! Provides direct enum-based dispatch for binary operations. The operand
//! types are fixed, so pattern matching is preferred over trait objects.
//! Errors returned here carry no token; the caller attaches the operator.

use std::cmp::Ordering;

use lox_ir::BinaryOp;

use crate::errors::{
    division_by_zero, operands_must_be_numbers, operands_must_be_numbers_or_strings,
    operands_not_string_convertible, EvalError, EvalResult,
};
use crate::value::Value;

/// Evaluate a binary operation using direct pattern matching.
#[expect(
    clippy::needless_pass_by_value,
    reason = "callers hand over freshly evaluated operands"
)]
pub fn evaluate_binary(left: Value, right: Value, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::NotEq => Ok(Value::Bool(left != right)),
        BinaryOp::Add => eval_add(&left, &right),
        BinaryOp::Sub => eval_arith(&left, &right, |a, b| Ok(a - b)),
        BinaryOp::Mul => eval_arith(&left, &right, |a, b| Ok(a * b)),
        BinaryOp::Div => eval_arith(&left, &right, |a, b| checked(a, b, |a, b| a / b)),
        BinaryOp::Mod => eval_arith(&left, &right, |a, b| checked(a, b, |a, b| a % b)),
        BinaryOp::Lt => eval_ordering(&left, &right, Ordering::is_lt),
        BinaryOp::LtEq => eval_ordering(&left, &right, Ordering::is_le),
        BinaryOp::Gt => eval_ordering(&left, &right, Ordering::is_gt),
        BinaryOp::GtEq => eval_ordering(&left, &right, Ordering::is_ge),
    }
}

/// `+`: numeric addition, or concatenation when either side is text.
fn eval_add(left: &Value, right: &Value) -> EvalResult {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::Str(_), _) | (_, Value::Str(_)) => {
            match (left.concat_text(), right.concat_text()) {
                (Some(l), Some(r)) => {
                    let mut joined = String::with_capacity(l.len() + r.len());
                    joined.push_str(&l);
                    joined.push_str(&r);
                    Ok(Value::string(joined))
                }
                _ => Err(operands_not_string_convertible()),
            }
        }
        _ => Err(operands_must_be_numbers_or_strings()),
    }
}

#[inline]
fn eval_arith(
    left: &Value,
    right: &Value,
    op: impl FnOnce(f64, f64) -> Result<f64, EvalError>,
) -> EvalResult {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => op(*a, *b).map(Value::Number),
        _ => Err(operands_must_be_numbers()),
    }
}

/// Division and modulo with a zero guard.
#[inline]
fn checked(a: f64, b: f64, op: fn(f64, f64) -> f64) -> Result<f64, EvalError> {
    if b == 0.0 {
        Err(division_by_zero())
    } else {
        Ok(op(a, b))
    }
}

/// NaN compares false under every ordering operator. Text orders by UTF-16
/// code units, so astral characters sort below U+E000..=U+FFFF.
fn eval_ordering(left: &Value, right: &Value, test: fn(Ordering) -> bool) -> EvalResult {
    let ordering = match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => Some(a.encode_utf16().cmp(b.encode_utf16())),
        _ => return Err(operands_must_be_numbers_or_strings()),
    };
    Ok(Value::Bool(ordering.is_some_and(test)))
}
