//! Unary operator implementations for the evaluator.

use lox_ir::UnaryOp;

use crate::errors::{operand_must_be_number, EvalResult};
use crate::value::Value;

/// Evaluate a unary operation using direct pattern matching.
#[expect(
    clippy::needless_pass_by_value,
    reason = "callers hand over freshly evaluated operands"
)]
pub fn evaluate_unary(value: Value, op: UnaryOp) -> EvalResult {
    match op {
        UnaryOp::Neg => match value {
            Value::Number(n) => Ok(Value::Number(-n)),
            _ => Err(operand_must_be_number()),
        },
        UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
    }
}
