//! Host functions installed in the global scope.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::errors::{internal_error, EvalResult};
use crate::function::NativeFunction;
use crate::value::Value;

/// Every native, in registration order.
pub const NATIVES: &[NativeFunction] = &[NativeFunction::new("clock", 0, clock)];

/// Seconds since the Unix epoch, with sub-second precision.
pub fn clock(_args: &[Value]) -> EvalResult {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| internal_error(format!("system clock before epoch: {e}")))?;
    Ok(Value::Number(elapsed.as_secs_f64()))
}
