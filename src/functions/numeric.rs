use crate::ast::value::both_numbers;
use crate::ast::Value;
use crate::error::EvalError;
use crate::functions::{Arity, FunctionRegistry};

pub fn register(registry: &mut FunctionRegistry) {
    registry.register_function("rate", Arity::Exact(2), rate);
    registry.register_function("as_numeric", Arity::Exact(1), as_numeric);
}

/// `rate(a, b)`: `a / b`, or nil when `b` is zero.
pub fn rate(args: &[Value]) -> Result<Value, EvalError> {
    let [numerator, denominator] = args else {
        return Err(EvalError::call_mismatch("rate", args));
    };
    let (n1, n2) = both_numbers(numerator, denominator)
        .ok_or_else(|| EvalError::call_mismatch("rate", args))?;
    if n2 == 0.0 {
        return Ok(Value::Nil);
    }
    Ok(Value::Number(n1 / n2))
}

pub fn as_numeric(args: &[Value]) -> Result<Value, EvalError> {
    let [value] = args else {
        return Err(EvalError::call_mismatch("as_numeric", args));
    };
    Ok(value.as_numeric().map_or(Value::Nil, Value::Number))
}
