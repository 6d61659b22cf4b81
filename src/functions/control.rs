use crate::ast::Value;
use crate::error::EvalError;
use crate::functions::{Arity, FunctionRegistry};

pub fn register(registry: &mut FunctionRegistry) {
    registry.register_function("coalesce", Arity::Variadic, coalesce);
    registry.register_function("if", Arity::Exact(3), if_else);
}

/// First argument that is not nil.
pub fn coalesce(args: &[Value]) -> Result<Value, EvalError> {
    Ok(args
        .iter()
        .find(|arg| !arg.is_nil())
        .cloned()
        .unwrap_or(Value::Nil))
}

/// `if(cond, then, else)`; the condition goes through lenient bool coercion.
pub fn if_else(args: &[Value]) -> Result<Value, EvalError> {
    let [condition, then, otherwise] = args else {
        return Err(EvalError::call_mismatch("if", args));
    };
    match condition.as_bool() {
        Some(true) => Ok(then.clone()),
        Some(false) => Ok(otherwise.clone()),
        None => Err(EvalError::TypeMismatch(format!(
            "if(v1[{}]::{},...) condition is not bool",
            condition,
            condition.type_name()
        ))),
    }
}
