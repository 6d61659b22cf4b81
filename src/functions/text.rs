use crate::ast::value::both_strings;
use crate::ast::Value;
use crate::error::EvalError;
use crate::functions::pattern_cache::PatternCache;
use crate::functions::{Arity, FunctionRegistry};
use std::sync::Arc;

pub fn register(registry: &mut FunctionRegistry) {
    registry.register_function("as_string", Arity::Exact(1), as_string);
    registry.register_function("string_contains", Arity::Exact(2), string_contains);

    let cache = Arc::clone(registry.pattern_cache());
    registry.register_function("regexp_match", Arity::Exact(2), move |args| {
        regexp_match(&cache, args)
    });
}

pub fn as_string(args: &[Value]) -> Result<Value, EvalError> {
    let [value] = args else {
        return Err(EvalError::call_mismatch("as_string", args));
    };
    Ok(value.as_string().map_or(Value::Nil, Value::Str))
}

/// Substring test; both arguments must already be strings.
pub fn string_contains(args: &[Value]) -> Result<Value, EvalError> {
    let [haystack, needle] = args else {
        return Err(EvalError::call_mismatch("string_contains", args));
    };
    let (s, sub) = both_strings(haystack, needle)
        .ok_or_else(|| EvalError::call_mismatch("string_contains", args))?;
    Ok(Value::Boolean(s.contains(sub)))
}

/// Matches `args[0]` against the pattern in `args[1]`, compiling through `cache`.
pub fn regexp_match(cache: &PatternCache, args: &[Value]) -> Result<Value, EvalError> {
    let [text, pattern] = args else {
        return Err(EvalError::call_mismatch("regexp_match", args));
    };
    let (s, pattern) = both_strings(text, pattern)
        .ok_or_else(|| EvalError::call_mismatch("regexp_match", args))?;
    let regex = cache.get_or_compile(pattern)?;
    Ok(Value::Boolean(regex.is_match(s)))
}
