use std::collections::HashMap;
use std::fmt;

/// The variable bindings an expression is evaluated against.
pub type Variables = HashMap<String, Value>;

/// Enum to represent the dynamic values an expression works with
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Str(String),
    Boolean(bool),
    /// No value: a missing variable in lenient mode, or a function with nothing to return.
    Nil,
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Name of the value's kind, used in type mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Boolean(_) => "bool",
            Value::Nil => "nil",
        }
    }

    /// Numeric coercion: numbers as is, strings through float parsing.
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Str(s) => s.parse::<f64>().ok(),
            Value::Boolean(_) | Value::Nil => None,
        }
    }

    /// String coercion: numbers use the shortest round-trip decimal form.
    pub fn as_string(&self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s.clone()),
            Value::Number(n) => Some(format_number(*n)),
            Value::Boolean(b) => Some(b.to_string()),
            Value::Nil => None,
        }
    }

    /// Lenient boolean coercion.
    ///
    /// A number is `true` exactly when it equals zero. Strings accept the usual
    /// boolean literals (`1`, `t`, `T`, `TRUE`, `true`, `True` and their false forms).
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Number(n) => Some(*n == 0.0),
            Value::Str(s) => parse_bool(s),
            Value::Nil => None,
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Formats a number with the shortest representation that parses back to the same value.
pub fn format_number(n: f64) -> String {
    n.to_string()
}

/// Returns both payloads when both values are numbers.
pub fn both_numbers(left: &Value, right: &Value) -> Option<(f64, f64)> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Some((*l, *r)),
        _ => None,
    }
}

/// Returns both payloads when both values are strings.
pub fn both_strings<'a>(left: &'a Value, right: &'a Value) -> Option<(&'a str, &'a str)> {
    match (left, right) {
        (Value::Str(l), Value::Str(r)) => Some((l, r)),
        _ => None,
    }
}

/// Returns both payloads when both values are booleans.
pub fn both_booleans(left: &Value, right: &Value) -> Option<(bool, bool)> {
    match (left, right) {
        (Value::Boolean(l), Value::Boolean(r)) => Some((*l, *r)),
        _ => None,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Str(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Nil => f.write_str("nil"),
        }
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_number!(f64, f32, i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Value::from(2.5).as_numeric(), Some(2.5));
        assert_eq!(Value::from("5.0").as_numeric(), Some(5.0));
        assert_eq!(Value::from("hoge").as_numeric(), None);
        assert_eq!(Value::from(true).as_numeric(), None);
        assert_eq!(Value::Nil.as_numeric(), None);
    }

    #[test]
    fn test_string_coercion_uses_shortest_form() {
        assert_eq!(Value::from(2.0).as_string().as_deref(), Some("2"));
        assert_eq!(Value::from(0.1).as_string().as_deref(), Some("0.1"));
        assert_eq!(Value::from(3).as_string().as_deref(), Some("3"));
        assert_eq!(Value::from("x").as_string().as_deref(), Some("x"));
        assert_eq!(Value::Nil.as_string(), None);
    }

    #[test]
    fn test_bool_coercion() {
        assert_eq!(Value::from(0.0).as_bool(), Some(true));
        assert_eq!(Value::from(4.0).as_bool(), Some(false));
        assert_eq!(Value::from("TRUE").as_bool(), Some(true));
        assert_eq!(Value::from("f").as_bool(), Some(false));
        assert_eq!(Value::from("yes").as_bool(), None);
        assert_eq!(Value::Nil.as_bool(), None);
    }

    #[test]
    fn test_pair_helpers_do_not_coerce() {
        assert_eq!(
            both_numbers(&Value::from(1), &Value::from(2)),
            Some((1.0, 2.0))
        );
        assert_eq!(both_numbers(&Value::from(1), &Value::from("2")), None);
        assert_eq!(
            both_strings(&Value::from("a"), &Value::from("b")),
            Some(("a", "b"))
        );
        assert_eq!(both_booleans(&Value::from(true), &Value::from(1)), None);
    }

    #[test]
    fn test_host_conversions() {
        assert_eq!(Value::from(7u8), Value::Number(7.0));
        assert_eq!(Value::from(None::<f64>), Value::Nil);
        assert_eq!(Value::from(Some("s")), Value::Str("s".to_string()));
        assert_eq!(Value::from(-3i64).to_string(), "-3");
        assert_eq!(Value::Nil.to_string(), "nil");
    }
}
