use crate::ast::value::{both_booleans, both_numbers, both_strings};
use crate::ast::Value;
use crate::error::{EvalError, ParseError};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl ComparisonOperator {
    pub fn apply(&self, left: &Value, right: &Value) -> Result<bool, EvalError> {
        match self {
            ComparisonOperator::Equal => equal(left, right),
            ComparisonOperator::NotEqual => equal(left, right).map(|eq| !eq),
            ComparisonOperator::LessThan => less(left, right),
            ComparisonOperator::GreaterThan => greater(left, right),
            // Equality runs first so that `true <= true` holds while `true <= false` fails.
            ComparisonOperator::LessThanOrEqual => Ok(equal(left, right)? || less(left, right)?),
            ComparisonOperator::GreaterThanOrEqual => {
                Ok(equal(left, right)? || greater(left, right)?)
            }
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanOrEqual => "<=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanOrEqual => ">=",
        }
    }
}

fn equal(left: &Value, right: &Value) -> Result<bool, EvalError> {
    if let Some((l, r)) = both_booleans(left, right) {
        return Ok(l == r);
    }
    if let Some((l, r)) = both_strings(left, right) {
        return Ok(l == r);
    }
    if let Some((l, r)) = both_numbers(left, right) {
        return Ok(l == r);
    }
    Err(EvalError::binary_mismatch("==", left, right))
}

fn less(left: &Value, right: &Value) -> Result<bool, EvalError> {
    if let Some((l, r)) = both_strings(left, right) {
        return Ok(l < r);
    }
    if let Some((l, r)) = both_numbers(left, right) {
        return Ok(l < r);
    }
    Err(EvalError::binary_mismatch("<", left, right))
}

fn greater(left: &Value, right: &Value) -> Result<bool, EvalError> {
    if let Some((l, r)) = both_strings(left, right) {
        return Ok(l > r);
    }
    if let Some((l, r)) = both_numbers(left, right) {
        return Ok(l > r);
    }
    Err(EvalError::binary_mismatch(">", left, right))
}

impl TryFrom<&str> for ComparisonOperator {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "=" | "==" => Ok(ComparisonOperator::Equal),
            "!=" => Ok(ComparisonOperator::NotEqual),
            "<" => Ok(ComparisonOperator::LessThan),
            "<=" => Ok(ComparisonOperator::LessThanOrEqual),
            ">" => Ok(ComparisonOperator::GreaterThan),
            ">=" => Ok(ComparisonOperator::GreaterThanOrEqual),
            _ => Err(ParseError::InvalidOperator(value.to_string())),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn apply(&self, left: bool, right: bool) -> bool {
        match self {
            LogicalOperator::And => left && right,
            LogicalOperator::Or => left || right,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
        }
    }
}

impl TryFrom<&str> for LogicalOperator {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "&&" => Ok(LogicalOperator::And),
            "||" => Ok(LogicalOperator::Or),
            _ => Err(ParseError::InvalidOperator(value.to_string())),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOperator {
    pub fn apply(&self, left: &Value, right: &Value) -> Result<f64, EvalError> {
        let (l, r) = both_numbers(left, right)
            .ok_or_else(|| EvalError::binary_mismatch(self.symbol(), left, right))?;
        match self {
            ArithmeticOperator::Add => Ok(l + r),
            ArithmeticOperator::Subtract => Ok(l - r),
            ArithmeticOperator::Multiply => Ok(l * r),
            ArithmeticOperator::Divide => {
                if r == 0.0 {
                    Err(EvalError::DivideByZero)
                } else {
                    Ok(l / r)
                }
            }
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Subtract => "-",
            ArithmeticOperator::Multiply => "*",
            ArithmeticOperator::Divide => "/",
        }
    }
}

impl TryFrom<&str> for ArithmeticOperator {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "+" => Ok(ArithmeticOperator::Add),
            "-" => Ok(ArithmeticOperator::Subtract),
            "*" => Ok(ArithmeticOperator::Multiply),
            "/" => Ok(ArithmeticOperator::Divide),
            _ => Err(ParseError::InvalidOperator(value.to_string())),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Not,
}

impl UnaryOperator {
    pub fn apply(&self, operand: &Value) -> Result<bool, EvalError> {
        match self {
            UnaryOperator::Not => operand
                .as_bool()
                .map(|b| !b)
                .ok_or_else(|| EvalError::unary_mismatch(self.symbol(), operand)),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Not => "!",
        }
    }
}

impl TryFrom<&str> for UnaryOperator {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "!" => Ok(UnaryOperator::Not),
            _ => Err(ParseError::UnsupportedUnaryOperator(value.to_string())),
        }
    }
}

macro_rules! impl_display_symbol {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.symbol())
                }
            }
        )*
    };
}

impl_display_symbol!(
    ComparisonOperator,
    LogicalOperator,
    ArithmeticOperator,
    UnaryOperator
);

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    #[test]
    fn test_numeric_and_lexical_comparison() {
        use ComparisonOperator::*;
        assert!(LessThan.apply(&num(1.0), &num(2.0)).unwrap());
        assert!(!GreaterThan.apply(&num(1.0), &num(2.0)).unwrap());
        assert!(LessThan.apply(&"abc".into(), &"abd".into()).unwrap());
        assert!(GreaterThanOrEqual.apply(&"b".into(), &"b".into()).unwrap());
        assert!(NotEqual.apply(&num(1.0), &num(2.0)).unwrap());
    }

    #[test]
    fn test_boolean_comparison_is_equality_only() {
        use ComparisonOperator::*;
        assert!(Equal.apply(&true.into(), &true.into()).unwrap());
        assert!(NotEqual.apply(&true.into(), &false.into()).unwrap());
        // equality short-circuits before the ordering check
        assert!(LessThanOrEqual.apply(&true.into(), &true.into()).unwrap());

        let err = LessThanOrEqual
            .apply(&true.into(), &false.into())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "v1[true]::bool and v2[false]::bool can not `<` operation"
        );
    }

    #[test]
    fn test_mixed_kinds_do_not_compare() {
        let err = ComparisonOperator::LessThanOrEqual
            .apply(&num(1.0), &"1".into())
            .unwrap_err();
        assert!(matches!(err, EvalError::TypeMismatch(_)));
        assert!(err.to_string().contains("`==`"));

        assert!(ComparisonOperator::Equal
            .apply(&Value::Nil, &num(1.0))
            .is_err());
    }

    #[test]
    fn test_arithmetic() {
        use ArithmeticOperator::*;
        assert_eq!(Add.apply(&num(1.0), &num(2.0)).unwrap(), 3.0);
        assert_eq!(Subtract.apply(&num(1.0), &num(2.0)).unwrap(), -1.0);
        assert_eq!(Multiply.apply(&num(1.5), &num(2.0)).unwrap(), 3.0);
        assert_eq!(Divide.apply(&num(1.0), &num(4.0)).unwrap(), 0.25);
        assert!(matches!(
            Divide.apply(&num(1.0), &num(0.0)),
            Err(EvalError::DivideByZero)
        ));
        assert!(Add.apply(&num(1.0), &"2".into()).is_err());
    }

    #[test]
    fn test_unary_not_is_lenient() {
        assert!(!UnaryOperator::Not.apply(&true.into()).unwrap());
        assert!(UnaryOperator::Not.apply(&"false".into()).unwrap());
        assert!(!UnaryOperator::Not.apply(&num(0.0)).unwrap());
        assert!(UnaryOperator::Not.apply(&Value::Nil).is_err());
    }

    #[test]
    fn test_operator_tables() {
        assert_eq!(
            ComparisonOperator::try_from("=").unwrap(),
            ComparisonOperator::Equal
        );
        assert_eq!(LogicalOperator::try_from("||").unwrap(), LogicalOperator::Or);
        assert_eq!(
            ArithmeticOperator::try_from("%"),
            Err(ParseError::InvalidOperator("%".to_string()))
        );
        assert_eq!(
            UnaryOperator::try_from("-"),
            Err(ParseError::UnsupportedUnaryOperator("-".to_string()))
        );
        assert_eq!(ComparisonOperator::LessThanOrEqual.to_string(), "<=");
    }
}
