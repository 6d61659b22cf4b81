pub mod ast;
pub mod error;
pub mod functions;

pub use ast::{Comparator, Evaluator, Value, Variables};
pub use error::{is_divide_by_zero, is_variable_not_found, Error, EvalError, ParseError};
pub use functions::{Arity, FunctionRegistry};

/// Parses and evaluates `expression` once, in lenient mode.
///
/// Prefer building an [`Evaluator`] when the same expression is evaluated repeatedly.
pub fn evaluate_expression(expression: &str, variables: &Variables) -> Result<Value, Error> {
    let evaluator = Evaluator::new(expression)?;
    Ok(evaluator.eval(variables)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_evaluate_expression() {
        let variables = HashMap::from([
            ("price".to_string(), Value::from(120.0)),
            ("volume".to_string(), Value::from(3000.0)),
        ]);
        assert_eq!(
            evaluate_expression("price > 100 && volume < 5000", &variables).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            evaluate_expression("rate(price, volume) * 100", &variables).unwrap(),
            Value::Number(4.0)
        );
    }

    #[test]
    fn test_evaluate_expression_errors() {
        let variables = HashMap::from([("price".to_string(), Value::from(1))]);
        assert!(matches!(
            evaluate_expression("price +", &variables),
            Err(Error::Parse(ParseError::Syntax(_)))
        ));
        assert!(evaluate_expression("price / 0", &variables)
            .unwrap_err()
            .is_divide_by_zero());
    }
}
