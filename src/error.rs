use crate::ast::Value;
use thiserror::Error;

/// Errors detected while turning expression text into a tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Parse error: {0}")]
    Syntax(String),

    #[error("invalid operator `{0}`")]
    InvalidOperator(String),

    #[error("unsupported unary operator `{0}`")]
    UnsupportedUnaryOperator(String),

    #[error("{0}() func is not found")]
    UnknownFunction(String),

    #[error("{name}() func is expected {expected} args, but given {given} args")]
    ArgumentCount {
        name: String,
        expected: usize,
        given: usize,
    },

    #[error("malformed expression: {0}")]
    Malformed(String),
}

/// Errors raised while evaluating a tree against a set of variables.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("divide by 0")]
    DivideByZero,

    #[error("variable `{0}` not found")]
    VariableNotFound(String),

    #[error("{0}")]
    TypeMismatch(String),

    #[error("invalid regular expression `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Attaches the rendering of the subexpression that failed.
    #[error("Eval(`{expression}`) {source}")]
    Eval {
        expression: String,
        #[source]
        source: Box<EvalError>,
    },
}

impl EvalError {
    pub(crate) fn binary_mismatch(operator: &str, left: &Value, right: &Value) -> Self {
        EvalError::TypeMismatch(format!(
            "v1[{}]::{} and v2[{}]::{} can not `{}` operation",
            left,
            left.type_name(),
            right,
            right.type_name(),
            operator
        ))
    }

    pub(crate) fn not_both_bool(operator: &str, left: &Value, right: &Value) -> Self {
        EvalError::TypeMismatch(format!(
            "v1[{}]::{} and v2[{}]::{} is not both bool, can not `{}` operation",
            left,
            left.type_name(),
            right,
            right.type_name(),
            operator
        ))
    }

    pub(crate) fn unary_mismatch(operator: &str, value: &Value) -> Self {
        EvalError::TypeMismatch(format!(
            "v[{}]::{} can not `{}` operation",
            value,
            value.type_name(),
            operator
        ))
    }

    pub(crate) fn call_mismatch(name: &str, args: &[Value]) -> Self {
        let rendered = args
            .iter()
            .enumerate()
            .map(|(i, arg)| format!("v{}[{}]::{}", i + 1, arg, arg.type_name()))
            .collect::<Vec<_>>()
            .join(",");
        EvalError::TypeMismatch(format!("{name}({rendered}) can not eval"))
    }

    /// Wraps `self` with the rendering of the failing subexpression.
    pub(crate) fn within(self, expression: impl ToString) -> Self {
        EvalError::Eval {
            expression: expression.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error once every `Eval` layer is peeled off.
    pub fn root_cause(&self) -> &EvalError {
        match self {
            EvalError::Eval { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn is_divide_by_zero(&self) -> bool {
        matches!(self.root_cause(), EvalError::DivideByZero)
    }

    pub fn is_variable_not_found(&self) -> bool {
        matches!(self.root_cause(), EvalError::VariableNotFound(_))
    }
}

/// Returns `true` if `err` is, or wraps, a division by zero.
pub fn is_divide_by_zero(err: &EvalError) -> bool {
    err.is_divide_by_zero()
}

/// Returns `true` if `err` is, or wraps, a strict-mode variable miss.
pub fn is_variable_not_found(err: &EvalError) -> bool {
    err.is_variable_not_found()
}

/// Any failure of the one-shot [`crate::evaluate_expression`] helper.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl Error {
    pub fn is_divide_by_zero(&self) -> bool {
        matches!(self, Error::Eval(err) if err.is_divide_by_zero())
    }

    pub fn is_variable_not_found(&self) -> bool {
        matches!(self, Error::Eval(err) if err.is_variable_not_found())
    }
}
