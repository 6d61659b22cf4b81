use crate::error::EvalError;
use crate::functions::Callable;
use std::fmt;
use value::{both_booleans, format_number};

mod evaluator;
mod operator;
mod parser;
pub mod value;

pub use evaluator::{Comparator, Evaluator};
pub use operator::*;
pub use parser::ExpressionParser as Parser;
pub use value::{Value, Variables};

/// A parsed expression. Children are owned outright and never shared.
#[derive(Debug, Clone, PartialEq)]
pub enum ASTNode {
    Identifier {
        name: String,
        strict: bool,
    },
    Number {
        value: f64,
        /// Source text, or the shortest form of a folded value.
        text: String,
    },
    StringLiteral(String),
    Nil,
    Group(Box<ASTNode>),
    Comparison {
        left: Box<ASTNode>,
        operator: ComparisonOperator,
        right: Box<ASTNode>,
    },
    LogicalOperation {
        left: Box<ASTNode>,
        operator: LogicalOperator,
        right: Box<ASTNode>,
    },
    ArithmeticOperation {
        left: Box<ASTNode>,
        operator: ArithmeticOperator,
        right: Box<ASTNode>,
    },
    UnaryOperation {
        operator: UnaryOperator,
        operand: Box<ASTNode>,
    },
    FunctionCall {
        name: String,
        args: Vec<ASTNode>,
        function: Callable,
    },
}

impl ASTNode {
    /// A lenient variable reference.
    pub fn identifier(name: &str) -> Self {
        ASTNode::Identifier {
            name: name.to_string(),
            strict: false,
        }
    }

    pub fn number(value: f64) -> Self {
        ASTNode::Number {
            value,
            text: format_number(value),
        }
    }

    /// A unary node; its operand always looks variables up strictly.
    pub fn unary(operator: UnaryOperator, mut operand: ASTNode) -> Self {
        operand.set_strict(true);
        ASTNode::UnaryOperation {
            operator,
            operand: Box::new(operand),
        }
    }

    /// Evaluates the node against `variables`.
    ///
    /// Failures of a node's own operation are wrapped with its rendering, as are
    /// strict misses of its direct identifiers. Errors already wrapped further
    /// down pass through untouched.
    pub fn evaluate(&self, variables: &Variables) -> Result<Value, EvalError> {
        match self {
            ASTNode::Identifier { name, strict } => match variables.get(name) {
                Some(value) => Ok(value.clone()),
                None if *strict => Err(EvalError::VariableNotFound(name.clone())),
                None => Ok(Value::Nil),
            },
            ASTNode::Number { value, .. } => Ok(Value::Number(*value)),
            ASTNode::StringLiteral(s) => Ok(Value::Str(s.clone())),
            ASTNode::Nil => Ok(Value::Nil),
            ASTNode::Group(inner) => inner
                .evaluate(variables)
                .map_err(|e| self.locate_miss(e)),
            ASTNode::Comparison { .. } | ASTNode::LogicalOperation { .. } => {
                self.compare(variables).map(Value::Boolean)
            }
            ASTNode::ArithmeticOperation {
                left,
                operator,
                right,
            } => {
                let left_value = self.operand(left, variables)?;
                let right_value = self.operand(right, variables)?;
                operator
                    .apply(&left_value, &right_value)
                    .map(Value::Number)
                    .map_err(|e| e.within(self))
            }
            ASTNode::UnaryOperation { operator, operand } => {
                let value = self.operand(operand, variables)?;
                operator
                    .apply(&value)
                    .map(Value::Boolean)
                    .map_err(|e| e.within(self))
            }
            ASTNode::FunctionCall { args, function, .. } => {
                let values = args
                    .iter()
                    .map(|arg| self.operand(arg, variables))
                    .collect::<Result<Vec<_>, _>>()?;
                function.call(&values).map_err(|e| e.within(self))
            }
        }
    }

    /// Evaluates the node as a predicate.
    pub fn compare(&self, variables: &Variables) -> Result<bool, EvalError> {
        match self {
            ASTNode::Comparison {
                left,
                operator,
                right,
            } => {
                let left_value = self.operand(left, variables)?;
                let right_value = self.operand(right, variables)?;
                operator
                    .apply(&left_value, &right_value)
                    .map_err(|e| e.within(self))
            }
            ASTNode::LogicalOperation {
                left,
                operator,
                right,
            } => {
                let left_value = self.operand(left, variables)?;
                let right_value = self.operand(right, variables)?;
                match both_booleans(&left_value, &right_value) {
                    Some((l, r)) => Ok(operator.apply(l, r)),
                    None => Err(EvalError::not_both_bool(
                        operator.symbol(),
                        &left_value,
                        &right_value,
                    )
                    .within(self)),
                }
            }
            ASTNode::Group(inner) => inner.compare(variables).map_err(|e| self.locate_miss(e)),
            other => match other.evaluate(variables)? {
                Value::Boolean(b) => Ok(b),
                value => Err(EvalError::TypeMismatch(format!(
                    "v[{}]::{} is not bool",
                    value,
                    value.type_name()
                ))
                .within(other)),
            },
        }
    }

    fn operand(&self, child: &ASTNode, variables: &Variables) -> Result<Value, EvalError> {
        child.evaluate(variables).map_err(|e| self.locate_miss(e))
    }

    /// A strict miss is wrapped once, by the closest node enclosing the identifier.
    fn locate_miss(&self, err: EvalError) -> EvalError {
        if matches!(err, EvalError::VariableNotFound(_)) {
            err.within(self)
        } else {
            err
        }
    }

    /// Whether the node is a predicate: a comparison, a logical operation, or a group of one.
    pub fn is_comparator(&self) -> bool {
        match self {
            ASTNode::Comparison { .. } | ASTNode::LogicalOperation { .. } => true,
            ASTNode::Group(inner) => inner.is_comparator(),
            _ => false,
        }
    }

    /// Sets strict lookup on every reachable identifier.
    ///
    /// Operands of unary nodes stay strict whatever `strict` is.
    pub fn set_strict(&mut self, strict: bool) {
        match self {
            ASTNode::Identifier { strict: flag, .. } => *flag = strict,
            ASTNode::Number { .. } | ASTNode::StringLiteral(_) | ASTNode::Nil => {}
            ASTNode::Group(inner) => inner.set_strict(strict),
            ASTNode::Comparison { left, right, .. }
            | ASTNode::LogicalOperation { left, right, .. }
            | ASTNode::ArithmeticOperation { left, right, .. } => {
                left.set_strict(strict);
                right.set_strict(strict);
            }
            ASTNode::UnaryOperation { operand, .. } => operand.set_strict(true),
            ASTNode::FunctionCall { args, .. } => {
                args.iter_mut().for_each(|arg| arg.set_strict(strict));
            }
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '"' => f.write_str("\\\"")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

/// Canonical rendering; the output always parses back to an equivalent tree.
impl fmt::Display for ASTNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ASTNode::Identifier { name, .. } => f.write_str(name),
            // the grammar has no negative literals
            ASTNode::Number { value, .. } if value.is_sign_negative() => {
                write!(f, "(0 - {})", format_number(-value))
            }
            ASTNode::Number { text, .. } => f.write_str(text),
            ASTNode::StringLiteral(s) => write_quoted(f, s),
            ASTNode::Nil => f.write_str("nil"),
            ASTNode::Group(inner) => write!(f, "({inner})"),
            ASTNode::Comparison {
                left,
                operator,
                right,
            } => write!(f, "{left} {operator} {right}"),
            ASTNode::LogicalOperation {
                left,
                operator,
                right,
            } => write!(f, "{left} {operator} {right}"),
            ASTNode::ArithmeticOperation {
                left,
                operator,
                right,
            } => write!(f, "{left} {operator} {right}"),
            ASTNode::UnaryOperation { operator, operand } => write!(f, "{operator}{operand}"),
            ASTNode::FunctionCall { name, args, .. } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}
