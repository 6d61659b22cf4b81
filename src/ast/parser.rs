use crate::ast::{
    ASTNode, ArithmeticOperator, ComparisonOperator, LogicalOperator, UnaryOperator, Value,
};
use crate::error::ParseError;
use crate::functions::FunctionRegistry;
use log::{debug, trace};
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;
use std::borrow::Cow;

/// `if` is a keyword of the grammar, so `if(` calls are renamed before tokenizing.
const RESERVED_IF: &str = "__if";

#[derive(Parser)]
#[grammar = "ast/expression.pest"]
pub struct ExpressionParser;

impl ExpressionParser {
    /// Parses `input` resolving calls against the process-wide function registry.
    pub fn parse_expression(input: &str) -> Result<ASTNode, ParseError> {
        Self::parse_with_registry(input, FunctionRegistry::global())
    }

    pub fn parse_with_registry(
        input: &str,
        registry: &FunctionRegistry,
    ) -> Result<ASTNode, ParseError> {
        debug!("Parsing expression: {}", input);
        let rewritten = rewrite_reserved_calls(input);
        trace!("Rewritten expression: {}", rewritten);

        let parse_result = ExpressionParser::parse(Rule::expression, &rewritten)
            .map_err(|e| ParseError::Syntax(e.to_string()))?
            .next()
            .ok_or_else(|| ParseError::Malformed("empty parse result".to_string()))?;

        let builder = TreeBuilder { registry };
        let ast = builder.build_expression(parse_result)?;
        debug!("Parsed AST: {}", ast);
        Ok(ast)
    }
}

struct TreeBuilder<'r> {
    registry: &'r FunctionRegistry,
}

impl TreeBuilder<'_> {
    fn build_expression(&self, pair: Pair<Rule>) -> Result<ASTNode, ParseError> {
        let mut pairs = pair.into_inner();
        self.build_node(next_pair(&mut pairs, "expression")?)
    }

    fn build_node(&self, pair: Pair<Rule>) -> Result<ASTNode, ParseError> {
        match pair.as_rule() {
            Rule::or_expression
            | Rule::and_expression
            | Rule::comparison_expression
            | Rule::additive_expression
            | Rule::multiplicative_expression => self.build_binary_chain(pair),
            Rule::unary_expression => self.build_unary_expression(pair),
            Rule::group => {
                let mut pairs = pair.into_inner();
                let inner = self.build_node(next_pair(&mut pairs, "grouped expression")?)?;
                Ok(ASTNode::Group(Box::new(inner)))
            }
            Rule::function_call => self.build_function_call(pair),
            Rule::number => {
                let text = pair.as_str();
                let value = text
                    .parse::<f64>()
                    .map_err(|e| ParseError::Malformed(format!("invalid number `{text}`: {e}")))?;
                Ok(ASTNode::Number {
                    value,
                    text: text.to_string(),
                })
            }
            Rule::string | Rule::char_literal => {
                let mut pairs = pair.into_inner();
                let inner = next_pair(&mut pairs, "quoted literal")?;
                Ok(ASTNode::StringLiteral(unescape(inner.as_str())))
            }
            Rule::raw_string => {
                let mut pairs = pair.into_inner();
                let inner = next_pair(&mut pairs, "raw string literal")?;
                Ok(ASTNode::StringLiteral(inner.as_str().to_string()))
            }
            Rule::identifier => match pair.as_str() {
                "nil" => Ok(ASTNode::Nil),
                name => Ok(ASTNode::identifier(name)),
            },
            rule => Err(ParseError::Malformed(format!(
                "unexpected rule: {:?}",
                rule
            ))),
        }
    }

    /// Folds `operand (operator operand)*` left-associatively into binary nodes.
    fn build_binary_chain(&self, pair: Pair<Rule>) -> Result<ASTNode, ParseError> {
        let rule = pair.as_rule();
        let mut pairs = pair.into_inner();
        let mut node = self.build_node(next_pair(&mut pairs, "left operand")?)?;

        while let Some(operator_pair) = pairs.next() {
            let right = self.build_node(next_pair(&mut pairs, "right operand")?)?;
            trace!("{:?}: applying `{}`", rule, operator_pair.as_str());
            node = build_binary(node, operator_pair.as_str(), right)?;
        }

        Ok(node)
    }

    fn build_unary_expression(&self, pair: Pair<Rule>) -> Result<ASTNode, ParseError> {
        let mut pairs = pair.into_inner();
        let first = next_pair(&mut pairs, "unary operand")?;
        if first.as_rule() != Rule::unary_operator {
            return self.build_node(first);
        }

        let operator = UnaryOperator::try_from(first.as_str())?;
        let operand = self.build_node(next_pair(&mut pairs, "unary operand")?)?;
        Ok(ASTNode::unary(operator, operand))
    }

    fn build_function_call(&self, pair: Pair<Rule>) -> Result<ASTNode, ParseError> {
        let mut pairs = pair.into_inner();
        let name = match next_pair(&mut pairs, "function name")?.as_str() {
            RESERVED_IF => "if",
            name => name,
        };

        let args = match pairs.next() {
            Some(arguments) => arguments
                .into_inner()
                .map(|arg| self.build_node(arg))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        let function = self.registry.resolve(name, args.len())?;
        Ok(ASTNode::FunctionCall {
            name: name.to_string(),
            args,
            function,
        })
    }
}

/// Builds a binary node for `operator`, applying chain rewriting and constant folding.
fn build_binary(left: ASTNode, operator: &str, right: ASTNode) -> Result<ASTNode, ParseError> {
    if let Ok(operator) = ComparisonOperator::try_from(operator) {
        return Ok(build_comparison(left, operator, right));
    }
    if let Ok(operator) = LogicalOperator::try_from(operator) {
        return Ok(ASTNode::LogicalOperation {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        });
    }
    if let Ok(operator) = ArithmeticOperator::try_from(operator) {
        return Ok(build_arithmetic(left, operator, right));
    }
    Err(ParseError::InvalidOperator(operator.to_string()))
}

/// `a < b < c` becomes `a < b && b < c`.
fn build_comparison(left: ASTNode, operator: ComparisonOperator, right: ASTNode) -> ASTNode {
    let Some(tail) = chain_tail(&left).cloned() else {
        return ASTNode::Comparison {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        };
    };

    debug!("Rewriting chained comparison: {} {} {}", left, operator, right);
    let link = ASTNode::Comparison {
        left: Box::new(tail),
        operator,
        right: Box::new(right),
    };
    ASTNode::LogicalOperation {
        left: Box::new(left),
        operator: LogicalOperator::And,
        right: Box::new(link),
    }
}

/// The operand a further comparison chains onto.
///
/// A logical node can only be the direct left operand of a comparison when an
/// earlier chain rewrite produced it, since `&&` binds looser than comparisons.
fn chain_tail(node: &ASTNode) -> Option<&ASTNode> {
    match node {
        ASTNode::Comparison { right, .. } => Some(&**right),
        ASTNode::LogicalOperation {
            operator: LogicalOperator::And,
            right,
            ..
        } => match right.as_ref() {
            ASTNode::Comparison { right, .. } => Some(&**right),
            _ => None,
        },
        _ => None,
    }
}

fn build_arithmetic(left: ASTNode, operator: ArithmeticOperator, right: ASTNode) -> ASTNode {
    if let (ASTNode::Number { value: l, .. }, ASTNode::Number { value: r, .. }) = (&left, &right) {
        match operator.apply(&Value::Number(*l), &Value::Number(*r)) {
            Ok(folded) if folded.is_finite() => {
                debug!("Folding constant: {} {} {} => {}", left, operator, right, folded);
                return ASTNode::number(folded);
            }
            Ok(folded) => debug!("Not folding {} {} {}: {}", left, operator, right, folded),
            Err(e) => debug!("Not folding {} {} {}: {}", left, operator, right, e),
        }
    }

    ASTNode::ArithmeticOperation {
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }
}

fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>, expected: &str) -> Result<Pair<'i, Rule>, ParseError> {
    pairs
        .next()
        .ok_or_else(|| ParseError::Malformed(format!("expected {expected}")))
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Renames `if(` calls to the reserved name, skipping string literals and longer identifiers.
fn rewrite_reserved_calls(input: &str) -> Cow<'_, str> {
    if !input.contains("if(") {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + RESERVED_IF.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut prev: Option<char> = None;
    let mut chars = input.char_indices();

    while let Some((i, c)) = chars.next() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' && q != '`' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None if matches!(c, '"' | '\'' | '`') => quote = Some(c),
            None if input[i..].starts_with("if(") && !prev.is_some_and(is_identifier_char) => {
                out.push_str(RESERVED_IF);
                // skip the `f`
                chars.next();
                prev = Some('f');
                continue;
            }
            None => {}
        }
        out.push(c);
        prev = Some(c);
    }

    Cow::Owned(out)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(c @ ('\\' | '"' | '\'')) => out.push(c),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
