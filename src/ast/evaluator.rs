use crate::ast::{ASTNode, Parser, Value, Variables};
use crate::error::{EvalError, ParseError};
use crate::functions::FunctionRegistry;
use log::debug;
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;

/// A compiled expression, ready to be evaluated against many variable sets.
///
/// The tree is immutable once built, so a single `Evaluator` can be shared
/// across threads. Strict mode has to be configured before sharing.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluator {
    root: ASTNode,
}

impl Evaluator {
    /// Parses `expression` with the built-in functions.
    pub fn new(expression: &str) -> Result<Self, ParseError> {
        Parser::parse_expression(expression).map(Self::from_ast)
    }

    pub fn with_registry(expression: &str, registry: &FunctionRegistry) -> Result<Self, ParseError> {
        Parser::parse_with_registry(expression, registry).map(Self::from_ast)
    }

    pub fn from_ast(root: ASTNode) -> Self {
        Self { root }
    }

    pub fn ast(&self) -> &ASTNode {
        &self.root
    }

    pub fn into_ast(self) -> ASTNode {
        self.root
    }

    /// Evaluates the expression against one set of variables.
    pub fn eval(&self, variables: &Variables) -> Result<Value, EvalError> {
        self.root.evaluate(variables)
    }

    /// Evaluates the expression against every variable set in parallel.
    ///
    /// Results are returned in input order.
    pub fn eval_batch(&self, batch: &[Variables]) -> Vec<Result<Value, EvalError>> {
        debug!("Evaluating `{}` against {} variable sets", self.root, batch.len());
        batch
            .par_iter()
            .map(|variables| self.root.evaluate(variables))
            .collect()
    }

    /// Switches every variable lookup between strict and lenient.
    ///
    /// In strict mode a missing variable is an error instead of `nil`.
    /// Operands of `!` are always strict.
    pub fn set_strict(&mut self, strict: bool) {
        self.root.set_strict(strict);
    }

    /// A boolean view of the expression, if its root is a predicate.
    pub fn as_comparator(&self) -> Option<Comparator<'_>> {
        self.root
            .is_comparator()
            .then_some(Comparator { node: &self.root })
    }

    pub fn render(&self) -> String {
        self.root.to_string()
    }
}

impl FromStr for Evaluator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}

/// Evaluates a predicate expression straight to `bool`.
#[derive(Debug, Clone, Copy)]
pub struct Comparator<'a> {
    node: &'a ASTNode,
}

impl Comparator<'_> {
    pub fn compare(&self, variables: &Variables) -> Result<bool, EvalError> {
        self.node.compare(variables)
    }
}
