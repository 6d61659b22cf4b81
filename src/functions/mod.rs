pub mod control;
pub mod numeric;
pub mod pattern_cache;
pub mod text;

use crate::ast::Value;
use crate::error::{EvalError, ParseError};
use log::debug;
use pattern_cache::{PatternCache, DEFAULT_PATTERN_CACHE_CAPACITY};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

pub type Function = Arc<dyn Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync>;

static DEFAULT_REGISTRY: LazyLock<FunctionRegistry> = LazyLock::new(FunctionRegistry::with_builtins);

/// How many arguments a function accepts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Variadic,
}

/// A function resolved at parse time and embedded in the call node.
#[derive(Clone)]
pub struct Callable {
    name: String,
    function: Function,
}

impl Callable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        (self.function)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.name)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.function, &other.function)
    }
}

struct Entry {
    arity: Arity,
    function: Function,
}

/// Name to implementation table consulted by the parser for every call expression.
pub struct FunctionRegistry {
    functions: HashMap<String, Entry>,
    pattern_cache: Arc<PatternCache>,
}

impl FunctionRegistry {
    /// A registry with no functions at all, not even the built-ins.
    ///
    /// [`FunctionRegistry::default`] is the one with every built-in registered.
    pub fn empty() -> Self {
        Self::with_cache(Arc::new(PatternCache::default()))
    }

    fn with_cache(pattern_cache: Arc<PatternCache>) -> Self {
        Self {
            functions: HashMap::new(),
            pattern_cache,
        }
    }

    /// A registry with every built-in function registered.
    pub fn with_builtins() -> Self {
        Self::with_pattern_cache_capacity(DEFAULT_PATTERN_CACHE_CAPACITY)
    }

    /// Like [`FunctionRegistry::with_builtins`], with a custom pattern cache size.
    pub fn with_pattern_cache_capacity(capacity: usize) -> Self {
        let mut registry = Self::with_cache(Arc::new(PatternCache::new(capacity)));
        register_functions(&mut registry);
        registry
    }

    /// The process-wide registry used by `Parser::parse_expression`.
    pub fn global() -> &'static FunctionRegistry {
        &DEFAULT_REGISTRY
    }

    /// Registers a function, replacing any previous entry with the same name.
    pub fn register_function<F>(&mut self, name: &str, arity: Arity, function: F)
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        self.functions.insert(
            name.to_string(),
            Entry {
                arity,
                function: Arc::new(function),
            },
        );
    }

    /// Looks a function up by name and checks the argument count against its arity.
    pub fn resolve(&self, name: &str, arg_count: usize) -> Result<Callable, ParseError> {
        let entry = self
            .functions
            .get(name)
            .ok_or_else(|| ParseError::UnknownFunction(name.to_string()))?;

        if let Arity::Exact(expected) = entry.arity {
            if expected != arg_count {
                return Err(ParseError::ArgumentCount {
                    name: name.to_string(),
                    expected,
                    given: arg_count,
                });
            }
        }

        debug!("Resolved function {name}() with {arg_count} args");
        Ok(Callable {
            name: name.to_string(),
            function: Arc::clone(&entry.function),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn pattern_cache(&self) -> &Arc<PatternCache> {
        &self.pattern_cache
    }
}

/// Same as [`FunctionRegistry::with_builtins`].
impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.functions.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .field("pattern_cache", &self.pattern_cache)
            .finish()
    }
}

pub fn register_functions(registry: &mut FunctionRegistry) {
    numeric::register(registry);
    control::register(registry);
    text::register(registry);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_registered() {
        let registry = FunctionRegistry::with_builtins();
        for name in [
            "rate",
            "coalesce",
            "as_numeric",
            "as_string",
            "if",
            "string_contains",
            "regexp_match",
        ] {
            assert!(registry.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_empty_and_default_registries() {
        let empty = FunctionRegistry::empty();
        assert!(!empty.contains("if"));
        assert_eq!(
            empty.resolve("rate", 2).unwrap_err(),
            ParseError::UnknownFunction("rate".to_string())
        );
        assert!(FunctionRegistry::default().contains("if"));
        assert!(FunctionRegistry::default().contains("regexp_match"));
    }

    #[test]
    fn test_resolve_checks_arity() {
        let registry = FunctionRegistry::with_builtins();
        assert!(registry.resolve("rate", 2).is_ok());
        assert_eq!(
            registry.resolve("rate", 3).unwrap_err(),
            ParseError::ArgumentCount {
                name: "rate".to_string(),
                expected: 2,
                given: 3
            }
        );
        assert_eq!(
            registry.resolve("as_numeric", 0).unwrap_err().to_string(),
            "as_numeric() func is expected 1 args, but given 0 args"
        );
    }

    #[test]
    fn test_coalesce_accepts_any_count() {
        let registry = FunctionRegistry::with_builtins();
        assert!(registry.resolve("coalesce", 0).is_ok());
        assert!(registry.resolve("coalesce", 5).is_ok());
    }

    #[test]
    fn test_unknown_function() {
        let registry = FunctionRegistry::with_builtins();
        assert_eq!(
            registry.resolve("sum", 1).unwrap_err(),
            ParseError::UnknownFunction("sum".to_string())
        );
    }

    #[test]
    fn test_register_custom_function() {
        let mut registry = FunctionRegistry::empty();
        assert!(!registry.contains("rate"));
        registry.register_function("double", Arity::Exact(1), |args| {
            match args {
                [Value::Number(n)] => Ok(Value::Number(n * 2.0)),
                _ => Err(EvalError::call_mismatch("double", args)),
            }
        });

        let double = registry.resolve("double", 1).unwrap();
        assert_eq!(double.name(), "double");
        assert_eq!(double.call(&[Value::Number(4.0)]).unwrap(), Value::Number(8.0));
        assert!(double.call(&[Value::Nil]).is_err());
    }

    #[test]
    fn test_resolved_callables_compare_by_identity() {
        let registry = FunctionRegistry::with_builtins();
        let a = registry.resolve("as_string", 1).unwrap();
        let b = registry.resolve("as_string", 1).unwrap();
        let c = FunctionRegistry::with_builtins()
            .resolve("as_string", 1)
            .unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
