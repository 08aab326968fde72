// ============================================================================
// src/sort/comparator.rs - Comparator sources for associative sorting
// ============================================================================

use crate::core::{BagError, Key, Result, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A user function answering a three-way comparison with a number:
/// negative, zero or positive.
pub type UserFn = Rc<dyn Fn(&Value, &Value) -> Result<Value>>;

/// A comparator that already speaks `Ordering`.
pub type OrderingFn = Rc<dyn Fn(&Value, &Value) -> Result<Ordering>>;

// ============================================================================
// FUNCTION TABLE - named user functions
// ============================================================================

/// Named functions a comparator can refer to.
#[derive(Clone, Default)]
pub struct FunctionTable {
    functions: HashMap<String, UserFn>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function under `name`, replacing any previous definition
    pub fn register<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&Value, &Value) -> Result<Value> + 'static,
    {
        self.functions.insert(name.to_string(), Rc::new(function));
    }

    pub fn lookup(&self, name: &str) -> Option<UserFn> {
        self.functions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.functions.keys().map(String::as_str).collect()
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTable")
            .field("functions", &self.names())
            .finish()
    }
}

// ============================================================================
// COMPARATOR
// ============================================================================

/// Where the ordering comes from.
#[derive(Clone)]
pub enum Comparator {
    /// `Value::compare` for values, `Key::compare` for keys
    Builtin,
    /// A user function returning a signed number
    User(UserFn),
    /// A Rust closure returning `Ordering`
    Native(OrderingFn),
    /// A function looked up by name; `None` when the name was undefined
    Named { name: String, function: Option<UserFn> },
}

impl Comparator {
    pub fn from_fn<F>(function: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Value> + 'static,
    {
        Self::User(Rc::new(function))
    }

    pub fn from_ordering<F>(function: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Ordering> + 'static,
    {
        Self::Native(Rc::new(function))
    }

    /// Resolve `name` in `table`. An undefined name is not an error here:
    /// the sort that tries to invoke it fails instead.
    pub fn named(table: &FunctionTable, name: &str) -> Self {
        Self::Named {
            name: name.to_string(),
            function: table.lookup(name),
        }
    }

    /// Fails with `ComparatorInvocation` when there is nothing to call.
    pub fn ensure_invocable(&self) -> Result<()> {
        match self {
            Self::Named { name, function: None } => Err(BagError::ComparatorInvocation(format!(
                "function '{}' is not defined",
                name
            ))),
            _ => Ok(()),
        }
    }

    /// Compare two values
    pub fn compare(&self, a: &Value, b: &Value) -> Result<Ordering> {
        match self {
            Self::Builtin => a.compare(b),
            Self::User(function) => ordering_from_result(&function(a, b)?),
            Self::Native(function) => function(a, b),
            Self::Named {
                function: Some(function),
                ..
            } => ordering_from_result(&function(a, b)?),
            Self::Named { .. } => self.ensure_invocable().map(|_| Ordering::Equal),
        }
    }

    /// Compare two keys
    pub fn compare_keys(&self, a: &Key, b: &Key) -> Result<Ordering> {
        match self {
            Self::Builtin => Ok(a.compare(b)),
            _ => self.compare(&Value::from(a), &Value::from(b)),
        }
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => write!(f, "Builtin"),
            Self::User(_) => write!(f, "User(<fn>)"),
            Self::Native(_) => write!(f, "Native(<fn>)"),
            Self::Named { name, function } => f
                .debug_struct("Named")
                .field("name", name)
                .field("defined", &function.is_some())
                .finish(),
        }
    }
}

/// Interpret a user comparator's return value as a three-way result.
pub fn ordering_from_result(result: &Value) -> Result<Ordering> {
    let sign = match result {
        Value::Null => 0.0,
        Value::Boolean(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Integer(i) => *i as f64,
        Value::Float(f) if f.is_nan() => 0.0,
        Value::Float(f) => *f,
        Value::Text(s) => s.trim().parse::<f64>().map_err(|_| {
            BagError::TypeMismatch(format!(
                "comparator returned non-numeric string '{}'",
                s
            ))
        })?,
        other => {
            return Err(BagError::TypeMismatch(format!(
                "comparator returned {}, expected a number",
                other.type_name()
            )));
        }
    };
    Ok(sign.partial_cmp(&0.0).unwrap_or(Ordering::Equal))
}
