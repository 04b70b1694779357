//! Positional call-site arguments.
//!
//! The typed API takes [`Clause`](crate::Clause) and
//! [`Aggregation`](crate::Aggregation) values directly. Callers that assemble
//! arguments dynamically can use the positional form instead: a list of
//! [`Arg`] values, usually written with the [`args!`](crate::args) macro,
//! which the `*_args` builder methods resolve once into a typed value.
//!
//! ```
//! use bodybuilder::{args, Arg, BodyBuilder};
//! use serde_json::json;
//!
//! let body = BodyBuilder::new()
//!     .filter_args(args![
//!         "constant_score",
//!         Arg::nested(|b| b.filter(("term", "user", "kimchy")))
//!     ])
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     body["query"]["bool"]["filter"],
//!     json!({ "constant_score": { "filter": { "term": { "user": "kimchy" } } } })
//! );
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::builder::BodyBuilder;
use crate::config::BuilderConfig;

type NestedFn = dyn Fn(BodyBuilder) -> BodyBuilder + Send + Sync;

/// A nested-builder callback.
///
/// The callback receives a fresh, empty builder and returns it populated.
/// The parent extracts the relevant sub-document from the result.
#[derive(Clone)]
pub struct Nested(Arc<NestedFn>);

impl Nested {
    /// Wraps a callback.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(BodyBuilder) -> BodyBuilder + Send + Sync + 'static,
    {
        Nested(Arc::new(f))
    }

    /// Runs the callback against a fresh builder sharing `config`.
    pub(crate) fn apply(&self, config: &BuilderConfig) -> BodyBuilder {
        (self.0)(BodyBuilder::with_config(config.clone()))
    }
}

impl fmt::Debug for Nested {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Nested(..)")
    }
}

/// A single positional argument.
#[derive(Debug, Clone)]
pub enum Arg {
    /// A bare string: a type tag, field name, value, or aggregation name
    /// depending on position.
    Str(String),
    /// Any other JSON value.
    Value(Value),
    /// A mapping: an option bag, or a structured value in the value slot.
    Options(Map<String, Value>),
    /// A nested-builder callback. Only valid as the last argument.
    Nested(Nested),
}

impl Arg {
    /// Wraps a nested-builder callback.
    pub fn nested<F>(f: F) -> Self
    where
        F: Fn(BodyBuilder) -> BodyBuilder + Send + Sync + 'static,
    {
        Arg::Nested(Nested::new(f))
    }

    /// Returns `true` if this is a mapping.
    pub fn is_options(&self) -> bool {
        matches!(self, Arg::Options(_))
    }

    /// Returns `true` if this is a nested callback.
    pub fn is_nested(&self) -> bool {
        matches!(self, Arg::Nested(_))
    }

    /// Converts to a JSON value. Callbacks have no JSON form.
    pub(crate) fn into_value(self) -> Option<Value> {
        match self {
            Arg::Str(s) => Some(Value::String(s)),
            Arg::Value(v) => Some(v),
            Arg::Options(map) => Some(Value::Object(map)),
            Arg::Nested(_) => None,
        }
    }
}

/// Splits off a trailing callback.
pub(crate) fn split_nested(mut args: Vec<Arg>) -> (Vec<Arg>, Option<Nested>) {
    if args.last().is_some_and(Arg::is_nested) {
        if let Some(Arg::Nested(nested)) = args.pop() {
            return (args, Some(nested));
        }
    }
    (args, None)
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Arg::Str(s.clone())
    }
}

impl From<Map<String, Value>> for Arg {
    fn from(map: Map<String, Value>) -> Self {
        Arg::Options(map)
    }
}

impl From<Nested> for Arg {
    fn from(nested: Nested) -> Self {
        Arg::Nested(nested)
    }
}

/// Strings and objects are sorted into their dedicated variants so that
/// `json!` literals behave like their native counterparts.
impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Arg::Str(s),
            Value::Object(map) => Arg::Options(map),
            other => Arg::Value(other),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(v: $t) -> Self {
                    Arg::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_from_scalar!(bool, i32, i64, u32, u64, f64);

/// Builds a `Vec<Arg>` from heterogeneous expressions.
///
/// Each expression is converted with `Arg::from`.
///
/// ```
/// use bodybuilder::{args, Arg};
///
/// let list = args!["range", "age", serde_json::json!({ "gte": 18 })];
/// assert_eq!(list.len(), 3);
/// assert!(list[2].is_options());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),+]
    };
}
