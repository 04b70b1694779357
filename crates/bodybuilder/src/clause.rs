//! Clause types for query and filter conditions.
//!
//! A [`Clause`] renders to `{type: {field: value, ...options}}`. A clause may
//! carry a nested builder whose query or filter is spliced into the body.

use serde_json::{Map, Value};

use crate::args::{split_nested, Arg, Nested};
use crate::builder::BodyBuilder;
use crate::config::BuilderConfig;
use crate::error::{BuilderError, Result};

/// Field name used when a value is given without one.
pub const DEFAULT_FIELD: &str = "field";

/// A single query or filter condition.
///
/// # Example
///
/// ```
/// use bodybuilder::{BuilderConfig, Clause};
/// use serde_json::json;
///
/// let clause = Clause::on("geo_distance", "point", json!({ "lat": 40, "lon": 20 }))
///     .option("distance", "12km");
///
/// assert_eq!(
///     clause.render(&BuilderConfig::default()).unwrap(),
///     json!({
///         "geo_distance": {
///             "point": { "lat": 40, "lon": 20 },
///             "distance": "12km"
///         }
///     })
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Clause {
    /// The clause type tag, e.g. `term`, `match`, `range`.
    pub kind: String,
    /// Field name. Falls back to [`DEFAULT_FIELD`] when a value is present.
    pub field: Option<String>,
    /// The value compared against the field.
    pub value: Option<Value>,
    /// Entries merged into the clause body next to the field.
    pub options: Map<String, Value>,
    /// Callback producing a sub-query or sub-filter.
    pub nested: Option<Nested>,
}

impl Clause {
    /// Creates a clause with only a type: `{type: {}}`.
    pub fn new(kind: impl Into<String>) -> Self {
        Clause {
            kind: kind.into(),
            field: None,
            value: None,
            options: Map::new(),
            nested: None,
        }
    }

    /// Creates a clause whose value sits under the default field name.
    pub fn with_value(kind: impl Into<String>, value: impl Into<Value>) -> Self {
        Clause {
            value: Some(value.into()),
            ..Clause::new(kind)
        }
    }

    /// Creates a clause comparing `field` against `value`.
    pub fn on(kind: impl Into<String>, field: impl Into<String>, value: impl Into<Value>) -> Self {
        Clause {
            field: Some(field.into()),
            value: Some(value.into()),
            ..Clause::new(kind)
        }
    }

    /// Adds one option to the clause body.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Merges an option bag into the clause body.
    pub fn options(mut self, options: Map<String, Value>) -> Self {
        self.options.extend(options);
        self
    }

    /// Attaches a nested builder.
    ///
    /// If the nested builder records any filter, its filter is spliced under
    /// `filter`; otherwise its query is spliced under `query`.
    pub fn nested<F>(mut self, f: F) -> Self
    where
        F: Fn(BodyBuilder) -> BodyBuilder + Send + Sync + 'static,
    {
        self.nested = Some(Nested::new(f));
        self
    }

    /// Resolves a positional argument list.
    ///
    /// Accepted shapes, after removing a trailing callback:
    ///
    /// ```text
    /// (type)
    /// (type, value)                   value under "field"
    /// (type, options)                 options merged into the body
    /// (type, field, value)
    /// (type, field, value, options)
    /// ```
    pub fn from_args(method: &'static str, args: Vec<Arg>) -> Result<Self> {
        let (args, nested) = split_nested(args);
        let count = args.len();

        if count == 0 {
            return Err(BuilderError::TooFewArguments {
                method,
                min: 1,
                actual: 0,
            });
        }
        if count > 4 {
            return Err(BuilderError::TooManyArguments {
                method,
                max: 4,
                actual: count,
            });
        }

        let mut iter = args.into_iter();
        let mut clause = match iter.next() {
            Some(Arg::Str(kind)) => Clause::new(kind),
            _ => {
                return Err(BuilderError::InvalidArgument {
                    method,
                    position: 0,
                    expected: "a clause type string",
                })
            }
        };

        match (iter.next(), iter.next(), iter.next()) {
            (None, _, _) => {}
            (Some(Arg::Options(options)), None, _) => clause.options = options,
            (Some(value), None, _) => clause.value = Some(value_at(method, 1, value)?),
            (Some(field), Some(value), rest) => {
                clause.field = match field {
                    Arg::Str(field) => Some(field),
                    _ => {
                        return Err(BuilderError::InvalidArgument {
                            method,
                            position: 1,
                            expected: "a field name string",
                        })
                    }
                };
                clause.value = Some(value_at(method, 2, value)?);
                match rest {
                    None => {}
                    Some(Arg::Options(options)) => clause.options = options,
                    Some(_) => {
                        return Err(BuilderError::InvalidArgument {
                            method,
                            position: 3,
                            expected: "an options mapping",
                        })
                    }
                }
            }
        }

        clause.nested = nested;
        Ok(clause)
    }

    /// Renders the clause, invoking its nested builder if any.
    pub fn render(&self, config: &BuilderConfig) -> Result<Value> {
        let mut body = Map::new();

        if let Some(value) = &self.value {
            let field = self.field.as_deref().unwrap_or(DEFAULT_FIELD);
            body.insert(field.to_string(), value.clone());
        }
        for (key, value) in &self.options {
            body.insert(key.clone(), value.clone());
        }

        if let Some(nested) = &self.nested {
            let sub = nested.apply(config);
            if sub.has_filters() {
                if let Some(filter) = sub.get_filter()? {
                    log::trace!("splicing nested filter into '{}'", self.kind);
                    body.insert("filter".to_string(), filter);
                }
            } else if let Some(query) = sub.get_query()? {
                log::trace!("splicing nested query into '{}'", self.kind);
                body.insert("query".to_string(), query);
            }
        }

        let mut clause = Map::new();
        clause.insert(self.kind.clone(), Value::Object(body));
        Ok(Value::Object(clause))
    }
}

fn value_at(method: &'static str, position: usize, arg: Arg) -> Result<Value> {
    arg.into_value().ok_or(BuilderError::InvalidArgument {
        method,
        position,
        expected: "a value",
    })
}

// Conversions from call-site shapes to Clause

impl From<&str> for Clause {
    fn from(kind: &str) -> Self {
        Clause::new(kind)
    }
}

impl From<String> for Clause {
    fn from(kind: String) -> Self {
        Clause::new(kind)
    }
}

/// `(type, value)`. An object in the value slot is merged as the option bag.
impl<V: Into<Value>> From<(&str, V)> for Clause {
    fn from((kind, value): (&str, V)) -> Self {
        match value.into() {
            Value::Object(options) => Clause::new(kind).options(options),
            value => Clause::with_value(kind, value),
        }
    }
}

impl<V: Into<Value>> From<(&str, &str, V)> for Clause {
    fn from((kind, field, value): (&str, &str, V)) -> Self {
        Clause::on(kind, field, value)
    }
}

impl<V: Into<Value>> From<(&str, &str, V, Map<String, Value>)> for Clause {
    fn from((kind, field, value, options): (&str, &str, V, Map<String, Value>)) -> Self {
        Clause::on(kind, field, value).options(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use serde_json::json;

    fn render(clause: impl Into<Clause>) -> Value {
        clause.into().render(&BuilderConfig::default()).unwrap()
    }

    fn options(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn type_only() {
        assert_eq!(render("match_all"), json!({ "match_all": {} }));
    }

    #[test]
    fn value_uses_default_field() {
        assert_eq!(render(("exists", "user")), json!({ "exists": { "field": "user" } }));
    }

    #[test]
    fn field_and_value() {
        assert_eq!(
            render(("term", "user", "kimchy")),
            json!({ "term": { "user": "kimchy" } })
        );
    }

    #[test]
    fn object_value_is_option_bag() {
        assert_eq!(
            render(("match_all", json!({ "boost": 1.2 }))),
            json!({ "match_all": { "boost": 1.2 } })
        );
    }

    #[test]
    fn object_value_with_field_stays_value() {
        assert_eq!(
            render(("range", "age", json!({ "gte": 18 }))),
            json!({ "range": { "age": { "gte": 18 } } })
        );
    }

    #[test]
    fn options_merge_beside_field() {
        let clause = (
            "geo_distance",
            "point",
            json!({ "lat": 40, "lon": 20 }),
            options(json!({ "distance": "12km" })),
        );
        assert_eq!(
            render(clause),
            json!({
                "geo_distance": {
                    "point": { "lat": 40, "lon": 20 },
                    "distance": "12km"
                }
            })
        );
    }

    #[test]
    fn nested_query() {
        let clause = Clause::new("nested")
            .option("path", "comments")
            .nested(|b| b.query(("match", "comments.author", "john")));
        assert_eq!(
            render(clause),
            json!({
                "nested": {
                    "path": "comments",
                    "query": { "match": { "comments.author": "john" } }
                }
            })
        );
    }

    #[test]
    fn nested_filter_wins_over_query() {
        let clause = Clause::new("constant_score")
            .nested(|b| b.query("match_all").filter(("term", "user", "kimchy")));
        assert_eq!(
            render(clause),
            json!({ "constant_score": { "filter": { "term": { "user": "kimchy" } } } })
        );
    }

    #[test]
    fn empty_nested_adds_nothing() {
        let clause = Clause::new("constant_score").nested(|b| b);
        assert_eq!(render(clause), json!({ "constant_score": {} }));
    }

    #[test]
    fn from_args_shapes() {
        let clause = Clause::from_args("query", args!["match_all"]).unwrap();
        assert_eq!(render(clause), json!({ "match_all": {} }));

        let clause = Clause::from_args("query", args!["exists", "user"]).unwrap();
        assert_eq!(render(clause), json!({ "exists": { "field": "user" } }));

        let clause = Clause::from_args("query", args!["match_all", json!({ "boost": 2 })]).unwrap();
        assert_eq!(render(clause), json!({ "match_all": { "boost": 2 } }));

        let clause = Clause::from_args("query", args!["term", "age", 30]).unwrap();
        assert_eq!(render(clause), json!({ "term": { "age": 30 } }));

        let clause = Clause::from_args(
            "query",
            args!["geo_distance", "point", json!([1, 2]), json!({ "distance": "1km" })],
        )
        .unwrap();
        assert_eq!(
            render(clause),
            json!({ "geo_distance": { "point": [1, 2], "distance": "1km" } })
        );
    }

    #[test]
    fn from_args_nested() {
        let clause = Clause::from_args(
            "filter",
            args!["constant_score", Arg::nested(|b| b.filter(("term", "field", "value")))],
        )
        .unwrap();
        assert!(clause.nested.is_some());
        assert_eq!(
            render(clause),
            json!({ "constant_score": { "filter": { "term": { "field": "value" } } } })
        );
    }

    #[test]
    fn from_args_too_many() {
        let err = Clause::from_args("query", args!["a", "b", "c", json!({}), "e"]).unwrap_err();
        assert!(matches!(
            err,
            BuilderError::TooManyArguments { method: "query", max: 4, actual: 5 }
        ));
    }

    #[test]
    fn from_args_empty() {
        let err = Clause::from_args("filter", args![]).unwrap_err();
        assert!(matches!(err, BuilderError::TooFewArguments { actual: 0, .. }));
    }

    #[test]
    fn from_args_bad_shapes() {
        let err = Clause::from_args("query", args![1, "user"]).unwrap_err();
        assert!(matches!(err, BuilderError::InvalidArgument { position: 0, .. }));

        let err = Clause::from_args("query", args!["term", 1, "x"]).unwrap_err();
        assert!(matches!(err, BuilderError::InvalidArgument { position: 1, .. }));

        let err = Clause::from_args("query", args!["term", "a", "b", "c"]).unwrap_err();
        assert!(matches!(err, BuilderError::InvalidArgument { position: 3, .. }));
    }
}
