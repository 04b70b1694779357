//! Aggregation types.
//!
//! An [`Aggregation`] renders to `{name: {type: options, aggs?: {...}}}`.
//! When no explicit name is given the name is synthesized from the field as
//! `agg_{type}_{field}`.

use serde_json::{Map, Value};

use crate::args::{split_nested, Arg, Nested};
use crate::builder::BodyBuilder;
use crate::config::{AggregationMode, BuilderConfig};
use crate::error::{BuilderError, Result};

/// A named summarization node, optionally with sub-aggregations.
///
/// # Example
///
/// ```
/// use bodybuilder::BodyBuilder;
/// use serde_json::json;
///
/// let aggs = BodyBuilder::new()
///     .aggregation(("terms", "user"))
///     .get_aggregations()
///     .unwrap();
///
/// assert_eq!(aggs, Some(json!({ "agg_terms_user": { "terms": { "field": "user" } } })));
/// ```
#[derive(Debug, Clone)]
pub struct Aggregation {
    /// The aggregation type tag, e.g. `terms`, `avg`, `date_histogram`.
    pub kind: String,
    /// The option bag, including `field` when one applies.
    pub options: Map<String, Value>,
    /// Explicit name. Synthesized from the field when absent.
    pub name: Option<String>,
    /// Callback producing sub-aggregations.
    pub nested: Option<Nested>,
}

impl Aggregation {
    /// Creates an aggregation with an empty option bag.
    pub fn new(kind: impl Into<String>) -> Self {
        Aggregation {
            kind: kind.into(),
            options: Map::new(),
            name: None,
            nested: None,
        }
    }

    /// Creates an aggregation over `field`.
    pub fn on(kind: impl Into<String>, field: impl Into<String>) -> Self {
        Aggregation::new(kind).field(field)
    }

    /// Sets the `field` option.
    pub fn field(self, field: impl Into<String>) -> Self {
        self.option("field", field.into())
    }

    /// Sets an explicit name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds one option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Merges an option bag. Later entries overwrite earlier ones.
    pub fn options(mut self, options: Map<String, Value>) -> Self {
        self.options.extend(options);
        self
    }

    /// Attaches a nested builder whose aggregations go under `aggs`.
    pub fn nested<F>(mut self, f: F) -> Self
    where
        F: Fn(BodyBuilder) -> BodyBuilder + Send + Sync + 'static,
    {
        self.nested = Some(Nested::new(f));
        self
    }

    /// Resolves a positional argument list.
    ///
    /// The shape is `(type, [field | options], [options | name]..., [callback])`.
    /// Position 1 is a field when it is a string. Later strings are name
    /// candidates; the first one wins. Mappings anywhere after the type are
    /// merged into the option bag in order.
    pub fn from_args(args: Vec<Arg>) -> Result<Self> {
        const METHOD: &str = "aggregation";

        if args.len() < 2 {
            return Err(BuilderError::TooFewArguments {
                method: METHOD,
                min: 2,
                actual: args.len(),
            });
        }

        let (args, nested) = split_nested(args);
        let mut iter = args.into_iter().enumerate();
        let mut agg = match iter.next() {
            Some((_, Arg::Str(kind))) => Aggregation::new(kind),
            _ => {
                return Err(BuilderError::InvalidArgument {
                    method: METHOD,
                    position: 0,
                    expected: "an aggregation type string",
                })
            }
        };

        for (position, arg) in iter {
            match arg {
                Arg::Options(options) => agg = agg.options(options),
                Arg::Str(field) if position == 1 => agg = agg.field(field),
                Arg::Str(name) => {
                    if agg.name.is_none() {
                        agg.name = Some(name);
                    }
                }
                _ => {
                    return Err(BuilderError::InvalidArgument {
                        method: METHOD,
                        position,
                        expected: "a field, name, or options mapping",
                    })
                }
            }
        }

        agg.nested = nested;
        Ok(agg)
    }

    /// Returns the explicit name or synthesizes `agg_{type}_{field}`.
    pub fn resolved_name(&self) -> Result<String> {
        if let Some(name) = &self.name {
            return Ok(name.clone());
        }

        let field = match self.options.get("field") {
            Some(Value::String(field)) => field.clone(),
            Some(other) => other.to_string(),
            None => {
                return Err(BuilderError::MissingAggregationName {
                    agg_type: self.kind.clone(),
                })
            }
        };

        let name = format!("agg_{}_{}", self.kind, field);
        log::debug!("synthesized aggregation name '{}'", name);
        Ok(name)
    }

    /// Renders the aggregation as a `(name, node)` pair.
    pub fn render(&self, config: &BuilderConfig) -> Result<(String, Value)> {
        let name = self.resolved_name()?;

        let mut node = Map::new();
        node.insert(self.kind.clone(), Value::Object(self.options.clone()));

        if let Some(nested) = &self.nested {
            if let Some(aggs) = nested.apply(config).get_aggregations()? {
                log::trace!("splicing sub-aggregations into '{}'", name);
                node.insert("aggs".to_string(), aggs);
            }
        }

        Ok((name, Value::Object(node)))
    }
}

/// Renders all top-level aggregations into one mapping, in registration order.
///
/// A later aggregation with a duplicate name replaces the earlier one in
/// place. Returns `None` if there are no aggregations.
pub(crate) fn compose(aggs: &[Aggregation], config: &BuilderConfig) -> Result<Option<Value>> {
    if aggs.is_empty() {
        return Ok(None);
    }
    if config.aggregations == AggregationMode::Single && aggs.len() > 1 {
        return Err(BuilderError::UnsupportedMultipleAggregations { count: aggs.len() });
    }

    let mut out = Map::new();
    for agg in aggs {
        let (name, node) = agg.render(config)?;
        out.insert(name, node);
    }
    Ok(Some(Value::Object(out)))
}

// Conversions from call-site shapes to Aggregation

impl From<(&str, &str)> for Aggregation {
    fn from((kind, field): (&str, &str)) -> Self {
        Aggregation::on(kind, field)
    }
}

impl From<(&str, &str, &str)> for Aggregation {
    fn from((kind, field, name): (&str, &str, &str)) -> Self {
        Aggregation::on(kind, field).named(name)
    }
}

impl From<(&str, &str, Map<String, Value>)> for Aggregation {
    fn from((kind, field, options): (&str, &str, Map<String, Value>)) -> Self {
        Aggregation::on(kind, field).options(options)
    }
}

impl From<(&str, &str, Map<String, Value>, &str)> for Aggregation {
    fn from((kind, field, options, name): (&str, &str, Map<String, Value>, &str)) -> Self {
        Aggregation::on(kind, field).options(options).named(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use serde_json::json;

    fn render(agg: impl Into<Aggregation>) -> (String, Value) {
        agg.into().render(&BuilderConfig::default()).unwrap()
    }

    #[test]
    fn default_name() {
        let (name, node) = render(("terms", "user"));
        assert_eq!(name, "agg_terms_user");
        assert_eq!(node, json!({ "terms": { "field": "user" } }));
    }

    #[test]
    fn non_string_field_uses_json_text() {
        let (name, _) = render(Aggregation::new("terms").option("field", 5));
        assert_eq!(name, "agg_terms_5");
    }

    #[test]
    fn explicit_name() {
        let (name, _) = render(("terms", "user", "users"));
        assert_eq!(name, "users");
    }

    #[test]
    fn missing_name_without_field() {
        let err = Aggregation::new("filters")
            .option("filters", json!({}))
            .render(&BuilderConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            BuilderError::MissingAggregationName { ref agg_type } if agg_type == "filters"
        ));
    }

    #[test]
    fn options_merge_after_field() {
        let agg = Aggregation::on("date_histogram", "grades").option("interval", "day");
        let (_, node) = render(agg);
        assert_eq!(
            node,
            json!({ "date_histogram": { "field": "grades", "interval": "day" } })
        );
    }

    #[test]
    fn nested_sub_aggregations() {
        let agg = Aggregation::on("terms", "code").nested(|b| {
            b.aggregation(
                Aggregation::on("terms", "location").nested(|b| b.aggregation(("avg", "price"))),
            )
        });
        let (name, node) = render(agg);
        assert_eq!(name, "agg_terms_code");
        assert_eq!(
            node,
            json!({
                "terms": { "field": "code" },
                "aggs": {
                    "agg_terms_location": {
                        "terms": { "field": "location" },
                        "aggs": {
                            "agg_avg_price": { "avg": { "field": "price" } }
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn from_args_field_options_and_name() {
        let agg = Aggregation::from_args(args![
            "date_histogram",
            "grade",
            json!({ "interval": "day" }),
            "histogram",
            "ignored"
        ])
        .unwrap();
        assert_eq!(agg.name.as_deref(), Some("histogram"));
        assert_eq!(
            Value::Object(agg.options),
            json!({ "field": "grade", "interval": "day" })
        );
    }

    #[test]
    fn from_args_options_in_field_slot() {
        let agg =
            Aggregation::from_args(args!["filters", json!({ "filters": {} }), "by_filter"])
                .unwrap();
        let (name, node) = agg.render(&BuilderConfig::default()).unwrap();
        assert_eq!(name, "by_filter");
        assert_eq!(node, json!({ "filters": { "filters": {} } }));
    }

    #[test]
    fn from_args_too_few() {
        let err = Aggregation::from_args(args!["terms"]).unwrap_err();
        assert!(matches!(err, BuilderError::TooFewArguments { min: 2, actual: 1, .. }));
    }

    #[test]
    fn from_args_callback_only_needs_name() {
        let agg = Aggregation::from_args(args!["terms", Arg::nested(|b| b)]).unwrap();
        let err = agg.render(&BuilderConfig::default()).unwrap_err();
        assert!(matches!(err, BuilderError::MissingAggregationName { .. }));
    }

    #[test]
    fn compose_single_mode() {
        let aggs = vec![Aggregation::on("terms", "a"), Aggregation::on("terms", "b")];
        let err = compose(&aggs, &BuilderConfig::compat()).unwrap_err();
        assert!(matches!(err, BuilderError::UnsupportedMultipleAggregations { count: 2 }));

        let out = compose(&aggs, &BuilderConfig::default()).unwrap().unwrap();
        let names: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(names, ["agg_terms_a", "agg_terms_b"]);
    }

    #[test]
    fn compose_empty() {
        assert!(compose(&[], &BuilderConfig::default()).unwrap().is_none());
    }
}
