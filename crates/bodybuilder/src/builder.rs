//! Document builder and assembler.
//!
//! The [`BodyBuilder`] struct records fluent calls and assembles them into a
//! query DSL document on [`BodyBuilder::build`].

use serde_json::{Map, Value};

use crate::aggregation::{self, Aggregation};
use crate::args::Arg;
use crate::bool_query::{self, Category};
use crate::clause::Clause;
use crate::config::BuilderConfig;
use crate::error::Result;
use crate::ordering::{Dir, OrderBy, Sorts};

/// A fluent builder for query DSL documents.
///
/// Calls are recorded in four clause categories:
/// - **query** → `must`
/// - **filter** → `filter`
/// - **or_filter** → `should`
/// - **not_filter** → `must_not`
///
/// A document with exactly one query and nothing else in the other
/// categories is a *simple query*: the clause is emitted bare under `query`.
/// Anything else is wrapped in a `bool` clause.
///
/// Nothing is rendered until [`build`](BodyBuilder::build), which can be
/// called any number of times and always recomputes the document from the
/// recorded state.
///
/// # Example
///
/// ```
/// use bodybuilder::{BodyBuilder, Dir};
/// use serde_json::json;
///
/// let body = BodyBuilder::new()
///     .query(("match", "message", "this is a test"))
///     .filter(("term", "user", "kimchy"))
///     .not_filter(("term", "status", "deleted"))
///     .sort_by("timestamp", Dir::Desc)
///     .size(20)
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     body,
///     json!({
///         "query": {
///             "bool": {
///                 "must": { "match": { "message": "this is a test" } },
///                 "filter": { "term": { "user": "kimchy" } },
///                 "must_not": [{ "term": { "status": "deleted" } }]
///             }
///         },
///         "sort": [{ "timestamp": { "order": "desc" } }],
///         "size": 20
///     })
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct BodyBuilder {
    config: BuilderConfig,
    queries: Vec<Clause>,
    filters: Vec<Clause>,
    or_filters: Vec<Clause>,
    not_filters: Vec<Clause>,
    aggregations: Vec<Aggregation>,
    sorts: Sorts,
    raw_options: Map<String, Value>,
    from: Option<u64>,
    size: Option<u64>,
    minimum_should_match: Option<Value>,
}

impl BodyBuilder {
    /// Creates a new empty builder with the default configuration.
    ///
    /// An empty builder builds to `{}`.
    pub fn new() -> Self {
        BodyBuilder::default()
    }

    /// Creates a new empty builder with the given configuration.
    pub fn with_config(config: BuilderConfig) -> Self {
        BodyBuilder {
            config,
            ..BodyBuilder::default()
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    // ========================================================================
    // Clause builders
    // ========================================================================

    /// Adds a query clause (`must`).
    pub fn query(mut self, clause: impl Into<Clause>) -> Self {
        self.queries.push(clause.into());
        self
    }

    /// Adds a filter clause (`filter`).
    pub fn filter(mut self, clause: impl Into<Clause>) -> Self {
        self.filters.push(clause.into());
        self
    }

    /// Adds an OR filter clause (`should`).
    ///
    /// OR filters always render as an array, even when there is only one.
    pub fn or_filter(mut self, clause: impl Into<Clause>) -> Self {
        self.or_filters.push(clause.into());
        self
    }

    /// Adds a NOT filter clause (`must_not`).
    ///
    /// NOT filters always render as an array, even when there is only one.
    pub fn not_filter(mut self, clause: impl Into<Clause>) -> Self {
        self.not_filters.push(clause.into());
        self
    }

    // ========================================================================
    // Positional clause builders
    // ========================================================================

    /// Adds a query clause from positional arguments.
    ///
    /// Returns an error if the argument list has the wrong arity or shape.
    pub fn query_args(self, args: Vec<Arg>) -> Result<Self> {
        Ok(self.query(Clause::from_args("query", args)?))
    }

    /// Adds a filter clause from positional arguments.
    pub fn filter_args(self, args: Vec<Arg>) -> Result<Self> {
        Ok(self.filter(Clause::from_args("filter", args)?))
    }

    /// Adds an OR filter clause from positional arguments.
    pub fn or_filter_args(self, args: Vec<Arg>) -> Result<Self> {
        Ok(self.or_filter(Clause::from_args("or_filter", args)?))
    }

    /// Adds a NOT filter clause from positional arguments.
    pub fn not_filter_args(self, args: Vec<Arg>) -> Result<Self> {
        Ok(self.not_filter(Clause::from_args("not_filter", args)?))
    }

    // ========================================================================
    // Aggregations
    // ========================================================================

    /// Adds a top-level aggregation.
    ///
    /// Name synthesis and cardinality are checked at build time.
    pub fn aggregation(mut self, agg: impl Into<Aggregation>) -> Self {
        self.aggregations.push(agg.into());
        self
    }

    /// Adds a top-level aggregation from positional arguments.
    ///
    /// Returns an error if fewer than two arguments are given.
    pub fn aggregation_args(self, args: Vec<Arg>) -> Result<Self> {
        Ok(self.aggregation(Aggregation::from_args(args)?))
    }

    // ========================================================================
    // Sorting
    // ========================================================================

    /// Sorts by `field` ascending.
    ///
    /// Re-sorting an existing field updates its direction in place.
    pub fn sort(self, field: &str) -> Self {
        self.sort_by(field, Dir::Asc)
    }

    /// Sorts by `field` in the given direction.
    pub fn sort_by(mut self, field: &str, dir: Dir) -> Self {
        self.sorts.set(OrderBy::new(field, dir));
        self
    }

    /// Sorts from positional `(field, [direction])` arguments.
    ///
    /// Returns an error for more than two arguments or an unknown direction.
    pub fn sort_args(mut self, args: Vec<Arg>) -> Result<Self> {
        self.sorts.set(OrderBy::from_args(args)?);
        Ok(self)
    }

    // ========================================================================
    // Pagination and raw options
    // ========================================================================

    /// Sets the number of hits to skip.
    pub fn from(mut self, n: u64) -> Self {
        self.from = Some(n);
        self
    }

    /// Sets the number of hits to return.
    pub fn size(mut self, n: u64) -> Self {
        self.size = Some(n);
        self
    }

    /// Sets a top-level key verbatim.
    ///
    /// Raw options are merged after `query` and `sort` and may overwrite them.
    pub fn raw_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.raw_options.insert(key.into(), value.into());
        self
    }

    /// Sets `minimum_should_match` on the `bool` wrapper.
    ///
    /// Ignored for simple queries, which have no wrapper.
    pub fn minimum_should_match(mut self, value: impl Into<Value>) -> Self {
        self.minimum_should_match = Some(value.into());
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Returns `true` if the document renders a bare query clause.
    pub fn is_simple_query(&self) -> bool {
        self.queries.len() == 1
            && self.filters.is_empty()
            && self.or_filters.is_empty()
            && self.not_filters.is_empty()
    }

    /// Assembles the document.
    ///
    /// Keys are populated in a fixed order: `query`, `sort`, raw options,
    /// `from`/`size`, `aggs`.
    pub fn build(&self) -> Result<Value> {
        let mut doc = Map::new();

        if let Some(query) = self.build_query()? {
            doc.insert("query".to_string(), query);
        }

        if let Some(sort) = self.sorts.render() {
            doc.insert("sort".to_string(), sort);
        }

        for (key, value) in &self.raw_options {
            doc.insert(key.clone(), value.clone());
        }

        if let Some(from) = self.config.pagination(self.from) {
            doc.insert("from".to_string(), Value::from(from));
        }
        if let Some(size) = self.config.pagination(self.size) {
            doc.insert("size".to_string(), Value::from(size));
        }

        if let Some(aggs) = aggregation::compose(&self.aggregations, &self.config)? {
            doc.insert("aggs".to_string(), aggs);
        }

        Ok(Value::Object(doc))
    }

    fn build_query(&self) -> Result<Option<Value>> {
        if let (true, Some(query)) = (self.is_simple_query(), self.queries.first()) {
            log::trace!("building simple query");
            return query.render(&self.config).map(Some);
        }

        let mut bool_clause = Map::new();
        for category in Category::ALL {
            if let Some(rendered) =
                bool_query::compose(category, self.clauses(category), &self.config)?
            {
                bool_clause.insert(category.key().to_string(), rendered);
            }
        }

        if bool_clause.is_empty() {
            return Ok(None);
        }

        log::trace!("building bool query with {} categories", bool_clause.len());
        if let Some(msm) = &self.minimum_should_match {
            bool_clause.insert("minimum_should_match".to_string(), msm.clone());
        }

        let mut query = Map::new();
        query.insert("bool".to_string(), Value::Object(bool_clause));
        Ok(Some(Value::Object(query)))
    }

    /// Builds and returns only the `query` portion.
    pub fn get_query(&self) -> Result<Option<Value>> {
        Ok(take_key(self.build()?, "query"))
    }

    /// Builds and returns only the `query.bool.filter` portion.
    ///
    /// Returns `None` for simple queries and documents without filters.
    pub fn get_filter(&self) -> Result<Option<Value>> {
        Ok(take_key(self.build()?, "query")
            .and_then(|query| take_key(query, "bool"))
            .and_then(|bool_clause| take_key(bool_clause, "filter")))
    }

    /// Builds and returns only the `aggs` portion.
    pub fn get_aggregations(&self) -> Result<Option<Value>> {
        Ok(take_key(self.build()?, "aggs"))
    }

    /// Builds the document and serializes it compactly.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.build()?)?)
    }

    /// Builds the document and serializes it with indentation.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.build()?)?)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the clauses recorded for a category.
    pub fn clauses(&self, category: Category) -> &[Clause] {
        match category {
            Category::Must => &self.queries,
            Category::Filter => &self.filters,
            Category::Should => &self.or_filters,
            Category::MustNot => &self.not_filters,
        }
    }

    /// Returns the query clauses.
    pub fn queries(&self) -> &[Clause] {
        &self.queries
    }

    /// Returns the filter clauses.
    pub fn filters(&self) -> &[Clause] {
        &self.filters
    }

    /// Returns the OR filter clauses.
    pub fn or_filters(&self) -> &[Clause] {
        &self.or_filters
    }

    /// Returns the NOT filter clauses.
    pub fn not_filters(&self) -> &[Clause] {
        &self.not_filters
    }

    /// Returns the top-level aggregations.
    pub fn aggregations(&self) -> &[Aggregation] {
        &self.aggregations
    }

    /// Returns the sort entries in order.
    pub fn sorts(&self) -> Vec<OrderBy> {
        self.sorts.entries()
    }

    /// Returns `from`, if set.
    pub fn get_from(&self) -> Option<u64> {
        self.from
    }

    /// Returns `size`, if set.
    pub fn get_size(&self) -> Option<u64> {
        self.size
    }

    /// Returns `true` if at least one filter (not OR/NOT filter) was recorded.
    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Returns `true` if no clause of any category was recorded.
    pub fn is_empty(&self) -> bool {
        Category::ALL
            .iter()
            .all(|category| self.clauses(*category).is_empty())
    }
}

fn take_key(value: Value, key: &str) -> Option<Value> {
    match value {
        Value::Object(mut map) => map.remove(key),
        _ => None,
    }
}
