//! Bodybuilder - Fluent builder for Elasticsearch-style query DSL documents.
//!
//! Bodybuilder turns a chain of method calls into a single query document
//! instead of hand-written nested JSON. It supports:
//!
//! - Query, filter, OR filter and NOT filter clauses
//! - Automatic `bool` wrapping, skipped for single-clause queries
//! - Nested builders spliced into a parent clause or aggregation
//! - Named aggregations with synthesized default names
//! - Ordered sorting, pagination and raw top-level options
//!
//! # Quick Start
//!
//! ```rust
//! use bodybuilder::BodyBuilder;
//! use serde_json::json;
//!
//! let body = BodyBuilder::new()
//!     .query(("match", "message", "this is a test"))
//!     .filter(("term", "user", "kimchy"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     body,
//!     json!({
//!         "query": {
//!             "bool": {
//!                 "must": { "match": { "message": "this is a test" } },
//!                 "filter": { "term": { "user": "kimchy" } }
//!             }
//!         }
//!     })
//! );
//! ```
//!
//! # Document Shape
//!
//! `build` populates keys in a fixed order:
//!
//! ```text
//! query   bare clause if exactly one query and nothing else, else bool wrapper
//! sort    [{field: {order: dir}}, ...] in first-insertion order
//! ...     raw options, merged verbatim (may overwrite query/sort)
//! from    pagination
//! size    pagination
//! aggs    {name: {type: options, aggs?: {...}}}
//! ```
//!
//! # Clause Categories
//!
//! | Method | `bool` key | One entry renders as |
//! |--------|------------|----------------------|
//! | `query` | `must` | bare clause |
//! | `filter` | `filter` | bare clause |
//! | `or_filter` | `should` | array |
//! | `not_filter` | `must_not` | array |
//!
//! # Nested Builders
//!
//! ```rust
//! use bodybuilder::{BodyBuilder, Clause};
//! use serde_json::json;
//!
//! let filter = BodyBuilder::new()
//!     .filter(Clause::new("constant_score").nested(|b| b.filter(("term", "field", "value"))))
//!     .get_filter()
//!     .unwrap();
//!
//! assert_eq!(
//!     filter,
//!     Some(json!({ "constant_score": { "filter": { "term": { "field": "value" } } } }))
//! );
//! ```

mod aggregation;
mod args;
mod bool_query;
mod builder;
mod clause;
mod config;
mod error;
mod ordering;

// Re-export public API
pub use aggregation::Aggregation;
pub use args::{Arg, Nested};
pub use bool_query::Category;
pub use builder::BodyBuilder;
pub use clause::{Clause, DEFAULT_FIELD};
pub use config::{AggregationMode, BuilderConfig};
pub use error::{BuilderError, Result};
pub use ordering::{Dir, OrderBy, Sorts};
