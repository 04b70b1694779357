//! Builder configuration.
//!
//! [`BuilderConfig`] toggles the compatibility quirks of the assembler. The
//! defaults favor explicit values; [`BuilderConfig::compat`] reproduces the
//! behavior of the original query builders.

use serde::{Deserialize, Serialize};

/// How many top-level aggregations a builder accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    /// Exactly one top-level aggregation; more fails at build time.
    Single,
    /// Any number of named top-level aggregations, in registration order.
    #[default]
    Multiple,
}

/// Configuration for document assembly.
///
/// A nested builder created for a callback inherits the configuration of
/// the builder that invoked it.
///
/// # Example
///
/// ```
/// use bodybuilder::{AggregationMode, BodyBuilder, BuilderConfig};
///
/// let config: BuilderConfig =
///     serde_json::from_str(r#"{ "drop_zero_pagination": true }"#).unwrap();
/// assert_eq!(config.aggregations, AggregationMode::Multiple);
///
/// let body = BodyBuilder::with_config(config).size(0).build().unwrap();
/// assert!(body.get("size").is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Treat a `from` or `size` of zero as unset.
    pub drop_zero_pagination: bool,
    /// Top-level aggregation cardinality.
    pub aggregations: AggregationMode,
}

impl BuilderConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        BuilderConfig::default()
    }

    /// Configuration matching the original builders: zero pagination values
    /// are dropped and only one aggregation is allowed.
    pub fn compat() -> Self {
        BuilderConfig {
            drop_zero_pagination: true,
            aggregations: AggregationMode::Single,
        }
    }

    /// Sets whether zero pagination values are dropped.
    pub fn drop_zero_pagination(mut self, drop: bool) -> Self {
        self.drop_zero_pagination = drop;
        self
    }

    /// Sets the aggregation mode.
    pub fn aggregations(mut self, mode: AggregationMode) -> Self {
        self.aggregations = mode;
        self
    }

    /// Applies the pagination rule to a stored value.
    pub(crate) fn pagination(&self, value: Option<u64>) -> Option<u64> {
        match value {
            Some(0) if self.drop_zero_pagination => None,
            other => other,
        }
    }
}
