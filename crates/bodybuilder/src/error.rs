//! Error types for the bodybuilder crate.

use thiserror::Error;

/// Errors that can occur while recording calls or building a document.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// A positional entry point received more arguments than it accepts.
    #[error("{method}() accepts at most {max} arguments, got {actual}")]
    TooManyArguments {
        method: &'static str,
        max: usize,
        actual: usize,
    },

    /// A positional entry point received fewer arguments than it requires.
    #[error("{method}() requires at least {min} arguments, got {actual}")]
    TooFewArguments {
        method: &'static str,
        min: usize,
        actual: usize,
    },

    /// A positional argument has the wrong shape.
    #[error("argument {position} of {method}() must be {expected}")]
    InvalidArgument {
        method: &'static str,
        position: usize,
        expected: &'static str,
    },

    /// Sort direction was neither `asc` nor `desc`.
    #[error("invalid sort direction '{0}', expected 'asc' or 'desc'")]
    InvalidSortDirection(String),

    /// An aggregation has no field to derive a name from and no explicit name.
    #[error("aggregation '{agg_type}' has no field; an explicit name is required")]
    MissingAggregationName { agg_type: String },

    /// More than one top-level aggregation was registered in single mode.
    #[error("only one top-level aggregation is supported in single mode, got {count}")]
    UnsupportedMultipleAggregations { count: usize },

    /// The built document could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for bodybuilder operations.
pub type Result<T> = std::result::Result<T, BuilderError>;
