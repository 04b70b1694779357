//! Boolean wrapper composition.
//!
//! Each clause category maps to one key of the `bool` clause:
//!
//! | Category | Key | Single entry |
//! |----------|-----|--------------|
//! | [`Category::Must`] | `must` | bare clause |
//! | [`Category::Filter`] | `filter` | bare clause |
//! | [`Category::Should`] | `should` | one-element array |
//! | [`Category::MustNot`] | `must_not` | one-element array |
//!
//! Two or more entries always render as an array in insertion order.

use serde_json::Value;

use crate::clause::Clause;
use crate::config::BuilderConfig;
use crate::error::Result;

/// A clause category of the boolean wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Recorded by `query`.
    Must,
    /// Recorded by `filter`.
    Filter,
    /// Recorded by `or_filter`.
    Should,
    /// Recorded by `not_filter`.
    MustNot,
}

impl Category {
    /// All categories in rendering order.
    pub const ALL: [Category; 4] = [
        Category::Must,
        Category::Filter,
        Category::Should,
        Category::MustNot,
    ];

    /// Returns the key inside the `bool` clause.
    pub fn key(self) -> &'static str {
        match self {
            Category::Must => "must",
            Category::Filter => "filter",
            Category::Should => "should",
            Category::MustNot => "must_not",
        }
    }

    /// Returns `true` if a single entry still renders as an array.
    pub fn always_array(self) -> bool {
        matches!(self, Category::Should | Category::MustNot)
    }
}

/// Renders one category, or `None` when it has no entries.
pub(crate) fn compose(
    category: Category,
    clauses: &[Clause],
    config: &BuilderConfig,
) -> Result<Option<Value>> {
    match clauses {
        [] => Ok(None),
        [single] if !category.always_array() => single.render(config).map(Some),
        many => {
            let rendered = many
                .iter()
                .map(|clause| clause.render(config))
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(Value::Array(rendered)))
        }
    }
}
