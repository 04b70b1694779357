//! Ordering types for document sorting.
//!
//! Provides [`Dir`] for sort direction, [`OrderBy`] for a single sort entry
//! and [`Sorts`], the ordered field → direction association.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::args::Arg;
use crate::error::{BuilderError, Result};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Returns the query DSL name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dir {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(Dir::Asc),
            "desc" => Ok(Dir::Desc),
            other => Err(BuilderError::InvalidSortDirection(other.to_string())),
        }
    }
}

/// A single sort entry specifying a field and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    pub dir: Dir,
}

impl OrderBy {
    /// Creates a new ascending ordering for the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy {
            field: field.into(),
            dir: Dir::Asc,
        }
    }

    /// Creates a new descending ordering for the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy {
            field: field.into(),
            dir: Dir::Desc,
        }
    }

    /// Creates a new ordering with the given direction.
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    /// Resolves a positional `(field, [direction])` argument list.
    pub fn from_args(args: Vec<Arg>) -> Result<Self> {
        const METHOD: &str = "sort";

        if args.len() > 2 {
            return Err(BuilderError::TooManyArguments {
                method: METHOD,
                max: 2,
                actual: args.len(),
            });
        }

        let mut iter = args.into_iter();
        let field = match iter.next() {
            Some(Arg::Str(field)) => field,
            Some(_) => {
                return Err(BuilderError::InvalidArgument {
                    method: METHOD,
                    position: 0,
                    expected: "a field name string",
                })
            }
            None => {
                return Err(BuilderError::TooFewArguments {
                    method: METHOD,
                    min: 1,
                    actual: 0,
                })
            }
        };
        let dir = match iter.next() {
            None => Dir::default(),
            Some(Arg::Str(dir)) => dir.parse()?,
            Some(_) => {
                return Err(BuilderError::InvalidArgument {
                    method: METHOD,
                    position: 1,
                    expected: "a direction string",
                })
            }
        };

        Ok(OrderBy::new(field, dir))
    }

    /// Renders `{field: {order: dir}}`.
    pub fn render(&self) -> Value {
        let mut entry = Map::new();
        entry.insert(self.field.clone(), json!({ "order": self.dir.as_str() }));
        Value::Object(entry)
    }
}

/// Ordered field → direction association.
///
/// Keyed by field name on an insertion-ordered map, so setting a field that
/// is already present updates its direction without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sorts {
    entries: Map<String, Value>,
}

impl Sorts {
    /// Creates an empty association.
    pub fn new() -> Self {
        Sorts::default()
    }

    /// Inserts or updates an entry in place.
    pub fn set(&mut self, order_by: OrderBy) {
        self.entries.insert(order_by.field, Value::from(order_by.dir.as_str()));
    }

    /// Returns the direction for `field`, if present.
    pub fn get(&self, field: &str) -> Option<Dir> {
        self.entries
            .get(field)
            .and_then(Value::as_str)
            .and_then(|dir| dir.parse().ok())
    }

    /// Returns the entries in order.
    pub fn entries(&self) -> Vec<OrderBy> {
        self.entries
            .keys()
            .filter_map(|field| self.get(field).map(|dir| OrderBy::new(field.as_str(), dir)))
            .collect()
    }

    /// Returns the number of sorted fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no field is sorted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders `[{field: {order: dir}}, ...]`, or `None` when empty.
    pub fn render(&self) -> Option<Value> {
        if self.entries.is_empty() {
            return None;
        }
        let rendered = self
            .entries
            .iter()
            .map(|(field, dir)| {
                let mut entry = Map::new();
                entry.insert(field.clone(), json!({ "order": dir }));
                Value::Object(entry)
            })
            .collect();
        Some(Value::Array(rendered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    #[test]
    fn dir_display() {
        assert_eq!(Dir::Asc.to_string(), "asc");
        assert_eq!(Dir::Desc.to_string(), "desc");
    }

    #[test]
    fn dir_parse() {
        assert_eq!("asc".parse::<Dir>().unwrap(), Dir::Asc);
        assert_eq!("desc".parse::<Dir>().unwrap(), Dir::Desc);
        assert!(matches!(
            "up".parse::<Dir>(),
            Err(BuilderError::InvalidSortDirection(ref s)) if s == "up"
        ));
    }

    #[test]
    fn order_by_constructors() {
        let asc = OrderBy::asc("name");
        assert_eq!(asc.field, "name");
        assert_eq!(asc.dir, Dir::Asc);

        let desc = OrderBy::desc("priority");
        assert_eq!(desc.field, "priority");
        assert!(desc.dir.is_desc());
    }

    #[test]
    fn order_by_render() {
        assert_eq!(
            OrderBy::desc("timestamp").render(),
            json!({ "timestamp": { "order": "desc" } })
        );
    }

    #[test]
    fn set_updates_in_place() {
        let mut sorts = Sorts::new();
        sorts.set(OrderBy::desc("A"));
        sorts.set(OrderBy::desc("B"));
        sorts.set(OrderBy::asc("A"));

        assert_eq!(sorts.len(), 2);
        assert_eq!(sorts.get("A"), Some(Dir::Asc));
        assert_eq!(sorts.get("C"), None);
        assert_eq!(sorts.entries(), [OrderBy::asc("A"), OrderBy::desc("B")]);
        assert_eq!(
            sorts.render(),
            Some(json!([
                { "A": { "order": "asc" } },
                { "B": { "order": "desc" } }
            ]))
        );
    }

    #[test]
    fn empty_renders_none() {
        let sorts = Sorts::new();
        assert!(sorts.is_empty());
        assert!(sorts.render().is_none());
    }

    #[test]
    fn from_args_default_direction() {
        assert_eq!(OrderBy::from_args(args!["score"]).unwrap(), OrderBy::asc("score"));
        assert_eq!(
            OrderBy::from_args(args!["score", "desc"]).unwrap(),
            OrderBy::desc("score")
        );
    }

    #[test]
    fn from_args_errors() {
        assert!(matches!(
            OrderBy::from_args(args!["a", "asc", "b"]),
            Err(BuilderError::TooManyArguments { max: 2, actual: 3, .. })
        ));
        assert!(matches!(
            OrderBy::from_args(args![]),
            Err(BuilderError::TooFewArguments { .. })
        ));
        assert!(matches!(
            OrderBy::from_args(args!["a", "sideways"]),
            Err(BuilderError::InvalidSortDirection(_))
        ));
        assert!(matches!(
            OrderBy::from_args(args![1]),
            Err(BuilderError::InvalidArgument { position: 0, .. })
        ));
    }
}
