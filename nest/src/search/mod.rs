//! # Listing predicates
//!
//! [`FilterCondition`] is the predicate tree produced by the filter compiler. The memory
//! store evaluates it directly against a [`Document`]; the Redis store renders it to a
//! RediSearch query with [`FilterCondition::to_query_clause`] and runs it through
//! [`index::run_search`].

pub mod index;
mod redisearch;

use serde::{Deserialize, Serialize};

pub use redisearch::{escape_query_value, query_string};

/// Indexed field values of a record, looked up by index field name.
pub trait Document {
    fn tag_value(&self, field: &str) -> Option<&str>;

    fn numeric_value(&self, field: &str) -> Option<f64>;

    fn text_value(&self, field: &str) -> Option<&str>;
}

/// A boolean expression over listing fields.
///
/// An empty `And` matches every record, an empty `Or` matches none.
///
/// ```
/// use nest::search::FilterCondition;
///
/// let condition = FilterCondition::and([
///     FilterCondition::tag_eq("location", "Roorkee"),
///     FilterCondition::or([
///         FilterCondition::text_contains("title", "2bhk"),
///         FilterCondition::text_contains("description", "2bhk"),
///     ]),
/// ]);
/// assert_eq!(
///     condition.to_query_clause(),
///     "@location:{Roorkee} (@title:*2bhk* | @description:*2bhk*)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    /// Exact TAG equality.
    Tag { field: &'static str, value: String },
    /// Inclusive numeric range; `None` leaves that side open.
    Range {
        field: &'static str,
        lower: Option<f64>,
        upper: Option<f64>,
    },
    /// Case-insensitive substring of a TEXT field.
    Contains { field: &'static str, needle: String },
    And(Vec<FilterCondition>),
    Or(Vec<FilterCondition>),
}

impl FilterCondition {
    pub fn tag_eq(field: &'static str, value: impl Into<String>) -> Self {
        Self::Tag {
            field,
            value: value.into(),
        }
    }

    pub fn numeric_range(field: &'static str, lower: Option<f64>, upper: Option<f64>) -> Self {
        Self::Range { field, lower, upper }
    }

    pub fn text_contains(field: &'static str, needle: impl Into<String>) -> Self {
        Self::Contains {
            field,
            needle: needle.into(),
        }
    }

    pub fn and(conditions: impl IntoIterator<Item = FilterCondition>) -> Self {
        Self::And(Vec::from_iter(conditions))
    }

    pub fn or(conditions: impl IntoIterator<Item = FilterCondition>) -> Self {
        Self::Or(Vec::from_iter(conditions))
    }

    pub fn match_all() -> Self {
        Self::And(Vec::new())
    }

    /// True when the condition accepts every record without looking at it.
    pub fn is_match_all(&self) -> bool {
        match self {
            Self::And(children) => children.iter().all(Self::is_match_all),
            Self::Or(children) => children.iter().any(Self::is_match_all),
            _ => false,
        }
    }

    pub fn matches<D: Document + ?Sized>(&self, doc: &D) -> bool {
        match self {
            Self::Tag { field, value } => doc.tag_value(field) == Some(value.as_str()),
            Self::Range { field, lower, upper } => doc.numeric_value(field).is_some_and(|n| {
                lower.is_none_or(|lower| n >= lower) && upper.is_none_or(|upper| n <= upper)
            }),
            Self::Contains { field, needle } => doc
                .text_value(field)
                .is_some_and(|text| text.to_lowercase().contains(&needle.to_lowercase())),
            Self::And(children) => children.iter().all(|c| c.matches(doc)),
            Self::Or(children) => children.iter().any(|c| c.matches(doc)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub const fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Records matching a search plus the number of matches the backend reported.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> SearchResult<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        Self { items, total }
    }
}
