//! Filter engine: the pure mapping from the canonical list and a query to
//! the current view.

use std::fmt;
use std::str::FromStr;

use kpp_core::{Checkpoint, CheckpointStatus, CheckpointType, CollationKey, UnknownCategory};

/// A category predicate: either no constraint or exactly one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq + Copy> CategoryFilter<T> {
    #[must_use]
    pub fn accepts(&self, value: T) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == value,
        }
    }
}

impl<T> FromStr for CategoryFilter<T>
where
    T: FromStr<Err = UnknownCategory>,
{
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") || trimmed == "Все" {
            return Ok(CategoryFilter::All);
        }
        trimmed.parse().map(CategoryFilter::Only)
    }
}

impl<T: fmt::Display> fmt::Display for CategoryFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(value) => value.fmt(f),
        }
    }
}

/// The user's current query: free text plus the two category drop-downs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewQuery {
    pub text: String,
    pub type_filter: CategoryFilter<CheckpointType>,
    pub status_filter: CategoryFilter<CheckpointStatus>,
}

impl ViewQuery {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// True when no predicate is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
            && self.type_filter == CategoryFilter::All
            && self.status_filter == CategoryFilter::All
    }

    fn needle(&self) -> String {
        self.text.trim().to_lowercase()
    }
}

/// Indices of the records that satisfy every active predicate, in canonical
/// order.
#[must_use]
pub fn compute_view(all: &[Checkpoint], query: &ViewQuery) -> Vec<usize> {
    let needle = query.needle();
    all.iter()
        .enumerate()
        .filter(|(_, c)| {
            query.type_filter.accepts(c.checkpoint_type)
                && query.status_filter.accepts(c.status)
                && c.matches_text(&needle)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Same as [`compute_view`] but returns owned records.
#[must_use]
pub fn compute_view_records(all: &[Checkpoint], query: &ViewQuery) -> Vec<Checkpoint> {
    compute_view(all, query)
        .into_iter()
        .map(|i| all[i].clone())
        .collect()
}

/// Drop-down contents: the categories that actually occur in the data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterOptions {
    pub types: Vec<CheckpointType>,
    pub statuses: Vec<CheckpointStatus>,
}

#[must_use]
pub fn filter_options(all: &[Checkpoint]) -> FilterOptions {
    let mut types: Vec<CheckpointType> = CheckpointType::ALL
        .into_iter()
        .filter(|t| all.iter().any(|c| c.checkpoint_type == *t))
        .collect();
    types.sort_by_key(|t| CollationKey::new(t.label()));

    let mut statuses: Vec<CheckpointStatus> = CheckpointStatus::ALL
        .into_iter()
        .filter(|s| all.iter().any(|c| c.status == *s))
        .collect();
    statuses.sort_by_key(|s| CollationKey::new(s.label()));

    FilterOptions { types, statuses }
}
