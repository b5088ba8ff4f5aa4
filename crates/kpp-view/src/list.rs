//! Side-panel list model.

use std::collections::BTreeMap;

use kpp_core::{Checkpoint, CollationKey, ListLayout};
use serde::Serialize;

use crate::selection::Selection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRow {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub country: String,
    pub type_label: &'static str,
    pub status_label: &'static str,
    pub selected: bool,
}

impl ListRow {
    fn new(c: &Checkpoint, selected: bool) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            subject: c.subject.clone(),
            country: c.country.clone(),
            type_label: c.checkpoint_type.label(),
            status_label: c.status.label(),
            selected,
        }
    }
}

/// A run of rows under an optional heading (the neighbouring country).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListGroup {
    pub heading: Option<String>,
    pub rows: Vec<ListRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ListSnapshot {
    pub groups: Vec<ListGroup>,
    /// View records left out by the row cap.
    pub hidden: usize,
}

impl ListSnapshot {
    pub fn rows(&self) -> impl Iterator<Item = &ListRow> {
        self.groups.iter().flat_map(|g| g.rows.iter())
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|g| g.rows.len()).sum()
    }
}

/// Builds the list for the first `limit` view records. Grouping happens
/// after the cap, so the cap always refers to view order.
#[must_use]
pub fn build_list(
    all: &[Checkpoint],
    view: &[usize],
    selection: &Selection,
    limit: usize,
    layout: ListLayout,
) -> ListSnapshot {
    let shown = &view[..view.len().min(limit)];
    let hidden = view.len() - shown.len();
    let row = |i: usize| ListRow::new(&all[i], selection.contains(&all[i].id));

    let groups = match layout {
        ListLayout::Flat => {
            if shown.is_empty() {
                Vec::new()
            } else {
                vec![ListGroup {
                    heading: None,
                    rows: shown.iter().map(|&i| row(i)).collect(),
                }]
            }
        }
        ListLayout::GroupedByCountry => {
            let mut by_country: BTreeMap<CollationKey, Vec<ListRow>> = BTreeMap::new();
            for &i in shown {
                by_country
                    .entry(CollationKey::new(&all[i].country))
                    .or_default()
                    .push(row(i));
            }
            by_country
                .into_values()
                .map(|mut rows| {
                    rows.sort_by_cached_key(|r| CollationKey::new(&r.name));
                    ListGroup {
                        heading: rows.first().map(|r| r.country.clone()),
                        rows,
                    }
                })
                .collect()
        }
    };

    ListSnapshot { groups, hidden }
}
