use kpp_core::Checkpoint;
use serde::Serialize;

use crate::selection::Selection;

pub const TOP_REGIONS: usize = 5;

/// Summary counters shown above the list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
    pub total: usize,
    pub shown: usize,
    pub selected: usize,
    /// Selected ids that are also in the current view.
    pub selected_shown: usize,
    /// Most frequent subjects in the view, ties in first-seen order.
    pub top_regions: Vec<(String, usize)>,
}

#[must_use]
pub fn compute_stats(all: &[Checkpoint], view: &[usize], selection: &Selection) -> Stats {
    let selected_shown = view
        .iter()
        .filter(|&&i| selection.contains(&all[i].id))
        .count();

    Stats {
        total: all.len(),
        shown: view.len(),
        selected: selection.len(),
        selected_shown,
        top_regions: top_subjects(all, view, TOP_REGIONS),
    }
}

fn top_subjects(all: &[Checkpoint], view: &[usize], limit: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for &i in view {
        let subject = all[i].subject.as_str();
        match counts.iter_mut().find(|(s, _)| s == subject) {
            Some((_, n)) => *n += 1,
            None => counts.push((subject.to_string(), 1)),
        }
    }
    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
}
