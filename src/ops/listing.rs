use std::cmp::Ordering;

use indexmap::IndexMap;

use crate::model::candidate::{Candidate, SortMode};

/// Group name for candidates without a category
pub const FALLBACK_GROUP: &str = "Other";

/// A run of visible rows sharing a category header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    /// Positions in the visible list (not candidate indices)
    pub rows: Vec<usize>,
}

/// Case-insensitive comparison, raw text as tie-break so the order is total.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Candidate indices in display order for the given sort mode.
pub fn sorted_indices(candidates: &[Candidate], mode: SortMode) -> Vec<usize> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    match mode {
        SortMode::Custom => {}
        SortMode::Alphabetical => {
            order.sort_by(|&a, &b| {
                compare_text(candidates[a].display_label(), candidates[b].display_label())
            });
        }
        SortMode::Category => {
            // Only categorized entries move, and only among the slots they
            // already occupy. Uncategorized entries stay where they were.
            let slots: Vec<usize> = order
                .iter()
                .copied()
                .filter(|&i| candidates[i].category.is_some())
                .collect();
            let mut sorted = slots.clone();
            sorted.sort_by(|&a, &b| {
                let (ca, cb) = (&candidates[a], &candidates[b]);
                let fold = |c: &Candidate| c.category.as_deref().unwrap_or_default().to_lowercase();
                fold(ca)
                    .cmp(&fold(cb))
                    .then_with(|| compare_text(ca.display_label(), cb.display_label()))
            });
            for (slot, idx) in slots.into_iter().zip(sorted) {
                order[slot] = idx;
            }
        }
    }
    order
}

/// Keep the entries of `order` whose label, value, or category contains
/// `query` (case-insensitive). Order is preserved; an empty query keeps all.
pub fn filter_indices(candidates: &[Candidate], order: &[usize], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return order.to_vec();
    }
    let needle = query.to_lowercase();
    order
        .iter()
        .copied()
        .filter(|&i| candidates[i].matches(&needle))
        .collect()
}

/// Sort, then filter when a query is given. In category mode the result is
/// reordered group by group so it matches the order the panel draws.
pub fn visible_indices(candidates: &[Candidate], mode: SortMode, query: Option<&str>) -> Vec<usize> {
    let order = sorted_indices(candidates, mode);
    let visible = match query {
        Some(q) => filter_indices(candidates, &order, q),
        None => order,
    };
    match mode {
        SortMode::Category => flatten_groups(candidates, &visible),
        _ => visible,
    }
}

/// Grouping key: the lowercased category, the same fold the sort uses.
fn group_key(candidate: &Candidate) -> Option<String> {
    candidate.category.as_deref().map(str::to_lowercase)
}

/// Partition the visible list into category groups. Groups appear in the
/// order their category is first seen and take that first spelling as
/// their name; uncategorized rows land in [`FALLBACK_GROUP`].
pub fn group_by_category(candidates: &[Candidate], visible: &[usize]) -> Vec<Group> {
    let mut groups: IndexMap<Option<String>, Group> = IndexMap::new();
    for (row, &idx) in visible.iter().enumerate() {
        let candidate = &candidates[idx];
        groups
            .entry(group_key(candidate))
            .or_insert_with(|| Group {
                name: candidate
                    .category
                    .clone()
                    .unwrap_or_else(|| FALLBACK_GROUP.to_string()),
                rows: Vec::new(),
            })
            .rows
            .push(row);
    }
    groups.into_values().collect()
}

/// Reorder `visible` so each group's rows are contiguous, groups in
/// first-seen order.
pub fn flatten_groups(candidates: &[Candidate], visible: &[usize]) -> Vec<usize> {
    group_by_category(candidates, visible)
        .into_iter()
        .flat_map(|g| g.rows)
        .map(|row| visible[row])
        .collect()
}
