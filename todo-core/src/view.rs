use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::models::Todo;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
    Starred,
}

impl StatusFilter {
    fn matches(&self, todo: &Todo) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !todo.completed,
            StatusFilter::Completed => todo.completed,
            StatusFilter::Starred => todo.starred,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    fn matches(&self, todo: &Todo) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(category) => todo.category == *category,
        }
    }
}

/// Aggregate counts over the whole collection, independent of active filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub starred: usize,
}

/// Filtered, sorted projection of the collection for presentation. Starred
/// items come first, then priority order (high, medium, low); the sort is
/// stable, so ties keep their existing relative order. Never mutates the
/// underlying collection.
pub fn project<'a>(
    items: &'a [Todo],
    status: &StatusFilter,
    category: &CategoryFilter,
) -> Vec<&'a Todo> {
    let mut visible: Vec<&Todo> = items
        .iter()
        .filter(|todo| status.matches(todo) && category.matches(todo))
        .collect();

    visible.sort_by(|a, b| {
        b.starred
            .cmp(&a.starred)
            .then(a.priority.cmp(&b.priority))
    });

    visible
}

pub fn stats(items: &[Todo]) -> Stats {
    Stats {
        total: items.len(),
        active: items.iter().filter(|t| !t.completed).count(),
        completed: items.iter().filter(|t| t.completed).count(),
        starred: items.iter().filter(|t| t.starred).count(),
    }
}

/// Distinct categories in first-seen order, for the category selector.
pub fn categories(items: &[Todo]) -> Vec<String> {
    let mut seen = Vec::new();
    for todo in items {
        if !seen.contains(&todo.category) {
            seen.push(todo.category.clone());
        }
    }
    seen
}
