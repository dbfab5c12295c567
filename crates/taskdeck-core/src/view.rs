//! The filter-sort engine: turns the full task list plus the current view
//! criteria into the ordered list to display.

use crate::task::{Priority, Task};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use time::macros::date;
use time::Date;

/// Tasks without a due date sort as if due at this sentinel, which places
/// them last when sorting by due date ascending.
const FAR_FUTURE: Date = date!(2099 - 12 - 31);

/// Completion-status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Match every task.
    #[default]
    All,
    /// Match only completed tasks.
    Completed,
    /// Match only tasks not yet completed.
    Pending,
}

/// Key selecting the sort comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// By creation timestamp, identifier as tiebreak.
    #[default]
    Created,
    /// By due date, missing dates last in ascending order.
    DueDate,
    /// By priority rank, absent priority lowest.
    Priority,
    /// Case-insensitive by task text.
    Text,
    /// By category, absent category as the empty string.
    Category,
}

/// Sort direction applied on top of the selected key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first (the default: newest-created tasks lead the list).
    #[default]
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// The combined search/filter/sort parameters that determine what the view
/// displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewCriteria {
    /// Case-insensitive substring matched against task text; empty matches all.
    pub search: String,
    /// Completion-status filter.
    pub status: StatusFilter,
    /// When false, completed tasks are excluded regardless of `status`.
    pub show_completed: bool,
    /// Exact priority to match, or `None` for all.
    pub priority: Option<Priority>,
    /// Exact category to match, or `None` for all.
    pub category: Option<String>,
    /// Selected sort key.
    pub sort_key: SortKey,
    /// Sort direction.
    pub direction: SortDirection,
}

impl Default for ViewCriteria {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
            show_completed: true,
            priority: None,
            category: None,
            sort_key: SortKey::Created,
            direction: SortDirection::Descending,
        }
    }
}

impl ViewCriteria {
    /// Whether a task passes every active filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if !self.search.is_empty()
            && !task
                .text
                .to_lowercase()
                .contains(&self.search.to_lowercase())
        {
            return false;
        }
        match self.status {
            StatusFilter::All => {}
            StatusFilter::Completed => {
                if !task.completed {
                    return false;
                }
            }
            StatusFilter::Pending => {
                if task.completed {
                    return false;
                }
            }
        }
        if !self.show_completed && task.completed {
            return false;
        }
        if let Some(priority) = self.priority
            && task.priority != Some(priority)
        {
            return false;
        }
        if let Some(category) = self.category.as_deref()
            && task.category.as_deref() != Some(category)
        {
            return false;
        }
        true
    }
}

/// Compute the ordered subset of `tasks` selected by `criteria`.
///
/// Pure and deterministic: the input list is never mutated, and the sort is
/// stable so tasks comparing equal keep their relative order across re-runs.
/// Cheap enough to re-run on every keystroke for lists of a few hundred items.
#[must_use]
pub fn compute_view(tasks: &[Task], criteria: &ViewCriteria) -> Vec<Task> {
    let mut view: Vec<Task> = tasks
        .iter()
        .filter(|task| criteria.matches(task))
        .cloned()
        .collect();
    view.sort_by(|a, b| {
        let ordering = compare_by_key(a, b, criteria.sort_key);
        match criteria.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    view
}

fn compare_by_key(a: &Task, b: &Task, key: SortKey) -> Ordering {
    match key {
        SortKey::Created => (a.created_at, a.id).cmp(&(b.created_at, b.id)),
        SortKey::DueDate => {
            let a_due = a.due_date.unwrap_or(FAR_FUTURE);
            let b_due = b.due_date.unwrap_or(FAR_FUTURE);
            a_due.cmp(&b_due)
        }
        SortKey::Priority => priority_rank(a.priority).cmp(&priority_rank(b.priority)),
        SortKey::Text => a.text.to_lowercase().cmp(&b.text.to_lowercase()),
        SortKey::Category => {
            let a_cat = a.category.as_deref().unwrap_or("");
            let b_cat = b.category.as_deref().unwrap_or("");
            a_cat.cmp(b_cat)
        }
    }
}

const fn priority_rank(priority: Option<Priority>) -> u8 {
    match priority {
        Some(p) => p.rank(),
        None => 0,
    }
}
