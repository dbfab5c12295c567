//! View-state controller: the authoritative tidy of what is on screen.
//!
//! Holds the fetched task list plus the user's filter, sort, selection, and
//! in-progress edit. Every user intent is a method here; rendering reads
//! [`ViewState::visible`] and never recomputes the view itself.

use std::collections::HashSet;

use taskdeck_core::{
    compute_view, Priority, SortKey, StatusFilter, Task, TaskId, TaskPatch, ViewCriteria,
};
use time::Date;

/// An edit in progress on a single task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    /// Task being edited.
    pub id: TaskId,
    /// Text as currently typed.
    pub text: String,
    original: String,
}

/// Aggregate counts over the full task list, ignoring filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// All tasks.
    pub total: usize,
    /// Completed tasks.
    pub completed: usize,
    /// Tasks not yet completed.
    pub pending: usize,
    /// Pending tasks whose due date is strictly before today.
    pub overdue: usize,
    /// Pending tasks with high priority.
    pub high_priority: usize,
}

/// Client-side state machine over the fetched task list.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    tasks: Vec<Task>,
    criteria: ViewCriteria,
    selection: HashSet<TaskId>,
    editing: Option<EditDraft>,
    cursor: usize,
}

impl ViewState {
    /// Empty state with default criteria.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current filter and sort criteria.
    #[must_use]
    pub const fn criteria(&self) -> &ViewCriteria {
        &self.criteria
    }

    /// Full unfiltered task list as last fetched.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks matching the current criteria, in display order.
    #[must_use]
    pub fn visible(&self) -> Vec<Task> {
        compute_view(&self.tasks, &self.criteria)
    }

    /// Replace the task list after a fetch, pruning stale selection, edit,
    /// and cursor state.
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        let known: HashSet<TaskId> = self.tasks.iter().map(|task| task.id).collect();
        self.selection.retain(|id| known.contains(id));
        if let Some(draft) = &self.editing
            && !known.contains(&draft.id)
        {
            self.editing = None;
        }
        self.clamp_cursor();
    }

    // -- filter and sort intents -------------------------------------------

    /// Set the free-text search term.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.criteria.search = search.into();
        self.clamp_cursor();
    }

    /// Set the completion-status filter.
    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.criteria.status = status;
        self.clamp_cursor();
    }

    /// Filter to one priority, or clear with `None`.
    pub fn set_priority_filter(&mut self, priority: Option<Priority>) {
        self.criteria.priority = priority;
        self.clamp_cursor();
    }

    /// Filter to one category, or clear with `None`.
    pub fn set_category_filter(&mut self, category: Option<String>) {
        self.criteria.category = category;
        self.clamp_cursor();
    }

    /// Change the sort key; direction is untouched.
    pub fn set_sort_key(&mut self, key: SortKey) {
        self.criteria.sort_key = key;
    }

    /// Flip ascending/descending.
    pub fn toggle_sort_direction(&mut self) {
        self.criteria.direction = self.criteria.direction.flipped();
    }

    /// Flip whether completed tasks are shown at all.
    pub fn toggle_show_completed(&mut self) -> bool {
        self.criteria.show_completed = !self.criteria.show_completed;
        self.clamp_cursor();
        self.criteria.show_completed
    }

    // -- cursor ------------------------------------------------------------

    /// Index of the highlighted row within [`Self::visible`].
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the highlight down one row, clamped to the last visible task.
    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    /// Move the highlight up one row.
    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// The task under the highlight, if any row is visible.
    #[must_use]
    pub fn selected_task(&self) -> Option<Task> {
        self.visible().into_iter().nth(self.cursor)
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    // -- multi-selection ---------------------------------------------------

    /// Identifiers currently marked for a bulk operation.
    #[must_use]
    pub fn selection(&self) -> Vec<TaskId> {
        let mut ids: Vec<TaskId> = self.selection.iter().copied().collect();
        ids.sort_unstable_by_key(|id| id.0);
        ids
    }

    /// True when `id` is marked.
    #[must_use]
    pub fn is_selected(&self, id: TaskId) -> bool {
        self.selection.contains(&id)
    }

    /// Mark or unmark one task.
    pub fn toggle_selection(&mut self, id: TaskId) {
        if !self.selection.insert(id) {
            self.selection.remove(&id);
        }
    }

    /// Mark every visible task; if all of them are already marked, clear the
    /// selection instead.
    pub fn select_all_visible(&mut self) {
        let visible: HashSet<TaskId> = self.visible().iter().map(|task| task.id).collect();
        if !visible.is_empty() && visible.iter().all(|id| self.selection.contains(id)) {
            self.selection.clear();
        } else {
            self.selection.extend(visible);
        }
    }

    /// Drop every mark.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // -- editing -----------------------------------------------------------

    /// The edit in progress, if any.
    #[must_use]
    pub const fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    /// Begin editing the highlighted task, seeding the draft with its text.
    pub fn enter_edit(&mut self) {
        if let Some(task) = self.selected_task() {
            self.editing = Some(EditDraft {
                id: task.id,
                original: task.text.clone(),
                text: task.text,
            });
        }
    }

    /// Replace the draft text as the user types.
    pub fn set_edit_text(&mut self, text: impl Into<String>) {
        if let Some(draft) = &mut self.editing {
            draft.text = text.into();
        }
    }

    /// Finish the edit. Returns the patch to send, or `None` when the text
    /// is blank or unchanged, in which case the edit is simply discarded.
    pub fn commit_edit(&mut self) -> Option<(TaskId, TaskPatch)> {
        let draft = self.editing.take()?;
        let trimmed = draft.text.trim();
        if trimmed.is_empty() || trimmed == draft.original {
            return None;
        }
        let patch = TaskPatch {
            text: Some(trimmed.to_owned()),
            ..TaskPatch::default()
        };
        Some((draft.id, patch))
    }

    /// Abandon the edit without touching the task.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    // -- stats -------------------------------------------------------------

    /// Counts over the full list; `today` decides what counts as overdue.
    #[must_use]
    pub fn stats(&self, today: Date) -> Stats {
        let mut stats = Stats {
            total: self.tasks.len(),
            ..Stats::default()
        };
        for task in &self.tasks {
            if task.completed {
                stats.completed += 1;
            } else {
                stats.pending += 1;
                if task.due_date.is_some_and(|due| due < today) {
                    stats.overdue += 1;
                }
                if task.priority == Some(Priority::High) {
                    stats.high_priority += 1;
                }
            }
        }
        stats
    }
}
