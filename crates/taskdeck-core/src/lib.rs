//! Domain types and the filter-sort engine for taskdeck.
//!
//! This crate is shared by the HTTP service, the client application layer and
//! the CLI: it defines the task record and its wire format, the create/update
//! payloads, and the pure [`compute_view`] function that maps a task list plus
//! [`ViewCriteria`] to the ordered list a view should display.

/// Identifier types.
pub mod id;
/// The task record, create/update payloads, and field validation.
pub mod task;
/// View criteria and the filter-sort engine.
pub mod view;

pub use id::TaskId;
pub use task::{InvalidTask, ParsePriorityError, Priority, Task, TaskDraft, TaskPatch, parse_date};
pub use view::{SortDirection, SortKey, StatusFilter, ViewCriteria, compute_view};
