//! Client application layer for taskdeck.
//!
//! Wraps the task service's REST surface in [`ApiClient`], keeps what the
//! user is looking at in [`ViewState`], and persists client-side preferences
//! as [`Settings`]. The binary crate layers its interfaces on top of these.

/// REST client for the task service.
pub mod api;
/// Persisted client-side preferences.
pub mod settings;
/// Filter, sort, selection, and edit state for a task view.
pub mod view_state;

pub use api::{ApiClient, ApiError, BulkOutcome};
pub use settings::{Settings, SettingsError};
pub use view_state::{EditDraft, Stats, ViewState};
