//! TUI state machine: modes, key handling, and the actions they produce.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use taskdeck_app::{Settings, ViewState};
use taskdeck_core::{
    Priority, SortKey, StatusFilter, TaskDraft, TaskId, TaskPatch,
};

const STATUS_TTL: Duration = Duration::from_secs(4);

/// What the event loop should do next; side effects never happen in
/// [`TuiApp::handle_key`] itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Action {
    Refresh,
    Create(TaskDraft),
    Update(TaskId, TaskPatch),
    Delete(TaskId),
    BulkComplete(Vec<TaskId>),
    BulkDelete(Vec<TaskId>),
    SaveSettings,
}

/// Which input the keyboard is currently driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(super) enum Mode {
    #[default]
    Normal,
    Search,
    Add,
    Edit,
}

pub(super) struct TuiApp {
    pub(super) view: ViewState,
    pub(super) settings: Settings,
    pub(super) mode: Mode,
    pub(super) input: String,
    pub(super) should_quit: bool,
    status: Option<(String, Instant)>,
}

impl TuiApp {
    pub(super) fn new(settings: Settings) -> Self {
        let mut view = ViewState::new();
        if !settings.show_completed {
            view.toggle_show_completed();
        }
        Self {
            view,
            settings,
            mode: Mode::default(),
            input: String::new(),
            should_quit: false,
            status: None,
        }
    }

    pub(super) fn status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), Instant::now()));
    }

    pub(super) fn status_line(&self) -> Option<&str> {
        self.status.as_ref().map(|(message, _)| message.as_str())
    }

    pub(super) fn tick(&mut self) {
        if let Some((_, since)) = &self.status
            && since.elapsed() > STATUS_TTL
        {
            self.status = None;
        }
    }

    pub(super) fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match self.mode {
            Mode::Normal => self.handle_normal_key(key.code),
            Mode::Search => self.handle_search_key(key.code),
            Mode::Add => self.handle_add_key(key.code),
            Mode::Edit => self.handle_edit_key(key.code),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn handle_normal_key(&mut self, code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.view.select_next();
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.view.select_prev();
                None
            }
            KeyCode::Char('/') => {
                self.mode = Mode::Search;
                self.input = self.view.criteria().search.clone();
                None
            }
            KeyCode::Char('a') => {
                self.mode = Mode::Add;
                self.input.clear();
                None
            }
            KeyCode::Char('e') => {
                self.view.enter_edit();
                if let Some(draft) = self.view.editing() {
                    self.input = draft.text.clone();
                    self.mode = Mode::Edit;
                }
                None
            }
            KeyCode::Char(' ') => {
                if let Some(task) = self.view.selected_task() {
                    self.view.toggle_selection(task.id);
                }
                None
            }
            KeyCode::Char('A') => {
                self.view.select_all_visible();
                None
            }
            KeyCode::Char('c') => {
                let task = self.view.selected_task()?;
                Some(Action::Update(
                    task.id,
                    TaskPatch::completion(!task.completed),
                ))
            }
            KeyCode::Char('d') => {
                let task = self.view.selected_task()?;
                Some(Action::Delete(task.id))
            }
            KeyCode::Char('C') => {
                let ids = self.view.selection();
                if ids.is_empty() {
                    self.status("nothing selected");
                    return None;
                }
                Some(Action::BulkComplete(ids))
            }
            KeyCode::Char('D') => {
                let ids = self.view.selection();
                if ids.is_empty() {
                    self.status("nothing selected");
                    return None;
                }
                Some(Action::BulkDelete(ids))
            }
            KeyCode::Char('s') => {
                let next = next_sort_key(self.view.criteria().sort_key);
                self.view.set_sort_key(next);
                None
            }
            KeyCode::Char('r') => {
                self.view.toggle_sort_direction();
                None
            }
            KeyCode::Char('f') => {
                let next = next_status_filter(self.view.criteria().status);
                self.view.set_status_filter(next);
                None
            }
            KeyCode::Char('p') => {
                let next = next_priority_filter(self.view.criteria().priority);
                self.view.set_priority_filter(next);
                None
            }
            KeyCode::Char('t') => {
                let next = next_category(
                    self.view.criteria().category.as_deref(),
                    &self.settings.categories,
                );
                self.view.set_category_filter(next);
                None
            }
            KeyCode::Char('x') => {
                let ids: Vec<TaskId> = self
                    .view
                    .tasks()
                    .iter()
                    .filter(|task| task.completed)
                    .map(|task| task.id)
                    .collect();
                if ids.is_empty() {
                    self.status("no completed tasks");
                    return None;
                }
                Some(Action::BulkDelete(ids))
            }
            KeyCode::Char('h') => {
                let shown = self.view.toggle_show_completed();
                self.settings.show_completed = shown;
                Some(Action::SaveSettings)
            }
            KeyCode::Char('m') => {
                self.settings.dark_mode = !self.settings.dark_mode;
                Some(Action::SaveSettings)
            }
            KeyCode::Char('g') => Some(Action::Refresh),
            KeyCode::Esc => {
                self.view.clear_selection();
                None
            }
            _ => None,
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) -> Option<Action> {
        match code {
            // The filter applies per keystroke; Enter and Esc both just
            // leave search mode with whatever is typed.
            KeyCode::Enter | KeyCode::Esc => {
                self.mode = Mode::Normal;
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.view.set_search(self.input.clone());
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.view.set_search(self.input.clone());
            }
            _ => {}
        }
        None
    }

    fn handle_add_key(&mut self, code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.input.clear();
                None
            }
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                let text = self.input.trim().to_owned();
                self.input.clear();
                if text.is_empty() {
                    self.status("task text cannot be empty");
                    return None;
                }
                Some(Action::Create(TaskDraft::with_text(text)))
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                None
            }
            _ => None,
        }
    }

    fn handle_edit_key(&mut self, code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.input.clear();
                self.view.cancel_edit();
                None
            }
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                self.input.clear();
                self.view
                    .commit_edit()
                    .map(|(id, patch)| Action::Update(id, patch))
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.view.set_edit_text(self.input.clone());
                None
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.view.set_edit_text(self.input.clone());
                None
            }
            _ => None,
        }
    }
}

const fn next_sort_key(key: SortKey) -> SortKey {
    match key {
        SortKey::Created => SortKey::DueDate,
        SortKey::DueDate => SortKey::Priority,
        SortKey::Priority => SortKey::Text,
        SortKey::Text => SortKey::Category,
        SortKey::Category => SortKey::Created,
    }
}

const fn next_status_filter(status: StatusFilter) -> StatusFilter {
    match status {
        StatusFilter::All => StatusFilter::Pending,
        StatusFilter::Pending => StatusFilter::Completed,
        StatusFilter::Completed => StatusFilter::All,
    }
}

const fn next_priority_filter(priority: Option<Priority>) -> Option<Priority> {
    match priority {
        None => Some(Priority::High),
        Some(Priority::High) => Some(Priority::Medium),
        Some(Priority::Medium) => Some(Priority::Low),
        Some(Priority::Low) => None,
    }
}

/// Step through the configured categories, then back to no filter. A current
/// filter that is no longer in the settings list also resets to no filter.
fn next_category(current: Option<&str>, categories: &[String]) -> Option<String> {
    match current {
        None => categories.first().cloned(),
        Some(current) => categories
            .iter()
            .position(|category| category == current)
            .and_then(|index| categories.get(index + 1).cloned()),
    }
}
