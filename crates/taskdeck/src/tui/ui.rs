//! Rendering for the terminal UI.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use taskdeck_core::{SortDirection, SortKey, StatusFilter, Task};
use time::OffsetDateTime;

use super::app::{Mode, TuiApp};

struct Palette {
    text: Color,
    dim: Color,
    accent: Color,
    done: Color,
}

const LIGHT: Palette = Palette {
    text: Color::Black,
    dim: Color::DarkGray,
    accent: Color::Blue,
    done: Color::Green,
};

const DARK: Palette = Palette {
    text: Color::White,
    dim: Color::Gray,
    accent: Color::Cyan,
    done: Color::Green,
};

pub(super) fn draw(frame: &mut Frame<'_>, app: &TuiApp) {
    let palette = if app.settings.dark_mode { &DARK } else { &LIGHT };
    let [header, list, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(3),
    ])
    .areas(frame.area());

    draw_header(frame, header, app, palette);
    draw_task_list(frame, list, app, palette);
    draw_footer(frame, footer, app, palette);
}

fn draw_header(frame: &mut Frame<'_>, area: Rect, app: &TuiApp, palette: &Palette) {
    let stats = app.view.stats(OffsetDateTime::now_utc().date());
    let criteria = app.view.criteria();

    let summary = format!(
        "{} total | {} pending | {} done | {} overdue | {} high",
        stats.total, stats.pending, stats.completed, stats.overdue, stats.high_priority
    );
    let view = format!(
        "sort {} {} | status {} | category {} | completed {}",
        sort_label(criteria.sort_key),
        direction_label(criteria.direction),
        status_label(criteria.status),
        criteria.category.as_deref().unwrap_or("all"),
        if criteria.show_completed { "shown" } else { "hidden" },
    );

    let lines = vec![
        Line::from(Span::styled(summary, Style::default().fg(palette.text))),
        Line::from(Span::styled(view, Style::default().fg(palette.dim))),
    ];
    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("taskdeck").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_task_list(frame: &mut Frame<'_>, area: Rect, app: &TuiApp, palette: &Palette) {
    let visible = app.view.visible();
    let items: Vec<ListItem<'_>> = if visible.is_empty() {
        let message = if app.view.tasks().is_empty() {
            "no tasks yet; press a to add one"
        } else {
            "no tasks match the current filters"
        };
        vec![ListItem::new(Line::from(Span::styled(
            message,
            Style::default().fg(palette.dim),
        )))]
    } else {
        visible.iter().map(|task| task_row(task, app, palette)).collect()
    };

    let list = List::new(items)
        .block(Block::default().title("tasks").borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !visible.is_empty() {
        state.select(Some(app.view.cursor()));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn task_row<'a>(task: &'a Task, app: &TuiApp, palette: &Palette) -> ListItem<'a> {
    let marker = if app.view.is_selected(task.id) { "*" } else { " " };
    let check = if task.completed { "[x]" } else { "[ ]" };

    let text_style = if task.completed {
        Style::default()
            .fg(palette.done)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(palette.text)
    };

    let mut spans = vec![
        Span::styled(format!("{marker}{check} "), Style::default().fg(palette.dim)),
        Span::styled(task.text.clone(), text_style),
    ];
    if let Some(priority) = task.priority {
        spans.push(Span::styled(
            format!("  !{priority}"),
            Style::default().fg(palette.accent),
        ));
    }
    if let Some(due) = task.due_date {
        spans.push(Span::styled(
            format!("  due {due}"),
            Style::default().fg(palette.dim),
        ));
    }
    if let Some(category) = &task.category {
        spans.push(Span::styled(
            format!("  #{category}"),
            Style::default().fg(palette.dim),
        ));
    }
    ListItem::new(Line::from(spans))
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect, app: &TuiApp, palette: &Palette) {
    let (title, content, style) = match app.mode {
        Mode::Search => ("search", format!("/{}", app.input), Style::default().fg(palette.accent)),
        Mode::Add => ("new task", app.input.clone(), Style::default().fg(palette.accent)),
        Mode::Edit => ("edit task", app.input.clone(), Style::default().fg(palette.accent)),
        Mode::Normal => app.status_line().map_or_else(
            || {
                (
                    "keys",
                    "a add  e edit  c done  d del  / search  space mark  C/D bulk  x clear-done  s/r sort  f/p/t filter  h hide-done  m theme  g reload  q quit"
                        .to_owned(),
                    Style::default().fg(palette.dim),
                )
            },
            |status| ("status", status.to_owned(), Style::default().fg(palette.text)),
        ),
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(content, style)))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

const fn sort_label(key: SortKey) -> &'static str {
    match key {
        SortKey::Created => "created",
        SortKey::DueDate => "due",
        SortKey::Priority => "priority",
        SortKey::Text => "text",
        SortKey::Category => "category",
    }
}

const fn direction_label(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "asc",
        SortDirection::Descending => "desc",
    }
}

const fn status_label(status: StatusFilter) -> &'static str {
    match status {
        StatusFilter::All => "all",
        StatusFilter::Pending => "pending",
        StatusFilter::Completed => "completed",
    }
}
