//! Interactive terminal UI over the task service.

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use taskdeck_app::{ApiClient, Settings};
use tokio::runtime::Runtime;
use tracing::subscriber::NoSubscriber;

mod app;
mod ui;

use self::app::{Action, TuiApp};

const TICK_RATE_MS: u64 = 200;

/// Launch the interactive TUI against the service at `client`.
pub fn run(client: ApiClient, settings: Settings) -> Result<()> {
    let runtime = Runtime::new().context("failed to start async runtime")?;

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let result = tracing::subscriber::with_default(NoSubscriber::default(), || {
        run_event_loop(&mut terminal, &runtime, &client, settings)
    });

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    runtime: &Runtime,
    client: &ApiClient,
    settings: Settings,
) -> Result<()> {
    let mut app = TuiApp::new(settings);
    refresh(runtime, client, &mut app);

    let tick_rate = Duration::from_millis(TICK_RATE_MS);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;
        if app.should_quit {
            break;
        }

        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or_default();

        if event::poll(timeout)? {
            let evt = event::read()?;
            if let CrosstermEvent::Key(key) = evt
                && let Some(action) = app.handle_key(key)
            {
                apply_action(runtime, client, &mut app, action);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

fn apply_action(runtime: &Runtime, client: &ApiClient, app: &mut TuiApp, action: Action) {
    match action {
        Action::Refresh => refresh(runtime, client, app),

        Action::Create(draft) => {
            match runtime.block_on(client.create_task(&draft)) {
                Ok(task) => app.status(format!("created \"{}\"", task.text)),
                Err(err) => app.status(format!("create failed: {err}")),
            }
            refresh(runtime, client, app);
        }

        Action::Update(id, patch) => {
            if let Err(err) = runtime.block_on(client.update_task(id, &patch)) {
                app.status(format!("update failed: {err}"));
            }
            refresh(runtime, client, app);
        }

        Action::Delete(id) => {
            if let Err(err) = runtime.block_on(client.delete_task(id)) {
                app.status(format!("delete failed: {err}"));
            }
            refresh(runtime, client, app);
        }

        Action::BulkComplete(ids) => {
            let outcome = runtime.block_on(client.bulk_complete(&ids));
            app.status(format!(
                "completed {} task(s), {} failed",
                outcome.succeeded, outcome.failed
            ));
            app.view.clear_selection();
            refresh(runtime, client, app);
        }

        Action::BulkDelete(ids) => {
            let outcome = runtime.block_on(client.bulk_delete(&ids));
            app.status(format!(
                "deleted {} task(s), {} failed",
                outcome.succeeded, outcome.failed
            ));
            app.view.clear_selection();
            refresh(runtime, client, app);
        }

        Action::SaveSettings => {
            if let Err(err) = app.settings.save() {
                app.status(format!("could not save settings: {err}"));
            }
        }
    }
}

fn refresh(runtime: &Runtime, client: &ApiClient, app: &mut TuiApp) {
    match runtime.block_on(client.list_tasks()) {
        Ok(tasks) => app.view.replace_tasks(tasks),
        Err(err) => app.status(format!("fetch failed: {err}")),
    }
}
