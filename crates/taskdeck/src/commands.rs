//! One-shot CLI commands that talk to the task service.

use anyhow::{Context, Result, bail};
use taskdeck_app::ApiClient;
use taskdeck_core::{Task, TaskDraft, TaskPatch};

use crate::Command;

/// Execute a non-interactive command against the service.
pub async fn run(command: Command, client: &ApiClient) -> Result<()> {
    match command {
        Command::Add {
            text,
            due,
            priority,
            category,
        } => {
            let draft = TaskDraft {
                text,
                due_date: due,
                priority,
                category,
            };
            let task = client
                .create_task(&draft)
                .await
                .context("failed to create task")?;
            println!("created {}", task.id);
            Ok(())
        }

        Command::Ls => {
            let tasks = client
                .list_tasks()
                .await
                .context("failed to list tasks")?;
            for task in &tasks {
                println!("{}", format_row(task));
            }
            Ok(())
        }

        Command::Done { id } => {
            let current = client
                .list_tasks()
                .await
                .context("failed to list tasks")?
                .into_iter()
                .find(|task| task.id == id);
            let Some(task) = current else {
                bail!("no task with id {id}");
            };
            let patch = TaskPatch::completion(!task.completed);
            let updated = client
                .update_task(id, &patch)
                .await
                .context("failed to update task")?;
            println!(
                "{} is now {}",
                updated.id,
                if updated.completed { "done" } else { "pending" }
            );
            Ok(())
        }

        Command::Rm { id } => {
            client
                .delete_task(id)
                .await
                .context("failed to delete task")?;
            println!("deleted {id}");
            Ok(())
        }

        Command::Serve { .. } | Command::Tui => unreachable!("handled before dispatch"),
    }
}

fn format_row(task: &Task) -> String {
    let mark = if task.completed { 'x' } else { ' ' };
    let mut row = format!("[{mark}] {}  {}", task.id, task.text);
    if let Some(priority) = task.priority {
        row.push_str(&format!("  !{priority}"));
    }
    if let Some(due) = task.due_date {
        row.push_str(&format!("  due {due}"));
    }
    if let Some(category) = &task.category {
        row.push_str(&format!("  #{category}"));
    }
    row
}
