//! The task subcommands: add, list, toggle, rename, delete, clear-completed.
//!
//! All of these run behind the login gate: the stored session token must
//! validate before the task list is constructed. Mutation feedback is
//! printed by a renderer observing the task list's change notifications.

use anyhow::{Result, bail};
use sqlx::SqlitePool;

use minder_core::session::SessionConfig;
use minder_core::tasklist::{Filter, TaskChange, TaskList};

use crate::session_file;

/// Validate the session and load the task list from the store, with the
/// CLI renderer subscribed to its change notifications.
pub async fn open_task_list(
    pool: &SqlitePool,
    session_config: &SessionConfig,
) -> Result<TaskList> {
    session_file::require_session(session_config)?;

    let mut list = TaskList::load(pool.clone()).await?;
    list.subscribe(render_change);
    Ok(list)
}

/// Renderer: one line per state change.
fn render_change(change: &TaskChange) {
    match change {
        TaskChange::Added { id } => println!("Added task {id}."),
        TaskChange::Toggled { id, completed: true } => println!("Task {id} completed."),
        TaskChange::Toggled { id, completed: false } => println!("Task {id} reopened."),
        TaskChange::Renamed { id } => println!("Task {id} renamed."),
        TaskChange::Deleted { id } => println!("Task {id} deleted."),
        TaskChange::Cleared { removed } => println!("Cleared {removed} completed task(s)."),
        TaskChange::PlanAttached { id } => println!("Plan attached to task {id}."),
    }
}

/// Execute `minder add`.
pub async fn run_add(list: &mut TaskList, name: &str) -> Result<()> {
    if list.add_task(name).await?.is_none() {
        bail!("task name must not be empty");
    }
    Ok(())
}

/// Execute `minder list`: print the filtered view and the active count.
pub fn run_list(list: &TaskList, filter: Filter) {
    let visible = list.visible(filter);
    if visible.is_empty() {
        println!("No tasks to show ({filter}).");
    } else {
        for task in &visible {
            let mark = if task.completed { 'x' } else { ' ' };
            let plan_note = if task.plan.is_some() { "  [plan]" } else { "" };
            println!("[{mark}] {:>4}  {}{plan_note}", task.id, task.name);
        }
    }
    println!("{} item(s) left", list.items_left());
}

/// Execute `minder toggle`.
pub async fn run_toggle(list: &mut TaskList, id: i64) -> Result<()> {
    if !list.toggle_completed(id).await? {
        bail!("task {id} not found");
    }
    Ok(())
}

/// Execute `minder rename`.
pub async fn run_rename(list: &mut TaskList, id: i64, name: &str) -> Result<()> {
    if !list.rename_task(id, name).await? {
        if list.get(id).is_none() {
            bail!("task {id} not found");
        }
        bail!("new task name must not be empty");
    }
    Ok(())
}

/// Execute `minder delete`.
pub async fn run_delete(list: &mut TaskList, id: i64) -> Result<()> {
    if !list.delete_task(id).await? {
        bail!("task {id} not found");
    }
    Ok(())
}

/// Execute `minder clear-completed`.
pub async fn run_clear_completed(list: &mut TaskList) -> Result<()> {
    if list.clear_completed().await? == 0 {
        println!("No completed tasks to clear.");
    }
    Ok(())
}
