//! Database query functions for the `tasks` table.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::TaskRow;

/// Insert a new task row. Returns the inserted task with its generated id.
pub async fn insert_task(pool: &SqlitePool, name: &str) -> Result<TaskRow> {
    let task = sqlx::query_as::<_, TaskRow>(
        "INSERT INTO tasks (task_name, completed, created_at) \
         VALUES (?, 0, ?) \
         RETURNING *",
    )
    .bind(name)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .context("failed to insert task")?;

    Ok(task)
}

/// Fetch a single task by id.
pub async fn get_task(pool: &SqlitePool, id: i64) -> Result<Option<TaskRow>> {
    let task = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch task")?;

    Ok(task)
}

/// List all tasks in insertion order.
pub async fn list_tasks(pool: &SqlitePool) -> Result<Vec<TaskRow>> {
    let tasks = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks ORDER BY id ASC")
        .fetch_all(pool)
        .await
        .context("failed to list tasks")?;

    Ok(tasks)
}

/// Update a task's name.
pub async fn update_task_name(pool: &SqlitePool, id: i64, name: &str) -> Result<()> {
    let result = sqlx::query("UPDATE tasks SET task_name = ? WHERE id = ?")
        .bind(name)
        .bind(id)
        .execute(pool)
        .await
        .context("failed to update task name")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("task {id} not found");
    }

    Ok(())
}

/// Update a task's completed flag.
pub async fn update_task_completed(pool: &SqlitePool, id: i64, completed: bool) -> Result<()> {
    let result = sqlx::query("UPDATE tasks SET completed = ? WHERE id = ?")
        .bind(completed)
        .bind(id)
        .execute(pool)
        .await
        .context("failed to update task completed flag")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("task {id} not found");
    }

    Ok(())
}

/// Store generated plan text on a task.
pub async fn update_task_plan(pool: &SqlitePool, id: i64, plan: &str) -> Result<()> {
    let result = sqlx::query("UPDATE tasks SET plan = ? WHERE id = ?")
        .bind(plan)
        .bind(id)
        .execute(pool)
        .await
        .context("failed to update task plan")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("task {id} not found");
    }

    Ok(())
}

/// Delete a task by id. Returns the number of rows removed (0 or 1).
pub async fn delete_task(pool: &SqlitePool, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("failed to delete task")?;

    Ok(result.rows_affected())
}

/// Delete every completed task. Returns the number of rows removed.
pub async fn delete_completed_tasks(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM tasks WHERE completed = 1")
        .execute(pool)
        .await
        .context("failed to delete completed tasks")?;

    Ok(result.rows_affected())
}

/// Count tasks that are not yet completed, over the full table.
pub async fn count_active_tasks(pool: &SqlitePool) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE completed = 0")
        .fetch_one(pool)
        .await
        .context("failed to count active tasks")?;

    Ok(row.0)
}
