//! The task-list state machine.
//!
//! [`TaskList`] owns an ordered sequence of tasks and applies every user
//! action to it: add, toggle, rename, delete, clear-completed. A filter is
//! a pure projection over the sequence, never a mutation. When constructed
//! with a store handle, each mutation is written through to the `tasks`
//! table; the persisted rows are the system of record across sessions.
//!
//! Presentation is decoupled through change notifications: observers
//! registered with [`TaskList::subscribe`] receive a [`TaskChange`] after
//! each successful mutation and re-render from the current state.

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::debug;

use minder_db::models::TaskRow;
use minder_db::queries::tasks as db;

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub name: String,
    pub completed: bool,
    /// Generated plan text, once one has been attached.
    pub plan: Option<String>,
}

impl From<TaskRow> for TaskItem {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id,
            name: row.task_name,
            completed: row.completed,
            plan: row.plan,
        }
    }
}

/// View selection controlling which tasks are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// Whether a task is visible under this filter.
    pub fn matches(self, task: &TaskItem) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        };
        f.write_str(s)
    }
}

impl FromStr for Filter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(FilterParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Filter`] string.
#[derive(Debug, Clone)]
pub struct FilterParseError(pub String);

impl fmt::Display for FilterParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid filter: {:?} (expected all, active, or completed)",
            self.0
        )
    }
}

impl std::error::Error for FilterParseError {}

/// Change notification emitted after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskChange {
    Added { id: i64 },
    Toggled { id: i64, completed: bool },
    Renamed { id: i64 },
    Deleted { id: i64 },
    Cleared { removed: usize },
    PlanAttached { id: i64 },
}

type Observer = Box<dyn FnMut(&TaskChange) + Send>;

/// The ordered task collection plus its optional write-through store.
pub struct TaskList {
    tasks: Vec<TaskItem>,
    pool: Option<SqlitePool>,
    next_local_id: i64,
    observers: Vec<Observer>,
}

impl TaskList {
    /// A purely in-memory list with no persistence.
    pub fn detached() -> Self {
        Self {
            tasks: Vec::new(),
            pool: None,
            next_local_id: 1,
            observers: Vec::new(),
        }
    }

    /// A list backed by the store, rebuilt from the persisted rows.
    pub async fn load(pool: SqlitePool) -> Result<Self> {
        let rows = db::list_tasks(&pool).await?;
        let tasks: Vec<TaskItem> = rows.into_iter().map(TaskItem::from).collect();
        debug!(count = tasks.len(), "task list loaded from store");
        Ok(Self {
            tasks,
            pool: Some(pool),
            next_local_id: 1,
            observers: Vec::new(),
        })
    }

    /// Register a change observer. Observers fire after each successful
    /// mutation, in registration order.
    pub fn subscribe(&mut self, observer: impl FnMut(&TaskChange) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn emit(&mut self, change: TaskChange) {
        for observer in &mut self.observers {
            observer(&change);
        }
    }

    // -----------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------

    /// Append a new task. Blank names are a no-op (`Ok(None)`).
    ///
    /// With a store, the id is the row id bound from the insert; detached
    /// lists allocate from a local counter.
    pub async fn add_task(&mut self, name: &str) -> Result<Option<i64>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let id = match &self.pool {
            Some(pool) => db::insert_task(pool, name).await?.id,
            None => {
                let id = self.next_local_id;
                self.next_local_id += 1;
                id
            }
        };

        self.tasks.push(TaskItem {
            id,
            name: name.to_owned(),
            completed: false,
            plan: None,
        });
        self.emit(TaskChange::Added { id });
        Ok(Some(id))
    }

    /// Flip a task's completed flag. Returns `false` for unknown ids.
    pub async fn toggle_completed(&mut self, id: i64) -> Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        let completed = !task.completed;
        task.completed = completed;

        if let Some(pool) = &self.pool {
            db::update_task_completed(pool, id, completed).await?;
        }

        self.emit(TaskChange::Toggled { id, completed });
        Ok(true)
    }

    /// Replace a task's name. Blank names and unknown ids are no-ops
    /// (`Ok(false)`).
    pub async fn rename_task(&mut self, id: i64, new_name: &str) -> Result<bool> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Ok(false);
        }
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        task.name = new_name.to_owned();

        if let Some(pool) = &self.pool {
            db::update_task_name(pool, id, new_name).await?;
        }

        self.emit(TaskChange::Renamed { id });
        Ok(true)
    }

    /// Remove a task. Returns `false` for unknown ids.
    pub async fn delete_task(&mut self, id: i64) -> Result<bool> {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        self.tasks.remove(index);

        if let Some(pool) = &self.pool {
            db::delete_task(pool, id).await?;
        }

        self.emit(TaskChange::Deleted { id });
        Ok(true)
    }

    /// Remove every completed task. Returns how many were removed.
    pub async fn clear_completed(&mut self) -> Result<usize> {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();

        if removed > 0 {
            if let Some(pool) = &self.pool {
                db::delete_completed_tasks(pool).await?;
            }
            self.emit(TaskChange::Cleared { removed });
        }
        Ok(removed)
    }

    /// Store generated plan text on a task.
    ///
    /// Returns `false` when the task no longer exists, discarding the
    /// result of a plan request that outlived its task.
    pub async fn attach_plan(&mut self, id: i64, plan: &str) -> Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!(id, "discarding plan for deleted task");
            return Ok(false);
        };
        task.plan = Some(plan.to_owned());

        if let Some(pool) = &self.pool {
            db::update_task_plan(pool, id, plan).await?;
        }

        self.emit(TaskChange::PlanAttached { id });
        Ok(true)
    }

    // -----------------------------------------------------------------
    // Projections
    // -----------------------------------------------------------------

    /// The tasks visible under a filter, in display order. Pure: derived
    /// from current state, never mutating it.
    pub fn visible(&self, filter: Filter) -> Vec<&TaskItem> {
        self.tasks.iter().filter(|t| filter.matches(t)).collect()
    }

    /// Count of tasks not yet completed, over the full set regardless of
    /// the selected filter.
    pub fn items_left(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    /// All tasks in display order.
    pub fn tasks(&self) -> &[TaskItem] {
        &self.tasks
    }

    /// Look up a task by id.
    pub fn get(&self, id: i64) -> Option<&TaskItem> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
